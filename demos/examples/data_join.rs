// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Enter, update, and exit over an element tree.
//!
//! Three passes, each printed as an outline:
//! - points joined by position, then shrunk to a single point,
//! - people joined by name, then rejoined with a different set of names,
//! - lists of names, where each list forwards its own names to its children.
//!
//! Run:
//! - `cargo run -p understory_demos --example data_join`
//! - `RUST_LOG=understory_join=trace cargo run -p understory_demos --example data_join`

use understory_element_tree::Tree;
use understory_join::adapters::element_tree::{attr_key, detach, tag_is};
use understory_join::{Document, JoinError, descendants};

#[derive(Clone, Copy, Debug)]
struct Point {
    x: i32,
    y: i32,
}

fn points() -> Result<(), JoinError> {
    let mut tree = Tree::new();
    let root = tree.insert(None, "root");
    let document = Document::new(root);

    let data = [Point { x: 1, y: 7 }, Point { x: 6, y: 9 }, Point { x: 10, y: 11 }];
    let mut join = document
        .select_all(tag_is(&tree, "a"), descendants(&tree))?
        .data(&data);
    join.enter_append(|parent, _| tree.append(parent, "a"))
        .call(|e, p| {
            tree.set_attr(e, "x", p.x.to_string());
            tree.set_attr(e, "y", p.y.to_string());
        });
    join.update.call(|e, _| tree.set_attr(e, "new_attr", "ABC"));
    println!("{}", tree.outline(root));

    let mut join = document
        .select_all(tag_is(&tree, "a"), descendants(&tree))?
        .data(&[Point { x: 29, y: 30 }]);
    join.exit_remove(detach(&mut tree));
    join.update.call(|e, p| {
        tree.set_attr(e, "x_new", p.x.to_string());
        tree.set_attr(e, "y_new", p.y.to_string());
    });
    println!("{}", tree.outline(root));
    Ok(())
}

fn people() -> Result<(), JoinError> {
    let mut tree = Tree::new();
    let root = tree.insert(None, "root");
    let document = Document::new(root);

    let texts = ["einstein", "newton", "pithagoras", "poincare"];
    let mut join = document
        .select_all(tag_is(&tree, "person"), descendants(&tree))?
        .data(&texts);
    join.enter_append(|parent, _| tree.append(parent, "person"));
    join.update.call(|e, s| tree.set_attr(e, "name", *s));
    println!("{}", tree.outline(root));

    let update_texts = ["einstein", "poincare", "feynman"];
    let mut join = document
        .select_all(tag_is(&tree, "person"), descendants(&tree))?
        .data_by_key(
            &update_texts,
            |s| Some(s.to_string()),
            attr_key(&tree, "name"),
        );
    join.exit_remove(detach(&mut tree));
    join.enter_append(|parent, _| tree.append(parent, "person"));
    join.update.call(|e, s| tree.set_attr(e, "name", *s));
    println!("{}", tree.outline(root));
    Ok(())
}

fn nested_lists() -> Result<(), JoinError> {
    let mut tree = Tree::new();
    let root = tree.insert(None, "root");
    let document = Document::new(root);

    let passes: [Vec<Vec<&str>>; 2] = [
        vec![vec!["einstein", "gauss", "feynman"], vec!["pithagoras", "newton"]],
        vec![
            vec!["feynman", "gauss", "poincare"],
            vec!["einstein", "pithagoras"],
            vec!["euclides", "newton"],
        ],
    ];
    for names in &passes {
        let mut lists = document
            .select_all(tag_is(&tree, "list"), descendants(&tree))?
            .data(names);
        lists.enter_append(|parent, _| tree.append(parent, "list"));

        let mut items = lists
            .update
            .select_all(tag_is(&tree, "name"), descendants(&tree))
            .data_with_by_key(
                |list| list.clone(),
                |s| Some(s.to_string()),
                attr_key(&tree, "str"),
            )?;
        items.exit_remove(detach(&mut tree));
        items.enter_append(|parent, _| tree.append(parent, "name"));
        items.update.call(|e, s| tree.set_attr(e, "str", *s));
        println!("{}", tree.outline(root));
    }
    Ok(())
}

fn main() -> Result<(), JoinError> {
    understory_demos::init_logging();
    points()?;
    people()?;
    nested_lists()?;
    Ok(())
}
