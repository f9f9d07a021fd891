// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter helpers for Understory Element Tree.
//!
//! ## Feature
//!
//! Enable with `element_tree_adapter`.
//!
//! ## Notes
//!
//! The helpers return closures shaped for the engine's callback slots: [`tag_is`] for
//! `select_all` predicates, [`attr_key`] for keyed joins, [`detach`] for exit removal.
//! Traversal uses [`descendants`](crate::descendants) or a configured
//! [`TreeIterator`](crate::TreeIterator) over the tree directly.

use alloc::string::String;

use understory_element_tree::{ElementId, Tree};

use crate::traverse::ChildLookup;

impl ChildLookup<ElementId> for Tree {
    fn children_of(&self, node: &ElementId) -> impl Iterator<Item = ElementId> {
        Self::children_of(self, *node).iter().copied()
    }
}

/// Predicate matching live elements with the given tag.
pub fn tag_is<'a>(tree: &'a Tree, tag: &'a str) -> impl Fn(ElementId) -> bool + 'a {
    move |id| tree.tag(id) == Some(tag)
}

/// Node key for keyed joins: the element's `key` attribute, if set.
pub fn attr_key<'a>(tree: &'a Tree, key: &'a str) -> impl Fn(ElementId) -> Option<String> + 'a {
    move |id| tree.attr(id, key).map(String::from)
}

/// Removal callback detaching elements (and their subtrees) from `tree`.
pub fn detach(tree: &mut Tree) -> impl FnMut(ElementId) + '_ {
    move |id| tree.remove(id)
}
