// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Element Tree: a small document-like tree of tagged elements.
//!
//! Each element has a tag, an optional parent, an ordered list of children, and a map of
//! string attributes. Elements live in a generational arena and are addressed by
//! [`ElementId`], so a handle to a removed element is detected as stale instead of silently
//! aliasing a newer element that reused its slot.
//!
//! This is the concrete node type that `understory_join` drives through its
//! `element_tree_adapter` feature: the join engine selects elements, binds data to them, and
//! calls back into [`Tree::append`] and [`Tree::remove`] to create and detach elements.
//!
//! ## Example
//!
//! ```rust
//! use understory_element_tree::Tree;
//!
//! let mut tree = Tree::new();
//! let root = tree.insert(None, "root");
//! let a = tree.append(root, "a");
//! tree.set_attr(a, "x", "1");
//!
//! assert_eq!(tree.children_of(root), &[a]);
//! assert_eq!(tree.attr(a, "x"), Some("1"));
//!
//! tree.remove(a);
//! assert!(!tree.is_alive(a));
//! assert!(tree.children_of(root).is_empty());
//! ```
//!
//! ## Removal
//!
//! Removing an element removes its whole subtree and unlinks it from its parent. Sibling
//! lists are compacted; there are no empty slots left behind, so positional consumers only
//! ever see live elements.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod tree;
mod types;

pub use tree::{DepthFirst, Tree};
pub use types::{Element, ElementId};
