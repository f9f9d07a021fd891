// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Join: bind data to tree nodes and reconcile the difference.
//!
//! Given the nodes already in a tree and a new sequence of values, a *data join* decides
//! which node carries which value and splits the outcome three ways:
//!
//! - **update**: existing nodes that received a value,
//! - **enter**: values with no existing node, waiting to be created,
//! - **exit**: existing nodes with no value left, waiting to be removed.
//!
//! The caller turns those views into tree edits through callbacks. The engine never owns,
//! creates, or destroys nodes itself; nodes are copyable handles into the caller's tree.
//!
//! ## Model
//!
//! - [`Document`]: a root handle and the entry point ([`Document::select_all`]).
//! - [`Selection`]: ordered [`Group`]s. Each group is one parent plus the ordered
//!   [`ElementValue`] pairs beneath it. Groups keep joins scoped to their parent.
//! - [`Join`]: the result of `data*`. It holds the `update` selection, the [`EnterView`], and
//!   the [`ExitView`] as plain fields.
//! - [`TreeIterator`] / [`ChildLookup`]: lazy depth-first or breadth-first traversal, with an
//!   optional depth bound, used as the iterator factory of `select_all`.
//! - [`ValueBox`]: type-erased, clonable payload for selections carrying mixed value types.
//!
//! ## Strategies
//!
//! - Positional: [`Selection::data`] and [`Selection::data_with`] pair by index.
//! - Keyed: [`Selection::data_by_key`] and [`Selection::data_with_by_key`] pair by key.
//!
//! The `_with` variants compute each group's values from its parent's bound value, which is
//! how nested selections (lists of lists) receive their own data. See [`join`] for the exact
//! partition rules.
//!
//! ## Example
//!
//! ```rust
//! use understory_join::{ChildLookup, Document, descendants};
//!
//! /// A toy tree: `children[i]` lists the children of node `i`.
//! #[derive(Default)]
//! struct Nodes {
//!     children: Vec<Vec<usize>>,
//! }
//!
//! impl Nodes {
//!     fn append(&mut self, parent: usize) -> usize {
//!         self.children.push(Vec::new());
//!         let id = self.children.len() - 1;
//!         self.children[parent].push(id);
//!         id
//!     }
//! }
//!
//! impl ChildLookup<usize> for Nodes {
//!     fn children_of(&self, node: &usize) -> impl Iterator<Item = usize> {
//!         self.children[*node].iter().copied()
//!     }
//! }
//!
//! let mut tree = Nodes { children: vec![Vec::new()] };
//! let document = Document::new(0);
//!
//! // Nothing exists yet, so every value enters.
//! let mut join = document
//!     .select_all(|n| n != 0, descendants(&tree))
//!     .unwrap()
//!     .data(&["a", "b", "c"]);
//! assert_eq!(join.enter.len(), 3);
//! let created = join.enter_append(|parent, _| tree.append(parent));
//! assert_eq!(created.len(), 3);
//!
//! // Two values for three nodes: the last node exits.
//! let mut join = document
//!     .select_all(|n| n != 0, descendants(&tree))
//!     .unwrap()
//!     .data(&["x", "y"]);
//! assert_eq!(join.update.len(), 2);
//! let mut stale = Vec::new();
//! join.exit_remove(|n| stale.push(n));
//! assert_eq!(stale, [3]);
//! ```
//!
//! ## Logging
//!
//! Joins, enter-appends, and exit-removes emit `tracing` events at `debug` (per-group
//! partitions at `trace`). Install any subscriber to see them; the crate never installs one.
//!
//! ## Features
//!
//! - `std`: enables `std` support in dependencies (`thiserror`, `tracing`).
//! - `element_tree_adapter`: enables [`adapters::element_tree`], plugging
//!   `understory_element_tree::Tree` into the engine.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod adapters;
pub mod join;

mod document;
mod enter;
mod error;
mod exit;
mod selection;
mod traverse;
mod types;
mod value;

#[cfg(test)]
mod testing;

pub use document::Document;
pub use enter::EnterView;
pub use error::JoinError;
pub use exit::ExitView;
pub use join::Join;
pub use selection::Selection;
pub use traverse::{ChildLookup, TraversalOrder, TreeIterator, descendants};
pub use types::{ElementValue, Group};
pub use value::{BoxedValue, ValueBox};
