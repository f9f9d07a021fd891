// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters that plug concrete tree types into the join engine.
//!
//! - **Element Tree Adapter** (`element_tree_adapter` feature): [`ChildLookup`](crate::ChildLookup)
//!   for `understory_element_tree::Tree`, plus predicate, key, and removal helpers.

#[cfg(feature = "element_tree_adapter")]
pub mod element_tree;
