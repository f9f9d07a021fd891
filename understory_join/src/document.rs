// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entry point: selecting from a tree root.

use crate::error::JoinError;
use crate::selection::Selection;
use crate::types::ElementValue;

/// A tree root to run queries from.
///
/// The document does not own the tree; it only remembers which node is the root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Document<N> {
    root: Option<N>,
}

impl<N> Default for Document<N> {
    fn default() -> Self {
        Self { root: None }
    }
}

impl<N: Copy> Document<N> {
    /// A document rooted at `root`.
    pub fn new(root: N) -> Self {
        Self { root: Some(root) }
    }

    /// The root node, if set.
    pub fn root(&self) -> Option<N> {
        self.root
    }

    /// Replace (or clear) the root node.
    pub fn set_root(&mut self, root: Option<N>) {
        self.root = root;
    }

    /// Select every node yielded by `traverse(root)` that satisfies `predicate`.
    ///
    /// The result is a single group whose parent is the root. Its elements are unbound and in
    /// traversal order. Fails with [`JoinError::NullRoot`] if no root is set.
    ///
    /// ```rust
    /// use understory_join::{ChildLookup, Document, JoinError, descendants};
    ///
    /// struct Flat(Vec<u32>);
    /// impl ChildLookup<u32> for Flat {
    ///     fn children_of(&self, node: &u32) -> impl Iterator<Item = u32> {
    ///         let kids = if *node == 0 { &self.0[..] } else { &[] };
    ///         kids.iter().copied()
    ///     }
    /// }
    ///
    /// let tree = Flat(vec![1, 2, 3, 4]);
    /// let evens = Document::new(0)
    ///     .select_all(|n| n > 0 && n % 2 == 0, descendants(&tree))
    ///     .unwrap();
    /// assert_eq!(evens.nodes().collect::<Vec<_>>(), [2, 4]);
    ///
    /// let unset = Document::<u32>::default().select_all(|_| true, descendants(&tree));
    /// assert_eq!(unset.unwrap_err(), JoinError::NullRoot);
    /// ```
    pub fn select_all<I>(
        &self,
        mut predicate: impl FnMut(N) -> bool,
        traverse: impl FnOnce(N) -> I,
    ) -> Result<Selection<N, ()>, JoinError>
    where
        I: IntoIterator<Item = N>,
    {
        let root = self.root.ok_or(JoinError::NullRoot)?;
        let mut selection = Selection::new();
        let group = selection.group_add(ElementValue::unbound(root));
        for node in traverse(root) {
            if predicate(node) {
                group.add_unbound(node);
            }
        }
        tracing::debug!(selected = group.len(), "document select_all");
        Ok(selection)
    }
}
