// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Exit view: existing nodes that found no value.

use crate::selection::Selection;
use crate::types::{ElementValue, Group};

/// Stale nodes from a join, grouped by parent.
///
/// Internally a [`Selection`] whose value slot is unused. Only parents that actually lost
/// children get a group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExitView<N> {
    selection: Selection<N, ()>,
}

impl<N> Default for ExitView<N> {
    fn default() -> Self {
        Self {
            selection: Selection::new(),
        }
    }
}

impl<N> ExitView<N> {
    /// Record `nodes` as stale children of `parent`; does nothing if `nodes` is empty.
    pub(crate) fn push_group(&mut self, parent: N, nodes: impl IntoIterator<Item = N>) {
        let mut nodes = nodes.into_iter().peekable();
        if nodes.peek().is_none() {
            return;
        }
        let group = self.selection.group_add(ElementValue::unbound(parent));
        for node in nodes {
            group.add_unbound(node);
        }
    }

    /// Number of stale nodes not yet removed.
    pub fn len(&self) -> usize {
        self.selection.len()
    }

    /// Returns `true` if there is nothing left to remove.
    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    /// Groups of stale nodes.
    pub fn groups(&self) -> &[Group<N, ()>] {
        self.selection.groups()
    }

    /// The underlying selection.
    pub fn selection(&self) -> &Selection<N, ()> {
        &self.selection
    }
}

impl<N: Copy> ExitView<N> {
    /// Stale nodes, in group order then element order.
    pub fn nodes(&self) -> impl Iterator<Item = N> + '_ {
        self.selection.nodes()
    }

    /// Pass every stale node to `detach` exactly once, then forget it.
    ///
    /// The engine does not know how nodes leave the tree; `detach` does. Calling this again
    /// is a no-op. Returns how many nodes were detached.
    pub fn remove(&mut self, detach: impl FnMut(N)) -> usize {
        let removed = self.selection.remove(detach);
        tracing::debug!(removed, "exit remove");
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn empty_groups_are_not_recorded() {
        let mut exit = ExitView::default();
        exit.push_group(0_u32, []);
        exit.push_group(1, [5, 6]);
        assert_eq!(exit.groups().len(), 1);
        assert_eq!(exit.groups()[0].parent().node, 1);
        assert_eq!(exit.len(), 2);
    }

    #[test]
    fn remove_detaches_each_stale_node_once() {
        let mut exit = ExitView::default();
        exit.push_group(0_u32, [1, 2]);
        exit.push_group(3, [4]);
        let mut detached = Vec::new();
        assert_eq!(exit.remove(|n| detached.push(n)), 3);
        assert_eq!(exit.remove(|n| detached.push(n)), 0);
        assert_eq!(detached, vec![1, 2, 4]);
        assert!(exit.is_empty());
    }
}
