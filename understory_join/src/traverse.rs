// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lazy tree traversal used to find existing nodes.
//!
//! The engine never walks a tree on its own: [`Selection::select_all`](crate::Selection::select_all)
//! and [`Document::select_all`](crate::Document::select_all) take an iterator factory, and
//! [`TreeIterator`] is the stock factory output. It visits a start node and its descendants in
//! pre-order, optionally bounded in depth, either depth-first or breadth-first.
//!
//! For positional joins the visitation order defines which node pairs with which value, so
//! pick the order deliberately. Keyed joins match by key and do not depend on it.

use alloc::collections::VecDeque;
use core::fmt;

use smallvec::SmallVec;

/// Source of child nodes for traversal.
///
/// This is the only view of the external tree the traversal needs. Children must be
/// reported in document order.
pub trait ChildLookup<N> {
    /// Children of `node` in document order. Stale nodes have no children.
    fn children_of(&self, node: &N) -> impl Iterator<Item = N>;
}

/// Order in which [`TreeIterator`] visits siblings and levels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TraversalOrder {
    /// Last-in, first-out frontier: a node's subtree is exhausted before its next sibling.
    #[default]
    DepthFirst,
    /// First-in, first-out frontier: every node at depth `d` comes before any at `d + 1`.
    BreadthFirst,
}

/// Finite, lazy sequence of the nodes reachable from one or more roots.
///
/// The frontier holds `(node, depth)` pairs and is seeded with the root at depth 0. Each
/// step pops one pair and, when the depth is within the bound, schedules that node's children
/// before yielding it. A traversal cannot be rewound; build a new iterator instead.
///
/// ```rust
/// use understory_join::{ChildLookup, TraversalOrder, TreeIterator};
///
/// // 0 ─┬─ 1 ── 3
/// //    └─ 2
/// struct Fixed;
/// impl ChildLookup<u32> for Fixed {
///     fn children_of(&self, node: &u32) -> impl Iterator<Item = u32> {
///         let kids: &[u32] = match node {
///             0 => &[1, 2],
///             1 => &[3],
///             _ => &[],
///         };
///         kids.iter().copied()
///     }
/// }
///
/// let dfs: Vec<u32> = TreeIterator::new(&Fixed, 0).collect();
/// assert_eq!(dfs, [0, 1, 3, 2]);
///
/// let bfs: Vec<u32> = TreeIterator::new(&Fixed, 0)
///     .with_order(TraversalOrder::BreadthFirst)
///     .collect();
/// assert_eq!(bfs, [0, 1, 2, 3]);
///
/// let shallow: Vec<u32> = TreeIterator::new(&Fixed, 0).with_max_depth(1).collect();
/// assert_eq!(shallow, [0, 1, 2]);
/// ```
pub struct TreeIterator<'a, T, N> {
    tree: &'a T,
    frontier: VecDeque<(N, usize)>,
    max_depth: Option<usize>,
    order: TraversalOrder,
}

impl<T, N: fmt::Debug> fmt::Debug for TreeIterator<'_, T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeIterator")
            .field("frontier", &self.frontier)
            .field("max_depth", &self.max_depth)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

impl<'a, T: ChildLookup<N>, N> TreeIterator<'a, T, N> {
    /// Traverse `root` and all of its descendants depth-first.
    pub fn new(tree: &'a T, root: N) -> Self {
        let mut it = Self::empty(tree);
        it.push_root(root);
        it
    }

    /// An iterator with an empty frontier; seed it with [`TreeIterator::push_root`].
    pub fn empty(tree: &'a T) -> Self {
        Self {
            tree,
            frontier: VecDeque::new(),
            max_depth: None,
            order: TraversalOrder::DepthFirst,
        }
    }

    /// Limit how deep children are scheduled. `0` yields only the roots.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Choose the frontier discipline.
    #[must_use]
    pub fn with_order(mut self, order: TraversalOrder) -> Self {
        self.order = order;
        self
    }

    /// Add another root at depth 0.
    ///
    /// Depth-first traversal visits the most recently pushed pending root first; breadth-first
    /// traversal visits roots in push order.
    pub fn push_root(&mut self, node: N) {
        match self.order {
            TraversalOrder::DepthFirst => self.frontier.push_front((node, 0)),
            TraversalOrder::BreadthFirst => self.frontier.push_back((node, 0)),
        }
    }

    fn descends_below(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|max| depth < max)
    }
}

impl<T: ChildLookup<N>, N> Iterator for TreeIterator<'_, T, N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        let (node, depth) = self.frontier.pop_front()?;
        if self.descends_below(depth) {
            match self.order {
                TraversalOrder::DepthFirst => {
                    // Front-loaded in reverse so the first child is popped next.
                    let children: SmallVec<[N; 8]> = self.tree.children_of(&node).collect();
                    for child in children.into_iter().rev() {
                        self.frontier.push_front((child, depth + 1));
                    }
                }
                TraversalOrder::BreadthFirst => {
                    self.frontier
                        .extend(self.tree.children_of(&node).map(|c| (c, depth + 1)));
                }
            }
        }
        Some(node)
    }
}

/// Iterator factory for [`select_all`](crate::Selection::select_all): every node under (and
/// including) the start node, depth-first and unbounded.
pub fn descendants<'a, T: ChildLookup<N>, N>(
    tree: &'a T,
) -> impl Fn(N) -> TreeIterator<'a, T, N> {
    move |root| TreeIterator::new(tree, root)
}
