// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selections: ordered groups of node/value pairs, and the structural operations on them.
//!
//! A selection is a plain value. Queries ([`Selection::select_all`], [`Selection::append`],
//! and the `data*` joins in [`crate::join`]) never modify the selection they are called on;
//! they return a fresh one. The only in-place edits are the ones a join result makes to its
//! own update selection when entering nodes, and [`Selection::remove`], which drains.

use alloc::vec::Vec;

use crate::error::JoinError;
use crate::types::{ElementValue, Group};
use crate::value::ValueBox;

/// Ordered collection of [`Group`]s, one per parent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection<N, T> {
    pub(crate) groups: Vec<Group<N, T>>,
}

impl<N, T> Default for Selection<N, T> {
    fn default() -> Self {
        Self { groups: Vec::new() }
    }
}

impl<N, T> Selection<N, T> {
    /// An empty selection with no groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// A selection with a single, empty group under `node`.
    pub fn from_root(node: N) -> Self {
        let mut selection = Self::new();
        selection.group_add(ElementValue::unbound(node));
        selection
    }

    /// Start a new group under `parent` and return it for filling.
    pub fn group_add(&mut self, parent: ElementValue<N, T>) -> &mut Group<N, T> {
        self.groups.push(Group::new(parent));
        let last = self.groups.len() - 1;
        &mut self.groups[last]
    }

    /// Groups in order.
    pub fn groups(&self) -> &[Group<N, T>] {
        &self.groups
    }

    /// Total number of elements across all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    /// Returns `true` if no group holds any element.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(Group::is_empty)
    }

    /// Every element, in group order then element order.
    pub fn iter(&self) -> impl Iterator<Item = &ElementValue<N, T>> + '_ {
        self.groups.iter().flat_map(Group::iter)
    }
}

impl<N: Copy, T> Selection<N, T> {
    /// Every element node, in group order then element order.
    pub fn nodes(&self) -> impl Iterator<Item = N> + '_ {
        self.iter().map(|ev| ev.node)
    }

    /// Invoke `f(node, value)` for every bound element, in group order then element order.
    ///
    /// Unbound elements are skipped. Results of [`Selection::select_all`] and
    /// [`Selection::append`] hold only unbound nodes; use [`Selection::each`] on those.
    /// The selection's structure is never changed; `f` is where callers mutate their tree.
    pub fn call(&self, mut f: impl FnMut(N, &T)) -> &Self {
        for ev in self.iter() {
            if let Some(value) = &ev.value {
                f(ev.node, value);
            }
        }
        self
    }

    /// Invoke `f(node, value)` for every element, bound or not, in group order then element
    /// order.
    pub fn each(&self, mut f: impl FnMut(N, Option<&T>)) -> &Self {
        for ev in self.iter() {
            f(ev.node, ev.value.as_ref());
        }
        self
    }

    /// Hand every element node to `detach`, then drop the elements from this selection.
    ///
    /// Groups stay in place but end up empty, so removing twice never reports a node twice.
    /// Returns how many nodes were passed to `detach`.
    pub fn remove(&mut self, mut detach: impl FnMut(N)) -> usize {
        let mut removed = 0;
        for group in &mut self.groups {
            for ev in group.elements.drain(..) {
                detach(ev.node);
                removed += 1;
            }
        }
        removed
    }
}

impl<N: Copy, T: Clone> Selection<N, T> {
    /// Create one child under every group parent.
    ///
    /// `create(parent)` runs once per group and returns the new node. The result has one group
    /// per original parent, each holding just the new, unbound node.
    #[must_use]
    pub fn append(&self, mut create: impl FnMut(N) -> N) -> Self {
        let mut result = Self::new();
        for group in &self.groups {
            let node = create(group.parent.node);
            result.group_add(group.parent.clone()).add_unbound(node);
        }
        result
    }

    /// Select beneath every element.
    ///
    /// For each element, `traverse(node)` yields candidate nodes (a
    /// [`TreeIterator`](crate::TreeIterator) includes the start node itself) and those
    /// satisfying `predicate` form a new group whose parent is that element, value included.
    /// This is how nesting arises: the parent's value later feeds
    /// [`Selection::data_with`].
    #[must_use]
    pub fn select_all<I>(
        &self,
        mut predicate: impl FnMut(N) -> bool,
        mut traverse: impl FnMut(N) -> I,
    ) -> Self
    where
        I: IntoIterator<Item = N>,
    {
        let mut result = Self::new();
        for ev in self.iter() {
            let group = result.group_add(ev.clone());
            for node in traverse(ev.node) {
                if predicate(node) {
                    group.add_unbound(node);
                }
            }
        }
        result
    }
}

impl<N: Copy> Selection<N, ValueBox> {
    /// Typed [`Selection::call`] over a selection of [`ValueBox`]es.
    ///
    /// Every bound value is checked before `f` runs, so a [`JoinError::TypeMismatch`] leaves
    /// the caller's tree untouched.
    pub fn call_as<U: 'static>(&self, mut f: impl FnMut(N, &U)) -> Result<&Self, JoinError> {
        for value in self.iter().filter_map(|ev| ev.value.as_ref()) {
            value.get::<U>()?;
        }
        for ev in self.iter() {
            if let Some(value) = &ev.value {
                f(ev.node, value.get::<U>()?);
            }
        }
        Ok(self)
    }
}

impl<'a, N, T> IntoIterator for &'a Selection<N, T> {
    type Item = &'a Group<N, T>;
    type IntoIter = core::slice::Iter<'a, Group<N, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}
