// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural building blocks of a selection: node/value pairs and per-parent groups.

use alloc::vec::Vec;

/// A node handle together with the value bound to it, if any.
///
/// The handle is a non-owning reference into the caller's tree; the engine never creates or
/// destroys nodes on its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementValue<N, T> {
    /// Node handle.
    pub node: N,
    /// Bound value; `None` for nodes that were selected but not joined yet.
    pub value: Option<T>,
}

impl<N, T> ElementValue<N, T> {
    /// A node with `value` bound to it.
    pub fn bound(node: N, value: T) -> Self {
        Self {
            node,
            value: Some(value),
        }
    }

    /// A node with no value.
    pub fn unbound(node: N) -> Self {
        Self { node, value: None }
    }
}

/// One parent and the ordered node/value pairs selected beneath it.
///
/// Groups keep sibling sets scoped to their parent: a join matches a group's elements only
/// against the values meant for that group. Element order is insertion order and is preserved
/// by every operation that does not explicitly rematch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group<N, T> {
    pub(crate) parent: ElementValue<N, T>,
    pub(crate) elements: Vec<ElementValue<N, T>>,
}

impl<N, T> Group<N, T> {
    /// An empty group under `parent`.
    pub fn new(parent: ElementValue<N, T>) -> Self {
        Self {
            parent,
            elements: Vec::new(),
        }
    }

    /// Append `node` bound to `value`.
    pub fn add(&mut self, node: N, value: T) -> &mut Self {
        self.elements.push(ElementValue::bound(node, value));
        self
    }

    /// Append `node` with no bound value.
    pub fn add_unbound(&mut self, node: N) -> &mut Self {
        self.elements.push(ElementValue::unbound(node));
        self
    }

    /// The group's parent.
    pub fn parent(&self) -> &ElementValue<N, T> {
        &self.parent
    }

    /// Elements in order.
    pub fn elements(&self) -> &[ElementValue<N, T>] {
        &self.elements
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the group has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate elements in order.
    pub fn iter(&self) -> core::slice::Iter<'_, ElementValue<N, T>> {
        self.elements.iter()
    }
}

impl<N: Copy, T> Group<N, T> {
    /// Element nodes in order.
    pub fn nodes(&self) -> impl Iterator<Item = N> + '_ {
        self.elements.iter().map(|ev| ev.node)
    }

    /// Bound values in element order; unbound elements are skipped.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.elements.iter().filter_map(|ev| ev.value.as_ref())
    }
}

impl<'a, N, T> IntoIterator for &'a Group<N, T> {
    type Item = &'a ElementValue<N, T>;
    type IntoIter = core::slice::Iter<'a, ElementValue<N, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn add_preserves_insertion_order() {
        let mut group: Group<u32, &str> = Group::new(ElementValue::unbound(0));
        group.add(3, "c").add_unbound(1).add(2, "b");
        assert_eq!(group.nodes().collect::<Vec<_>>(), vec![3, 1, 2]);
        assert_eq!(group.values().copied().collect::<Vec<_>>(), vec!["c", "b"]);
        assert_eq!(group.len(), 3);
        assert_eq!(group.parent().node, 0);
    }

    #[test]
    fn bound_and_unbound_constructors() {
        assert_eq!(ElementValue::bound(1, 'x').value, Some('x'));
        assert_eq!(ElementValue::<u8, char>::unbound(1).value, None);
    }
}
