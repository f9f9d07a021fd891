// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data joins: matching a value sequence against the existing elements of every group.
//!
//! ## Strategies
//!
//! - **Positional** ([`Selection::data`], [`Selection::data_with`]): element `i` pairs with
//!   value `i` until either side runs out. Extra values enter; extra elements exit.
//! - **Keyed** ([`Selection::data_by_key`], [`Selection::data_with_by_key`]): values and
//!   elements are matched by equal keys regardless of order. Elements whose key has no value
//!   exit; values whose key matched no element enter, in value order.
//!
//! The plain variants join the same value list against every group. The `_with` variants
//! forward: each group's values are computed from its parent's bound value, which is how
//! nested selections receive per-parent data.
//!
//! ## Keys
//!
//! Keys should be unique within one value sequence. When two values share a key, the later
//! one is the one matched or entered; the earlier is dropped. Two elements with the same key
//! compete for one value: the first in element order wins and the other exits.
//!
//! ## Isolation
//!
//! Every group is joined on its own. Values are never matched against, or entered under,
//! another group's parent, even when all groups share one value list.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::enter::EnterView;
use crate::error::JoinError;
use crate::exit::ExitView;
use crate::selection::Selection;
use crate::types::{ElementValue, Group};

/// Result of a data join.
///
/// ```rust
/// use understory_join::{ElementValue, Selection};
///
/// // One parent (node 0) with three existing children.
/// let mut existing: Selection<u32, ()> = Selection::new();
/// existing
///     .group_add(ElementValue::unbound(0))
///     .add_unbound(1)
///     .add_unbound(2)
///     .add_unbound(3);
///
/// let join = existing.data(&["only"]);
/// assert_eq!(join.update.nodes().collect::<Vec<_>>(), [1]);
/// assert!(join.enter.is_empty());
/// assert_eq!(join.exit.nodes().collect::<Vec<_>>(), [2, 3]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Join<N, U> {
    /// Existing elements that received a value, one group per input group.
    pub update: Selection<N, U>,
    /// Values that found no element, to be created.
    pub enter: EnterView<U>,
    /// Elements that found no value, to be removed.
    pub exit: ExitView<N>,
}

impl<N, U> Default for Join<N, U> {
    fn default() -> Self {
        Self {
            update: Selection::new(),
            enter: EnterView::default(),
            exit: ExitView::default(),
        }
    }
}

impl<N, U> Join<N, U> {
    /// Split into `(update, enter, exit)`.
    pub fn into_parts(self) -> (Selection<N, U>, EnterView<U>, ExitView<N>) {
        (self.update, self.enter, self.exit)
    }

    fn finish(self, strategy: &'static str) -> Self {
        tracing::debug!(
            strategy,
            groups = self.update.groups.len(),
            update = self.update.len(),
            enter = self.enter.len(),
            exit = self.exit.len(),
            "data join"
        );
        self
    }
}

impl<N: Copy, U: Clone> Join<N, U> {
    /// Enter every leftover value through `create(parent, value)`.
    ///
    /// New nodes are bound in the returned selection and appended to [`Join::update`]. See
    /// [`EnterView::append`]. A second call finds nothing left to enter.
    pub fn enter_append(&mut self, create: impl FnMut(N, &U) -> N) -> Selection<N, U> {
        core::mem::take(&mut self.enter).append(&mut self.update, create)
    }

    /// Pair `group`'s elements with `values` by index. Returns the new update group's index
    /// and the number of matched pairs.
    fn match_positional<T>(&mut self, group: &Group<N, T>, values: &[U]) -> (usize, usize) {
        let gi = self.start_group(group.parent.node);
        let target = &mut self.update.groups[gi];
        for (ev, value) in group.elements.iter().zip(values) {
            target.add(ev.node, value.clone());
        }
        let matched = group.len().min(values.len());
        self.exit.push_group(
            group.parent.node,
            group.elements[matched..].iter().map(|ev| ev.node),
        );
        tracing::trace!(
            group = gi,
            matched,
            entered = values.len() - matched,
            exited = group.len() - matched,
            "positional partition"
        );
        (gi, matched)
    }

    /// Match `group`'s elements to `values` by key. `index` maps each key to the position of
    /// the value that owns it and is consumed as elements claim values.
    fn match_keyed<T, K: Hash + Eq>(
        &mut self,
        group: &Group<N, T>,
        values: &[U],
        keys: &[K],
        mut index: HashMap<&K, usize>,
        node_key: &mut impl FnMut(N) -> K,
    ) {
        let gi = self.start_group(group.parent.node);
        let target = &mut self.update.groups[gi];
        let mut stale = Vec::new();
        for ev in &group.elements {
            match index.remove(&node_key(ev.node)) {
                Some(i) => {
                    target.add(ev.node, values[i].clone());
                }
                None => stale.push(ev.node),
            }
        }
        let matched = target.len();
        let exited = stale.len();
        self.exit.push_group(group.parent.node, stale);

        // A value is left over if its key is unclaimed and it is the value the key maps to.
        let range = self.enter.extend_backing(
            keys.iter()
                .enumerate()
                .filter(|(i, key)| index.get(*key) == Some(i))
                .map(|(i, _)| values[i].clone()),
        );
        tracing::trace!(
            group = gi,
            matched,
            entered = range.len(),
            exited,
            "keyed partition"
        );
        self.enter.push_span(gi, range);
    }

    fn start_group(&mut self, parent: N) -> usize {
        self.update.group_add(ElementValue::unbound(parent));
        self.update.groups.len() - 1
    }
}

impl<N: Copy, U> Join<N, U> {
    /// Detach every stale node through `detach`; see [`ExitView::remove`].
    pub fn exit_remove(&mut self, detach: impl FnMut(N)) -> usize {
        self.exit.remove(detach)
    }
}

fn key_index<K: Hash + Eq>(keys: &[K]) -> HashMap<&K, usize> {
    // Later duplicates overwrite earlier ones.
    keys.iter().enumerate().map(|(i, key)| (key, i)).collect()
}

impl<N: Copy, T> Selection<N, T> {
    /// Positional join of one value list against every group.
    ///
    /// In each group, element `i` is bound to `values[i]` for `i < min(elements, values)`.
    /// The remaining values enter under that group's parent; the remaining elements exit.
    pub fn data<U: Clone>(&self, values: &[U]) -> Join<N, U> {
        let mut join = Join::default();
        // Groups share one copy of `values` in the enter view, made on first need.
        let mut shared: Option<usize> = None;
        for group in &self.groups {
            let (gi, matched) = join.match_positional(group, values);
            if matched < values.len() {
                let base = *shared
                    .get_or_insert_with(|| join.enter.extend_backing(values.iter().cloned()).start);
                join.enter
                    .push_span(gi, base + matched..base + values.len());
            }
        }
        join.finish("positional")
    }

    /// Keyed join of one value list against every group.
    ///
    /// `data_key` keys each value, `node_key` keys each existing element. Each group gets a
    /// fresh view of all values, so a value matched in one group is still available to the
    /// next.
    pub fn data_by_key<U: Clone, K: Hash + Eq>(
        &self,
        values: &[U],
        data_key: impl FnMut(&U) -> K,
        mut node_key: impl FnMut(N) -> K,
    ) -> Join<N, U> {
        let keys: Vec<K> = values.iter().map(data_key).collect();
        let index = key_index(&keys);
        let mut join = Join::default();
        for group in &self.groups {
            join.match_keyed(group, values, &keys, index.clone(), &mut node_key);
        }
        join.finish("keyed")
    }

    /// Positional join with per-group values forwarded from each group parent's value.
    ///
    /// Fails with [`JoinError::UnboundParent`] if a group's parent carries no value.
    pub fn data_with<U: Clone, I>(
        &self,
        mut forward: impl FnMut(&T) -> I,
    ) -> Result<Join<N, U>, JoinError>
    where
        I: IntoIterator<Item = U>,
    {
        let mut join = Join::default();
        for group in &self.groups {
            let parent_value = group
                .parent
                .value
                .as_ref()
                .ok_or(JoinError::UnboundParent)?;
            let values: Vec<U> = forward(parent_value).into_iter().collect();
            let (gi, matched) = join.match_positional(group, &values);
            let range = join.enter.extend_backing(values.into_iter().skip(matched));
            join.enter.push_span(gi, range);
        }
        Ok(join.finish("forwarded positional"))
    }

    /// Keyed join with per-group values forwarded from each group parent's value.
    ///
    /// Fails with [`JoinError::UnboundParent`] if a group's parent carries no value.
    pub fn data_with_by_key<U: Clone, K: Hash + Eq, I>(
        &self,
        mut forward: impl FnMut(&T) -> I,
        mut data_key: impl FnMut(&U) -> K,
        mut node_key: impl FnMut(N) -> K,
    ) -> Result<Join<N, U>, JoinError>
    where
        I: IntoIterator<Item = U>,
    {
        let mut join = Join::default();
        for group in &self.groups {
            let parent_value = group
                .parent
                .value
                .as_ref()
                .ok_or(JoinError::UnboundParent)?;
            let values: Vec<U> = forward(parent_value).into_iter().collect();
            let keys: Vec<K> = values.iter().map(&mut data_key).collect();
            join.match_keyed(group, &values, &keys, key_index(&keys), &mut node_key);
        }
        Ok(join.finish("forwarded keyed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestTree;
    use crate::value::ValueBox;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use rstest::rstest;

    /// One group under node 0 with children `1..=n`.
    fn one_group(n: u32) -> Selection<u32, ()> {
        let mut selection = Selection::new();
        let group = selection.group_add(ElementValue::unbound(0));
        for node in 1..=n {
            group.add_unbound(node);
        }
        selection
    }

    fn entered<U: Clone>(enter: &EnterView<U>) -> Vec<U> {
        enter.values().cloned().collect()
    }

    #[rstest]
    #[case(3, 1, 1, 0, 2)]
    #[case(0, 3, 0, 3, 0)]
    #[case(2, 2, 2, 0, 0)]
    #[case(2, 5, 2, 3, 0)]
    #[case(4, 0, 0, 0, 4)]
    fn positional_partition_sizes(
        #[case] children: u32,
        #[case] values: u32,
        #[case] update: usize,
        #[case] enter: usize,
        #[case] exit: usize,
    ) {
        let values: Vec<u32> = (100..100 + values).collect();
        let join = one_group(children).data(&values);
        assert_eq!(join.update.len(), update, "update");
        assert_eq!(join.enter.len(), enter, "enter");
        assert_eq!(join.exit.len(), exit, "exit");
    }

    #[test]
    fn positional_binds_by_index_and_splits_tails() {
        let join = one_group(2).data(&['a', 'b', 'c', 'd']);
        assert_eq!(
            join.update.groups()[0].elements(),
            &[ElementValue::bound(1, 'a'), ElementValue::bound(2, 'b')]
        );
        assert_eq!(entered(&join.enter), vec!['c', 'd']);

        let join = one_group(4).data(&['a']);
        assert_eq!(join.exit.nodes().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(join.exit.groups()[0].parent().node, 0);
    }

    #[test]
    fn update_keeps_one_group_per_input_group() {
        let mut selection: Selection<u32, ()> = Selection::new();
        selection.group_add(ElementValue::unbound(0)).add_unbound(1);
        selection.group_add(ElementValue::unbound(5));
        let join = selection.data(&["x"]);
        assert_eq!(join.update.groups().len(), 2);
        assert_eq!(join.update.groups()[1].parent().node, 5);
        assert!(join.update.groups()[1].is_empty());
    }

    #[test]
    fn positional_groups_partition_independently() {
        // Parent 10 has two children, parent 20 has none.
        let mut selection: Selection<u32, ()> = Selection::new();
        selection
            .group_add(ElementValue::unbound(10))
            .add_unbound(11)
            .add_unbound(12);
        selection.group_add(ElementValue::unbound(20));

        let join = selection.data(&['a', 'b', 'c']);
        assert_eq!(join.update.groups()[0].len(), 2);
        assert!(join.update.groups()[1].is_empty());
        let spans: Vec<(usize, &[char])> = join.enter.iter().collect();
        assert_eq!(spans, vec![(0, &['c'][..]), (1, &['a', 'b', 'c'][..])]);
        assert!(join.exit.is_empty());
    }

    #[test]
    fn keyed_match_ignores_order() {
        let labels = ["p1", "p2", "p3"];
        let join = one_group(3).data_by_key(
            &["p3", "p1", "p2"],
            |v| *v,
            |node| labels[node as usize - 1],
        );
        assert_eq!(
            join.update.groups()[0].elements(),
            &[
                ElementValue::bound(1, "p1"),
                ElementValue::bound(2, "p2"),
                ElementValue::bound(3, "p3"),
            ]
        );
        assert!(join.enter.is_empty());
        assert!(join.exit.is_empty());
    }

    #[test]
    fn keyed_splits_missing_and_new_keys() {
        let labels = ["einstein", "newton", "pithagoras", "poincare"];
        let join = one_group(4).data_by_key(
            &["einstein", "poincare", "feynman"],
            |v| *v,
            |node| labels[node as usize - 1],
        );
        assert_eq!(join.update.nodes().collect::<Vec<_>>(), vec![1, 4]);
        assert_eq!(join.update.groups()[0].elements()[1].value, Some("poincare"));
        assert_eq!(join.exit.nodes().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(entered(&join.enter), vec!["feynman"]);
    }

    #[test]
    fn keyed_leftovers_enter_in_value_order() {
        let join = one_group(0).data_by_key(&[5, 3, 9, 1, 7], |v| *v, |_| 0);
        assert_eq!(entered(&join.enter), vec![5, 3, 9, 1, 7]);
    }

    #[test]
    fn duplicate_value_keys_keep_the_later_value() {
        // Values are (key, payload).
        let values = [(1, "early"), (2, "other"), (1, "late")];

        // Matched: node 1 has key 1 and gets the later payload.
        let join = one_group(1).data_by_key(&values, |v| v.0, |_| 1);
        assert_eq!(join.update.groups()[0].elements()[0].value, Some((1, "late")));
        assert_eq!(entered(&join.enter), vec![(2, "other")]);

        // Unmatched: only the later duplicate enters.
        let join = one_group(0).data_by_key(&values, |v| v.0, |_| 0);
        assert_eq!(entered(&join.enter), vec![(2, "other"), (1, "late")]);
    }

    #[test]
    fn duplicate_node_keys_first_claims_the_value() {
        let join = one_group(2).data_by_key(&["k"], |v| *v, |_| "k");
        assert_eq!(join.update.nodes().collect::<Vec<_>>(), vec![1]);
        assert_eq!(join.exit.nodes().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn keyed_groups_see_all_values() {
        // Both parents already hold a child keyed "a".
        let mut selection: Selection<u32, ()> = Selection::new();
        selection.group_add(ElementValue::unbound(10)).add_unbound(11);
        selection.group_add(ElementValue::unbound(20)).add_unbound(21);

        let join = selection.data_by_key(&["a", "b"], |v| *v, |_| "a");
        assert_eq!(join.update.groups()[0].len(), 1);
        assert_eq!(join.update.groups()[1].len(), 1);
        let spans: Vec<(usize, &[&str])> = join.enter.iter().collect();
        assert_eq!(spans, vec![(0, &["b"][..]), (1, &["b"][..])]);
    }

    #[test]
    fn forwarding_uses_each_parents_value() {
        let mut lists: Selection<u32, Vec<&str>> = Selection::new();
        lists.group_add(ElementValue::bound(10, vec!["newton", "gauss"]));
        lists
            .group_add(ElementValue::bound(20, vec!["erdos"]))
            .add_unbound(21)
            .add_unbound(22);

        let join = lists.data_with(|names| names.clone()).unwrap();
        let spans: Vec<(usize, &[&str])> = join.enter.iter().collect();
        assert_eq!(spans, vec![(0, &["newton", "gauss"][..])]);
        assert_eq!(
            join.update.groups()[1].elements(),
            &[ElementValue::bound(21, "erdos")]
        );
        assert_eq!(join.exit.nodes().collect::<Vec<_>>(), vec![22]);
        assert_eq!(join.exit.groups()[0].parent().node, 20);
    }

    #[test]
    fn forwarding_keyed_matches_within_each_parent() {
        let labels = ["x", "gauss", "x", "erdos"];
        let mut lists: Selection<u32, Vec<&str>> = Selection::new();
        lists
            .group_add(ElementValue::bound(0, vec!["gauss", "poincare"]))
            .add_unbound(1)
            .add_unbound(2);
        lists
            .group_add(ElementValue::bound(3, vec!["gauss"]))
            .add_unbound(4);

        let join = lists
            .data_with_by_key(
                |names| names.clone(),
                |name| *name,
                |node| labels[node as usize - 1],
            )
            .unwrap();
        assert_eq!(join.update.groups()[0].nodes().collect::<Vec<_>>(), vec![2]);
        assert!(join.update.groups()[1].is_empty());
        assert_eq!(join.exit.nodes().collect::<Vec<_>>(), vec![1, 4]);
        let spans: Vec<(usize, &[&str])> = join.enter.iter().collect();
        assert_eq!(spans, vec![(0, &["poincare"][..]), (1, &["gauss"][..])]);
    }

    #[test]
    fn boxed_values_of_mixed_types_survive_a_join() {
        let mut tree = TestTree::new();
        let root = tree.root("root");
        let values = [ValueBox::new(5_i32), ValueBox::new(String::from("gauss"))];

        let mut join = Selection::<usize, ()>::from_root(root).data(&values);
        let created = join.enter_append(|parent, _| tree.append(parent, "item"));
        let types: Vec<&str> = created
            .iter()
            .filter_map(|ev| ev.value.as_ref())
            .map(ValueBox::type_name)
            .collect();
        assert_eq!(types, vec!["i32", "alloc::string::String"]);
        assert_eq!(tree.children(root).len(), 2);

        let first = created.iter().next().and_then(|ev| ev.value.as_ref());
        assert_eq!(first.map(|v| v.get::<i32>().copied()), Some(Ok(5)));
        assert!(matches!(
            join.update.call_as::<i32>(|_, _| {}),
            Err(JoinError::TypeMismatch { found: "alloc::string::String", .. })
        ));
    }

    #[test]
    fn forwarding_rejects_unbound_parents() {
        let selection: Selection<u32, Vec<u8>> = Selection::from_root(0);
        assert_eq!(
            selection.data_with(|v| v.clone()).unwrap_err(),
            JoinError::UnboundParent
        );
        assert_eq!(
            selection
                .data_with_by_key(|v| v.clone(), |x| *x, |_| 0)
                .unwrap_err(),
            JoinError::UnboundParent
        );
    }

    #[test]
    fn enter_then_exit_round_trip_on_a_tree() {
        let mut tree = TestTree::new();
        let root = tree.root("root");

        // No existing children: everything enters.
        let mut join = Selection::<usize, ()>::from_root(root).data(&["P1", "P2", "P3"]);
        assert!(join.update.is_empty());
        assert_eq!(join.enter.len(), 3);
        assert!(join.exit.is_empty());
        let created = join.enter_append(|parent, _| tree.append(parent, "point"));
        created.call(|node, label| tree.set_label(node, *label));
        assert_eq!(join.update.len(), 3, "entered nodes join the update selection");
        assert_eq!(
            tree.child_labels(root),
            vec![Some("P1"), Some("P2"), Some("P3")]
        );

        // Re-select the children and join by label.
        let mut existing = Selection::<usize, ()>::new();
        let group = existing.group_add(ElementValue::unbound(root));
        for &node in tree.children(root) {
            group.add_unbound(node);
        }
        let mut join = existing.data_by_key(
            &["P1", "P3", "P4"],
            |v| Some(String::from(*v)),
            |n| tree.label(n).map(String::from),
        );
        assert_eq!(join.update.len(), 2);
        assert_eq!(join.exit.len(), 1);
        assert_eq!(entered(&join.enter), vec!["P4"]);

        let mut detached = Vec::new();
        join.exit_remove(|n| {
            detached.push(n);
            tree.detach(n);
        });
        assert_eq!(detached.len(), 1);
        assert!(!tree.is_alive(detached[0]));
        assert_eq!(tree.child_labels(root), vec![Some("P1"), Some("P3")]);

        join.enter_append(|parent, label| {
            let node = tree.append(parent, "point");
            tree.set_label(node, *label);
            node
        });
        assert_eq!(
            tree.child_labels(root),
            vec![Some("P1"), Some("P3"), Some("P4")]
        );
        assert!(join.enter_append(|_, _| unreachable!()).is_empty());
    }
}
