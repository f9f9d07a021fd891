// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Enter view: values that found no existing node.
//!
//! Leftover values live in one backing list. Each group with leftovers owns a span of it.
//! Positional joins over a shared value list point every group's span into the same copy of
//! that list (at a group-specific offset). Keyed and forwarding joins append each group's own
//! leftovers. Either way, consumers only see "group `g` has these values to enter".

use alloc::vec::Vec;
use core::ops::Range;

use crate::selection::Selection;
use crate::types::ElementValue;

#[derive(Clone, Debug, PartialEq, Eq)]
struct EnterSpan {
    /// Index of the owning group in the update selection.
    group: usize,
    range: Range<usize>,
}

/// Values from a join that need new nodes, grouped by the update group they belong to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnterView<U> {
    values: Vec<U>,
    spans: Vec<EnterSpan>,
}

impl<U> Default for EnterView<U> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            spans: Vec::new(),
        }
    }
}

impl<U> EnterView<U> {
    /// Append `values` to the backing list and return where they landed.
    pub(crate) fn extend_backing(&mut self, values: impl IntoIterator<Item = U>) -> Range<usize> {
        let start = self.values.len();
        self.values.extend(values);
        start..self.values.len()
    }

    /// Record that update group `group` enters the backing values in `range`.
    pub(crate) fn push_span(&mut self, group: usize, range: Range<usize>) {
        debug_assert!(range.end <= self.values.len(), "span outside backing list");
        if !range.is_empty() {
            self.spans.push(EnterSpan { group, range });
        }
    }

    /// Total number of values waiting to be entered.
    pub fn len(&self) -> usize {
        self.spans.iter().map(|s| s.range.len()).sum()
    }

    /// Returns `true` if nothing needs entering.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// `(update group index, leftover values)` for every group with leftovers, in group order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[U])> + '_ {
        self.spans
            .iter()
            .map(|span| (span.group, &self.values[span.range.clone()]))
    }

    /// Every leftover value, in group order then value order.
    pub fn values(&self) -> impl Iterator<Item = &U> + '_ {
        self.iter().flat_map(|(_, values)| values)
    }
}

impl<U: Clone> EnterView<U> {
    /// Create a node for every leftover value and bind it.
    ///
    /// For each group with leftovers, `create(parent, value)` runs once per value, in value
    /// order, and returns the new node. Each new pair is added to the returned selection (one
    /// group per entered parent) and also appended to the originating group of `update`, so
    /// the update selection covers matched and entered nodes alike.
    ///
    /// `update` must be the update selection produced by the same join; spans naming a group
    /// it does not have are skipped. The view is consumed, so values cannot be entered twice.
    pub fn append<N: Copy>(
        self,
        update: &mut Selection<N, U>,
        mut create: impl FnMut(N, &U) -> N,
    ) -> Selection<N, U> {
        let mut entered = Selection::new();
        let mut created = 0_usize;
        for span in &self.spans {
            debug_assert!(
                span.group < update.groups.len(),
                "enter span names missing group {}",
                span.group
            );
            let Some(origin) = update.groups.get_mut(span.group) else {
                continue;
            };
            let parent = origin.parent.node;
            let group = entered.group_add(ElementValue {
                node: parent,
                value: origin.parent.value.clone(),
            });
            for value in &self.values[span.range.clone()] {
                let node = create(parent, value);
                group.add(node, value.clone());
                origin.add(node, value.clone());
                created += 1;
            }
        }
        tracing::debug!(groups = self.spans.len(), created, "enter append");
        entered
    }
}
