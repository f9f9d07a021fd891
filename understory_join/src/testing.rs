// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal tree used by the unit tests.

use alloc::string::String;
use alloc::vec::Vec;

use crate::traverse::ChildLookup;

#[derive(Debug)]
struct TestNode {
    tag: &'static str,
    label: Option<String>,
    parent: Option<usize>,
    children: Vec<usize>,
    alive: bool,
}

/// Index-addressed tree; removed nodes stay in the arena but are unlinked.
#[derive(Debug, Default)]
pub(crate) struct TestTree {
    nodes: Vec<TestNode>,
}

impl TestTree {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn root(&mut self, tag: &'static str) -> usize {
        self.push(None, tag)
    }

    pub(crate) fn append(&mut self, parent: usize, tag: &'static str) -> usize {
        let id = self.push(Some(parent), tag);
        self.nodes[parent].children.push(id);
        id
    }

    fn push(&mut self, parent: Option<usize>, tag: &'static str) -> usize {
        self.nodes.push(TestNode {
            tag,
            label: None,
            parent,
            children: Vec::new(),
            alive: true,
        });
        self.nodes.len() - 1
    }

    pub(crate) fn tag(&self, node: usize) -> &'static str {
        self.nodes[node].tag
    }

    pub(crate) fn set_label(&mut self, node: usize, label: impl Into<String>) {
        self.nodes[node].label = Some(label.into());
    }

    pub(crate) fn label(&self, node: usize) -> Option<&str> {
        self.nodes[node].label.as_deref()
    }

    pub(crate) fn detach(&mut self, node: usize) {
        if let Some(parent) = self.nodes[node].parent.take() {
            self.nodes[parent].children.retain(|&c| c != node);
        }
        self.nodes[node].alive = false;
    }

    pub(crate) fn is_alive(&self, node: usize) -> bool {
        self.nodes[node].alive
    }

    pub(crate) fn children(&self, node: usize) -> &[usize] {
        &self.nodes[node].children
    }

    /// Labels of the children of `node`, in order.
    pub(crate) fn child_labels(&self, node: usize) -> Vec<Option<&str>> {
        self.children(node).iter().map(|&c| self.label(c)).collect()
    }
}

impl ChildLookup<usize> for TestTree {
    fn children_of(&self, node: &usize) -> impl Iterator<Item = usize> {
        self.nodes[*node].children.iter().copied()
    }
}
