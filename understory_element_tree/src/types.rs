// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the element tree: identifiers and element records.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// Identifier for an element in the tree (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A single element: tag, structure links, and attributes.
#[derive(Clone, Debug)]
pub struct Element {
    pub(crate) generation: u32,
    pub(crate) tag: String,
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
    pub(crate) attributes: BTreeMap<String, String>,
}

impl Element {
    pub(crate) fn new(generation: u32, tag: &str) -> Self {
        Self {
            generation,
            tag: String::from(tag),
            parent: None,
            children: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Element tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Parent element, or `None` for roots.
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// Children in document order.
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// Look up an attribute value.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Iterate attributes in key order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
