// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: arena, structure edits, attributes, traversal.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::types::{Element, ElementId};

/// Arena-backed element tree.
///
/// Elements are created with [`Tree::insert`] (root or child) or [`Tree::append`] (child),
/// and detached with [`Tree::remove`]. Every accessor tolerates stale ids: lookups return
/// `None` or an empty slice, and edits on stale ids are ignored.
#[derive(Clone, Default)]
pub struct Tree {
    /// slots
    elements: Vec<Option<Element>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.elements.len();
        let alive = self.len();
        f.debug_struct("Tree")
            .field("elements_total", &total)
            .field("elements_alive", &alive)
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl Tree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new element as the last child of `parent` (or as a root if `None`).
    ///
    /// A stale `parent` is treated like `None`: the element becomes a root.
    pub fn insert(&mut self, parent: Option<ElementId>, tag: &str) -> ElementId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.elements[idx] = Some(Element::new(generation, tag));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.elements.push(Some(Element::new(generation, tag)));
            self.generations.push(generation);
            (self.elements.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ElementId uses 32-bit indices by design."
        )]
        let id = ElementId::new(idx as u32, generation);
        if let Some(p) = parent {
            debug_assert!(self.is_alive(p), "inserting under a stale parent {p:?}");
            self.link_parent(id, p);
        }
        id
    }

    /// Append a new child element with `tag` to `parent` and return its id.
    pub fn append(&mut self, parent: ElementId, tag: &str) -> ElementId {
        self.insert(Some(parent), tag)
    }

    /// Remove an element (and its subtree) from the tree.
    ///
    /// The element is unlinked from its parent, so later siblings shift down by one.
    pub fn remove(&mut self, id: ElementId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.parent_of(id) {
            self.unlink_parent(id, parent);
        }
        let mut stack = alloc::vec![id];
        while let Some(current) = stack.pop() {
            if let Some(element) = self.elements[current.idx()].take() {
                stack.extend(element.children);
                self.free_list.push(current.idx());
            }
        }
    }

    /// Returns `true` if `id` refers to a live element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.elements
            .get(id.idx())
            .and_then(|e| e.as_ref())
            .is_some_and(|e| e.generation == id.1)
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.elements.iter().filter(|e| e.is_some()).count()
    }

    /// Returns `true` if the tree holds no live elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Access a live element.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .filter(|e| e.generation == id.1)
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements
            .get_mut(id.idx())
            .and_then(|slot| slot.as_mut())
            .filter(|e| e.generation == id.1)
    }

    /// Returns the tag of a live element.
    pub fn tag(&self, id: ElementId) -> Option<&str> {
        self.get(id).map(Element::tag)
    }

    /// Returns the parent of an element if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).and_then(|e| e.parent)
    }

    /// Get the children of an element, or an empty slice if the element is stale.
    pub fn children_of(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map(Element::children).unwrap_or(&[])
    }

    /// Set an attribute on a live element, replacing any previous value.
    pub fn set_attr(&mut self, id: ElementId, key: &str, value: impl Into<String>) {
        if let Some(e) = self.get_mut(id) {
            e.attributes.insert(String::from(key), value.into());
        }
    }

    /// Look up an attribute of a live element.
    pub fn attr(&self, id: ElementId, key: &str) -> Option<&str> {
        self.get(id).and_then(|e| e.attr(key))
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attr(&mut self, id: ElementId, key: &str) -> Option<String> {
        self.get_mut(id).and_then(|e| e.attributes.remove(key))
    }

    /// Pre-order depth-first iterator over `root` and its descendants.
    pub fn depth_first(&self, root: ElementId) -> DepthFirst<'_> {
        let stack = if self.is_alive(root) {
            alloc::vec![root]
        } else {
            Vec::new()
        };
        DepthFirst { tree: self, stack }
    }

    /// Write an indented, XML-like outline of the subtree rooted at `root`.
    ///
    /// Elements without children are written self-closing; attributes appear in key order.
    pub fn write_outline(&self, root: ElementId, out: &mut impl fmt::Write) -> fmt::Result {
        self.write_outline_level(root, 0, out)
    }

    /// Render [`Tree::write_outline`] into a `String`.
    pub fn outline(&self, root: ElementId) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_outline(root, &mut out);
        out
    }

    fn write_outline_level(
        &self,
        id: ElementId,
        level: usize,
        out: &mut impl fmt::Write,
    ) -> fmt::Result {
        let Some(element) = self.get(id) else {
            return Ok(());
        };
        let indent = level * 4;
        write!(out, "{:indent$}<{}", "", element.tag)?;
        for (key, value) in element.attributes() {
            write!(out, " {key}=\"{value}\"")?;
        }
        if element.children.is_empty() {
            return writeln!(out, "/>");
        }
        writeln!(out, ">")?;
        for &child in &element.children {
            self.write_outline_level(child, level + 1, out)?;
        }
        writeln!(out, "{:indent$}</{}>", "", element.tag)
    }

    fn link_parent(&mut self, id: ElementId, parent: ElementId) {
        let Some(p) = self.get_mut(parent) else {
            return;
        };
        p.children.push(id);
        if let Some(e) = self.get_mut(id) {
            e.parent = Some(parent);
        }
    }

    fn unlink_parent(&mut self, id: ElementId, parent: ElementId) {
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(e) = self.get_mut(id) {
            e.parent = None;
        }
    }
}

/// Pre-order depth-first traversal returned by [`Tree::depth_first`].
#[derive(Clone, Debug)]
pub struct DepthFirst<'a> {
    tree: &'a Tree,
    stack: Vec<ElementId>,
}

impl Iterator for DepthFirst<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children_of(id).iter().rev().copied());
        Some(id)
    }
}
