// Copyright 2025 the Plansheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expand/collapse bookkeeping for the drawing tree.

use hashbrown::HashSet;

use crate::catalog::{Catalog, MAX_ANCESTRY_DEPTH};
use crate::collate::compare_ids;
use crate::model::Drawing;

/// One visible line of the drawing tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeRow<'a> {
    /// The drawing on this row.
    pub drawing: &'a Drawing,
    /// Nesting depth; roots are at `0`.
    pub depth: usize,
    /// Whether the drawing has children.
    pub has_children: bool,
    /// Whether the children are shown.
    pub expanded: bool,
}

/// The set of expanded tree nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeOutline {
    expanded: HashSet<String>,
}

impl TreeOutline {
    /// Creates an outline with the given nodes expanded.
    #[must_use]
    pub fn new<I, S>(expanded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            expanded: expanded.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if `id` is expanded.
    #[must_use]
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Flips the expansion of `id`.
    ///
    /// Leaves without children cannot be expanded; returns whether anything
    /// changed.
    pub fn toggle(&mut self, catalog: &Catalog, id: &str) -> bool {
        if !catalog.has_children(id) {
            return false;
        }
        if !self.expanded.remove(id) {
            self.expanded.insert(id.to_owned());
        }
        true
    }

    /// Expands every ancestor of `id` so that it becomes visible.
    pub fn reveal(&mut self, catalog: &Catalog, id: &str) {
        for ancestor in catalog.ancestors(id) {
            self.expanded.insert(ancestor.id.clone());
        }
    }

    /// Lists the rows currently visible, depth first.
    ///
    /// Roots are ordered by id like every other sibling list. A drawing that
    /// is reachable twice through a malformed parent chain is listed once.
    #[must_use]
    pub fn visible_rows<'a>(&self, catalog: &'a Catalog) -> Vec<TreeRow<'a>> {
        let mut roots: Vec<&Drawing> = catalog.roots().collect();
        roots.sort_by(|a, b| compare_ids(&a.id, &b.id));

        let mut rows = Vec::new();
        let mut seen = HashSet::new();
        for root in roots {
            self.push_rows(catalog, root, 0, &mut seen, &mut rows);
        }
        rows
    }

    fn push_rows<'a>(
        &self,
        catalog: &'a Catalog,
        drawing: &'a Drawing,
        depth: usize,
        seen: &mut HashSet<&'a str>,
        rows: &mut Vec<TreeRow<'a>>,
    ) {
        if depth > MAX_ANCESTRY_DEPTH || !seen.insert(drawing.id.as_str()) {
            return;
        }
        let children = catalog.children_of(&drawing.id);
        let expanded = self.is_expanded(&drawing.id);
        rows.push(TreeRow {
            drawing,
            depth,
            has_children: !children.is_empty(),
            expanded,
        });
        if expanded {
            for child in children {
                self.push_rows(catalog, child, depth + 1, seen, rows);
            }
        }
    }
}
