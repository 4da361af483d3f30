// Copyright 2025 the Plansheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use hashbrown::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::collate::compare_ids;
use crate::model::{DisciplineInfo, Drawing, Metadata, ProjectMeta};

/// Upper bound on how far an ancestry walk climbs.
///
/// Parent chains are not validated when a document is loaded, so walks stop
/// after this many steps even if no revisit was detected.
pub const MAX_ANCESTRY_DEPTH: usize = 64;

/// A normalized metadata document.
///
/// Holds the drawings in declaration order, an id index over them, and the
/// list of roots (drawings without a parent). Building a catalog never fails:
/// documents are not validated here, and missing or dangling references only
/// show up later as empty lookups.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    project: ProjectMeta,
    disciplines: Vec<DisciplineInfo>,
    drawings: Vec<Drawing>,
    by_id: HashMap<String, usize>,
    roots: Vec<usize>,
}

impl Catalog {
    /// Normalizes a document.
    ///
    /// The drawing mapping's key is the canonical id. A record whose own `id`
    /// is blank or disagrees with its key takes the key.
    #[must_use]
    pub fn new(metadata: Metadata) -> Self {
        let Metadata {
            project,
            disciplines,
            drawings,
        } = metadata;

        let mut list = Vec::with_capacity(drawings.len());
        let mut by_id = HashMap::with_capacity(drawings.len());
        for (key, mut drawing) in drawings {
            if drawing.id != key {
                if !drawing.id.is_empty() {
                    warn!(key = %key, id = %drawing.id, "drawing id disagrees with its key, using the key");
                }
                drawing.id = key.clone();
            }
            by_id.insert(key, list.len());
            list.push(drawing);
        }

        let roots: Vec<usize> = list
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_root())
            .map(|(i, _)| i)
            .collect();

        for d in &list {
            match d.parent.as_deref() {
                Some(parent) if parent == d.id => {
                    warn!(id = %d.id, "drawing lists itself as its parent");
                }
                Some(parent) if !by_id.contains_key(parent) => {
                    warn!(id = %d.id, parent = %parent, "drawing refers to an unknown parent");
                }
                _ => {}
            }
        }

        debug!(
            drawings = list.len(),
            roots = roots.len(),
            "normalized metadata"
        );

        Self {
            project,
            disciplines,
            drawings: list,
            by_id,
            roots,
        }
    }

    /// Project display data.
    #[must_use]
    pub fn project(&self) -> &ProjectMeta {
        &self.project
    }

    /// The project's discipline catalogue.
    #[must_use]
    pub fn discipline_catalogue(&self) -> &[DisciplineInfo] {
        &self.disciplines
    }

    /// Number of drawings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.drawings.len()
    }

    /// Returns `true` if the document has no drawings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drawings.is_empty()
    }

    /// Looks up a drawing by id.
    #[must_use]
    pub fn drawing(&self, id: &str) -> Option<&Drawing> {
        self.by_id.get(id).map(|&i| &self.drawings[i])
    }

    /// Iterates all drawings in declaration order.
    pub fn drawings(&self) -> impl Iterator<Item = &Drawing> {
        self.drawings.iter()
    }

    /// Iterates root drawings.
    ///
    /// The order is declaration order, but callers that need a stable
    /// presentation order should sort with [`compare_ids`].
    pub fn roots(&self) -> impl Iterator<Item = &Drawing> {
        self.roots.iter().map(|&i| &self.drawings[i])
    }

    /// Returns the drawings whose parent is `parent_id`, ordered by id.
    ///
    /// An unknown `parent_id` yields an empty list. A drawing never appears
    /// among its own children, even if it names itself as its parent.
    #[must_use]
    pub fn children_of(&self, parent_id: &str) -> Vec<&Drawing> {
        let mut children: Vec<&Drawing> = self
            .drawings
            .iter()
            .filter(|d| d.parent.as_deref() == Some(parent_id) && d.id != parent_id)
            .collect();
        children.sort_by(|a, b| compare_ids(&a.id, &b.id));
        children
    }

    /// Returns `true` if any drawing names `parent_id` as its parent.
    #[must_use]
    pub fn has_children(&self, parent_id: &str) -> bool {
        self.drawings
            .iter()
            .any(|d| d.parent.as_deref() == Some(parent_id) && d.id != parent_id)
    }

    /// Returns the parent of `id`, if both exist.
    #[must_use]
    pub fn parent_of(&self, id: &str) -> Option<&Drawing> {
        let parent = self.drawing(id)?.parent.as_deref()?;
        if parent == id {
            return None;
        }
        self.drawing(parent)
    }

    /// Discipline keys of `drawing_id` in sidebar order; empty if unknown.
    #[must_use]
    pub fn discipline_keys(&self, drawing_id: &str) -> Vec<&str> {
        self.drawing(drawing_id)
            .map(Drawing::sorted_discipline_keys)
            .unwrap_or_default()
    }

    /// Returns the chain of ancestors of `id`, nearest first.
    ///
    /// The walk stops at a root, at an unknown parent, at the first revisited
    /// drawing, or after [`MAX_ANCESTRY_DEPTH`] steps.
    #[must_use]
    pub fn ancestors(&self, id: &str) -> Vec<&Drawing> {
        let mut chain = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(id);
        let mut current = id;
        while chain.len() < MAX_ANCESTRY_DEPTH {
            let Some(parent) = self.parent_of(current) else {
                break;
            };
            if !seen.insert(parent.id.as_str()) {
                warn!(id = %id, at = %parent.id, "cyclic parent chain");
                break;
            }
            chain.push(parent);
            current = &parent.id;
        }
        chain
    }
}

impl From<Metadata> for Catalog {
    fn from(metadata: Metadata) -> Self {
        Self::new(metadata)
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;

    fn drawing(id: &str, parent: Option<&str>) -> (String, Drawing) {
        (
            id.to_owned(),
            Drawing {
                id: id.to_owned(),
                name: format!("drawing {id}"),
                image: format!("{id}.png"),
                parent: parent.map(str::to_owned),
                ..Drawing::default()
            },
        )
    }

    fn catalog(entries: Vec<(String, Drawing)>) -> Catalog {
        Catalog::new(Metadata {
            drawings: entries.into_iter().collect::<IndexMap<_, _>>(),
            ..Metadata::default()
        })
    }

    #[test]
    fn roots_and_children() {
        let cat = catalog(vec![
            drawing("00", None),
            drawing("02", Some("00")),
            drawing("01", Some("00")),
            drawing("01-1", Some("01")),
        ]);
        let roots: Vec<_> = cat.roots().map(|d| d.id.as_str()).collect();
        assert_eq!(roots, ["00"]);
        let kids: Vec<_> = cat.children_of("00").iter().map(|d| d.id.as_str()).collect();
        assert_eq!(kids, ["01", "02"]);
        assert!(cat.children_of("nope").is_empty());
        assert!(cat.has_children("01"));
        assert!(!cat.has_children("02"));
    }

    #[test]
    fn blank_record_id_takes_key() {
        let mut entries = vec![drawing("00", None)];
        entries[0].1.id.clear();
        let cat = catalog(entries);
        assert_eq!(cat.drawing("00").map(|d| d.id.as_str()), Some("00"));
    }

    #[test]
    fn self_parent_is_not_its_own_child() {
        let cat = catalog(vec![drawing("00", None), drawing("x", Some("x"))]);
        assert!(cat.children_of("x").is_empty());
        assert!(cat.parent_of("x").is_none());
        assert!(cat.ancestors("x").is_empty());
    }

    #[test]
    fn ancestors_stop_on_cycles() {
        let cat = catalog(vec![
            drawing("a", Some("c")),
            drawing("b", Some("a")),
            drawing("c", Some("b")),
        ]);
        let chain: Vec<_> = cat.ancestors("a").iter().map(|d| d.id.as_str()).collect();
        assert_eq!(chain, ["c", "b"]);
    }

    #[test]
    fn ancestors_walk_to_root() {
        let cat = catalog(vec![
            drawing("00", None),
            drawing("01", Some("00")),
            drawing("01-1", Some("01")),
        ]);
        let chain: Vec<_> = cat.ancestors("01-1").iter().map(|d| d.id.as_str()).collect();
        assert_eq!(chain, ["01", "00"]);
        assert_eq!(cat.parent_of("01-1").map(|d| d.id.as_str()), Some("01"));
    }
}
