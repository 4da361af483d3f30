// Copyright 2025 the Plansheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use plansheet_catalog::Revision;

/// What the user is looking at: a drawing, one of its disciplines, and one
/// of that discipline's revisions.
///
/// Each level only makes sense below the previous one, so choosing a level
/// clears the levels beneath it:
/// - [`select_drawing`](Self::select_drawing) clears discipline and revision.
/// - [`select_discipline`](Self::select_discipline) clears the revision.
/// - [`select_revision`](Self::select_revision) touches nothing else.
///
/// Keys are not validated against the catalog. A key that does not exist is
/// kept as-is and resolves to "nothing found" downstream.
///
/// A generation counter is bumped whenever the contents change; no-op calls
/// leave it untouched.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    drawing: Option<String>,
    discipline: Option<String>,
    revision: Option<Revision>,
    generation: u64,
}

/// A partial update applied in one step.
///
/// Unlike calling the `select_*` methods in sequence, a patch sets exactly the
/// fields it names and leaves every other field as it was.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionPatch {
    /// New drawing, if set.
    pub drawing: Option<Option<String>>,
    /// New discipline, if set.
    pub discipline: Option<Option<String>>,
    /// New revision, if set.
    pub revision: Option<Option<Revision>>,
}

impl SelectionPatch {
    /// An empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the drawing.
    #[must_use]
    pub fn drawing(mut self, id: Option<String>) -> Self {
        self.drawing = Some(id);
        self
    }

    /// Sets the discipline.
    #[must_use]
    pub fn discipline(mut self, key: Option<String>) -> Self {
        self.discipline = Some(key);
        self
    }

    /// Sets the revision.
    #[must_use]
    pub fn revision(mut self, revision: Option<Revision>) -> Self {
        self.revision = Some(revision);
        self
    }
}

impl Selection {
    /// Creates an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            drawing: None,
            discipline: None,
            revision: None,
            generation: 0,
        }
    }

    /// The selected drawing id.
    #[must_use]
    pub fn drawing_id(&self) -> Option<&str> {
        self.drawing.as_deref()
    }

    /// The selected discipline key.
    #[must_use]
    pub fn discipline_key(&self) -> Option<&str> {
        self.discipline.as_deref()
    }

    /// The selected revision.
    #[must_use]
    pub fn revision(&self) -> Option<&Revision> {
        self.revision.as_ref()
    }

    /// The change counter.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Selects a drawing (or nothing) and clears discipline and revision.
    pub fn select_drawing(&mut self, id: Option<String>) {
        self.apply(
            SelectionPatch::new()
                .drawing(id)
                .discipline(None)
                .revision(None),
        );
    }

    /// Selects a discipline (or none) and clears the revision.
    pub fn select_discipline(&mut self, key: Option<String>) {
        self.apply(SelectionPatch::new().discipline(key).revision(None));
    }

    /// Selects a revision (or none).
    pub fn select_revision(&mut self, revision: Option<Revision>) {
        self.apply(SelectionPatch::new().revision(revision));
    }

    /// Applies `patch` atomically.
    ///
    /// Returns `true` if anything changed.
    pub fn apply(&mut self, patch: SelectionPatch) -> bool {
        let mut changed = false;
        if let Some(drawing) = patch.drawing {
            changed |= replace(&mut self.drawing, drawing);
        }
        if let Some(discipline) = patch.discipline {
            changed |= replace(&mut self.discipline, discipline);
        }
        if let Some(revision) = patch.revision {
            changed |= replace(&mut self.revision, revision);
        }
        if changed {
            self.generation = self.generation.wrapping_add(1);
        }
        changed
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
