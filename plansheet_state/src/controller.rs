// Copyright 2025 the Plansheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use plansheet_catalog::{
    Catalog, Discipline, Drawing, Metadata, Revision, RevisionEntry, Step, StepTargets,
    TreeOutline, ViewerConfig, flatten_revisions, resolve_image,
};
use plansheet_load::{LoadError, LoadTicket};
use tracing::debug;

use crate::overlay::OverlayState;
use crate::selection::{Selection, SelectionPatch};

/// Where the one-shot metadata load stands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadStatus {
    /// Waiting for the document.
    Loading,
    /// The catalog is available.
    Ready,
    /// The load failed; the message is shown instead of the view.
    Failed(String),
}

/// Owns everything a drawing view mutates.
///
/// The controller is the only place selection and overlay state change, and
/// it keeps the two consistent:
/// - changing the drawing clears the overlay keys;
/// - choosing a discipline through navigation flags exactly that discipline.
///
/// All methods are synchronous. The metadata load is the one asynchronous
/// step; it is bracketed by [`begin_load`](Self::begin_load) and
/// [`finish_load`](Self::finish_load).
#[derive(Debug)]
pub struct ViewController {
    config: ViewerConfig,
    status: LoadStatus,
    catalog: Option<Catalog>,
    selection: Selection,
    overlay: OverlayState,
    outline: TreeOutline,
    pending: Option<LoadTicket>,
    next_ticket: u64,
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl ViewController {
    /// Creates a controller waiting for its metadata.
    #[must_use]
    pub fn new(config: ViewerConfig) -> Self {
        let overlay = OverlayState::new(config.default_opacity);
        let outline = TreeOutline::new(config.initially_expanded.iter().cloned());
        Self {
            config,
            status: LoadStatus::Loading,
            catalog: None,
            selection: Selection::new(),
            overlay,
            outline,
            pending: None,
            next_ticket: 0,
        }
    }

    /// Creates a controller over an already loaded document.
    #[must_use]
    pub fn with_catalog(config: ViewerConfig, catalog: Catalog) -> Self {
        let mut controller = Self::new(config);
        controller.catalog = Some(catalog);
        controller.status = LoadStatus::Ready;
        controller
    }

    /// Viewer settings.
    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Load status.
    #[must_use]
    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// The loaded catalog.
    #[must_use]
    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Current overlay state.
    #[must_use]
    pub fn overlay(&self) -> &OverlayState {
        &self.overlay
    }

    /// Tree expansion state.
    #[must_use]
    pub fn outline(&self) -> &TreeOutline {
        &self.outline
    }

    /// Starts a load and returns its ticket.
    ///
    /// Any earlier outstanding load is cancelled.
    pub fn begin_load(&mut self) -> LoadTicket {
        if let Some(previous) = self.pending.take() {
            previous.cancel();
        }
        self.next_ticket += 1;
        let ticket = LoadTicket::new(self.next_ticket);
        self.pending = Some(ticket.clone());
        self.status = LoadStatus::Loading;
        ticket
    }

    /// Applies the outcome of the load identified by `ticket`.
    ///
    /// Results for cancelled or superseded tickets are discarded. Returns
    /// whether the result was applied.
    pub fn finish_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<Metadata, LoadError>,
    ) -> bool {
        let current = self
            .pending
            .as_ref()
            .is_some_and(|p| p.id() == ticket.id() && !p.is_cancelled());
        if !current || ticket.is_cancelled() {
            debug!(ticket = ticket.id(), "ignoring result of a stale load");
            return false;
        }
        self.pending = None;
        match result {
            Ok(metadata) => {
                self.catalog = Some(Catalog::new(metadata));
                self.status = LoadStatus::Ready;
            }
            Err(error) => {
                self.catalog = None;
                self.status = LoadStatus::Failed(error.to_string());
            }
        }
        true
    }

    /// Cancels an outstanding load; called when the view goes away.
    pub fn teardown(&mut self) {
        if let Some(ticket) = self.pending.take() {
            debug!(ticket = ticket.id(), "view torn down during load");
            ticket.cancel();
        }
    }

    /// Selects a drawing (or nothing), clearing discipline and revision.
    pub fn select_drawing(&mut self, id: Option<&str>) {
        self.transition(|s| s.select_drawing(id.map(str::to_owned)));
    }

    /// Selects a discipline of the current drawing, clearing the revision.
    pub fn select_discipline(&mut self, key: Option<&str>) {
        self.transition(|s| s.select_discipline(key.map(str::to_owned)));
    }

    /// Selects a revision; drawing and discipline stay as they are.
    pub fn select_revision(&mut self, revision: Option<Revision>) {
        self.transition(|s| s.select_revision(revision));
    }

    /// Applies a compound selection change in one step.
    pub fn apply(&mut self, patch: SelectionPatch) {
        self.transition(|s| {
            s.apply(patch);
        });
    }

    /// Selects the parent of the current drawing.
    ///
    /// Returns `false` at a root or when nothing is selected.
    pub fn go_to_parent(&mut self) -> bool {
        let Some(parent) = self
            .catalog
            .as_ref()
            .zip(self.selection.drawing_id())
            .and_then(|(catalog, id)| catalog.parent_of(id))
            .map(|p| p.id.clone())
        else {
            return false;
        };
        self.select_drawing(Some(&parent));
        true
    }

    /// Flags or unflags a discipline for overlay display.
    ///
    /// Keys the selected drawing does not have are never flagged.
    pub fn toggle_overlay(&mut self, key: &str) {
        let known = self
            .selected_drawing()
            .is_some_and(|d| d.disciplines.contains_key(key));
        if !known && !self.overlay.contains(key) {
            debug!(key = %key, "ignoring overlay toggle for a discipline the drawing lacks");
            return;
        }
        self.overlay.toggle(key);
    }

    /// Sets the overlay layer opacity.
    pub fn set_overlay_opacity(&mut self, opacity: f64) {
        self.overlay.set_opacity(opacity);
    }

    /// Moves the overlay opacity by whole slider steps.
    pub fn nudge_overlay_opacity(&mut self, steps: i32) {
        self.overlay.nudge_opacity(steps);
    }

    /// Expands or collapses a tree node.
    pub fn toggle_expanded(&mut self, id: &str) -> bool {
        match &self.catalog {
            Some(catalog) => self.outline.toggle(catalog, id),
            None => false,
        }
    }

    /// The selected drawing, if it exists.
    #[must_use]
    pub fn selected_drawing(&self) -> Option<&Drawing> {
        self.catalog.as_ref()?.drawing(self.selection.drawing_id()?)
    }

    /// The selected discipline, if it exists on the selected drawing.
    #[must_use]
    pub fn selected_discipline(&self) -> Option<&Discipline> {
        self.selected_drawing()?
            .discipline(self.selection.discipline_key()?)
    }

    /// Whether the overlay controls apply to the selected drawing.
    #[must_use]
    pub fn overlay_controls_visible(&self) -> bool {
        self.selected_drawing()
            .is_some_and(OverlayState::controls_visible)
    }

    /// Flattened revisions of the selected discipline.
    #[must_use]
    pub fn revisions(&self) -> Vec<RevisionEntry<'_>> {
        self.selected_discipline()
            .map(flatten_revisions)
            .unwrap_or_default()
    }

    /// Where previous/next would go from the selected revision.
    #[must_use]
    pub fn step_targets(&self) -> StepTargets {
        StepTargets::new(&self.revisions(), self.selection.revision())
    }

    /// Steps to the previous or next revision.
    ///
    /// Returns `false` when that direction is disabled.
    pub fn step_revision(&mut self, step: Step) -> bool {
        let target = {
            let entries = self.revisions();
            StepTargets::new(&entries, self.selection.revision())
                .target(step)
                .and_then(|i| entries.get(i))
                .map(|e| e.revision.clone())
        };
        match target {
            Some(revision) => {
                self.select_revision(Some(revision));
                true
            }
            None => false,
        }
    }

    /// The image file representing the selection.
    #[must_use]
    pub fn image_file(&self) -> Option<&str> {
        resolve_image(
            self.catalog.as_ref()?,
            self.selection.drawing_id(),
            self.selection.discipline_key(),
            self.selection.revision(),
        )
    }

    /// The access path of [`image_file`](Self::image_file).
    #[must_use]
    pub fn image_url(&self) -> Option<String> {
        self.image_file().map(|f| self.config.image_url(f))
    }

    fn transition(&mut self, change: impl FnOnce(&mut Selection)) {
        let before_drawing = self.selection.drawing_id().map(str::to_owned);
        let before_discipline = self.selection.discipline_key().map(str::to_owned);
        change(&mut self.selection);

        let drawing_changed = before_drawing.as_deref() != self.selection.drawing_id();
        let discipline_changed = before_discipline.as_deref() != self.selection.discipline_key();
        if drawing_changed {
            self.overlay.clear();
        }
        if (drawing_changed || discipline_changed) && self.selection.drawing_id().is_some() {
            self.overlay.replace_with(self.selection.discipline_key());
        }
        if drawing_changed {
            debug!(
                drawing = ?self.selection.drawing_id(),
                discipline = ?self.selection.discipline_key(),
                "selection moved"
            );
        }
    }
}
