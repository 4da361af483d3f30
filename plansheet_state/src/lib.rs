// Copyright 2025 the Plansheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=plansheet_state --heading-base-level=0

//! Plansheet State: what the viewer is showing.
//!
//! Two small state structs and the controller that owns them:
//! - [`Selection`]: drawing, discipline, revision, with the rule that
//!   choosing a level clears every level below it.
//! - [`OverlayState`]: disciplines flagged for simultaneous display and the
//!   opacity shared by their layers.
//! - [`ViewController`]: the single owner of both, of the loaded catalog, and
//!   of the [`LoadStatus`]. It keeps selection and overlay consistent and is
//!   handed by reference to whatever renders the view.
//!
//! Every struct carries a generation counter that only moves when the
//! contents change, so derived geometry can be recomputed lazily.
//!
//! ## Minimal example
//!
//! ```rust
//! use plansheet_catalog::{Metadata, ViewerConfig};
//! use plansheet_load::{LoadTicket, StaticSource, fetch_metadata};
//! use plansheet_state::{LoadStatus, ViewController};
//!
//! let mut view = ViewController::new(ViewerConfig::default());
//! let ticket = view.begin_load();
//!
//! let source = StaticSource::new(r#"{"drawings": {
//!     "00": {"id": "00", "name": "Site", "image": "site.png", "parent": null}
//! }}"#);
//! if let Some(result) = pollster::block_on(fetch_metadata(&source, &ticket)) {
//!     view.finish_load(&ticket, result);
//! }
//! assert_eq!(view.status(), &LoadStatus::Ready);
//!
//! view.select_drawing(Some("00"));
//! assert_eq!(view.image_url().as_deref(), Some("/data/drawings/site.png"));
//! ```

mod controller;
mod overlay;
mod selection;

pub use controller::{LoadStatus, ViewController};
pub use overlay::{MAX_OPACITY, MIN_OPACITY, OPACITY_STEP, OverlayState};
pub use selection::{Selection, SelectionPatch};
