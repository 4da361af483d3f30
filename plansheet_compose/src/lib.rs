// Copyright 2025 the Plansheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=plansheet_compose --heading-base-level=0

//! Plansheet Compose: geometry for drawing views.
//!
//! Pure derivations from the viewer state plus two measured sizes, the base
//! image's natural size and the display area, to what should be drawn where:
//! - [`Stage`]: the base fitted into its container, never enlarged.
//! - [`LayerPlacement`]: one overlay layer's position over the base, honoring
//!   or refusing its registration depending on the image it names.
//! - [`compose`]: the full overlay view, one [`Layer`] per flagged discipline.
//! - [`RegionMap`] and [`region_click`]: clickable child-drawing outlines on a
//!   parent image and the navigation a click triggers.
//!
//! Nothing here is cached. Call again whenever the selection, the overlay, or
//! either size changes; the generation counters on the state structs tell
//! when that happened.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use plansheet_catalog::{Catalog, Metadata, ViewerConfig};
//! use plansheet_compose::{RegionMap, Stage, region_click};
//! use plansheet_state::Selection;
//!
//! let doc = r#"{"drawings": {
//!     "00": {"id": "00", "name": "Site", "image": "site.png", "parent": null},
//!     "01": {"id": "01", "name": "Block A", "image": "a.png", "parent": "00",
//!            "position": {"vertices": [[0, 0], [100, 0], [100, 100], [0, 100]]},
//!            "disciplines": {"구조": {}, "건축": {}}}
//! }}"#;
//! let catalog = Catalog::new(serde_json::from_str::<Metadata>(doc).unwrap());
//!
//! let mut selection = Selection::new();
//! selection.select_drawing(Some("00".into()));
//!
//! let stage = Stage::fit(Size::new(1000.0, 1000.0), Size::new(500.0, 500.0)).unwrap();
//! let regions = RegionMap::for_selection(&catalog, &selection);
//! let hit = regions.hit_test(Point::new(20.0, 20.0), &stage).unwrap();
//!
//! let patch = region_click(&catalog, &hit.drawing_id, &ViewerConfig::default()).unwrap();
//! selection.apply(patch);
//! assert_eq!(selection.drawing_id(), Some("01"));
//! assert_eq!(selection.discipline_key(), Some("건축"));
//! ```

mod compose;
mod placement;
mod regions;
mod stage;

pub use compose::{Composition, Layer, compose, compose_view};
pub use placement::LayerPlacement;
pub use regions::{RegionMap, RegionShape, click_view, region_click};
pub use stage::Stage;
