// Copyright 2025 the Plansheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=plansheet_catalog --heading-base-level=0

//! Plansheet Catalog: the drawing-set metadata model.
//!
//! A project is a hierarchy of drawings. Each drawing may be split into
//! disciplines (architectural, structural, ...), and each discipline carries
//! dated revisions, either directly or inside named regions. Every revision
//! names one image.
//!
//! This crate turns the raw metadata document into navigable structures and
//! answers the read-only questions a viewer asks of it:
//! - [`Catalog`]: id lookup, root drawings, children in Korean id order,
//!   parent/ancestor walks that tolerate cyclic data.
//! - [`flatten_revisions`] and [`StepTargets`]: one chronological revision
//!   list per discipline and previous/next stepping through it.
//! - [`resolve_image`]: the single image that represents a selection.
//! - [`TreeOutline`]: expand/collapse state and visible rows of the tree.
//!
//! It holds no selection state and does no I/O.
//!
//! ## Minimal example
//!
//! ```rust
//! use plansheet_catalog::{Catalog, Metadata, image_url, resolve_image};
//!
//! let doc = r#"{
//!     "project": {"name": "Tower", "unit": "mm"},
//!     "drawings": {
//!         "00": {"id": "00", "name": "Site", "image": "site.png", "parent": null},
//!         "01": {"id": "01", "name": "Block A", "image": "a.png", "parent": "00",
//!                "disciplines": {"구조": {"revisions": [{"version": "REV1", "image": "a-s1.png"}]}}}
//!     }
//! }"#;
//! let metadata: Metadata = serde_json::from_str(doc).unwrap();
//! let catalog = Catalog::new(metadata);
//!
//! assert_eq!(catalog.roots().count(), 1);
//! assert_eq!(catalog.children_of("00")[0].id, "01");
//!
//! let image = resolve_image(&catalog, Some("01"), Some("구조"), None).unwrap();
//! assert_eq!(image_url(image), "/data/drawings/a-s1.png");
//! ```
//!
//! ## Missing references
//!
//! Nothing in this crate treats a dangling id as an error. Unknown drawings,
//! disciplines, or revisions resolve to `None` or to empty lists, and
//! malformed numbers in transforms fall back to identity values.

mod catalog;
mod collate;
mod config;
mod image;
mod model;
mod outline;
mod revisions;

pub use catalog::{Catalog, MAX_ANCESTRY_DEPTH};
pub use collate::compare_ids;
pub use config::{
    DEFAULT_DISCIPLINE, DEFAULT_OPACITY, IMAGE_BASE, METADATA_URL, ViewerConfig, image_url,
};
pub use image::resolve_image;
pub use indexmap::IndexMap;
pub use model::{
    Discipline, DisciplineInfo, Drawing, DrawingPosition, Metadata, Polygon, PolygonTransform,
    ProjectMeta, Region, Revision, Transform, file_name,
};
pub use outline::{TreeOutline, TreeRow};
pub use revisions::{RevisionEntry, Step, StepTargets, flatten_revisions, position_of};
