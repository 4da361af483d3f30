// Copyright 2025 the Plansheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use serde::{Deserialize, Serialize};

/// Directory every image reference is resolved against.
pub const IMAGE_BASE: &str = "/data/drawings/";

/// Location of the metadata document.
pub const METADATA_URL: &str = "/data/metadata.json";

/// Discipline pre-selected when entering a drawing through one of its regions.
pub const DEFAULT_DISCIPLINE: &str = "건축";

/// Initial opacity of overlay layers.
pub const DEFAULT_OPACITY: f64 = 0.6;

/// Viewer settings.
///
/// Every field has a default, so a settings file only needs to name what it
/// changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    /// Where the metadata document is fetched from.
    pub metadata_url: String,
    /// Prefix turning an image reference into an access path.
    pub image_base: String,
    /// Discipline preferred when following a region into a child drawing.
    pub default_discipline: String,
    /// Initial overlay opacity.
    pub default_opacity: f64,
    /// Tree nodes expanded when the view opens.
    pub initially_expanded: Vec<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            metadata_url: METADATA_URL.to_owned(),
            image_base: IMAGE_BASE.to_owned(),
            default_discipline: DEFAULT_DISCIPLINE.to_owned(),
            default_opacity: DEFAULT_OPACITY,
            initially_expanded: vec!["00".to_owned()],
        }
    }
}

impl ViewerConfig {
    /// Resolves an image reference into an access path.
    #[must_use]
    pub fn image_url(&self, file: &str) -> String {
        join_base(&self.image_base, file)
    }
}

/// Resolves an image reference against [`IMAGE_BASE`].
#[must_use]
pub fn image_url(file: &str) -> String {
    join_base(IMAGE_BASE, file)
}

fn join_base(base: &str, file: &str) -> String {
    let file = file.trim_start_matches('/');
    if base.is_empty() || base.ends_with('/') {
        format!("{base}{file}")
    } else {
        format!("{base}/{file}")
    }
}
