// Copyright 2025 the Plansheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use plansheet_catalog::{DEFAULT_OPACITY, Drawing};

/// Lowest opacity an overlay layer may have.
pub const MIN_OPACITY: f64 = 0.2;
/// Highest opacity an overlay layer may have.
pub const MAX_OPACITY: f64 = 1.0;
/// Granularity of the opacity control.
pub const OPACITY_STEP: f64 = 0.1;

/// Disciplines flagged for simultaneous display, plus the opacity shared by
/// every layer drawn over the base image.
///
/// Keys are kept in the order they were flagged and are unique. Overlay
/// compositing is only active with two or more keys; a single key is the
/// normal single-image view.
#[derive(Clone, Debug)]
pub struct OverlayState {
    keys: Vec<String>,
    opacity: f64,
    generation: u64,
}

impl Default for OverlayState {
    fn default() -> Self {
        Self::new(DEFAULT_OPACITY)
    }
}

impl OverlayState {
    /// Creates an empty overlay with the given opacity (clamped).
    #[must_use]
    pub fn new(opacity: f64) -> Self {
        Self {
            keys: Vec::new(),
            opacity: clamp_opacity(opacity).unwrap_or(DEFAULT_OPACITY),
            generation: 0,
        }
    }

    /// Flagged discipline keys in flagging order.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Returns `true` if `key` is flagged.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Returns `true` when at least two disciplines are flagged.
    #[must_use]
    pub fn is_compositing(&self) -> bool {
        self.keys.len() >= 2
    }

    /// Returns `true` when `drawing` offers anything to overlay, that is two
    /// or more disciplines.
    #[must_use]
    pub fn controls_visible(drawing: &Drawing) -> bool {
        drawing.disciplines.len() >= 2
    }

    /// Layer opacity.
    #[must_use]
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Layer opacity as a rounded percentage.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "opacity is clamped to 0.2..=1.0"
    )]
    pub fn opacity_percent(&self) -> u32 {
        (self.opacity * 100.0).round() as u32
    }

    /// The change counter.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Flags `key` if it is not flagged, unflags it otherwise.
    pub fn toggle(&mut self, key: &str) {
        if let Some(idx) = self.keys.iter().position(|k| k == key) {
            self.keys.remove(idx);
        } else {
            self.keys.push(key.to_owned());
        }
        self.bump();
    }

    /// Replaces the flagged keys, dropping duplicates.
    pub fn replace_with<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next: Vec<String> = Vec::new();
        for key in keys {
            let key = key.into();
            if !next.contains(&key) {
                next.push(key);
            }
        }
        if next != self.keys {
            self.keys = next;
            self.bump();
        }
    }

    /// Unflags every key.
    pub fn clear(&mut self) {
        if !self.keys.is_empty() {
            self.keys.clear();
            self.bump();
        }
    }

    /// Sets the opacity, clamped to [`MIN_OPACITY`]..=[`MAX_OPACITY`].
    ///
    /// Non-finite values are ignored.
    pub fn set_opacity(&mut self, opacity: f64) {
        if let Some(opacity) = clamp_opacity(opacity)
            && opacity != self.opacity
        {
            self.opacity = opacity;
            self.bump();
        }
    }

    /// Moves the opacity by whole [`OPACITY_STEP`]s, as a slider would.
    pub fn nudge_opacity(&mut self, steps: i32) {
        let snapped = ((self.opacity + f64::from(steps) * OPACITY_STEP) / OPACITY_STEP).round();
        self.set_opacity(snapped * OPACITY_STEP);
    }

    fn bump(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

fn clamp_opacity(value: f64) -> Option<f64> {
    value
        .is_finite()
        .then(|| value.clamp(MIN_OPACITY, MAX_OPACITY))
}
