// Copyright 2025 the Plansheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Size;
use plansheet_catalog::{Catalog, Drawing, Transform, ViewerConfig};
use plansheet_state::{OverlayState, Selection, ViewController};
use tracing::debug;

use crate::placement::LayerPlacement;
use crate::stage::Stage;

/// One discipline image drawn over the base.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// Discipline key the layer shows.
    pub key: String,
    /// Image file.
    pub file: String,
    /// Access path of `file`.
    pub url: String,
    /// Opacity shared by every layer.
    pub opacity: f64,
    /// Position over the base image.
    pub placement: LayerPlacement,
}

/// Everything needed to draw an overlay view.
#[derive(Clone, Debug, PartialEq)]
pub struct Composition {
    /// The drawing's own image, which every layer is registered against.
    pub base_file: String,
    /// Access path of `base_file`.
    pub base_url: String,
    /// Layers in flagging order, bottom first.
    pub layers: Vec<Layer>,
    /// The fitted base.
    pub stage: Stage,
}

/// Builds the overlay view for the current selection.
///
/// Returns `None` unless two or more disciplines are flagged, a known drawing
/// with its own image is selected, and the base image has been measured
/// (`base_size`) and fits in `container`. Flagged keys the drawing does not
/// have are skipped.
#[must_use]
pub fn compose(
    catalog: &Catalog,
    selection: &Selection,
    overlay: &OverlayState,
    config: &ViewerConfig,
    base_size: Size,
    container: Size,
) -> Option<Composition> {
    if !overlay.is_compositing() {
        return None;
    }
    let drawing = catalog.drawing(selection.drawing_id()?)?;
    let base_file = drawing.image()?;
    let stage = Stage::fit(base_size, container)?;

    let layers = overlay
        .keys()
        .iter()
        .filter_map(|key| {
            let layer = layer_for(drawing, key, selection, base_file, base_size);
            if layer.is_none() {
                debug!(drawing = %drawing.id, key = %key, "flagged discipline has no layer");
            }
            layer
        })
        .map(|(key, file, placement)| Layer {
            url: config.image_url(file),
            file: file.to_owned(),
            key: key.to_owned(),
            opacity: overlay.opacity(),
            placement,
        })
        .collect();

    Some(Composition {
        base_file: base_file.to_owned(),
        base_url: config.image_url(base_file),
        layers,
        stage,
    })
}

/// [`compose`] over the state owned by `view`.
#[must_use]
pub fn compose_view(view: &ViewController, base_size: Size, container: Size) -> Option<Composition> {
    compose(
        view.catalog()?,
        view.selection(),
        view.overlay(),
        view.config(),
        base_size,
        container,
    )
}

fn layer_for<'a>(
    drawing: &'a Drawing,
    key: &'a str,
    selection: &'a Selection,
    base_file: &str,
    base_size: Size,
) -> Option<(&'a str, &'a str, LayerPlacement)> {
    let discipline = drawing.discipline(key)?;
    let revision = selection
        .revision()
        .filter(|_| selection.discipline_key() == Some(key));

    let file = revision
        .and_then(|r| r.image())
        .or_else(|| discipline.primary_image())
        .or_else(|| drawing.image())?;
    let transform: Option<&Transform> = revision
        .and_then(|r| r.image_transform.as_ref())
        .or_else(|| discipline.primary_transform());

    let placement = LayerPlacement::resolve(transform, base_file, base_size);
    if !placement.is_registered() {
        debug!(
            key = %key,
            base = %base_file,
            "registration names another base; stretching layer"
        );
    }
    Some((key, file, placement))
}
