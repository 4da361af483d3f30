// Copyright 2025 the Plansheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::catalog::Catalog;
use crate::model::Revision;

/// Picks the single image that represents a selection.
///
/// Precedence:
/// 1. the selected revision's image, if it has one;
/// 2. for a selected discipline present on the drawing: its own image, else
///    its first declared revision's image, else the drawing's image;
/// 3. otherwise the drawing's image.
///
/// Returns `None` when no drawing is selected or the id is unknown, which the
/// viewer shows as a prompt to pick a drawing.
#[must_use]
pub fn resolve_image<'a>(
    catalog: &'a Catalog,
    drawing_id: Option<&str>,
    discipline_key: Option<&str>,
    revision: Option<&'a Revision>,
) -> Option<&'a str> {
    let drawing = catalog.drawing(drawing_id?)?;

    if let Some(image) = revision.and_then(Revision::image) {
        return Some(image);
    }

    if let Some(discipline) = discipline_key.and_then(|k| drawing.discipline(k))
        && let Some(image) = discipline.primary_image()
    {
        return Some(image);
    }

    drawing.image()
}
