// Copyright 2025 the Plansheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{BezPath, Point, Rect, Shape};
use plansheet_catalog::{Catalog, Drawing, ViewerConfig};
use plansheet_state::{Selection, SelectionPatch, ViewController};
use tracing::debug;

use crate::stage::Stage;

/// A child drawing's clickable outline inside its parent's base image.
#[derive(Clone, Debug)]
pub struct RegionShape {
    /// The child drawing's id.
    pub drawing_id: String,
    /// The child drawing's name.
    pub name: String,
    /// Closed outline in base pixels.
    pub path: BezPath,
}

impl RegionShape {
    fn from_child(child: &Drawing) -> Option<Self> {
        let vertices = child.region_vertices()?;
        let mut path = BezPath::new();
        for (i, &[x, y]) in vertices.iter().enumerate() {
            if i == 0 {
                path.move_to((x, y));
            } else {
                path.line_to((x, y));
            }
        }
        path.close_path();
        Some(Self {
            drawing_id: child.id.clone(),
            name: child.name.clone(),
            path,
        })
    }

    /// The outline mapped into container pixels.
    #[must_use]
    pub fn view_path(&self, stage: &Stage) -> BezPath {
        let mut path = self.path.clone();
        path.apply_affine(stage.base_to_view());
        path
    }

    /// Bounding box in base pixels.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.path.bounding_box()
    }
}

/// Clickable regions of the drawing being viewed.
///
/// Regions are collected from the children of one drawing that declare a
/// non-empty position polygon, in child order. Where regions overlap, the
/// later one is on top.
#[derive(Clone, Debug, Default)]
pub struct RegionMap {
    shapes: Vec<RegionShape>,
}

impl RegionMap {
    /// Regions of the children of `parent_id`.
    #[must_use]
    pub fn for_drawing(catalog: &Catalog, parent_id: &str) -> Self {
        let shapes = catalog
            .children_of(parent_id)
            .into_iter()
            .filter_map(RegionShape::from_child)
            .collect();
        Self { shapes }
    }

    /// Regions for the current selection.
    ///
    /// Regions are only offered while the drawing's own base image is shown,
    /// so the map is empty when a discipline or revision is selected.
    #[must_use]
    pub fn for_selection(catalog: &Catalog, selection: &Selection) -> Self {
        match selection.drawing_id() {
            Some(id) if selection.discipline_key().is_none() && selection.revision().is_none() => {
                Self::for_drawing(catalog, id)
            }
            _ => Self::default(),
        }
    }

    /// Returns `true` if there is nothing to click.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shapes, bottom first.
    #[must_use]
    pub fn shapes(&self) -> &[RegionShape] {
        &self.shapes
    }

    /// The topmost region containing `pt`, in base pixels.
    #[must_use]
    pub fn hit_test_base(&self, pt: Point) -> Option<&RegionShape> {
        self.shapes.iter().rev().find(|s| s.path.contains(pt))
    }

    /// The topmost region under a container point.
    #[must_use]
    pub fn hit_test(&self, view_pt: Point, stage: &Stage) -> Option<&RegionShape> {
        self.hit_test_base(stage.view_to_base(view_pt))
    }
}

/// The selection change for a click on the region of `child_id`.
///
/// The child becomes the drawing, with the configured default discipline when
/// the child has it, else its first declared discipline, else none. The
/// revision is cleared. Returns `None` for an unknown child.
#[must_use]
pub fn region_click(catalog: &Catalog, child_id: &str, config: &ViewerConfig) -> Option<SelectionPatch> {
    let child = catalog.drawing(child_id)?;
    let discipline = if child.disciplines.contains_key(&config.default_discipline) {
        Some(config.default_discipline.clone())
    } else {
        child.disciplines.keys().next().cloned()
    };
    Some(
        SelectionPatch::new()
            .drawing(Some(child.id.clone()))
            .discipline(discipline)
            .revision(None),
    )
}

/// Hit-tests a container click against the view's regions and navigates into
/// the region under it.
///
/// Returns the id of the drawing navigated to.
pub fn click_view(view: &mut ViewController, view_pt: Point, stage: &Stage) -> Option<String> {
    let patch = {
        let catalog = view.catalog()?;
        let regions = RegionMap::for_selection(catalog, view.selection());
        let hit = regions.hit_test(view_pt, stage)?;
        debug!(child = %hit.drawing_id, "region clicked");
        region_click(catalog, &hit.drawing_id, view.config())?
    };
    let target = patch.drawing.clone().flatten();
    view.apply(patch);
    target
}

#[cfg(test)]
mod tests {
    use kurbo::Size;
    use plansheet_catalog::{Discipline, DrawingPosition, IndexMap, Metadata};

    use super::*;

    fn square(x: f64, y: f64, side: f64) -> Option<DrawingPosition> {
        Some(DrawingPosition {
            vertices: vec![[x, y], [x + side, y], [x + side, y + side], [x, y + side]],
            image_transform: None,
        })
    }

    fn child(id: &str, position: Option<DrawingPosition>, keys: &[&str]) -> Drawing {
        Drawing {
            id: id.into(),
            name: format!("{id} name"),
            parent: Some("00".into()),
            position,
            disciplines: keys
                .iter()
                .map(|k| ((*k).to_owned(), Discipline::default()))
                .collect(),
            ..Drawing::default()
        }
    }

    fn catalog() -> Catalog {
        let mut drawings = IndexMap::new();
        drawings.insert(
            "00".to_owned(),
            Drawing {
                id: "00".into(),
                image: "site.png".into(),
                ..Drawing::default()
            },
        );
        drawings.insert("01".to_owned(), child("01", square(0.0, 0.0, 100.0), &["구조", "건축"]));
        drawings.insert("02".to_owned(), child("02", square(50.0, 50.0, 100.0), &["설비", "구조"]));
        drawings.insert("03".to_owned(), child("03", Some(DrawingPosition::default()), &[]));
        drawings.insert("04".to_owned(), child("04", None, &[]));
        Catalog::new(Metadata {
            drawings,
            ..Metadata::default()
        })
    }

    #[test]
    fn only_children_with_polygons_are_clickable() {
        let map = RegionMap::for_drawing(&catalog(), "00");
        let ids: Vec<&str> = map.shapes().iter().map(|s| s.drawing_id.as_str()).collect();
        assert_eq!(ids, ["01", "02"]);
        assert!(RegionMap::for_drawing(&catalog(), "nope").is_empty());
    }

    #[test]
    fn overlap_prefers_the_later_region() {
        let map = RegionMap::for_drawing(&catalog(), "00");
        assert_eq!(map.hit_test_base(Point::new(75.0, 75.0)).unwrap().drawing_id, "02");
        assert_eq!(map.hit_test_base(Point::new(10.0, 10.0)).unwrap().drawing_id, "01");
        assert!(map.hit_test_base(Point::new(500.0, 10.0)).is_none());
    }

    #[test]
    fn view_points_are_mapped_through_the_stage() {
        let map = RegionMap::for_drawing(&catalog(), "00");
        let stage = Stage::fit(Size::new(400.0, 400.0), Size::new(200.0, 200.0)).unwrap();
        assert_eq!(map.hit_test(Point::new(10.0, 10.0), &stage).unwrap().drawing_id, "01");
        assert!(map.hit_test(Point::new(150.0, 150.0), &stage).is_none());
    }

    #[test]
    fn click_prefers_the_default_discipline() {
        let config = ViewerConfig::default();
        let patch = region_click(&catalog(), "01", &config).unwrap();
        assert_eq!(patch.drawing, Some(Some("01".into())));
        assert_eq!(patch.discipline, Some(Some("건축".into())));
        assert_eq!(patch.revision, Some(None));

        let patch = region_click(&catalog(), "02", &config).unwrap();
        assert_eq!(patch.discipline, Some(Some("설비".into())));

        let patch = region_click(&catalog(), "04", &config).unwrap();
        assert_eq!(patch.discipline, Some(None));
    }

    #[test]
    fn regions_hide_once_a_discipline_is_chosen() {
        let mut selection = Selection::new();
        selection.select_drawing(Some("00".into()));
        assert!(!RegionMap::for_selection(&catalog(), &selection).is_empty());
        selection.select_discipline(Some("구조".into()));
        assert!(RegionMap::for_selection(&catalog(), &selection).is_empty());
    }
}
