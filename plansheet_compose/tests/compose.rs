// Copyright 2025 the Plansheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `plansheet_compose` crate against the sample document.

use kurbo::{Affine, Point, Rect, Size};
use plansheet_catalog::{Catalog, Metadata, ViewerConfig};
use plansheet_compose::{LayerPlacement, RegionMap, Stage, click_view, compose_view};
use plansheet_state::ViewController;
use proptest::prelude::*;

const SAMPLE: &str = include_str!("../../data/metadata.json");

fn sample() -> ViewController {
    let metadata: Metadata = serde_json::from_str(SAMPLE).unwrap();
    ViewController::with_catalog(ViewerConfig::default(), Catalog::new(metadata))
}

const BASE: Size = Size::new(1200.0, 800.0);
const CONTAINER: Size = Size::new(600.0, 600.0);

#[test]
fn overlay_of_the_sample_drawing() {
    let mut view = sample();
    view.select_drawing(Some("01"));
    view.select_discipline(Some("구조"));
    assert!(compose_view(&view, BASE, CONTAINER).is_none());

    view.toggle_overlay("설비");
    view.toggle_overlay("건축");
    let out = compose_view(&view, BASE, CONTAINER).unwrap();

    assert_eq!(out.base_file, "01_base.png");
    assert_eq!(out.stage.scale(), 0.5);
    let files: Vec<&str> = out.layers.iter().map(|l| l.file.as_str()).collect();
    assert_eq!(files, ["01_s_r2.png", "01_m.png", "01_a.png"]);

    // First revision's own registration.
    assert_eq!(
        out.layers[0].placement,
        LayerPlacement::Registered(
            Affine::translate((20.0, 10.0)) * Affine::rotate(0.0) * Affine::scale(0.5)
        )
    );
    // Registered against the site plan, not this base.
    assert_eq!(
        out.layers[1].placement,
        LayerPlacement::Stretched(Rect::new(0.0, 0.0, 1200.0, 800.0))
    );
    assert!(out.layers[2].placement.is_registered());
}

#[test]
fn opacity_reaches_every_layer() {
    let mut view = sample();
    view.select_drawing(Some("02"));
    view.toggle_overlay("구조");
    view.toggle_overlay("설비");
    view.set_overlay_opacity(0.25);
    let out = compose_view(&view, BASE, CONTAINER).unwrap();
    assert_eq!(out.layers.len(), 2);
    assert!(out.layers.iter().all(|l| l.opacity == 0.25));
    assert_eq!(out.layers[0].url, "/data/drawings/02_s.png");
}

#[test]
fn clicking_a_region_navigates_into_it() {
    let mut view = sample();
    view.select_drawing(Some("00"));
    let stage = Stage::fit(BASE, CONTAINER).unwrap();

    let regions = RegionMap::for_selection(view.catalog().unwrap(), view.selection());
    let ids: Vec<&str> = regions.shapes().iter().map(|s| s.drawing_id.as_str()).collect();
    assert_eq!(ids, ["01", "02"]);

    // (200, 200) in base pixels, inside drawing 01's square.
    let click = stage.base_to_view() * Point::new(200.0, 200.0);
    assert_eq!(click_view(&mut view, click, &stage).as_deref(), Some("01"));
    assert_eq!(view.selection().discipline_key(), Some("건축"));
    assert!(view.selection().revision().is_none());
    assert_eq!(view.overlay().keys(), ["건축"]);

    // Regions are gone once a discipline is shown.
    assert!(click_view(&mut view, click, &stage).is_none());
}

#[test]
fn click_without_default_discipline_takes_the_first() {
    let mut view = sample();
    view.select_drawing(Some("00"));
    let stage = Stage::fit(BASE, CONTAINER).unwrap();
    let click = stage.base_to_view() * Point::new(600.0, 200.0);
    assert_eq!(click_view(&mut view, click, &stage).as_deref(), Some("02"));
    assert_eq!(view.selection().discipline_key(), Some("구조"));
}

proptest! {
    #[test]
    fn fit_never_enlarges_and_stays_inside(
        bw in 1.0f64..5000.0,
        bh in 1.0f64..5000.0,
        cw in 1.0f64..5000.0,
        ch in 1.0f64..5000.0,
    ) {
        let stage = Stage::fit(Size::new(bw, bh), Size::new(cw, ch)).unwrap();
        prop_assert!(stage.scale() <= 1.0);
        let rect = stage.display_rect();
        prop_assert!(rect.x0 >= -1e-9 && rect.y0 >= -1e-9);
        prop_assert!(rect.x1 <= cw + 1e-9 && rect.y1 <= ch + 1e-9);
    }
}
