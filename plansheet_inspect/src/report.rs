// Copyright 2025 the Plansheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plain-text reports written by the subcommands.

use std::io::{self, Write};

use anyhow::Context;
use kurbo::{Point, Size};
use plansheet_catalog::{TreeOutline, file_name};
use plansheet_compose::{LayerPlacement, RegionMap, Stage, click_view, compose_view};
use plansheet_state::ViewController;
use tracing::warn;

/// Selects a drawing, then optionally a discipline and a revision label.
pub(crate) fn select(
    view: &mut ViewController,
    drawing: &str,
    discipline: Option<&str>,
    revision: Option<&str>,
) -> anyhow::Result<()> {
    view.select_drawing(Some(drawing));
    if view.selected_drawing().is_none() {
        warn!(drawing, "no such drawing");
    }
    view.select_discipline(discipline);
    if discipline.is_some() && view.selected_discipline().is_none() {
        warn!(drawing, discipline, "drawing has no such discipline");
    }
    if let Some(label) = revision {
        let found = view
            .revisions()
            .into_iter()
            .find(|e| e.label == label || e.revision.version == label)
            .map(|e| e.revision.clone())
            .with_context(|| format!("no revision labelled `{label}`"))?;
        view.select_revision(Some(found));
    }
    Ok(())
}

/// Flags every key in `keys` for overlay display.
pub(crate) fn flag_overlay(view: &mut ViewController, keys: &[String]) {
    for key in keys {
        if !view.overlay().contains(key) {
            view.toggle_overlay(key);
        }
    }
}

pub(crate) fn tree(out: &mut impl Write, view: &ViewController, all: bool) -> io::Result<()> {
    let Some(catalog) = view.catalog() else {
        return Ok(());
    };
    let project = catalog.project();
    writeln!(out, "{} ({})", project.name, project.unit)?;

    let outline = if all {
        TreeOutline::new(catalog.drawings().map(|d| d.id.clone()))
    } else {
        view.outline().clone()
    };
    for row in outline.visible_rows(catalog) {
        let marker = match (row.has_children, row.expanded) {
            (false, _) => ' ',
            (true, true) => '-',
            (true, false) => '+',
        };
        writeln!(
            out,
            "{:indent$}{marker} {} {}",
            "",
            row.drawing.id,
            row.drawing.name,
            indent = row.depth * 2
        )?;
    }
    Ok(())
}

pub(crate) fn resolve(out: &mut impl Write, view: &ViewController) -> io::Result<()> {
    if let Some(drawing) = view.selected_drawing() {
        let trail: Vec<&str> = view
            .catalog()
            .map(|c| c.ancestors(&drawing.id))
            .unwrap_or_default()
            .into_iter()
            .rev()
            .map(|d| d.id.as_str())
            .collect();
        if !trail.is_empty() {
            writeln!(out, "path: {} > {}", trail.join(" > "), drawing.id)?;
        }
        let keys = view
            .catalog()
            .map(|c| c.discipline_keys(&drawing.id))
            .unwrap_or_default();
        if !keys.is_empty() {
            writeln!(out, "disciplines: {}", keys.join(", "))?;
        }
    }
    match view.image_url() {
        Some(url) => writeln!(out, "image: {} ({url})", file_name(&url)),
        None => writeln!(out, "image: none, select a drawing"),
    }
}

pub(crate) fn revisions(out: &mut impl Write, view: &ViewController) -> io::Result<()> {
    let entries = view.revisions();
    if entries.is_empty() {
        return writeln!(out, "no revisions");
    }
    for entry in &entries {
        let rev = entry.revision;
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            rev.date.as_deref().unwrap_or("-"),
            entry.label,
            rev.image,
            rev.description
        )?;
        for change in &rev.changes {
            writeln!(out, "\t- {change}")?;
        }
    }
    Ok(())
}

pub(crate) fn compose(
    out: &mut impl Write,
    view: &ViewController,
    base_size: Size,
    container: Size,
) -> io::Result<()> {
    let Some(composition) = compose_view(view, base_size, container) else {
        return writeln!(
            out,
            "overlay inactive: {} discipline(s) flagged",
            view.overlay().keys().len()
        );
    };
    let stage = &composition.stage;
    let shown = stage.display_rect();
    writeln!(
        out,
        "base {} ({}) scale {:.3} at ({:.1}, {:.1})",
        composition.base_file, composition.base_url, stage.scale(), shown.x0, shown.y0
    )?;
    let percent = view.overlay().opacity_percent();
    for layer in &composition.layers {
        match layer.placement {
            LayerPlacement::Registered(affine) => {
                let [a, b, c, d, e, f] = affine.as_coeffs();
                writeln!(
                    out,
                    "layer {} {} {percent}% registered [{a:.3} {b:.3} {c:.3} {d:.3} {e:.1} {f:.1}]",
                    layer.key, layer.file
                )?;
            }
            LayerPlacement::Stretched(rect) => {
                writeln!(
                    out,
                    "layer {} {} {percent}% stretched {}x{}",
                    layer.key,
                    layer.file,
                    rect.width(),
                    rect.height()
                )?;
            }
        }
    }
    Ok(())
}

pub(crate) fn regions(
    out: &mut impl Write,
    view: &mut ViewController,
    base_size: Size,
    container: Size,
    click: Option<Point>,
) -> anyhow::Result<()> {
    let stage =
        Stage::fit(base_size, container).context("base and container sizes must be positive")?;
    {
        let Some(catalog) = view.catalog() else {
            return Ok(());
        };
        let map = RegionMap::for_selection(catalog, view.selection());
        if map.is_empty() {
            writeln!(out, "no regions")?;
        }
        for shape in map.shapes() {
            let b = shape.bounds();
            writeln!(
                out,
                "{} {} ({}, {})-({}, {})",
                shape.drawing_id, shape.name, b.x0, b.y0, b.x1, b.y1
            )?;
        }
    }
    if let Some(pt) = click {
        match click_view(view, pt, &stage) {
            Some(id) => writeln!(
                out,
                "click ({}, {}) -> {id} [{}]",
                pt.x,
                pt.y,
                view.selection().discipline_key().unwrap_or("-")
            )?,
            None => writeln!(out, "click ({}, {}) -> nothing", pt.x, pt.y)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use plansheet_catalog::{Catalog, Metadata, ViewerConfig};

    use super::*;

    fn sample() -> ViewController {
        let metadata: Metadata =
            serde_json::from_str(include_str!("../../data/metadata.json")).unwrap();
        ViewController::with_catalog(ViewerConfig::default(), Catalog::new(metadata))
    }

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn tree_shows_the_default_expansion() {
        let mut out = Vec::new();
        tree(&mut out, &sample(), false).unwrap();
        let text = text(out);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "한빛 타워 신축공사 (mm)");
        assert_eq!(lines[1], "- 00 전체 배치도");
        assert_eq!(lines[2], "  + 01 101동 평면도");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn resolve_reports_path_and_image() {
        let mut view = sample();
        select(&mut view, "01", Some("구조"), Some("REV1")).unwrap();
        let mut out = Vec::new();
        resolve(&mut out, &view).unwrap();
        let text = text(out);
        assert!(text.contains("path: 00 > 01"));
        assert!(text.contains("image: 01_s_r1.png (/data/drawings/01_s_r1.png)"));
    }

    #[test]
    fn unknown_revision_label_is_an_error() {
        let mut view = sample();
        assert!(select(&mut view, "01", Some("구조"), Some("REV9")).is_err());
    }

    #[test]
    fn compose_lists_each_layer() {
        let mut view = sample();
        select(&mut view, "01", Some("구조"), None).unwrap();
        flag_overlay(&mut view, &["설비".to_owned()]);
        let mut out = Vec::new();
        compose(&mut out, &view, Size::new(1200.0, 800.0), Size::new(600.0, 600.0)).unwrap();
        let text = text(out);
        assert!(text.contains("layer 구조 01_s_r2.png 60% registered"));
        assert!(text.contains("layer 설비 01_m.png 60% stretched 1200x800"));
    }

    #[test]
    fn region_click_is_reported() {
        let mut view = sample();
        select(&mut view, "00", None, None).unwrap();
        let mut out = Vec::new();
        regions(
            &mut out,
            &mut view,
            Size::new(1000.0, 1000.0),
            Size::new(1000.0, 1000.0),
            Some(Point::new(150.0, 150.0)),
        )
        .unwrap();
        let text = text(out);
        assert!(text.contains("01 101동 평면도 (100, 100)-(400, 300)"));
        assert!(text.ends_with("click (150, 150) -> 01 [건축]\n"));
    }
}
