// Copyright 2025 the Plansheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless inspector for drawing-set metadata.
//!
//! Loads a metadata document the way the viewer does and prints what the
//! viewer would show: the drawing tree, the image for a selection, revision
//! lists, overlay layer placement, and region hits.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use kurbo::{Point, Size};
use plansheet_catalog::ViewerConfig;
use plansheet_load::{AnySource, fetch_metadata};
use plansheet_state::{LoadStatus, ViewController};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod report;

#[derive(Debug, Parser)]
#[command(name = "plansheet-inspect")]
#[command(about = "Inspect a construction drawing set from its metadata document")]
struct Cli {
    /// Metadata document: a file path or an http(s) URL.
    #[arg(long, global = true)]
    metadata: Option<String>,

    /// Viewer settings as JSON.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Prefix for image access paths.
    #[arg(long, global = true)]
    image_base: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the drawing tree
    Tree {
        /// Expand every node instead of the configured ones
        #[arg(long)]
        all: bool,
    },
    /// Resolve the image shown for a selection
    Resolve {
        #[arg(long)]
        drawing: String,
        #[arg(long)]
        discipline: Option<String>,
        /// Revision label, e.g. `REV1` or `A REV1`
        #[arg(long)]
        revision: Option<String>,
    },
    /// List a discipline's revisions, oldest first
    Revisions {
        #[arg(long)]
        drawing: String,
        #[arg(long)]
        discipline: String,
    },
    /// Compose overlay layers for a drawing
    Compose {
        #[arg(long)]
        drawing: String,
        /// Discipline selected for single-image viewing
        #[arg(long)]
        discipline: Option<String>,
        /// Revision label of the selected discipline
        #[arg(long)]
        revision: Option<String>,
        /// Disciplines to overlay, comma separated
        #[arg(long, value_delimiter = ',')]
        overlay: Vec<String>,
        /// Layer opacity between 0.2 and 1.0
        #[arg(long)]
        opacity: Option<f64>,
        /// Natural size of the base image, `WxH`
        #[arg(long, value_parser = parse_size)]
        base_size: Size,
        /// Display area, `WxH`
        #[arg(long, value_parser = parse_size)]
        container: Size,
    },
    /// List clickable child regions and optionally hit-test a click
    Regions {
        #[arg(long)]
        drawing: String,
        /// Natural size of the base image, `WxH`
        #[arg(long, value_parser = parse_size)]
        base_size: Size,
        /// Display area, `WxH`
        #[arg(long, value_parser = parse_size)]
        container: Size,
        /// Click position in display pixels, `X,Y`
        #[arg(long, value_parser = parse_point)]
        click: Option<Point>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "plansheet=info".into()),
    );
    // stdout carries the report.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<ViewerConfig> {
    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(metadata) = &cli.metadata {
        config.metadata_url.clone_from(metadata);
    }
    if let Some(base) = &cli.image_base {
        config.image_base.clone_from(base);
    }
    Ok(config)
}

fn read_config(path: &Path) -> anyhow::Result<ViewerConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing settings in {}", path.display()))
}

fn open_view(config: ViewerConfig) -> anyhow::Result<ViewController> {
    let source = AnySource::from_location(&config.metadata_url);
    let mut view = ViewController::new(config);
    let ticket = view.begin_load();
    if let Some(result) = pollster::block_on(fetch_metadata(&source, &ticket)) {
        view.finish_load(&ticket, result);
    }
    match view.status() {
        LoadStatus::Ready => Ok(view),
        LoadStatus::Failed(message) => bail!("{message}"),
        LoadStatus::Loading => bail!("metadata load was abandoned"),
    }
}

fn parse_size(s: &str) -> Result<Size, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got `{s}`"))?;
    let w: f64 = w.trim().parse().map_err(|e| format!("bad width: {e}"))?;
    let h: f64 = h.trim().parse().map_err(|e| format!("bad height: {e}"))?;
    Ok(Size::new(w, h))
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got `{s}`"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
    Ok(Point::new(x, y))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = load_config(&cli)?;
    info!(metadata = %config.metadata_url, "loading drawing set");
    let mut view = open_view(config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Tree { all } => report::tree(&mut out, &view, all)?,
        Command::Resolve {
            drawing,
            discipline,
            revision,
        } => {
            report::select(&mut view, &drawing, discipline.as_deref(), revision.as_deref())?;
            report::resolve(&mut out, &view)?;
        }
        Command::Revisions {
            drawing,
            discipline,
        } => {
            report::select(&mut view, &drawing, Some(&discipline), None)?;
            report::revisions(&mut out, &view)?;
        }
        Command::Compose {
            drawing,
            discipline,
            revision,
            overlay,
            opacity,
            base_size,
            container,
        } => {
            report::select(&mut view, &drawing, discipline.as_deref(), revision.as_deref())?;
            report::flag_overlay(&mut view, &overlay);
            if let Some(opacity) = opacity {
                view.set_overlay_opacity(opacity);
            }
            report::compose(&mut out, &view, base_size, container)?;
        }
        Command::Regions {
            drawing,
            base_size,
            container,
            click,
        } => {
            report::select(&mut view, &drawing, None, None)?;
            report::regions(&mut out, &mut view, base_size, container, click)?;
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn sizes_and_points_parse() {
        assert_eq!(parse_size("1200x800").unwrap(), Size::new(1200.0, 800.0));
        assert_eq!(parse_size("10X2.5").unwrap(), Size::new(10.0, 2.5));
        assert!(parse_size("1200").is_err());
        assert_eq!(parse_point("3, 4").unwrap(), Point::new(3.0, 4.0));
        assert!(parse_point("3;4").is_err());
    }

    #[test]
    fn overlay_list_is_comma_separated() {
        let cli = Cli::try_parse_from([
            "plansheet-inspect",
            "--metadata",
            "data/metadata.json",
            "compose",
            "--drawing",
            "01",
            "--overlay",
            "구조,건축",
            "--base-size",
            "100x100",
            "--container",
            "50x50",
        ])
        .unwrap();
        match cli.command {
            Command::Compose { overlay, .. } => assert_eq!(overlay, ["구조", "건축"]),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
