// Copyright 2025 the Plansheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=plansheet_load --heading-base-level=0

//! Plansheet Load: retrieving the metadata document.
//!
//! The viewer loads its metadata exactly once, asynchronously, when it opens.
//! This crate provides:
//! - [`MetadataSource`]: anything that can produce the document, with
//!   in-memory, file, and HTTP implementations.
//! - [`LoadTicket`]: a cancellation guard shared between the view and the
//!   fetch, so a view torn down mid-load never receives a stale result.
//! - [`fetch_metadata`]: runs a source under a ticket.
//! - [`LoadError`]: transport, status, I/O, and parse failures.
//!
//! There are no retries. A failed load is reported once and the user reloads.
//!
//! ## Minimal example
//!
//! ```rust
//! use plansheet_load::{LoadTicket, StaticSource, fetch_metadata};
//!
//! let source = StaticSource::new(r#"{"project": {"name": "Tower", "unit": "mm"}, "drawings": {}}"#);
//! let ticket = LoadTicket::new(1);
//!
//! let result = pollster::block_on(fetch_metadata(&source, &ticket));
//! let metadata = result.expect("not cancelled").expect("valid document");
//! assert_eq!(metadata.project.name, "Tower");
//! ```
//!
//! ## Features
//!
//! - `http` (default): [`HttpSource`] backed by `ureq`.

mod error;
mod source;
mod ticket;

pub use error::LoadError;
#[cfg(feature = "http")]
pub use source::HttpSource;
pub use source::{AnySource, FileSource, MetadataSource, StaticSource, parse_metadata};
pub use ticket::{LoadTicket, fetch_metadata};
