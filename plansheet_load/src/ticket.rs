// Copyright 2025 the Plansheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use plansheet_catalog::Metadata;
use tracing::{debug, info, warn};

use crate::error::LoadError;
use crate::source::MetadataSource;

/// Identifies one outstanding metadata load.
///
/// The view that starts a load keeps one clone and hands another to the task
/// doing the fetch. Cancelling either clone marks the load as abandoned, and
/// its result is then discarded instead of being applied.
#[derive(Clone, Debug)]
pub struct LoadTicket {
    id: u64,
    cancelled: Arc<AtomicBool>,
}

impl LoadTicket {
    /// Creates a live ticket.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self {
            id,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The ticket's id.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Abandons the load.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Returns `true` once the load has been abandoned.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Fetches the metadata document for `ticket`.
///
/// Returns `None` when the ticket was cancelled before the fetch started or
/// while it was in flight; the caller must then leave its state untouched.
pub async fn fetch_metadata<S: MetadataSource>(
    source: &S,
    ticket: &LoadTicket,
) -> Option<Result<Metadata, LoadError>> {
    if ticket.is_cancelled() {
        debug!(ticket = ticket.id(), "load cancelled before it started");
        return None;
    }
    let result = source.fetch().await;
    if ticket.is_cancelled() {
        debug!(ticket = ticket.id(), "discarding metadata for a cancelled load");
        return None;
    }
    match &result {
        Ok(metadata) => info!(
            ticket = ticket.id(),
            drawings = metadata.drawings.len(),
            "metadata loaded"
        ),
        Err(error) => warn!(ticket = ticket.id(), %error, "metadata load failed"),
    }
    Some(result)
}
