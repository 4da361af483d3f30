// Copyright 2025 the Plansheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Why the metadata document could not be loaded.
///
/// Any of these is fatal to the view that requested the load.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The transport answered with a non-success status.
    #[error("Failed to load metadata.json: {status} {reason}")]
    Status {
        /// Numeric status code.
        status: u16,
        /// Reason phrase, possibly empty.
        reason: String,
    },
    /// The request never produced a response.
    #[error("Failed to load metadata.json: {0}")]
    Transport(String),
    /// Reading a local document failed.
    #[error("Failed to read metadata.json: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not a structured metadata document.
    #[error("Failed to parse metadata.json: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::LoadError;

    #[test]
    fn status_message_carries_code_and_reason() {
        let err = LoadError::Status {
            status: 404,
            reason: "Not Found".into(),
        };
        assert_eq!(err.to_string(), "Failed to load metadata.json: 404 Not Found");
    }
}
