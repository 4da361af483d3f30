// Copyright 2025 the Plansheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Places a metadata document can come from.

use std::path::PathBuf;

use plansheet_catalog::Metadata;

use crate::error::LoadError;

/// Something that can produce the metadata document.
///
/// Retrieval is asynchronous; the returned future is awaited once per load.
pub trait MetadataSource {
    /// Retrieves and parses the document.
    fn fetch(&self) -> impl Future<Output = Result<Metadata, LoadError>>;
}

/// Parses a metadata document from raw bytes.
pub fn parse_metadata(bytes: &[u8]) -> Result<Metadata, LoadError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// A document held in memory.
#[derive(Clone, Debug)]
pub struct StaticSource {
    text: String,
}

impl StaticSource {
    /// Wraps document text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl MetadataSource for StaticSource {
    async fn fetch(&self) -> Result<Metadata, LoadError> {
        parse_metadata(self.text.as_bytes())
    }
}

/// A document on the local file system.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Points at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MetadataSource for FileSource {
    async fn fetch(&self) -> Result<Metadata, LoadError> {
        let bytes = std::fs::read(&self.path)?;
        parse_metadata(&bytes)
    }
}

/// A document served over HTTP(S).
///
/// The request itself is blocking; drive the future from a thread that may
/// block (for example with `pollster::block_on`).
#[cfg(feature = "http")]
#[derive(Clone)]
pub struct HttpSource {
    url: String,
    agent: ureq::Agent,
}

#[cfg(feature = "http")]
impl core::fmt::Debug for HttpSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HttpSource")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "http")]
impl HttpSource {
    /// Points at `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        // Statuses are inspected here so the error can carry the reason phrase.
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            url: url.into(),
            agent,
        }
    }

    /// The URL this source fetches.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(feature = "http")]
impl MetadataSource for HttpSource {
    async fn fetch(&self) -> Result<Metadata, LoadError> {
        let mut response = self
            .agent
            .get(&self.url)
            .call()
            .map_err(|e| LoadError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_owned(),
            });
        }
        let bytes = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| LoadError::Transport(e.to_string()))?;
        parse_metadata(&bytes)
    }
}

/// A source chosen from a location string.
///
/// `http://` and `https://` locations are fetched over the network, anything
/// else is read as a file path.
#[derive(Clone, Debug)]
pub enum AnySource {
    /// In-memory text.
    Static(StaticSource),
    /// Local file.
    File(FileSource),
    /// Remote document.
    #[cfg(feature = "http")]
    Http(HttpSource),
}

impl AnySource {
    /// Picks a source for `location`.
    #[must_use]
    pub fn from_location(location: &str) -> Self {
        #[cfg(feature = "http")]
        if location.starts_with("http://") || location.starts_with("https://") {
            return Self::Http(HttpSource::new(location));
        }
        Self::File(FileSource::new(location))
    }
}

impl MetadataSource for AnySource {
    async fn fetch(&self) -> Result<Metadata, LoadError> {
        match self {
            Self::Static(s) => s.fetch().await,
            Self::File(s) => s.fetch().await,
            #[cfg(feature = "http")]
            Self::Http(s) => s.fetch().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locations_pick_sources() {
        assert!(matches!(
            AnySource::from_location("data/metadata.json"),
            AnySource::File(_)
        ));
        #[cfg(feature = "http")]
        assert!(matches!(
            AnySource::from_location("https://example.com/data/metadata.json"),
            AnySource::Http(_)
        ));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = pollster::block_on(StaticSource::new("<html>").fetch()).unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = pollster::block_on(FileSource::new("/nonexistent/metadata.json").fetch())
            .unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
