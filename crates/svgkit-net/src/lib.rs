//! # SvgKit Net
//!
//! Markup retrieval for the SvgKit view component.
//!
//! ## Design Goals
//!
//! 1. **One attempt per call**: no internal retry; retry policy belongs to
//!    the caller
//! 2. **Hard deadline**: the in-flight request is aborted when the timeout
//!    expires
//! 3. **Shallow validation**: a response body must start with `<svg` to be
//!    accepted
//! 4. **Local schemes**: `data:` and `file:` locations resolve without
//!    touching the network

use std::collections::HashMap;
use std::time::Duration;

use http::header::ACCEPT;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use reqwest::Client;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, trace, warn};
use url::Url;

use svgkit_common::is_svg_markup;

/// Errors that can occur while retrieving markup.
///
/// Causes are carried as strings so the error can be held in a cloneable
/// state snapshot.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("HTTP {status}: {text}")]
    HttpStatus { status: StatusCode, text: String },

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid content: {0}")]
    InvalidContent(String),

    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("Network failure: {0}")]
    Network(String),
}

impl FetchError {
    /// Status code for HTTP failures, if this is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Fetcher configuration.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Accept header hint sent with every request unless the caller
    /// supplies its own.
    pub accept: String,
    /// User agent string.
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            accept: "image/svg+xml, text/plain, */*".to_string(),
            user_agent: "SvgKit/0.1".to_string(),
        }
    }
}

/// Retrieves SVG markup from a location.
///
/// One fetch attempt per call; the deadline covers connect, response and
/// body read, and aborts the request when it expires.
pub struct SvgFetcher {
    client: Client,
    config: FetcherConfig,
}

impl SvgFetcher {
    /// Create a fetcher with the given configuration.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Fetch markup from `location`.
    ///
    /// Caller headers are merged over the built-in Accept hint, so a caller
    /// that repeats a header name wins. `data:` locations are decoded in
    /// place and `file:` locations are read from disk; both skip the
    /// network but still go through the `<svg` prefix validation.
    pub async fn fetch(
        &self,
        location: &str,
        headers: &HashMap<String, String>,
        deadline: Duration,
    ) -> Result<String, FetchError> {
        let url = Url::parse(location)
            .map_err(|e| FetchError::InvalidLocation(format!("{location}: {e}")))?;

        match url.scheme() {
            "data" => return self.read_data_url(&url),
            "file" => return self.read_file(&url, deadline).await,
            _ => {}
        }

        debug!(url = %url, deadline = ?deadline, "Fetching markup");

        let header_map = self.merge_headers(headers);

        let body = timeout(deadline, async {
            let response = self
                .client
                .get(url.clone())
                .headers(header_map)
                .send()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let text = status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string();
                return Err(FetchError::HttpStatus { status, text });
            }

            response
                .text()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))
        })
        .await
        .map_err(|_| FetchError::Timeout(deadline))??;

        Self::validate(&body)?;

        trace!(url = %url, body_len = body.len(), "Markup received");
        Ok(body)
    }

    /// Merge caller headers over the Accept hint, later-write-wins.
    fn merge_headers(&self, headers: &HashMap<String, String>) -> HeaderMap {
        let mut merged = HeaderMap::new();
        if let Ok(accept) = HeaderValue::try_from(self.config.accept.as_str()) {
            merged.insert(ACCEPT, accept);
        }

        for (name, value) in headers {
            match (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                (Ok(name), Ok(value)) => {
                    merged.insert(name, value);
                }
                _ => warn!(header = %name, "Skipping invalid request header"),
            }
        }

        merged
    }

    /// Decode a `data:` location: `data:[<mediatype>][;base64],<data>`.
    fn read_data_url(&self, url: &Url) -> Result<String, FetchError> {
        let path = url.path();

        let comma = path.find(',').ok_or_else(|| {
            FetchError::InvalidLocation("data URL missing ',' separator".into())
        })?;

        let metadata = &path[..comma];
        let data = &path[comma + 1..];

        let text = if metadata.contains("base64") {
            use base64::Engine;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(data)
                .map_err(|e| FetchError::InvalidContent(format!("base64 decode error: {e}")))?;
            String::from_utf8(bytes)
                .map_err(|e| FetchError::InvalidContent(format!("data URL is not UTF-8: {e}")))?
        } else {
            urlencoding::decode(data)
                .map_err(|e| FetchError::InvalidContent(format!("percent decode error: {e}")))?
                .into_owned()
        };

        Self::validate(&text)?;

        trace!(body_len = text.len(), "Markup decoded from data URL");
        Ok(text)
    }

    /// Read a `file:` location from disk.
    async fn read_file(&self, url: &Url, deadline: Duration) -> Result<String, FetchError> {
        let path = url.to_file_path().map_err(|_| {
            FetchError::InvalidLocation(format!("{url}: not a local file path"))
        })?;

        debug!(path = %path.display(), "Reading markup from file");

        let text = timeout(deadline, tokio::fs::read_to_string(&path))
            .await
            .map_err(|_| FetchError::Timeout(deadline))?
            .map_err(|e| FetchError::Network(format!("read {}: {e}", path.display())))?;

        Self::validate(&text)?;

        Ok(text)
    }

    /// Shallow content validation, the same prefix check the resolver uses.
    fn validate(body: &str) -> Result<(), FetchError> {
        if !is_svg_markup(body) {
            return Err(FetchError::InvalidContent(
                "response does not start with <svg".into(),
            ));
        }
        Ok(())
    }
}
