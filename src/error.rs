// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for the Jasper client
//!
//! Parsing errors that only affect a single field degrade to sentinel values
//! at the call site; everything else surfaces through this enum.

use std::error::Error as StdError;

use thiserror::Error;

/// Result type alias for Jasper client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error carried by transport failures
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Main error type for the Jasper client
#[derive(Error, Debug)]
pub enum Error {
    /// First header line is not a recognizable status line
    #[error("Malformed status line: {line:?}")]
    MalformedStatusLine { line: String },

    /// Header line without a `name: value` separator
    #[error("Malformed header line (missing ':'): {line:?}")]
    MalformedHeaderLine { line: String },

    /// Transfer failed inside the transport
    #[error("Transport error for {url}: {reason}")]
    Transport {
        url: String,
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Error body of an unsuccessful response could not be decoded
    #[error("Error body is not valid JSON: {0}")]
    BodyNotJson(#[source] serde_json::Error),

    /// Transport reported a header/body split outside the response
    #[error("Header offset {offset} is out of range for a {len} byte response")]
    HeaderOffsetOutOfRange { offset: usize, len: usize },

    /// Unknown report format
    #[error("Invalid format {format}. Needs to be one of these: {allowed}.")]
    InvalidFormat { format: String, allowed: String },

    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a transport error without an underlying cause
    pub fn transport(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Transport {
            url: url.into(),
            reason: reason.into(),
            source: None,
        }
    }

    /// Wrap a lower-level failure as a transport error
    pub fn transport_source<E>(url: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Error::Transport {
            url: url.into(),
            reason: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Check if this error came from the transport
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }

    /// Check if this is a response parsing error
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            Error::MalformedStatusLine { .. }
                | Error::MalformedHeaderLine { .. }
                | Error::HeaderOffsetOutOfRange { .. }
                | Error::BodyNotJson(_)
        )
    }

    /// Get URL if available
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::Transport { url, .. } => Some(url),
            _ => None,
        }
    }
}
