// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Interpreted report responses

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::parser::Headers;
use crate::error::{Error, Result};

/// Status code the report server uses for success
pub const STATUS_OK: u16 = 200;

/// Result of one send: status, headers and body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportResponse {
    /// Response status code, `0` when the status line was unreadable
    pub status: u16,
    /// Response headers
    pub headers: Headers,
    /// Response body
    pub body: Bytes,
}

/// Structured error reported by the server in an unsuccessful response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerError {
    /// Server error code (`errorCode`)
    pub code: String,
    /// Human readable message
    pub message: String,
    /// Error parameters joined with `", "`
    pub more: String,
}

/// Wire shape of a server error body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error_code: String,
    message: String,
    parameters: Vec<String>,
}

impl ReportResponse {
    /// Create a new response
    pub fn new(status: u16, headers: Headers, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Only an exact 200 counts as success
    pub fn is_successful(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Get a header value (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Get content type
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Get body as text, lossy conversion
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the server error carried by an unsuccessful response
    ///
    /// Returns `Ok(None)` for successful responses regardless of the body.
    pub fn error(&self) -> Result<Option<ServerError>> {
        if self.is_successful() {
            return Ok(None);
        }

        let body: ErrorBody = serde_json::from_slice(&self.body).map_err(Error::BodyNotJson)?;

        Ok(Some(ServerError {
            code: body.error_code,
            message: body.message,
            more: body.parameters.join(", "),
        }))
    }
}
