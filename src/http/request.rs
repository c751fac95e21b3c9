// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Report request lifecycle
//!
//! A [`ReportRequest`] starts unsent. Each call to [`ReportRequest::send`]
//! performs one transfer through the injected [`Transport`], parses the
//! header block and replaces the stored response. The session and backend
//! tokens are overwritten with whatever the latest response carried, so a
//! server that drops the cookies also drops the stickiness.

use std::borrow::Cow;
use std::sync::Arc;

use bytes::Bytes;
use lazy_static::lazy_static;
use regex::Regex;

use super::cookie::SessionAffinity;
use super::parser::{Headers, ParsedHeader};
use super::response::{ReportResponse, ServerError};
use super::transport::Transport;
use crate::error::Result;

lazy_static! {
    static ref UNSENT: ReportResponse = ReportResponse::default();
    static ref URL_CREDENTIALS: Regex = Regex::new(r"//[^/?#]*@").unwrap();
}

/// One request/response cycle against the report server
///
/// Owned by a single caller; `send` takes `&mut self` so the stored tokens
/// and response have exactly one writer. Use one instance per concurrent
/// request.
pub struct ReportRequest {
    /// Path relative to the server URL
    path: String,
    /// Base server URL, possibly carrying credentials
    server_url: String,
    /// Current session and backend tokens
    affinity: SessionAffinity,
    /// Latest response, `None` until the first successful send
    response: Option<ReportResponse>,
    transport: Arc<dyn Transport>,
}

impl ReportRequest {
    /// Create an unsent request with no session
    pub fn new(
        server_url: impl Into<String>,
        path: impl Into<String>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            path: path.into(),
            server_url: server_url.into(),
            affinity: SessionAffinity::default(),
            response: None,
            transport,
        }
    }

    /// Reuse an existing sticky session
    pub fn with_affinity(mut self, affinity: SessionAffinity) -> Self {
        self.affinity = affinity;
        self
    }

    /// Reuse an existing session token
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.affinity.session = Some(token.into());
        self
    }

    /// Reuse an existing backend token
    pub fn with_backend_token(mut self, token: impl Into<String>) -> Self {
        self.affinity.backend = Some(token.into());
        self
    }

    /// Fully qualified target URL
    pub fn url(&self) -> String {
        join_url(&self.server_url, &self.path)
    }

    /// Perform the transfer and interpret the response
    ///
    /// Transport and header parsing failures leave the previous state
    /// untouched. Calling this again performs a new transfer.
    pub async fn send(&mut self) -> Result<&ReportResponse> {
        let url = self.url();
        tracing::debug!(url = %passwordless(&url), "Sending report request");

        let raw = self.transport.send(&url, &self.affinity).await?;
        let (head, body) = raw.into_parts();
        let parsed = ParsedHeader::parse(&String::from_utf8_lossy(&head))?;

        if parsed.affinity != self.affinity {
            tracing::debug!(
                session_changed = parsed.affinity.session != self.affinity.session,
                backend_changed = parsed.affinity.backend != self.affinity.backend,
                "Session affinity updated"
            );
        }
        tracing::debug!(
            status = parsed.status,
            body_size = body.len(),
            "Report response received"
        );

        self.affinity = parsed.affinity;
        let response = self
            .response
            .insert(ReportResponse::new(parsed.status, parsed.headers, body));
        Ok(&*response)
    }

    /// Whether `send` has completed at least once
    pub fn is_sent(&self) -> bool {
        self.response.is_some()
    }

    /// Latest response, if any
    pub fn response(&self) -> Option<&ReportResponse> {
        self.response.as_ref()
    }

    fn current(&self) -> &ReportResponse {
        self.response.as_ref().unwrap_or(&UNSENT)
    }

    /// Status code of the latest response (`0` before sending)
    pub fn status(&self) -> u16 {
        self.current().status
    }

    /// True iff the latest status is exactly 200
    pub fn is_successful(&self) -> bool {
        self.current().is_successful()
    }

    /// Structured server error for an unsuccessful response
    pub fn error(&self) -> Result<Option<ServerError>> {
        self.current().error()
    }

    /// All response headers
    pub fn headers(&self) -> &Headers {
        &self.current().headers
    }

    /// Case-insensitive header lookup, `None` when not present
    pub fn header(&self, name: &str) -> Option<&str> {
        self.current().header(name)
    }

    /// Response body
    pub fn body(&self) -> &Bytes {
        &self.current().body
    }

    /// Response body as text, lossy conversion
    pub fn body_text(&self) -> String {
        self.current().text_lossy()
    }

    /// Current session token
    pub fn session_token(&self) -> Option<&str> {
        self.affinity.session.as_deref()
    }

    /// Current backend token
    pub fn backend_token(&self) -> Option<&str> {
        self.affinity.backend.as_deref()
    }

    /// Current tokens, usable to seed another request
    pub fn affinity(&self) -> &SessionAffinity {
        &self.affinity
    }
}

impl std::fmt::Debug for ReportRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportRequest")
            .field("url", &passwordless(&self.url()))
            .field("status", &self.status())
            .field("sent", &self.is_sent())
            .finish()
    }
}

/// Join a base URL and a relative path with exactly one slash
///
/// Removes at most one trailing slash from `base` and one leading slash from
/// `path`.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);
    let path = path.strip_prefix('/').unwrap_or(path);
    format!("{}/{}", base, path)
}

/// Remove `user:password@` from a URL
pub fn passwordless(url: &str) -> Cow<'_, str> {
    URL_CREDENTIALS.replace(url, "//")
}

/// Send several requests concurrently, returning each status code
pub async fn send_all(requests: &mut [ReportRequest]) -> Vec<Result<u16>> {
    let futures = requests
        .iter_mut()
        .map(|request| async move { request.send().await.map(|response| response.status) });
    futures::future::join_all(futures).await
}
