// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Transport layer
//!
//! A [`Transport`] performs the network transfer for a report request and
//! hands back the raw response bytes together with the offset at which the
//! body starts. [`HttpTransport`] is the default, reqwest-backed
//! implementation; tests substitute their own.

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use percent_encoding::percent_decode_str;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::Client;
use url::Url;

use super::cookie::SessionAffinity;
use super::DEFAULT_USER_AGENT;
use crate::error::{Error, Result};

/// Raw response bytes plus the header/body split offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    bytes: Bytes,
    header_size: usize,
}

impl RawResponse {
    /// Create a raw response, checking that the offset lies inside the bytes
    pub fn new(bytes: impl Into<Bytes>, header_size: usize) -> Result<Self> {
        let bytes = bytes.into();
        if header_size > bytes.len() {
            return Err(Error::HeaderOffsetOutOfRange {
                offset: header_size,
                len: bytes.len(),
            });
        }
        Ok(Self { bytes, header_size })
    }

    /// Offset at which the body begins
    pub fn header_size(&self) -> usize {
        self.header_size
    }

    /// All response bytes
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Header block bytes (status line through the blank line)
    pub fn header_block(&self) -> &[u8] {
        &self.bytes[..self.header_size]
    }

    /// Split into header block and body without copying
    pub fn into_parts(self) -> (Bytes, Bytes) {
        let mut head = self.bytes;
        let body = head.split_off(self.header_size);
        (head, body)
    }
}

/// Performs the network transfer for a report request
///
/// Implementations attach the session and backend tokens as cookies and
/// return the complete raw response. Timeouts and cancellation belong here;
/// failures should be reported as [`Error::Transport`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url`, pinned to the session and backend in `affinity`
    async fn send(&self, url: &str, affinity: &SessionAffinity) -> Result<RawResponse>;
}

/// HTTP transport configuration
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// User agent string
    pub user_agent: String,
    /// Request timeout
    pub timeout: Duration,
    /// Accept invalid certificates (dangerous!)
    pub accept_invalid_certs: bool,
    /// Default headers
    pub default_headers: HeaderMap,
    /// Proxy URL
    pub proxy: Option<String>,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert("accept", HeaderValue::from_static("*/*"));

        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
            default_headers,
            proxy: None,
        }
    }
}

impl HttpTransportConfig {
    /// Create a new transport config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Accept invalid certificates
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Set proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }
}

/// Default transport backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: HttpTransportConfig,
}

impl HttpTransport {
    /// Create a transport with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpTransportConfig::default())
    }

    /// Create a transport with custom configuration
    pub fn with_config(config: HttpTransportConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(Policy::none())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .default_headers(config.default_headers.clone())
            .cookie_store(false); // Affinity cookies are attached per request

        if let Some(ref proxy_url) = config.proxy {
            builder = builder.proxy(
                reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::config(format!("Invalid proxy URL: {}", e)))?,
            );
        }

        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// Get transport configuration
    pub fn config(&self) -> &HttpTransportConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, url: &str, affinity: &SessionAffinity) -> Result<RawResponse> {
        let start = Instant::now();
        let (target, credentials) = split_credentials(url)?;
        let shown = target.to_string();

        let mut builder = self.client.get(target);

        if let Some((user, pass)) = credentials {
            let encoded = base64::Engine::encode(
                &base64::engine::general_purpose::STANDARD,
                format!("{}:{}", user, pass),
            );
            builder = builder.header("authorization", format!("Basic {}", encoded));
        }

        if let Some(cookie_header) = affinity.cookie_header() {
            builder = builder.header("cookie", cookie_header);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::transport_source(shown.clone(), e))?;

        let head = render_header_block(&response);
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::transport_source(shown.clone(), e))?;

        tracing::debug!(
            url = %shown,
            header_size = head.len(),
            body_size = body.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Transfer complete"
        );

        let header_size = head.len();
        let mut raw = BytesMut::with_capacity(header_size + body.len());
        raw.extend_from_slice(head.as_bytes());
        raw.extend_from_slice(&body);

        RawResponse::new(raw.freeze(), header_size)
    }
}

/// Strip `user:password@` from the URL, returning it separately
fn split_credentials(url: &str) -> Result<(Url, Option<(String, String)>)> {
    let mut parsed = Url::parse(url).map_err(|e| Error::transport_source(url, e))?;
    if parsed.username().is_empty() && parsed.password().is_none() {
        return Ok((parsed, None));
    }

    let user = percent_decode(parsed.username());
    let pass = parsed.password().map(percent_decode).unwrap_or_default();

    // Only fails for cannot-be-a-base URLs, which never carry credentials
    let _ = parsed.set_username("");
    let _ = parsed.set_password(None);

    Ok((parsed, Some((user, pass))))
}

/// Decode a percent-encoded userinfo component
fn percent_decode(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

/// Rebuild the wire-format header block from a reqwest response
fn render_header_block(response: &reqwest::Response) -> String {
    let status = response.status();
    let mut head = String::new();

    let _ = write!(
        head,
        "{:?} {} {}\r\n",
        response.version(),
        status.as_u16(),
        status.canonical_reason().unwrap_or("")
    );
    for (name, value) in response.headers() {
        let _ = write!(
            head,
            "{}: {}\r\n",
            name,
            String::from_utf8_lossy(value.as_bytes())
        );
    }
    head.push_str("\r\n");
    head
}
