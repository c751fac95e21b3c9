// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Report facade over a single [`ReportRequest`]

use std::sync::Arc;

use bytes::Bytes;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::config::ReportConfig;
use super::format::ReportFormat;
use crate::error::Result;
use crate::http::{
    join_url, Headers, HttpTransport, ReportRequest, ReportResponse, ServerError,
    SessionAffinity, Transport,
};

lazy_static! {
    /// `src="..."` or `src='...'` inside an opening tag
    static ref ASSET_SRC: Regex =
        Regex::new(r#"(<\w+[^>]+src=)("|')([^'"]*)("|')"#).unwrap();
}

/// A report rendering request
///
/// Builds the REST URL from its [`ReportConfig`] and forwards everything
/// else to the underlying [`ReportRequest`].
#[derive(Debug)]
pub struct Report {
    config: ReportConfig,
    request: ReportRequest,
}

impl Report {
    /// Create a report that sends through `transport`
    pub fn new(config: ReportConfig, transport: Arc<dyn Transport>) -> Self {
        let request = ReportRequest::new(&config.server_url, config.relative_url(), transport)
            .with_affinity(config.initial_affinity());
        Self { config, request }
    }

    /// Create a report using the default HTTP transport
    pub fn with_http(config: ReportConfig) -> Result<Self> {
        Ok(Self::new(config, Arc::new(HttpTransport::new()?)))
    }

    /// Get report configuration
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Underlying request
    pub fn request(&self) -> &ReportRequest {
        &self.request
    }

    /// Fully qualified report URL
    pub fn url(&self) -> String {
        join_url(&self.config.server_url, &self.config.relative_url())
    }

    /// Render the report
    pub async fn send(&mut self) -> Result<&ReportResponse> {
        tracing::info!(
            server = %self.config.passwordless_server_url(),
            report = %self.config.report_path,
            format = %self.config.format,
            "Rendering report"
        );
        self.request.send().await
    }

    /// True iff the latest status is exactly 200
    pub fn is_successful(&self) -> bool {
        self.request.is_successful()
    }

    /// Structured server error for an unsuccessful response
    pub fn error(&self) -> Result<Option<ServerError>> {
        self.request.error()
    }

    /// Status code of the latest response
    pub fn status(&self) -> u16 {
        self.request.status()
    }

    /// Rendered report bytes
    pub fn body(&self) -> &Bytes {
        self.request.body()
    }

    /// All response headers
    pub fn headers(&self) -> &Headers {
        self.request.headers()
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request.header(name)
    }

    /// Current session token
    pub fn session_token(&self) -> Option<&str> {
        self.request.session_token()
    }

    /// Current backend token
    pub fn backend_token(&self) -> Option<&str> {
        self.request.backend_token()
    }

    /// Current tokens, usable to seed another report
    pub fn affinity(&self) -> &SessionAffinity {
        self.request.affinity()
    }

    /// HTML body, `None` for other formats
    pub fn html(&self) -> Option<String> {
        (self.config.format == ReportFormat::Html).then(|| self.request.body_text())
    }

    /// HTML body with every `src` URL passed through `rewrite`
    ///
    /// The rewriter also receives the current session affinity so that
    /// proxied asset requests can stay on the same session and backend.
    /// `None` for non-HTML formats.
    pub fn html_with_assets<F>(&self, mut rewrite: F) -> Option<String>
    where
        F: FnMut(&str, &SessionAffinity) -> String,
    {
        let html = self.html()?;
        let affinity = self.affinity();

        let rewritten = ASSET_SRC.replace_all(&html, |caps: &Captures| {
            format!(
                "{}{}{}{}",
                &caps[1],
                &caps[2],
                rewrite(&caps[3], affinity),
                &caps[4]
            )
        });
        Some(rewritten.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::http::RawResponse;

    /// Transport double returning a fixed response and recording URLs
    struct FixedTransport {
        head: &'static str,
        body: &'static str,
        urls: Mutex<Vec<(String, SessionAffinity)>>,
    }

    impl FixedTransport {
        fn new(head: &'static str, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                head,
                body,
                urls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Transport for FixedTransport {
        async fn send(&self, url: &str, affinity: &SessionAffinity) -> Result<RawResponse> {
            self.urls
                .lock()
                .unwrap()
                .push((url.to_string(), affinity.clone()));
            RawResponse::new(
                format!("{}{}", self.head, self.body).into_bytes(),
                self.head.len(),
            )
        }
    }

    const HTML_HEAD: &str = "HTTP/1.1 200 OK\r\n\
        Content-Type: text/html\r\n\
        Set-Cookie: JSESSIONID=S9;Path=/jasperserver\r\n\
        Set-Cookie: BACKEND=n2;Path=/\r\n\
        \r\n";

    const HTML_BODY: &str = r#"<html><img alt="logo" src="/jasperserver/rest_v2/reports/logo.png"><script src='/js/app.js'></script><p>src="kept"</p></html>"#;

    #[tokio::test]
    async fn test_send_builds_report_url() {
        let transport = FixedTransport::new(HTML_HEAD, HTML_BODY);
        let config = ReportConfig::new("https://reports.example.com/jasperserver/", "/reports/Foo")
            .parameter("id", "7")
            .session_token("S1");
        let mut report = Report::new(config, transport.clone());

        report.send().await.unwrap();

        let urls = transport.urls.lock().unwrap().clone();
        assert_eq!(
            urls[0].0,
            "https://reports.example.com/jasperserver/rest_v2/reports/reports/Foo.html?id=7"
        );
        assert_eq!(urls[0].1.session.as_deref(), Some("S1"));
        assert_eq!(report.url(), urls[0].0);
        assert_eq!(report.request().url(), urls[0].0);
        assert!(report.request().is_sent());
        assert!(report.is_successful());
        assert_eq!(report.session_token(), Some("S9"));
        assert_eq!(report.backend_token(), Some("n2"));
    }

    #[tokio::test]
    async fn test_html_with_assets() {
        let mut report = Report::new(
            ReportConfig::new("https://h", "/reports/Foo"),
            FixedTransport::new(HTML_HEAD, HTML_BODY),
        );
        report.send().await.unwrap();

        let html = report
            .html_with_assets(|url, affinity| {
                format!(
                    "/proxy?u={}&s={}&b={}",
                    url,
                    affinity.session.as_deref().unwrap_or(""),
                    affinity.backend.as_deref().unwrap_or("")
                )
            })
            .unwrap();

        assert!(html.contains(
            r#"<img alt="logo" src="/proxy?u=/jasperserver/rest_v2/reports/logo.png&s=S9&b=n2">"#
        ));
        assert!(html.contains(r#"<script src='/proxy?u=/js/app.js&s=S9&b=n2'>"#));
        // Text outside a tag is left alone
        assert!(html.contains(r#"<p>src="kept"</p>"#));
    }

    #[tokio::test]
    async fn test_html_only_for_html_format() {
        let mut report = Report::new(
            ReportConfig::new("https://h", "/reports/Foo").format(ReportFormat::Pdf),
            FixedTransport::new("HTTP/1.1 200 OK\r\n\r\n", "%PDF-1.4"),
        );
        report.send().await.unwrap();

        assert_eq!(report.body().as_ref(), b"%PDF-1.4");
        assert!(report.html().is_none());
        assert!(report.html_with_assets(|url, _| url.to_string()).is_none());
    }

    #[tokio::test]
    async fn test_error_delegation() {
        let mut report = Report::new(
            ReportConfig::new("https://h", "/reports/Missing"),
            FixedTransport::new(
                "HTTP/1.1 404 Not Found\r\n\r\n",
                r#"{"errorCode":"resource.not.found","message":"Resource not found","parameters":["/reports/Missing"]}"#,
            ),
        );
        report.send().await.unwrap();

        assert!(!report.is_successful());
        assert_eq!(report.status(), 404);
        let error = report.error().unwrap().unwrap();
        assert_eq!(error.code, "resource.not.found");
        assert_eq!(error.more, "/reports/Missing");
    }
}
