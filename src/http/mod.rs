// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for the Jasper client
//!
//! Response header parsing, sticky-session cookies, the pluggable transport
//! and the request lifecycle that ties them together.

mod cookie;
pub mod parser;
mod request;
mod response;
mod transport;

pub use cookie::{SessionAffinity, BACKEND_COOKIE, SESSION_COOKIE};
pub use parser::{Headers, ParsedHeader};
pub use request::{join_url, passwordless, send_all, ReportRequest};
pub use response::{ReportResponse, ServerError, STATUS_OK};
pub use transport::{HttpTransport, HttpTransportConfig, RawResponse, Transport};

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = concat!("jasper-client/", env!("CARGO_PKG_VERSION"));
