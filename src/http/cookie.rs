// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Sticky-session cookies
//!
//! The report server pins a client to one logical session through the
//! `JSESSIONID` cookie and to one physical node behind the load balancer
//! through the `BACKEND` cookie. Both travel together as a [`SessionAffinity`].

use serde::{Deserialize, Serialize};

/// Cookie carrying the server session identifier
pub const SESSION_COOKIE: &str = "JSESSIONID";

/// Cookie carrying the backend routing token
pub const BACKEND_COOKIE: &str = "BACKEND";

/// Session and backend tokens used to pin requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAffinity {
    /// Session token (`JSESSIONID`)
    pub session: Option<String>,
    /// Backend routing token (`BACKEND`)
    pub backend: Option<String>,
}

impl SessionAffinity {
    /// Create an empty affinity (fresh session)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session token
    pub fn session(mut self, token: impl Into<String>) -> Self {
        self.session = Some(token.into());
        self
    }

    /// Set the backend token
    pub fn backend(mut self, token: impl Into<String>) -> Self {
        self.backend = Some(token.into());
        self
    }

    /// True when neither token is set
    pub fn is_empty(&self) -> bool {
        self.session.is_none() && self.backend.is_none()
    }

    /// Render the tokens as a `Cookie` request header value
    ///
    /// Returns `None` when there is nothing to send.
    pub fn cookie_header(&self) -> Option<String> {
        let pairs: Vec<String> = [
            (SESSION_COOKIE, self.session.as_deref()),
            (BACKEND_COOKIE, self.backend.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| format!("{}={}", name, v)))
        .collect();

        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        }
    }
}
