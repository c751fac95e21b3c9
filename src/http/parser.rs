// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Raw response header parsing
//!
//! Turns the header block of a raw HTTP response (status line, header lines
//! and the terminating blank line) into a status code, an ordered
//! case-insensitive header map and the two sticky-session tokens.
//!
//! Every function here is pure: the input block is only read and nothing is
//! borrowed from it past the call.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

use super::cookie::SessionAffinity;

lazy_static! {
    static ref LINE_BREAKS: Regex = Regex::new(r"[\r\n]+").unwrap();
    static ref SESSION_TOKEN: Regex = Regex::new(r"JSESSIONID=([^\s;]+);").unwrap();
    static ref BACKEND_TOKEN: Regex = Regex::new(r"BACKEND=([^\s;]+);").unwrap();
}

/// Response headers keyed by lowercase name
///
/// Repeated headers are folded into one entry joined by `,`. Iteration
/// follows the order in which each name first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: IndexMap<String, String>,
}

impl Headers {
    /// Create an empty header map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header, folding into an existing entry of the same name
    pub fn append(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match self.entries.get_mut(&name) {
            Some(existing) => {
                existing.push(',');
                existing.push_str(value);
            }
            None => {
                self.entries.insert(name, value.to_string());
            }
        }
    }

    /// Case-insensitive lookup
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(name.to_ascii_lowercase().as_str())
            .map(String::as_str)
    }

    /// Check whether a header is present
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of distinct header names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no headers were parsed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, value)` pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Everything extracted from one header block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedHeader {
    /// Status code, `0` when the status line was unreadable
    pub status: u16,
    /// Header map
    pub headers: Headers,
    /// Session and backend tokens found in the block
    pub affinity: SessionAffinity,
}

impl ParsedHeader {
    /// Run every parser over the same header block
    pub fn parse(block: &str) -> Result<Self> {
        Ok(Self {
            status: parse_status_code(block),
            headers: parse_headers(block)?,
            affinity: SessionAffinity {
                session: parse_session_token(block),
                backend: parse_backend_token(block),
            },
        })
    }
}

/// Parse the status code from the first line of the block
///
/// `HTTP/1.1 404 Not Found` yields `404`.
pub fn try_parse_status_code(block: &str) -> Result<u16> {
    let line = block.split('\n').next().unwrap_or_default();

    line.split(' ')
        .nth(1)
        .map(str::trim)
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| Error::MalformedStatusLine {
            line: line.trim_end().to_string(),
        })
}

/// Parse the status code, falling back to `0` on a malformed status line
pub fn parse_status_code(block: &str) -> u16 {
    match try_parse_status_code(block) {
        Ok(code) => code,
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable status line, using status 0");
            0
        }
    }
}

/// Parse the header lines that follow the status line
pub fn parse_headers(block: &str) -> Result<Headers> {
    let mut headers = Headers::new();

    for line in LINE_BREAKS
        .split(block)
        .filter(|line| !line.is_empty())
        .skip(1)
    {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| Error::MalformedHeaderLine {
                line: line.to_string(),
            })?;
        headers.append(name.trim(), value.trim());
    }

    Ok(headers)
}

/// Find the `JSESSIONID` token anywhere in the block
pub fn parse_session_token(block: &str) -> Option<String> {
    capture_token(&SESSION_TOKEN, block)
}

/// Find the `BACKEND` token anywhere in the block
pub fn parse_backend_token(block: &str) -> Option<String> {
    capture_token(&BACKEND_TOKEN, block)
}

fn capture_token(pattern: &Regex, block: &str) -> Option<String> {
    pattern
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
