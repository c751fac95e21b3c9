// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Report rendering on top of the HTTP layer
//!
//! Turns a report unit path, output format and input controls into a REST v2
//! request, and post-processes HTML output.

mod config;
mod format;
mod report;

pub use config::{ReportConfig, REPORTS_ENDPOINT};
pub use format::ReportFormat;
pub use report::Report;
