// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Report output formats

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Output format of a rendered report (used as the URL extension)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// HTML page, the only format with embedded assets
    #[default]
    Html,
    Pdf,
    Xls,
    Docx,
    Xlsx,
}

impl ReportFormat {
    /// Every supported format
    pub const ALL: [ReportFormat; 5] = [
        ReportFormat::Html,
        ReportFormat::Xls,
        ReportFormat::Pdf,
        ReportFormat::Docx,
        ReportFormat::Xlsx,
    ];

    /// Lowercase extension
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Pdf => "pdf",
            ReportFormat::Xls => "xls",
            ReportFormat::Docx => "docx",
            ReportFormat::Xlsx => "xlsx",
        }
    }

    fn allowed() -> String {
        Self::ALL
            .iter()
            .map(ReportFormat::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == lower)
            .ok_or_else(|| Error::InvalidFormat {
                format: lower,
                allowed: Self::allowed(),
            })
    }
}
