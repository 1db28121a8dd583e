use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum CheckStatus {
    Up,
    HttpError(u16),
    SslError,
    Timeout,
    RedirectLoop,
    Down,
    Invalid,
}

impl CheckStatus {
    pub fn from_status_code(code: u16) -> Self {
        if (200..400).contains(&code) {
            Self::Up
        } else {
            Self::HttpError(code)
        }
    }

    pub fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("UP"),
            Self::HttpError(code) => write!(f, "DOWN ({code})"),
            Self::SslError => f.write_str("DOWN (SSL Error)"),
            Self::Timeout => f.write_str("DOWN (Timeout)"),
            Self::RedirectLoop => f.write_str("DOWN (Redirect Loop)"),
            Self::Down => f.write_str("DOWN"),
            Self::Invalid => f.write_str("INVALID"),
        }
    }
}

impl From<CheckStatus> for String {
    fn from(status: CheckStatus) -> Self {
        status.to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub url: String,
    pub status: CheckStatus,
    /// Milliseconds; 0 when the probe failed.
    pub time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub results: Vec<CheckResult>,
}

#[derive(Debug, Deserialize)]
pub struct CheckForm {
    #[serde(default)]
    pub urls: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    EmptyInput,
    NoUrls,
    Cleared,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Self::EmptyInput => "Please enter at least one URL",
            Self::NoUrls => "No valid URLs provided",
            Self::Cleared => "History has been cleared",
        }
    }

    pub fn level(&self) -> &'static str {
        match self {
            Self::EmptyInput | Self::NoUrls => "error",
            Self::Cleared => "success",
        }
    }

    pub fn location(&self) -> &'static str {
        match self {
            Self::EmptyInput => "/?notice=empty_input",
            Self::NoUrls => "/?notice=no_urls",
            Self::Cleared => "/?notice=cleared",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IncidentView {
    pub start: String,
    pub end: Option<String>,
    pub duration: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct UrlSummary {
    pub url: String,
    pub availability: f64,
    pub avg_response_time: f64,
    pub total_checks: u64,
    pub last_check: Option<String>,
    pub downtime_incidents: Vec<IncidentView>,
}

#[derive(Debug, Serialize)]
pub struct UrlDetail {
    pub url: String,
    pub availability: f64,
    pub avg_response_time: f64,
    pub total_checks: u64,
    pub last_check: Option<String>,
    pub response_times: Vec<f64>,
    pub downtime_incidents: Vec<IncidentView>,
}
