use crate::metrics::round2;
use crate::models::{CheckResult, CheckStatus};
use chrono::Local;
use reqwest::{redirect::Policy, Client, Url};
use std::error::Error;
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const USER_AGENT: &str = "URL Health Monitor";
pub const MAX_REDIRECTS: usize = 30;

pub fn normalize_url(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    }
}

#[derive(Debug, Clone)]
pub struct HealthChecker {
    client: Client,
}

impl HealthChecker {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(Self { client })
    }

    pub async fn check(&self, raw: &str) -> Option<CheckResult> {
        if raw.is_empty() {
            return None;
        }
        let url = normalize_url(raw);

        if host_part(&url).is_empty() {
            return Some(invalid(url));
        }
        let parsed = match Url::parse(&url) {
            Ok(parsed) if parsed.host_str().is_some_and(|host| !host.is_empty()) => parsed,
            Ok(_) => return Some(invalid(url)),
            Err(err) => return Some(failure(url, CheckStatus::Down, err.to_string())),
        };

        let started = Instant::now();
        match self.client.get(parsed).send().await {
            Ok(response) => {
                let elapsed = round2(started.elapsed().as_secs_f64() * 1000.0);
                let code = response.status().as_u16();
                debug!(%url, code, elapsed, "probe finished");
                Some(CheckResult {
                    url,
                    status: CheckStatus::from_status_code(code),
                    time: elapsed,
                    status_code: Some(code),
                    timestamp: Some(Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
                    error: None,
                })
            }
            Err(err) => {
                warn!(%url, "probe failed: {err}");
                let (status, message) = classify_error(&err);
                Some(failure(url, status, message))
            }
        }
    }
}

/// The host slice of an absolute URL, without userinfo or port.
fn host_part(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit('@').next().unwrap_or_default();
    host_port.split(':').next().unwrap_or_default()
}

fn invalid(url: String) -> CheckResult {
    failure(
        url,
        CheckStatus::Invalid,
        "Invalid URL: No domain provided".to_string(),
    )
}

fn failure(url: String, status: CheckStatus, error: String) -> CheckResult {
    CheckResult {
        url,
        status,
        time: 0.0,
        status_code: None,
        timestamp: None,
        error: Some(error),
    }
}

fn classify_error(err: &reqwest::Error) -> (CheckStatus, String) {
    if err.is_timeout() {
        (CheckStatus::Timeout, "Request timed out".to_string())
    } else if err.is_redirect() {
        (CheckStatus::RedirectLoop, "Too many redirects".to_string())
    } else if is_tls_failure(err) {
        (
            CheckStatus::SslError,
            "SSL certificate verification failed".to_string(),
        )
    } else {
        (CheckStatus::Down, error_chain(err))
    }
}

fn causes<'a>(err: &'a (dyn Error + 'static)) -> impl Iterator<Item = &'a (dyn Error + 'static)> {
    std::iter::successors(err.source(), |cause: &&'a (dyn Error + 'static)| (*cause).source())
}

/// rustls errors reach us wrapped in `io::Error`, whose `source()` skips the
/// wrapped value, so both the cause and an io wrapper's payload are checked.
fn is_tls_failure(err: &reqwest::Error) -> bool {
    causes(err).any(|cause| {
        cause.is::<rustls::Error>()
            || cause
                .downcast_ref::<io::Error>()
                .and_then(io::Error::get_ref)
                .is_some_and(|inner| inner.is::<rustls::Error>())
            || mentions_tls(&cause.to_string())
    })
}

fn mentions_tls(text: &str) -> bool {
    let text = text.to_ascii_lowercase();
    ["certificate", "tls", "ssl", "handshake", "corrupt message"]
        .iter()
        .any(|needle| text.contains(needle))
}

/// Top-level message followed by each distinct cause, `": "`-separated.
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    for cause in causes(err) {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
    }
    message
}
