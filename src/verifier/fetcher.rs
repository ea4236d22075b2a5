//! HTTP fetcher implementation
//!
//! This module handles the link check request itself, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests with a fixed timeout
//! - Manual redirect handling, to observe permanent redirects
//! - Error classification

use crate::config::UserAgentConfig;
use crate::verifier::Outcome;
use reqwest::{header::LOCATION, redirect::Policy, Client, Response, StatusCode};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Longest redirect chain followed before giving up
pub const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub outcome: Outcome,
    /// Target of the last permanent redirect, if it differs from the requested URL
    pub permanent_redirect_target: Option<String>,
}

impl FetchResult {
    /// Result for an attempt that never saw a redirect
    pub fn without_redirect(outcome: Outcome) -> Self {
        Self {
            outcome,
            permanent_redirect_target: None,
        }
    }

    pub fn transport_failure() -> Self {
        Self::without_redirect(Outcome::TransportFailure)
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Per-request timeout
///
/// # Example
///
/// ```no_run
/// use folio_bad_urls::config::UserAgentConfig;
/// use folio_bad_urls::verifier::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "FolioBadUrls".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://library.example.edu/about".to_string(),
///     contact_email: "admin@example.edu".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .redirect(Policy::none()) // Handle redirects manually
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// # Request Flow
///
/// 1. Send GET request
/// 2. Follow redirects manually (max 10 hops), remembering the last
///    permanent (301/308) target
/// 3. Report the final status
///
/// # Classification
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | Final response received | `HttpStatus(code)` |
/// | Timeout | `TransportFailure` |
/// | Connection refused, DNS, TLS error | `TransportFailure` |
/// | Unparseable URL | `TransportFailure` |
/// | Redirect loop | `TransportFailure` |
/// | Redirect chain > 10 | `TransportFailure` |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let mut current = match Url::parse(url.trim()) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!("Cannot parse URL {}: {}", url, e);
            return FetchResult::transport_failure();
        }
    };

    let mut visited = HashSet::new();
    let mut last_permanent: Option<Url> = None;

    for _ in 0..=MAX_REDIRECTS {
        visited.insert(current.to_string());

        let response = match client.get(current.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                log_transport_error(url, &e);
                return FetchResult::transport_failure();
            }
        };

        let status = response.status();
        let next = if status.is_redirection() {
            redirect_target(&current, &response)
        } else {
            None
        };

        let Some(next) = next else {
            tracing::debug!("Got status {} for {}", status.as_u16(), url);
            return FetchResult {
                outcome: Outcome::HttpStatus(status.as_u16()),
                permanent_redirect_target: changed_target(url, last_permanent.as_ref()),
            };
        };

        if is_permanent_redirect(status) {
            last_permanent = Some(next.clone());
        }

        if visited.contains(next.as_str()) {
            tracing::debug!("Redirect loop detected at {} for {}", next, url);
            return FetchResult::transport_failure();
        }

        current = next;
    }

    tracing::debug!("Too many redirects from {}", url);
    FetchResult::transport_failure()
}

fn is_permanent_redirect(status: StatusCode) -> bool {
    status == StatusCode::MOVED_PERMANENTLY || status == StatusCode::PERMANENT_REDIRECT
}

/// Resolves the Location header against the URL that produced it
fn redirect_target(current: &Url, response: &Response) -> Option<Url> {
    let location = response.headers().get(LOCATION)?.to_str().ok()?;
    current.join(location.trim()).ok()
}

/// Surfaces the permanent target only when it actually moves the link
fn changed_target(requested: &str, target: Option<&Url>) -> Option<String> {
    let target = target?.as_str().trim();
    if target == requested.trim() {
        None
    } else {
        Some(target.to_string())
    }
}

fn log_transport_error(url: &str, error: &reqwest::Error) {
    if error.is_timeout() {
        tracing::debug!("Request timeout for {}", url);
    } else if error.is_connect() {
        tracing::debug!("Connection failed for {}: {}", url, error);
    } else {
        tracing::debug!("Request error for {}: {}", url, error);
    }
}
