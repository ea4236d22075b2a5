//! Per-host robots.txt cache
//!
//! Each host's robots.txt is fetched at most once per run. Any failure is
//! remembered as "no rules" and the host is treated as fully crawlable.

use crate::config::UserAgentConfig;
use crate::robots::ParsedRobots;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Why a robots.txt could not be used
#[derive(Debug, Error)]
pub enum RobotsError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(StatusCode),
}

/// Cached robots.txt state for one host
#[derive(Debug, Clone)]
pub struct HostPolicy {
    rules: Option<ParsedRobots>,
}

impl HostPolicy {
    pub fn loaded(rules: ParsedRobots) -> Self {
        Self { rules: Some(rules) }
    }

    /// Policy for a host whose robots.txt could not be obtained
    pub fn unavailable() -> Self {
        Self { rules: None }
    }

    pub fn rules_loaded(&self) -> bool {
        self.rules.is_some()
    }

    /// Whether `url` may be fetched; always true without loaded rules
    pub fn can_fetch(&self, url: &str) -> bool {
        self.rules
            .as_ref()
            .map_or(true, |rules| rules.is_allowed(url))
    }

    /// Crawl-delay hint; always `None` without loaded rules
    pub fn crawl_delay(&self) -> Option<Duration> {
        self.rules.as_ref().and_then(ParsedRobots::crawl_delay)
    }
}

/// Builds the client used for robots.txt requests
///
/// Unlike link checks, robots.txt requests follow redirects automatically.
pub fn build_robots_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .redirect(Policy::limited(5))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches and caches robots.txt rules keyed by host
pub struct RobotsResolver {
    client: Client,
    policies: HashMap<String, HostPolicy>,
}

impl RobotsResolver {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            policies: HashMap::new(),
        }
    }

    /// Returns the policy for `host`, fetching robots.txt on first reference
    ///
    /// # Arguments
    ///
    /// * `host` - Host key as produced by [`crate::url::host_key`]
    pub async fn rules_for(&mut self, host: &str) -> &HostPolicy {
        if !self.policies.contains_key(host) {
            let policy = self.load(host).await;
            self.policies.insert(host.to_string(), policy);
        }
        &self.policies[host]
    }

    /// Returns the cached policy without fetching
    pub fn cached(&self, host: &str) -> Option<&HostPolicy> {
        self.policies.get(host)
    }

    /// Number of hosts seen so far
    pub fn host_count(&self) -> usize {
        self.policies.len()
    }

    async fn load(&self, host: &str) -> HostPolicy {
        let robots_url = format!("{}/robots.txt", host);
        tracing::debug!("Fetching robots.txt: {}", robots_url);

        match self.fetch(&robots_url).await {
            Ok(content) => {
                let rules = ParsedRobots::from_content(&content);
                if let Some(delay) = rules.crawl_delay() {
                    tracing::debug!("robots.txt for {} sets crawl-delay {:?}", host, delay);
                }
                HostPolicy::loaded(rules)
            }
            Err(e) => {
                tracing::warn!(
                    "robots.txt unavailable for {} ({}), allowing all URLs",
                    host,
                    e
                );
                HostPolicy::unavailable()
            }
        }
    }

    async fn fetch(&self, robots_url: &str) -> Result<String, RobotsError> {
        let response = self.client.get(robots_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RobotsError::Status(status));
        }
        Ok(response.text().await?)
    }
}
