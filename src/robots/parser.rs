//! Robots.txt parser implementation
//!
//! Permission rules are evaluated with the robotstxt crate. The crate does
//! not expose `Crawl-delay`, so that directive is read here directly.

use robotstxt::DefaultMatcher;
use std::time::Duration;

/// Agent name whose rules apply to us
pub const WILDCARD_AGENT: &str = "*";

/// Largest crawl delay taken from a robots.txt, in seconds (one day)
pub const MAX_CRAWL_DELAY_SECS: f64 = 86_400.0;

/// Parsed robots.txt data
///
/// Holds the raw file and the wildcard group's crawl delay, extracted once.
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content
    content: String,
    /// Crawl-delay from the `User-agent: *` group
    crawl_delay: Option<Duration>,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            crawl_delay: parse_wildcard_crawl_delay(content),
        }
    }

    /// Checks if a URL is allowed for the wildcard agent
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL (or path) to check
    pub fn is_allowed(&self, url: &str) -> bool {
        if self.content.is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, WILDCARD_AGENT, url)
    }

    /// Gets the crawl delay declared for the wildcard agent
    pub fn crawl_delay(&self) -> Option<Duration> {
        self.crawl_delay
    }
}

/// Finds `Crawl-delay` inside a group that names `*`
///
/// Consecutive `User-agent` lines share one group; any other directive closes
/// the agent list so the next `User-agent` line starts a fresh group.
fn parse_wildcard_crawl_delay(content: &str) -> Option<Duration> {
    let mut group_agents: Vec<String> = Vec::new();
    let mut in_agent_list = false;

    for line in content.lines() {
        // Strip trailing comments
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();

        match key.as_str() {
            "user-agent" => {
                if !in_agent_list {
                    group_agents.clear();
                    in_agent_list = true;
                }
                group_agents.push(value.to_lowercase());
            }
            "crawl-delay" => {
                in_agent_list = false;
                if group_agents.iter().any(|agent| agent == WILDCARD_AGENT) {
                    if let Some(delay) = parse_delay_seconds(value) {
                        return Some(delay);
                    }
                }
            }
            _ => {
                in_agent_list = false;
            }
        }
    }

    None
}

/// Reads a delay in seconds; non-finite or negative values are ignored and
/// anything above [`MAX_CRAWL_DELAY_SECS`] is clamped to it
fn parse_delay_seconds(value: &str) -> Option<Duration> {
    let seconds = value.parse::<f64>().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(seconds.min(MAX_CRAWL_DELAY_SECS)).ok()
}
