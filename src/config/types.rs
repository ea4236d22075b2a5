use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Folio-Bad-Urls
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub folio: FolioConfig,
    pub web: WebConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub scope: ScopeConfig,
    #[serde(rename = "url-parser", default)]
    pub url_parser: UrlParserConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which upstream discovery algorithm to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Page through every SRS record and filter locally
    Srs,
    /// Pre-select instance ids with 856$u and no 856$w, then page through those
    SrsInstanceIds,
}

/// Connection and paging settings for the FOLIO catalog
#[derive(Debug, Clone, Deserialize)]
pub struct FolioConfig {
    /// Base URL of the Okapi gateway
    #[serde(rename = "okapi-url")]
    pub okapi_url: String,

    #[serde(rename = "tenant-id")]
    pub tenant_id: String,

    pub username: String,

    pub password: String,

    pub strategy: StrategyKind,

    /// Records requested per upstream API call
    #[serde(rename = "query-limit")]
    pub query_limit: usize,

    /// Records covered by one processed batch (and one report file)
    #[serde(rename = "batch-limit")]
    pub batch_limit: usize,

    /// Where the instance-id list is cached between runs
    #[serde(rename = "instance-ids-path", default = "default_instance_ids_path")]
    pub instance_ids_path: String,
}

/// Politeness and timeout settings, all in seconds
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Minimum time between requests to the same host
    #[serde(rename = "default-crawl-delay")]
    pub default_crawl_delay: f64,

    /// Longest politeness wait tolerated before a host is skipped
    #[serde(rename = "max-crawl-delay")]
    pub max_crawl_delay: f64,

    #[serde(rename = "request-timeout")]
    pub request_timeout: f64,
}

/// The conversions below expect values accepted by [`crate::config::validate`]
impl WebConfig {
    pub fn default_delay(&self) -> Duration {
        Duration::from_secs_f64(self.default_crawl_delay)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_secs_f64(self.max_crawl_delay)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.request_timeout)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the checker
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the checker
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the checker
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for checker-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Substring allow/block lists
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScopeConfig {
    #[serde(default)]
    pub allow: Vec<String>,

    #[serde(default)]
    pub block: Vec<String>,
}

/// Lexical URL checks
#[derive(Debug, Clone, Deserialize)]
pub struct UrlParserConfig {
    #[serde(rename = "proxy-prefix")]
    pub proxy_prefix: Option<String>,

    /// Marker that every proxied URL contains, whatever the proxy host
    #[serde(
        rename = "proxy-prefix-common-part",
        default = "default_proxy_prefix_common_part"
    )]
    pub proxy_prefix_common_part: String,

    #[serde(rename = "report-no-proxy-prefix", default)]
    pub report_no_proxy_prefix: bool,

    #[serde(rename = "report-wrong-proxy-prefix", default)]
    pub report_wrong_proxy_prefix: bool,
}

impl Default for UrlParserConfig {
    fn default() -> Self {
        Self {
            proxy_prefix: None,
            proxy_prefix_common_part: default_proxy_prefix_common_part(),
            report_no_proxy_prefix: false,
            report_wrong_proxy_prefix: false,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the `result_<offset>.csv` files
    #[serde(rename = "report-dir", default = "default_report_dir")]
    pub report_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_dir: default_report_dir(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Log to this file instead of stderr
    #[serde(rename = "log-file")]
    pub log_file: Option<String>,
}

fn default_instance_ids_path() -> String {
    "instance_ids.json".to_string()
}

fn default_proxy_prefix_common_part() -> String {
    "?url=".to_string()
}

fn default_report_dir() -> String {
    ".".to_string()
}
