//! Lexical URL checks
//!
//! These look only at the text of a URL: whether it uses the secure scheme
//! and whether it is routed through the configured access proxy.

use crate::config::UrlParserConfig;
use crate::ConfigError;

const SECURE_SCHEME_PREFIX: &str = "https:";

/// What the lexical checks found for one URL
///
/// The proxy fields are `None` when the corresponding check is disabled, so
/// "not checked" stays distinguishable from "checked and passed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LexicalFinding {
    pub insecure_scheme: bool,
    pub missing_proxy_prefix: Option<bool>,
    pub wrong_proxy_prefix: Option<bool>,
}

/// Stateless per-URL analyzer built from validated configuration
#[derive(Debug, Clone)]
pub struct UrlAnalyzer {
    proxy_prefix: Option<String>,
    proxy_prefix_common_part: String,
    report_no_proxy_prefix: bool,
    report_wrong_proxy_prefix: bool,
}

impl UrlAnalyzer {
    /// Builds an analyzer, rejecting proxy checks that have no prefix to compare with
    pub fn new(config: &UrlParserConfig) -> Result<Self, ConfigError> {
        let proxy_prefix = config
            .proxy_prefix
            .clone()
            .filter(|prefix| !prefix.is_empty());

        if config.report_no_proxy_prefix && proxy_prefix.is_none() {
            return Err(ConfigError::Validation(
                "proxy_prefix is required for report_no_proxy_prefix".to_string(),
            ));
        }
        if config.report_wrong_proxy_prefix && proxy_prefix.is_none() {
            return Err(ConfigError::Validation(
                "proxy_prefix is required for report_wrong_proxy_prefix".to_string(),
            ));
        }

        Ok(Self {
            proxy_prefix,
            proxy_prefix_common_part: config.proxy_prefix_common_part.clone(),
            report_no_proxy_prefix: config.report_no_proxy_prefix,
            report_wrong_proxy_prefix: config.report_wrong_proxy_prefix,
        })
    }

    pub fn reports_no_proxy_prefix(&self) -> bool {
        self.report_no_proxy_prefix
    }

    pub fn reports_wrong_proxy_prefix(&self) -> bool {
        self.report_wrong_proxy_prefix
    }

    /// Runs every enabled check against `url`
    pub fn analyze(&self, url: &str) -> LexicalFinding {
        LexicalFinding {
            insecure_scheme: !url.starts_with(SECURE_SCHEME_PREFIX),
            missing_proxy_prefix: self.check_missing_proxy_prefix(url),
            wrong_proxy_prefix: self.check_wrong_proxy_prefix(url),
        }
    }

    fn check_missing_proxy_prefix(&self, url: &str) -> Option<bool> {
        if !self.report_no_proxy_prefix {
            return None;
        }
        let prefix = self.proxy_prefix.as_deref()?;
        Some(!url.starts_with(prefix))
    }

    /// Looks proxied (carries the common marker) but not through our proxy host
    fn check_wrong_proxy_prefix(&self, url: &str) -> Option<bool> {
        if !self.report_wrong_proxy_prefix {
            return None;
        }
        let prefix = self.proxy_prefix.as_deref()?;
        Some(url.contains(&self.proxy_prefix_common_part) && !url.starts_with(prefix))
    }
}
