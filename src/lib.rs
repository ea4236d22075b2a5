//! Folio-Bad-Urls: a polite catalog link verifier
//!
//! This crate discovers catalog records carrying external resource links,
//! checks that every link still resolves while respecting robots.txt and
//! per-host crawl delays, and reports broken or policy-violating links.

pub mod config;
pub mod discovery;
pub mod output;
pub mod robots;
pub mod state;
pub mod url;
pub mod verifier;

use thiserror::Error;

/// Main error type for Folio-Bad-Urls operations
#[derive(Debug, Error)]
pub enum LinkCheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Discovery error: {0}")]
    Discovery(#[from] discovery::DiscoveryError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Folio-Bad-Urls operations
pub type Result<T> = std::result::Result<T, LinkCheckError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use url::{accept, LexicalFinding, UrlAnalyzer};
pub use verifier::{CandidateLink, Outcome, VerificationResult, Verifier};
