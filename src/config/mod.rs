//! Configuration module for Folio-Bad-Urls
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every check runs before any record is fetched; an invalid file is fatal.
//!
//! # Example
//!
//! ```no_run
//! use folio_bad_urls::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Default crawl delay: {}s", config.web.default_crawl_delay);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, FolioConfig, LoggingConfig, OutputConfig, ScopeConfig, StrategyKind,
    UrlParserConfig, UserAgentConfig, WebConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
