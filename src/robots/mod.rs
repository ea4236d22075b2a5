//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching robots.txt files.
//! Rules are resolved once per host and fail open when the file cannot be used.

mod parser;
mod resolver;

pub use parser::{ParsedRobots, WILDCARD_AGENT};
pub use resolver::{build_robots_client, HostPolicy, RobotsError, RobotsResolver};
