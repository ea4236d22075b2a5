use crate::url::LexicalFinding;
use std::fmt;

/// An (identifier, URL) pair to be verified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLink {
    /// Catalog record identifier (e.g. an instance HRID)
    pub identifier: Option<String>,
    pub url: String,
}

impl CandidateLink {
    pub fn new(identifier: Option<String>, url: impl Into<String>) -> Self {
        Self {
            identifier,
            url: url.into(),
        }
    }
}

/// Classification of one verification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The server answered with this status
    HttpStatus(u16),
    /// No HTTP status was obtained (timeout, DNS, TLS, connection, redirect loop)
    TransportFailure,
    /// The host's robots.txt forbids the URL
    RobotsBlocked,
    /// The politeness wait for the host exceeded the ceiling
    ExcessiveWait,
}

impl Outcome {
    pub const TRANSPORT_FAILURE_CODE: i32 = 0;
    pub const ROBOTS_BLOCKED_CODE: i32 = -10;
    pub const EXCESSIVE_WAIT_CODE: i32 = -11;

    /// Single numeric code for the report column
    ///
    /// HTTP statuses map to themselves; the synthetic outcomes use values
    /// outside the HTTP range.
    pub fn code(&self) -> i32 {
        match self {
            Self::HttpStatus(status) => i32::from(*status),
            Self::TransportFailure => Self::TRANSPORT_FAILURE_CODE,
            Self::RobotsBlocked => Self::ROBOTS_BLOCKED_CODE,
            Self::ExcessiveWait => Self::EXCESSIVE_WAIT_CODE,
        }
    }

    /// Anything but a plain 200 is worth reporting
    pub fn is_bad(&self) -> bool {
        !matches!(self, Self::HttpStatus(200))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpStatus(status) => write!(f, "HTTP {}", status),
            Self::TransportFailure => write!(f, "transport failure"),
            Self::RobotsBlocked => write!(f, "blocked by robots.txt"),
            Self::ExcessiveWait => write!(f, "excessive crawl delay"),
        }
    }
}

/// Everything learned about one candidate link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub identifier: Option<String>,
    pub url: String,
    pub outcome: Outcome,
    /// Destination of the last permanent redirect, when it differs from `url`
    pub permanent_redirect_target: Option<String>,
    pub lexical: LexicalFinding,
}

impl VerificationResult {
    pub fn is_bad(&self) -> bool {
        self.outcome.is_bad()
    }
}
