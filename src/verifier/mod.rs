//! Link verification
//!
//! This module handles:
//! - Per-host politeness scheduling
//! - Fetching and classifying a single URL
//! - The per-candidate pipeline and the batch runner

mod fetcher;
mod pipeline;
mod scheduler;
mod types;

pub use fetcher::{build_http_client, fetch_url, FetchResult, MAX_REDIRECTS};
pub use pipeline::Verifier;
pub use scheduler::{effective_delay, AdmitDecision, PolitenessScheduler};
pub use types::{CandidateLink, Outcome, VerificationResult};
