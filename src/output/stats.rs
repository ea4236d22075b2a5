//! Run statistics
//!
//! Tallies what a run saw so the end-of-run summary can be logged or printed.

use crate::verifier::{Outcome, VerificationResult};
use chrono::{DateTime, Utc};

/// Counters for one verification run
#[derive(Debug, Clone)]
pub struct RunStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Batches processed
    pub batches: u64,

    /// Candidates received from discovery
    pub candidates: u64,

    /// Candidates that passed the scope filter and were checked
    pub checked: u64,

    /// Checked links with any outcome other than HTTP 200
    pub bad: u64,

    pub http_errors: u64,
    pub transport_failures: u64,
    pub robots_blocked: u64,
    pub excessive_wait: u64,

    /// Bad results that carried a permanent redirect target
    pub permanent_redirects: u64,

    /// Checked links not using https
    pub insecure: u64,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            batches: 0,
            candidates: 0,
            checked: 0,
            bad: 0,
            http_errors: 0,
            transport_failures: 0,
            robots_blocked: 0,
            excessive_wait: 0,
            permanent_redirects: 0,
            insecure: 0,
        }
    }

    /// Adds one processed batch
    pub fn record_batch(&mut self, candidates: usize, results: &[VerificationResult]) {
        self.batches += 1;
        self.candidates += candidates as u64;
        self.checked += results.len() as u64;

        for result in results {
            if result.lexical.insecure_scheme {
                self.insecure += 1;
            }
            if !result.is_bad() {
                continue;
            }
            self.bad += 1;
            if result.permanent_redirect_target.is_some() {
                self.permanent_redirects += 1;
            }
            match result.outcome {
                Outcome::HttpStatus(_) => self.http_errors += 1,
                Outcome::TransportFailure => self.transport_failures += 1,
                Outcome::RobotsBlocked => self.robots_blocked += 1,
                Outcome::ExcessiveWait => self.excessive_wait += 1,
            }
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Candidates dropped by the scope filter
    pub fn out_of_scope(&self) -> u64 {
        self.candidates.saturating_sub(self.checked)
    }
}

impl Default for RunStatistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats statistics for display
pub fn format_statistics(stats: &RunStatistics) -> String {
    let mut out = String::new();

    out.push_str("=== Link Check Statistics ===\n\n");
    out.push_str(&format!("Started: {}\n", stats.started_at.to_rfc3339()));
    if let Some(finished) = stats.finished_at {
        out.push_str(&format!("Finished: {}\n", finished.to_rfc3339()));
    }
    if let Some(seconds) = stats.duration_seconds() {
        out.push_str(&format!("Duration: {} seconds\n", seconds));
    }

    out.push_str(&format!("\nBatches: {}\n", stats.batches));
    out.push_str(&format!("Candidates: {}\n", stats.candidates));
    out.push_str(&format!("Out of scope: {}\n", stats.out_of_scope()));
    out.push_str(&format!("Checked: {}\n", stats.checked));
    out.push_str(&format!("Insecure (http): {}\n", stats.insecure));

    out.push_str(&format!("\nBad URLs: {}\n", stats.bad));
    out.push_str(&format!("  HTTP errors: {}\n", stats.http_errors));
    out.push_str(&format!("  Transport failures: {}\n", stats.transport_failures));
    out.push_str(&format!("  Blocked by robots.txt: {}\n", stats.robots_blocked));
    out.push_str(&format!("  Excessive crawl delay: {}\n", stats.excessive_wait));
    out.push_str(&format!(
        "  With permanent redirect: {}\n",
        stats.permanent_redirects
    ));

    out
}

/// Logs a one-line summary at info level
pub fn log_statistics(stats: &RunStatistics) {
    tracing::info!(
        "Run complete: {} batches, {} checked, {} bad ({} http, {} transport, {} robots, {} wait)",
        stats.batches,
        stats.checked,
        stats.bad,
        stats.http_errors,
        stats.transport_failures,
        stats.robots_blocked,
        stats.excessive_wait
    );
}
