//! Verification pipeline
//!
//! This module contains the per-candidate control flow and the batch loop:
//! - Scope filtering and lexical analysis
//! - Robots.txt lookup and the politeness wait
//! - Fetching and classification
//! - Handing each processed batch to a report sink

use crate::config::{Config, ScopeConfig};
use crate::discovery::CandidateSource;
use crate::output::{ReportColumns, ReportSink, RunStatistics};
use crate::robots::{build_robots_client, RobotsResolver};
use crate::url::{accept, host_key, UrlAnalyzer};
use crate::verifier::{
    build_http_client, fetch_url, AdmitDecision, CandidateLink, FetchResult, Outcome,
    PolitenessScheduler, VerificationResult,
};
use crate::Result;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Checks candidate links one at a time, politely
pub struct Verifier {
    client: Client,
    robots: RobotsResolver,
    scheduler: PolitenessScheduler,
    analyzer: UrlAnalyzer,
    scope: ScopeConfig,
    default_delay: Duration,
    max_delay: Duration,
}

impl Verifier {
    /// Creates a verifier from the run configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Verifier)` - Ready to check links
    /// * `Err(LinkCheckError)` - HTTP client or URL analyzer setup failed
    pub fn new(config: &Config) -> Result<Self> {
        let timeout = config.web.timeout();
        let client = build_http_client(&config.user_agent, timeout)?;
        let robots_client = build_robots_client(&config.user_agent, timeout)?;

        Ok(Self {
            client,
            robots: RobotsResolver::new(robots_client),
            scheduler: PolitenessScheduler::new(),
            analyzer: UrlAnalyzer::new(&config.url_parser)?,
            scope: config.scope.clone(),
            default_delay: config.web.default_delay(),
            max_delay: config.web.max_delay(),
        })
    }

    /// Optional report columns enabled by the URL parser settings
    pub fn report_columns(&self) -> ReportColumns {
        ReportColumns::for_analyzer(&self.analyzer)
    }

    pub fn robots(&self) -> &RobotsResolver {
        &self.robots
    }

    pub fn scheduler(&self) -> &PolitenessScheduler {
        &self.scheduler
    }

    /// Verifies one candidate
    ///
    /// Returns `None` when the scope filter rejects the URL; no network
    /// access happens in that case.
    pub async fn verify(&mut self, candidate: &CandidateLink) -> Option<VerificationResult> {
        if !accept(&candidate.url, &self.scope.allow, &self.scope.block) {
            tracing::debug!("Out of scope: {}", candidate.url);
            return None;
        }

        let lexical = self.analyzer.analyze(&candidate.url);
        let fetched = self.check(&candidate.url).await;
        tracing::debug!("{} -> {}", candidate.url, fetched.outcome);

        Some(VerificationResult {
            identifier: candidate.identifier.clone(),
            url: candidate.url.clone(),
            outcome: fetched.outcome,
            permanent_redirect_target: fetched.permanent_redirect_target,
            lexical,
        })
    }

    /// Verifies candidates in order, dropping out-of-scope ones
    pub async fn verify_batch(&mut self, candidates: &[CandidateLink]) -> Vec<VerificationResult> {
        let mut results = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if let Some(result) = self.verify(candidate).await {
                results.push(result);
            }
        }
        results
    }

    /// Processes batches from `source` into `sink`
    ///
    /// Starting at `start`, batches are processed while the offset is below
    /// both the source's total and `end`; the offset advances by the source's
    /// batch size whether or not the batch held any candidates.
    pub async fn run<S, W>(
        &mut self,
        source: &mut S,
        sink: &mut W,
        start: usize,
        end: Option<usize>,
    ) -> Result<RunStatistics>
    where
        S: CandidateSource,
        W: ReportSink,
    {
        let total = source.total_count().await?;
        let end = end.unwrap_or(usize::MAX);
        let step = source.batch_size().max(1);
        let columns = self.report_columns();

        tracing::info!(
            "Checking from offset {} of {} records, {} per batch",
            start,
            total,
            step
        );

        let mut stats = RunStatistics::new();
        let mut offset = start;

        while offset < total && offset < end {
            let candidates = source.next_batch(offset).await?;
            let results = self.verify_batch(&candidates).await;
            let bad = sink.write_batch(offset, &results, columns)?;
            stats.record_batch(candidates.len(), &results);

            tracing::info!(
                "Offset {}: {} candidates, {} checked, {} bad",
                offset,
                candidates.len(),
                results.len(),
                bad
            );
            offset += step;
        }

        stats.finish();
        Ok(stats)
    }

    async fn check(&mut self, url: &str) -> FetchResult {
        let url = url.trim();
        let Some(host) = Url::parse(url).ok().as_ref().and_then(host_key) else {
            tracing::debug!("No usable host in {}", url);
            return FetchResult::transport_failure();
        };

        let (allowed, hint) = {
            let policy = self.robots.rules_for(&host).await;
            (policy.can_fetch(url), policy.crawl_delay())
        };
        if !allowed {
            tracing::debug!("Blocked by robots.txt: {}", url);
            return FetchResult::without_redirect(Outcome::RobotsBlocked);
        }

        match self
            .scheduler
            .admit(&host, hint, self.default_delay, self.max_delay)
        {
            AdmitDecision::Immediate => {}
            AdmitDecision::WaitThen(wait) => {
                tracing::debug!("Waiting {:?} before {}", wait, url);
                tokio::time::sleep(wait).await;
            }
            AdmitDecision::Reject => {
                return FetchResult::without_redirect(Outcome::ExcessiveWait);
            }
        }

        fetch_url(&self.client, url).await
    }
}
