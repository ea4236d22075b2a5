//! Candidate discovery
//!
//! This module handles:
//! - The [`CandidateSource`] seam the verifier pulls batches through
//! - The FOLIO catalog client
//! - The two FOLIO discovery strategies

mod folio;
mod instance_ids;
mod srs;

pub use folio::FolioClient;
pub use instance_ids::{candidate_from_instance, instances_query, Instance, SrsInstanceIdsStrategy};
pub use srs::{candidate_from_record, SrsRecord, SrsStrategy};

use crate::config::{FolioConfig, StrategyKind};
use crate::verifier::CandidateLink;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while talking to the upstream catalog
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("FOLIO returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Login failed: {0}")]
    Login(String),

    #[error("Invalid JSON from FOLIO: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for discovery operations
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Supplies candidate links in offset-addressed batches
#[allow(async_fn_in_trait)]
pub trait CandidateSource {
    /// Number of upstream records the offsets range over
    async fn total_count(&mut self) -> DiscoveryResult<usize>;

    /// Candidates found in the batch starting at `offset`
    ///
    /// A batch may hold fewer candidates than [`CandidateSource::batch_size`]
    /// since records without a usable link are skipped.
    async fn next_batch(&mut self, offset: usize) -> DiscoveryResult<Vec<CandidateLink>>;

    /// Offset step between consecutive batches
    fn batch_size(&self) -> usize;
}

/// A fixed list of candidates, served in slices
#[derive(Debug, Clone)]
pub struct StaticSource {
    links: Vec<CandidateLink>,
    batch_size: usize,
}

impl StaticSource {
    pub fn new(links: Vec<CandidateLink>, batch_size: usize) -> Self {
        Self {
            links,
            batch_size: batch_size.max(1),
        }
    }
}

impl CandidateSource for StaticSource {
    async fn total_count(&mut self) -> DiscoveryResult<usize> {
        Ok(self.links.len())
    }

    async fn next_batch(&mut self, offset: usize) -> DiscoveryResult<Vec<CandidateLink>> {
        let start = offset.min(self.links.len());
        let end = offset.saturating_add(self.batch_size).min(self.links.len());
        Ok(self.links[start..end].to_vec())
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }
}

/// The configured FOLIO strategy
pub enum FolioStrategy {
    Srs(SrsStrategy),
    InstanceIds(SrsInstanceIdsStrategy),
}

impl FolioStrategy {
    /// Logs in and prepares the strategy named in the configuration
    ///
    /// # Arguments
    ///
    /// * `config` - FOLIO connection and paging settings
    /// * `timeout` - Per-request timeout for catalog calls
    /// * `reuse_instance_ids` - Load a cached instance-id list instead of rebuilding it
    pub async fn connect(
        config: &FolioConfig,
        timeout: Duration,
        reuse_instance_ids: bool,
    ) -> DiscoveryResult<Self> {
        let client = FolioClient::connect(config, timeout).await?;

        let strategy = match config.strategy {
            StrategyKind::Srs => Self::Srs(SrsStrategy::new(
                client,
                config.query_limit,
                config.batch_limit,
            )),
            StrategyKind::SrsInstanceIds => Self::InstanceIds(
                SrsInstanceIdsStrategy::load(client, config, reuse_instance_ids).await?,
            ),
        };
        Ok(strategy)
    }
}

impl CandidateSource for FolioStrategy {
    async fn total_count(&mut self) -> DiscoveryResult<usize> {
        match self {
            Self::Srs(strategy) => strategy.total_count().await,
            Self::InstanceIds(strategy) => strategy.total_count().await,
        }
    }

    async fn next_batch(&mut self, offset: usize) -> DiscoveryResult<Vec<CandidateLink>> {
        match self {
            Self::Srs(strategy) => strategy.next_batch(offset).await,
            Self::InstanceIds(strategy) => strategy.next_batch(offset).await,
        }
    }

    fn batch_size(&self) -> usize {
        match self {
            Self::Srs(strategy) => strategy.batch_size(),
            Self::InstanceIds(strategy) => strategy.batch_size(),
        }
    }
}
