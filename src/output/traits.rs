//! Output sink traits and errors
//!
//! The verifier hands each processed batch to a [`ReportSink`]; the sink owns
//! all file and storage mechanics.

use crate::output::ReportColumns;
use crate::verifier::VerificationResult;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write CSV report: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Receives verification results one batch at a time
pub trait ReportSink {
    /// Records one batch of results
    ///
    /// # Arguments
    ///
    /// * `offset` - Upstream offset the batch started at
    /// * `results` - Results in input order, good and bad alike
    /// * `columns` - Optional columns enabled for this report
    ///
    /// # Returns
    ///
    /// The number of bad results written
    fn write_batch(
        &mut self,
        offset: usize,
        results: &[VerificationResult],
        columns: ReportColumns,
    ) -> OutputResult<usize>;
}

/// Keeps every batch in memory
///
/// Useful for library callers that render results themselves.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub batches: Vec<(usize, Vec<VerificationResult>)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All results across batches, in order
    pub fn results(&self) -> impl Iterator<Item = &VerificationResult> {
        self.batches.iter().flat_map(|(_, results)| results.iter())
    }
}

impl ReportSink for MemorySink {
    fn write_batch(
        &mut self,
        offset: usize,
        results: &[VerificationResult],
        _columns: ReportColumns,
    ) -> OutputResult<usize> {
        self.batches.push((offset, results.to_vec()));
        Ok(results.iter().filter(|r| r.is_bad()).count())
    }
}
