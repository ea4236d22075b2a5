//! CSV report files
//!
//! One file per processed batch, named after the batch's upstream offset.

use crate::output::report::{aggregate, AggregatedReport, ReportColumns};
use crate::output::traits::{OutputResult, ReportSink};
use crate::verifier::VerificationResult;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes `result_<offset>.csv` files into a directory
#[derive(Debug, Clone)]
pub struct CsvReportWriter {
    dir: PathBuf,
}

impl CsvReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the report file for a batch offset
    pub fn report_path(&self, offset: usize) -> PathBuf {
        self.dir.join(format!("result_{}.csv", offset))
    }
}

impl ReportSink for CsvReportWriter {
    fn write_batch(
        &mut self,
        offset: usize,
        results: &[VerificationResult],
        columns: ReportColumns,
    ) -> OutputResult<usize> {
        let report = aggregate(results, columns);
        fs::create_dir_all(&self.dir)?;
        let path = self.report_path(offset);
        write_report(&report, &path)?;

        tracing::info!(
            "Wrote {} with {} bad URLs",
            path.display(),
            report.bad_count
        );
        Ok(report.bad_count)
    }
}

/// Writes an aggregated report as CSV, header first
pub fn write_report(report: &AggregatedReport, path: &Path) -> OutputResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&report.header)?;
    for row in &report.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
