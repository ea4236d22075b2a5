//! Output module for verification reports
//!
//! This module handles:
//! - Aggregating a batch of results into report rows
//! - Writing per-batch CSV report files
//! - Recording run statistics

mod csv;
mod report;
pub mod stats;
mod traits;

pub use self::csv::{write_report, CsvReportWriter};
pub use report::{aggregate, render_row, AggregatedReport, ReportColumns};
pub use stats::{format_statistics, log_statistics, RunStatistics};
pub use traits::{MemorySink, OutputError, OutputResult, ReportSink};
