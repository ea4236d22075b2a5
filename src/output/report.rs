//! Result aggregation
//!
//! Turns a batch of verification results into report rows. Only bad results
//! produce rows. Column presence is fixed per report, never per row.

use crate::url::UrlAnalyzer;
use crate::verifier::VerificationResult;

const BASE_COLUMNS: [&str; 5] = [
    "instance_hrid",
    "url",
    "status_code",
    "permanent_redirect",
    "insecure_url",
];

/// Optional report columns, one per enabled proxy check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportColumns {
    pub no_proxy_prefix: bool,
    pub wrong_proxy_prefix: bool,
}

impl ReportColumns {
    /// Columns matching the checks an analyzer performs
    pub fn for_analyzer(analyzer: &UrlAnalyzer) -> Self {
        Self {
            no_proxy_prefix: analyzer.reports_no_proxy_prefix(),
            wrong_proxy_prefix: analyzer.reports_wrong_proxy_prefix(),
        }
    }

    pub fn header(&self) -> Vec<&'static str> {
        let mut header = BASE_COLUMNS.to_vec();
        if self.no_proxy_prefix {
            header.push("no_proxy_prefix");
        }
        if self.wrong_proxy_prefix {
            header.push("wrong_proxy_prefix");
        }
        header
    }
}

/// Rendered rows for one batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedReport {
    pub header: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    pub bad_count: usize,
}

/// Filters a batch to bad results and renders one row for each
pub fn aggregate(results: &[VerificationResult], columns: ReportColumns) -> AggregatedReport {
    let rows: Vec<Vec<String>> = results
        .iter()
        .filter(|result| result.is_bad())
        .map(|result| render_row(result, columns))
        .collect();

    AggregatedReport {
        header: columns.header(),
        bad_count: rows.len(),
        rows,
    }
}

/// Renders one result as cells aligned with [`ReportColumns::header`]
pub fn render_row(result: &VerificationResult, columns: ReportColumns) -> Vec<String> {
    let mut row = vec![
        result.identifier.clone().unwrap_or_default(),
        result.url.clone(),
        result.outcome.code().to_string(),
        result.permanent_redirect_target.clone().unwrap_or_default(),
        result.lexical.insecure_scheme.to_string(),
    ];
    if columns.no_proxy_prefix {
        row.push(render_flag(result.lexical.missing_proxy_prefix));
    }
    if columns.wrong_proxy_prefix {
        row.push(render_flag(result.lexical.wrong_proxy_prefix));
    }
    row
}

fn render_flag(flag: Option<bool>) -> String {
    flag.map(|value| value.to_string()).unwrap_or_default()
}
