//! SRS discovery strategy
//!
//! Pages through every source record and keeps the ones carrying an
//! electronic location (MARC 856 with `$u`) that is not a linked record
//! (no `$w`).

use crate::discovery::{CandidateSource, DiscoveryResult, FolioClient};
use crate::verifier::CandidateLink;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

const RECORDS_PATH: &str = "/source-storage/records";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SrsRecordPage {
    #[serde(default)]
    records: Vec<SrsRecord>,
    total_records: usize,
}

/// One SRS record, reduced to the parts discovery reads
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SrsRecord {
    #[serde(default)]
    pub external_ids_holder: ExternalIds,
    #[serde(default)]
    pub additional_info: AdditionalInfo,
    pub parsed_record: Option<ParsedRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalIds {
    pub instance_id: Option<String>,
    pub instance_hrid: Option<String>,
}

impl ExternalIds {
    fn is_empty(&self) -> bool {
        self.instance_id.is_none() && self.instance_hrid.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalInfo {
    #[serde(default)]
    pub suppress_discovery: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParsedRecord {
    pub content: MarcContent,
}

/// MARC-in-JSON: each field is a single-key object, tag to value
#[derive(Debug, Clone, Deserialize)]
pub struct MarcContent {
    #[serde(default)]
    pub fields: Vec<HashMap<String, Value>>,
}

/// Extracts the candidate link from an SRS record, if it has one
///
/// Rejected: records without external ids, suppressed records, records
/// without an 856, and records where any 856 has a `$w`. When several
/// `$u` subfields exist the last one wins.
pub fn candidate_from_record(record: &SrsRecord) -> Option<CandidateLink> {
    if record.external_ids_holder.is_empty() || record.additional_info.suppress_discovery {
        return None;
    }

    let fields = &record.parsed_record.as_ref()?.content.fields;
    let mut url = None;

    for field in fields.iter().filter_map(|field| field.get("856")) {
        let subfields = field
            .get("subfields")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for subfield in subfields {
            if subfield.get("w").is_some() {
                return None;
            }
            if let Some(u) = subfield.get("u").and_then(Value::as_str) {
                url = Some(u.to_string());
            }
        }
    }

    url.map(|url| CandidateLink::new(record.external_ids_holder.instance_hrid.clone(), url))
}

/// Discovers candidates by scanning SRS records
pub struct SrsStrategy {
    client: FolioClient,
    query_limit: usize,
    batch_limit: usize,
}

impl SrsStrategy {
    pub fn new(client: FolioClient, query_limit: usize, batch_limit: usize) -> Self {
        Self {
            client,
            query_limit: query_limit.max(1),
            batch_limit: batch_limit.max(1),
        }
    }

    async fn query(&self, offset: usize, limit: usize) -> DiscoveryResult<SrsRecordPage> {
        let params = [
            ("state", "ACTUAL".to_string()),
            ("offset", offset.to_string()),
            ("limit", limit.to_string()),
        ];
        self.client.get_json(RECORDS_PATH, &params).await
    }
}

impl CandidateSource for SrsStrategy {
    async fn total_count(&mut self) -> DiscoveryResult<usize> {
        Ok(self.query(0, 0).await?.total_records)
    }

    async fn next_batch(&mut self, offset: usize) -> DiscoveryResult<Vec<CandidateLink>> {
        let end = offset + self.batch_limit;
        let mut query_offset = offset;
        let mut candidates = Vec::new();

        while query_offset < end {
            let limit = self.query_limit.min(end - query_offset);
            tracing::debug!("Querying SRS records {}..{}", query_offset, query_offset + limit);

            let page = self.query(query_offset, limit).await?;
            let received = page.records.len();
            candidates.extend(page.records.iter().filter_map(candidate_from_record));

            if received < limit {
                break;
            }
            query_offset += limit;
        }

        Ok(candidates)
    }

    fn batch_size(&self) -> usize {
        self.batch_limit
    }
}
