//! SRS instance-ids discovery strategy
//!
//! Asks SRS up front for the instances whose MARC has an 856 `$u` but no
//! 856 `$w`, then fetches those instances from inventory in chunks. The id
//! list is cached as JSON so later runs can page over the same ordering.

use crate::config::FolioConfig;
use crate::discovery::{CandidateSource, DiscoveryResult, FolioClient};
use crate::verifier::CandidateLink;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const IDENTIFIERS_PATH: &str = "/source-storage/stream/marc-record-identifiers";
const INSTANCES_PATH: &str = "/inventory/instances";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdentifierQuery {
    fields_search_expression: String,
}

#[derive(Deserialize)]
struct IdentifierList {
    #[serde(default)]
    records: Vec<String>,
}

#[derive(Deserialize)]
struct InstancePage {
    #[serde(default)]
    instances: Vec<Instance>,
}

/// Inventory instance, reduced to the parts discovery reads
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub hrid: Option<String>,
    #[serde(default)]
    pub discovery_suppress: bool,
    #[serde(default)]
    pub electronic_access: Vec<ElectronicAccess>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElectronicAccess {
    pub uri: Option<String>,
}

/// Extracts the candidate link from an instance, if it has one
///
/// Suppressed instances are skipped; the first electronic-access URI is used.
pub fn candidate_from_instance(instance: &Instance) -> Option<CandidateLink> {
    if instance.discovery_suppress {
        return None;
    }
    let uri = instance.electronic_access.first()?.uri.as_deref()?;
    if uri.trim().is_empty() {
        return None;
    }
    Some(CandidateLink::new(instance.hrid.clone(), uri))
}

/// Builds the CQL query selecting exactly `ids`
pub fn instances_query(ids: &[String]) -> String {
    let clauses: Vec<String> = ids.iter().map(|id| format!("id==\"{}\"", id)).collect();
    format!("({})", clauses.join(" or "))
}

/// Discovers candidates from a pre-selected instance-id list
pub struct SrsInstanceIdsStrategy {
    client: FolioClient,
    query_limit: usize,
    batch_limit: usize,
    instance_ids: Vec<String>,
}

impl SrsInstanceIdsStrategy {
    /// Loads the id list from cache or builds it from SRS
    ///
    /// The cache at `instance-ids-path` is only read when `reuse` is set
    /// and the file exists; a freshly built list always overwrites it.
    pub async fn load(
        client: FolioClient,
        config: &FolioConfig,
        reuse: bool,
    ) -> DiscoveryResult<Self> {
        let cache_path = PathBuf::from(&config.instance_ids_path);

        let instance_ids = if reuse && cache_path.exists() {
            let ids = read_cache(&cache_path)?;
            tracing::info!("Loaded {} instance ids from {}", ids.len(), cache_path.display());
            ids
        } else {
            let ids = build_id_list(&client).await?;
            write_cache(&cache_path, &ids)?;
            tracing::info!("Cached {} instance ids in {}", ids.len(), cache_path.display());
            ids
        };

        Ok(Self::with_ids(
            client,
            config.query_limit,
            config.batch_limit,
            instance_ids,
        ))
    }

    pub fn with_ids(
        client: FolioClient,
        query_limit: usize,
        batch_limit: usize,
        instance_ids: Vec<String>,
    ) -> Self {
        Self {
            client,
            query_limit: query_limit.max(1),
            batch_limit: batch_limit.max(1),
            instance_ids,
        }
    }

    pub fn instance_ids(&self) -> &[String] {
        &self.instance_ids
    }

    async fn query_instances(&self, ids: &[String]) -> DiscoveryResult<Vec<Instance>> {
        let params = [
            ("query", instances_query(ids)),
            ("limit", ids.len().to_string()),
        ];
        let page: InstancePage = self.client.get_json(INSTANCES_PATH, &params).await?;
        Ok(page.instances)
    }
}

impl CandidateSource for SrsInstanceIdsStrategy {
    async fn total_count(&mut self) -> DiscoveryResult<usize> {
        Ok(self.instance_ids.len())
    }

    async fn next_batch(&mut self, offset: usize) -> DiscoveryResult<Vec<CandidateLink>> {
        let start = offset.min(self.instance_ids.len());
        let end = (offset + self.batch_limit).min(self.instance_ids.len());
        let mut candidates = Vec::new();

        for chunk in self.instance_ids[start..end].chunks(self.query_limit) {
            tracing::debug!("Querying {} instances", chunk.len());
            let instances = self.query_instances(chunk).await?;
            candidates.extend(instances.iter().filter_map(candidate_from_instance));
        }

        Ok(candidates)
    }

    fn batch_size(&self) -> usize {
        self.batch_limit
    }
}

/// Ids with 856$u minus ids with 856$w, sorted for a stable offset order
async fn build_id_list(client: &FolioClient) -> DiscoveryResult<Vec<String>> {
    let with_u = ids_with_subfield(client, "856", "u").await?;
    let with_w: HashSet<String> = ids_with_subfield(client, "856", "w").await?.into_iter().collect();
    tracing::debug!("{} ids with 856$u, {} with 856$w", with_u.len(), with_w.len());

    let mut ids: Vec<String> = with_u
        .into_iter()
        .filter(|id| !with_w.contains(id))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    ids.sort();
    Ok(ids)
}

async fn ids_with_subfield(
    client: &FolioClient,
    field: &str,
    subfield: &str,
) -> DiscoveryResult<Vec<String>> {
    let query = IdentifierQuery {
        fields_search_expression: format!("{}.{} is 'present'", field, subfield),
    };
    let list: IdentifierList = client.post_json(IDENTIFIERS_PATH, &query).await?;
    Ok(list.records)
}

fn read_cache(path: &Path) -> DiscoveryResult<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn write_cache(path: &Path, ids: &[String]) -> DiscoveryResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string(ids)?)?;
    Ok(())
}
