use opinion_core::{DataSource, OpinionResult, RawRecord};
use serde::Serialize;

use crate::store::RecordStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReport {
    pub source: String,
    pub collected: usize,
    /// Set when the source failed; rows from other sources are still kept
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcquisitionReport {
    pub sources: Vec<SourceReport>,
    /// Rows returned by all sources together
    pub collected: usize,
    /// Rows with content the store had not seen before
    pub added: usize,
    pub stored_total: usize,
}

impl AcquisitionReport {
    pub fn failed_sources(&self) -> Vec<&str> {
        self.sources
            .iter()
            .filter(|s| s.error.is_some())
            .map(|s| s.source.as_str())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.sources.iter().all(|s| s.error.is_none())
    }
}

/// Crawls every source, then merges what was collected into the store in
/// one write.
pub struct AcquisitionPipeline {
    store: RecordStore,
}

impl AcquisitionPipeline {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub async fn run(
        &self,
        sources: &mut [Box<dyn DataSource>],
    ) -> OpinionResult<AcquisitionReport> {
        let mut collected: Vec<RawRecord> = Vec::new();
        let mut reports = Vec::with_capacity(sources.len());

        for source in sources.iter_mut() {
            let name = source.name().to_string();
            tracing::info!("[{}] crawling", name);
            match source.crawl().await {
                Ok(records) => {
                    tracing::info!("[{}] collected {} records", name, records.len());
                    reports.push(SourceReport {
                        source: name,
                        collected: records.len(),
                        error: None,
                    });
                    collected.extend(records);
                }
                Err(e) => {
                    tracing::warn!("[{}] crawl failed: {}", name, e);
                    reports.push(SourceReport {
                        source: name,
                        collected: 0,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let total_collected = collected.len();
        let (added, stored_total) = if collected.is_empty() {
            tracing::info!("No new records; store left untouched");
            (0, self.store.read_raw()?.len())
        } else {
            let stats = self.store.merge_and_save(collected)?;
            (stats.added, stats.stored_total)
        };

        Ok(AcquisitionReport {
            sources: reports,
            collected: total_collected,
            added,
            stored_total,
        })
    }
}
