use async_trait::async_trait;
use opinion_core::{DataSource, OpinionError, OpinionResult, RawRecord};
use std::path::PathBuf;

use crate::store::read_csv;

/// Comments shorter than this carry no opinion ("推", "XD")
const MIN_CONTENT_CHARS: usize = 2;

/// Flatten scraped text to a single CSV-friendly line.
pub fn clean_text(text: &str) -> String {
    text.trim()
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .replace(',', "，")
}

/// Imports rows exported by an external collector as a CSV file with the
/// store's column layout.
pub struct CsvImportSource {
    name: String,
    path: PathBuf,
}

impl CsvImportSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("csv:{}", path.display());
        Self { name, path }
    }
}

#[async_trait]
impl DataSource for CsvImportSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn crawl(&mut self) -> OpinionResult<Vec<RawRecord>> {
        let rows = read_csv(&self.path).map_err(|e| OpinionError::Acquisition {
            source_name: self.name.clone(),
            message: e.to_string(),
        })?;

        let total = rows.len();
        let records: Vec<RawRecord> = rows
            .into_iter()
            .map(|mut r| {
                r.content = clean_text(&r.content);
                r
            })
            .filter(|r| r.content.chars().count() >= MIN_CONTENT_CHARS)
            .collect();

        tracing::debug!(
            "{}: kept {} of {} rows",
            self.name,
            records.len(),
            total
        );
        Ok(records)
    }
}
