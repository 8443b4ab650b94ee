//! CSV-backed record store.
//!
//! The persisted batch only ever holds `date,source,content,link`. Labels are
//! derived on every load and never written back.

use opinion_core::{OpinionError, OpinionResult, RawRecord, Record};
use sentiment_analysis::SentimentEngine;
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use trend_analysis::DateNormalizer;

const UTF8_BOM: &str = "\u{feff}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    /// Rows handed in by the caller
    pub incoming: usize,
    /// Incoming rows whose content was not stored before
    pub added: usize,
    /// Rows in the store after the merge
    pub stored_total: usize,
}

#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(false)` when the file does not exist yet but could be created.
    fn check_available(&self) -> OpinionResult<bool> {
        if self.path.is_dir() {
            return Err(OpinionError::StoreUnavailable(format!(
                "{} is a directory",
                self.path.display()
            )));
        }
        if self.path.exists() {
            return Ok(true);
        }
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
                Err(OpinionError::StoreUnavailable(format!(
                    "parent directory of {} does not exist",
                    self.path.display()
                )))
            }
            _ => Ok(false),
        }
    }

    /// Raw rows as persisted. An uninitialized store reads as empty.
    pub fn read_raw(&self) -> OpinionResult<Vec<RawRecord>> {
        if !self.check_available()? {
            tracing::info!("Store {} not initialized yet", self.path.display());
            return Ok(Vec::new());
        }
        read_csv(&self.path)
    }

    /// Load the whole batch: normalize dates and recompute every label.
    pub fn load(
        &self,
        engine: &SentimentEngine,
        normalizer: &DateNormalizer,
    ) -> OpinionResult<Vec<Record>> {
        let raw = self.read_raw()?;
        let records = label_records(raw, engine, normalizer);
        let undated = records.iter().filter(|r| r.date.is_none()).count();
        tracing::info!(
            "Loaded {} records from {} ({} without a usable date)",
            records.len(),
            self.path.display(),
            undated
        );
        Ok(records)
    }

    /// Replace the store contents. Writes a sibling temp file and renames it
    /// over the target, so a failure leaves the previous batch intact.
    pub fn write_raw(&self, records: &[RawRecord]) -> OpinionResult<()> {
        self.check_available()?;
        let tmp = temp_path(&self.path);

        let result = write_csv(&tmp, records).and_then(|_| {
            fs::rename(&tmp, &self.path).map_err(OpinionError::from)
        });
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result?;

        tracing::info!("Persisted {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Merge new rows into the stored batch, deduplicating by content.
    pub fn merge_and_save(&self, incoming: Vec<RawRecord>) -> OpinionResult<MergeStats> {
        let existing = self.read_raw()?;
        let known: HashSet<&str> = existing.iter().map(|r| r.content.as_str()).collect();
        let added = incoming
            .iter()
            .map(|r| r.content.as_str())
            .filter(|c| !known.contains(c))
            .collect::<HashSet<_>>()
            .len();
        let incoming_len = incoming.len();

        let merged = merge(existing, incoming);
        self.write_raw(&merged)?;

        Ok(MergeStats {
            incoming: incoming_len,
            added,
            stored_total: merged.len(),
        })
    }
}

/// Load a labeled batch from `path` with the given engine.
pub fn load(
    path: impl AsRef<Path>,
    engine: &SentimentEngine,
    normalizer: &DateNormalizer,
) -> OpinionResult<Vec<Record>> {
    RecordStore::new(path.as_ref()).load(engine, normalizer)
}

/// Attach a freshly computed label and normalized date to every raw row.
pub fn label_records(
    raw: Vec<RawRecord>,
    engine: &SentimentEngine,
    normalizer: &DateNormalizer,
) -> Vec<Record> {
    raw.into_iter()
        .map(|r| Record {
            date: normalizer.normalize(&r.date),
            sentiment: engine.classify(&r.content),
            source: r.source,
            content: r.content,
            link: r.link,
        })
        .collect()
}

/// Old rows followed by new rows, keeping only the last row for each
/// distinct content, at that row's position.
pub fn merge(existing: Vec<RawRecord>, incoming: Vec<RawRecord>) -> Vec<RawRecord> {
    let all: Vec<RawRecord> = existing.into_iter().chain(incoming).collect();

    let mut last_index: HashMap<&str, usize> = HashMap::new();
    for (i, r) in all.iter().enumerate() {
        last_index.insert(r.content.as_str(), i);
    }
    let keep: HashSet<usize> = last_index.into_values().collect();

    all.into_iter()
        .enumerate()
        .filter(|(i, _)| keep.contains(i))
        .map(|(_, r)| r)
        .collect()
}

pub(crate) fn read_csv(path: &Path) -> OpinionResult<Vec<RawRecord>> {
    let contents = fs::read_to_string(path)?;
    let contents = contents.strip_prefix(UTF8_BOM).unwrap_or(&contents);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(contents.as_bytes());

    let mut records = Vec::new();
    for row in reader.deserialize::<RawRecord>() {
        let record = row.map_err(|e| store_error(path, &e))?;
        records.push(record);
    }
    Ok(records)
}

fn write_csv(path: &Path, records: &[RawRecord]) -> OpinionResult<()> {
    let mut file = BufWriter::new(File::create(path)?);
    // Keep the BOM so spreadsheet tools open the file as UTF-8
    file.write_all(UTF8_BOM.as_bytes())?;

    let mut writer = csv::Writer::from_writer(file);
    for record in records {
        writer.serialize(record).map_err(|e| store_error(path, &e))?;
    }
    writer.flush()?;
    Ok(())
}

fn store_error(path: &Path, err: &csv::Error) -> OpinionError {
    match err.position() {
        Some(pos) => OpinionError::Store(format!("{} line {}: {}", path.display(), pos.line(), err)),
        None => OpinionError::Store(format!("{}: {}", path.display(), err)),
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "store.csv".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}
