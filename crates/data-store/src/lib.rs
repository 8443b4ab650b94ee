pub mod import;
pub mod pipeline;
pub mod session;
pub mod store;
#[cfg(test)]
mod tests;

pub use import::{clean_text, CsvImportSource};
pub use pipeline::{AcquisitionPipeline, AcquisitionReport, SourceReport};
pub use session::{AutomationSession, ScopedSession, SessionSource};
pub use store::{label_records, load, merge, MergeStats, RecordStore};
