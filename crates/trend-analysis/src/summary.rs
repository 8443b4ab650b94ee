//! Helpers for the monitoring view: range selection, filtering and headline
//! counts.

use chrono::NaiveDate;
use opinion_core::{Granularity, Record, Sentiment};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default lower bound of the view when the batch reaches back that far
pub fn default_anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 1).unwrap_or_default()
}

/// Records whose calendar date lies in `[start, end]`. Undated records are dropped.
pub fn filter_by_date_range(records: &[Record], start: NaiveDate, end: NaiveDate) -> Vec<&Record> {
    records
        .iter()
        .filter(|r| matches!(r.day(), Some(day) if day >= start && day <= end))
        .collect()
}

/// Range shown when the caller picks none: from `anchor` (or the earliest
/// record if that is later) to the latest record. A batch that ends before
/// `anchor` is shown whole.
pub fn default_range(records: &[Record], anchor: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let days = records.iter().filter_map(|r| r.day());
    let (min, max) = days.fold(None, |acc: Option<(NaiveDate, NaiveDate)>, day| match acc {
        None => Some((day, day)),
        Some((lo, hi)) => Some((lo.min(day), hi.max(day))),
    })?;

    if anchor > max {
        return Some((min, max));
    }
    Some((min.max(anchor), max))
}

/// Coarser buckets for longer spans so the chart stays readable
pub fn suggest_granularity(start: NaiveDate, end: NaiveDate) -> Granularity {
    let span = (end - start).num_days();
    if span > 365 {
        Granularity::Month
    } else if span > 60 {
        Granularity::Week
    } else {
        Granularity::Day
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCount {
    pub source: String,
    pub count: usize,
}

/// Headline counts for a filtered batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    /// Share of negative records, in percent
    pub negative_rate: f64,
    /// Records per source, largest first
    pub sources: Vec<SourceCount>,
}

pub fn summarize<'a, I>(records: I) -> Summary
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut by_sentiment: HashMap<Sentiment, usize> = HashMap::new();
    let mut by_source: HashMap<String, usize> = HashMap::new();
    let mut total = 0;

    for record in records {
        total += 1;
        *by_sentiment.entry(record.sentiment).or_insert(0) += 1;
        *by_source.entry(record.source.as_str().to_string()).or_insert(0) += 1;
    }

    let count = |s: Sentiment| by_sentiment.get(&s).copied().unwrap_or(0);
    let negative = count(Sentiment::Negative);
    let negative_rate = if total > 0 {
        negative as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    let mut sources: Vec<SourceCount> = by_source
        .into_iter()
        .map(|(source, count)| SourceCount { source, count })
        .collect();
    sources.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.source.cmp(&b.source)));

    Summary {
        total,
        positive: count(Sentiment::Positive),
        negative,
        neutral: count(Sentiment::Neutral),
        negative_rate,
        sources,
    }
}
