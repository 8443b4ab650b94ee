use chrono::{NaiveDate, NaiveDateTime};
use keyword_ranker::{KeywordRanker, StopWords};
use opinion_core::{Granularity, OpinionError, OpinionResult, RankedKeyword, Record, Sentiment, TrendPoint};
use serde::Serialize;
use trend_analysis::{
    aggregate, default_anchor, default_range, filter_by_date_range, suggest_granularity, summarize,
    Summary,
};

/// What the caller asked to see
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRequest {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub granularity: Option<Granularity>,
    pub top_k: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// One row of a per-sentiment record listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListedRecord {
    pub date: Option<NaiveDateTime>,
    pub source: String,
    pub content: String,
    /// Display label of the record's sentiment
    pub label: &'static str,
}

impl From<&Record> for ListedRecord {
    fn from(record: &Record) -> Self {
        Self {
            date: record.date,
            source: record.source.to_string(),
            content: record.content.clone(),
            label: record.sentiment.display_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub range: DateRange,
    pub granularity: Granularity,
    pub summary: Summary,
    pub trend: Vec<TrendPoint>,
    pub negative_keywords: Vec<RankedKeyword>,
    pub positive_keywords: Vec<RankedKeyword>,
    pub negative_records: Vec<ListedRecord>,
    pub positive_records: Vec<ListedRecord>,
}

/// Printed as a single JSON document on stdout
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Output {
    Ok(Report),
    NoData,
}

/// Resolve the view range: explicit bounds win, missing bounds come from the
/// batch itself. `None` when nothing in the batch is dated.
fn resolve_range(records: &[Record], request: &ViewRequest) -> OpinionResult<Option<(NaiveDate, NaiveDate)>> {
    let fallback = default_range(records, default_anchor());
    let (start, end) = match (request.from, request.to, fallback) {
        (Some(start), Some(end), _) => (start, end),
        (from, to, Some((lo, hi))) => (from.unwrap_or(lo), to.unwrap_or(hi)),
        (_, _, None) => return Ok(None),
    };
    if start > end {
        return Err(OpinionError::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(Some((start, end)))
}

pub fn build_output(
    records: &[Record],
    request: &ViewRequest,
    ranker: &KeywordRanker,
    stopwords: &StopWords,
) -> OpinionResult<Output> {
    let Some((start, end)) = resolve_range(records, request)? else {
        return Ok(Output::NoData);
    };

    let filtered = filter_by_date_range(records, start, end);
    if filtered.is_empty() {
        tracing::info!("No records between {} and {}", start, end);
        return Ok(Output::NoData);
    }

    let granularity = request
        .granularity
        .unwrap_or_else(|| suggest_granularity(start, end));
    let trend = aggregate(filtered.iter().copied(), granularity, start, end)?;
    let summary = summarize(filtered.iter().copied());

    let keywords_for = |sentiment: Sentiment| {
        ranker.rank(
            filtered.iter().copied().filter(|r| r.sentiment == sentiment),
            stopwords,
            request.top_k,
        )
    };
    let negative_keywords = keywords_for(Sentiment::Negative);
    let positive_keywords = keywords_for(Sentiment::Positive);

    let listing = |sentiment: Sentiment| -> Vec<ListedRecord> {
        filtered
            .iter()
            .filter(|r| r.sentiment == sentiment)
            .map(|r| ListedRecord::from(*r))
            .collect()
    };

    tracing::info!(
        "{} records from {} to {} by {} ({:.1}% negative)",
        summary.total,
        start,
        end,
        granularity,
        summary.negative_rate
    );

    Ok(Output::Ok(Report {
        range: DateRange { start, end },
        granularity,
        summary,
        trend,
        negative_keywords,
        positive_keywords,
        negative_records: listing(Sentiment::Negative),
        positive_records: listing(Sentiment::Positive),
    }))
}
