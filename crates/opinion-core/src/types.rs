use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::OpinionError;

/// Sentiment label attached to every record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    /// Every label, in the order trend series are emitted.
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }

    /// Label shown on the monitoring view
    pub fn display_name(&self) -> &'static str {
        match self {
            Sentiment::Positive => "正面",
            Sentiment::Negative => "負面",
            Sentiment::Neutral => "中性",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a record was collected from.
///
/// Unknown names read from a persisted batch are kept verbatim so that
/// re-saving the batch never rewrites them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Source {
    /// Forum post title (PTT)
    PttPost,
    /// Individual push/comment under a forum post (PTT)
    PttComment,
    /// Mobile01 forum thread
    Mobile01,
    /// Dcard post
    Dcard,
    Other(String),
}

impl Source {
    pub fn as_str(&self) -> &str {
        match self {
            Source::PttPost => "PTT_Post",
            Source::PttComment => "PTT_Comment",
            Source::Mobile01 => "Mobile01",
            Source::Dcard => "Dcard",
            Source::Other(name) => name,
        }
    }
}

impl From<String> for Source {
    fn from(value: String) -> Self {
        match value.trim() {
            "PTT_Post" => Source::PttPost,
            "PTT_Comment" => Source::PttComment,
            "Mobile01" => Source::Mobile01,
            "Dcard" => Source::Dcard,
            _ => Source::Other(value),
        }
    }
}

impl From<Source> for String {
    fn from(value: Source) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row as produced by a data source and persisted in the record store.
///
/// The date is kept as the raw string the source produced; it is only
/// interpreted when a batch is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub date: String,
    pub source: Source,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub link: String,
}

/// A loaded, normalized and labeled record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// `None` when the raw date could not be parsed
    pub date: Option<NaiveDateTime>,
    pub source: Source,
    pub content: String,
    pub link: String,
    pub sentiment: Sentiment,
}

impl Record {
    pub fn day(&self) -> Option<NaiveDate> {
        self.date.map(|d| d.date())
    }
}

/// Bucket size for trend series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    /// Calendar weeks starting on Monday
    Week,
    /// Calendar months starting on the 1st
    Month,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }
}

impl FromStr for Granularity {
    type Err = OpinionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "d" => Ok(Granularity::Day),
            "week" | "w" => Ok(Granularity::Week),
            "month" | "m" => Ok(Granularity::Month),
            _ => Err(OpinionError::InvalidGranularity(s.to_string())),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cell of the period x sentiment grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub period_start: NaiveDate,
    pub sentiment: Sentiment,
    pub count: usize,
}

/// Keyword with its relevance weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedKeyword {
    pub keyword: String,
    pub weight: f64,
}
