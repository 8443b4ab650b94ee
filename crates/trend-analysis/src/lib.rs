//! Temporal side of the monitor: date repair, calendar bucketing and the
//! gap-free sentiment trend series.

pub mod aggregate;
pub mod normalize;
pub mod period;
pub mod summary;

pub use aggregate::{aggregate, totals};
pub use normalize::{parse_date, DateNormalizer};
pub use period::{next_period, period_grid, period_start};
pub use summary::{
    default_anchor, default_range, filter_by_date_range, suggest_granularity, summarize,
    SourceCount, Summary,
};
