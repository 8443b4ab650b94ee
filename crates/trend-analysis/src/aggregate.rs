use chrono::NaiveDate;
use opinion_core::{Granularity, OpinionError, OpinionResult, Record, Sentiment, TrendPoint};
use std::collections::HashMap;

use crate::period::{period_grid, period_start};

/// Build the complete period x sentiment count series for `[start, end]`.
///
/// Every period in range appears once per sentiment, in period order and
/// then in [`Sentiment::ALL`] order, with zero counts where nothing was
/// posted. Records without a date or outside the range are not counted.
pub fn aggregate<'a, I>(
    records: I,
    granularity: Granularity,
    start: NaiveDate,
    end: NaiveDate,
) -> OpinionResult<Vec<TrendPoint>>
where
    I: IntoIterator<Item = &'a Record>,
{
    if start > end {
        return Err(OpinionError::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    let mut counts: HashMap<(NaiveDate, Sentiment), usize> = HashMap::new();
    let mut counted = 0usize;
    for record in records {
        let Some(day) = record.day() else { continue };
        if day < start || day > end {
            continue;
        }
        *counts
            .entry((period_start(day, granularity), record.sentiment))
            .or_insert(0) += 1;
        counted += 1;
    }

    let grid = period_grid(start, end, granularity);
    let mut series = Vec::with_capacity(grid.len() * Sentiment::ALL.len());
    for period in grid {
        for sentiment in Sentiment::ALL {
            series.push(TrendPoint {
                period_start: period,
                sentiment,
                count: counts.get(&(period, sentiment)).copied().unwrap_or(0),
            });
        }
    }

    tracing::debug!(
        "Aggregated {} records into {} {} buckets",
        counted,
        series.len() / Sentiment::ALL.len(),
        granularity
    );

    Ok(series)
}

/// Total count per sentiment across a series
pub fn totals(series: &[TrendPoint]) -> HashMap<Sentiment, usize> {
    let mut totals = HashMap::new();
    for point in series {
        *totals.entry(point.sentiment).or_insert(0) += point.count;
    }
    totals
}
