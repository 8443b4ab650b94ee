use chrono::{DateTime, Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime};

/// Full date-time layouts tried in order after RFC 3339
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    // PTT article header, e.g. "Sat Mar 27 21:03:44 2021"
    "%a %b %d %H:%M:%S %Y",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// Corrects impossible future dates produced by partial date parsing.
///
/// Forum listings often show only month/day; those get the current year,
/// which puts late-year posts in the future when read early in the next
/// year. Anything later than `now + 1 day` is moved back exactly one year,
/// once.
#[derive(Debug, Clone, Copy)]
pub struct DateNormalizer {
    now: NaiveDateTime,
}

impl DateNormalizer {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Normalizer anchored at the local wall clock
    pub fn at_now() -> Self {
        Self::new(Local::now().naive_local())
    }

    /// Parse and correct a raw date. `None` when it cannot be parsed.
    pub fn normalize(&self, raw: &str) -> Option<NaiveDateTime> {
        let parsed = parse_date(raw, self.now.year())?;
        Some(self.correct(parsed))
    }

    /// Apply the one-year rollback to an already parsed timestamp.
    pub fn correct(&self, parsed: NaiveDateTime) -> NaiveDateTime {
        let cutoff = self.now + Duration::days(1);
        if parsed > cutoff {
            // Feb 29 clamps to Feb 28
            parsed.checked_sub_months(Months::new(12)).unwrap_or(parsed)
        } else {
            parsed
        }
    }
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self::at_now()
    }
}

/// Lenient parser for the date strings collectors produce.
///
/// A bare `month/day` gets `current_year`.
pub fn parse_date(raw: &str, current_year: i32) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    parse_month_day(raw, current_year)
}

fn parse_month_day(raw: &str, year: i32) -> Option<NaiveDateTime> {
    let (month, day) = raw.split_once('/')?;
    let month: u32 = month.trim().parse().ok()?;
    let day: u32 = day.trim().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn normalizer() -> DateNormalizer {
        DateNormalizer::new(at(2026, 2, 12))
    }

    #[test]
    fn test_in_range_date_unchanged() {
        let n = normalizer();
        assert_eq!(n.normalize("2025-12-24"), Some(at(2025, 12, 24)));
        // Exactly one day ahead is still within range
        assert_eq!(n.normalize("2026-02-13"), Some(at(2026, 2, 13)));
    }

    #[test]
    fn test_future_date_rolled_back_one_year() {
        let n = normalizer();
        assert_eq!(n.normalize("2026-12-24"), Some(at(2025, 12, 24)));
        assert_eq!(n.normalize("2026-02-14"), Some(at(2025, 2, 14)));
    }

    #[test]
    fn test_rollback_applied_once() {
        let n = normalizer();
        // Two years ahead: still in the future after one correction
        assert_eq!(n.normalize("2028-06-01"), Some(at(2027, 6, 1)));
    }

    #[test]
    fn test_month_day_uses_current_year_then_corrects() {
        let n = normalizer();
        assert_eq!(n.normalize("12/24"), Some(at(2025, 12, 24)));
        assert_eq!(n.normalize("1/5"), Some(at(2026, 1, 5)));
    }

    #[test]
    fn test_leap_day_clamps() {
        let n = DateNormalizer::new(at(2027, 6, 1));
        assert_eq!(n.normalize("2028-02-29"), Some(at(2027, 2, 28)));
    }

    #[test]
    fn test_unparseable_is_none() {
        let n = normalizer();
        assert_eq!(n.normalize(""), None);
        assert_eq!(n.normalize("yesterday"), None);
        assert_eq!(n.normalize("13/45"), None);
    }

    #[test]
    fn test_accepted_layouts() {
        let n = normalizer();
        assert_eq!(
            n.normalize("2025-03-01T10:30:00Z"),
            at(2025, 3, 1).checked_add_signed(Duration::minutes(630))
        );
        assert_eq!(
            n.normalize("2025-03-01T10:30:00+08:00"),
            at(2025, 3, 1).checked_add_signed(Duration::minutes(630))
        );
        assert_eq!(
            n.normalize("Sat Mar 27 21:03:44 2021"),
            NaiveDate::from_ymd_opt(2021, 3, 27).unwrap().and_hms_opt(21, 3, 44)
        );
        assert_eq!(n.normalize("2025/03/01"), Some(at(2025, 3, 1)));
        assert_eq!(
            n.normalize("2025-03-01T10:30"),
            at(2025, 3, 1).checked_add_signed(Duration::minutes(630))
        );
        assert_eq!(n.normalize("2025-03-01 08:15"), at(2025, 3, 1).checked_add_signed(Duration::minutes(495)));
    }
}
