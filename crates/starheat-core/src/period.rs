//! Calendar bucketing used to join the daily/weekly interest series with the
//! less frequent news-sentiment measurement.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

/// How coarsely timestamps are truncated into [`PeriodKey`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    #[default]
    Month,
    Year,
}

impl Granularity {
    /// Parse a configured granularity string.
    ///
    /// Unrecognized values default to `Granularity::Month`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "year" | "y" => Granularity::Year,
            _ => Granularity::Month,
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Month => write!(f, "month"),
            Granularity::Year => write!(f, "year"),
        }
    }
}

/// A coarsened time bucket derived deterministically from a date.
///
/// Used as half of the `(entity, period)` composite key in the ratio cache,
/// rendered as `YYYY-MM` (month) or `YYYY` (year).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PeriodKey {
    Month { year: i32, month: u32 },
    Year { year: i32 },
}

impl PeriodKey {
    /// Truncate `date` to the configured granularity.
    #[must_use]
    pub fn of(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Month => PeriodKey::Month {
                year: date.year(),
                month: date.month(),
            },
            Granularity::Year => PeriodKey::Year { year: date.year() },
        }
    }

    /// The first instant of the period.
    #[must_use]
    pub fn start(&self) -> NaiveDateTime {
        self.first_day()
            .and_hms_opt(0, 0, 0)
            .expect("midnight is a valid time")
    }

    /// The last instant of the period (one second before the next period
    /// begins).
    #[must_use]
    pub fn end(&self) -> NaiveDateTime {
        self.next().start() - Duration::seconds(1)
    }

    fn first_day(&self) -> NaiveDate {
        let (year, month) = match *self {
            PeriodKey::Month { year, month } => (year, month),
            PeriodKey::Year { year } => (year, 1),
        };
        NaiveDate::from_ymd_opt(year, month, 1).expect("first day of period is a valid date")
    }

    fn next(&self) -> Self {
        match *self {
            PeriodKey::Month { year, month } => {
                if month == 12 {
                    PeriodKey::Month {
                        year: year + 1,
                        month: 1,
                    }
                } else {
                    PeriodKey::Month {
                        year,
                        month: month + 1,
                    }
                }
            }
            PeriodKey::Year { year } => PeriodKey::Year { year: year + 1 },
        }
    }
}

impl std::fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            PeriodKey::Month { year, month } => write!(f, "{year:04}-{month:02}"),
            PeriodKey::Year { year } => write!(f, "{year:04}"),
        }
    }
}
