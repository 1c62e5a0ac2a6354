use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// `%m/%d/%Y` as strptime reads it: the day may be space-padded (`10/ 5/2023`).
static DATE_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2})/( [1-9]|[0-9]{1,2})/([0-9]{4})$").unwrap()
});

/// Hour of publication. The input form never collects a time of day.
pub const DEFAULT_PUBLISH_HOUR: u32 = 12;

/// Nanosecond timestamps used at training time cover this range only;
/// dates outside it fail to parse there, so they fail here too.
const MIN_DATE: (i32, u32, u32) = (1677, 9, 22);
const MAX_DATE: (i32, u32, u32) = (2262, 4, 11);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublishDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Monday = 0 .. Sunday = 6
    pub day_of_week: u32,
    pub hour: u32,
}

impl PublishDate {
    fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            day_of_week: date.weekday().num_days_from_monday(),
            hour: DEFAULT_PUBLISH_HOUR,
        }
    }

    pub fn fallback() -> Self {
        Self::from_date(fallback_date())
    }
}

fn fallback_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default()
}

pub fn parse_publish_date(raw: &str) -> Option<NaiveDate> {
    let caps = DATE_SHAPE.captures(raw)?;
    let month = caps[1].parse().ok()?;
    let day = caps[2].trim_start().parse().ok()?;
    let year = caps[3].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let min = NaiveDate::from_ymd_opt(MIN_DATE.0, MIN_DATE.1, MIN_DATE.2)?;
    let max = NaiveDate::from_ymd_opt(MAX_DATE.0, MAX_DATE.1, MAX_DATE.2)?;
    (min..=max).contains(&date).then_some(date)
}

/// Splits a `MM/DD/YYYY` publish date into calendar components. Anything
/// unparseable silently becomes 2000-01-01.
pub fn decompose(raw: &str) -> PublishDate {
    match parse_publish_date(raw) {
        Some(date) => PublishDate::from_date(date),
        None => {
            debug!("[video-likes] Unparseable publish date {:?}, using 2000-01-01", raw);
            PublishDate::fallback()
        }
    }
}
