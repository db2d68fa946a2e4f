use super::ast::DateRange;
use chrono::{
    DateTime, Datelike, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone,
};
use serde_yaml::Value;
use std::ops::RangeInclusive;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

pub fn to_instant(v: &Value) -> Option<DateTime<Local>> {
    match v {
        Value::Null => from_millis(0),
        Value::Bool(b) => from_millis(i64::from(*b)),
        Value::Number(n) => {
            let ms = n.as_f64()?;
            if !ms.is_finite() {
                return None;
            }
            from_millis(ms.trunc() as i64)
        }
        Value::String(s) => parse_text(s.trim()),
        Value::Tagged(tagged) => to_instant(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn from_millis(ms: i64) -> Option<DateTime<Local>> {
    DateTime::from_timestamp_millis(ms).map(|t| t.with_timezone(&Local))
}

fn parse_text(s: &str) -> Option<DateTime<Local>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Local));
    }
    if let Ok(t) = DateTime::parse_from_rfc2822(s) {
        return Some(t.with_timezone(&Local));
    }
    let zoned = match s.strip_suffix('Z') {
        Some(rest) => format!("{}+00:00", rest),
        None => s.to_string(),
    };
    if let Ok(t) = DateTime::parse_from_str(&zoned, "%Y-%m-%dT%H:%M%:z") {
        return Some(t.with_timezone(&Local));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return local(naive);
        }
    }
    local_midnight(parse_calendar_date(s)?)
}

// `YYYY-MM-DD`, `YYYY-MM` or `YYYY`; missing parts default to the first.
fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let mut parts = s.split('-');
    let year: i32 = parts.next().filter(|p| is_digits(p, 4..=4))?.parse().ok()?;
    let month: u32 = match parts.next() {
        Some(p) if is_digits(p, 1..=2) => p.parse().ok()?,
        Some(_) => return None,
        None => 1,
    };
    let day: u32 = match parts.next() {
        Some(p) if is_digits(p, 1..=2) => p.parse().ok()?,
        Some(_) => return None,
        None => 1,
    };
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn is_digits(part: &str, len: RangeInclusive<usize>) -> bool {
    len.contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
}

/// Pins a wall-clock time to the local zone. Ambiguous times take the
/// earlier instant; times inside a DST gap move forward an hour.
fn local(naive: NaiveDateTime) -> Option<DateTime<Local>> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(t) => Some(t),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => Local
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest(),
    }
}

pub fn local_midnight(date: NaiveDate) -> Option<DateTime<Local>> {
    local(date.and_hms_opt(0, 0, 0)?)
}

pub fn end_of_day(t: DateTime<Local>) -> Option<DateTime<Local>> {
    local(t.date_naive().and_hms_milli_opt(23, 59, 59, 999)?)
}

fn first_of_month(year: i32, month: u32) -> Option<DateTime<Local>> {
    let (year, month) = match month {
        0 => (year - 1, 12),
        13 => (year + 1, 1),
        m => (year, m),
    };
    local_midnight(NaiveDate::from_ymd_opt(year, month, 1)?)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Window {
    Always,
    Between(Option<DateTime<Local>>, Option<DateTime<Local>>),
}

impl Window {
    pub fn contains(&self, d: Option<DateTime<Local>>) -> bool {
        match (self, d) {
            (Window::Always, _) => true,
            (Window::Between(Some(from), Some(until)), Some(d)) => *from <= d && d <= *until,
            _ => false,
        }
    }
}

pub fn window(range: &DateRange, today: NaiveDate) -> Window {
    let day = Duration::hours(24);
    let midnight = local_midnight(today);
    let (year, month) = (today.year(), today.month());

    match range {
        DateRange::Today => Window::Between(midnight, midnight.map(|m| m + day)),
        DateRange::Yesterday => Window::Between(midnight.map(|m| m - day), midnight),
        DateRange::SevenDays => {
            let until = midnight.map(|m| m + day);
            Window::Between(until.map(|u| u - Duration::days(7)), until)
        }
        DateRange::Month => Window::Between(
            first_of_month(year, month),
            first_of_month(year, month + 1),
        ),
        DateRange::LastMonth => Window::Between(
            first_of_month(year, month - 1),
            first_of_month(year, month),
        ),
        DateRange::Custom { from, until } => Window::Between(*from, *until),
        DateRange::Any => Window::Always,
        DateRange::Unknown(name) => {
            tracing::error!(range = %name, "Filter date range not implemented, skipping filter");
            Window::Always
        }
    }
}
