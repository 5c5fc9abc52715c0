//! The forgiving date/time grammar used for spreadsheet cells.

use apptrack_core::models::DateTime;
use time::{Date, Duration, Month, Time};

/// Parse a user-entered timestamp.
///
/// `/` and `:` are treated as `-`. The input splits on whitespace into a
/// date part and an optional time part:
///
/// - date: `y-m-d`, or `m-d` in `current_year`
/// - time: `h-m-s`, `h-m` or `h`, defaulting to `12-00-00`
///
/// Returns `None` for anything malformed or out of range, including
/// impossible calendar dates such as February 30th.
pub fn parse_flexible(text: &str, current_year: i32) -> Option<DateTime> {
    let normalized: String = text
        .trim()
        .chars()
        .map(|c| if c == '/' || c == ':' { '-' } else { c })
        .collect();

    let mut parts = normalized.split_whitespace();
    let date_part = parts.next()?;
    let time_part = parts.next();

    let components: Vec<&str> = date_part.split('-').collect();
    let (year, month, day) = match components.as_slice() {
        [y, m, d] => (number(y)?, number(m)?, number(d)?),
        [m, d] => (current_year, number(m)?, number(d)?),
        _ => return None,
    };

    let (hour, minute, second) = match time_part {
        None => (12, 0, 0),
        Some(time_part) => {
            let components: Vec<&str> = time_part.split('-').collect();
            match components.as_slice() {
                [h] => (number(h)?, 0, 0),
                [h, m] => (number(h)?, number(m)?, 0),
                [h, m, s, ..] => (number(h)?, number(m)?, number(s)?),
                [] => return None,
            }
        }
    };

    if !(1..=12).contains(&month)
        || !(1..=31).contains(&day)
        || !(0..=23).contains(&hour)
        || !(0..=59).contains(&minute)
        || !(0..=59).contains(&second)
    {
        return None;
    }

    let month = Month::try_from(month as u8).ok()?;
    let date = Date::from_calendar_date(year, month, day as u8).ok()?;
    let time = Time::from_hms(hour as u8, minute as u8, second as u8).ok()?;
    Some(DateTime::new(date, time))
}

fn number(text: &str) -> Option<i32> {
    text.parse().ok()
}

/// Render a timestamp as `yyyy-MM-dd HH:mm:ss`.
pub fn format_timestamp(value: DateTime) -> String {
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        value.year(),
        u8::from(value.month()),
        value.day(),
        value.hour(),
        value.minute(),
        value.second()
    )
}

/// Convert a spreadsheet date serial (days since 1899-12-30, with the time
/// of day as the fractional part) to a timestamp, to the nearest second.
pub fn from_serial(serial: f64) -> Option<DateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let seconds = (serial * 86_400.0).round();
    if seconds > i64::MAX as f64 {
        return None;
    }
    let epoch = Date::from_calendar_date(1899, Month::December, 30).ok()?;
    epoch
        .midnight()
        .checked_add(Duration::seconds(seconds as i64))
}
