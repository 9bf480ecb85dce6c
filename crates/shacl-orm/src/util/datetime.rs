//! Lexical forms for `xsd:date`, `xsd:time` and `xsd:dateTime`.
//!
//! Internal representations:
//! - date: days since 1970-01-01 plus optional offset in minutes
//! - time: microseconds since midnight plus optional offset
//! - dateTime: microseconds since the Unix epoch plus optional offset
//!
//! An absent timezone stays absent through a parse/format round trip.

use thiserror::Error;

const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_MINUTE: i64 = 60 * MICROS_PER_SECOND;
const MICROS_PER_HOUR: i64 = 60 * MICROS_PER_MINUTE;
const MICROS_PER_DAY: i64 = 24 * MICROS_PER_HOUR;
const MAX_OFFSET_MIN: i16 = 14 * 60;

/// Lexical date/time parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateTimeError {
    #[error("malformed {what}")]
    Malformed { what: &'static str },
    #[error("{field} out of range")]
    OutOfRange { field: &'static str },
    #[error("invalid timezone offset {0:?}")]
    Offset(String),
}

fn malformed(what: &'static str) -> DateTimeError {
    DateTimeError::Malformed { what }
}

fn digits<T: std::str::FromStr>(s: &str, what: &'static str) -> Result<T, DateTimeError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(what));
    }
    s.parse().map_err(|_| malformed(what))
}

/// Splits a trailing `Z` / `+HH:MM` / `-HH:MM` suffix off `s`.
fn split_offset(s: &str) -> Result<(&str, Option<i16>), DateTimeError> {
    if let Some(rest) = s.strip_suffix('Z') {
        return Ok((rest, Some(0)));
    }
    if s.len() >= 6 && s.is_char_boundary(s.len() - 6) {
        let (head, tail) = s.split_at(s.len() - 6);
        let bytes = tail.as_bytes();
        if (bytes[0] == b'+' || bytes[0] == b'-') && bytes[3] == b':' {
            if ![1, 2, 4, 5].iter().all(|&i| bytes[i].is_ascii_digit()) {
                return Err(DateTimeError::Offset(tail.into()));
            }
            let hours = ((bytes[1] - b'0') * 10 + (bytes[2] - b'0')) as i16;
            let minutes = ((bytes[4] - b'0') * 10 + (bytes[5] - b'0')) as i16;
            let total = hours * 60 + minutes;
            if minutes > 59 || total > MAX_OFFSET_MIN {
                return Err(DateTimeError::Offset(tail.into()));
            }
            let sign = if bytes[0] == b'-' { -1 } else { 1 };
            return Ok((head, Some(sign * total)));
        }
    }
    Ok((s, None))
}

fn format_offset(offset_min: Option<i16>) -> String {
    match offset_min {
        None => String::new(),
        Some(0) => "Z".to_string(),
        Some(m) => {
            let sign = if m < 0 { '-' } else { '+' };
            let m = m.unsigned_abs();
            format!("{}{:02}:{:02}", sign, m / 60, m % 60)
        }
    }
}

fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i64, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian date (Hinnant's algorithm).
fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y.rem_euclid(400);
    let mp = (month as i64 + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Inverse of [`days_from_civil`].
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Parses `[-]YYYY-MM-DD` into days since the epoch.
fn parse_ymd(s: &str) -> Result<i64, DateTimeError> {
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let mut parts = body.splitn(3, '-');
    let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed("date"));
    };
    if y.len() < 4 || m.len() != 2 || d.len() != 2 {
        return Err(malformed("date"));
    }
    if y.len() > 9 {
        return Err(DateTimeError::OutOfRange { field: "year" });
    }
    let year: i64 = digits(y, "year")?;
    let year = if negative { -year } else { year };
    let month: u32 = digits(m, "month")?;
    let day: u32 = digits(d, "day")?;
    if !(1..=12).contains(&month) {
        return Err(DateTimeError::OutOfRange { field: "month" });
    }
    if day == 0 || day > days_in_month(year, month) {
        return Err(DateTimeError::OutOfRange { field: "day" });
    }
    Ok(days_from_civil(year, month, day))
}

/// Parses `HH:MM:SS[.ffffff]` into microseconds since midnight.
///
/// Fractional digits beyond microseconds are truncated.
fn parse_clock(s: &str) -> Result<i64, DateTimeError> {
    let (hms, frac) = match s.split_once('.') {
        Some((hms, frac)) => (hms, Some(frac)),
        None => (s, None),
    };
    let bytes = hms.as_bytes();
    if bytes.len() != 8 || bytes[2] != b':' || bytes[5] != b':' {
        return Err(malformed("time"));
    }
    let hours: i64 = digits(&hms[0..2], "hours")?;
    let minutes: i64 = digits(&hms[3..5], "minutes")?;
    let seconds: i64 = digits(&hms[6..8], "seconds")?;
    if hours > 23 {
        return Err(DateTimeError::OutOfRange { field: "hours" });
    }
    if minutes > 59 {
        return Err(DateTimeError::OutOfRange { field: "minutes" });
    }
    if seconds > 59 {
        return Err(DateTimeError::OutOfRange { field: "seconds" });
    }
    let micros = match frac {
        None => 0,
        Some(f) => {
            if f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed("fractional seconds"));
            }
            let mut padded: String = f.chars().take(6).collect();
            while padded.len() < 6 {
                padded.push('0');
            }
            digits::<i64>(&padded, "fractional seconds")?
        }
    };
    Ok(hours * MICROS_PER_HOUR + minutes * MICROS_PER_MINUTE + seconds * MICROS_PER_SECOND + micros)
}

fn format_clock(micros: i64) -> String {
    let hours = micros / MICROS_PER_HOUR;
    let minutes = micros % MICROS_PER_HOUR / MICROS_PER_MINUTE;
    let seconds = micros % MICROS_PER_MINUTE / MICROS_PER_SECOND;
    let frac = micros % MICROS_PER_SECOND;
    if frac == 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        let frac = format!("{:06}", frac);
        format!("{:02}:{:02}:{:02}.{}", hours, minutes, seconds, frac.trim_end_matches('0'))
    }
}

fn format_ymd(days: i64) -> String {
    let (year, month, day) = civil_from_days(days);
    if year < 0 {
        format!("-{:04}-{:02}-{:02}", -year, month, day)
    } else {
        format!("{:04}-{:02}-{:02}", year, month, day)
    }
}

/// Parses an `xsd:date` lexical form, e.g. `2024-03-15` or `2024-03-15+05:30`.
pub fn parse_date(s: &str) -> Result<(i32, Option<i16>), DateTimeError> {
    let (body, offset) = split_offset(s)?;
    let days = parse_ymd(body)?;
    let days = i32::try_from(days).map_err(|_| DateTimeError::OutOfRange { field: "year" })?;
    Ok((days, offset))
}

pub fn format_date(days: i32, offset_min: Option<i16>) -> String {
    format!("{}{}", format_ymd(days as i64), format_offset(offset_min))
}

/// Parses an `xsd:time` lexical form, e.g. `14:30:00.5Z`.
pub fn parse_time(s: &str) -> Result<(i64, Option<i16>), DateTimeError> {
    let (body, offset) = split_offset(s)?;
    Ok((parse_clock(body)?, offset))
}

pub fn format_time(micros: i64, offset_min: Option<i16>) -> String {
    format!("{}{}", format_clock(micros), format_offset(offset_min))
}

/// Parses an `xsd:dateTime` lexical form.
///
/// With an offset the result is the UTC instant; without one it is the local
/// wall-clock reading counted from the epoch.
pub fn parse_datetime(s: &str) -> Result<(i64, Option<i16>), DateTimeError> {
    let (body, offset) = split_offset(s)?;
    let (date, clock) = body.split_once('T').ok_or(malformed("dateTime"))?;
    let days = parse_ymd(date)?;
    let clock = parse_clock(clock)?;
    let local = days
        .checked_mul(MICROS_PER_DAY)
        .and_then(|d| d.checked_add(clock))
        .ok_or(DateTimeError::OutOfRange { field: "year" })?;
    let shift = offset.map_or(0, |m| m as i64 * MICROS_PER_MINUTE);
    let utc = local
        .checked_sub(shift)
        .ok_or(DateTimeError::OutOfRange { field: "year" })?;
    Ok((utc, offset))
}

pub fn format_datetime(epoch_micros: i64, offset_min: Option<i16>) -> String {
    let local = epoch_micros + offset_min.map_or(0, |m| m as i64 * MICROS_PER_MINUTE);
    let days = local.div_euclid(MICROS_PER_DAY);
    let clock = local.rem_euclid(MICROS_PER_DAY);
    format!("{}T{}{}", format_ymd(days), format_clock(clock), format_offset(offset_min))
}
