use std::path::PathBuf;

use chrono::FixedOffset;

#[derive(Debug, Clone)]
pub struct Config {
    pub inputs: Vec<PathBuf>,
    pub report_dir: PathBuf,
    /// Applied to displayed timestamps; storage stays UTC.
    pub utc_offset: FixedOffset,
}

/// Parses an offset like `+02:00`, `-05:30` or a bare `+02` / `3`.
pub fn parse_utc_offset(value: &str) -> Result<FixedOffset, String> {
    let trimmed = value.trim();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'+') => (1, &trimmed[1..]),
        Some(b'-') => (-1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let (hours_part, minutes_part) = match rest.split_once(':') {
        Some((hours, minutes)) => (hours, minutes),
        None => (rest, "0"),
    };
    let hours: i32 = hours_part
        .parse()
        .map_err(|_| format!("invalid UTC offset '{}'", value))?;
    let minutes: i32 = minutes_part
        .parse()
        .map_err(|_| format!("invalid UTC offset '{}'", value))?;
    if !(0..=14).contains(&hours) || !(0..=59).contains(&minutes) {
        return Err(format!("UTC offset '{}' out of range", value));
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| format!("UTC offset '{}' out of range", value))
}
