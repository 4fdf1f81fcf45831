use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::DEFAULT_INTERVAL_MS;

const MS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;
const MS_PER_HOUR: f64 = 60.0 * 60.0 * 1000.0;

/// Matches "<N>[-<M>] day(s)|hour(s)" anywhere in a frequency description,
/// e.g. "Every 7-10 days" or "Spray every 12 hours".
static FREQUENCY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)(?:-(\d+))?\s*(day|hour)s?").expect("valid regex"));

/// Convert a free-text treatment frequency into a millisecond interval.
///
/// A range like "7-10 days" uses the arithmetic mean of its bounds. Text with
/// no recognizable pattern falls back to 7 days, as does anything that would
/// yield a non-positive interval, so the result is always > 0.
pub fn parse_frequency(frequency: &str) -> i64 {
    let caps = match FREQUENCY_RE.captures(frequency) {
        Some(caps) => caps,
        None => return DEFAULT_INTERVAL_MS,
    };

    let min: f64 = match caps[1].parse() {
        Ok(n) => n,
        Err(_) => return DEFAULT_INTERVAL_MS,
    };
    let max: f64 = match caps.get(2) {
        Some(m) => match m.as_str().parse() {
            Ok(n) => n,
            Err(_) => return DEFAULT_INTERVAL_MS,
        },
        None => min,
    };
    let avg = (min + max) / 2.0;

    let unit = caps[3].to_ascii_lowercase();
    let ms = if unit == "day" {
        avg * MS_PER_DAY
    } else {
        avg * MS_PER_HOUR
    };

    if ms <= 0.0 {
        return DEFAULT_INTERVAL_MS;
    }
    ms as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_day_count() {
        assert_eq!(parse_frequency("every 3 days"), 3 * 86_400_000);
        assert_eq!(parse_frequency("1 day"), 86_400_000);
    }

    #[test]
    fn test_day_range_uses_mean() {
        assert_eq!(parse_frequency("Every 7-10 days"), 734_400_000);
        assert_eq!(parse_frequency("Every 10-14 days"), 1_036_800_000);
    }

    #[test]
    fn test_hours() {
        assert_eq!(parse_frequency("every 12 hours"), 43_200_000);
        assert_eq!(parse_frequency("6-8 hours"), 25_200_000);
    }

    #[test]
    fn test_case_insensitive_substring() {
        assert_eq!(parse_frequency("Apply EVERY 2 DAYS at dusk"), 2 * 86_400_000);
    }

    #[test]
    fn test_unrecognized_falls_back_to_week() {
        assert_eq!(parse_frequency("as needed"), DEFAULT_INTERVAL_MS);
        assert_eq!(parse_frequency(""), DEFAULT_INTERVAL_MS);
    }

    #[test]
    fn test_zero_count_falls_back() {
        assert_eq!(parse_frequency("0 days"), DEFAULT_INTERVAL_MS);
    }
}
