//! Small formatting helpers shared by the renderers.

use std::time::Duration;

use chrono::{Local, TimeZone};

const UNITS: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

/// Binary-unit byte count: `512 B`, `1.50 KB`, `3.00 MB`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut exp = 0;
    while value >= 1024.0 && exp < UNITS.len() {
        value /= 1024.0;
        exp += 1;
    }
    format!("{value:.2} {}B", UNITS[exp - 1])
}

/// Milliseconds with microsecond precision.
pub fn format_millis(duration: Duration) -> String {
    format!("{:.3}", duration.as_secs_f64() * 1000.0)
}

/// Local time with millisecond precision, `full` adds the date.
pub fn format_timestamp(millis: u64, full: bool) -> String {
    let pattern = if full { "%Y-%m-%d %H:%M:%S%.3f" } else { "%H:%M:%S%.3f" };
    match Local.timestamp_millis_opt(millis as i64).single() {
        Some(time) => time.format(pattern).to_string(),
        None => millis.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.00 MB");
        assert!(format_bytes(u64::MAX).ends_with("EB"));
    }

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis(Duration::from_micros(1500)), "1.500");
        assert_eq!(format_millis(Duration::ZERO), "0.000");
    }

    #[test]
    fn test_timestamp_shapes() {
        let full = format_timestamp(1_700_000_000_123, true);
        let short = format_timestamp(1_700_000_000_123, false);
        assert_eq!(full.len(), "2023-11-14 22:13:20.123".len());
        assert_eq!(short.len(), "22:13:20.123".len());
        assert!(full.ends_with(".123"));
        assert!(full.ends_with(&short));
    }
}
