//! # Formatting Helpers
//!
//! Small, pure formatting functions shared by the renderers and the replay
//! CLI's log output. Report numbers are printed in seconds with four decimal
//! places; log lines use auto-scaled units for readability.

use std::time::Duration;

/// Format a report number the way every renderer prints seconds: `{:4.4}`
///
/// Non-finite values print as `NaN`, `inf` or `-inf`, which is what an empty
/// run or a zero-length run produce.
///
/// ```rust
/// # use request_stats::utils::format_number;
/// assert_eq!(format_number(0.5), "0.5000");
/// assert_eq!(format_number(12.345678), "12.3457");
/// ```
pub fn format_number(value: f64) -> String {
    format!("{:4.4}", value)
}

/// Format a duration with an automatically chosen unit
///
/// - Nanoseconds below 1µs (e.g. "750ns")
/// - Microseconds below 1ms (e.g. "1.25µs")
/// - Milliseconds below 1s (e.g. "2.50ms")
/// - Seconds below a minute (e.g. "5.25s")
/// - Compound minutes/hours above that (e.g. "1m 30s")
///
/// ```rust
/// # use request_stats::utils::format_duration;
/// # use std::time::Duration;
/// assert_eq!(format_duration(Duration::from_nanos(750)), "750ns");
/// assert_eq!(format_duration(Duration::from_micros(2500)), "2.50ms");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ns = duration.as_nanos();

    if total_ns < 1_000 {
        format!("{}ns", total_ns)
    } else if total_ns < 1_000_000 {
        format!("{:.2}µs", total_ns as f64 / 1_000.0)
    } else if total_ns < 1_000_000_000 {
        format!("{:.2}ms", total_ns as f64 / 1_000_000.0)
    } else if total_ns < 60_000_000_000 {
        format!("{:.2}s", total_ns as f64 / 1_000_000_000.0)
    } else {
        let seconds = duration.as_secs();
        let minutes = seconds / 60;
        let remaining_seconds = seconds % 60;

        if minutes < 60 {
            format!("{}m {}s", minutes, remaining_seconds)
        } else {
            let hours = minutes / 60;
            let remaining_minutes = minutes % 60;
            format!("{}h {}m {}s", hours, remaining_minutes, remaining_seconds)
        }
    }
}

/// Bar of `count` scaled against `max` into at most `width` characters
pub fn scaled_bar(count: usize, max: usize, width: usize, glyph: &str) -> String {
    if max == 0 {
        return String::new();
    }
    glyph.repeat(count * width / max)
}
