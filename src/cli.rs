use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Request Stats - replay recorded request results into a load-test report
#[derive(Parser, Debug, Clone, Default)]
#[clap(version, about, long_about = None)]
pub struct Args {
    /// JSON-lines file of request results (reads stdin when omitted)
    #[clap(short = 'i', long)]
    pub input: Option<PathBuf>,

    /// Output mode: summary, csv or json
    #[clap(short = 'o', long, default_value = "summary")]
    pub output: String,

    /// Write the report to this file instead of stdout
    #[clap(long)]
    pub output_file: Option<PathBuf>,

    /// Wall-clock duration of the recorded run (defaults to the latest
    /// offset + duration found in the input)
    #[clap(short = 'e', long, value_parser = parse_duration)]
    pub elapsed: Option<Duration>,

    /// Maximum number of samples retained for percentiles and histogram
    #[clap(long, default_value_t = crate::defaults::MAX_RESULTS)]
    pub max_results: usize,

    /// Capacity of the in-memory result feed
    #[clap(long, default_value_t = crate::defaults::FEED_CAPACITY)]
    pub feed_capacity: usize,

    /// Verbose output
    #[clap(short = 'v', long, default_value_t = false)]
    pub verbose: bool,
}

/// Parse duration from string (e.g., "10s", "500ms", "5m", "1h")
///
/// A bare number is read as seconds. Fractions are accepted for every unit.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Duration cannot be empty".to_string());
    }

    let (num_str, scale) = if let Some(stripped) = s.strip_suffix("ms") {
        (stripped, 0.001)
    } else if let Some(stripped) = s.strip_suffix('s') {
        (stripped, 1.0)
    } else if let Some(stripped) = s.strip_suffix('m') {
        (stripped, 60.0)
    } else if let Some(stripped) = s.strip_suffix('h') {
        (stripped, 3600.0)
    } else {
        (s, 1.0)
    };

    let num: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number in duration: {}", num_str))?;

    Duration::try_from_secs_f64(num * scale).map_err(|e| format!("Invalid duration {}: {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("10s").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("10").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));

        assert!(parse_duration("").is_err());
        assert!(parse_duration("invalid").is_err());
        assert!(parse_duration("-3s").is_err());
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["request-stats"]);
        assert_eq!(args.output, "summary");
        assert_eq!(args.max_results, crate::defaults::MAX_RESULTS);
        assert!(args.input.is_none());
        assert!(args.elapsed.is_none());
    }

    #[test]
    fn test_args_full() {
        let args = Args::parse_from([
            "request-stats",
            "-i",
            "results.jsonl",
            "-o",
            "csv",
            "--elapsed",
            "2m",
            "--max-results",
            "500",
            "-v",
        ]);
        assert_eq!(args.input, Some(PathBuf::from("results.jsonl")));
        assert_eq!(args.output, "csv");
        assert_eq!(args.elapsed, Some(Duration::from_secs(120)));
        assert_eq!(args.max_results, 500);
        assert!(args.verbose);
    }
}
