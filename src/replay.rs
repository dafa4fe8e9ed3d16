//! Replaying recorded results from JSON lines into a result feed.
//!
//! Each non-blank line holds one [`RequestResult`]. Reading is blocking I/O,
//! so [`feed_records`] is meant to run on a blocking thread (for example via
//! `tokio::task::spawn_blocking`) and pushes with
//! [`ResultSender::blocking_send`].

use crate::error::{ReportError, Result};
use crate::feed::ResultSender;
use crate::results::RequestResult;
use std::io::BufRead;
use std::time::Duration;
use tracing::debug;

/// What a replay pushed into the feed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Records sent, successes and failures
    pub records: usize,
    /// Latest `offset + duration` over every record, a stand-in for the run's
    /// wall-clock time when it was not recorded separately
    pub last_completion: Duration,
}

/// Decode one JSON line, tagging failures with the 1-based line number
pub fn parse_record(line: &str, line_number: usize) -> Result<RequestResult> {
    serde_json::from_str(line).map_err(|source| ReportError::InvalidRecord {
        line: line_number,
        source,
    })
}

/// Read every record from `reader` and push it into `sender`
///
/// Stops at the first malformed line. The sender is consumed, so the feed
/// ends once this returns (provided no other senders remain).
pub fn feed_records<R: BufRead>(reader: R, sender: ResultSender) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let record = parse_record(&line, index + 1)?;
        summary.last_completion = summary.last_completion.max(record.completed_at());
        sender.blocking_send(record)?;
        summary.records += 1;
    }

    debug!("Replayed {} records", summary.records);
    sender.close();
    Ok(summary)
}
