//! # Report Rendering
//!
//! Renderers turn a finished [`Snapshot`] into text. They are selected by an
//! output-mode string and receive nothing but the snapshot, so the
//! aggregation pipeline never depends on presentation.
//!
//! ## Output modes
//!
//! - `""` / `"summary"`: human-readable summary with histogram and details
//! - `"csv"`: one row per retained request, in arrival order
//! - `"json"`: the serialized snapshot

use crate::defaults::BAR_WIDTH;
use crate::error::{ReportError, Result};
use crate::results::Phase;
use crate::snapshot::Snapshot;
use crate::utils::{format_number, scaled_bar};
use std::io::Write;
use std::str::FromStr;

const BAR_GLYPH: &str = "■";

/// Phases in summary detail and CSV column order
const DETAIL_PHASES: [Phase; 5] = [
    Phase::Connect,
    Phase::Dns,
    Phase::RequestWrite,
    Phase::DelayWait,
    Phase::ResponseRead,
];

const CSV_HEADER: &str =
    "response-time,DNS+dialup,DNS,Request-write,Response-delay,Response-read,status-code,offset";

/// Strategy for writing a snapshot to an output sink
pub trait Render {
    fn render(&self, snapshot: &Snapshot, out: &mut dyn Write) -> Result<()>;
}

/// Known output modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Summary,
    Csv,
    Json,
}

impl FromStr for OutputMode {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" | "summary" => Ok(OutputMode::Summary),
            "csv" => Ok(OutputMode::Csv),
            "json" => Ok(OutputMode::Json),
            other => Err(ReportError::UnknownOutputMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputMode::Summary => write!(f, "summary"),
            OutputMode::Csv => write!(f, "csv"),
            OutputMode::Json => write!(f, "json"),
        }
    }
}

/// Select the renderer for an output-mode string
pub fn renderer_for(mode: &str) -> Result<Box<dyn Render + Send + Sync>> {
    Ok(match mode.parse::<OutputMode>()? {
        OutputMode::Summary => Box::new(SummaryRenderer),
        OutputMode::Csv => Box::new(CsvRenderer),
        OutputMode::Json => Box::new(JsonRenderer),
    })
}

/// Human-readable report
pub struct SummaryRenderer;

impl SummaryRenderer {
    fn write_histogram(&self, snapshot: &Snapshot, out: &mut dyn Write) -> Result<()> {
        let max = snapshot
            .histogram
            .iter()
            .map(|b| b.count)
            .max()
            .unwrap_or(0);
        for bucket in &snapshot.histogram {
            writeln!(
                out,
                "  {:4.3} [{}]\t|{}",
                bucket.mark,
                bucket.count,
                scaled_bar(bucket.count, max, BAR_WIDTH, BAR_GLYPH)
            )?;
        }
        Ok(())
    }
}

impl Render for SummaryRenderer {
    fn render(&self, snapshot: &Snapshot, out: &mut dyn Write) -> Result<()> {
        writeln!(out)?;
        writeln!(out, "Summary:")?;
        writeln!(out, "  Total:\t{} secs", format_number(snapshot.total.as_secs_f64()))?;
        writeln!(out, "  Slowest:\t{} secs", format_number(snapshot.slowest))?;
        writeln!(out, "  Fastest:\t{} secs", format_number(snapshot.fastest))?;
        writeln!(out, "  Average:\t{} secs", format_number(snapshot.average))?;
        writeln!(out, "  Requests/sec:\t{}", format_number(snapshot.throughput))?;
        if snapshot.size_total > 0 {
            writeln!(out)?;
            writeln!(out, "  Total data:\t{} bytes", snapshot.size_total)?;
            writeln!(out, "  Size/request:\t{} bytes", snapshot.size_per_request)?;
        }

        writeln!(out)?;
        writeln!(out, "Response time histogram:")?;
        self.write_histogram(snapshot, out)?;

        writeln!(out)?;
        writeln!(out, "Latency distribution:")?;
        for dist in &snapshot.latency_distribution {
            writeln!(
                out,
                "  {}% in {} secs",
                dist.percentage,
                format_number(dist.latency)
            )?;
        }

        writeln!(out)?;
        writeln!(out, "Details (average, fastest, slowest):")?;
        for phase in DETAIL_PHASES {
            let Some(stats) = snapshot.phases.iter().find(|s| s.phase == phase) else {
                continue;
            };
            // "fastest" is the max field and "slowest" the min field
            writeln!(
                out,
                "  {}:\t{} secs, {} secs, {} secs",
                phase,
                format_number(stats.average),
                format_number(stats.max),
                format_number(stats.min)
            )?;
        }

        writeln!(out)?;
        writeln!(out, "Status code distribution:")?;
        for (code, count) in &snapshot.status_code_dist {
            writeln!(out, "  [{}]\t{} responses", code, count)?;
        }

        if !snapshot.error_dist.is_empty() {
            writeln!(out)?;
            writeln!(out, "Error distribution:")?;
            for (message, count) in &snapshot.error_dist {
                writeln!(out, "  [{}]\t{}", count, message)?;
            }
        }
        Ok(())
    }
}

/// Per-request rows for spreadsheet import
pub struct CsvRenderer;

impl Render for CsvRenderer {
    fn render(&self, snapshot: &Snapshot, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "{}", CSV_HEADER)?;

        let phases = DETAIL_PHASES.map(|phase| phase_samples(snapshot, phase));
        // rows stop at the shortest sequence
        let rows = phases
            .iter()
            .map(|samples| samples.len())
            .chain([
                snapshot.durations.len(),
                snapshot.status_codes.len(),
                snapshot.offsets.len(),
            ])
            .min()
            .unwrap_or(0);

        for i in 0..rows {
            write!(out, "{}", format_number(snapshot.durations[i]))?;
            for samples in &phases {
                write!(out, ",{}", format_number(samples[i]))?;
            }
            writeln!(
                out,
                ",{},{}",
                snapshot.status_codes[i],
                format_number(snapshot.offsets[i])
            )?;
        }
        Ok(())
    }
}

fn phase_samples(snapshot: &Snapshot, phase: Phase) -> &[f64] {
    snapshot
        .phases
        .iter()
        .find(|stats| stats.phase == phase)
        .map(|stats| stats.samples.as_slice())
        .unwrap_or_default()
}

/// Pretty-printed JSON snapshot
pub struct JsonRenderer;

impl Render for JsonRenderer {
    fn render(&self, snapshot: &Snapshot, out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, snapshot)?;
        Ok(())
    }
}
