use anyhow::Result;
use request_stats::{feed, replay, ReportError, Reporter};
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::time::Duration;
use tempfile::NamedTempFile;

const RECORDS: &str = r#"{"duration":0.100,"connect":0.010,"dns":0.002,"request_write":0.001,"delay_wait":0.080,"response_read":0.007,"status_code":200,"content_length":512,"offset":0.0}
{"duration":0.300,"connect":0.030,"dns":0.004,"request_write":0.001,"delay_wait":0.260,"response_read":0.005,"status_code":200,"content_length":512,"offset":0.5}
{"duration":0.000,"err":"dial tcp 127.0.0.1:80: connect: connection refused","offset":0.7}
{"duration":0.200,"connect":0.020,"dns":0.003,"request_write":0.001,"delay_wait":0.170,"response_read":0.006,"status_code":500,"offset":1.8}
"#;

fn write_input() -> Result<NamedTempFile> {
    let mut input = NamedTempFile::new()?;
    input.write_all(RECORDS.as_bytes())?;
    input.flush()?;
    Ok(input)
}

/// Replay a JSON-lines file into a CSV report on disk.
#[tokio::test]
async fn replay_file_to_csv_report() -> Result<()> {
    let input = write_input()?;
    let output = NamedTempFile::new()?;

    let (tx, rx) = feed::channel(2);
    let handle = Reporter::new(File::create(output.path())?, rx, "csv", 4).spawn();

    let reader = BufReader::new(File::open(input.path())?);
    let summary = tokio::task::spawn_blocking(move || replay::feed_records(reader, tx)).await??;
    assert_eq!(summary.records, 4);
    assert_eq!(summary.last_completion, Duration::from_secs(2));

    let snapshot = handle.finish(summary.last_completion).await?;
    assert_eq!(snapshot.num_results, 4);
    assert_eq!(snapshot.num_successes, 3);
    assert_eq!(snapshot.size_total, 1024);
    assert_eq!(snapshot.size_per_request, 341);
    assert_eq!(snapshot.throughput, 1.5);
    assert_eq!(snapshot.status_code_dist[&500], 1);

    let csv = fs::read_to_string(output.path())?;
    let rows: Vec<&str> = csv.lines().filter(|l| !l.is_empty()).collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[1], "0.1000,0.0100,0.0020,0.0010,0.0800,0.0070,200,0.0000");
    assert_eq!(rows[3], "0.2000,0.0200,0.0030,0.0010,0.1700,0.0060,500,1.8000");
    Ok(())
}

/// The summary report lists every section for a replayed run.
#[tokio::test]
async fn replay_file_to_summary_report() -> Result<()> {
    let input = write_input()?;
    let output = NamedTempFile::new()?;

    let (tx, rx) = feed::channel(8);
    let handle = Reporter::new(File::create(output.path())?, rx, "", 0).spawn();
    let reader = BufReader::new(File::open(input.path())?);
    tokio::task::spawn_blocking(move || replay::feed_records(reader, tx)).await??;
    handle.finish(Duration::from_secs(2)).await?;

    let text = fs::read_to_string(output.path())?;
    assert!(text.contains("  Slowest:\t0.3000 secs"));
    assert!(text.contains("  Fastest:\t0.1000 secs"));
    assert!(text.contains("  Average:\t0.2000 secs"));
    assert!(text.contains("  Requests/sec:\t1.5000"));
    assert!(text.contains("  Total data:\t1024 bytes"));
    assert!(text.contains("Response time histogram:"));
    assert!(text.contains("  [500]\t1 responses"));
    assert!(text.contains("  [1]\tdial tcp 127.0.0.1:80: connect: connection refused"));
    Ok(())
}

/// A malformed line aborts the replay, and the consumer still completes.
#[tokio::test]
async fn replay_rejects_malformed_line() -> Result<()> {
    let mut input = NamedTempFile::new()?;
    writeln!(input, r#"{{"duration":0.1,"status_code":200}}"#)?;
    writeln!(input, r#"{{"duration":"slow"}}"#)?;
    input.flush()?;

    let (tx, rx) = feed::channel(8);
    let handle = Reporter::new(std::io::sink(), rx, "json", 0).spawn();
    let reader = BufReader::new(File::open(input.path())?);
    let err = tokio::task::spawn_blocking(move || replay::feed_records(reader, tx))
        .await?
        .unwrap_err();
    assert!(matches!(err, ReportError::InvalidRecord { line: 2, .. }));

    let snapshot = handle.finish(Duration::from_secs(1)).await?;
    assert_eq!(snapshot.num_results, 1);
    Ok(())
}
