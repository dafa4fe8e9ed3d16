//! # Reporter
//!
//! The reporter wires the pieces of a run together:
//!
//! 1. **Spawn**: a consumer task drains the result feed into an
//!    [`Aggregator`] while workers produce.
//! 2. **Completion**: once the feed ends and is fully drained, the task sends
//!    the aggregator back over a one-shot channel.
//! 3. **Finish**: the orchestrator supplies the measured run time; the
//!    aggregator is finalized into a [`Snapshot`], rendered to the sink, and
//!    the snapshot is returned.
//!
//! Rendering problems are logged and never prevent the snapshot from being
//! returned.
//!
//! ```rust,no_run
//! use request_stats::{feed, RequestResult, Reporter};
//! use std::time::{Duration, Instant};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let (tx, rx) = feed::channel(1024);
//!     let handle = Reporter::new(std::io::stdout(), rx, "summary", 100).spawn();
//!
//!     let start = Instant::now();
//!     for _ in 0..100 {
//!         tx.send(RequestResult::success(Duration::from_millis(12), 200)).await?;
//!     }
//!     tx.close();
//!
//!     let snapshot = handle.finish(start.elapsed()).await?;
//!     println!("{} successes", snapshot.num_successes);
//!     Ok(())
//! }
//! ```

use crate::aggregator::Aggregator;
use crate::error::{ReportError, Result};
use crate::feed::ResultReceiver;
use crate::render::renderer_for;
use crate::snapshot::Snapshot;
use std::io::Write;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, error, warn};

/// Reporter settings
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// Retention cap for per-phase samples
    pub max_results: usize,
    /// Output-mode string handed to the renderer lookup
    pub output: String,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            max_results: crate::defaults::MAX_RESULTS,
            output: String::new(),
        }
    }
}

/// Single consumer of a result feed, bound to an output sink
pub struct Reporter<W> {
    sink: W,
    feed: ResultReceiver,
    config: ReporterConfig,
    expected_count: usize,
}

impl<W: Write + Send + 'static> Reporter<W> {
    /// Create a reporter
    ///
    /// `expected_count` only pre-sizes the retained sample buffers.
    pub fn new(
        sink: W,
        feed: ResultReceiver,
        output: impl Into<String>,
        expected_count: usize,
    ) -> Self {
        Self {
            sink,
            feed,
            config: ReporterConfig {
                output: output.into(),
                ..ReporterConfig::default()
            },
            expected_count,
        }
    }

    /// Override the retention cap
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.config.max_results = max_results;
        self
    }

    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    /// Run the consumer loop on the tokio runtime
    pub fn spawn(self) -> ReporterHandle<W> {
        let (done_tx, done_rx) = oneshot::channel();

        tokio::spawn(async move {
            let drained = self.drain().await;
            if done_tx.send(drained).is_err() {
                warn!("Reporter handle dropped before the run completed");
            }
        });

        ReporterHandle { done: done_rx }
    }

    /// Drain the feed inline, returning the state needed to finish the run
    pub async fn drain(mut self) -> Drained<W> {
        let mut aggregator =
            Aggregator::with_max_results(self.expected_count, self.config.max_results);
        aggregator.drain(&mut self.feed).await;

        Drained {
            aggregator,
            sink: self.sink,
            output: self.config.output,
        }
    }
}

/// A fully drained run, waiting for its elapsed time
pub struct Drained<W> {
    aggregator: Aggregator,
    sink: W,
    output: String,
}

impl<W: Write> Drained<W> {
    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Finalize with the measured run time, render, and return the snapshot
    pub fn finish(self, total: Duration) -> Snapshot {
        let Drained {
            aggregator,
            mut sink,
            output,
        } = self;

        let snapshot = aggregator.finalize(total);
        if let Err(e) = print(&snapshot, &output, &mut sink) {
            error!("Failed to render report: {}", e);
        }
        snapshot
    }
}

/// Completion side of a spawned reporter
pub struct ReporterHandle<W> {
    done: oneshot::Receiver<Drained<W>>,
}

impl<W: Write> ReporterHandle<W> {
    /// Wait for the consumer to drain the feed
    ///
    /// The feed must be ended first (every sender dropped or closed),
    /// otherwise this waits forever.
    pub async fn wait(self) -> Result<Drained<W>> {
        self.done.await.map_err(|_| ReportError::ConsumerLost)
    }

    /// Wait for completion, then finalize with `total` and render
    pub async fn finish(self, total: Duration) -> Result<Snapshot> {
        let drained = self.wait().await?;
        debug!("Result consumer completed");
        Ok(drained.finish(total))
    }
}

fn print(snapshot: &Snapshot, output: &str, sink: &mut dyn Write) -> Result<()> {
    let renderer = renderer_for(output)?;
    renderer.render(snapshot, sink)?;
    writeln!(sink)?;
    sink.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed;
    use crate::results::RequestResult;
    use std::sync::{Arc, Mutex};

    /// Sink that keeps what was written for inspection after the reporter
    /// has taken ownership of it
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_spawn_and_finish() {
        let sink = SharedBuf::default();
        let (tx, rx) = feed::channel(16);
        let handle = Reporter::new(sink.clone(), rx, "csv", 3).spawn();

        for secs in 1..=3 {
            tx.send(RequestResult::success(Duration::from_secs(secs), 200))
                .await
                .unwrap();
        }
        tx.close();

        let snapshot = handle.finish(Duration::from_secs(3)).await.unwrap();
        assert_eq!(snapshot.num_successes, 3);
        assert_eq!(snapshot.average, 2.0);

        let text = sink.contents();
        assert!(text.starts_with("response-time,"));
        assert!(text.ends_with("\n\n"));
        assert_eq!(text.lines().filter(|l| !l.is_empty()).count(), 4);
    }

    #[tokio::test]
    async fn test_render_failure_still_returns_snapshot() {
        let (tx, rx) = feed::channel(4);
        let handle = Reporter::new(FailingSink, rx, "summary", 1).spawn();
        tx.send(RequestResult::success(Duration::from_secs(1), 200))
            .await
            .unwrap();
        drop(tx);

        let snapshot = handle.finish(Duration::from_secs(1)).await.unwrap();
        assert_eq!(snapshot.num_successes, 1);
    }

    #[tokio::test]
    async fn test_unknown_output_mode_still_returns_snapshot() {
        let sink = SharedBuf::default();
        let (tx, rx) = feed::channel(4);
        let handle = Reporter::new(sink.clone(), rx, "xml", 0).spawn();
        drop(tx);

        let snapshot = handle.finish(Duration::from_secs(1)).await.unwrap();
        assert_eq!(snapshot.num_results, 0);
        assert!(sink.contents().is_empty());
    }

    #[tokio::test]
    async fn test_with_max_results_applies_cap() {
        let (tx, rx) = feed::channel(8);
        let reporter = Reporter::new(std::io::sink(), rx, "json", 10).with_max_results(2);
        assert_eq!(reporter.config().max_results, 2);

        let producer = tokio::spawn(async move {
            for _ in 0..5 {
                tx.send(RequestResult::success(Duration::from_millis(5), 204))
                    .await
                    .unwrap();
            }
        });

        let drained = reporter.drain().await;
        producer.await.unwrap();
        assert_eq!(drained.aggregator().retained(), 2);
        assert_eq!(drained.aggregator().num_successes(), 5);

        let snapshot = drained.finish(Duration::from_secs(1));
        assert_eq!(snapshot.durations.len(), 2);
        assert_eq!(snapshot.throughput, 5.0);
    }
}
