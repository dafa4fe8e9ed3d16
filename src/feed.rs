//! # Result Feed
//!
//! The feed is the only synchronization point between request-executing
//! workers and the aggregator. Any number of [`ResultSender`] clones push
//! records concurrently; a single [`ResultReceiver`] pops them in arrival
//! order. Ordering across different senders is not defined.
//!
//! End-of-stream is signalled when the last sender is dropped (or passed to
//! [`ResultSender::close`]). The receiver observes it exactly once, as the
//! first `None` from [`ResultReceiver::recv`], after every buffered record has
//! been delivered.

use crate::error::{ReportError, Result};
use crate::results::RequestResult;
use tokio::sync::mpsc;
use tracing::trace;

/// Create a bounded result feed holding at most `capacity` in-flight records
///
/// Producers block (asynchronously, or the calling thread with
/// [`ResultSender::blocking_send`]) while the feed is full.
pub fn channel(capacity: usize) -> (ResultSender, ResultReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (ResultSender { tx }, ResultReceiver { rx })
}

/// Producer handle to the result feed
#[derive(Debug, Clone)]
pub struct ResultSender {
    tx: mpsc::Sender<RequestResult>,
}

impl ResultSender {
    /// Push a record, waiting while the feed is full
    pub async fn send(&self, result: RequestResult) -> Result<()> {
        self.tx
            .send(result)
            .await
            .map_err(|_| ReportError::FeedClosed)
    }

    /// Push a record from a non-async thread, blocking while the feed is full
    ///
    /// Must not be called from within an async runtime context.
    pub fn blocking_send(&self, result: RequestResult) -> Result<()> {
        self.tx
            .blocking_send(result)
            .map_err(|_| ReportError::FeedClosed)
    }

    /// Drop this producer handle. The feed ends once every handle is gone.
    pub fn close(self) {
        trace!("result sender closed");
    }

    /// Whether the consuming side has gone away
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer handle to the result feed
#[derive(Debug)]
pub struct ResultReceiver {
    rx: mpsc::Receiver<RequestResult>,
}

impl ResultReceiver {
    /// Next record, or `None` once the feed has ended and been drained
    pub async fn recv(&mut self) -> Option<RequestResult> {
        self.rx.recv().await
    }

    /// Stop accepting new records; already buffered records stay drainable
    ///
    /// Used for early shutdown: producers see [`ReportError::FeedClosed`] and
    /// the consumer finishes with whatever was ingested.
    pub fn close(&mut self) {
        self.rx.close();
    }
}
