//! Error types for the reporting engine.
//!
//! Per-request failures are never represented here: they are data, tallied by
//! the aggregator. These variants cover the few things around the core that
//! can actually fail (rendering, replay input, and the consumer task).

use thiserror::Error;

/// Result type alias for reporting operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors raised by rendering, replay input handling, or orchestration
#[derive(Debug, Error)]
pub enum ReportError {
    /// The output mode string does not name a known renderer
    #[error("unknown output mode: {0:?} (expected \"summary\", \"csv\" or \"json\")")]
    UnknownOutputMode(String),

    /// Writing to the output sink or reading replay input failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot serialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A replay input line could not be decoded into a result record
    #[error("invalid record on line {line}: {source}")]
    InvalidRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A producer pushed into a feed whose consumer is gone
    #[error("result feed is closed")]
    FeedClosed,

    /// The consumer task ended without signalling completion
    #[error("result consumer stopped before signalling completion")]
    ConsumerLost,
}
