//! # Per-Request Result Records
//!
//! A [`RequestResult`] is the unit of data flowing through the result feed:
//! one measured outcome of a single request attempt, produced by a worker and
//! consumed by the aggregator. Timing is measured by the producer; the
//! reporting engine never computes it.
//!
//! ## Serialization
//!
//! Records (de)serialize with every duration expressed as floating-point
//! seconds, which is the format the replay CLI reads from JSON lines:
//!
//! ```json
//! {"duration":0.120,"connect":0.010,"dns":0.002,"status_code":200,"offset":1.5}
//! ```
//!
//! Phase fields, `content_length` and `offset` may be omitted and default to
//! zero. A record with `err` set counts only towards the error tally.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Named sub-durations of a request attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Connection establishment including DNS
    Connect,
    /// DNS lookup
    Dns,
    /// TLS handshake (zero when TLS is not used)
    Tls,
    /// Writing the request
    RequestWrite,
    /// Reading the response body
    ResponseRead,
    /// Waiting for the first response byte
    DelayWait,
}

impl Phase {
    /// Every phase, in the order reports list them
    pub const ALL: [Phase; 6] = [
        Phase::Connect,
        Phase::Dns,
        Phase::Tls,
        Phase::RequestWrite,
        Phase::ResponseRead,
        Phase::DelayWait,
    ];

    /// Position of this phase in [`Phase::ALL`]
    pub fn index(self) -> usize {
        match self {
            Phase::Connect => 0,
            Phase::Dns => 1,
            Phase::Tls => 2,
            Phase::RequestWrite => 3,
            Phase::ResponseRead => 4,
            Phase::DelayWait => 5,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Connect => write!(f, "DNS+dialup"),
            Phase::Dns => write!(f, "DNS-lookup"),
            Phase::Tls => write!(f, "TLS handshake"),
            Phase::RequestWrite => write!(f, "req write"),
            Phase::ResponseRead => write!(f, "resp read"),
            Phase::DelayWait => write!(f, "resp wait"),
        }
    }
}

/// One measured outcome of a single request attempt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestResult {
    /// Total wall-clock time of the attempt
    #[serde(with = "seconds")]
    pub duration: Duration,
    #[serde(default, with = "seconds")]
    pub connect: Duration,
    #[serde(default, with = "seconds")]
    pub dns: Duration,
    #[serde(default, with = "seconds")]
    pub tls: Duration,
    #[serde(default, with = "seconds")]
    pub request_write: Duration,
    #[serde(default, with = "seconds")]
    pub response_read: Duration,
    #[serde(default, with = "seconds")]
    pub delay_wait: Duration,
    /// HTTP status; meaningless when `err` is set
    #[serde(default)]
    pub status_code: u16,
    /// Response payload size; zero or negative means unknown
    #[serde(default)]
    pub content_length: i64,
    /// Time since the run started when this attempt happened
    #[serde(default, with = "seconds")]
    pub offset: Duration,
    /// Failure description, if the attempt failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
}

impl RequestResult {
    /// A successful attempt with the given total duration and status code
    pub fn success(duration: Duration, status_code: u16) -> Self {
        Self {
            duration,
            status_code,
            ..Default::default()
        }
    }

    /// A failed attempt described by `err`
    pub fn failure(err: impl Into<String>) -> Self {
        Self {
            err: Some(err.into()),
            ..Default::default()
        }
    }

    pub fn with_phase(mut self, phase: Phase, value: Duration) -> Self {
        *self.phase_mut(phase) = value;
        self
    }

    pub fn with_content_length(mut self, content_length: i64) -> Self {
        self.content_length = content_length;
        self
    }

    pub fn with_offset(mut self, offset: Duration) -> Self {
        self.offset = offset;
        self
    }

    /// Duration spent in `phase`
    pub fn phase(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Connect => self.connect,
            Phase::Dns => self.dns,
            Phase::Tls => self.tls,
            Phase::RequestWrite => self.request_write,
            Phase::ResponseRead => self.response_read,
            Phase::DelayWait => self.delay_wait,
        }
    }

    fn phase_mut(&mut self, phase: Phase) -> &mut Duration {
        match phase {
            Phase::Connect => &mut self.connect,
            Phase::Dns => &mut self.dns,
            Phase::Tls => &mut self.tls,
            Phase::RequestWrite => &mut self.request_write,
            Phase::ResponseRead => &mut self.response_read,
            Phase::DelayWait => &mut self.delay_wait,
        }
    }

    pub fn is_error(&self) -> bool {
        self.err.is_some()
    }

    /// Moment this attempt completed, relative to the run start
    pub fn completed_at(&self) -> Duration {
        self.offset + self.duration
    }
}

/// Serde adapter storing a `Duration` as floating-point seconds
pub(crate) mod seconds {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs)
            .map_err(|e| D::Error::custom(format!("invalid duration {}: {}", secs, e)))
    }
}
