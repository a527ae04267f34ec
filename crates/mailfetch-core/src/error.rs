//! Error taxonomy for attachment retrieval.
//!
//! `SessionError` is what the pool and protocol layers hand back; `FetchError`
//! is what callers of the fetcher see. Only `SessionError::Timeout` is ever
//! recovered locally (see `retry::classify`).

use std::time::Duration;
use thiserror::Error;

/// Error reported by the connection pool or a protocol session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Socket or operation timed out at the connection level.
    #[error("connection timed out after {0:?}")]
    Timeout(Duration),
    /// The store rejected the account credentials.
    #[error("authentication failed: {0}")]
    Auth(String),
    /// The server answered with something the protocol layer could not accept.
    #[error("protocol error: {0}")]
    Protocol(String),
    /// Peer closed the connection mid-command.
    #[error("connection reset by peer")]
    ConnectionReset,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Error reported by the record layer while resolving an attachment.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("no attachment with id {0}")]
    NotFound(String),
    /// Owning message or folder could not be resolved.
    #[error("attachment {id} has no resolvable location: {reason}")]
    Unlocated { id: String, reason: String },
}

/// Terminal outcome of a failed fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The protocol layer produced no stream for the requested part. Not retried.
    #[error("unable to fetch binary data for attachment {attachment_id}")]
    MissingBody { attachment_id: String },
    /// Every attempt timed out; the fetcher gave up.
    #[error("gave up on attachment {attachment_id} after {attempts} timed out attempts")]
    RetryLimitExceeded { attachment_id: String, attempts: u32 },
    /// Non-timeout error from the pool or session, passed through unmodified.
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Invalid retry bounds. Raised when settings are built, never inside the fetch loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("base delay must be greater than zero")]
    ZeroBaseDelay,
    #[error("max delay {max:?} is smaller than base delay {base:?}")]
    MaxBelowBase { base: Duration, max: Duration },
    #[error("max_timeout_errors must be at least 1")]
    ZeroTimeoutCap,
    #[error("invalid delay value: {0}")]
    InvalidDelay(String),
}
