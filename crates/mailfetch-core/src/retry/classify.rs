//! Classify session errors into retry kinds.

use crate::error::SessionError;

/// High-level classification of a session error for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection-level timeout; retried with a longer socket timeout.
    Timeout,
    /// Anything else (auth, protocol, reset, io). Never retried.
    Other,
}

/// Classify a pool or session error.
///
/// An io error of kind `TimedOut` counts as a timeout too, since some
/// protocol layers surface socket timeouts that way instead of mapping them.
pub fn classify(e: &SessionError) -> ErrorKind {
    match e {
        SessionError::Timeout(_) => ErrorKind::Timeout,
        SessionError::Io(io) if io.kind() == std::io::ErrorKind::TimedOut => ErrorKind::Timeout,
        SessionError::Auth(_)
        | SessionError::Protocol(_)
        | SessionError::ConnectionReset
        | SessionError::Io(_) => ErrorKind::Other,
    }
}
