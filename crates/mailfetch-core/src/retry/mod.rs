//! Retry and backoff policy.
//!
//! This module holds the escalating timeout scheduler and the error
//! classification that decides which session failures are worth another
//! attempt, so the fetcher loop stays a thin driver over both.

mod classify;
mod scheduler;

pub use classify::{classify, ErrorKind};
pub use scheduler::{RetryScheduler, BASE_DELAY, MAX_DELAY, MAX_TIMEOUT_ERRORS};
