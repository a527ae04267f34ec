//! Attachment retrieval with timeout-driven retries.
//!
//! Each fetch runs its attempts strictly one after another. An attempt checks
//! out one pooled connection with the scheduler's current delay as its socket
//! timeout, opens the folder, and starts a streamed fetch of the part. A
//! connection-level timeout records a telemetry event, doubles the delay and
//! tries again; any other failure ends the fetch on the spot.

mod attempt;

use std::time::Duration;

use crate::decode::DecodedStream;
use crate::error::{ConfigError, FetchError};
use crate::pool::ConnectionPool;
use crate::record::{AttachmentDescriptor, FetchContext, RecordProvider};
use crate::retry::{classify, ErrorKind, RetryScheduler, BASE_DELAY, MAX_DELAY, MAX_TIMEOUT_ERRORS};
use crate::telemetry::{TelemetrySink, TimeoutEvent, TIMEOUT_EVENT};

/// Retry bounds for a fetcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSettings {
    /// Timed out attempts tolerated before giving up.
    pub max_timeout_errors: u32,
    /// Socket timeout of the first attempt.
    pub base_delay: Duration,
    /// Ceiling for the escalating socket timeout.
    pub max_delay: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            max_timeout_errors: MAX_TIMEOUT_ERRORS,
            base_delay: BASE_DELAY,
            max_delay: MAX_DELAY,
        }
    }
}

impl FetchSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_timeout_errors == 0 {
            return Err(ConfigError::ZeroTimeoutCap);
        }
        RetryScheduler::new(self.base_delay, self.max_delay).map(|_| ())
    }
}

/// Fetches attachment bodies through a connection pool.
///
/// Holds no per-fetch state, so one fetcher can serve concurrent fetches;
/// every call gets a fresh scheduler.
#[derive(Debug)]
pub struct AttachmentFetcher<P, T> {
    pool: P,
    telemetry: T,
    max_timeout_errors: u32,
    scheduler: RetryScheduler,
}

impl<P, T> AttachmentFetcher<P, T>
where
    P: ConnectionPool,
    T: TelemetrySink,
{
    /// Validates `settings` once; the fetch loop itself never sees a config error.
    pub fn new(pool: P, telemetry: T, settings: FetchSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            pool,
            telemetry,
            max_timeout_errors: settings.max_timeout_errors,
            scheduler: RetryScheduler::new(settings.base_delay, settings.max_delay)?,
        })
    }

    /// Fetch and decode the body of `descriptor`.
    ///
    /// Returns the decoded stream as soon as the fetch request has been
    /// accepted; bytes are pulled by the caller. Failed attempts hand their
    /// connection back before the next one starts. The connection behind a
    /// returned stream stays checked out until the stream reaches end of input
    /// or is dropped.
    pub async fn fetch(
        &self,
        descriptor: &AttachmentDescriptor,
        context: &FetchContext,
    ) -> Result<DecodedStream, FetchError> {
        let mut scheduler = self.scheduler.clone();
        let mut timeouts = 0u32;

        while timeouts < self.max_timeout_errors {
            let socket_timeout = scheduler.current_delay();
            tracing::debug!(
                attachment = %descriptor.id,
                account = %context.account.id,
                attempt = timeouts + 1,
                socket_timeout_ms = socket_timeout.as_millis() as u64,
                "fetching attachment"
            );

            match self.attempt(descriptor, context, socket_timeout).await {
                Ok(stream) => {
                    tracing::info!(
                        attachment = %descriptor.id,
                        encoding = %stream.encoding(),
                        timeouts,
                        "attachment stream ready"
                    );
                    return Ok(stream);
                }
                Err(FetchError::Session(e)) if classify(&e) == ErrorKind::Timeout => {
                    timeouts += 1;
                    self.telemetry.record(
                        TIMEOUT_EVENT,
                        &TimeoutEvent {
                            account_id: &context.account.id,
                            provider: &context.account.provider,
                            socket_timeout,
                            num_timeout_errors: timeouts,
                        }
                        .attributes(),
                    );
                    let next = scheduler.next_delay();
                    tracing::warn!(
                        attachment = %descriptor.id,
                        timeouts,
                        max = self.max_timeout_errors,
                        next_socket_timeout_ms = next.as_millis() as u64,
                        "attachment fetch timed out: {}",
                        e
                    );
                }
                Err(e) => {
                    tracing::debug!(attachment = %descriptor.id, "attachment fetch failed: {}", e);
                    return Err(e);
                }
            }
        }

        tracing::warn!(
            attachment = %descriptor.id,
            timeouts,
            "giving up on attachment after repeated timeouts"
        );
        Err(FetchError::RetryLimitExceeded {
            attachment_id: descriptor.id.clone(),
            attempts: timeouts,
        })
    }

    /// Look up an attachment and its location through `records`, then fetch it.
    pub async fn fetch_by_id<R>(&self, records: &R, attachment_id: &str) -> Result<DecodedStream, FetchError>
    where
        R: RecordProvider + ?Sized,
    {
        let descriptor = records.attachment(attachment_id).await?;
        let context = records.locate(&descriptor).await?;
        self.fetch(&descriptor, &context).await
    }
}
