//! Fire-and-forget event sink for retrieval telemetry.

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// Event recorded each time a fetch attempt times out.
pub const TIMEOUT_EVENT: &str = "Timeout error downloading file";

/// Receives named events with JSON attributes.
///
/// Implementations must not block and cannot fail: the fetch loop calls
/// `record` inline between attempts.
pub trait TelemetrySink: Send + Sync {
    fn record(&self, event: &str, attributes: &Value);
}

impl<T: TelemetrySink + ?Sized> TelemetrySink for Arc<T> {
    fn record(&self, event: &str, attributes: &Value) {
        (**self).record(event, attributes)
    }
}

/// Sink that turns events into `tracing` records under the `mailfetch::telemetry` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn record(&self, event: &str, attributes: &Value) {
        tracing::info!(target: "mailfetch::telemetry", event, %attributes, "telemetry event");
    }
}

/// Attributes of a `TIMEOUT_EVENT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutEvent<'a> {
    pub account_id: &'a str,
    pub provider: &'a str,
    /// Socket timeout the failed attempt ran with.
    pub socket_timeout: Duration,
    /// Timeouts seen so far in this fetch, including this one.
    pub num_timeout_errors: u32,
}

impl TimeoutEvent<'_> {
    pub fn attributes(&self) -> Value {
        json!({
            "accountId": self.account_id,
            "provider": self.provider,
            "socketTimeout": self.socket_timeout.as_millis() as u64,
            "numTimeoutErrors": self.num_timeout_errors,
        })
    }
}
