//! One connection attempt: checkout, open folder, start the part fetch.

use std::time::Duration;

use super::AttachmentFetcher;
use crate::decode::{decode_stream, DecodedStream};
use crate::error::FetchError;
use crate::pool::{AcquireOptions, ConnectionPool, FetchOptions, MailSession};
use crate::record::{AttachmentDescriptor, FetchContext};
use crate::telemetry::TelemetrySink;

impl<P, T> AttachmentFetcher<P, T>
where
    P: ConnectionPool,
    T: TelemetrySink,
{
    /// Run a single attempt. On success the lease moves into the returned
    /// stream; on any error it is dropped here, which hands it back.
    pub(super) async fn attempt(
        &self,
        descriptor: &AttachmentDescriptor,
        context: &FetchContext,
        socket_timeout: Duration,
    ) -> Result<DecodedStream, FetchError> {
        let options = AcquireOptions {
            desired_count: 1,
            socket_timeout,
        };
        let mut lease = self.pool.acquire(&context.account, &options).await?;
        let session = lease.session();

        let container = session.open_container(&context.container).await?;
        let fetch_options = FetchOptions {
            part_id: descriptor.part_id.clone(),
            want_structure: true,
        };
        let raw = session
            .fetch_stream(&container, context.locator, &fetch_options)
            .await?
            .ok_or_else(|| FetchError::MissingBody {
                attachment_id: descriptor.id.clone(),
            })?;

        let decoded = decode_stream(
            raw,
            descriptor.transfer_encoding(),
            descriptor.charset.as_deref(),
        );
        Ok(decoded.hold_lease(lease))
    }
}
