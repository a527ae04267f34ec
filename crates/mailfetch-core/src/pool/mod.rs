//! Interfaces to the connection pool and the protocol session it hands out.
//!
//! The fetcher never talks to a socket directly. It asks a `ConnectionPool`
//! for a `Lease` scoped to one account, drives the leased `MailSession`
//! (open container, fetch a streamed part). A failed attempt lets the lease
//! go on the spot; a successful one hands it to the returned stream, which
//! keeps it until the body has been read or abandoned.

mod lease;

use async_trait::async_trait;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncRead;

use crate::error::SessionError;

pub use lease::Lease;

/// Raw body bytes as delivered by the protocol layer, pulled lazily by the consumer.
pub type BodyStream = Pin<Box<dyn AsyncRead + Send + 'static>>;

/// Account a connection is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    /// Provider name (e.g. "gmail", "imap"), carried into telemetry.
    pub provider: String,
}

/// Parameters for one pool checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquireOptions {
    /// Number of connections wanted. The fetcher always asks for one.
    pub desired_count: usize,
    /// Socket/operation timeout the connection should be configured with.
    pub socket_timeout: Duration,
}

/// An opened remote container (mail folder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle {
    pub name: String,
}

/// What to fetch from a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// MIME part to fetch; `None` fetches the whole body.
    pub part_id: Option<String>,
    /// Ask the server for the body structure alongside the stream.
    pub want_structure: bool,
}

/// Pool of live sessions to the remote store.
#[async_trait]
pub trait ConnectionPool: Send + Sync {
    type Session: MailSession + 'static;

    /// Check out a connection for `account`, configured with `options.socket_timeout`.
    ///
    /// May wait for a free slot. Returns `SessionError::Timeout` when the
    /// connection could not be established in time.
    async fn acquire(
        &self,
        account: &Account,
        options: &AcquireOptions,
    ) -> Result<Lease<Self::Session>, SessionError>;
}

/// A live protocol session.
#[async_trait]
pub trait MailSession: Send {
    async fn open_container(&mut self, name: &str) -> Result<ContainerHandle, SessionError>;

    /// Start a streamed fetch of `locator` in `container`.
    ///
    /// `Ok(None)` means the server answered but produced no body for the
    /// requested part.
    async fn fetch_stream(
        &mut self,
        container: &ContainerHandle,
        locator: u32,
        options: &FetchOptions,
    ) -> Result<Option<BodyStream>, SessionError>;
}

#[async_trait]
impl<P: ConnectionPool + ?Sized> ConnectionPool for Arc<P> {
    type Session = P::Session;

    async fn acquire(
        &self,
        account: &Account,
        options: &AcquireOptions,
    ) -> Result<Lease<Self::Session>, SessionError> {
        (**self).acquire(account, options).await
    }
}
