//! Connection pool whose every checkout follows a per-account script.

use async_trait::async_trait;
use mailfetch_core::error::SessionError;
use mailfetch_core::pool::{
    AcquireOptions, Account, BodyStream, ConnectionPool, ContainerHandle, FetchOptions, Lease,
    MailSession,
};
use mailfetch_core::telemetry::TelemetrySink;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What happens on one checkout.
#[derive(Debug, Clone)]
pub enum Step {
    /// Pool could not connect in time.
    TimeoutOnConnect,
    /// Connected, but opening the folder timed out.
    TimeoutOnOpen,
    AuthFailure,
    ConnectionReset,
    /// Server answered the fetch without a body.
    NoBody,
    Body(Vec<u8>),
    /// Opening the folder never completes.
    Hang,
}

/// One fetch request seen by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenFetch {
    pub container: String,
    pub locator: u32,
    pub options: FetchOptions,
}

#[derive(Default)]
pub struct ScriptedPool {
    scripts: Mutex<HashMap<String, VecDeque<Step>>>,
    requests: Mutex<Vec<(String, AcquireOptions)>>,
    fetches: Arc<Mutex<Vec<SeenFetch>>>,
    returned: Arc<AtomicUsize>,
}

impl ScriptedPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, account_id: &str, steps: Vec<Step>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(account_id.to_string(), steps.into());
        self
    }

    /// Checkouts requested so far, in order.
    pub fn requests(&self) -> Vec<(String, AcquireOptions)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn socket_timeouts_for(&self, account_id: &str) -> Vec<u64> {
        self.requests()
            .into_iter()
            .filter(|(id, _)| id == account_id)
            .map(|(_, o)| o.socket_timeout.as_secs())
            .collect()
    }

    pub fn fetches(&self) -> Vec<SeenFetch> {
        self.fetches.lock().unwrap().clone()
    }

    /// Leases handed back to the pool.
    pub fn returned(&self) -> usize {
        self.returned.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectionPool for ScriptedPool {
    type Session = ScriptedSession;

    async fn acquire(
        &self,
        account: &Account,
        options: &AcquireOptions,
    ) -> Result<Lease<ScriptedSession>, SessionError> {
        self.requests
            .lock()
            .unwrap()
            .push((account.id.clone(), *options));
        let step = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&account.id)
            .and_then(VecDeque::pop_front);

        match step {
            None => Err(SessionError::Protocol("script exhausted".into())),
            Some(Step::TimeoutOnConnect) => Err(SessionError::Timeout(options.socket_timeout)),
            Some(Step::AuthFailure) => Err(SessionError::Auth("invalid credentials".into())),
            Some(step) => {
                let returned = Arc::clone(&self.returned);
                let session = ScriptedSession {
                    step,
                    fetches: Arc::clone(&self.fetches),
                };
                Ok(Lease::new(session, move |_| {
                    returned.fetch_add(1, Ordering::SeqCst);
                }))
            }
        }
    }
}

pub struct ScriptedSession {
    step: Step,
    fetches: Arc<Mutex<Vec<SeenFetch>>>,
}

#[async_trait]
impl MailSession for ScriptedSession {
    async fn open_container(&mut self, name: &str) -> Result<ContainerHandle, SessionError> {
        match self.step {
            Step::TimeoutOnOpen => Err(SessionError::Timeout(std::time::Duration::from_secs(1))),
            Step::ConnectionReset => Err(SessionError::ConnectionReset),
            Step::Hang => std::future::pending().await,
            _ => Ok(ContainerHandle {
                name: name.to_string(),
            }),
        }
    }

    async fn fetch_stream(
        &mut self,
        container: &ContainerHandle,
        locator: u32,
        options: &FetchOptions,
    ) -> Result<Option<BodyStream>, SessionError> {
        self.fetches.lock().unwrap().push(SeenFetch {
            container: container.name.clone(),
            locator,
            options: options.clone(),
        });
        match &self.step {
            Step::Body(bytes) => Ok(Some(Box::pin(Cursor::new(bytes.clone())))),
            _ => Ok(None),
        }
    }
}

/// Telemetry sink that keeps every event.
#[derive(Default)]
pub struct RecordingTelemetry {
    events: Mutex<Vec<(String, Value)>>,
}

impl RecordingTelemetry {
    pub fn events(&self) -> Vec<(String, Value)> {
        self.events.lock().unwrap().clone()
    }
}

impl TelemetrySink for RecordingTelemetry {
    fn record(&self, event: &str, attributes: &Value) {
        self.events
            .lock()
            .unwrap()
            .push((event.to_string(), attributes.clone()));
    }
}
