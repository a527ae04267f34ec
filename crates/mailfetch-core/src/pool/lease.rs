//! RAII lease that hands a session back to its pool when dropped.

use std::fmt;
use std::mem::ManuallyDrop;

type ReturnFn<S> = Box<dyn FnOnce(S) + Send>;

/// A checked-out session. Returned to the pool exactly once: on `release()`,
/// or on drop if the holder bails out early (error, `?`, cancelled future).
pub struct Lease<S> {
    session: ManuallyDrop<S>,
    return_to_pool: Option<ReturnFn<S>>,
}

impl<S> Lease<S> {
    /// Wrap `session`; `return_to_pool` is invoked with it when the lease ends.
    pub fn new<F>(session: S, return_to_pool: F) -> Self
    where
        F: FnOnce(S) + Send + 'static,
    {
        Self {
            session: ManuallyDrop::new(session),
            return_to_pool: Some(Box::new(return_to_pool)),
        }
    }

    /// The leased session.
    pub fn session(&mut self) -> &mut S {
        &mut self.session
    }

    /// Signal that this connection's use is done.
    pub fn release(self) {
        drop(self);
    }
}

impl<S> Drop for Lease<S> {
    fn drop(&mut self) {
        // SAFETY: `session` is taken exactly once, here, and never touched again.
        let session = unsafe { ManuallyDrop::take(&mut self.session) };
        if let Some(give_back) = self.return_to_pool.take() {
            give_back(session);
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for Lease<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lease")
            .field("session", &*self.session)
            .finish_non_exhaustive()
    }
}
