//! Per-call context handed to every collaborator.
//!
//! The orchestrator never cancels a running job, but every collaborator call
//! still receives a [`CallContext`] so adapters can honour a cancellation
//! token or deadline when one is supplied.

use std::time::Instant;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CallContext {
    /// Job on whose behalf the call is made.
    pub job_id: Uuid,
    /// Cancelled when the call should be abandoned.
    pub cancel: CancellationToken,
    /// Absolute point in time after which the call should be abandoned.
    pub deadline: Option<Instant>,
}

impl CallContext {
    pub fn new(job_id: Uuid) -> Self {
        Self {
            job_id,
            cancel: CancellationToken::new(),
            deadline: None,
        }
    }

    /// A context not tied to any job, for calling collaborators directly.
    pub fn detached() -> Self {
        Self::new(Uuid::nil())
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// `true` once the token is cancelled or the deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.cancel.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn fresh_context_is_live() {
        let ctx = CallContext::new(Uuid::new_v4());
        assert!(!ctx.is_expired());
    }

    #[test]
    fn cancelled_token_expires_context() {
        let ctx = CallContext::detached();
        ctx.cancel.cancel();
        assert!(ctx.is_expired());
    }

    #[test]
    fn past_deadline_expires_context() {
        let past = Instant::now() - Duration::from_millis(1);
        let ctx = CallContext::detached().with_deadline(past);
        assert!(ctx.is_expired());
    }
}
