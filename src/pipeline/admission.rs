//! Single-flight admission flag.
//!
//! [`Admission::try_acquire`] tests and sets the flag in one atomic
//! compare-exchange.  The returned [`AdmissionPermit`] clears it when
//! dropped, so admission reopens exactly when the permit's holder lets go.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct Admission {
    busy: Arc<AtomicBool>,
}

impl Admission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Claim the pipeline, or `None` if a job already holds it.
    pub fn try_acquire(&self) -> Option<AdmissionPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| AdmissionPermit {
                busy: Arc::clone(&self.busy),
            })
    }
}

/// Proof that the holder owns the pipeline.  Dropping it reopens admission.
#[must_use = "dropping the permit immediately reopens admission"]
#[derive(Debug)]
pub struct AdmissionPermit {
    busy: Arc<AtomicBool>,
}

impl AdmissionPermit {
    /// Reopen admission now.
    pub fn release(self) {}
}

impl Drop for AdmissionPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
