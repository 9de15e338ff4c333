//! Outcome hand-off from a background job to the owner context.
//!
//! The background task never touches shared state.  It packs the finished
//! [`Job`] and its result into a [`Delivery`] and posts it on an mpsc
//! channel drained by the owner loop ([`OutcomeReceiver`]).  The admission
//! permit travels inside the delivery, so admission cannot reopen before the
//! owner has received the outcome.

use std::path::PathBuf;

use tokio::sync::mpsc;

use super::admission::AdmissionPermit;
use super::error::JobError;
use super::state::Job;

/// Capacity of the outcome channel.  Single-flight means at most one
/// delivery is ever in flight.
pub(crate) const OUTCOME_CHANNEL_CAPACITY: usize = 4;

/// Final state of one job together with its result.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub job: Job,
    pub result: Result<PathBuf, JobError>,
}

/// One outcome as received by the owner context.
///
/// Holding a `Delivery` keeps admission closed; hand it to
/// [`JobController::complete`](super::JobController::complete) to finish the
/// job.
#[derive(Debug)]
pub struct Delivery {
    pub outcome: JobOutcome,
    permit: AdmissionPermit,
}

impl Delivery {
    pub(crate) fn into_parts(self) -> (JobOutcome, AdmissionPermit) {
        (self.outcome, self.permit)
    }
}

// ---------------------------------------------------------------------------
// ResultDispatcher
// ---------------------------------------------------------------------------

/// Sends exactly one [`Delivery`] per job.  `dispatch` consumes the
/// dispatcher, so a second notification cannot be expressed.
pub struct ResultDispatcher {
    tx: mpsc::Sender<Delivery>,
    permit: AdmissionPermit,
}

impl ResultDispatcher {
    pub(crate) fn new(tx: mpsc::Sender<Delivery>, permit: AdmissionPermit) -> Self {
        Self { tx, permit }
    }

    pub async fn dispatch(self, outcome: JobOutcome) {
        let id = outcome.job.id;
        let delivery = Delivery {
            outcome,
            permit: self.permit,
        };
        // If the owner is gone the delivery (and its permit) is dropped here,
        // which reopens admission.
        if self.tx.send(delivery).await.is_err() {
            log::warn!("dispatch: owner context gone, outcome of job {id} dropped");
        } else {
            log::debug!("dispatch: outcome of job {id} posted");
        }
    }
}

// ---------------------------------------------------------------------------
// OutcomeReceiver
// ---------------------------------------------------------------------------

/// The owner context's end of the outcome channel.
pub struct OutcomeReceiver {
    rx: mpsc::Receiver<Delivery>,
}

impl OutcomeReceiver {
    pub(crate) fn new(rx: mpsc::Receiver<Delivery>) -> Self {
        Self { rx }
    }

    /// Wait for the next outcome.  `None` once every controller is dropped.
    pub async fn recv(&mut self) -> Option<Delivery> {
        self.rx.recv().await
    }

    /// Non-blocking poll, for owner loops that drain once per tick.
    pub fn try_recv(&mut self) -> Option<Delivery> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::admission::Admission;

    fn outcome() -> JobOutcome {
        JobOutcome {
            job: Job::new(PathBuf::from("page.png"), None),
            result: Err(JobError::Internal("x".into())),
        }
    }

    #[tokio::test]
    async fn permit_is_held_until_delivery_is_consumed() {
        let adm = Admission::new();
        let (tx, rx) = mpsc::channel(OUTCOME_CHANNEL_CAPACITY);
        let mut rx = OutcomeReceiver::new(rx);

        let dispatcher = ResultDispatcher::new(tx, adm.try_acquire().unwrap());
        dispatcher.dispatch(outcome()).await;
        assert!(adm.is_busy());

        let delivery = rx.try_recv().expect("one delivery");
        assert!(adm.is_busy());
        let (_outcome, permit) = delivery.into_parts();
        drop(permit);
        assert!(!adm.is_busy());
        assert!(rx.try_recv().is_none());
    }

    #[tokio::test]
    async fn closed_owner_reopens_admission() {
        let adm = Admission::new();
        let (tx, rx) = mpsc::channel(OUTCOME_CHANNEL_CAPACITY);
        drop(rx);

        ResultDispatcher::new(tx, adm.try_acquire().unwrap())
            .dispatch(outcome())
            .await;
        assert!(!adm.is_busy());
    }
}
