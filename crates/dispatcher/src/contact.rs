//! Contact state tracker

use contracts::{ContactSet, StateEstimator};
use tracing::debug;

/// Forwards each contact set to the estimator as a full replacement.
///
/// Holds nothing between calls; merging, if any, is the estimator's job.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactTracker;

impl ContactTracker {
    pub fn new() -> Self {
        Self
    }

    /// Forward `set` verbatim, returning the number of legs reported
    pub fn forward<E>(&self, estimator: &mut E, set: &ContactSet) -> usize
    where
        E: StateEstimator + ?Sized,
    {
        debug!(
            t = set.timestamp,
            legs = set.contacts.len(),
            in_contact = set.contacts.iter().filter(|c| c.in_contact).count(),
            "forwarding contact set"
        );
        estimator.set_contacts(&set.contacts);
        set.contacts.len()
    }
}
