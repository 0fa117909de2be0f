//! Admission policies deciding which transitions enter the buffer.
use super::Transition;

/// Decides whether an offered transition is stored.
///
/// Policies may be stateful (e.g., counting offers) and may inspect the
/// transition, but they never mutate it.
pub trait AdmissionPolicy<O, A> {
    /// Returns `true` when the transition should be stored.
    fn admit(&mut self, tr: &Transition<O, A>) -> bool;
}

/// Admits everything; retention is plain FIFO.
pub struct FifoAdmission;

impl<O, A> AdmissionPolicy<O, A> for FifoAdmission {
    fn admit(&mut self, _tr: &Transition<O, A>) -> bool {
        true
    }
}

/// Admits rewarding transitions unconditionally and the rest with a fixed
/// probability.
///
/// Used to keep a buffer from filling up with uneventful steps when the
/// reward signal is sparse.
pub struct RewardThresholdAdmission {
    /// Transitions with `reward >= threshold` are always admitted.
    pub threshold: f32,

    /// Probability of admitting a transition below the threshold.
    pub accept_prob: f64,
}

impl<O, A> AdmissionPolicy<O, A> for RewardThresholdAdmission {
    fn admit(&mut self, tr: &Transition<O, A>) -> bool {
        tr.reward >= self.threshold || fastrand::f64() < self.accept_prob
    }
}
