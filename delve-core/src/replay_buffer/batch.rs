//! Transitions and sampled batches.
use serde::{Deserialize, Serialize};

/// One recorded interaction, `(o_t, a_t, r_t, o_t+1, terminal_t)`.
///
/// Immutable once recorded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transition<O, A> {
    /// Observation before the action.
    pub obs: O,

    /// The action taken.
    pub act: A,

    /// Reward obtained for the action.
    pub reward: f32,

    /// Observation after the action.
    pub next_obs: O,

    /// 1 when the episode ended on this transition.
    pub is_terminated: i8,
}

impl<O, A> Transition<O, A> {
    /// Constructs a transition.
    pub fn new(obs: O, act: A, reward: f32, next_obs: O, is_terminated: i8) -> Self {
        Self {
            obs,
            act,
            reward,
            next_obs,
            is_terminated,
        }
    }
}

/// A batch of transitions sampled for training.
pub struct TransitionBatch<O, A> {
    /// Observations `o_t`.
    pub obs: Vec<O>,

    /// Actions `a_t`.
    pub act: Vec<A>,

    /// Next observations `o_t+1`.
    pub next_obs: Vec<O>,

    /// Rewards `r_t`.
    pub reward: Vec<f32>,

    /// Termination flags.
    pub is_terminated: Vec<i8>,
}

impl<O, A> TransitionBatch<O, A> {
    /// Returns the number of transitions in the batch.
    pub fn len(&self) -> usize {
        self.reward.len()
    }

    /// Returns `true` when the batch holds no transition.
    pub fn is_empty(&self) -> bool {
        self.reward.is_empty()
    }

    /// Unpacks the data `(o_t, a_t, o_t+1, r_t, terminal_t)`.
    #[allow(clippy::type_complexity)]
    pub fn unpack(self) -> (Vec<O>, Vec<A>, Vec<O>, Vec<f32>, Vec<i8>) {
        (
            self.obs,
            self.act,
            self.next_obs,
            self.reward,
            self.is_terminated,
        )
    }

    pub(super) fn with_capacity(capacity: usize) -> Self {
        Self {
            obs: Vec::with_capacity(capacity),
            act: Vec::with_capacity(capacity),
            next_obs: Vec::with_capacity(capacity),
            reward: Vec::with_capacity(capacity),
            is_terminated: Vec::with_capacity(capacity),
        }
    }

    pub(super) fn push(&mut self, tr: &Transition<O, A>)
    where
        O: Clone,
        A: Clone,
    {
        self.obs.push(tr.obs.clone());
        self.act.push(tr.act.clone());
        self.next_obs.push(tr.next_obs.clone());
        self.reward.push(tr.reward);
        self.is_terminated.push(tr.is_terminated);
    }
}
