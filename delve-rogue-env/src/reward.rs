//! Reward strategies.
//!
//! A reward is a pure function of the old/new screen pair, computed from
//! the read-only [`RewardContext`] the environment assembles each step.
//! Every strategy is total: any pair of screens, including degenerate
//! ones, yields a finite number.
use crate::screen::Position;
use crate::status::StatusFields;
use serde::{Deserialize, Serialize};

/// Read-only view of one step, handed to [`RewardFn::compute`].
pub struct RewardContext<'a> {
    /// The new screen shows the game-over markers.
    pub game_over: bool,

    /// Parsed status of the previous screen; `None` off the map view.
    pub old_status: Option<&'a StatusFields>,

    /// Parsed status of the current screen; `None` off the map view.
    pub new_status: Option<&'a StatusFields>,

    /// Player marker on the previous screen.
    pub old_player: Option<Position>,

    /// Player marker on the current screen.
    pub new_player: Option<Position>,

    /// Non-blank map cells of the previous screen.
    pub old_explored: usize,

    /// Non-blank map cells of the current screen.
    pub new_explored: usize,

    /// Oldest and newest entries of the tracked position trail.
    pub trail_endpoints: Option<(Position, Position)>,
}

impl<'a> RewardContext<'a> {
    fn both_map_views(&self) -> Option<(&StatusFields, &StatusFields)> {
        match (self.old_status, self.new_status) {
            (Some(old), Some(new)) => Some((old, new)),
            _ => None,
        }
    }

    fn standing_still(&self, old: &StatusFields, new: &StatusFields) -> bool {
        self.old_player == self.new_player && old.dungeon_level == new.dungeon_level
    }
}

/// A pluggable reward policy.
pub trait RewardFn {
    /// Computes the reward for the transition described by `ctx`.
    fn compute(&mut self, ctx: &RewardContext) -> f32;

    /// Whether this policy decided the episode objective is reached and
    /// the episode must terminate early.
    fn objective_achieved(&self) -> bool {
        false
    }

    /// Clears per-episode state.
    fn reset(&mut self) {}
}

/// Selects a reward policy; used in environment configurations.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub enum RewardKind {
    /// +1 on descent or gold, else 0.
    Sparse,

    /// Sum of signed status-field deltas.
    Delta {
        /// Use raw deltas instead of ±1 per changed field.
        weighted: bool,
        /// Clip the sum to {-1, 0, +1}.
        clipped: bool,
    },

    /// Shaped for exploration: +100 descent, +5 new tiles, penalties for
    /// idling.
    Exploration {
        /// Terminate the episode on the first positive reward.
        latch_objective: bool,
    },

    /// Exploration shaping plus a bonus for distance covered over the
    /// tracked trail.
    DistanceBonus,
}

/// Builds the policy selected by `kind`.
pub fn build_reward(kind: &RewardKind) -> Box<dyn RewardFn + Send> {
    match *kind {
        RewardKind::Sparse => Box::new(SparseReward),
        RewardKind::Delta { weighted, clipped } => Box::new(DeltaReward { weighted, clipped }),
        RewardKind::Exploration { latch_objective } => Box::new(ExplorationReward {
            latch_objective,
            achieved: false,
        }),
        RewardKind::DistanceBonus => Box::new(DistanceBonusReward {
            inner: ExplorationReward {
                latch_objective: false,
                achieved: false,
            },
        }),
    }
}

/// Rewards only descending and gathering gold.
pub struct SparseReward;

impl RewardFn for SparseReward {
    fn compute(&mut self, ctx: &RewardContext) -> f32 {
        if ctx.game_over {
            return 0.0;
        }
        match ctx.both_map_views() {
            Some((old, new)) => {
                if new.dungeon_level > old.dungeon_level || new.gold > old.gold {
                    1.0
                } else {
                    0.0
                }
            }
            // some other view, probably a submenu
            None => 0.0,
        }
    }
}

/// Sums signed deltas over all parsed fields plus the explored-tile
/// count.
///
/// Unweighted, each changed field contributes ±1; weighted, the raw
/// in-game delta is used and a living cost of 0.1 is subtracted.
pub struct DeltaReward {
    weighted: bool,
    clipped: bool,
}

impl RewardFn for DeltaReward {
    fn compute(&mut self, ctx: &RewardContext) -> f32 {
        let reward = if ctx.game_over {
            if self.weighted {
                -0.1
            } else {
                -1.0
            }
        } else if let Some((old, new)) = ctx.both_map_views() {
            let mut deltas: Vec<i64> = old
                .values()
                .iter()
                .zip(new.values().iter())
                .map(|(o, n)| n - o)
                .collect();
            if new.dungeon_level == old.dungeon_level {
                deltas.push(ctx.new_explored as i64 - ctx.old_explored as i64);
            }
            if self.weighted {
                deltas.iter().sum::<i64>() as f32 - 0.1
            } else {
                deltas.iter().map(|d| d.signum()).sum::<i64>() as f32
            }
        } else {
            -1.0
        };

        if !self.clipped {
            reward
        } else if reward > 0.0 {
            1.0
        } else if reward < 0.0 {
            -1.0
        } else {
            0.0
        }
    }
}

/// +100 for descending, +5 for uncovering tiles, −1 for standing still,
/// −0.1 living cost.
pub struct ExplorationReward {
    latch_objective: bool,
    achieved: bool,
}

impl RewardFn for ExplorationReward {
    fn compute(&mut self, ctx: &RewardContext) -> f32 {
        let reward = match (ctx.game_over, ctx.both_map_views()) {
            (false, Some((old, new))) => {
                if new.dungeon_level > old.dungeon_level {
                    100.0
                } else if ctx.standing_still(old, new) {
                    -1.0
                } else if ctx.new_explored > ctx.old_explored {
                    5.0
                } else {
                    -0.1
                }
            }
            _ => -1.0,
        };
        if self.latch_objective && reward > 0.0 {
            self.achieved = true;
        }
        reward
    }

    fn objective_achieved(&self) -> bool {
        self.achieved
    }

    fn reset(&mut self) {
        self.achieved = false;
    }
}

/// Exploration shaping plus `0.1 × manhattan(oldest, newest)` over the
/// tracked trail.
pub struct DistanceBonusReward {
    inner: ExplorationReward,
}

impl RewardFn for DistanceBonusReward {
    fn compute(&mut self, ctx: &RewardContext) -> f32 {
        let mut reward = self.inner.compute(ctx);
        if !ctx.game_over && ctx.both_map_views().is_some() {
            if let Some((oldest, newest)) = ctx.trail_endpoints {
                reward += 0.1 * oldest.manhattan(&newest) as f32;
            }
        }
        reward
    }

    fn reset(&mut self) {
        self.inner.reset();
    }
}
