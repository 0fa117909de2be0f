//! Admission policies that inspect rogue observations.
use crate::act::RogueAct;
use crate::obs::RogueObs;
use delve_core::replay_buffer::{AdmissionPolicy, Transition};

/// Distance reported when the player or all doors are invisible.
const FAR_AWAY: f64 = 1000.0;

/// Admits rewarding transitions unconditionally; the rest with
/// probability proportional to the inverse-square distance from the
/// nearest door.
///
/// Exists to balance buffers for door-seeking objectives: transitions far
/// from any door are mostly noise and are heavily under-sampled.
pub struct NearDoorAdmission {
    /// Index of the player-mask layer in the observation.
    pub player_layer: usize,

    /// Index of the door-mask layer in the observation.
    pub door_layer: usize,
}

impl Default for NearDoorAdmission {
    fn default() -> Self {
        // layer order of the standard encoder stack
        Self {
            player_layer: 1,
            door_layer: 2,
        }
    }
}

impl NearDoorAdmission {
    fn distance_from_door(&self, obs: &RogueObs) -> f64 {
        // the player marker may cover the door; both lookups can fail
        let player = match obs.first_marked_cell(self.player_layer) {
            Some(p) => p,
            None => return FAR_AWAY,
        };
        let nearest = obs
            .marked_cells(self.door_layer)
            .iter()
            .map(|&(r, c)| {
                let dr = (r as i64 - player.0 as i64).abs();
                let dc = (c as i64 - player.1 as i64).abs();
                (dr + dc) as f64
            })
            .fold(f64::INFINITY, f64::min);
        if nearest.is_finite() {
            nearest
        } else {
            FAR_AWAY
        }
    }
}

impl AdmissionPolicy<RogueObs, RogueAct> for NearDoorAdmission {
    fn admit(&mut self, tr: &Transition<RogueObs, RogueAct>) -> bool {
        if tr.reward > 0.0 {
            return true;
        }
        let d = self.distance_from_door(&tr.next_obs).max(1.0);
        fastrand::f64() < d.powi(-2)
    }
}
