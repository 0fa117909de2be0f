//! Player and stairs bookkeeping across screen updates.
use crate::screen::{Position, ScreenScan};
use crate::status::StatusFields;
use std::collections::VecDeque;

/// Bound of the trailing position history.
pub const TRAIL_LEN: usize = 11;

/// Last-known player and stairs positions, the trailing position history
/// and the stuck counter.
///
/// Positions persist across screens on which their markers are not
/// visible; everything level-specific resets when the dungeon level
/// increases between two consecutive map views.
pub struct PositionTracker {
    player_pos: Option<Position>,
    stairs_pos: Option<Position>,
    trail: VecDeque<Option<Position>>,
    last_pos: Option<Position>,
    same_pos_count: u32,
    stuck_limit: u32,
}

impl PositionTracker {
    /// Creates a tracker reporting stuck after `stuck_limit` consecutive
    /// steps without player movement.
    pub fn new(stuck_limit: u32) -> Self {
        Self {
            player_pos: None,
            stairs_pos: None,
            trail: VecDeque::with_capacity(TRAIL_LEN),
            last_pos: None,
            same_pos_count: 0,
            stuck_limit,
        }
    }

    /// Seeds the tracker from the first screen of an episode.
    pub fn begin_episode(&mut self, scan: &ScreenScan) {
        self.player_pos = scan.player;
        self.stairs_pos = None;
        self.trail.clear();
        self.last_pos = scan.player;
        self.same_pos_count = 0;
    }

    /// Updates positions from the screens of one step.
    ///
    /// `old` and `new` are the parsed status fields of the previous and
    /// current screens; level-sensitive state only changes when both are
    /// map views. The scan is of the current screen.
    pub fn update(
        &mut self,
        old: Option<&StatusFields>,
        new: Option<&StatusFields>,
        scan: &ScreenScan,
    ) {
        if let (Some(old), Some(new)) = (old, new) {
            if new.dungeon_level > old.dungeon_level {
                // changed floor, the old stairs and trail are meaningless
                self.stairs_pos = None;
                self.trail.clear();
            }
            if scan.stairs.is_some() {
                self.stairs_pos = scan.stairs;
            }
        }
        self.player_pos = scan.player;
        if self.trail.len() == TRAIL_LEN {
            self.trail.pop_front();
        }
        self.trail.push_back(scan.player);
    }

    /// Counts steps without movement; returns `true` once the stuck limit
    /// is exceeded and resets the counter.
    pub fn observe_stuck(&mut self) -> bool {
        if self.player_pos == self.last_pos {
            self.same_pos_count += 1;
        } else {
            self.last_pos = self.player_pos;
            self.same_pos_count = 0;
        }
        if self.same_pos_count > self.stuck_limit {
            self.same_pos_count = 0;
            true
        } else {
            false
        }
    }

    /// Last-known player position.
    pub fn player_pos(&self) -> Option<Position> {
        self.player_pos
    }

    /// Last-known stairs position on the current floor.
    pub fn stairs_pos(&self) -> Option<Position> {
        self.stairs_pos
    }

    /// The trailing history, oldest first.
    pub fn trail(&self) -> &VecDeque<Option<Position>> {
        &self.trail
    }

    /// Oldest and newest tracked positions, when both are known.
    pub fn trail_endpoints(&self) -> Option<(Position, Position)> {
        match (self.trail.front(), self.trail.back()) {
            (Some(&Some(a)), Some(&Some(b))) => Some((a, b)),
            _ => None,
        }
    }
}
