//! State encoders.
//!
//! An encoder turns parsed positions into the layered tensor the model
//! consumes. Encoders are stacks of 22×80 layers selected by
//! configuration; the stack's shape is fixed at construction and the
//! environment validates it against the model's expectation exactly once.
use crate::classify::ScreenKind;
use crate::screen::{Position, ScreenScan};
use crate::tracker::TRAIL_LEN;
use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Height of an encoder layer (the 22 map rows).
pub const MAP_H: usize = 22;

/// Width of an encoder layer.
pub const MAP_W: usize = 80;

/// Heatmap value at which the encoder demands an episode restart.
const HEAT_CAP: u8 = 3;

/// One layer of an encoded observation.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum Layer {
    /// Passable-tile mask.
    Passable,
    /// Player-position mask.
    Player,
    /// Door mask.
    Doors,
    /// Stairs mask (last-known position).
    Stairs,
    /// Doors and stairs merged into one mask.
    DoorsAndStairs,
    /// Visitation heatmap, distance-from-entry valued.
    Heatmap,
    /// Trailing player positions with fading intensity.
    Trail,
}

/// Read-only view of one step, handed to [`StateEncoder::encode`].
pub struct EncodeContext<'a> {
    /// Classification of the current screen.
    pub kind: ScreenKind,

    /// Scan of the current screen.
    pub scan: &'a ScreenScan,

    /// Last-known player position (persists across screens).
    pub player_pos: Option<Position>,

    /// Last-known stairs position (persists across screens).
    pub stairs_pos: Option<Position>,

    /// Trailing player positions, oldest first.
    pub trail: &'a VecDeque<Option<Position>>,
}

/// A pluggable observation encoder.
pub trait StateEncoder {
    /// The fixed `(layers, rows, cols)` shape of every encoded tensor.
    fn shape(&self) -> [usize; 3];

    /// Encodes the current step. Game-over and unknown screens yield a
    /// zero tensor of the declared shape.
    fn encode(&mut self, ctx: &EncodeContext) -> Array3<u8>;

    /// Whether the encoder demands an episode restart.
    fn needs_reset(&self) -> bool;

    /// Clears per-episode state.
    fn reset(&mut self);
}

struct Heatmap {
    grid: Array2<u8>,
    first: bool,
}

impl Heatmap {
    fn new() -> Self {
        Self {
            grid: Array2::zeros((MAP_H, MAP_W)),
            first: true,
        }
    }

    fn clear(&mut self) {
        self.grid.fill(0);
        self.first = true;
    }

    /// Marks the player cell with 1 + the minimum value among visited
    /// adjacent passable cells. Returns `true` when the cap is reached.
    fn update(&mut self, scan: &ScreenScan) -> bool {
        let player = match scan.player {
            Some(p) if p.row >= 1 => (p.row - 1, p.col),
            _ => return false,
        };
        if self.first {
            self.grid[player] = 1;
            self.first = false;
            return false;
        }
        let passable: HashSet<(usize, usize)> = scan
            .passable
            .iter()
            .filter(|p| p.row >= 1)
            .map(|p| (p.row - 1, p.col))
            .collect();
        let (r, c) = player;
        let adjacent = [
            (r.saturating_sub(1), c),
            (r, c.saturating_sub(1)),
            ((r + 1).min(MAP_H - 1), c),
            (r, (c + 1).min(MAP_W - 1)),
        ];
        // distance from entry: 1 + the smallest value among already
        // visited adjacent passable cells
        let floor = adjacent
            .iter()
            .copied()
            .filter(|pos| passable.contains(pos) && self.grid[*pos] > 0)
            .map(|pos| self.grid[pos])
            .min()
            .unwrap_or(0);
        self.grid[player] = floor + 1;
        self.grid[player] >= HEAT_CAP
    }
}

/// An encoder composed from a configured list of [`Layer`]s.
pub struct LayerStack {
    layers: Vec<Layer>,
    heatmap: Heatmap,
    need_reset: bool,
}

impl LayerStack {
    /// Builds a stack; the layer list must not be empty.
    pub fn new(layers: Vec<Layer>) -> Result<Self, crate::error::RogueEnvError> {
        if layers.is_empty() {
            return Err(crate::error::RogueEnvError::EmptyLayerStack);
        }
        Ok(Self {
            layers,
            heatmap: Heatmap::new(),
            need_reset: false,
        })
    }

    /// The default stack: map, player, doors, stairs, trail.
    pub fn standard() -> Self {
        Self {
            layers: vec![
                Layer::Passable,
                Layer::Player,
                Layer::Doors,
                Layer::Stairs,
                Layer::Trail,
            ],
            heatmap: Heatmap::new(),
            need_reset: false,
        }
    }

    fn zero(&self) -> Array3<u8> {
        Array3::zeros((self.layers.len(), MAP_H, MAP_W))
    }

    fn set(state: &mut Array3<u8>, k: usize, pos: Position, value: u8) {
        if pos.row >= 1 && pos.row <= MAP_H && pos.col < MAP_W {
            state[[k, pos.row - 1, pos.col]] = value;
        }
    }

    fn encode_map_view(&mut self, ctx: &EncodeContext) -> Array3<u8> {
        let mut state = self.zero();
        for (k, layer) in self.layers.clone().into_iter().enumerate() {
            match layer {
                Layer::Passable => {
                    for &pos in &ctx.scan.passable {
                        Self::set(&mut state, k, pos, 255);
                    }
                }
                Layer::Player => {
                    if let Some(pos) = ctx.player_pos {
                        Self::set(&mut state, k, pos, 255);
                    }
                }
                Layer::Doors => {
                    for &pos in &ctx.scan.doors {
                        Self::set(&mut state, k, pos, 255);
                    }
                }
                Layer::Stairs => {
                    if let Some(pos) = ctx.stairs_pos {
                        Self::set(&mut state, k, pos, 255);
                    }
                }
                Layer::DoorsAndStairs => {
                    for &pos in &ctx.scan.doors {
                        Self::set(&mut state, k, pos, 255);
                    }
                    if let Some(pos) = ctx.stairs_pos {
                        Self::set(&mut state, k, pos, 255);
                    }
                }
                Layer::Heatmap => {
                    let overflow = self.heatmap.update(ctx.scan);
                    if overflow {
                        self.need_reset = true;
                        self.heatmap.clear();
                        return self.zero();
                    }
                    for ((i, j), &v) in self.heatmap.grid.indexed_iter() {
                        state[[k, i, j]] = v;
                    }
                }
                Layer::Trail => {
                    for (i, pos) in ctx.trail.iter().enumerate() {
                        if let Some(pos) = *pos {
                            let intensity = ((i + 1) * 255 / TRAIL_LEN) as u8;
                            Self::set(&mut state, k, pos, intensity);
                        }
                    }
                }
            }
        }
        state
    }
}

impl StateEncoder for LayerStack {
    fn shape(&self) -> [usize; 3] {
        [self.layers.len(), MAP_H, MAP_W]
    }

    fn encode(&mut self, ctx: &EncodeContext) -> Array3<u8> {
        match ctx.kind {
            ScreenKind::MapView => self.encode_map_view(ctx),
            ScreenKind::GameOver => {
                self.heatmap.clear();
                self.zero()
            }
            _ => self.zero(),
        }
    }

    fn needs_reset(&self) -> bool {
        self.need_reset
    }

    fn reset(&mut self) {
        self.heatmap.clear();
        self.need_reset = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_with(player: (usize, usize), passable: &[(usize, usize)]) -> ScreenScan {
        ScreenScan {
            player: Some(Position::new(player.0, player.1)),
            stairs: None,
            doors: vec![],
            passable: passable
                .iter()
                .map(|&(r, c)| Position::new(r, c))
                .collect(),
        }
    }

    fn ctx<'a>(
        kind: ScreenKind,
        scan: &'a ScreenScan,
        trail: &'a VecDeque<Option<Position>>,
    ) -> EncodeContext<'a> {
        EncodeContext {
            kind,
            scan,
            player_pos: scan.player,
            stairs_pos: scan.stairs,
            trail,
        }
    }

    #[test]
    fn shape_matches_output() {
        let mut encoder = LayerStack::standard();
        assert_eq!(encoder.shape(), [5, MAP_H, MAP_W]);
        let scan = scan_with((1, 1), &[(1, 1)]);
        let trail = VecDeque::new();
        let state = encoder.encode(&ctx(ScreenKind::MapView, &scan, &trail));
        assert_eq!(state.shape(), &[5, MAP_H, MAP_W]);
    }

    #[test]
    fn binary_layers_mark_positions() {
        let mut encoder = LayerStack::new(vec![Layer::Passable, Layer::Player]).unwrap();
        let scan = scan_with((2, 3), &[(2, 3), (2, 4)]);
        let trail = VecDeque::new();
        let state = encoder.encode(&ctx(ScreenKind::MapView, &scan, &trail));
        assert_eq!(state[[0, 1, 3]], 255);
        assert_eq!(state[[0, 1, 4]], 255);
        assert_eq!(state[[1, 1, 3]], 255);
        assert_eq!(state[[1, 1, 4]], 0);
    }

    #[test]
    fn game_over_and_unknown_yield_zero_tensors() {
        let mut encoder = LayerStack::standard();
        let scan = scan_with((2, 3), &[(2, 3)]);
        let trail = VecDeque::new();
        for kind in &[ScreenKind::GameOver, ScreenKind::Unknown] {
            let state = encoder.encode(&ctx(*kind, &scan, &trail));
            assert!(state.iter().all(|&v| v == 0));
        }
    }

    #[test]
    fn heatmap_seeds_then_accumulates() {
        let mut encoder = LayerStack::new(vec![Layer::Heatmap]).unwrap();
        let trail = VecDeque::new();

        // first map view seeds the player cell at 1
        let scan = scan_with((5, 5), &[(5, 5), (5, 6)]);
        let state = encoder.encode(&ctx(ScreenKind::MapView, &scan, &trail));
        assert_eq!(state[[0, 4, 5]], 1);

        // moving next door: min(visited neighbors) + 1 = 2
        let scan = scan_with((5, 6), &[(5, 5), (5, 6), (5, 7)]);
        let state = encoder.encode(&ctx(ScreenKind::MapView, &scan, &trail));
        assert_eq!(state[[0, 4, 6]], 2);
        assert!(!encoder.needs_reset());
    }

    #[test]
    fn heatmap_cap_latches_reset_and_zeroes() {
        let mut encoder = LayerStack::new(vec![Layer::Heatmap]).unwrap();
        let trail = VecDeque::new();
        let cells = [(5, 5), (5, 6), (5, 7)];
        let passable = [(5, 5), (5, 6), (5, 7)];
        for &cell in &cells {
            let scan = scan_with(cell, &passable);
            let state = encoder.encode(&ctx(ScreenKind::MapView, &scan, &trail));
            if encoder.needs_reset() {
                assert!(state.iter().all(|&v| v == 0));
            }
        }
        // cells reach values 1, 2, 3; the cap fires on the third visit
        assert!(encoder.needs_reset());

        encoder.reset();
        assert!(!encoder.needs_reset());
    }

    #[test]
    fn trail_fades_toward_the_oldest() {
        let mut encoder = LayerStack::new(vec![Layer::Trail]).unwrap();
        let scan = scan_with((1, 1), &[(1, 1)]);
        let mut trail = VecDeque::new();
        trail.push_back(Some(Position::new(2, 2)));
        trail.push_back(Some(Position::new(2, 3)));
        trail.push_back(None);
        trail.push_back(Some(Position::new(2, 4)));
        let state = encoder.encode(&ctx(ScreenKind::MapView, &scan, &trail));
        assert!(state[[0, 1, 2]] < state[[0, 1, 3]]);
        assert!(state[[0, 1, 3]] < state[[0, 1, 4]]);
        assert_eq!(state[[0, 1, 5]], 0);
    }

    #[test]
    fn empty_layer_list_is_rejected() {
        assert!(LayerStack::new(vec![]).is_err());
    }
}
