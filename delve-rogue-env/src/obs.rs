//! Observations for [`RogueEnv`](crate::RogueEnv).
use crate::encoder::{MAP_H, MAP_W};
use delve_core::Obs;
use ndarray::Array3;
use serde::{Deserialize, Serialize};

/// Observation of [`RogueEnv`](crate::RogueEnv): the encoder's layer
/// stack over the 22×80 map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RogueObs {
    /// `(layers, 22, 80)` tensor.
    pub layers: Array3<u8>,
}

impl RogueObs {
    /// The tensor shape.
    pub fn shape(&self) -> &[usize] {
        self.layers.shape()
    }

    /// All cells of `layer` holding a full-intensity mark, as 0-indexed
    /// `(row, col)` pairs.
    pub fn marked_cells(&self, layer: usize) -> Vec<(usize, usize)> {
        if layer >= self.layers.shape()[0] {
            return vec![];
        }
        let mut cells = Vec::new();
        for i in 0..MAP_H.min(self.layers.shape()[1]) {
            for j in 0..MAP_W.min(self.layers.shape()[2]) {
                if self.layers[[layer, i, j]] == 255 {
                    cells.push((i, j));
                }
            }
        }
        cells
    }

    /// The first full-intensity cell of `layer`, if any.
    pub fn first_marked_cell(&self, layer: usize) -> Option<(usize, usize)> {
        self.marked_cells(layer).into_iter().next()
    }
}

impl From<Array3<u8>> for RogueObs {
    fn from(layers: Array3<u8>) -> Self {
        Self { layers }
    }
}

impl Obs for RogueObs {
    fn dummy(_n: usize) -> Self {
        Self {
            layers: Array3::zeros((0, 0, 0)),
        }
    }

    fn len(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marked_cells_reads_a_layer() {
        let mut layers = Array3::zeros((2, MAP_H, MAP_W));
        layers[[1, 3, 7]] = 255;
        layers[[1, 4, 2]] = 255;
        layers[[0, 0, 0]] = 128;
        let obs = RogueObs::from(layers);
        assert_eq!(obs.marked_cells(1), vec![(3, 7), (4, 2)]);
        assert_eq!(obs.first_marked_cell(0), None);
        assert_eq!(obs.marked_cells(5), vec![]);
    }
}
