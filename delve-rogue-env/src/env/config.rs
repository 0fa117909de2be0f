//! Configuration of [`RogueEnv`](super::RogueEnv).
use crate::encoder::Layer;
use crate::reward::RewardKind;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`RogueEnv`](super::RogueEnv).
///
/// Every operational knob of the environment lives here; nothing is
/// tuned through mutable globals.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RogueEnvConfig {
    /// Program and whitespace-separated arguments of the game.
    pub rogue_cmd: String,

    /// Settle interval after each write, in milliseconds.
    ///
    /// The child signals no output completion, so a fixed delay before
    /// re-reading trades throughput for frame completeness.
    pub settle_ms: u64,

    /// Settle interval after spawning, in milliseconds.
    pub spawn_settle_ms: u64,

    /// Maximum dialog dismissals per step before giving up.
    pub max_dismiss_chain: usize,

    /// Maximum spawn attempts per `reset` before giving up.
    pub max_reset_retries: usize,

    /// Steps without player movement before the episode is truncated.
    pub stuck_limit: u32,

    /// Reward policy.
    pub reward: RewardKind,

    /// Encoder layer stack.
    pub layers: Vec<Layer>,

    /// Shape the downstream model expects; validated at construction.
    pub expected_shape: Option<[usize; 3]>,
}

impl Default for RogueEnvConfig {
    fn default() -> Self {
        Self {
            rogue_cmd: "rogue".to_string(),
            settle_ms: 10,
            spawn_settle_ms: 500,
            max_dismiss_chain: 20,
            max_reset_retries: 5,
            stuck_limit: 1000,
            reward: RewardKind::DistanceBonus,
            layers: vec![
                Layer::Passable,
                Layer::Player,
                Layer::Doors,
                Layer::Stairs,
                Layer::Trail,
            ],
            expected_shape: None,
        }
    }
}

impl RogueEnvConfig {
    /// Sets the game command.
    pub fn rogue_cmd(mut self, cmd: impl Into<String>) -> Self {
        self.rogue_cmd = cmd.into();
        self
    }

    /// Sets the settle interval in milliseconds.
    pub fn settle_ms(mut self, ms: u64) -> Self {
        self.settle_ms = ms;
        self
    }

    /// Sets the reward policy.
    pub fn reward(mut self, reward: RewardKind) -> Self {
        self.reward = reward;
        self
    }

    /// Sets the encoder layer stack.
    pub fn layers(mut self, layers: Vec<Layer>) -> Self {
        self.layers = layers;
        self
    }

    /// Sets the shape expected by the model.
    pub fn expected_shape(mut self, shape: [usize; 3]) -> Self {
        self.expected_shape = Some(shape);
        self
    }

    /// Sets the stuck-detection limit.
    pub fn stuck_limit(mut self, limit: u32) -> Self {
        self.stuck_limit = limit;
        self
    }

    /// Loads the configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let config = serde_yaml::from_reader(rdr)?;
        Ok(config)
    }

    /// Saves the configuration to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn roundtrip_yaml() -> Result<()> {
        let dir = TempDir::new("rogue_env_config")?;
        let path = dir.path().join("env.yaml");
        let config = RogueEnvConfig::default()
            .rogue_cmd("/usr/games/rogue")
            .reward(RewardKind::Exploration {
                latch_objective: true,
            })
            .layers(vec![Layer::Passable, Layer::Player, Layer::Heatmap])
            .expected_shape([3, 22, 80]);
        config.save(&path)?;
        let loaded = RogueEnvConfig::load(&path)?;
        assert_eq!(config, loaded);
        Ok(())
    }
}
