//! Configuration of [`TransitionBuffer`](super::TransitionBuffer).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Selects the admission policy constructed by
/// [`TransitionBuffer::build`](crate::ReplayBufferBase::build).
///
/// Domain-specific policies (e.g., ones inspecting observation layers) are
/// installed afterwards with
/// [`TransitionBuffer::set_policy`](super::TransitionBuffer::set_policy).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub enum AdmissionConfig {
    /// Admit everything.
    Fifo,

    /// Admit `reward >= threshold` unconditionally, the rest with the
    /// given probability.
    RewardThreshold {
        /// Reward threshold for unconditional admission.
        threshold: f32,
        /// Probability of admitting a below-threshold transition.
        accept_prob: f64,
    },
}

/// Configuration of [`TransitionBuffer`](super::TransitionBuffer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct TransitionBufferConfig {
    /// Maximum number of transitions kept. When the buffer is full, the
    /// oldest transition is evicted first.
    pub capacity: usize,

    /// Random seed for batch sampling.
    pub seed: u64,

    /// Admission policy.
    pub admission: AdmissionConfig,
}

impl Default for TransitionBufferConfig {
    fn default() -> Self {
        Self {
            capacity: 100_000,
            seed: 42,
            admission: AdmissionConfig::Fifo,
        }
    }
}

impl TransitionBufferConfig {
    /// Sets the capacity of the buffer.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the random seed for sampling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the admission policy.
    pub fn admission(mut self, admission: AdmissionConfig) -> Self {
        self.admission = admission;
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
        let dir = TempDir::new("buffer_config")?;
        let path = dir.path().join("buffer.yaml");
        let config = TransitionBufferConfig::default()
            .capacity(500)
            .admission(AdmissionConfig::RewardThreshold {
                threshold: 0.0,
                accept_prob: 0.2,
            });
        config.save(&path)?;
        let loaded = TransitionBufferConfig::load(&path)?;
        assert_eq!(config, loaded);
        Ok(())
    }
}
