//! The transition buffer.
use super::{
    AdmissionConfig, AdmissionPolicy, FifoAdmission, RewardThresholdAdmission, Transition,
    TransitionBatch, TransitionBufferConfig,
};
use crate::{error::DelveError, ExperienceBufferBase, ReplayBufferBase};
use anyhow::Result;
use rand::{rngs::StdRng, SeedableRng};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    collections::VecDeque,
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

/// A bounded, ordered buffer of whole transitions.
///
/// Retention is FIFO: when a transition is admitted into a full buffer,
/// the oldest one is dropped. Sampling is uniform without replacement,
/// driven by a seeded RNG for reproducibility.
pub struct TransitionBuffer<O, A> {
    capacity: usize,
    items: VecDeque<Transition<O, A>>,
    rng: StdRng,
    policy: Box<dyn AdmissionPolicy<O, A> + Send>,
}

impl<O, A> TransitionBuffer<O, A> {
    /// Replaces the admission policy.
    ///
    /// Use this for policies that cannot be described by
    /// [`AdmissionConfig`], such as ones inspecting observation layers.
    pub fn set_policy(&mut self, policy: Box<dyn AdmissionPolicy<O, A> + Send>) {
        self.policy = policy;
    }

    /// Returns the capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the transition at `ix`, oldest first.
    pub fn get(&self, ix: usize) -> Option<&Transition<O, A>> {
        self.items.get(ix)
    }

    fn evict_to_capacity(&mut self) {
        while self.items.len() > self.capacity {
            self.items.pop_front();
        }
    }
}

impl<O, A> TransitionBuffer<O, A>
where
    O: Serialize + DeserializeOwned,
    A: Serialize + DeserializeOwned,
{
    /// Serializes the whole buffer into a single blob at `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DelveError> {
        log::info!("saving history ({} transitions)", self.items.len());
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, &self.items)?;
        Ok(())
    }

    /// Replaces the buffer content with the blob at `path`.
    ///
    /// The restored transitions replace the current ones wholesale; no
    /// merge is attempted. If the blob holds more transitions than the
    /// configured capacity, the oldest are dropped.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), DelveError> {
        let reader = BufReader::new(File::open(path)?);
        self.items = bincode::deserialize_from(reader)?;
        self.evict_to_capacity();
        log::info!("history restored ({} transitions)", self.items.len());
        Ok(())
    }
}

impl<O, A> ExperienceBufferBase for TransitionBuffer<O, A> {
    type Item = Transition<O, A>;

    fn push(&mut self, tr: Self::Item) -> Result<bool> {
        if !self.policy.admit(&tr) {
            return Ok(false);
        }
        self.items.push_back(tr);
        self.evict_to_capacity();
        Ok(true)
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

impl<O, A> ReplayBufferBase for TransitionBuffer<O, A>
where
    O: Clone,
    A: Clone,
{
    type Config = TransitionBufferConfig;
    type Batch = TransitionBatch<O, A>;

    fn build(config: &Self::Config) -> Self {
        let policy: Box<dyn AdmissionPolicy<O, A> + Send> = match config.admission {
            AdmissionConfig::Fifo => Box::new(FifoAdmission),
            AdmissionConfig::RewardThreshold {
                threshold,
                accept_prob,
            } => Box::new(RewardThresholdAdmission {
                threshold,
                accept_prob,
            }),
        };

        Self {
            capacity: config.capacity,
            items: VecDeque::with_capacity(config.capacity),
            rng: StdRng::seed_from_u64(config.seed),
            policy,
        }
    }

    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        if self.items.is_empty() {
            return Err(DelveError::EmptyBuffer.into());
        }
        if size > self.items.len() {
            return Err(DelveError::BatchSizeExceedsLen {
                requested: size,
                len: self.items.len(),
            }
            .into());
        }

        let ixs = rand::seq::index::sample(&mut self.rng, self.items.len(), size);
        let mut batch = TransitionBatch::with_capacity(size);
        for ix in ixs.iter() {
            batch.push(&self.items[ix]);
        }
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempdir::TempDir;

    fn fifo_buffer(capacity: usize) -> TransitionBuffer<u32, u8> {
        TransitionBuffer::build(&TransitionBufferConfig::default().capacity(capacity))
    }

    fn tr(tag: u32, reward: f32) -> Transition<u32, u8> {
        Transition::new(tag, 0, reward, tag + 1, 0)
    }

    #[test]
    fn fifo_keeps_the_most_recent() {
        let histsize = 8;
        let mut buffer = fifo_buffer(histsize);
        for i in 0..(histsize + 5) as u32 {
            assert!(buffer.push(tr(i, 0.0)).unwrap());
        }
        assert_eq!(buffer.len(), histsize);
        for (k, ix) in (5..13u32).enumerate() {
            assert_eq!(buffer.get(k).unwrap().obs, ix);
        }
    }

    #[test]
    fn sample_of_full_length_is_distinct() {
        let minhist = 16;
        let mut buffer = fifo_buffer(64);
        for i in 0..minhist as u32 {
            buffer.push(tr(i, 0.0)).unwrap();
        }
        let batch = buffer.batch(minhist).unwrap();
        assert_eq!(batch.len(), minhist);
        let distinct: HashSet<u32> = batch.obs.iter().cloned().collect();
        assert_eq!(distinct.len(), minhist);
    }

    #[test]
    fn oversized_batch_is_an_error() {
        let mut buffer = fifo_buffer(64);
        buffer.push(tr(0, 0.0)).unwrap();
        assert!(buffer.batch(2).is_err());
        assert!(buffer.batch(1).is_ok());
    }

    #[test]
    fn empty_buffer_cannot_be_sampled() {
        let mut buffer = fifo_buffer(4);
        assert!(buffer.batch(1).is_err());
    }

    #[test]
    fn balanced_admission_drops_unrewarding() {
        let config = TransitionBufferConfig::default()
            .capacity(64)
            .admission(AdmissionConfig::RewardThreshold {
                threshold: 0.0,
                accept_prob: 0.0,
            });
        let mut buffer: TransitionBuffer<u32, u8> = TransitionBuffer::build(&config);
        assert!(!buffer.push(tr(0, -0.1)).unwrap());
        assert!(buffer.push(tr(1, 1.0)).unwrap());
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn save_then_load_replaces_wholesale() {
        let dir = TempDir::new("transition_buffer").unwrap();
        let path = dir.path().join("history.bin");

        let mut buffer = fifo_buffer(32);
        for i in 0..10u32 {
            buffer.push(tr(i, 0.5)).unwrap();
        }
        buffer.save(&path).unwrap();

        let mut restored = fifo_buffer(32);
        restored.push(tr(99, 0.0)).unwrap();
        restored.load(&path).unwrap();
        assert_eq!(restored.len(), 10);
        assert_eq!(restored.get(0).unwrap().obs, 0);
        assert_eq!(restored.get(9).unwrap().obs, 9);
    }
}
