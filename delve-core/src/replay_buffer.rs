//! Bounded transition storage with pluggable admission policies.
//!
//! The buffer keeps transitions in arrival order and evicts the oldest
//! entry beyond its capacity. Whether an offered transition is stored at
//! all is decided by an [`AdmissionPolicy`]; balanced policies exist to
//! counteract reward sparsity by under-sampling uneventful transitions.
mod admission;
mod base;
mod batch;
mod config;
pub use admission::{AdmissionPolicy, FifoAdmission, RewardThresholdAdmission};
pub use base::TransitionBuffer;
pub use batch::{Transition, TransitionBatch};
pub use config::{AdmissionConfig, TransitionBufferConfig};
