#![warn(missing_docs)]
//! Core abstractions for reinforcement learning on terminal games.
//!
//! This crate defines the seams between an environment, the policy that
//! drives it and the replay machinery that stores its transitions:
//!
//! * [`Env`], [`Obs`], [`Act`], [`Step`] — the environment interface,
//! * [`Policy`] — the model collaborator producing actions,
//! * [`ExperienceBufferBase`], [`ReplayBufferBase`] and the
//!   [`replay_buffer`] module — bounded transition storage with pluggable
//!   admission policies,
//! * [`record`] — per-step diagnostics attached to every environment step,
//! * [`params`] — flat `name,value` persistence for training scalars.
pub mod error;
pub mod params;
pub mod record;
pub mod replay_buffer;

mod base;
pub use base::{
    Act, Configurable, Env, ExperienceBufferBase, Info, Obs, Policy, ReplayBufferBase, Step,
};
