#![warn(missing_docs)]
//! A terminal roguelike as a reinforcement-learning environment for
//! [`delve-core`](delve_core).
//!
//! The environment spawns the game on a pseudo-terminal, feeds its output
//! through an in-memory terminal emulator, parses the screen into
//! structured state and exposes the usual `build`/`step`/`reset` cycle.
//! Rewards and observation encoders are pluggable strategies selected by
//! configuration.
//!
//! Here is an example of driving the environment with a random policy.
//!
//! ```no_run
//! use anyhow::Result;
//! use delve_core::{Env as _, Policy};
//! use delve_rogue_env::{RogueAct, RogueEnv, RogueEnvConfig, ACTIONS};
//!
//! struct RandomPolicy;
//!
//! impl Policy<RogueEnv> for RandomPolicy {
//!     fn sample(&mut self, _: &delve_rogue_env::RogueObs) -> RogueAct {
//!         fastrand::u8(..ACTIONS.len() as u8).into()
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
//!     fastrand::seed(42);
//!
//!     let config = RogueEnvConfig::default().rogue_cmd("/usr/games/rogue");
//!     let mut env = RogueEnv::build(&config, 0)?;
//!     let mut policy = RandomPolicy;
//!
//!     let mut obs = env.reset(None)?;
//!     for _ in 0..1000 {
//!         let act = policy.sample(&obs);
//!         let (step, _record) = env.step_with_reset(&act)?;
//!         obs = step.obs;
//!     }
//!     env.quit()?;
//!     Ok(())
//! }
//! ```
mod act;
mod admission;
mod classify;
mod encoder;
pub mod error;
mod env;
mod obs;
mod reward;
mod screen;
mod status;
mod terminal;
mod tracker;

pub use act::{RogueAct, RogueCommand, ACTIONS, QUIT_SEQUENCE, REFRESH_BYTE};
pub use admission::NearDoorAdmission;
pub use classify::{classify, DialogKind, ScreenKind};
pub use encoder::{EncodeContext, Layer, LayerStack, StateEncoder, MAP_H, MAP_W};
pub use env::{RogueEnv, RogueEnvConfig};
pub use obs::RogueObs;
pub use reward::{build_reward, RewardContext, RewardFn, RewardKind};
pub use screen::{Position, Screen, ScreenScan, IMPASSABLE, SCREEN_COLS, SCREEN_ROWS};
pub use status::{StatusFields, StatusParser, FIELD_NAMES};
pub use terminal::{PtyProcess, VirtualTerminal};
pub use tracker::{PositionTracker, TRAIL_LEN};
