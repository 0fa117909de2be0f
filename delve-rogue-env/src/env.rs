//! The rogue environment.
mod config;
pub use config::RogueEnvConfig;

use crate::act::{RogueAct, RogueCommand, ACTIONS, QUIT_SEQUENCE, REFRESH_BYTE};
use crate::classify::{classify, ScreenKind};
use crate::encoder::{EncodeContext, LayerStack, StateEncoder};
use crate::error::RogueEnvError;
use crate::obs::RogueObs;
use crate::reward::{build_reward, RewardContext, RewardFn};
use crate::screen::{Position, Screen, ScreenScan, IMPASSABLE, SCREEN_COLS, SCREEN_ROWS};
use crate::status::{StatusParser, FIELD_NAMES};
use crate::terminal::{PtyProcess, VirtualTerminal};
use crate::tracker::PositionTracker;
use anyhow::Result;
use delve_core::record::{Record, RecordValue};
use delve_core::{Env, Obs, Step};
use log::{trace, warn};
use std::thread;
use std::time::Duration;

/// A terminal roguelike wrapped as an [`Env`].
///
/// Owns exactly one live child process between construction and
/// teardown. All interaction is synchronous: a step writes a keystroke,
/// waits the settle interval, drains whatever output arrived and
/// interprets the resulting screen. Driving one instance from several
/// threads concurrently is unsupported.
pub struct RogueEnv {
    config: RogueEnvConfig,
    process: PtyProcess,
    term: VirtualTerminal,
    screen: Screen,
    scan: ScreenScan,
    parser: StatusParser,
    tracker: PositionTracker,
    reward_fn: Box<dyn RewardFn + Send>,
    encoder: Box<dyn StateEncoder + Send>,
}

impl std::fmt::Debug for RogueEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RogueEnv").finish_non_exhaustive()
    }
}

impl RogueEnv {
    /// The fixed, ordered action list.
    pub fn get_actions() -> &'static [RogueCommand] {
        &ACTIONS
    }

    /// Movement commands legal from the current player position, plus
    /// descend when the player stands on the stairs.
    ///
    /// An unknown player position yields no legal moves.
    pub fn get_legal_actions(&self) -> Vec<RogueCommand> {
        legal_actions(
            &self.screen,
            self.tracker.player_pos(),
            self.tracker.stairs_pos(),
        )
    }

    /// The current screen snapshot.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// The position tracker.
    pub fn tracker(&self) -> &PositionTracker {
        &self.tracker
    }

    /// Whether the child process is still running.
    pub fn is_running(&mut self) -> bool {
        self.process.is_alive()
    }

    /// Quits the game cleanly and tears the child down.
    pub fn quit(&mut self) -> Result<(), RogueEnvError> {
        for &b in QUIT_SEQUENCE.iter() {
            self.process.send(&[b])?;
            self.settle_sleep();
        }
        self.sync_screen();
        self.process.terminate();
        Ok(())
    }

    fn spawn_child(
        config: &RogueEnvConfig,
    ) -> Result<(PtyProcess, VirtualTerminal, Screen), RogueEnvError> {
        let mut process = PtyProcess::spawn(&config.rogue_cmd)?;
        thread::sleep(Duration::from_millis(config.spawn_settle_ms));
        if !process.is_alive() {
            return Err(RogueEnvError::Spawn(format!(
                "{} exited during startup",
                config.rogue_cmd
            )));
        }
        let mut term = VirtualTerminal::new();
        process.drain(&mut term);
        let screen = term.snapshot();
        Ok((process, term, screen))
    }

    fn settle_sleep(&self) {
        thread::sleep(Duration::from_millis(self.config.settle_ms));
    }

    fn sync_screen(&mut self) {
        self.process.drain(&mut self.term);
        self.screen = self.term.snapshot();
    }

    /// Dismisses chained dialogs until the screen leaves the dialog
    /// state. A chain longer than the configured bound is an error.
    fn dismiss_dialogs(&mut self) -> Result<(), RogueEnvError> {
        let mut chain = 0;
        loop {
            match classify(&self.screen, &self.parser) {
                ScreenKind::Dialog(kind) => {
                    if chain >= self.config.max_dismiss_chain {
                        return Err(RogueEnvError::DismissChainExceeded {
                            limit: self.config.max_dismiss_chain,
                        });
                    }
                    chain += 1;
                    trace!("dismissing dialog {:?}, chain length {}", kind, chain);
                    self.process.send(&[kind.dismiss_byte()])?;
                    self.settle_sleep();
                    self.sync_screen();
                }
                _ => return Ok(()),
            }
        }
    }

    fn encode_current(&mut self) -> RogueObs {
        let kind = classify(&self.screen, &self.parser);
        let ctx = EncodeContext {
            kind,
            scan: &self.scan,
            player_pos: self.tracker.player_pos(),
            stairs_pos: self.tracker.stairs_pos(),
            trail: self.tracker.trail(),
        };
        RogueObs::from(self.encoder.encode(&ctx))
    }

    fn restart_episode_state(&mut self) {
        self.scan = self.screen.scan();
        self.tracker = PositionTracker::new(self.config.stuck_limit);
        self.tracker.begin_episode(&self.scan);
        self.reward_fn.reset();
        self.encoder.reset();
    }
}

impl Env for RogueEnv {
    type Config = RogueEnvConfig;
    type Obs = RogueObs;
    type Act = RogueAct;
    type Info = ();

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        let reward_fn = build_reward(&config.reward);
        let encoder = LayerStack::new(config.layers.clone())?;
        if let Some(expected) = config.expected_shape {
            let actual = encoder.shape();
            if expected != actual {
                return Err(RogueEnvError::EncoderShapeMismatch { expected, actual }.into());
            }
        }

        let (process, term, screen) = Self::spawn_child(config)?;
        let scan = screen.scan();
        let mut tracker = PositionTracker::new(config.stuck_limit);
        tracker.begin_episode(&scan);

        Ok(Self {
            config: config.clone(),
            process,
            term,
            screen,
            scan,
            parser: StatusParser::new(),
            tracker,
            reward_fn,
            encoder: Box::new(encoder),
        })
    }

    fn step(&mut self, act: &Self::Act) -> Result<(Step<Self>, Record)> {
        let old_screen = self.screen.clone();
        let old_player = self.scan.player;

        let command = act
            .command()
            .ok_or(RogueEnvError::InvalidAction(act.act))?;
        self.process.send(&[command.keystroke(), REFRESH_BYTE])?;
        self.settle_sleep();
        self.sync_screen();
        self.dismiss_dialogs()?;

        self.scan = self.screen.scan();
        let old_status = self.parser.parse(&old_screen);
        let new_status = self.parser.parse(&self.screen);
        self.tracker
            .update(old_status.as_ref(), new_status.as_ref(), &self.scan);
        let stuck = self.tracker.observe_stuck();

        let kind = classify(&self.screen, &self.parser);
        let game_over = kind == ScreenKind::GameOver;

        let reward_ctx = RewardContext {
            game_over,
            old_status: old_status.as_ref(),
            new_status: new_status.as_ref(),
            old_player,
            new_player: self.scan.player,
            old_explored: old_screen.explored_tiles(),
            new_explored: self.screen.explored_tiles(),
            trail_endpoints: self.tracker.trail_endpoints(),
        };
        let reward = self.reward_fn.compute(&reward_ctx);

        let obs = self.encode_current();

        let child_dead = !self.process.is_alive();
        if child_dead {
            trace!("child process died mid-run; reporting terminal step");
        }
        let terminated = game_over || child_dead || self.reward_fn.objective_achieved();
        let truncated = stuck || self.encoder.needs_reset();

        let mut record = Record::from_scalar("reward", reward);
        record.insert("screen_kind", RecordValue::String(kind.name().to_string()));
        if let Some(status) = new_status {
            for (name, value) in FIELD_NAMES.iter().zip(status.values().iter()) {
                record.insert(*name, RecordValue::Scalar(*value as f32));
            }
        }

        let step = Step::new(
            obs,
            act.clone(),
            vec![reward],
            vec![terminated as i8],
            vec![truncated as i8],
            (),
            RogueObs::dummy(1),
        );
        Ok((step, record))
    }

    fn reset(&mut self, is_done: Option<&Vec<i8>>) -> Result<Self::Obs> {
        let restart = match is_done {
            None => true,
            Some(v) => v[0] == 1,
        };
        if restart {
            // blocking reap of the old child, then a bounded respawn loop
            self.process.terminate();
            let mut attempts = 0;
            let (process, term, screen) = loop {
                attempts += 1;
                match Self::spawn_child(&self.config) {
                    Ok(spawned) => break spawned,
                    Err(e) => {
                        warn!("respawn failed (attempt {}): {}", attempts, e);
                        if attempts >= self.config.max_reset_retries {
                            return Err(RogueEnvError::ResetRetriesExhausted { attempts }.into());
                        }
                    }
                }
            };
            self.process = process;
            self.term = term;
            self.screen = screen;
            self.restart_episode_state();
        }
        Ok(self.encode_current())
    }

    fn step_with_reset(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        let (mut step, record) = self.step(a)?;
        if step.is_done() {
            step.init_obs = self.reset(None)?;
        }
        Ok((step, record))
    }
}

/// Movement legality from the four neighbors of the player cell.
fn legal_actions(
    screen: &Screen,
    player_pos: Option<Position>,
    stairs_pos: Option<Position>,
) -> Vec<RogueCommand> {
    let p = match player_pos {
        Some(p) => p,
        None => return vec![],
    };
    let mut actions = Vec::new();
    let passable = |row: usize, col: usize| !IMPASSABLE.contains(&screen.cell(row, col));
    if p.row >= 1 && passable(p.row - 1, p.col) {
        actions.push(RogueCommand::Up);
    }
    if p.row + 1 < SCREEN_ROWS && passable(p.row + 1, p.col) {
        actions.push(RogueCommand::Down);
    }
    if p.col >= 1 && passable(p.row, p.col - 1) {
        actions.push(RogueCommand::Left);
    }
    if p.col + 1 < SCREEN_COLS && passable(p.row, p.col + 1) {
        actions.push(RogueCommand::Right);
    }
    if stairs_pos.is_some() && player_pos == stairs_pos {
        actions.push(RogueCommand::Descend);
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Layer;
    use crate::screen::tests::{map_screen, STATUS};

    #[test]
    fn missing_executable_fails_construction() {
        let config = RogueEnvConfig::default()
            .rogue_cmd("/no/such/rogue-binary")
            .settle_ms(1);
        assert!(RogueEnv::build(&config, 0).is_err());
    }

    #[test]
    fn shape_mismatch_fails_before_spawning() {
        let config = RogueEnvConfig::default()
            .rogue_cmd("/no/such/rogue-binary")
            .layers(vec![Layer::Passable, Layer::Player])
            .expected_shape([5, 22, 80]);
        let err = RogueEnv::build(&config, 0).unwrap_err();
        assert!(err.to_string().contains("shape"));
    }

    #[test]
    fn legal_actions_respect_walls() {
        let screen = map_screen("", STATUS);
        let scan = screen.scan();
        let actions = legal_actions(&screen, scan.player, None);
        // the player in the room row can move left and right; the rows
        // above and below are floor as well
        assert!(actions.contains(&RogueCommand::Left));
        assert!(actions.contains(&RogueCommand::Right));
        assert!(actions.contains(&RogueCommand::Up));
        assert!(actions.contains(&RogueCommand::Down));
        assert!(!actions.contains(&RogueCommand::Descend));
    }

    #[test]
    fn descend_is_legal_on_the_stairs() {
        let screen = map_screen("", STATUS);
        let stairs = screen.scan().stairs;
        let actions = legal_actions(&screen, stairs, stairs);
        assert!(actions.contains(&RogueCommand::Descend));
    }

    #[test]
    fn unknown_player_has_no_legal_actions() {
        let screen = map_screen("", STATUS);
        assert!(legal_actions(&screen, None, None).is_empty());
    }
}
