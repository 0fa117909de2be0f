use anyhow::Result;
use delve_core::{
    replay_buffer::{Transition, TransitionBuffer, TransitionBufferConfig},
    Env as _, ExperienceBufferBase, Policy, ReplayBufferBase,
};
use delve_rogue_env::{RogueAct, RogueEnv, RogueEnvConfig, RogueObs, ACTIONS};

struct RandomPolicy;

impl Policy<RogueEnv> for RandomPolicy {
    fn sample(&mut self, _: &RogueObs) -> RogueAct {
        fastrand::u8(..ACTIONS.len() as u8).into()
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    fastrand::seed(42);

    let env_config = RogueEnvConfig::default().rogue_cmd(
        std::env::var("ROGUE_CMD").unwrap_or_else(|_| "rogue".to_string()),
    );
    let mut env = RogueEnv::build(&env_config, 42)?;
    let mut policy = RandomPolicy;

    let buffer_config = TransitionBufferConfig::default().capacity(10_000);
    let mut buffer: TransitionBuffer<RogueObs, RogueAct> =
        TransitionBuffer::build(&buffer_config);

    let mut obs = env.reset(None)?;
    for _ in 0..1000 {
        let act = policy.sample(&obs);
        let (step, record) = env.step_with_reset(&act)?;
        log::info!("reward {:?}", record.get_scalar("reward")?);
        buffer.push(Transition::new(
            obs,
            step.act.clone(),
            step.reward[0],
            step.obs.clone(),
            step.is_terminated[0],
        ))?;
        obs = if step.is_done() {
            step.init_obs
        } else {
            step.obs
        };
    }
    log::info!("collected {} transitions", buffer.len());

    env.quit()?;
    Ok(())
}
