use anyhow::Result;
use delve_core::replay_buffer::{Transition, TransitionBuffer, TransitionBufferConfig};
use delve_core::{ExperienceBufferBase, ReplayBufferBase};
use delve_rogue_env::{NearDoorAdmission, RogueAct, RogueObs, MAP_H, MAP_W};
use ndarray::Array3;
use tempdir::TempDir;

fn obs(player: (usize, usize)) -> RogueObs {
    let mut layers = Array3::zeros((3, MAP_H, MAP_W));
    layers[[1, player.0, player.1]] = 255;
    RogueObs::from(layers)
}

#[test]
fn rogue_transitions_roundtrip_through_the_blob() -> Result<()> {
    let dir = TempDir::new("rogue_history")?;
    let path = dir.path().join("history.bin");

    let config = TransitionBufferConfig::default().capacity(100);
    let mut buffer: TransitionBuffer<RogueObs, RogueAct> = TransitionBuffer::build(&config);
    for i in 0..10u8 {
        buffer.push(Transition::new(
            obs((i as usize, 0)),
            RogueAct::new(i % 5),
            f32::from(i),
            obs((i as usize, 1)),
            (i == 9) as i8,
        ))?;
    }
    buffer.save(&path)?;

    let mut restored: TransitionBuffer<RogueObs, RogueAct> = TransitionBuffer::build(&config);
    restored.load(&path)?;
    assert_eq!(restored.len(), 10);
    let tr = restored.get(3).unwrap();
    assert_eq!(tr.act.act, 3);
    assert_eq!(tr.obs.first_marked_cell(1), Some((3, 0)));
    assert_eq!(tr.next_obs.first_marked_cell(1), Some((3, 1)));
    assert_eq!(tr.is_terminated, 0);

    let batch = restored.batch(10)?;
    assert_eq!(batch.len(), 10);
    Ok(())
}

#[test]
fn near_door_policy_installs_on_a_built_buffer() -> Result<()> {
    let config = TransitionBufferConfig::default().capacity(100);
    let mut buffer: TransitionBuffer<RogueObs, RogueAct> = TransitionBuffer::build(&config);
    buffer.set_policy(Box::new(NearDoorAdmission::default()));

    // rewarding transitions enter regardless of door distance
    for i in 0..5u8 {
        assert!(buffer.push(Transition::new(
            obs((0, 0)),
            RogueAct::new(0),
            1.0,
            obs((0, i as usize)),
            0,
        ))?);
    }
    assert_eq!(buffer.len(), 5);
    Ok(())
}
