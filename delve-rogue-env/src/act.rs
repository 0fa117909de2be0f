//! Actions for [`RogueEnv`](crate::RogueEnv).
use delve_core::Act;
use serde::{Deserialize, Serialize};

/// Terminal redraw request; some emulated terminals only flush a full
/// frame on this signal, so it follows every game action.
pub const REFRESH_BYTE: u8 = 0x12;

/// Keystrokes ending the game: quit, confirm, acknowledge.
pub const QUIT_SEQUENCE: [u8; 3] = [b'Q', b'y', b'\n'];

/// A game command the agent can issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RogueCommand {
    /// Move left (`h`).
    Left,
    /// Move down (`j`).
    Down,
    /// Move up (`k`).
    Up,
    /// Move right (`l`).
    Right,
    /// Descend the stairs (`>`).
    Descend,
}

/// The fixed, ordered action list; action indices index into this.
pub const ACTIONS: [RogueCommand; 5] = [
    RogueCommand::Left,
    RogueCommand::Down,
    RogueCommand::Up,
    RogueCommand::Right,
    RogueCommand::Descend,
];

impl RogueCommand {
    /// The keystroke sent to the game.
    pub fn keystroke(self) -> u8 {
        match self {
            RogueCommand::Left => b'h',
            RogueCommand::Down => b'j',
            RogueCommand::Up => b'k',
            RogueCommand::Right => b'l',
            RogueCommand::Descend => b'>',
        }
    }

    /// The command at `ix` in the action list.
    pub fn from_index(ix: u8) -> Option<Self> {
        ACTIONS.get(ix as usize).copied()
    }

    /// The index of this command in the action list.
    pub fn index(self) -> u8 {
        ACTIONS.iter().position(|&c| c == self).unwrap_or(0) as u8
    }
}

/// Action for [`RogueEnv`](crate::RogueEnv): an index into [`ACTIONS`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RogueAct {
    /// Action index.
    pub act: u8,
}

impl RogueAct {
    /// Constructs an action from its index.
    pub fn new(act: u8) -> Self {
        Self { act }
    }

    /// The command this index selects, if in range.
    pub fn command(&self) -> Option<RogueCommand> {
        RogueCommand::from_index(self.act)
    }
}

impl Act for RogueAct {
    fn len(&self) -> usize {
        1
    }
}

impl From<u8> for RogueAct {
    fn from(act: u8) -> Self {
        Self { act }
    }
}

impl From<RogueCommand> for RogueAct {
    fn from(command: RogueCommand) -> Self {
        Self {
            act: command.index(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_and_keystrokes_are_consistent() {
        for (ix, &command) in ACTIONS.iter().enumerate() {
            assert_eq!(RogueCommand::from_index(ix as u8), Some(command));
            assert_eq!(command.index() as usize, ix);
        }
        assert_eq!(RogueCommand::from_index(5), None);
        assert_eq!(RogueCommand::Descend.keystroke(), b'>');
    }

    #[test]
    fn act_roundtrips_through_command() {
        let act: RogueAct = RogueCommand::Up.into();
        assert_eq!(act.command(), Some(RogueCommand::Up));
    }
}
