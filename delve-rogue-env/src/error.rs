//! Errors of the rogue environment.
use std::io;
use thiserror::Error;

/// Errors raised by the terminal bridge and the environment.
#[derive(Debug, Error)]
pub enum RogueEnvError {
    /// The child process could not be spawned.
    #[error("failed to spawn child process: {0}")]
    Spawn(String),

    /// A dialog chain did not resolve within the configured bound.
    #[error("dialog dismiss chain exceeded {limit} dismissals")]
    DismissChainExceeded {
        /// The configured bound.
        limit: usize,
    },

    /// `reset` could not respawn the child within the retry bound.
    #[error("reset failed after {attempts} spawn attempts")]
    ResetRetriesExhausted {
        /// Spawn attempts made.
        attempts: usize,
    },

    /// The encoder's shape does not match the model's expectation.
    #[error("encoder shape {actual:?} does not match expected {expected:?}")]
    EncoderShapeMismatch {
        /// Shape the model expects.
        expected: [usize; 3],
        /// Shape the encoder declares.
        actual: [usize; 3],
    },

    /// An encoder was configured with no layers.
    #[error("encoder layer stack is empty")]
    EmptyLayerStack,

    /// An action index outside the action list.
    #[error("action index {0} is out of range")]
    InvalidAction(u8),

    /// Writing to the child's pipe failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}
