//! Errors of the core library.
use std::io;
use thiserror::Error;

/// Errors raised by the core abstractions.
#[derive(Debug, Error)]
pub enum DelveError {
    /// A batch larger than the buffer content was requested.
    ///
    /// Callers are expected to check [`len`](crate::ExperienceBufferBase::len)
    /// against their warm-up threshold before sampling.
    #[error("requested batch of {requested} transitions, buffer holds {len}")]
    BatchSizeExceedsLen {
        /// Requested batch size.
        requested: usize,
        /// Current buffer length.
        len: usize,
    },

    /// Sampling from a buffer that holds no transitions.
    #[error("cannot sample from an empty buffer")]
    EmptyBuffer,

    /// A record value was read with the wrong type.
    #[error("record key {0} holds a value of another type")]
    RecordValueType(String),

    /// A record key was not present.
    #[error("record key {0} not found")]
    RecordKeyNotFound(String),

    /// A persisted parameter line was not a `name,value` pair.
    #[error("malformed parameter line {0}")]
    MalformedParam(String),

    /// Underlying I/O failure during persistence.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Transition blob encoding or decoding failure.
    #[error(transparent)]
    Codec(#[from] bincode::Error),

    /// Parameter file reading or writing failure.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
