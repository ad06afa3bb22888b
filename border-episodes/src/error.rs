//! Errors in the library.
use thiserror::Error;

/// Errors raised while collecting episodes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EpisodeError {
    /// The episode has more steps than the buffer can hold.
    #[error("Episode of {len} steps exceeds max_path_length {max_path_length}")]
    PathTooLong {
        /// Number of steps in the episode.
        len: usize,
        /// Maximum number of steps per episode.
        max_path_length: usize,
    },

    /// No slot left for another episode.
    #[error("Buffer is full ({0} episodes)")]
    BufferFull(usize),

    /// Fields of an episode disagree on the number of steps or on dimensions.
    #[error("Inconsistent episode: {0}")]
    InconsistentEpisode(String),

    /// No episode has been added.
    #[error("No episode has been added")]
    Empty,

    /// The episode both terminated and timed out.
    #[error("Episode both terminated and timed out")]
    TerminatedAndTimedOut,
}
