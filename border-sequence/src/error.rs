//! Errors in the library.
use thiserror::Error;

/// Errors raised while building or reading sequence datasets.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SequenceError {
    /// Lookup position outside of `[0, len)`.
    #[error("Index {index} is out of range for a dataset of length {len}")]
    IndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Number of windows in the dataset.
        len: usize,
    },

    /// Fields of an episode store do not agree on their shapes.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Configuration is inconsistent with itself or with the episode store.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Value bounds cannot be used to rescale returns.
    #[error("Degenerate value bounds: vmin = {vmin}, vmax = {vmax}")]
    DegenerateValueBounds {
        /// Smallest discounted return found.
        vmin: f32,
        /// Largest discounted return found.
        vmax: f32,
    },
}
