//! Items returned by dataset lookups.
use crate::Conditions;
use ndarray::{Array1, Array2};

/// A window prepared for a sequence generation model.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceBatch {
    /// `[horizon, action_dim + observation_dim]`, action features first.
    pub trajectories: Array2<f32>,

    /// Conditioning observations keyed by step in the window.
    pub conditions: Conditions,

    /// Language embedding of the episode, if enabled.
    pub language: Option<Array1<f32>>,
}

/// A [`SequenceBatch`] with the discounted return of its window.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueBatch {
    /// `[horizon, action_dim + observation_dim]`, action features first.
    pub trajectories: Array2<f32>,

    /// Conditioning observations keyed by step in the window.
    pub conditions: Conditions,

    /// Language embedding of the episode, if enabled.
    pub language: Option<Array1<f32>>,

    /// Discounted return from the window start, rescaled to `[-1, 1]` when
    /// bounds normalization is enabled.
    pub value: f32,
}

impl ValueBatch {
    pub(crate) fn new(batch: SequenceBatch, value: f32) -> Self {
        let SequenceBatch {
            trajectories,
            conditions,
            language,
        } = batch;
        Self {
            trajectories,
            conditions,
            language,
            value,
        }
    }
}
