//! A single recorded episode.
use crate::error::EpisodeError;
use anyhow::Result;
use ndarray::{Array1, Array2};

/// Arrays of one episode, one row per step.
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    /// Observations, `[len, observation_dim]`.
    pub observations: Array2<f32>,

    /// Actions, `[len, action_dim]`.
    pub actions: Array2<f32>,

    /// Rewards, `[len]`.
    pub rewards: Array1<f32>,

    /// Termination flags, one per step.
    pub terminals: Vec<bool>,

    /// Timeout flags, one per step.
    pub timeouts: Vec<bool>,

    /// Language embedding of the episode.
    pub language: Option<Array1<f32>>,
}

impl Episode {
    /// Creates an episode that neither terminates nor times out.
    pub fn new(observations: Array2<f32>, actions: Array2<f32>, rewards: Array1<f32>) -> Self {
        let len = rewards.len();
        Self {
            observations,
            actions,
            rewards,
            terminals: vec![false; len],
            timeouts: vec![false; len],
            language: None,
        }
    }

    /// Sets the termination flags.
    pub fn terminals(mut self, terminals: Vec<bool>) -> Self {
        self.terminals = terminals;
        self
    }

    /// Sets the timeout flags.
    pub fn timeouts(mut self, timeouts: Vec<bool>) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Sets the language embedding.
    pub fn language(mut self, language: Array1<f32>) -> Self {
        self.language = Some(language);
        self
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    /// Returns `true` if the episode has no step.
    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    /// Returns `true` if any step is terminal.
    pub fn is_terminated(&self) -> bool {
        self.terminals.iter().any(|&t| t)
    }

    /// Returns `true` if any step timed out.
    pub fn is_timed_out(&self) -> bool {
        self.timeouts.iter().any(|&t| t)
    }

    /// Checks that all fields have one entry per step.
    pub fn check(&self) -> Result<()> {
        let len = self.len();
        let lens = [
            ("observations", self.observations.nrows()),
            ("actions", self.actions.nrows()),
            ("terminals", self.terminals.len()),
            ("timeouts", self.timeouts.len()),
        ];
        if let Some((name, n)) = lens.iter().find(|(_, n)| *n != len) {
            return Err(EpisodeError::InconsistentEpisode(format!(
                "{} has {} steps, rewards have {}",
                name, n, len
            ))
            .into());
        }
        Ok(())
    }
}
