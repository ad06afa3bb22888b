//! Storage of raw episode arrays.
//!
//! All episodes are padded to the same `max_path_length` along the time axis.
//! The number of valid steps of each episode is kept in `path_lengths`;
//! steps beyond it are padding.
use crate::error::SequenceError;
use anyhow::Result;
use ndarray::{Array2, Array3, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Raw per-field arrays of all episodes.
///
/// The store is read-only once constructed. Normalized derivatives live in
/// [`NormalizedFields`](crate::NormalizedFields), not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStore {
    /// Observations, `[n_episodes, max_path_length, observation_dim]`.
    observations: Array3<f32>,

    /// Actions, `[n_episodes, max_path_length, action_dim]`.
    actions: Array3<f32>,

    /// Rewards, `[n_episodes, max_path_length]`.
    rewards: Array2<f32>,

    /// Language embeddings, `[n_episodes, embedding_dim]`.
    language: Option<Array2<f32>>,

    /// Number of valid steps in each episode.
    path_lengths: Vec<usize>,
}

impl EpisodeStore {
    /// Creates a store after checking that all fields agree on their shapes.
    ///
    /// * `observations`: `[n_episodes, max_path_length, observation_dim]`.
    /// * `actions`: `[n_episodes, max_path_length, action_dim]`.
    /// * `rewards`: `[n_episodes, max_path_length]`.
    /// * `language`: optional `[n_episodes, embedding_dim]`.
    /// * `path_lengths`: one entry per episode, each at most `max_path_length`.
    pub fn new(
        observations: Array3<f32>,
        actions: Array3<f32>,
        rewards: Array2<f32>,
        language: Option<Array2<f32>>,
        path_lengths: Vec<usize>,
    ) -> Result<Self> {
        let (n_episodes, max_path_length, _) = observations.dim();

        if actions.dim().0 != n_episodes || actions.dim().1 != max_path_length {
            return Err(SequenceError::ShapeMismatch(format!(
                "actions {:?} vs observations {:?}",
                actions.shape(),
                observations.shape()
            ))
            .into());
        }
        if rewards.dim() != (n_episodes, max_path_length) {
            return Err(SequenceError::ShapeMismatch(format!(
                "rewards {:?} vs observations {:?}",
                rewards.shape(),
                observations.shape()
            ))
            .into());
        }
        if let Some(language) = &language {
            if language.dim().0 != n_episodes {
                return Err(SequenceError::ShapeMismatch(format!(
                    "language has {} episodes, observations have {}",
                    language.dim().0,
                    n_episodes
                ))
                .into());
            }
        }
        if path_lengths.len() != n_episodes {
            return Err(SequenceError::ShapeMismatch(format!(
                "{} path lengths for {} episodes",
                path_lengths.len(),
                n_episodes
            ))
            .into());
        }
        if let Some((e, l)) = path_lengths
            .iter()
            .enumerate()
            .find(|(_, &l)| l > max_path_length)
        {
            return Err(SequenceError::ShapeMismatch(format!(
                "path length {} of episode {} exceeds max_path_length {}",
                l, e, max_path_length
            ))
            .into());
        }

        Ok(Self {
            observations,
            actions,
            rewards,
            language,
            path_lengths,
        })
    }

    /// Checks the shapes of a store obtained without [`EpisodeStore::new`],
    /// e.g., by deserialization.
    pub fn validate(self) -> Result<Self> {
        let Self {
            observations,
            actions,
            rewards,
            language,
            path_lengths,
        } = self;
        Self::new(observations, actions, rewards, language, path_lengths)
    }

    /// Number of episodes.
    pub fn n_episodes(&self) -> usize {
        self.observations.dim().0
    }

    /// Length of the time axis shared by all episodes.
    pub fn max_path_length(&self) -> usize {
        self.observations.dim().1
    }

    /// Dimension of observation vectors.
    pub fn observation_dim(&self) -> usize {
        self.observations.dim().2
    }

    /// Dimension of action vectors.
    pub fn action_dim(&self) -> usize {
        self.actions.dim().2
    }

    /// Dimension of language embeddings, `None` if the store has none.
    pub fn language_dim(&self) -> Option<usize> {
        self.language.as_ref().map(|l| l.dim().1)
    }

    /// Number of valid steps in each episode.
    pub fn path_lengths(&self) -> &[usize] {
        &self.path_lengths
    }

    /// Raw observations including padding.
    pub fn observations(&self) -> &Array3<f32> {
        &self.observations
    }

    /// Raw actions including padding.
    pub fn actions(&self) -> &Array3<f32> {
        &self.actions
    }

    /// Rewards including padding.
    pub fn rewards(&self) -> &Array2<f32> {
        &self.rewards
    }

    /// Language embeddings of all episodes.
    pub fn language(&self) -> Option<&Array2<f32>> {
        self.language.as_ref()
    }

    /// Rewards of an episode from `start` to the end of storage.
    ///
    /// # Panics
    ///
    /// Panics if `episode >= n_episodes` or `start > max_path_length`.
    pub fn rewards_from(&self, episode: usize, start: usize) -> ArrayView1<'_, f32> {
        self.rewards.index_axis(Axis(0), episode).slice_move(ndarray::s![start..])
    }

    /// Language embedding of an episode.
    ///
    /// # Panics
    ///
    /// Panics if the store has language embeddings and `episode >= n_episodes`.
    pub fn episode_language(&self, episode: usize) -> Option<ArrayView1<'_, f32>> {
        self.language
            .as_ref()
            .map(|l| l.index_axis(Axis(0), episode))
    }

    /// Valid steps of an episode for the given field.
    pub(crate) fn valid_steps<'a>(
        &self,
        field: &'a Array3<f32>,
        episode: usize,
    ) -> ArrayView2<'a, f32> {
        field
            .index_axis(Axis(0), episode)
            .slice_move(ndarray::s![..self.path_lengths[episode], ..])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn zeros(n: usize, t: usize) -> (Array3<f32>, Array3<f32>, Array2<f32>) {
        (
            Array3::zeros((n, t, 3)),
            Array3::zeros((n, t, 2)),
            Array2::zeros((n, t)),
        )
    }

    #[test]
    fn test_store_dims() -> Result<()> {
        let (obs, act, rew) = zeros(4, 10);
        let store = EpisodeStore::new(obs, act, rew, Some(Array2::zeros((4, 8))), vec![10; 4])?;
        assert_eq!(store.n_episodes(), 4);
        assert_eq!(store.max_path_length(), 10);
        assert_eq!(store.observation_dim(), 3);
        assert_eq!(store.action_dim(), 2);
        assert_eq!(store.language_dim(), Some(8));
        assert_eq!(store.rewards_from(1, 7).len(), 3);
        Ok(())
    }

    #[test]
    fn test_store_rejects_mismatched_episodes() {
        let (obs, _, rew) = zeros(4, 10);
        let act = Array3::zeros((3, 10, 2));
        let err = EpisodeStore::new(obs, act, rew, None, vec![10; 4]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SequenceError>(),
            Some(SequenceError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_store_rejects_long_paths() {
        let (obs, act, rew) = zeros(2, 5);
        let err = EpisodeStore::new(obs, act, rew, None, vec![5, 6]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SequenceError>(),
            Some(SequenceError::ShapeMismatch(_))
        ));
    }

    #[test]
    #[should_panic]
    fn test_rewards_from_unknown_episode() {
        let (obs, act, rew) = zeros(2, 5);
        let store = EpisodeStore::new(obs, act, rew, None, vec![5, 5]).unwrap();
        store.rewards_from(2, 0);
    }

    #[test]
    #[should_panic]
    fn test_language_of_unknown_episode() {
        let (obs, act, rew) = zeros(2, 5);
        let lang = Array2::zeros((2, 4));
        let store = EpisodeStore::new(obs, act, rew, Some(lang), vec![5, 5]).unwrap();
        store.episode_language(2);
    }

    #[test]
    fn test_store_rejects_language_mismatch() {
        let (obs, act, rew) = zeros(2, 5);
        let lang = Array2::zeros((3, 4));
        assert!(EpisodeStore::new(obs, act, rew, Some(lang), vec![5, 5]).is_err());
    }
}
