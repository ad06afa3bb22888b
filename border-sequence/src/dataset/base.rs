use super::{SequenceBatch, SequenceDatasetConfig, WindowDataset};
use crate::{
    error::SequenceError, normalize_fields, Conditioning, DatasetNormalizer, EpisodeStore,
    NormalizedFields, Window, WindowIndex,
};
use anyhow::Result;
use ndarray::{concatenate, s, Axis};

/// Fixed-horizon windows over the episodes of an [`EpisodeStore`].
///
/// Built in phases by [`SequenceDataset::build`]: the configuration is checked
/// against the store, normalizers are fitted, observations and actions are
/// normalized and the window index is enumerated. The returned dataset is
/// immutable, so lookups can be served from several threads.
#[derive(Debug)]
pub struct SequenceDataset {
    config: SequenceDatasetConfig,
    store: EpisodeStore,
    normalizer: DatasetNormalizer,
    normed: NormalizedFields,
    index: WindowIndex,
}

impl SequenceDataset {
    /// Builds the dataset.
    pub fn build(config: SequenceDatasetConfig, store: EpisodeStore) -> Result<Self> {
        config.validate(&store)?;
        log::info!(
            "Episode store: {} episodes, max_path_length = {}, observation_dim = {}, action_dim = {}",
            store.n_episodes(),
            store.max_path_length(),
            store.observation_dim(),
            store.action_dim()
        );

        let normalizer = DatasetNormalizer::fit(&store, config.normalizer)?;
        let normed = normalize_fields(&store, &normalizer)?;
        let index = WindowIndex::build(
            store.path_lengths(),
            config.horizon,
            store.max_path_length(),
            config.use_padding,
        );

        let n_short = store
            .path_lengths()
            .iter()
            .filter(|&&l| l < config.horizon)
            .count();
        if n_short > 0 {
            log::warn!(
                "{} episodes are shorter than horizon {} and have no window",
                n_short,
                config.horizon
            );
        }
        log::info!("{} windows with horizon {}", index.len(), config.horizon);

        Ok(Self {
            config,
            store,
            normalizer,
            normed,
            index,
        })
    }

    /// Number of windows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the dataset has no window.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Window at the given position.
    pub fn window(&self, ix: usize) -> Result<Window> {
        self.index.get(ix).copied().ok_or_else(|| {
            SequenceError::IndexOutOfRange {
                index: ix,
                len: self.len(),
            }
            .into()
        })
    }

    /// Assembles the batch of the window at the given position.
    pub fn get(&self, ix: usize) -> Result<SequenceBatch> {
        let Window {
            episode,
            start,
            end,
        } = self.window(ix)?;

        let observations = self.normed.observations.slice(s![episode, start..end, ..]);
        let actions = self.normed.actions.slice(s![episode, start..end, ..]);

        let conditions = self
            .config
            .conditioning
            .conditions(observations, self.config.horizon);
        let trajectories = concatenate(Axis(1), &[actions, observations])?;
        let language = if self.config.use_language {
            self.store.episode_language(episode).map(|l| l.to_owned())
        } else {
            None
        };

        Ok(SequenceBatch {
            trajectories,
            conditions,
            language,
        })
    }

    /// Assembles the batches of several positions.
    pub fn get_many(&self, ixs: &[usize]) -> Result<Vec<SequenceBatch>> {
        ixs.iter().map(|&ix| self.get(ix)).collect()
    }

    /// Configuration the dataset was built with.
    pub fn config(&self) -> &SequenceDatasetConfig {
        &self.config
    }

    /// Number of steps in a window.
    pub fn horizon(&self) -> usize {
        self.config.horizon
    }

    /// Conditioning strategy.
    pub fn conditioning(&self) -> Conditioning {
        self.config.conditioning
    }

    /// Dimension of observations.
    pub fn observation_dim(&self) -> usize {
        self.store.observation_dim()
    }

    /// Dimension of actions.
    pub fn action_dim(&self) -> usize {
        self.store.action_dim()
    }

    /// Width of a row of `trajectories`.
    pub fn transition_dim(&self) -> usize {
        self.action_dim() + self.observation_dim()
    }

    /// Raw episode arrays.
    pub fn store(&self) -> &EpisodeStore {
        &self.store
    }

    /// Fitted normalizers, e.g., to map generated trajectories back.
    pub fn normalizer(&self) -> &DatasetNormalizer {
        &self.normalizer
    }

    /// Normalized observations and actions.
    pub fn normed(&self) -> &NormalizedFields {
        &self.normed
    }

    /// Window index.
    pub fn index(&self) -> &WindowIndex {
        &self.index
    }
}

impl WindowDataset for SequenceDataset {
    type Item = SequenceBatch;

    fn len(&self) -> usize {
        SequenceDataset::len(self)
    }

    fn get(&self, ix: usize) -> Result<Self::Item> {
        SequenceDataset::get(self, ix)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::NormalizerKind;
    use ndarray::{Array2, Array3};

    fn store(path_lengths: Vec<usize>, max_path_length: usize) -> EpisodeStore {
        let n = path_lengths.len();
        let obs = Array3::from_shape_fn((n, max_path_length, 2), |(e, t, d)| {
            (100 * e + 10 * t + d) as f32
        });
        let act = Array3::from_shape_fn((n, max_path_length, 1), |(e, t, _)| -((e + t) as f32));
        let lang = Array2::from_shape_fn((n, 3), |(e, d)| (e * 3 + d) as f32);
        EpisodeStore::new(obs, act, Array2::zeros((n, max_path_length)), Some(lang), path_lengths)
            .unwrap()
    }

    fn config() -> SequenceDatasetConfig {
        SequenceDatasetConfig::default()
            .horizon(2)
            .normalizer(NormalizerKind::Identity)
    }

    #[test]
    fn test_len() -> Result<()> {
        let dataset = SequenceDataset::build(config(), store(vec![3, 5], 5))?;
        assert_eq!(dataset.len(), 5);
        assert_eq!(dataset.transition_dim(), 3);
        Ok(())
    }

    #[test]
    fn test_get_out_of_range() -> Result<()> {
        let dataset = SequenceDataset::build(config(), store(vec![3, 5], 5))?;
        let err = dataset.get(5).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SequenceError>(),
            Some(&SequenceError::IndexOutOfRange { index: 5, len: 5 })
        );
        Ok(())
    }

    #[test]
    fn test_trajectories_layout() -> Result<()> {
        let dataset = SequenceDataset::build(config(), store(vec![3, 5], 5))?;
        // Third window: episode 1, start 0
        let batch = dataset.get(2)?;
        assert_eq!(batch.trajectories.dim(), (2, 3));
        assert_eq!(batch.trajectories.row(0).to_vec(), vec![-1.0, 100.0, 101.0]);
        assert_eq!(batch.trajectories.row(1).to_vec(), vec![-2.0, 110.0, 111.0]);
        assert_eq!(batch.language, None);
        Ok(())
    }

    #[test]
    fn test_language_is_per_episode() -> Result<()> {
        let dataset =
            SequenceDataset::build(config().use_language(true), store(vec![3, 5], 5))?;
        let a = dataset.get(2)?;
        let b = dataset.get(4)?;
        assert_eq!(a.language, b.language);
        assert_eq!(a.language.unwrap().to_vec(), vec![3.0, 4.0, 5.0]);
        Ok(())
    }

    #[test]
    fn test_invalid_config() {
        let with_language = store(vec![3, 5], 5);
        let s = store(vec![3, 5], 5);
        let without_language = EpisodeStore::new(
            s.observations().clone(),
            s.actions().clone(),
            s.rewards().clone(),
            None,
            s.path_lengths().to_vec(),
        )
        .unwrap();
        let cases = vec![
            (config().horizon(0), with_language),
            (config().use_language(true), without_language),
        ];
        for (config, store) in cases {
            let err = SequenceDataset::build(config, store).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<SequenceError>(),
                Some(SequenceError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_horizon_longer_than_storage() -> Result<()> {
        // Every episode is too short, so there is no window
        let dataset = SequenceDataset::build(config().horizon(6), store(vec![3, 5], 5))?;
        assert_eq!(dataset.len(), 0);
        assert!(dataset.is_empty());
        assert!(dataset.get(0).is_err());
        Ok(())
    }
}
