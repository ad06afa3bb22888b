//! Collection of episodes into padded arrays.
use crate::{error::EpisodeError, Episode, EpisodeBufferConfig};
use anyhow::Result;
use border_sequence::EpisodeStore;
use ndarray::{s, Array2, Array3};

/// Arrays allocated when the first episode is added, as the dimensions are
/// not known before.
struct Storage {
    observations: Array3<f32>,
    actions: Array3<f32>,
    rewards: Array2<f32>,
    language: Option<Array2<f32>>,
}

impl Storage {
    fn new(config: &EpisodeBufferConfig, episode: &Episode) -> Self {
        let n = config.max_n_episodes;
        let t = config.max_path_length;
        Self {
            observations: Array3::zeros((n, t, episode.observations.ncols())),
            actions: Array3::zeros((n, t, episode.actions.ncols())),
            rewards: Array2::zeros((n, t)),
            language: episode
                .language
                .as_ref()
                .map(|l| Array2::zeros((n, l.len()))),
        }
    }

    fn check(&self, episode: &Episode) -> Result<()> {
        let dims = [
            (
                "observation_dim",
                self.observations.dim().2,
                episode.observations.ncols(),
            ),
            ("action_dim", self.actions.dim().2, episode.actions.ncols()),
        ];
        if let Some((name, expected, got)) = dims.iter().find(|(_, e, g)| e != g) {
            return Err(EpisodeError::InconsistentEpisode(format!(
                "{} is {}, buffer holds {}",
                name, got, expected
            ))
            .into());
        }

        match (&self.language, &episode.language) {
            (Some(l), Some(m)) if l.ncols() != m.len() => {
                Err(EpisodeError::InconsistentEpisode(format!(
                    "language_dim is {}, buffer holds {}",
                    m.len(),
                    l.ncols()
                ))
                .into())
            }
            (Some(_), None) | (None, Some(_)) => Err(EpisodeError::InconsistentEpisode(
                "language is given for some episodes only".to_string(),
            )
            .into()),
            _ => Ok(()),
        }
    }
}

/// Collects episodes of different lengths into zero-padded arrays.
///
/// ```
/// # use anyhow::Result;
/// use border_episodes::{Episode, EpisodeBuffer, EpisodeBufferConfig};
/// use ndarray::{Array1, Array2};
///
/// # fn main() -> Result<()> {
/// let config = EpisodeBufferConfig::default()
///     .max_n_episodes(2)
///     .max_path_length(8);
/// let mut buffer = EpisodeBuffer::new(config);
/// buffer.add_path(Episode::new(Array2::zeros((5, 3)), Array2::zeros((5, 1)), Array1::ones(5)))?;
/// let store = buffer.finalize()?;
/// assert_eq!(store.path_lengths(), &[5]);
/// # Ok(())
/// # }
/// ```
pub struct EpisodeBuffer {
    config: EpisodeBufferConfig,
    storage: Option<Storage>,
    path_lengths: Vec<usize>,
}

impl EpisodeBuffer {
    /// Creates an empty buffer.
    pub fn new(config: EpisodeBufferConfig) -> Self {
        Self {
            config,
            storage: None,
            path_lengths: Vec::new(),
        }
    }

    /// Number of episodes added so far.
    pub fn n_episodes(&self) -> usize {
        self.path_lengths.len()
    }

    /// Number of steps added so far.
    pub fn n_steps(&self) -> usize {
        self.path_lengths.iter().sum()
    }

    /// Adds an episode.
    ///
    /// If the episode terminated and a termination penalty is configured, the
    /// penalty is added to its last reward.
    pub fn add_path(&mut self, episode: Episode) -> Result<()> {
        episode.check()?;
        let len = episode.len();
        if len > self.config.max_path_length {
            return Err(EpisodeError::PathTooLong {
                len,
                max_path_length: self.config.max_path_length,
            }
            .into());
        }
        if self.n_episodes() == self.config.max_n_episodes {
            return Err(EpisodeError::BufferFull(self.config.max_n_episodes).into());
        }
        let penalty = match self.config.termination_penalty {
            Some(penalty) if episode.is_terminated() => {
                if episode.is_timed_out() {
                    return Err(EpisodeError::TerminatedAndTimedOut.into());
                }
                Some(penalty)
            }
            _ => None,
        };

        let config = &self.config;
        let storage = self
            .storage
            .get_or_insert_with(|| Storage::new(config, &episode));
        storage.check(&episode)?;

        let e = self.path_lengths.len();
        storage
            .observations
            .slice_mut(s![e, ..len, ..])
            .assign(&episode.observations);
        storage
            .actions
            .slice_mut(s![e, ..len, ..])
            .assign(&episode.actions);
        storage
            .rewards
            .slice_mut(s![e, ..len])
            .assign(&episode.rewards);
        if let (Some(l), Some(m)) = (storage.language.as_mut(), episode.language.as_ref()) {
            l.row_mut(e).assign(m);
        }
        if let Some(penalty) = penalty {
            storage.rewards[[e, len - 1]] += penalty;
        }

        log::debug!("Added episode {} with {} steps", e, len);
        self.path_lengths.push(len);
        Ok(())
    }

    /// Trims the arrays to the added episodes and returns them as a store.
    pub fn finalize(self) -> Result<EpisodeStore> {
        let n = self.path_lengths.len();
        let storage = match self.storage {
            Some(storage) => storage,
            None => return Err(EpisodeError::Empty.into()),
        };

        log::info!(
            "Finalized {} episodes, {} steps, max_path_length = {}",
            n,
            self.path_lengths.iter().sum::<usize>(),
            self.config.max_path_length
        );

        EpisodeStore::new(
            storage.observations.slice_move(s![..n, .., ..]),
            storage.actions.slice_move(s![..n, .., ..]),
            storage.rewards.slice_move(s![..n, ..]),
            storage.language.map(|l| l.slice_move(s![..n, ..])),
            self.path_lengths,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::{array, Array1};

    fn config() -> EpisodeBufferConfig {
        EpisodeBufferConfig::default()
            .max_n_episodes(3)
            .max_path_length(4)
    }

    fn episode(len: usize) -> Episode {
        Episode::new(
            Array2::from_shape_fn((len, 2), |(t, d)| (t * 2 + d) as f32),
            Array2::ones((len, 1)),
            Array1::ones(len),
        )
    }

    #[test]
    fn test_padding() -> Result<()> {
        let mut buffer = EpisodeBuffer::new(config());
        buffer.add_path(episode(2))?;
        buffer.add_path(episode(4))?;
        let store = buffer.finalize()?;
        assert_eq!(store.n_episodes(), 2);
        assert_eq!(store.path_lengths(), &[2, 4]);
        assert_eq!(store.rewards().row(0).to_vec(), vec![1.0, 1.0, 0.0, 0.0]);
        assert_eq!(store.observations()[[1, 3, 1]], 7.0);
        assert_eq!(store.observations()[[0, 3, 1]], 0.0);
        Ok(())
    }

    #[test]
    fn test_termination_penalty() -> Result<()> {
        let mut buffer = EpisodeBuffer::new(config().termination_penalty(Some(-10.0)));
        buffer.add_path(episode(3).terminals(vec![false, false, true]))?;
        buffer.add_path(episode(3))?;
        let store = buffer.finalize()?;
        assert_eq!(store.rewards().row(0).to_vec(), vec![1.0, 1.0, -9.0, 0.0]);
        assert_eq!(store.rewards().row(1).to_vec(), vec![1.0, 1.0, 1.0, 0.0]);
        Ok(())
    }

    #[test]
    fn test_terminated_and_timed_out() {
        let mut buffer = EpisodeBuffer::new(config());
        let ep = episode(2)
            .terminals(vec![false, true])
            .timeouts(vec![false, true]);
        let err = buffer.add_path(ep).unwrap_err();
        assert_eq!(
            err.downcast_ref::<EpisodeError>(),
            Some(&EpisodeError::TerminatedAndTimedOut)
        );
    }

    #[test]
    fn test_limits() {
        let mut buffer = EpisodeBuffer::new(config());
        assert!(matches!(
            buffer.add_path(episode(5)).unwrap_err().downcast_ref::<EpisodeError>(),
            Some(EpisodeError::PathTooLong { .. })
        ));
        for _ in 0..3 {
            buffer.add_path(episode(1)).unwrap();
        }
        assert!(matches!(
            buffer.add_path(episode(1)).unwrap_err().downcast_ref::<EpisodeError>(),
            Some(EpisodeError::BufferFull(3))
        ));
    }

    #[test]
    fn test_language() -> Result<()> {
        let mut buffer = EpisodeBuffer::new(config());
        buffer.add_path(episode(2).language(array![1.0f32, 2.0]))?;
        assert!(buffer.add_path(episode(2)).is_err());
        buffer.add_path(episode(3).language(array![3.0f32, 4.0]))?;
        let store = buffer.finalize()?;
        assert_eq!(store.language().unwrap(), &array![[1.0f32, 2.0], [3.0, 4.0]]);
        Ok(())
    }

    #[test]
    fn test_inconsistent_dims() {
        let mut buffer = EpisodeBuffer::new(config());
        buffer.add_path(episode(2)).unwrap();
        let ep = Episode::new(Array2::zeros((2, 3)), Array2::ones((2, 1)), Array1::ones(2));
        assert!(buffer.add_path(ep).is_err());
        let ep = Episode::new(Array2::zeros((3, 2)), Array2::ones((2, 1)), Array1::ones(2));
        assert!(buffer.add_path(ep).is_err());
    }
}
