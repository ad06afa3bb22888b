//! Configuration of [`SequenceDataset`](super::SequenceDataset).
use crate::{error::SequenceError, Conditioning, EpisodeStore, NormalizerKind};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`SequenceDataset`](super::SequenceDataset).
///
/// The maximum path length is taken from the episode store.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct SequenceDatasetConfig {
    /// Number of steps in a window.
    pub horizon: usize,

    /// If `true`, windows may extend past the valid steps of an episode.
    pub use_padding: bool,

    /// If `true`, batches carry the language embedding of their episode.
    pub use_language: bool,

    /// Normalization strategy for observations and actions.
    pub normalizer: NormalizerKind,

    /// Steps of a window used as conditions.
    pub conditioning: Conditioning,
}

impl Default for SequenceDatasetConfig {
    fn default() -> Self {
        Self {
            horizon: 64,
            use_padding: true,
            use_language: false,
            normalizer: NormalizerKind::Limits,
            conditioning: Conditioning::Start,
        }
    }
}

impl SequenceDatasetConfig {
    /// Sets the number of steps in a window.
    pub fn horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Sets the padding policy.
    pub fn use_padding(mut self, use_padding: bool) -> Self {
        self.use_padding = use_padding;
        self
    }

    /// Enables or disables language embeddings in batches.
    pub fn use_language(mut self, use_language: bool) -> Self {
        self.use_language = use_language;
        self
    }

    /// Sets the normalization strategy.
    pub fn normalizer(mut self, normalizer: NormalizerKind) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Sets the conditioning strategy.
    pub fn conditioning(mut self, conditioning: Conditioning) -> Self {
        self.conditioning = conditioning;
        self
    }

    /// Checks the configuration against an episode store.
    pub fn validate(&self, store: &EpisodeStore) -> Result<()> {
        if self.horizon == 0 {
            return Err(SequenceError::InvalidConfig("horizon must be positive".into()).into());
        }
        if self.use_language && store.language().is_none() {
            return Err(SequenceError::InvalidConfig(
                "use_language is set but the store has no language field".into(),
            )
            .into());
        }
        Ok(())
    }

    /// Constructs [`SequenceDatasetConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`SequenceDatasetConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
