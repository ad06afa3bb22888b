//! Configuration of [`EpisodeBuffer`](crate::EpisodeBuffer).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`EpisodeBuffer`](crate::EpisodeBuffer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpisodeBufferConfig {
    /// Maximum number of episodes.
    pub max_n_episodes: usize,

    /// Maximum number of steps per episode. Shorter episodes are zero-padded.
    pub max_path_length: usize,

    /// Added to the last reward of terminated episodes.
    pub termination_penalty: Option<f32>,
}

impl Default for EpisodeBufferConfig {
    fn default() -> Self {
        Self {
            max_n_episodes: 10000,
            max_path_length: 1000,
            termination_penalty: Some(0.0),
        }
    }
}

impl EpisodeBufferConfig {
    /// Sets the maximum number of episodes.
    pub fn max_n_episodes(mut self, v: usize) -> Self {
        self.max_n_episodes = v;
        self
    }

    /// Sets the maximum number of steps per episode.
    pub fn max_path_length(mut self, v: usize) -> Self {
        self.max_path_length = v;
        self
    }

    /// Sets the termination penalty.
    pub fn termination_penalty(mut self, v: Option<f32>) -> Self {
        self.termination_penalty = v;
        self
    }

    /// Constructs [`EpisodeBufferConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`EpisodeBufferConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
