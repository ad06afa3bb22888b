//! Configuration of [`ValueDataset`](super::ValueDataset).
use crate::error::SequenceError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`ValueDataset`](super::ValueDataset).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ValueConfig {
    /// Discount factor in `(0, 1]`.
    pub discount: f32,

    /// If `true`, returns are rescaled to `[-1, 1]` with dataset-wide bounds.
    pub normed: bool,
}

impl Default for ValueConfig {
    fn default() -> Self {
        Self {
            discount: 0.99,
            normed: false,
        }
    }
}

impl ValueConfig {
    /// Sets the discount factor.
    pub fn discount(mut self, discount: f32) -> Self {
        self.discount = discount;
        self
    }

    /// Enables or disables rescaling of returns.
    pub fn normed(mut self, normed: bool) -> Self {
        self.normed = normed;
        self
    }

    /// Checks the range of the discount factor.
    pub fn validate(&self) -> Result<()> {
        if !(self.discount > 0.0 && self.discount <= 1.0) {
            return Err(SequenceError::InvalidConfig(format!(
                "discount must be in (0, 1], got {}",
                self.discount
            ))
            .into());
        }
        Ok(())
    }

    /// Constructs [`ValueConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ValueConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
