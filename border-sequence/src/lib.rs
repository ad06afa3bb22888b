#![warn(missing_docs)]
//! Fixed-horizon window datasets over episodic trajectories.
//!
//! This crate prepares training data for sequence generation models, such as
//! diffusion planners, from offline episodes of observations, actions and
//! rewards.
//!
//! # Pipeline
//!
//! 1. An [`EpisodeStore`] holds the raw arrays of all episodes, padded to a
//!    common `max_path_length`, with the number of valid steps of each episode.
//! 2. [`SequenceDataset::build`] fits a [`DatasetNormalizer`] on the valid steps,
//!    normalizes observations and actions and enumerates all windows in a
//!    [`WindowIndex`].
//! 3. [`SequenceDataset::get`] assembles a [`SequenceBatch`]: the trajectory of
//!    the window (actions followed by observations at each step), the
//!    conditioning observations selected by [`Conditioning`] and, optionally,
//!    the language embedding of the episode.
//! 4. [`ValueDataset`] adds the discounted return of each window, optionally
//!    rescaled to `[-1, 1]`.
//!
//! # Example
//!
//! ```
//! # use anyhow::Result;
//! use border_sequence::{
//!     Conditioning, EpisodeStore, SequenceDataset, SequenceDatasetConfig, ValueConfig,
//!     ValueDataset,
//! };
//! use ndarray::{Array2, Array3};
//!
//! # fn main() -> Result<()> {
//! let store = EpisodeStore::new(
//!     Array3::from_shape_fn((2, 5, 3), |(e, t, d)| (e + t + d) as f32),
//!     Array3::from_shape_fn((2, 5, 1), |(_, t, _)| t as f32),
//!     Array2::ones((2, 5)),
//!     None,
//!     vec![3, 5],
//! )?;
//! let config = SequenceDatasetConfig::default()
//!     .horizon(2)
//!     .conditioning(Conditioning::StartGoal);
//! let dataset = SequenceDataset::build(config, store)?;
//! assert_eq!(dataset.len(), 5);
//!
//! let dataset = ValueDataset::build(dataset, ValueConfig::default().discount(0.99))?;
//! let batch = dataset.get(0)?;
//! assert_eq!(batch.trajectories.dim(), (2, 4));
//! assert_eq!(batch.conditions.len(), 2);
//! # Ok(())
//! # }
//! ```
mod conditioning;
pub mod dataset;
pub mod error;
mod index;
pub mod normalizer;
mod sampler;
mod store;
pub mod value;
pub use conditioning::{Conditioning, Conditions};
pub use dataset::{SequenceBatch, SequenceDataset, SequenceDatasetConfig, ValueBatch, WindowDataset};
pub use error::SequenceError;
pub use index::{Window, WindowIndex};
pub use normalizer::{
    normalize_fields, DatasetNormalizer, Field, NormalizedFields, Normalizer, NormalizerKind,
};
pub use sampler::WindowSampler;
pub use store::EpisodeStore;
pub use value::{ValueBounds, ValueConfig, ValueDataset};
