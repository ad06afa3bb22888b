//! Datasets of fixed-horizon windows.
//!
//! [`SequenceDataset`] serves normalized trajectories with their conditions,
//! [`ValueDataset`](crate::ValueDataset) adds the discounted return of each
//! window.
mod base;
mod batch;
mod config;
use anyhow::Result;
pub use base::SequenceDataset;
pub use batch::{SequenceBatch, ValueBatch};
pub use config::SequenceDatasetConfig;

/// Random access to the items of a window dataset.
pub trait WindowDataset {
    /// Item returned by a lookup.
    type Item;

    /// Number of items.
    fn len(&self) -> usize;

    /// Returns `true` if there is no item.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Item at the given position, an error if it is out of range.
    fn get(&self, ix: usize) -> Result<Self::Item>;
}
