//! Random selection of dataset positions.
use crate::{dataset::WindowDataset, error::SequenceError};
use anyhow::Result;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

/// Draws positions of a [`WindowDataset`] with a seeded generator.
///
/// ```
/// use border_sequence::WindowSampler;
///
/// let mut sampler = WindowSampler::new(42);
/// let ixs = sampler.sample(10, 4).unwrap();
/// assert!(ixs.iter().all(|&ix| ix < 10));
/// ```
pub struct WindowSampler {
    rng: StdRng,
}

impl WindowSampler {
    /// Creates a sampler.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws `size` positions uniformly from `[0, len)`, with replacement.
    pub fn sample(&mut self, len: usize, size: usize) -> Result<Vec<usize>> {
        if len == 0 {
            return Err(
                SequenceError::InvalidConfig("cannot sample from an empty dataset".into()).into(),
            );
        }
        Ok((0..size).map(|_| self.rng.gen_range(0..len)).collect())
    }

    /// Returns all positions of `[0, len)` in a shuffled order.
    pub fn epoch(&mut self, len: usize) -> Vec<usize> {
        let mut ixs = (0..len).collect::<Vec<_>>();
        ixs.shuffle(&mut self.rng);
        ixs
    }

    /// Draws `size` items from a dataset.
    pub fn batch<D: WindowDataset>(&mut self, dataset: &D, size: usize) -> Result<Vec<D::Item>> {
        self.sample(dataset.len(), size)?
            .into_iter()
            .map(|ix| dataset.get(ix))
            .collect()
    }
}
