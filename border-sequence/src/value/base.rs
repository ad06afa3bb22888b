use super::ValueConfig;
use crate::{
    dataset::WindowDataset, error::SequenceError, SequenceDataset, ValueBatch, Window,
};
use anyhow::Result;
use ndarray::{s, Array1};
use serde::{Deserialize, Serialize};

/// Range of discounted returns over all windows of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueBounds {
    /// Smallest return.
    pub vmin: f32,

    /// Largest return.
    pub vmax: f32,
}

impl ValueBounds {
    /// Returns `true` if the bounds cannot rescale returns, i.e., they were
    /// computed on an empty dataset or all returns are equal.
    pub fn is_degenerate(&self) -> bool {
        !(self.vmin.is_finite() && self.vmax.is_finite() && self.vmax > self.vmin)
    }

    /// Maps a return from `[vmin, vmax]` to `[-1, 1]`.
    pub fn normalize(&self, value: f32) -> f32 {
        // [0, 1]
        let normed = (value - self.vmin) / (self.vmax - self.vmin);
        // [-1, 1]
        normed * 2.0 - 1.0
    }
}

/// Adds the discounted return of each window to the batches of a
/// [`SequenceDataset`].
///
/// The return of a window sums the rewards from the window start to the end
/// of the stored episode, not only the steps inside the window.
#[derive(Debug)]
pub struct ValueDataset {
    base: SequenceDataset,
    config: ValueConfig,

    /// `discount^k` for `k` in `[0, max_path_length)`.
    discounts: Array1<f32>,
    bounds: Option<ValueBounds>,
}

impl ValueDataset {
    /// Builds the dataset.
    ///
    /// If `config.normed` is set, the bounds of returns are computed over all
    /// windows before the dataset is returned. An empty dataset or constant
    /// returns make the bounds degenerate and the build fails.
    pub fn build(base: SequenceDataset, config: ValueConfig) -> Result<Self> {
        config.validate()?;
        let max_path_length = base.store().max_path_length();
        let discounts =
            Array1::from_shape_fn(max_path_length, |k| config.discount.powi(k as i32));

        let mut dataset = Self {
            base,
            config,
            discounts,
            bounds: None,
        };

        if dataset.config.normed {
            log::info!("Getting value dataset bounds over {} windows", dataset.len());
            let bounds = dataset.compute_bounds()?;
            if bounds.is_degenerate() {
                return Err(SequenceError::DegenerateValueBounds {
                    vmin: bounds.vmin,
                    vmax: bounds.vmax,
                }
                .into());
            }
            log::info!("vmin = {}, vmax = {}", bounds.vmin, bounds.vmax);
            dataset.bounds = Some(bounds);
        }

        Ok(dataset)
    }

    /// Number of windows.
    pub fn len(&self) -> usize {
        self.base.len()
    }

    /// Returns `true` if the dataset has no window.
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Discounted return of the window at the given position, not rescaled.
    pub fn discounted_return(&self, ix: usize) -> Result<f32> {
        let Window { episode, start, .. } = self.base.window(ix)?;
        let rewards = self.base.store().rewards_from(episode, start);
        let discounts = self.discounts.slice(s![..rewards.len()]);
        Ok(discounts.dot(&rewards))
    }

    /// Minimum and maximum of discounted returns over all windows.
    ///
    /// An empty dataset gives the inverted bounds `(+inf, -inf)`.
    pub fn compute_bounds(&self) -> Result<ValueBounds> {
        let mut vmin = f32::INFINITY;
        let mut vmax = f32::NEG_INFINITY;
        for ix in 0..self.len() {
            let value = self.discounted_return(ix)?;
            vmin = vmin.min(value);
            vmax = vmax.max(value);
        }
        Ok(ValueBounds { vmin, vmax })
    }

    /// Assembles the batch of the window at the given position.
    pub fn get(&self, ix: usize) -> Result<ValueBatch> {
        let batch = self.base.get(ix)?;
        let mut value = self.discounted_return(ix)?;
        if let Some(bounds) = &self.bounds {
            value = bounds.normalize(value);
        }
        Ok(ValueBatch::new(batch, value))
    }

    /// Assembles the batches of several positions.
    pub fn get_many(&self, ixs: &[usize]) -> Result<Vec<ValueBatch>> {
        ixs.iter().map(|&ix| self.get(ix)).collect()
    }

    /// Bounds used to rescale returns, `None` if returns are not rescaled.
    pub fn bounds(&self) -> Option<ValueBounds> {
        self.bounds
    }

    /// Discount factor.
    pub fn discount(&self) -> f32 {
        self.config.discount
    }

    /// The underlying sequence dataset.
    pub fn base(&self) -> &SequenceDataset {
        &self.base
    }

    /// Returns the underlying sequence dataset.
    pub fn into_base(self) -> SequenceDataset {
        self.base
    }
}

impl WindowDataset for ValueDataset {
    type Item = ValueBatch;

    fn len(&self) -> usize {
        ValueDataset::len(self)
    }

    fn get(&self, ix: usize) -> Result<Self::Item> {
        ValueDataset::get(self, ix)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{EpisodeStore, NormalizerKind, SequenceDatasetConfig};
    use ndarray::{array, Array2, Array3};

    fn dataset(rewards: Array2<f32>, path_lengths: Vec<usize>, horizon: usize) -> SequenceDataset {
        let (n, t) = rewards.dim();
        let store = EpisodeStore::new(
            Array3::from_shape_fn((n, t, 2), |(e, t, _)| (e + t) as f32),
            Array3::zeros((n, t, 1)),
            rewards,
            None,
            path_lengths,
        )
        .unwrap();
        let config = SequenceDatasetConfig::default()
            .horizon(horizon)
            .normalizer(NormalizerKind::Identity);
        SequenceDataset::build(config, store).unwrap()
    }

    #[test]
    fn test_discounted_return() -> Result<()> {
        // Windows of episode 0 start at 0 and 1
        let base = dataset(array![[5.0f32, 1.0, 1.0, 1.0]], vec![4], 2);
        let dataset = ValueDataset::build(base, ValueConfig::default().discount(0.99))?;
        assert_eq!(dataset.len(), 2);
        let value = dataset.get(1)?.value;
        assert!((value - 2.9701).abs() < 1e-5);
        Ok(())
    }

    #[test]
    fn test_return_extends_past_window() -> Result<()> {
        let base = dataset(array![[0.0f32, 0.0, 0.0, 0.0, 8.0]], vec![5], 2);
        let dataset = ValueDataset::build(base, ValueConfig::default().discount(0.5))?;
        // Window [0, 2) still sees the reward at step 4
        assert_eq!(dataset.discounted_return(0)?, 0.5);
        Ok(())
    }

    #[test]
    fn test_normed_values() -> Result<()> {
        let base = dataset(array![[1.0f32, 2.0, 3.0, 4.0, 0.0]], vec![5], 2);
        let dataset =
            ValueDataset::build(base, ValueConfig::default().discount(1.0).normed(true))?;
        // Raw returns of starts 0, 1, 2 are 10, 9, 7
        assert_eq!(
            dataset.bounds(),
            Some(ValueBounds {
                vmin: 7.0,
                vmax: 10.0
            })
        );
        assert_eq!(dataset.get(0)?.value, 1.0);
        assert_eq!(dataset.get(2)?.value, -1.0);
        for ix in 0..dataset.len() {
            let value = dataset.get(ix)?.value;
            assert!(value >= -1.0 && value <= 1.0);
        }
        Ok(())
    }

    #[test]
    fn test_constant_returns_are_degenerate() {
        let base = dataset(Array2::zeros((2, 6)), vec![6, 6], 3);
        let err = ValueDataset::build(base, ValueConfig::default().normed(true)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SequenceError>(),
            Some(SequenceError::DegenerateValueBounds { .. })
        ));
    }

    #[test]
    fn test_empty_dataset_bounds() -> Result<()> {
        let base = dataset(Array2::ones((1, 6)), vec![2], 3);
        let dataset = ValueDataset::build(base, ValueConfig::default())?;
        assert!(dataset.is_empty());
        let bounds = dataset.compute_bounds()?;
        assert_eq!(bounds.vmin, f32::INFINITY);
        assert_eq!(bounds.vmax, f32::NEG_INFINITY);
        assert!(bounds.is_degenerate());
        Ok(())
    }

    #[test]
    fn test_empty_dataset_normed_is_degenerate() {
        let base = dataset(Array2::ones((2, 5)), vec![3, 5], 6);
        assert!(base.is_empty());
        let err = ValueDataset::build(base, ValueConfig::default().normed(true)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SequenceError>(),
            Some(SequenceError::DegenerateValueBounds { .. })
        ));
    }

    #[test]
    fn test_value_batch_keeps_base_fields() -> Result<()> {
        let base = dataset(array![[1.0f32, 2.0, 3.0, 4.0, 0.0]], vec![5], 2);
        let expected = base.get(1)?;
        let dataset = ValueDataset::build(base, ValueConfig::default())?;
        let batch = dataset.get(1)?;
        assert_eq!(batch.trajectories, expected.trajectories);
        assert_eq!(batch.conditions, expected.conditions);
        Ok(())
    }
}
