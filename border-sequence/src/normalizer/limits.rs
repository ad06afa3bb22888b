use super::Normalizer;
use ndarray::{Array1, Array2, ArrayView2, Axis};

/// Maps each dimension from its `[min, max]` range in the data to `[-1, 1]`.
///
/// Dimensions with a zero range use a unit denominator, so constant
/// dimensions map to `-1`.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitsNormalizer {
    mins: Array1<f32>,
    maxs: Array1<f32>,
}

impl LimitsNormalizer {
    /// Fits the normalizer on `[n_samples, dim]` data.
    pub fn fit(x: ArrayView2<f32>) -> Self {
        let mins = x.fold_axis(Axis(0), f32::INFINITY, |a, &b| a.min(b));
        let maxs = x.fold_axis(Axis(0), f32::NEG_INFINITY, |a, &b| a.max(b));
        Self { mins, maxs }
    }

    /// Per-dimension minimum.
    pub fn mins(&self) -> &Array1<f32> {
        &self.mins
    }

    /// Per-dimension maximum.
    pub fn maxs(&self) -> &Array1<f32> {
        &self.maxs
    }

    fn range(&self) -> Array1<f32> {
        (&self.maxs - &self.mins).mapv(|r| if r == 0.0 { 1.0 } else { r })
    }
}

impl Normalizer for LimitsNormalizer {
    fn dim(&self) -> usize {
        self.mins.len()
    }

    fn normalize(&self, x: ArrayView2<f32>) -> Array2<f32> {
        // [0, 1]
        let x = (&x - &self.mins) / &self.range();
        // [-1, 1]
        x * 2.0 - 1.0
    }

    fn unnormalize(&self, x: ArrayView2<f32>) -> Array2<f32> {
        let (lo, hi) = x
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if lo < -1.0 - 1e-4 || hi > 1.0 + 1e-4 {
            log::warn!("Values in [{}, {}] are clipped to [-1, 1] before unnormalizing", lo, hi);
        }
        let x = x.mapv(|v| v.max(-1.0).min(1.0));
        (x + 1.0) / 2.0 * &self.range() + &self.mins
    }
}
