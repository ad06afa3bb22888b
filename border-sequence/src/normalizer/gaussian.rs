use super::Normalizer;
use ndarray::{Array1, Array2, ArrayView2, Axis};

/// Standardizes each dimension to zero mean and unit variance.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianNormalizer {
    means: Array1<f32>,
    stds: Array1<f32>,
}

impl GaussianNormalizer {
    /// Fits the normalizer on `[n_samples, dim]` data with at least one row.
    pub fn fit(x: ArrayView2<f32>) -> Self {
        let means = x
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(x.ncols()));
        // Zero deviation would blow up, keep such dimensions unscaled
        let stds = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s == 0.0 { 1.0 } else { s });
        Self { means, stds }
    }

    /// Per-dimension mean.
    pub fn means(&self) -> &Array1<f32> {
        &self.means
    }

    /// Per-dimension standard deviation.
    pub fn stds(&self) -> &Array1<f32> {
        &self.stds
    }
}

impl Normalizer for GaussianNormalizer {
    fn dim(&self) -> usize {
        self.means.len()
    }

    fn normalize(&self, x: ArrayView2<f32>) -> Array2<f32> {
        (&x - &self.means) / &self.stds
    }

    fn unnormalize(&self, x: ArrayView2<f32>) -> Array2<f32> {
        &x * &self.stds + &self.means
    }
}
