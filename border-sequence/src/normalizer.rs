//! Normalization of continuous fields.
//!
//! Statistics are fitted once on the valid steps of all episodes
//! ([`DatasetNormalizer::fit`]) and then applied to whole fields, padding
//! included ([`normalize_fields`]). The fitted normalizer is never mutated
//! after fitting, so applying it twice gives identical arrays.
mod gaussian;
mod limits;
use crate::{error::SequenceError, EpisodeStore};
use anyhow::Result;
use ndarray::{concatenate, Array2, Array3, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
pub use gaussian::GaussianNormalizer;
pub use limits::LimitsNormalizer;

/// Normalization strategy for a single field.
///
/// Inputs and outputs are `[n_samples, dim]` arrays.
pub trait Normalizer: Debug + Send + Sync {
    /// Feature dimension the normalizer was fitted on.
    fn dim(&self) -> usize;

    /// Maps raw values into the normalized space.
    fn normalize(&self, x: ArrayView2<f32>) -> Array2<f32>;

    /// Maps normalized values back to the raw space.
    fn unnormalize(&self, x: ArrayView2<f32>) -> Array2<f32>;
}

/// Passes values through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityNormalizer {
    dim: usize,
}

impl Normalizer for IdentityNormalizer {
    fn dim(&self) -> usize {
        self.dim
    }

    fn normalize(&self, x: ArrayView2<f32>) -> Array2<f32> {
        x.to_owned()
    }

    fn unnormalize(&self, x: ArrayView2<f32>) -> Array2<f32> {
        x.to_owned()
    }
}

/// Selects the normalization strategy.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
pub enum NormalizerKind {
    /// [`LimitsNormalizer`].
    Limits,

    /// [`GaussianNormalizer`].
    Gaussian,

    /// [`IdentityNormalizer`].
    Identity,
}

impl Default for NormalizerKind {
    fn default() -> Self {
        Self::Limits
    }
}

impl NormalizerKind {
    fn fit(&self, x: ArrayView2<f32>) -> Box<dyn Normalizer> {
        match self {
            Self::Limits => Box::new(LimitsNormalizer::fit(x)),
            Self::Gaussian => Box::new(GaussianNormalizer::fit(x)),
            Self::Identity => Box::new(IdentityNormalizer { dim: x.ncols() }),
        }
    }
}

/// Fields of an [`EpisodeStore`] that are normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Observations.
    Observations,

    /// Actions.
    Actions,
}

impl Field {
    fn raw<'a>(&self, store: &'a EpisodeStore) -> &'a Array3<f32> {
        match self {
            Self::Observations => store.observations(),
            Self::Actions => store.actions(),
        }
    }
}

/// One fitted normalizer per field.
#[derive(Debug)]
pub struct DatasetNormalizer {
    kind: NormalizerKind,
    observations: Box<dyn Normalizer>,
    actions: Box<dyn Normalizer>,
}

impl DatasetNormalizer {
    /// Fits normalizers on the valid steps of all episodes in the store.
    ///
    /// Fails if the store has no valid step at all.
    pub fn fit(store: &EpisodeStore, kind: NormalizerKind) -> Result<Self> {
        let n_steps: usize = store.path_lengths().iter().sum();
        if n_steps == 0 {
            return Err(SequenceError::InvalidConfig(
                "no valid step to fit normalizers on".to_string(),
            )
            .into());
        }

        let observations = kind.fit(flatten(store, Field::Observations)?.view());
        let actions = kind.fit(flatten(store, Field::Actions)?.view());
        log::info!(
            "Fitted {:?} normalizers on {} valid steps of {} episodes",
            kind,
            n_steps,
            store.n_episodes()
        );

        Ok(Self {
            kind,
            observations,
            actions,
        })
    }

    /// Strategy used by this normalizer.
    pub fn kind(&self) -> NormalizerKind {
        self.kind
    }

    /// Normalizer of a field.
    pub fn get(&self, field: Field) -> &dyn Normalizer {
        match field {
            Field::Observations => self.observations.as_ref(),
            Field::Actions => self.actions.as_ref(),
        }
    }

    /// Normalizes `[n_samples, dim]` values of a field.
    pub fn transform(&self, x: ArrayView2<f32>, field: Field) -> Result<Array2<f32>> {
        let normalizer = self.get(field);
        check_dim(normalizer, &x, field)?;
        Ok(normalizer.normalize(x))
    }

    /// Maps normalized `[n_samples, dim]` values of a field back to the raw space.
    pub fn inverse_transform(&self, x: ArrayView2<f32>, field: Field) -> Result<Array2<f32>> {
        let normalizer = self.get(field);
        check_dim(normalizer, &x, field)?;
        Ok(normalizer.unnormalize(x))
    }
}

fn check_dim(normalizer: &dyn Normalizer, x: &ArrayView2<f32>, field: Field) -> Result<()> {
    if x.ncols() != normalizer.dim() {
        return Err(SequenceError::ShapeMismatch(format!(
            "{:?} normalizer expects dim {}, got {}",
            field,
            normalizer.dim(),
            x.ncols()
        ))
        .into());
    }
    Ok(())
}

/// Concatenates the valid steps of all episodes into `[n_valid_steps, dim]`.
fn flatten(store: &EpisodeStore, field: Field) -> Result<Array2<f32>> {
    let raw = field.raw(store);
    let views = (0..store.n_episodes())
        .map(|e| store.valid_steps(raw, e))
        .collect::<Vec<_>>();
    Ok(concatenate(Axis(0), &views)?)
}

/// Normalized observations and actions, same shapes as the raw fields.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFields {
    /// Normalized observations.
    pub observations: Array3<f32>,

    /// Normalized actions.
    pub actions: Array3<f32>,
}

/// Normalizes observations and actions of all episodes, padding included.
///
/// Each field is flattened to `[n_episodes * max_path_length, dim]`,
/// transformed and reshaped back.
pub fn normalize_fields(
    store: &EpisodeStore,
    normalizer: &DatasetNormalizer,
) -> Result<NormalizedFields> {
    Ok(NormalizedFields {
        observations: normalize_field(store, normalizer, Field::Observations)?,
        actions: normalize_field(store, normalizer, Field::Actions)?,
    })
}

fn normalize_field(
    store: &EpisodeStore,
    normalizer: &DatasetNormalizer,
    field: Field,
) -> Result<Array3<f32>> {
    let raw = field.raw(store);
    let (n_episodes, max_path_length, dim) = raw.dim();
    let raw = raw.as_standard_layout();
    let flat = raw
        .view()
        .into_shape((n_episodes * max_path_length, dim))?;
    let mut normed = normalizer.transform(flat, field)?;
    if !normed.is_standard_layout() {
        normed = normed.as_standard_layout().into_owned();
    }
    Ok(normed.into_shape((n_episodes, max_path_length, dim))?)
}
