//! Selection of conditioning observations in a window.
use ndarray::{Array1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Observations exposed to the model as fixed context, keyed by the step
/// relative to the window start.
pub type Conditions = BTreeMap<usize, Array1<f32>>;

/// Which steps of a window become conditions.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
pub enum Conditioning {
    /// Conditions on the first observation of the window.
    Start,

    /// Conditions on the first and the last observation of the window.
    StartGoal,
}

impl Default for Conditioning {
    fn default() -> Self {
        Self::Start
    }
}

impl Conditioning {
    /// Computes the conditions of a window.
    ///
    /// `observations` is the `[horizon, observation_dim]` slice of the window.
    ///
    /// # Panics
    ///
    /// Panics if `observations` has no row, or if `horizon` is 0 with
    /// [`Conditioning::StartGoal`].
    pub fn conditions(&self, observations: ArrayView2<'_, f32>, horizon: usize) -> Conditions {
        let mut conditions = Conditions::new();
        conditions.insert(0, observations.index_axis(Axis(0), 0).to_owned());

        if let Self::StartGoal = self {
            let last = observations.nrows() - 1;
            conditions.insert(
                horizon - 1,
                observations.index_axis(Axis(0), last).to_owned(),
            );
        }

        conditions
    }
}
