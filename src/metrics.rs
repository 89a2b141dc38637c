//! Evaluation of fitted classifiers
//!
use std::fmt;

use ndarray::{ArrayBase, Data, Ix1};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mismatches between true and predicted labels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCounts {
    pub mismatches: usize,
    pub total: usize,
}

impl ErrorCounts {
    /// Fraction of mispredicted examples, in `[0, 1]`
    pub fn ratio(&self) -> f64 {
        self.mismatches as f64 / self.total as f64
    }
}

/// Pairs every true label with the prediction at the same position and counts the mismatches
///
/// ```rust
/// use flightforest::metrics::training_error;
/// use ndarray::array;
///
/// let counts = training_error(&array![0, 1, 1, 0], &array![0, 1, 0, 0]).unwrap();
/// assert_eq!(counts.ratio(), 0.25);
/// ```
pub fn training_error<S, T>(
    targets: &ArrayBase<S, Ix1>,
    predictions: &ArrayBase<T, Ix1>,
) -> Result<ErrorCounts>
where
    S: Data<Elem = usize>,
    T: Data<Elem = usize>,
{
    if targets.len() != predictions.len() {
        return Err(Error::LengthMismatch {
            targets: targets.len(),
            predictions: predictions.len(),
        });
    }
    if targets.is_empty() {
        return Err(Error::EmptyDataset);
    }

    let mismatches = targets
        .iter()
        .zip(predictions.iter())
        .filter(|(label, prediction)| label != prediction)
        .count();

    Ok(ErrorCounts {
        mismatches,
        total: targets.len(),
    })
}

/// Which examples a model was evaluated on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationScope {
    /// The examples the model was trained on, measures fit instead of generalization
    TrainingSet,
    /// Examples not used for training
    HeldOut,
}

/// Result of evaluating a fitted model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub scope: EvaluationScope,
    pub counts: ErrorCounts,
    pub accuracy: f32,
    pub description: String,
}

impl Evaluation {
    pub fn error(&self) -> f64 {
        self.counts.ratio()
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            EvaluationScope::TrainingSet => write!(f, "Train Error = {}", self.error()),
            EvaluationScope::HeldOut => write!(f, "Test Error = {}", self.error()),
        }
    }
}
