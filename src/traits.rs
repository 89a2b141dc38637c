//! Seams between the pipeline and the training capability
//!
use linfa::Dataset;
use ndarray::{Array1, Array2, Ix1};

use crate::error::Result;
use crate::hyperparams::TrainingValidParams;
use crate::session::Session;

/// A fitted classifier as handed out by a [`TrainingBackend`]
pub trait TrainedModel {
    /// Tag stored next to a persisted model, checked again when the model is loaded
    const KIND: &'static str;

    /// Predicts one class label for every row of `records`, in row order
    fn predict_batch(&self, records: &Array2<f64>) -> Array1<usize>;

    /// Human readable description of the fitted structure
    fn describe(&self) -> String;
}

/// Fits a classifier on an encoded dataset
///
/// The backend owns everything related to how the model is learned; the pipeline only hands over
/// the dataset and the checked hyperparameters of a run.
pub trait TrainingBackend {
    type Model: TrainedModel;

    fn train(
        &self,
        session: &Session,
        dataset: &Dataset<f64, usize, Ix1>,
        params: &TrainingValidParams,
    ) -> Result<Self::Model>;
}
