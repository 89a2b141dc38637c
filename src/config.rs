//! Run configuration
//!
//! Every option has a default, a JSON file may override any subset of them:
//!
//! ```json
//! {
//!     "input_path": "output/a6history/AA-r-00000",
//!     "output_path": "myModelPath",
//!     "num_trees": 3,
//!     "max_depth": 4,
//!     "max_bins": 32
//! }
//! ```
use std::fs;
use std::path::{Path, PathBuf};

use linfa::ParamGuard;
use serde::{Deserialize, Serialize};

use crate::dataset::{read_examples, IdentifierEncoding};
use crate::error::{Error, Result};
use crate::hyperparams::{FeatureSubsetStrategy, Impurity, TrainingParams, TrainingValidParams};
use crate::persistence::{ModelStore, OverwritePolicy};
use crate::pipeline::EvaluationStrategy;

/// All options of a training run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub num_trees: usize,
    pub max_depth: usize,
    pub max_bins: usize,
    pub seed: u64,
    pub impurity: Impurity,
    pub feature_subset_strategy: FeatureSubsetStrategy,
    pub identifier_encoding: IdentifierEncoding,
    /// Evaluate on the examples of this file instead of the training examples
    pub eval_path: Option<PathBuf>,
    /// Hold out this fraction of the input for evaluation
    pub holdout_ratio: Option<f64>,
    pub overwrite: OverwritePolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        let params = TrainingParams::default().check_unwrap();

        RunConfig {
            input_path: PathBuf::from("output/a6history/AA-r-00000"),
            output_path: PathBuf::from("myModelPath"),
            num_trees: params.num_trees(),
            max_depth: params.max_depth(),
            max_bins: params.max_bins(),
            seed: params.seed(),
            impurity: params.impurity(),
            feature_subset_strategy: params.feature_subset_strategy(),
            identifier_encoding: IdentifierEncoding::default(),
            eval_path: None,
            holdout_ratio: None,
            overwrite: OverwritePolicy::default(),
        }
    }
}

impl RunConfig {
    /// Reads a configuration from a JSON file, missing options keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|err| Error::Config {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|err| Error::Config {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }

    /// Checked hyperparameters of the run
    pub fn training_params(&self) -> Result<TrainingValidParams> {
        TrainingParams::new()
            .num_trees(self.num_trees)
            .max_depth(self.max_depth)
            .max_bins(self.max_bins)
            .seed(self.seed)
            .impurity(self.impurity)
            .feature_subset_strategy(self.feature_subset_strategy)
            .check()
    }

    /// Examples the model is evaluated on, loads the evaluation file if one is configured
    pub fn evaluation_strategy(&self) -> Result<EvaluationStrategy> {
        match (&self.eval_path, self.holdout_ratio) {
            (Some(_), Some(_)) => Err(Error::Parameters(
                "an evaluation file and a holdout ratio cannot be combined".to_string(),
            )),
            (Some(path), None) => Ok(EvaluationStrategy::HeldOut(read_examples(path)?)),
            (None, Some(ratio)) => Ok(EvaluationStrategy::Split {
                ratio,
                seed: self.seed,
            }),
            (None, None) => Ok(EvaluationStrategy::TrainingSet),
        }
    }

    /// Destination of the fitted model
    pub fn model_store(&self) -> ModelStore {
        ModelStore::new(&self.output_path).overwrite(self.overwrite)
    }
}
