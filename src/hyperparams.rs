//! Hyperparameters of a training run
//!
//! [`TrainingParams`] is checked into [`TrainingValidParams`] through `linfa`'s `ParamGuard`
//! before any data is touched.
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use linfa::ParamGuard;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Deepest tree the training backend accepts
pub const MAX_TREE_DEPTH: usize = 30;

/// The impurity criterion used to score candidate splits
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impurity {
    /// Probability of misclassifying a randomly drawn sample of the node
    Gini,
    /// Information entropy of the labels in the node
    Entropy,
}

impl FromStr for Impurity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gini" => Ok(Impurity::Gini),
            "entropy" => Ok(Impurity::Entropy),
            other => Err(Error::Parameters(format!(
                "unknown impurity {:?}, expected gini or entropy",
                other
            ))),
        }
    }
}

impl fmt::Display for Impurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Impurity::Gini => write!(f, "gini"),
            Impurity::Entropy => write!(f, "entropy"),
        }
    }
}

/// Number of features every tree of the ensemble is allowed to look at
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureSubsetStrategy {
    /// `all` for a single tree, `sqrt` for a forest
    Auto,
    All,
    Sqrt,
    Log2,
    OneThird,
}

impl FeatureSubsetStrategy {
    /// Returns the size of the feature subset for `n_features` features and `num_trees` trees
    pub fn subset_size(&self, n_features: usize, num_trees: usize) -> usize {
        if n_features == 0 {
            return 0;
        }

        let n = n_features as f64;
        let size = match self {
            FeatureSubsetStrategy::Auto if num_trees == 1 => n_features,
            FeatureSubsetStrategy::All => n_features,
            FeatureSubsetStrategy::Auto | FeatureSubsetStrategy::Sqrt => n.sqrt().ceil() as usize,
            FeatureSubsetStrategy::Log2 => n.log2().ceil().max(1.0) as usize,
            FeatureSubsetStrategy::OneThird => (n / 3.0).ceil() as usize,
        };

        size.max(1).min(n_features)
    }
}

impl FromStr for FeatureSubsetStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(FeatureSubsetStrategy::Auto),
            "all" => Ok(FeatureSubsetStrategy::All),
            "sqrt" => Ok(FeatureSubsetStrategy::Sqrt),
            "log2" => Ok(FeatureSubsetStrategy::Log2),
            "onethird" => Ok(FeatureSubsetStrategy::OneThird),
            other => Err(Error::Parameters(format!(
                "unknown feature subset strategy {:?}, expected one of auto, all, sqrt, log2, onethird",
                other
            ))),
        }
    }
}

impl fmt::Display for FeatureSubsetStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeatureSubsetStrategy::Auto => "auto",
            FeatureSubsetStrategy::All => "all",
            FeatureSubsetStrategy::Sqrt => "sqrt",
            FeatureSubsetStrategy::Log2 => "log2",
            FeatureSubsetStrategy::OneThird => "onethird",
        };
        write!(f, "{}", name)
    }
}

/// The checked set of hyperparameters for training a forest classifier
///
/// ### Example
///
/// ```rust
/// use flightforest::{ParamGuard, TrainingParams, Impurity};
///
/// let params = TrainingParams::new()
///     .num_trees(10)
///     .impurity(Impurity::Entropy)
///     .check()
///     .unwrap();
///
/// assert_eq!(params.num_trees(), 10);
/// assert_eq!(params.max_depth(), 4);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingValidParams {
    num_classes: usize,
    categorical_features_info: BTreeMap<usize, usize>,
    num_trees: usize,
    feature_subset_strategy: FeatureSubsetStrategy,
    impurity: Impurity,
    max_depth: usize,
    max_bins: usize,
    seed: u64,
}

impl TrainingValidParams {
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn categorical_features_info(&self) -> &BTreeMap<usize, usize> {
        &self.categorical_features_info
    }

    pub fn num_trees(&self) -> usize {
        self.num_trees
    }

    pub fn feature_subset_strategy(&self) -> FeatureSubsetStrategy {
        self.feature_subset_strategy
    }

    pub fn impurity(&self) -> Impurity {
        self.impurity
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn max_bins(&self) -> usize {
        self.max_bins
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrainingParams(TrainingValidParams);

impl TrainingParams {
    /// Defaults mirror the flight delay job:
    /// * `num_classes = 2`
    /// * `categorical_features_info = {}`
    /// * `num_trees = 3`
    /// * `feature_subset_strategy = Auto`
    /// * `impurity = Gini`
    /// * `max_depth = 4`
    /// * `max_bins = 32`
    /// * `seed = 42`
    pub fn new() -> Self {
        Self(TrainingValidParams {
            num_classes: 2,
            categorical_features_info: BTreeMap::new(),
            num_trees: 3,
            feature_subset_strategy: FeatureSubsetStrategy::Auto,
            impurity: Impurity::Gini,
            max_depth: 4,
            max_bins: 32,
            seed: 42,
        })
    }

    /// Sets the number of distinct class labels, labels have to lie in `0..num_classes`
    pub fn num_classes(mut self, num_classes: usize) -> Self {
        self.0.num_classes = num_classes;
        self
    }

    /// Declares categorical features as `feature index -> arity`
    pub fn categorical_features_info(mut self, info: BTreeMap<usize, usize>) -> Self {
        self.0.categorical_features_info = info;
        self
    }

    /// Sets the number of trees in the ensemble
    pub fn num_trees(mut self, num_trees: usize) -> Self {
        self.0.num_trees = num_trees;
        self
    }

    pub fn feature_subset_strategy(mut self, strategy: FeatureSubsetStrategy) -> Self {
        self.0.feature_subset_strategy = strategy;
        self
    }

    pub fn impurity(mut self, impurity: Impurity) -> Self {
        self.0.impurity = impurity;
        self
    }

    /// Sets the maximal depth of every tree, a depth of zero yields single leaf trees
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.0.max_depth = max_depth;
        self
    }

    /// Sets the maximal number of bins continuous features are discretized into
    pub fn max_bins(mut self, max_bins: usize) -> Self {
        self.0.max_bins = max_bins;
        self
    }

    /// Sets the seed for bootstrapping and feature sampling
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamGuard for TrainingParams {
    type Checked = TrainingValidParams;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.num_classes < 2 {
            Err(Error::Parameters(format!(
                "number of classes should be at least 2, but was {}",
                self.0.num_classes
            )))
        } else if self.0.num_trees == 0 {
            Err(Error::Parameters(
                "number of trees should be at least 1, but was 0".to_string(),
            ))
        } else if self.0.max_depth > MAX_TREE_DEPTH {
            Err(Error::Parameters(format!(
                "maximal depth should be at most {}, but was {}",
                MAX_TREE_DEPTH, self.0.max_depth
            )))
        } else if self.0.max_bins < 2 {
            Err(Error::Parameters(format!(
                "maximal number of bins should be at least 2, but was {}",
                self.0.max_bins
            )))
        } else if !self.0.categorical_features_info.is_empty() {
            Err(Error::Parameters(format!(
                "categorical features are not supported, got {:?}",
                self.0.categorical_features_info
            )))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_flight_job() {
        let params = TrainingParams::default().check().unwrap();

        assert_eq!(params.num_classes(), 2);
        assert!(params.categorical_features_info().is_empty());
        assert_eq!(params.num_trees(), 3);
        assert_eq!(params.feature_subset_strategy(), FeatureSubsetStrategy::Auto);
        assert_eq!(params.impurity(), Impurity::Gini);
        assert_eq!(params.max_depth(), 4);
        assert_eq!(params.max_bins(), 32);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(TrainingParams::new().num_classes(1).check().is_err());
        assert!(TrainingParams::new().num_trees(0).check().is_err());
        assert!(TrainingParams::new().max_depth(31).check().is_err());
        assert!(TrainingParams::new().max_bins(1).check().is_err());

        let mut info = BTreeMap::new();
        info.insert(0, 4);
        assert!(TrainingParams::new()
            .categorical_features_info(info)
            .check()
            .is_err());
    }

    #[test]
    fn subset_sizes() {
        use FeatureSubsetStrategy::*;

        assert_eq!(Auto.subset_size(11, 1), 11);
        assert_eq!(Auto.subset_size(11, 3), 4);
        assert_eq!(All.subset_size(11, 3), 11);
        assert_eq!(Sqrt.subset_size(16, 3), 4);
        assert_eq!(Log2.subset_size(11, 3), 4);
        assert_eq!(Log2.subset_size(1, 3), 1);
        assert_eq!(OneThird.subset_size(11, 3), 4);
        assert_eq!(Sqrt.subset_size(0, 3), 0);
    }

    #[test]
    fn parses_names() {
        assert_eq!("GINI".parse::<Impurity>().unwrap(), Impurity::Gini);
        assert_eq!(
            "onethird".parse::<FeatureSubsetStrategy>().unwrap(),
            FeatureSubsetStrategy::OneThird
        );
        assert!("variance".parse::<Impurity>().is_err());
    }
}
