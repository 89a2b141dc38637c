use flightforest::FeatureSubsetStrategy;
use linfa::{
    error::{Error, Result},
    ParamGuard,
};
use linfa_trees::SplitQuality;

use super::algorithm::RandomForestClassifier;

/// The set of hyperparameters that can be specified for fitting a
/// [random forest](struct.RandomForestClassifier.html).
///
/// ### Example
///
/// ```rust
/// use flightforest_trees::RandomForestParams;
/// use linfa_trees::SplitQuality;
/// use linfa::ParamGuard;
///
/// let params = RandomForestParams::new(10)
///     .split_quality(SplitQuality::Entropy)
///     .max_depth(5)
///     .check()
///     .unwrap();
///
/// assert_eq!(params.num_trees(), 10);
/// assert_eq!(params.max_bins(), 32);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct RandomForestValidParams {
    num_trees: usize,
    num_classes: usize,
    max_depth: usize,
    max_bins: usize,
    split_quality: SplitQuality,
    feature_subset: FeatureSubsetStrategy,
    seed: u64,
}

impl RandomForestValidParams {
    pub fn num_trees(&self) -> usize {
        self.num_trees
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn max_bins(&self) -> usize {
        self.max_bins
    }

    pub fn split_quality(&self) -> SplitQuality {
        self.split_quality
    }

    pub fn feature_subset(&self) -> FeatureSubsetStrategy {
        self.feature_subset
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RandomForestParams(RandomForestValidParams);

impl RandomForestParams {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `num_classes = 2`
    /// * `max_depth = 4`
    /// * `max_bins = 32`
    /// * `split_quality = SplitQuality::Gini`
    /// * `feature_subset = FeatureSubsetStrategy::Auto`
    /// * `seed = 42`
    pub fn new(num_trees: usize) -> Self {
        Self(RandomForestValidParams {
            num_trees,
            num_classes: 2,
            max_depth: 4,
            max_bins: 32,
            split_quality: SplitQuality::Gini,
            feature_subset: FeatureSubsetStrategy::Auto,
            seed: 42,
        })
    }

    /// Sets the number of classes, every target has to lie in `0..num_classes`
    pub fn num_classes(mut self, num_classes: usize) -> Self {
        self.0.num_classes = num_classes;
        self
    }

    /// Sets the depth at which every tree stops splitting
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.0.max_depth = max_depth;
        self
    }

    /// Sets the maximal number of bins per feature
    pub fn max_bins(mut self, max_bins: usize) -> Self {
        self.0.max_bins = max_bins;
        self
    }

    pub fn split_quality(mut self, split_quality: SplitQuality) -> Self {
        self.0.split_quality = split_quality;
        self
    }

    /// Sets how many features every tree may split on
    pub fn feature_subset(mut self, feature_subset: FeatureSubsetStrategy) -> Self {
        self.0.feature_subset = feature_subset;
        self
    }

    /// Sets the seed of bootstrapping and feature sampling
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }
}

impl RandomForestClassifier {
    /// Defaults to a forest of three trees, see [`RandomForestParams::new`]
    pub fn params() -> RandomForestParams {
        RandomForestParams::new(3)
    }
}

impl ParamGuard for RandomForestParams {
    type Checked = RandomForestValidParams;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.num_trees == 0 {
            Err(Error::Parameters(
                "Number of trees should be at least 1, but was 0".to_string(),
            ))
        } else if self.0.num_classes < 2 {
            Err(Error::Parameters(format!(
                "Number of classes should be at least 2, but was {}",
                self.0.num_classes
            )))
        } else if self.0.max_bins < 2 {
            Err(Error::Parameters(format!(
                "Maximal number of bins should be at least 2, but was {}",
                self.0.max_bins
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
