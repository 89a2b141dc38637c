//! Random Forest Classifier
//!
//! An ensemble of decision trees trained on bootstrapped, feature-subsampled slices of the
//! binned data.
use linfa::error::{Error, Result};
use linfa::prelude::*;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix2};
use rand::{rngs::SmallRng, seq::index::sample, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::binning::FeatureBins;
use super::hyperparams::RandomForestValidParams;

/// A fitted random forest for classification
///
/// ### Structure
///
/// The forest holds the quantile bins of every input feature and a list of decision trees. Every
/// tree was fit on a subset of the features, kept as indices into the input columns, and splits
/// on bin indices instead of raw values.
///
/// ### Predictions
///
/// A sample is binned and handed to every tree, restricted to the features the tree was fit on.
/// The forest predicts the class most trees voted for, ties go to the smallest class.
#[derive(Debug, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    trees: Vec<DecisionTree<f64, usize>>,
    feature_indices: Vec<Vec<usize>>,
    bins: FeatureBins,
    num_classes: usize,
}

impl RandomForestClassifier {
    /// Number of trees in the forest
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Iterates over every tree and the input features it was fit on
    pub fn trees(&self) -> impl Iterator<Item = (&DecisionTree<f64, usize>, &[usize])> {
        self.trees
            .iter()
            .zip(self.feature_indices.iter().map(|x| x.as_slice()))
    }

    pub fn bins(&self) -> &FeatureBins {
        &self.bins
    }

    /// Counts the votes of every tree, one row per sample and one column per class
    pub fn votes<D: Data<Elem = f64>>(&self, x: &ArrayBase<D, Ix2>) -> Array2<usize> {
        let binned = self.bins.transform(x);
        let mut votes = Array2::zeros((x.nrows(), self.num_classes));

        for (tree, features) in self.trees() {
            let predictions: Array1<usize> = tree.predict(&binned.select(Axis(1), features));
            for (i, class) in predictions.iter().enumerate() {
                votes[(i, *class)] += 1;
            }
        }

        votes
    }
}

/// Draws `n` row indices with replacement
fn bootstrap(n: usize, rng: &mut impl Rng) -> Vec<usize> {
    (0..n).map(|_| rng.gen_range(0..n)).collect()
}

impl Fit<Array2<f64>, Array1<usize>, Error> for RandomForestValidParams {
    type Object = RandomForestClassifier;

    /// Fit a forest on the dataset consisting of a matrix of features `x` and an array of labels
    /// `y` in `0..num_classes`.
    ///
    /// Rows are only bootstrapped for forests of more than one tree, a single tree sees every row.
    fn fit(&self, dataset: &DatasetBase<Array2<f64>, Array1<usize>>) -> Result<Self::Object> {
        let n_samples = dataset.nsamples();
        if n_samples == 0 {
            return Err(Error::NotEnoughSamples);
        }
        if let Some(label) = dataset
            .targets
            .iter()
            .find(|label| **label >= self.num_classes())
        {
            return Err(Error::Parameters(format!(
                "Label {} is out of range for {} classes",
                label,
                self.num_classes()
            )));
        }

        let n_features = dataset.records.ncols();
        let bins = FeatureBins::fit(&dataset.records, self.max_bins());
        let binned = bins.transform(&dataset.records);
        let n_sub = self
            .feature_subset()
            .subset_size(n_features, self.num_trees());

        let tree_params = DecisionTree::<f64, usize>::params()
            .split_quality(self.split_quality())
            .max_depth(Some(self.max_depth()))
            .check()?;

        let mut rng = SmallRng::seed_from_u64(self.seed());
        let mut trees = Vec::with_capacity(self.num_trees());
        let mut feature_indices = Vec::with_capacity(self.num_trees());

        for i in 0..self.num_trees() {
            let rows = if self.num_trees() > 1 {
                bootstrap(n_samples, &mut rng)
            } else {
                (0..n_samples).collect()
            };

            let mut features = sample(&mut rng, n_features, n_sub).into_vec();
            features.sort_unstable();

            let records = binned.select(Axis(0), &rows).select(Axis(1), &features);
            let targets = dataset.targets.select(Axis(0), &rows);
            let tree = tree_params.fit(&Dataset::new(records, targets))?;

            debug!(
                tree = i,
                features = ?features,
                depth = tree.max_depth(),
                leaves = tree.num_leaves(),
                "fitted tree"
            );

            trees.push(tree);
            feature_indices.push(features);
        }

        Ok(RandomForestClassifier {
            trees,
            feature_indices,
            bins,
            num_classes: self.num_classes(),
        })
    }
}

impl<D: Data<Elem = f64>> PredictInplace<ArrayBase<D, Ix2>, Array1<usize>>
    for RandomForestClassifier
{
    /// Make predictions for each row of a matrix of features `x`.
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<usize>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );
        assert_eq!(
            x.ncols(),
            self.bins.num_features(),
            "The number of features must match the features the forest was fit on."
        );

        let votes = self.votes(x);
        for (row, target) in votes.rows().into_iter().zip(y.iter_mut()) {
            // first maximum, so ties resolve to the smallest class
            let mut best = 0;
            for (class, count) in row.iter().enumerate() {
                if *count > row[best] {
                    best = class;
                }
            }
            *target = best;
        }
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<usize> {
        Array1::zeros(x.nrows())
    }
}
