//!
//! # Random forest training backend
//! `flightforest-trees` fits random forest classifiers for `flightforest`.
//!
//! # The big picture
//!
//! Every tree of the ensemble is a [`linfa_trees::DecisionTree`]. This crate only composes the
//! trees into a forest: continuous features are discretized into quantile bins, every tree is
//! fit on a bootstrap sample of the rows restricted to a random subset of the features, and the
//! forest predicts by majority vote.
//!
//! The [`ForestBackend`] plugs the forest into the training pipeline of `flightforest`, the fitted
//! [`RandomForestClassifier`] can be stored and loaded again through `flightforest`'s
//! `ModelStore`.
//!
//! # Example
//!
//! ```rust
//! use flightforest_trees::RandomForestParams;
//! use linfa::prelude::*;
//! use ndarray::{array, Array1, Array2};
//!
//! let records: Array2<f64> = array![[1., 0.], [2., 1.], [3., 0.], [10., 1.], [11., 0.], [12., 1.]];
//! let targets: Array1<usize> = array![0, 0, 0, 1, 1, 1];
//! let dataset = Dataset::new(records, targets);
//!
//! let model = RandomForestParams::new(1).max_depth(2).fit(&dataset).unwrap();
//! assert_eq!(model.predict(&dataset.records), dataset.targets);
//! ```
//!

mod backend;
mod random_forest;

pub use backend::ForestBackend;
pub use random_forest::*;
