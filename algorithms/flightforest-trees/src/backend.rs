use flightforest::{
    Error, Impurity, ParamGuard, Result, Session, TrainedModel, TrainingBackend,
    TrainingValidParams,
};
use linfa::prelude::*;
use linfa_trees::SplitQuality;
use ndarray::{Array1, Array2, Ix1};
use tracing::info;

use crate::random_forest::{RandomForestClassifier, RandomForestParams};

/// Trains [`RandomForestClassifier`]s inside a `flightforest` pipeline
#[derive(Clone, Copy, Debug, Default)]
pub struct ForestBackend;

impl ForestBackend {
    /// Translates the hyperparameters of a run into forest parameters
    pub fn forest_params(params: &TrainingValidParams) -> RandomForestParams {
        let split_quality = match params.impurity() {
            Impurity::Gini => SplitQuality::Gini,
            Impurity::Entropy => SplitQuality::Entropy,
        };

        RandomForestParams::new(params.num_trees())
            .num_classes(params.num_classes())
            .max_depth(params.max_depth())
            .max_bins(params.max_bins())
            .split_quality(split_quality)
            .feature_subset(params.feature_subset_strategy())
            .seed(params.seed())
    }
}

impl TrainingBackend for ForestBackend {
    type Model = RandomForestClassifier;

    fn train(
        &self,
        session: &Session,
        dataset: &Dataset<f64, usize, Ix1>,
        params: &TrainingValidParams,
    ) -> Result<RandomForestClassifier> {
        let forest = Self::forest_params(params).check()?;
        let model = forest
            .fit(dataset)
            .map_err(|err: linfa::error::Error| Error::Training(err.to_string()))?;

        info!(
            session = session.id(),
            trees = model.num_trees(),
            classes = model.num_classes(),
            "fitted random forest"
        );
        Ok(model)
    }
}

impl TrainedModel for RandomForestClassifier {
    const KIND: &'static str = "random_forest_classifier";

    fn predict_batch(&self, records: &Array2<f64>) -> Array1<usize> {
        self.predict(records)
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightforest::{FeatureSubsetStrategy, TrainingParams};

    #[test]
    fn forwards_every_hyperparameter() {
        let params = TrainingParams::new()
            .num_trees(7)
            .max_depth(6)
            .max_bins(16)
            .impurity(Impurity::Entropy)
            .feature_subset_strategy(FeatureSubsetStrategy::Log2)
            .seed(3)
            .check()
            .unwrap();

        let forest = ForestBackend::forest_params(&params).check().unwrap();
        assert_eq!(forest.num_trees(), 7);
        assert_eq!(forest.num_classes(), 2);
        assert_eq!(forest.max_depth(), 6);
        assert_eq!(forest.max_bins(), 16);
        assert!(matches!(forest.split_quality(), SplitQuality::Entropy));
        assert_eq!(forest.feature_subset(), FeatureSubsetStrategy::Log2);
        assert_eq!(forest.seed(), 3);
    }

    #[test]
    fn out_of_range_label_is_a_training_error() {
        let session = Session::builder("test").start();
        let params = TrainingParams::new().check().unwrap();
        let dataset = Dataset::new(Array2::zeros((2, 1)), ndarray::array![0usize, 7]);

        let result = ForestBackend.train(&session, &dataset, &params);
        assert!(matches!(result, Err(Error::Training(_))));
    }
}
