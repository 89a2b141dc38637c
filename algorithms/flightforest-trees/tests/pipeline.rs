use std::fs;
use std::io::Cursor;

use approx::assert_abs_diff_eq;
use flightforest::dataset::read_examples_from;
use flightforest::metrics::EvaluationScope;
use flightforest::persistence::{ModelStore, SUMMARY_FILE};
use flightforest::pipeline::{EvaluationStrategy, TrainingPipeline};
use flightforest::{ParamGuard, Session, TrainedModel, TrainingParams};
use flightforest_datasets::generate::flight_history;
use flightforest_trees::{ForestBackend, RandomForestClassifier};
use rand::{rngs::SmallRng, SeedableRng};

fn history(n: usize, noise: f64, seed: u64) -> Vec<flightforest::record::LabeledExample> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let content = flight_history(n, noise, &mut rng).join("\n");

    read_examples_from(Cursor::new(content)).unwrap()
}

#[test]
fn hundred_records_end_to_end() {
    let session = Session::builder("RandomForest").start();
    let examples = history(100, 0.05, 42);
    let params = TrainingParams::new().check().unwrap();

    let output = TrainingPipeline::new(&session, ForestBackend, params)
        .run(examples.clone())
        .unwrap();

    // recount the mismatches from independent predictions
    let dataset = output.encoder.encode(&examples).unwrap();
    let predictions = output.model.predict_batch(&dataset.records);
    let mismatches = predictions
        .iter()
        .zip(examples.iter())
        .filter(|(prediction, example)| **prediction as i64 != example.label())
        .count();

    let evaluation = &output.evaluation;
    assert_eq!(evaluation.scope, EvaluationScope::TrainingSet);
    assert_eq!(evaluation.counts.total, 100);
    assert_eq!(evaluation.counts.mismatches, mismatches);
    assert_abs_diff_eq!(evaluation.error(), mismatches as f64 / 100.0);
    assert!((0.0..=1.0).contains(&evaluation.error()));
    assert!(evaluation.error() < 0.5, "error was {}", evaluation.error());

    assert_eq!(output.model.num_trees(), 3);
    assert!(evaluation
        .description
        .starts_with("RandomForestClassificationModel with 3 trees"));
    assert_eq!(evaluation.description.matches("  Tree ").count(), 3);

    session.stop();
}

#[test]
fn stored_forest_predicts_like_fitted_one() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::builder("RandomForest").start();
    let examples = history(150, 0.0, 7);
    let params = TrainingParams::new().num_trees(5).check().unwrap();

    let output = TrainingPipeline::new(&session, ForestBackend, params)
        .run(examples.clone())
        .unwrap();
    let dataset = output.encoder.encode(&examples).unwrap();
    let fitted = output.model.predict_batch(&dataset.records);

    let store = ModelStore::new(dir.path().join("myModelPath"));
    store
        .save(&output.model, &output.encoder, Some(&output.evaluation))
        .unwrap();
    let description = output.model.describe();
    drop(output);

    // read back in reverse, so identifiers first appear in a different order
    let mut reversed = history(150, 0.0, 7);
    reversed.reverse();
    let loaded = store.load::<RandomForestClassifier>().unwrap();

    let mut predictions = loaded.predict(&reversed).unwrap().to_vec();
    predictions.reverse();
    assert_eq!(predictions, fitted.to_vec());
    assert_eq!(loaded.model.describe(), description);

    let summary = fs::read_to_string(store.path().join(SUMMARY_FILE)).unwrap();
    assert!(summary.starts_with("Train Error = "));
    assert!(summary.ends_with(&description));
}

#[test]
fn held_out_split_reports_test_error() {
    let session = Session::builder("RandomForest").start();
    let params = TrainingParams::new().check().unwrap();

    let output = TrainingPipeline::new(&session, ForestBackend, params)
        .evaluation(EvaluationStrategy::Split {
            ratio: 0.25,
            seed: 1,
        })
        .run(history(200, 0.0, 3))
        .unwrap();

    assert_eq!(output.evaluation.scope, EvaluationScope::HeldOut);
    assert_eq!(output.evaluation.counts.total, 50);
    assert!(output.evaluation.to_string().starts_with("Test Error = "));
}

#[test]
fn out_of_range_label_fails_run() {
    let session = Session::builder("RandomForest").start();
    let params = TrainingParams::new().check().unwrap();
    let examples = read_examples_from(Cursor::new("AB\tY\t7")).unwrap();

    let result = TrainingPipeline::new(&session, ForestBackend, params).run(examples);
    assert!(matches!(result, Err(flightforest::Error::Training(_))));
}
