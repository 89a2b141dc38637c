use std::fs;

use flightforest::dataset::{read_examples, DatasetEncoder, IdentifierEncoding};
use flightforest::Error;
use flightforest_datasets::generate::flight_history;
use flightforest_datasets::FIELD_NAMES;
use rand::{rngs::SmallRng, SeedableRng};

#[test]
fn loads_generated_history() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("AA-r-00000");
    let mut rng = SmallRng::seed_from_u64(42);
    let lines = flight_history(100, 0.1, &mut rng);
    fs::write(&path, lines.join("\n")).unwrap();

    // identifier followed by every integer field but the label
    let n_features = 1 + (FIELD_NAMES.len() - 1);

    let examples = read_examples(&path).unwrap();
    assert_eq!(examples.len(), 100);
    for (example, line) in examples.iter().zip(&lines) {
        let label = line.rsplit('\t').next().unwrap().parse::<i64>().unwrap();
        assert_eq!(example.label(), label);
        assert_eq!(example.features().len(), n_features);
        assert_eq!(example.identifier(), line.split('\t').next().unwrap());
    }

    let encoder = DatasetEncoder::fit(&examples, IdentifierEncoding::Index).unwrap();
    let dataset = encoder.encode(&examples).unwrap();
    assert_eq!(dataset.records.dim(), (100, n_features));
    assert!(dataset.targets.iter().all(|x| *x < 2));
}

#[test]
fn missing_file_is_an_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent");

    match read_examples(&path) {
        Err(Error::Input { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected an input error, got {:?}", other),
    }
}
