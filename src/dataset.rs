//! Loading labeled examples and encoding them into numeric datasets
//!
//! Records are read line by line and parsed with [`parse_record`](crate::record::parse_record).
//! The first malformed line aborts the whole load. Encoding then turns the heterogeneous feature
//! vectors into a `linfa` dataset, where the identifier token is either replaced by an ordinal
//! index or left out of the records entirely, see [`IdentifierEncoding`].
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use linfa::Dataset;
use ndarray::{Array1, Array2, Ix1};
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::record::{parse_record, FeatureValue, LabeledExample};

/// Reads every record of the file at `path`
pub fn read_examples(path: impl AsRef<Path>) -> Result<Vec<LabeledExample>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Input {
        path: path.to_path_buf(),
        source,
    })?;

    let examples = read_examples_from(BufReader::new(file)).map_err(|err| match err {
        Error::Input { source, .. } => Error::Input {
            path: path.to_path_buf(),
            source,
        },
        err => err,
    })?;
    info!(path = %path.display(), examples = examples.len(), "loaded flight records");

    Ok(examples)
}

/// Reads every record from a buffered reader, one record per line
pub fn read_examples_from(reader: impl BufRead) -> Result<Vec<LabeledExample>> {
    reader
        .lines()
        .enumerate()
        .map(|(idx, line)| {
            let line = line.map_err(|source| Error::Input {
                path: Default::default(),
                source,
            })?;

            parse_record(&line).map_err(|source| Error::Parse {
                line: idx + 1,
                record: line,
                source,
            })
        })
        .collect()
}

/// How the identifier token of a record enters the numeric records
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierEncoding {
    /// Replace the identifier by its index in the identifier vocabulary
    Index,
    /// Keep the identifier as metadata only, the model never sees it
    Exclude,
}

impl Default for IdentifierEncoding {
    fn default() -> Self {
        IdentifierEncoding::Index
    }
}

/// Ordinal encoding of identifier tokens, in order of first appearance
///
/// Identifiers not seen while building the vocabulary are all mapped onto the reserved index
/// `len()`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentifierVocabulary {
    indices: HashMap<String, usize>,
}

impl IdentifierVocabulary {
    /// Builds the vocabulary from the identifiers of `examples`
    pub fn fit(examples: &[LabeledExample]) -> Self {
        let mut indices = HashMap::new();
        for example in examples {
            let next = indices.len();
            indices
                .entry(example.identifier().to_string())
                .or_insert(next);
        }

        IdentifierVocabulary { indices }
    }

    /// Returns the index of `identifier`, `None` if it was not part of the vocabulary
    pub fn get(&self, identifier: &str) -> Option<usize> {
        self.indices.get(identifier).copied()
    }

    /// Returns the index of `identifier` or the reserved index for unknown identifiers
    pub fn index_of(&self, identifier: &str) -> usize {
        self.get(identifier).unwrap_or_else(|| self.len())
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Turns labeled examples into numeric datasets with a shared layout
///
/// The encoder is stored next to a fitted model, so records can be encoded again later without
/// the training examples.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetEncoder {
    encoding: IdentifierEncoding,
    vocabulary: IdentifierVocabulary,
    num_integer_features: usize,
}

impl DatasetEncoder {
    /// Learns the column layout and identifier vocabulary from the training examples
    ///
    /// All examples have to carry the same number of integer features.
    pub fn fit(examples: &[LabeledExample], encoding: IdentifierEncoding) -> Result<Self> {
        let first = examples.first().ok_or(Error::EmptyDataset)?;
        let encoder = DatasetEncoder {
            encoding,
            vocabulary: IdentifierVocabulary::fit(examples),
            num_integer_features: first.num_integer_features(),
        };

        match encoding {
            IdentifierEncoding::Index => info!(
                identifiers = encoder.vocabulary.len(),
                "identifier token is encoded as an ordinal feature"
            ),
            IdentifierEncoding::Exclude => {
                info!("identifier token is kept as metadata and excluded from the features")
            }
        }

        Ok(encoder)
    }

    pub fn encoding(&self) -> IdentifierEncoding {
        self.encoding
    }

    pub fn vocabulary(&self) -> &IdentifierVocabulary {
        &self.vocabulary
    }

    /// Number of numeric columns produced for every example
    pub fn num_features(&self) -> usize {
        match self.encoding {
            IdentifierEncoding::Index => self.num_integer_features + 1,
            IdentifierEncoding::Exclude => self.num_integer_features,
        }
    }

    /// Column names, the integer fields are named after their position in the raw record
    pub fn feature_names(&self) -> Vec<String> {
        let integers = (0..self.num_integer_features).map(|idx| format!("field_{}", idx + 2));
        match self.encoding {
            IdentifierEncoding::Index => std::iter::once("identifier".to_string())
                .chain(integers)
                .collect(),
            IdentifierEncoding::Exclude => integers.collect(),
        }
    }

    /// Encodes `examples` into a dataset with one row per example, in the given order
    ///
    /// Fails if an example has a different number of features than the training examples or a
    /// label which is not a valid class index.
    pub fn encode(&self, examples: &[LabeledExample]) -> Result<Dataset<f64, usize, Ix1>> {
        let n_features = self.num_features();
        let mut records = Array2::zeros((examples.len(), n_features));
        let mut targets = Array1::zeros(examples.len());
        let mut unseen = 0;

        for (idx, (example, (mut row, target))) in examples
            .iter()
            .zip(records.rows_mut().into_iter().zip(targets.iter_mut()))
            .enumerate()
        {
            if example.num_integer_features() != self.num_integer_features {
                return Err(Error::Training(format!(
                    "example {} has {} integer features, expected {}",
                    idx,
                    example.num_integer_features(),
                    self.num_integer_features
                )));
            }

            if example.label() < 0 {
                return Err(Error::Training(format!(
                    "example {} has negative label {}",
                    idx,
                    example.label()
                )));
            }
            *target = example.label() as usize;

            let mut column = 0;
            for value in example.features() {
                match (value, self.encoding) {
                    (FeatureValue::Identifier(_), IdentifierEncoding::Exclude) => continue,
                    (FeatureValue::Identifier(id), IdentifierEncoding::Index) => {
                        if self.vocabulary.get(id).is_none() {
                            unseen += 1;
                        }
                        row[column] = self.vocabulary.index_of(id) as f64;
                    }
                    (FeatureValue::Integer(x), _) => row[column] = *x as f64,
                }
                column += 1;
            }
        }

        if unseen > 0 {
            warn!(
                unseen,
                reserved_index = self.vocabulary.len(),
                "identifiers missing from the training vocabulary"
            );
        }
        debug!(rows = examples.len(), columns = n_features, "encoded dataset");

        Ok(Dataset::new(records, targets).with_feature_names(self.feature_names()))
    }
}

/// Shuffles `examples` with a seeded generator and splits off `ratio` of them for evaluation
///
/// Returns `(train, evaluation)`. The evaluation part holds at least one example if `ratio` is
/// positive and there are at least two examples.
pub fn split_examples(
    mut examples: Vec<LabeledExample>,
    ratio: f64,
    seed: u64,
) -> Result<(Vec<LabeledExample>, Vec<LabeledExample>)> {
    if !(0.0..1.0).contains(&ratio) {
        return Err(Error::Parameters(format!(
            "holdout ratio should be in [0, 1), but was {}",
            ratio
        )));
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    examples.shuffle(&mut rng);

    let mut n_eval = (examples.len() as f64 * ratio).round() as usize;
    if ratio > 0.0 && n_eval == 0 && examples.len() > 1 {
        n_eval = 1;
    }
    let evaluation = examples.split_off(examples.len() - n_eval);

    Ok((examples, evaluation))
}
