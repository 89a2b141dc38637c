//! Parsing of flight-history records
//!
//! A record is a single line of tab separated fields. The first field identifies the carrier
//! (or flight), the second one is ignored and every following field holds an integer. The last
//! integer is the class label, every other integer is a feature.
//!
//! ```rust
//! use flightforest::record::{parse_record, FeatureValue};
//!
//! let example = parse_record("FL123\tX\t5\t10\t1").unwrap();
//!
//! assert_eq!(example.label(), 1);
//! assert_eq!(
//!     example.features(),
//!     &[
//!         FeatureValue::Identifier("FL123".into()),
//!         FeatureValue::Integer(5),
//!         FeatureValue::Integer(10),
//!     ]
//! );
//! ```
use std::fmt;

use thiserror::Error;

/// Field separator of raw records
pub const FIELD_SEPARATOR: char = '\t';

/// Index of the first integer field
const FIRST_INTEGER_FIELD: usize = 2;

/// Reason a single record could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected at least 3 tab separated fields, found {found}")]
    TooFewFields { found: usize },
    #[error("field {field} is not an integer: {value:?}")]
    NotAnInteger { field: usize, value: String },
}

/// A single entry of a feature vector
///
/// Records mix a textual identifier with integer measurements. Both are kept as they are here,
/// the conversion into a numeric matrix happens when a dataset is encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeatureValue {
    Identifier(String),
    Integer(i64),
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Identifier(id) => write!(f, "{}", id),
            FeatureValue::Integer(x) => write!(f, "{}", x),
        }
    }
}

/// A feature vector paired with its ground truth label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledExample {
    label: i64,
    features: Vec<FeatureValue>,
}

impl LabeledExample {
    /// Returns the class label
    pub fn label(&self) -> i64 {
        self.label
    }

    /// Returns the features, the identifier first followed by the integer features
    pub fn features(&self) -> &[FeatureValue] {
        &self.features
    }

    /// Returns the identifier token of the originating record
    pub fn identifier(&self) -> &str {
        match self.features.first() {
            Some(FeatureValue::Identifier(id)) => id,
            _ => "",
        }
    }

    /// Iterates over the integer features, skipping the identifier
    pub fn integer_features(&self) -> impl Iterator<Item = i64> + '_ {
        self.features.iter().filter_map(|value| match value {
            FeatureValue::Integer(x) => Some(*x),
            FeatureValue::Identifier(_) => None,
        })
    }

    /// Number of integer features
    pub fn num_integer_features(&self) -> usize {
        self.features.len() - 1
    }
}

/// Parses a single raw record into a labeled example
///
/// A record with exactly one integer field is accepted: the integer becomes the label and the
/// identifier remains the only feature.
pub fn parse_record(line: &str) -> Result<LabeledExample, ParseError> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() <= FIRST_INTEGER_FIELD {
        return Err(ParseError::TooFewFields {
            found: fields.len(),
        });
    }

    let mut values = fields[FIRST_INTEGER_FIELD..]
        .iter()
        .enumerate()
        .map(|(offset, field)| {
            field
                .trim()
                .parse::<i64>()
                .map_err(|_| ParseError::NotAnInteger {
                    field: FIRST_INTEGER_FIELD + offset,
                    value: (*field).to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // at least one integer is present, checked above
    let label = values.pop().unwrap_or_default();

    let mut features = Vec::with_capacity(values.len() + 1);
    features.push(FeatureValue::Identifier(fields[0].to_string()));
    features.extend(values.into_iter().map(FeatureValue::Integer));

    Ok(LabeledExample { label, features })
}
