//! `flightforest-datasets` provides flight history records ready to be used in tests and
//! benchmarks.
//!
//! ## The Big Picture
//!
//! The records follow the layout of the preprocessed flight history the training job consumes:
//! one tab separated line per flight, the carrier code first, the year second and a sequence of
//! integer features after that, ending in the delay label.
//!
//! ## Using a dataset
//!
//! ```
//! use flightforest_datasets::generate::flight_history;
//! use rand::{rngs::SmallRng, SeedableRng};
//!
//! let mut rng = SmallRng::seed_from_u64(42);
//! let records = flight_history(100, 0.0, &mut rng);
//!
//! assert_eq!(records.len(), 100);
//! assert_eq!(records[0].split('\t').count(), 13);
//! ```

pub mod generate;

/// Names of the integer fields of a record, in order, the last one being the label
pub const FIELD_NAMES: [&str; 11] = [
    "quarter",
    "month",
    "week_of_month",
    "day_of_week",
    "popular_origin",
    "popular_destination",
    "departure_bin",
    "arrival_bin",
    "scheduled_elapsed_time",
    "distance",
    "delayed",
];

/// Carrier codes used as record identifiers
pub const CARRIERS: [&str; 6] = ["AA", "DL", "UA", "WN", "B6", "AS"];
