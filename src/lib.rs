//! `flightforest` trains flight delay classifiers from tab-delimited flight history.
//!
//! The crate is built on the [linfa](https://github.com/rust-ml/linfa) ecosystem: parsed
//! records become `linfa` datasets, hyperparameters are checked through `linfa`'s `ParamGuard`
//! and evaluation reuses its classification metrics. How a model is actually learned is up to a
//! [`TrainingBackend`]; the random forest backend lives in `flightforest-trees`.
//!
//! ## The big picture
//!
//! A run is a strictly sequential batch job:
//!
//! * [`record`] parses raw lines into labeled examples, [`dataset`] loads whole files and encodes
//!   the examples into numeric datasets
//! * [`pipeline`] trains a model over the full batch and evaluates it, by default on the training
//!   examples themselves
//! * [`persistence`] stores the fitted model together with its dataset encoder and a human
//!   readable summary
//!
//! Everything runs inside an explicit [`Session`], released on every exit path.
//!
//! ## Example
//!
//! ```rust,ignore
//! use flightforest::prelude::*;
//! use flightforest_trees::ForestBackend;
//!
//! let session = Session::builder("RandomForest").start();
//! let examples = read_examples("output/a6history/AA-r-00000")?;
//! let params = TrainingParams::new().num_trees(3).max_depth(4).check()?;
//!
//! let output = TrainingPipeline::new(&session, ForestBackend, params).run(examples)?;
//! println!("{}", output.evaluation);
//!
//! ModelStore::new("myModelPath").save(&output.model, &output.encoder, Some(&output.evaluation))?;
//! session.stop();
//! ```
//!

pub mod config;
pub mod dataset;
pub mod error;
mod hyperparams;
pub mod metrics;
pub mod persistence;
pub mod pipeline;
pub mod prelude;
pub mod record;
pub mod session;
pub mod traits;

pub use error::{Error, Result};
pub use hyperparams::*;
pub use linfa::ParamGuard;
pub use session::Session;
pub use traits::{TrainedModel, TrainingBackend};
