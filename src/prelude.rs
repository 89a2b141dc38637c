//! flightforest prelude.
//!
//! This module contains the most used types, traits and functions that you can import easily as
//! a group.
//!

#[doc(no_inline)]
pub use crate::error::{Error, Result};

#[doc(no_inline)]
pub use crate::traits::*;

#[doc(no_inline)]
pub use crate::hyperparams::{FeatureSubsetStrategy, Impurity, TrainingParams, TrainingValidParams};

#[doc(no_inline)]
pub use crate::dataset::{read_examples, DatasetEncoder, IdentifierEncoding};

#[doc(no_inline)]
pub use crate::record::{parse_record, FeatureValue, LabeledExample};

#[doc(no_inline)]
pub use crate::pipeline::{EvaluationStrategy, PipelineOutput, TrainingPipeline};

#[doc(no_inline)]
pub use crate::persistence::{ModelStore, OverwritePolicy};

#[doc(no_inline)]
pub use crate::metrics::{Evaluation, EvaluationScope};

#[doc(no_inline)]
pub use crate::session::Session;

#[doc(no_inline)]
pub use linfa::ParamGuard;
