//! Training and evaluation of a classifier over a full batch of examples
//!
//! The pipeline encodes the parsed examples, fits a model through a [`TrainingBackend`], predicts
//! the label of every evaluation example and compares each prediction with the true label at the
//! same position. By default the model is evaluated on the very examples it was trained on, so
//! the reported ratio is a training error. A held-out evaluation set can be supplied instead,
//! either explicitly or split off the input.
use linfa::metrics::ToConfusionMatrix;
use tracing::{debug, info, warn};

use crate::dataset::{split_examples, DatasetEncoder, IdentifierEncoding};
use crate::error::{Error, Result};
use crate::hyperparams::TrainingValidParams;
use crate::metrics::{training_error, Evaluation, EvaluationScope};
use crate::record::LabeledExample;
use crate::session::Session;
use crate::traits::{TrainedModel, TrainingBackend};

/// The examples a fitted model is evaluated on
#[derive(Clone, Debug, PartialEq)]
pub enum EvaluationStrategy {
    /// Evaluate on the training examples themselves
    TrainingSet,
    /// Evaluate on a separately loaded set of examples
    HeldOut(Vec<LabeledExample>),
    /// Shuffle the input with `seed` and hold out a `ratio` of it for evaluation
    Split { ratio: f64, seed: u64 },
}

impl Default for EvaluationStrategy {
    fn default() -> Self {
        EvaluationStrategy::TrainingSet
    }
}

/// Everything a run produces
#[derive(Debug)]
pub struct PipelineOutput<M> {
    pub model: M,
    pub encoder: DatasetEncoder,
    pub evaluation: Evaluation,
}

/// Coordinates encoding, training and evaluation of a single run
pub struct TrainingPipeline<'a, B> {
    session: &'a Session,
    backend: B,
    params: TrainingValidParams,
    evaluation: EvaluationStrategy,
    encoding: IdentifierEncoding,
}

impl<'a, B: TrainingBackend> TrainingPipeline<'a, B> {
    pub fn new(session: &'a Session, backend: B, params: TrainingValidParams) -> Self {
        TrainingPipeline {
            session,
            backend,
            params,
            evaluation: EvaluationStrategy::default(),
            encoding: IdentifierEncoding::default(),
        }
    }

    /// Sets the examples the model is evaluated on
    pub fn evaluation(mut self, evaluation: EvaluationStrategy) -> Self {
        self.evaluation = evaluation;
        self
    }

    /// Sets how the identifier token is turned into a feature
    pub fn identifier_encoding(mut self, encoding: IdentifierEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Trains on `examples` and evaluates the fitted model
    pub fn run(self, examples: Vec<LabeledExample>) -> Result<PipelineOutput<B::Model>> {
        let _entered = self.session.span().enter();

        if examples.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let (train, held_out) = match self.evaluation {
            EvaluationStrategy::TrainingSet => (examples, None),
            EvaluationStrategy::HeldOut(evaluation) => {
                warn!(
                    examples = evaluation.len(),
                    "evaluating on a held-out set instead of the training set"
                );
                (examples, Some(evaluation))
            }
            EvaluationStrategy::Split { ratio, seed } => {
                warn!(
                    ratio,
                    "splitting off a held-out set instead of evaluating on the training set"
                );
                let (train, evaluation) = split_examples(examples, ratio, seed)?;
                (train, Some(evaluation))
            }
        };

        let encoder = DatasetEncoder::fit(&train, self.encoding)?;
        let train_set = encoder.encode(&train)?;
        info!(
            examples = train.len(),
            features = encoder.num_features(),
            trees = self.params.num_trees(),
            "training classifier"
        );

        let model = self.backend.train(self.session, &train_set, &self.params)?;

        let (eval_set, scope) = match held_out {
            None => (train_set, EvaluationScope::TrainingSet),
            Some(evaluation) if evaluation.is_empty() => return Err(Error::EmptyDataset),
            Some(evaluation) => (encoder.encode(&evaluation)?, EvaluationScope::HeldOut),
        };

        let predictions = model.predict_batch(&eval_set.records);
        let counts = training_error(&eval_set.targets, &predictions)?;
        let accuracy = predictions.confusion_matrix(&eval_set)?.accuracy();
        debug!(
            mismatches = counts.mismatches,
            total = counts.total,
            accuracy,
            "evaluated classifier"
        );

        let evaluation = Evaluation {
            scope,
            counts,
            accuracy,
            description: model.describe(),
        };
        info!(error = evaluation.error(), "{}", evaluation);
        info!("learned classification forest model:\n{}", evaluation.description);

        Ok(PipelineOutput {
            model,
            encoder,
            evaluation,
        })
    }
}
