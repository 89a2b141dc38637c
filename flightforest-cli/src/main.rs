use anyhow::Context;
use flightforest::dataset::read_examples;
use flightforest::pipeline::TrainingPipeline;
use flightforest::Session;
use flightforest_trees::ForestBackend;
use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod options;

use options::Options;

const APP_NAME: &str = "RandomForest";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(Options::from_args()) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(opt: Options) -> anyhow::Result<()> {
    let config = opt.into_config().context("failed to load configuration")?;
    let params = config.training_params()?;

    let session = Session::builder(APP_NAME).start();

    let examples = read_examples(&config.input_path)
        .with_context(|| format!("failed to load {}", config.input_path.display()))?;
    let evaluation = config.evaluation_strategy()?;

    info!(
        input = %config.input_path.display(),
        output = %config.output_path.display(),
        "starting training run"
    );
    let output = TrainingPipeline::new(&session, ForestBackend, params)
        .evaluation(evaluation)
        .identifier_encoding(config.identifier_encoding)
        .run(examples)
        .context("failed to train classifier")?;

    println!("{}", output.evaluation);
    println!("Learned classification forest model:");
    println!("{}", output.evaluation.description);

    config
        .model_store()
        .save(&output.model, &output.encoder, Some(&output.evaluation))
        .with_context(|| format!("failed to store model at {}", config.output_path.display()))?;

    session.stop();
    Ok(())
}
