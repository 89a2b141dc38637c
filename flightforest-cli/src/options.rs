use std::path::PathBuf;

use flightforest::config::RunConfig;
use flightforest::dataset::IdentifierEncoding;
use flightforest::persistence::OverwritePolicy;
use flightforest::{FeatureSubsetStrategy, Impurity};
use structopt::StructOpt;

/// Trains a random forest classifier on preprocessed flight history and stores it
#[derive(Debug, StructOpt)]
#[structopt(name = "flightforest")]
pub struct Options {
    #[structopt(short = "c", long = "config", parse(from_os_str))]
    /// Read options from a JSON file, flags given here take precedence
    pub config: Option<PathBuf>,
    #[structopt(short = "i", long = "input-path", parse(from_os_str))]
    /// Tab separated flight records, Default: output/a6history/AA-r-00000
    pub input_path: Option<PathBuf>,
    #[structopt(short = "o", long = "output-path", parse(from_os_str))]
    /// Directory the fitted model is written to, Default: myModelPath
    pub output_path: Option<PathBuf>,
    #[structopt(long = "num-trees")]
    /// Number of trees in the forest, Default: 3
    pub num_trees: Option<usize>,
    #[structopt(long = "max-depth")]
    /// Maximal depth of every tree, Default: 4
    pub max_depth: Option<usize>,
    #[structopt(long = "max-bins")]
    /// Maximal number of bins per feature, Default: 32
    pub max_bins: Option<usize>,
    #[structopt(long = "seed")]
    pub seed: Option<u64>,
    #[structopt(long = "impurity")]
    /// gini or entropy, Default: gini
    pub impurity: Option<Impurity>,
    #[structopt(long = "feature-subset")]
    /// auto, all, sqrt, log2 or onethird, Default: auto
    pub feature_subset: Option<FeatureSubsetStrategy>,
    #[structopt(long = "exclude-identifier")]
    /// Leave the identifier token out of the features
    pub exclude_identifier: bool,
    #[structopt(long = "eval-path", parse(from_os_str))]
    /// Report the error on the records of this file instead of the training records
    pub eval_path: Option<PathBuf>,
    #[structopt(long = "holdout-ratio")]
    /// Report the error on this fraction of the input, held out from training
    pub holdout_ratio: Option<f64>,
    #[structopt(long = "overwrite")]
    /// Replace a model previously stored at the output path
    pub overwrite: bool,
}

impl Options {
    /// Merges defaults, the configuration file and the flags, in increasing precedence
    pub fn into_config(self) -> flightforest::Result<RunConfig> {
        let config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)?,
            None => RunConfig::default(),
        };

        Ok(self.apply(config))
    }

    fn apply(self, mut config: RunConfig) -> RunConfig {
        if let Some(path) = self.input_path {
            config.input_path = path;
        }
        if let Some(path) = self.output_path {
            config.output_path = path;
        }
        if let Some(num_trees) = self.num_trees {
            config.num_trees = num_trees;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(max_bins) = self.max_bins {
            config.max_bins = max_bins;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(impurity) = self.impurity {
            config.impurity = impurity;
        }
        if let Some(strategy) = self.feature_subset {
            config.feature_subset_strategy = strategy;
        }
        if self.exclude_identifier {
            config.identifier_encoding = IdentifierEncoding::Exclude;
        }
        if self.eval_path.is_some() {
            config.eval_path = self.eval_path;
        }
        if self.holdout_ratio.is_some() {
            config.holdout_ratio = self.holdout_ratio;
        }
        if self.overwrite {
            config.overwrite = OverwritePolicy::Replace;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_without_flags() {
        let options = Options::from_iter(&["flightforest"]);
        let config = options.into_config().unwrap();

        assert_eq!(config, RunConfig::default());
        assert_eq!(config.input_path, PathBuf::from("output/a6history/AA-r-00000"));
        assert_eq!(config.output_path, PathBuf::from("myModelPath"));
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        fs::write(
            &path,
            r#"{ "num_trees": 10, "max_depth": 6, "impurity": "entropy" }"#,
        )
        .unwrap();

        let options = Options::from_iter(&[
            "flightforest",
            "--config",
            path.to_str().unwrap(),
            "--num-trees",
            "20",
            "--feature-subset",
            "log2",
            "--exclude-identifier",
            "--overwrite",
        ]);
        let config = options.into_config().unwrap();

        assert_eq!(config.num_trees, 20);
        assert_eq!(config.max_depth, 6);
        assert_eq!(config.impurity, Impurity::Entropy);
        assert_eq!(config.feature_subset_strategy, FeatureSubsetStrategy::Log2);
        assert_eq!(config.identifier_encoding, IdentifierEncoding::Exclude);
        assert_eq!(config.overwrite, OverwritePolicy::Replace);
        assert_eq!(config.max_bins, 32);
    }

    #[test]
    fn unknown_impurity_is_rejected() {
        let result = Options::from_iter_safe(&["flightforest", "--impurity", "variance"]);
        assert!(result.is_err());
    }
}
