//! Storing fitted models on disk
//!
//! A model is written into its own directory, holding the serialized model together with a plain
//! text summary of its structure:
//!
//! ```text
//! myModelPath/
//!     model.json
//!     summary.txt
//! ```
//!
//! The model file wraps the model in a small envelope recording the format version and the kind
//! of model, both are checked before the model itself is decoded. The envelope also carries the
//! [`DatasetEncoder`] of the training run, so raw records can be encoded for a loaded model
//! without the original training data.
//!
//! The directory is assembled next to its destination and renamed into place once complete. A
//! replaced model is only removed after the new one has been installed.
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use ndarray::Array1;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tempfile::TempDir;
use tracing::{info, warn};

use crate::dataset::DatasetEncoder;
use crate::error::{Error, Result, StorageFailure};
use crate::metrics::Evaluation;
use crate::record::LabeledExample;
use crate::traits::TrainedModel;

pub const MODEL_FILE: &str = "model.json";
pub const SUMMARY_FILE: &str = "summary.txt";
pub const FORMAT_VERSION: u32 = 1;

/// What happens when the destination of a model already exists
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwritePolicy {
    /// Refuse to write into an existing destination
    Fail,
    /// Replace an empty directory or a previously stored model, anything else is rejected
    Replace,
}

impl Default for OverwritePolicy {
    fn default() -> Self {
        OverwritePolicy::Fail
    }
}

#[derive(Serialize, Deserialize)]
struct ModelEnvelope<E, M> {
    format_version: u32,
    kind: String,
    crate_version: String,
    encoder: E,
    model: M,
}

/// Envelope with the payload still undecoded, used to check the header first
type RawEnvelope = ModelEnvelope<Value, Value>;

/// A model read back from disk together with the encoder of its training run
#[derive(Debug)]
pub struct StoredModel<M> {
    pub model: M,
    pub encoder: DatasetEncoder,
}

impl<M: TrainedModel> StoredModel<M> {
    /// Predicts the label of every raw example, encoded with the stored column layout and
    /// identifier vocabulary
    pub fn predict(&self, examples: &[LabeledExample]) -> Result<Array1<usize>> {
        let dataset = self.encoder.encode(examples)?;
        Ok(self.model.predict_batch(&dataset.records))
    }
}

/// A directory holding one model
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelStore {
    root: PathBuf,
    policy: OverwritePolicy,
}

impl ModelStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ModelStore {
            root: root.into(),
            policy: OverwritePolicy::default(),
        }
    }

    pub fn overwrite(mut self, policy: OverwritePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Writes `model`, the encoder it was trained with and its summary, prefixed with the
    /// evaluation report when given
    ///
    /// The written model is not read back.
    pub fn save<M>(
        &self,
        model: &M,
        encoder: &DatasetEncoder,
        evaluation: Option<&Evaluation>,
    ) -> Result<()>
    where
        M: TrainedModel + Serialize,
    {
        let replaces = self.check_destination()?;

        let parent = self.parent();
        fs::create_dir_all(&parent).map_err(|err| Error::storage(&parent, err))?;
        let staging = tempfile::Builder::new()
            .prefix(".flightforest-")
            .tempdir_in(&parent)
            .map_err(|err| Error::storage(&parent, err))?;

        let envelope = ModelEnvelope {
            format_version: FORMAT_VERSION,
            kind: M::KIND.to_string(),
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            encoder,
            model,
        };
        write_file(staging.path(), MODEL_FILE, |writer| {
            serde_json::to_writer(&mut *writer, &envelope)?;
            Ok(())
        })?;

        let mut summary = String::new();
        if let Some(evaluation) = evaluation {
            summary.push_str(&format!("{}\n", evaluation));
        }
        summary.push_str(&model.describe());
        write_file(staging.path(), SUMMARY_FILE, |writer| {
            writer.write_all(summary.as_bytes())?;
            Ok(())
        })?;

        if replaces {
            self.swap_in(&staging, &parent)?;
        } else {
            fs::rename(staging.path(), &self.root)
                .map_err(|err| Error::storage(&self.root, err))?;
        }

        info!(path = %self.root.display(), kind = M::KIND, "stored model");
        Ok(())
    }

    /// Reads a model stored by [`save`](ModelStore::save), no training data needed
    pub fn load<M>(&self) -> Result<StoredModel<M>>
    where
        M: TrainedModel + DeserializeOwned,
    {
        let path = self.root.join(MODEL_FILE);
        let envelope = read_envelope(&path)?;

        if envelope.format_version != FORMAT_VERSION {
            return Err(Error::storage(
                &path,
                StorageFailure::Incompatible(format!(
                    "format version {} is not supported, expected {}",
                    envelope.format_version, FORMAT_VERSION
                )),
            ));
        }
        if envelope.kind != M::KIND {
            return Err(Error::storage(
                &path,
                StorageFailure::Incompatible(format!(
                    "stored model is a {}, expected a {}",
                    envelope.kind,
                    M::KIND
                )),
            ));
        }

        let encoder =
            serde_json::from_value(envelope.encoder).map_err(|err| Error::storage(&path, err))?;
        let model =
            serde_json::from_value(envelope.model).map_err(|err| Error::storage(&path, err))?;

        Ok(StoredModel { model, encoder })
    }

    fn parent(&self) -> PathBuf {
        match self.root.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Checks the destination against the overwrite policy, returns whether it already exists
    ///
    /// Under [`OverwritePolicy::Replace`] an existing destination has to be an empty directory or
    /// hold nothing but a stored model and its summary.
    fn check_destination(&self) -> Result<bool> {
        let root = &self.root;
        if !root.exists() {
            return Ok(false);
        }

        if self.policy == OverwritePolicy::Fail {
            return Err(Error::storage(root, StorageFailure::AlreadyExists));
        }
        if !root.is_dir() {
            return Err(Error::storage(
                root,
                StorageFailure::Incompatible("destination is not a directory".to_string()),
            ));
        }

        let mut is_empty = true;
        for entry in fs::read_dir(root).map_err(|err| Error::storage(root, err))? {
            let entry = entry.map_err(|err| Error::storage(root, err))?;
            let name = entry.file_name();
            match name.to_str() {
                Some(MODEL_FILE) | Some(SUMMARY_FILE) => is_empty = false,
                _ => {
                    return Err(Error::storage(
                        root,
                        StorageFailure::Incompatible(format!(
                            "directory holds {:?}, which is not part of a stored model",
                            name
                        )),
                    ))
                }
            }
        }
        if is_empty {
            return Ok(true);
        }

        let model_file = root.join(MODEL_FILE);
        if !model_file.is_file() || read_envelope(&model_file).is_err() {
            return Err(Error::storage(
                root,
                StorageFailure::Incompatible(format!("directory holds no stored {}", MODEL_FILE)),
            ));
        }

        Ok(true)
    }

    /// Moves the existing destination aside, installs the staged model and drops the old one
    fn swap_in(&self, staging: &TempDir, parent: &Path) -> Result<()> {
        let root = &self.root;
        let previous = tempfile::Builder::new()
            .prefix(".flightforest-previous-")
            .tempdir_in(parent)
            .map_err(|err| Error::storage(parent, err))?;
        let aside = previous.path().join("model");

        fs::rename(root, &aside).map_err(|err| Error::storage(root, err))?;
        if let Err(err) = fs::rename(staging.path(), root) {
            if let Err(restore) = fs::rename(&aside, root) {
                // keep the moved copy around instead of cleaning it up with the holder
                let kept = previous.into_path().join("model");
                warn!(
                    path = %kept.display(),
                    error = %restore,
                    "previous model could not be restored"
                );
            }
            return Err(Error::storage(root, err));
        }

        info!(path = %root.display(), "replaced previously stored model");
        previous.close().map_err(|err| Error::storage(parent, err))
    }
}

fn read_envelope(path: &Path) -> Result<RawEnvelope> {
    let file = File::open(path).map_err(|err| Error::storage(path, err))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|err| Error::storage(path, err))
}

fn write_file<F>(dir: &Path, name: &str, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::result::Result<(), StorageFailure>,
{
    let path = dir.join(name);
    let file = File::create(&path).map_err(|err| Error::storage(&path, err))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer).map_err(|err| Error::storage(&path, err))?;
    writer.flush().map_err(|err| Error::storage(&path, err))
}
