// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores a trained classifier as ONE file.
//
// What gets saved:
//   1. <model>              — vocabulary, labels and all four
//                             parameter tensors (bincode)
//   2. <model stem>.config.json — the TrainConfig used (JSON)
//
// Why one file for the model?
//   The weights are meaningless without the vocabulary and
//   label set that fixed their shapes. Keeping them together
//   means a model can never be loaded against the wrong
//   vocabulary.
//
// Model file layout (bincode, fields in this order):
//   magic       "finance-intent"
//   version     u32
//   vocabulary  Vec<String>   sorted, unique
//   labels      Vec<String>   sorted, unique
//   w_ih        { rows, cols, values: Vec<f32> }   V × H
//   w_ho        { rows, cols, values }             H × L
//   b_h         { rows, cols, values }             1 × H
//   b_o         { rows, cols, values }             1 × L
//
// The f32 values are written raw, so a round trip is
// bit-exact. Writes go to a temp file in the same directory
// and are renamed into place; a reader never sees half a
// model.
//
// Reference: bincode crate documentation
//            Rust Book §9 (Error Handling)

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::application::train_use_case::TrainConfig;
use crate::data::vocabulary::{LabelSet, Vocabulary};
use crate::error::EngineError;
use crate::ml::inferencer::IntentClassifier;
use crate::ml::model::NetworkParameters;

/// Identifies a model file written by this crate.
pub const MODEL_MAGIC: &str = "finance-intent";

/// Bumped whenever the record layout changes.
pub const FORMAT_VERSION: u32 = 1;

/// Everything a model file holds, as plain data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub magic:      String,
    pub version:    u32,
    pub vocabulary: Vec<String>,
    pub labels:     Vec<String>,
    pub parameters: NetworkParameters,
}

impl ModelRecord {
    pub fn from_classifier(classifier: &IntentClassifier) -> Result<Self, EngineError> {
        Ok(Self {
            magic:      MODEL_MAGIC.to_string(),
            version:    FORMAT_VERSION,
            vocabulary: classifier.vocabulary().tokens().to_vec(),
            labels:     classifier.labels().labels().to_vec(),
            parameters: classifier.parameters()?,
        })
    }

    /// Validate every part and build the classifier; all or nothing.
    pub fn into_classifier(self) -> Result<IntentClassifier, EngineError> {
        if self.magic != MODEL_MAGIC {
            return Err(EngineError::Deserialization(format!(
                "not a model file (magic '{}')",
                self.magic
            )));
        }
        if self.version != FORMAT_VERSION {
            return Err(EngineError::Deserialization(format!(
                "unsupported model format version {} (expected {})",
                self.version, FORMAT_VERSION
            )));
        }
        if self.vocabulary.is_empty() || self.labels.is_empty() {
            return Err(EngineError::Deserialization(
                "model has an empty vocabulary or label set".to_string(),
            ));
        }
        let vocabulary = Vocabulary::from_sorted(self.vocabulary)?;
        let labels     = LabelSet::from_sorted(self.labels)?;
        IntentClassifier::from_parameters(vocabulary, labels, &self.parameters)
    }
}

/// Fixed-width integers, and the record must end exactly
/// where the file does.
fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// Serialise a record to bytes.
pub fn encode_record(record: &ModelRecord) -> Result<Vec<u8>, EngineError> {
    codec()
        .serialize(record)
        .map_err(|e| EngineError::Deserialization(format!("cannot encode model: {e}")))
}

/// Parse bytes back into a record. Shape checks happen in
/// [`ModelRecord::into_classifier`].
pub fn decode_record(bytes: &[u8]) -> Result<ModelRecord, EngineError> {
    codec()
        .deserialize(bytes)
        .map_err(|e| EngineError::Deserialization(format!("unreadable model file: {e}")))
}

/// Manages saving and loading of one model file and its config.
pub struct CheckpointManager {
    /// Path of the model file itself
    model_path: PathBuf,
}

impl CheckpointManager {
    pub fn new(model_path: impl AsRef<Path>) -> Self {
        Self { model_path: model_path.as_ref().to_path_buf() }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// `model.bin` → `model.config.json`
    pub fn config_path(&self) -> PathBuf {
        self.model_path.with_extension("config.json")
    }

    pub fn exists(&self) -> bool {
        self.model_path.is_file()
    }

    /// Atomically write the classifier to the model path.
    pub fn save_model(&self, classifier: &IntentClassifier) -> Result<(), EngineError> {
        let bytes = encode_record(&ModelRecord::from_classifier(classifier)?)?;
        write_atomic(&self.model_path, &bytes)?;
        tracing::debug!(
            "Saved model ({} bytes) to '{}'",
            bytes.len(),
            self.model_path.display()
        );
        Ok(())
    }

    /// Read and validate the model file.
    pub fn load_model(&self) -> Result<IntentClassifier, EngineError> {
        let bytes      = fs::read(&self.model_path)?;
        let classifier = decode_record(&bytes)?.into_classifier()?;
        tracing::info!("Model loaded from '{}'", self.model_path.display());
        Ok(classifier)
    }

    /// Save the training configuration to JSON.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<(), EngineError> {
        let json = serde_json::to_string_pretty(cfg)
            .map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        write_atomic(&self.config_path(), json.as_bytes())?;
        tracing::debug!("Saved training config to '{}'", self.config_path().display());
        Ok(())
    }

    /// Load the training configuration saved next to the model.
    pub fn load_config(&self) -> Result<TrainConfig, EngineError> {
        let json = fs::read_to_string(self.config_path())?;
        serde_json::from_str(&json).map_err(|e| {
            EngineError::Deserialization(format!(
                "bad config '{}': {e}",
                self.config_path().display()
            ))
        })
    }
}

/// Write to a temp file beside `path`, then rename over it.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), EngineError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| EngineError::Io(e.error))?;
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intent::{Corpus, IntentRecord};
    use crate::ml::trainer::run_training;

    fn trained() -> IntentClassifier {
        let corpus = Corpus::new(vec![
            IntentRecord::new("greeting", ["hello", "hi there"], ["Hi!"]),
            IntentRecord::new("farewell", ["bye", "goodbye now"], ["Bye!"]),
        ])
        .unwrap();
        let cfg = TrainConfig { epochs: 20, ..TrainConfig::default() };
        run_training(&cfg, &corpus, None).unwrap().0
    }

    fn bits(params: &NetworkParameters) -> Vec<u32> {
        [&params.w_ih, &params.w_ho, &params.b_h, &params.b_o]
            .iter()
            .flat_map(|m| m.values.iter().map(|v| v.to_bits()))
            .collect()
    }

    #[test]
    fn test_round_trip_is_exact() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().join("model.bin"));
        let original = trained();
        ckpt.save_model(&original).unwrap();
        assert!(ckpt.exists());

        let loaded = ckpt.load_model().unwrap();
        assert_eq!(loaded.vocabulary(), original.vocabulary());
        assert_eq!(loaded.labels(), original.labels());

        let a = original.parameters().unwrap();
        let b = loaded.parameters().unwrap();
        assert_eq!(a, b);
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn test_save_creates_parent_dirs_and_overwrites() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().join("nested/deeper/model.bin"));
        ckpt.save_model(&trained()).unwrap();
        ckpt.save_model(&trained()).unwrap();
        assert!(ckpt.load_model().is_ok());
    }

    #[test]
    fn test_garbage_file_is_deserialization_error() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        fs::write(&path, b"definitely not a model").unwrap();
        assert!(matches!(
            CheckpointManager::new(&path).load_model(),
            Err(EngineError::Deserialization(_))
        ));
    }

    #[test]
    fn test_truncated_file_is_deserialization_error() {
        let record = ModelRecord::from_classifier(&trained()).unwrap();
        let bytes  = encode_record(&record).unwrap();
        let cut    = &bytes[..bytes.len() / 2];
        assert!(matches!(decode_record(cut), Err(EngineError::Deserialization(_))));
    }

    #[test]
    fn test_trailing_bytes_are_rejected() {
        let record    = ModelRecord::from_classifier(&trained()).unwrap();
        let mut bytes = encode_record(&record).unwrap();
        assert_eq!(decode_record(&bytes).unwrap(), record);

        bytes.extend_from_slice(b"GARBAGE-APPENDED");
        assert!(matches!(decode_record(&bytes), Err(EngineError::Deserialization(_))));

        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        fs::write(&path, &bytes).unwrap();
        assert!(matches!(
            CheckpointManager::new(&path).load_model(),
            Err(EngineError::Deserialization(_))
        ));
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let mut record = ModelRecord::from_classifier(&trained()).unwrap();
        record.vocabulary.push("zzz-extra".to_string());
        assert!(matches!(record.into_classifier(), Err(EngineError::Deserialization(_))));

        let mut record = ModelRecord::from_classifier(&trained()).unwrap();
        record.parameters.b_o.values.pop();
        assert!(matches!(record.into_classifier(), Err(EngineError::Deserialization(_))));
    }

    #[test]
    fn test_wrong_magic_or_version_is_rejected() {
        let mut record = ModelRecord::from_classifier(&trained()).unwrap();
        record.magic = "something-else".to_string();
        assert!(matches!(record.into_classifier(), Err(EngineError::Deserialization(_))));

        let mut record = ModelRecord::from_classifier(&trained()).unwrap();
        record.version = FORMAT_VERSION + 1;
        assert!(matches!(record.into_classifier(), Err(EngineError::Deserialization(_))));
    }

    #[test]
    fn test_unsorted_labels_are_rejected() {
        let mut record = ModelRecord::from_classifier(&trained()).unwrap();
        record.labels.reverse();
        assert!(matches!(record.into_classifier(), Err(EngineError::Deserialization(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().join("absent.bin"));
        assert!(!ckpt.exists());
        assert!(matches!(ckpt.load_model(), Err(EngineError::Io(_))));
    }

    #[test]
    fn test_config_round_trip() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path().join("model.bin"));
        assert!(ckpt.config_path().ends_with("model.config.json"));

        let cfg = TrainConfig { epochs: 7, metrics_dir: Some("m".into()), ..TrainConfig::default() };
        ckpt.save_config(&cfg).unwrap();
        assert_eq!(ckpt.load_config().unwrap(), cfg);
    }
}
