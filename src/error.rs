use std::io;
use thiserror::Error;

/// Errors raised by the intent engine.
///
/// The application and CLI layers wrap these in `anyhow` with context;
/// inside the engine every fallible operation returns this type.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The intents corpus is malformed, misses required fields, or yields
    /// nothing to train on.
    #[error("Corpus format error: {0}")]
    CorpusFormat(String),

    /// A persisted model could not be read or its tensors do not match the
    /// vocabulary and label set stored with them.
    #[error("Model deserialization error: {0}")]
    Deserialization(String),

    /// Prediction or save was requested before any model was trained or
    /// loaded.
    #[error("No model is loaded; train or load one first")]
    UninitializedModel,

    /// Training hyperparameters that cannot produce a network.
    #[error("Invalid training configuration: {0}")]
    InvalidConfig(String),

    /// Tensor data could not be read back from the backend.
    #[error("Tensor error: {0}")]
    Tensor(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::CorpusFormat(format!("JSON error: {}", err))
    }
}
