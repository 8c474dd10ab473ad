// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Loads the intents corpus from a JSON file.
//
// Two layouts are accepted:
//
//   1. A bare array of records
//        [ { "tag": "...", "patterns": [...], "responses": [...] }, ... ]
//
//   2. The same array wrapped in an object
//        { "intents": [ ... ] }
//
// Every record is checked here, eagerly, so a malformed
// corpus fails at load time with the index of the bad record
// rather than somewhere deep inside training.
//
// Reference: serde_json documentation
//            Rust Book §9 (Error Handling)

use std::{fs, path::{Path, PathBuf}};

use serde_json::Value;

use crate::domain::intent::{Corpus, IntentRecord};
use crate::domain::traits::CorpusSource;
use crate::error::EngineError;

/// Loads an intents corpus from a JSON file on disk.
/// Implements the CorpusSource trait from Layer 3.
pub struct JsonCorpusLoader {
    /// Path to the intents JSON file
    path: PathBuf,
}

impl JsonCorpusLoader {
    /// Create a new loader pointed at a JSON file
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl CorpusSource for JsonCorpusLoader {
    fn load_corpus(&self) -> Result<Corpus, EngineError> {
        let text = fs::read_to_string(&self.path)?;
        let corpus = parse_corpus(&text)?;
        tracing::info!(
            "Loaded {} intents from '{}'",
            corpus.len(),
            self.path.display()
        );
        Ok(corpus)
    }
}

/// Parse and validate corpus JSON text.
pub fn parse_corpus(text: &str) -> Result<Corpus, EngineError> {
    let root: Value = serde_json::from_str(text)?;

    // Locate the array of records in either layout
    let items = match root {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("intents") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(EngineError::CorpusFormat(
                    "'intents' must be an array of records".to_string(),
                ))
            }
            None => {
                return Err(EngineError::CorpusFormat(
                    "expected an array of records or an object with an 'intents' array".to_string(),
                ))
            }
        },
        _ => {
            return Err(EngineError::CorpusFormat(
                "expected an array of records or an object with an 'intents' array".to_string(),
            ))
        }
    };

    // Deserialise record by record so errors name the culprit
    let records = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<IntentRecord>(item)
                .map_err(|e| EngineError::CorpusFormat(format!("intent #{i}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Corpus::new(records)
}
