// ============================================================
// Layer 2 — Ask Use Case
// ============================================================
// Answers chat messages with a ready engine.
//
// Bootstrap, in order:
//   1. Load the intents corpus (needed for the replies)
//   2. If a model file exists, load it
//   3. If it doesn't, or it is unreadable, train a new model
//      from the corpus and save it
//
// Retraining on a broken model file is the explicit recovery
// step here; the engine itself never retries anything.

use anyhow::{bail, Context, Result};

use crate::application::engine::IntentEngine;
use crate::application::train_use_case::{TrainConfig, TrainUseCase};
use crate::data::loader::JsonCorpusLoader;
use crate::domain::intent::Corpus;
use crate::domain::prediction::ChatReply;
use crate::domain::traits::{CorpusSource, Responder};
use crate::error::EngineError;
use crate::infra::checkpoint::CheckpointManager;

pub struct AskUseCase {
    engine: IntentEngine,
    corpus: Corpus,
}

impl AskUseCase {
    /// Load (or train) the model described by `config`.
    pub fn new(config: TrainConfig, threshold: f32) -> Result<Self> {
        let corpus = JsonCorpusLoader::new(&config.corpus_path)
            .load_corpus()
            .with_context(|| format!("Cannot load corpus '{}'", config.corpus_path))?;

        let mut engine = IntentEngine::with_threshold(threshold);
        let ckpt       = CheckpointManager::new(&config.model_path);

        if ckpt.exists() {
            tracing::info!("Loading existing model...");
            match engine.load(ckpt.model_path()) {
                Ok(()) => {}
                Err(EngineError::Deserialization(reason)) => {
                    tracing::warn!("Model file unusable ({}); retraining", reason);
                    TrainUseCase::new(config).execute(&mut engine)?;
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Cannot read model '{}'", ckpt.model_path().display())
                    })
                }
            }
        } else {
            tracing::info!("Training new model...");
            TrainUseCase::new(config).execute(&mut engine)?;
        }

        Ok(Self { engine, corpus })
    }

    pub fn engine(&self) -> &IntentEngine {
        &self.engine
    }

    pub fn answer(&self, message: &str) -> Result<ChatReply> {
        let message = message.trim();
        if message.is_empty() {
            bail!("No message provided");
        }
        let reply = self.engine.get_response(message, &self.corpus)?;
        tracing::info!(
            "intent={} confidence={:.4}",
            reply.intent,
            reply.confidence
        );
        Ok(reply)
    }
}

impl Responder for AskUseCase {
    fn respond(&self, message: &str) -> Result<ChatReply> {
        self.answer(message)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CORPUS: &str = r#"{"intents": [
        {"tag": "greeting", "patterns": ["hello", "hi there"], "responses": ["Hi!"]},
        {"tag": "farewell", "patterns": ["bye", "goodbye now"], "responses": ["Bye!"]}
    ]}"#;

    fn config(dir: &std::path::Path) -> TrainConfig {
        let corpus_path = dir.join("intents.json");
        fs::write(&corpus_path, CORPUS).unwrap();
        TrainConfig {
            corpus_path:   corpus_path.display().to_string(),
            model_path:    dir.join("model.bin").display().to_string(),
            learning_rate: 0.1,
            epochs:        300,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_bootstraps_by_training_then_reuses_model() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());

        let first = AskUseCase::new(cfg.clone(), 0.25).unwrap();
        assert!(first.engine().is_loaded());
        let saved = fs::read(&cfg.model_path).unwrap();

        // Second start loads the file instead of retraining
        let second = AskUseCase::new(cfg.clone(), 0.25).unwrap();
        assert_eq!(fs::read(&cfg.model_path).unwrap(), saved);
        assert_eq!(second.answer("hello").unwrap().intent, "greeting");
    }

    #[test]
    fn test_retrains_over_corrupt_model() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        fs::write(&cfg.model_path, b"corrupt").unwrap();

        let ask = AskUseCase::new(cfg.clone(), 0.25).unwrap();
        assert_eq!(ask.respond("bye").unwrap().response, "Bye!");
        assert!(CheckpointManager::new(&cfg.model_path).load_model().is_ok());
    }

    #[test]
    fn test_empty_message_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let ask = AskUseCase::new(config(dir.path()), 0.25).unwrap();
        assert!(ask.answer("   ").is_err());
    }

    #[test]
    fn test_unknown_message_reply() {
        let dir   = tempfile::tempdir().unwrap();
        let ask   = AskUseCase::new(config(dir.path()), 0.25).unwrap();
        let reply = ask.answer("what is the weather").unwrap();
        assert_eq!(reply.intent, "unknown");
    }
}
