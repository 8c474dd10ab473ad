// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load and validate the intents corpus   (Layer 4 - data)
//   Step 2: Fit a fresh network on it              (Layer 5 - ml)
//   Step 3: Save the model file                    (Layer 6 - infra)
//   Step 4: Save the config next to it             (Layer 6 - infra)
//
// Training always starts from scratch; an existing model file
// is replaced only once the new one has been fully written.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::application::engine::IntentEngine;
use crate::data::loader::JsonCorpusLoader;
use crate::domain::traits::CorpusSource;
use crate::error::EngineError;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::trainer::TrainingReport;

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Serialisable so it can be saved next to the model file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub corpus_path:   String,
    pub model_path:    String,
    pub hidden_size:   usize,
    pub learning_rate: f64,
    pub epochs:        usize,
    pub seed:          u64,
    pub report_every:  usize,
    pub metrics_dir:   Option<String>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            corpus_path:   "training_data.json".to_string(),
            model_path:    "finance_model.bin".to_string(),
            hidden_size:   16,
            learning_rate: 0.01,
            epochs:        2000,
            seed:          42,
            report_every:  200,
            metrics_dir:   None,
        }
    }
}

impl TrainConfig {
    /// Reject hyperparameters that cannot train anything.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.hidden_size == 0 {
            return Err(EngineError::InvalidConfig("hidden_size must be at least 1".to_string()));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "learning_rate must be a positive number, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
// Owns the config and runs the full training pipeline.
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    /// Create a new TrainUseCase with the given configuration
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Train `engine` on the configured corpus and persist the result.
    pub fn execute(&self, engine: &mut IntentEngine) -> Result<TrainingReport> {
        let cfg = &self.config;

        // ── Step 1: Load corpus ───────────────────────────────────────────────
        tracing::info!("Loading intents from '{}'", cfg.corpus_path);
        let corpus = JsonCorpusLoader::new(&cfg.corpus_path)
            .load_corpus()
            .with_context(|| format!("Cannot load corpus '{}'", cfg.corpus_path))?;

        // ── Step 2: Train ─────────────────────────────────────────────────────
        let report = engine.train(&corpus, cfg).context("Training failed")?;

        // ── Step 3 + 4: Persist model and config ──────────────────────────────
        engine
            .save(&cfg.model_path)
            .with_context(|| format!("Cannot save model to '{}'", cfg.model_path))?;
        CheckpointManager::new(&cfg.model_path)
            .save_config(cfg)
            .context("Cannot save training config")?;

        tracing::info!("Model saved to '{}'", cfg.model_path);
        Ok(report)
    }
}
