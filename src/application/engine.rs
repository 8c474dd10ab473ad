// ============================================================
// Layer 2 — Intent Engine
// ============================================================
// The handle the request layer holds. It owns at most one
// trained classifier and exposes the operations callers need:
//
//   train(corpus, config)   fit a brand-new classifier
//   predict(message)        classify against the threshold
//   get_response(message)  classify + pick a canned reply
//   save(path) / load(path) persist / restore
//   is_loaded()             health check
//
// A classifier is never mutated once built. Retraining or
// loading builds a new one and swaps the Arc, so anyone
// holding a snapshot() keeps a consistent model while the
// engine moves on.

use std::{path::Path, sync::Arc};

use rand::{seq::SliceRandom, Rng};

use crate::application::train_use_case::TrainConfig;
use crate::domain::intent::Corpus;
use crate::domain::prediction::{
    ChatReply, Prediction, DEFAULT_THRESHOLD, FALLBACK_RESPONSE, GENERIC_RESPONSE,
};
use crate::error::EngineError;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::MetricsLogger;
use crate::ml::inferencer::IntentClassifier;
use crate::ml::trainer::{run_training, TrainingReport};

pub struct IntentEngine {
    model:     Option<Arc<IntentClassifier>>,
    threshold: f32,
}

impl IntentEngine {
    /// An engine with no model yet, using the default threshold.
    pub fn new() -> Self {
        Self { model: None, threshold: DEFAULT_THRESHOLD }
    }

    pub fn with_threshold(threshold: f32) -> Self {
        Self { model: None, threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// The current classifier, if any. Stays valid after the
    /// engine is retrained or reloaded.
    pub fn snapshot(&self) -> Option<Arc<IntentClassifier>> {
        self.model.clone()
    }

    fn current(&self) -> Result<&IntentClassifier, EngineError> {
        self.model.as_deref().ok_or(EngineError::UninitializedModel)
    }

    fn install(&mut self, classifier: IntentClassifier) {
        self.model = Some(Arc::new(classifier));
    }

    /// Fit a fresh classifier on `corpus` and make it current.
    /// On failure the previous model (if any) stays in place.
    pub fn train(&mut self, corpus: &Corpus, cfg: &TrainConfig) -> Result<TrainingReport, EngineError> {
        let metrics = cfg.metrics_dir.as_deref().map(MetricsLogger::new).transpose()?;
        let (classifier, report) = run_training(cfg, corpus, metrics.as_ref())?;
        self.install(classifier);
        Ok(report)
    }

    pub fn predict(&self, sentence: &str) -> Result<Prediction, EngineError> {
        self.predict_with_threshold(sentence, self.threshold)
    }

    pub fn predict_with_threshold(&self, sentence: &str, threshold: f32) -> Result<Prediction, EngineError> {
        self.current()?.predict(sentence, threshold)
    }

    /// Classify `sentence` and pick a reply from `corpus`.
    pub fn get_response(&self, sentence: &str, corpus: &Corpus) -> Result<ChatReply, EngineError> {
        self.get_response_with_rng(sentence, corpus, &mut rand::thread_rng())
    }

    /// As [`get_response`](Self::get_response), with a caller-supplied RNG.
    pub fn get_response_with_rng<R: Rng + ?Sized>(
        &self,
        sentence: &str,
        corpus:   &Corpus,
        rng:      &mut R,
    ) -> Result<ChatReply, EngineError> {
        let prediction = self.predict(sentence)?;

        let response = match &prediction {
            Prediction::Unknown { .. } => FALLBACK_RESPONSE.to_string(),
            Prediction::Known { label, .. } => corpus
                .responses_for(label)
                .and_then(|replies| replies.choose(rng))
                .cloned()
                .unwrap_or_else(|| {
                    tracing::warn!("No replies for intent '{}' in corpus", label);
                    GENERIC_RESPONSE.to_string()
                }),
        };

        Ok(ChatReply {
            response,
            intent:     prediction.label().to_string(),
            confidence: prediction.probability(),
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        CheckpointManager::new(path).save_model(self.current()?)
    }

    /// Replace the current model with one read from disk.
    /// On failure the previous model (if any) stays in place.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let classifier = CheckpointManager::new(path).load_model()?;
        self.install(classifier);
        Ok(())
    }
}

impl Default for IntentEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intent::IntentRecord;
    use rand::{rngs::StdRng, SeedableRng};

    fn greeting_corpus() -> Corpus {
        Corpus::new(vec![
            IntentRecord::new("greeting", ["hello", "hi there"], ["Hi! How can I help?", "Hello!"]),
            IntentRecord::new("farewell", ["bye", "goodbye now"], ["Goodbye!"]),
        ])
        .unwrap()
    }

    fn trained_engine() -> IntentEngine {
        let cfg = TrainConfig { learning_rate: 0.1, epochs: 500, ..TrainConfig::default() };
        let mut engine = IntentEngine::new();
        engine.train(&greeting_corpus(), &cfg).unwrap();
        engine
    }

    #[test]
    fn test_uninitialized_engine() {
        let engine = IntentEngine::new();
        assert!(!engine.is_loaded());
        assert!(matches!(engine.predict("hello"), Err(EngineError::UninitializedModel)));
        assert!(matches!(
            engine.get_response("hello", &greeting_corpus()),
            Err(EngineError::UninitializedModel)
        ));
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            engine.save(dir.path().join("m.bin")),
            Err(EngineError::UninitializedModel)
        ));
    }

    #[test]
    fn test_greeting_scenario() {
        let engine = trained_engine();
        assert!(engine.is_loaded());

        let hello = engine.predict("hello").unwrap();
        assert_eq!(hello.label(), "greeting");
        assert!(hello.probability() > 0.25);

        assert_eq!(engine.predict("goodbye now").unwrap().label(), "farewell");
        assert!(engine.predict("xyzabc").unwrap().is_unknown());
    }

    #[test]
    fn test_response_comes_from_predicted_intent() {
        let engine = trained_engine();
        let corpus = greeting_corpus();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10 {
            let reply = engine.get_response_with_rng("hi there", &corpus, &mut rng).unwrap();
            assert_eq!(reply.intent, "greeting");
            assert!(corpus.responses_for("greeting").unwrap().contains(&reply.response));
        }
    }

    #[test]
    fn test_unknown_gets_fallback() {
        let engine = trained_engine();
        let reply  = engine.get_response("xyzabc", &greeting_corpus()).unwrap();
        assert_eq!(reply.intent, "unknown");
        assert_eq!(reply.response, FALLBACK_RESPONSE);
    }

    #[test]
    fn test_missing_intent_gets_generic_reply() {
        let engine = trained_engine();
        // Corpus edited after training: "greeting" is gone
        let stale = Corpus::new(vec![IntentRecord::new("farewell", ["bye"], ["Goodbye!"])]).unwrap();
        let reply = engine.get_response("hello", &stale).unwrap();
        assert_eq!(reply.intent, "greeting");
        assert_eq!(reply.response, GENERIC_RESPONSE);

        let silent = Corpus::new(vec![IntentRecord::new("greeting", ["hello"], Vec::<String>::new())]).unwrap();
        assert_eq!(engine.get_response("hello", &silent).unwrap().response, GENERIC_RESPONSE);
    }

    #[test]
    fn test_threshold_override() {
        let engine = trained_engine();
        let p = engine.predict("hello").unwrap().probability();
        assert!(engine.predict_with_threshold("hello", p).unwrap().is_unknown());
        assert!(engine.predict_with_threshold("hello", 1.0).unwrap().is_unknown());

        let strict = IntentEngine::with_threshold(1.0);
        assert_eq!(strict.threshold(), 1.0);
    }

    #[test]
    fn test_save_then_load_into_new_engine() {
        let dir    = tempfile::tempdir().unwrap();
        let path   = dir.path().join("model.bin");
        let engine = trained_engine();
        engine.save(&path).unwrap();

        let mut fresh = IntentEngine::new();
        fresh.load(&path).unwrap();
        for s in ["hello", "bye", "hi there", "goodbye now"] {
            assert_eq!(fresh.predict(s).unwrap(), engine.predict(s).unwrap());
        }
    }

    #[test]
    fn test_snapshot_survives_retrain() {
        let mut engine = trained_engine();
        let before = engine.snapshot().unwrap();

        let cfg = TrainConfig { seed: 7, epochs: 10, ..TrainConfig::default() };
        engine.train(&greeting_corpus(), &cfg).unwrap();
        let after = engine.snapshot().unwrap();

        assert!(!Arc::ptr_eq(&before, &after));
        // The old snapshot is still fully usable
        assert_eq!(before.predict("hello", 0.25).unwrap().label(), "greeting");
    }

    #[test]
    fn test_failed_load_keeps_current_model() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.bin");
        std::fs::write(&path, b"junk").unwrap();

        let mut engine = trained_engine();
        assert!(matches!(engine.load(&path), Err(EngineError::Deserialization(_))));
        assert!(engine.is_loaded());
        assert_eq!(engine.predict("hello").unwrap().label(), "greeting");
    }
}
