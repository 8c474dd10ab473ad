// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Fits the intent network from scratch on the whole corpus.
//
// Procedure:
//   1. Build vocabulary, label set and examples from the corpus
//   2. Encode every example (bag-of-words, one-hot target)
//   3. Initialise weights from a seeded Gaussian × 0.5,
//      biases at zero
//   4. For each epoch, visit every example in corpus order
//      and apply one forward + backward + update per example
//      (batch size 1, no shuffling)
//   5. Every `report_every` epochs, measure MSE and accuracy
//      over the full training set and log them
//
// The report is a progress signal only; there is no early
// stopping, every run performs exactly `epochs` epochs.
// Same corpus + same config → same weights.
//
// Reference: Burn Book §5 (Training)
//            Robbins & Monro (1951) stochastic approximation

use burn::tensor::ElementConversion;

use crate::application::train_use_case::TrainConfig;
use crate::data::batcher::{IntentBatch, IntentBatcher};
use crate::data::dataset::IntentDataset;
use crate::data::vocabulary::VocabularyBuilder;
use crate::domain::intent::Corpus;
use crate::error::EngineError;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::inferencer::{argmax, IntentClassifier};
use crate::ml::model::{IntentNetwork, NetworkParameters};
use crate::ml::CpuBackend;

type TrainBackend = CpuBackend;

/// Standard deviation multiplier for the initial weights.
pub const INIT_SCALE: f32 = 0.5;

/// Summary of a finished training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    pub epochs:          usize,
    pub examples:        usize,
    pub vocabulary_size: usize,
    pub intent_count:    usize,
    /// One entry per report interval, in epoch order
    pub history:         Vec<EpochMetrics>,
}

impl TrainingReport {
    pub fn last(&self) -> Option<&EpochMetrics> {
        self.history.last()
    }
}

pub fn run_training(
    cfg:     &TrainConfig,
    corpus:  &Corpus,
    metrics: Option<&MetricsLogger>,
) -> Result<(IntentClassifier, TrainingReport), EngineError> {
    cfg.validate()?;

    // ── Prepare data ──────────────────────────────────────────────────────────
    let prepared = VocabularyBuilder::new().build(corpus)?;
    let dataset  = IntentDataset::encode(&prepared)?;

    tracing::info!("Training on {} samples", dataset.len());
    tracing::info!("Vocabulary size: {}", dataset.input_size());
    tracing::info!("Number of intents: {}", dataset.output_size());

    // ── Build model ───────────────────────────────────────────────────────────
    let device = Default::default();
    let params = NetworkParameters::random(
        dataset.input_size(),
        cfg.hidden_size,
        dataset.output_size(),
        cfg.seed,
        INIT_SCALE,
    );
    let mut network = IntentNetwork::<TrainBackend>::from_parameters(&params, &device);

    // ── Batches: one per example, plus the full set for reporting ─────────────
    let batcher = IntentBatcher::<TrainBackend>::new(device.clone());
    let steps: Vec<IntentBatch<TrainBackend>> = dataset
        .examples()
        .iter()
        .map(|ex| batcher.batch(std::slice::from_ref(ex)))
        .collect();
    let full      = batcher.batch(dataset.examples());
    let label_ids: Vec<usize> = dataset.examples().iter().map(|e| e.label_index).collect();

    // ── Epoch loop ────────────────────────────────────────────────────────────
    let lr = cfg.learning_rate as f32;
    let mut history = Vec::new();

    for epoch in 1..=cfg.epochs {
        for step in &steps {
            network.train_step(step.features.clone(), step.targets.clone(), lr);
        }

        if cfg.report_every > 0 && epoch % cfg.report_every == 0 {
            let point = evaluate(&network, &full, &label_ids, epoch)?;
            tracing::info!(
                "Epoch {}/{}, Loss: {:.4}, Accuracy: {:.1}%",
                epoch,
                cfg.epochs,
                point.loss,
                point.accuracy * 100.0
            );
            if let Some(logger) = metrics {
                logger.log(&point)?;
            }
            history.push(point);
        }
    }

    tracing::info!("Training complete!");

    let report = TrainingReport {
        epochs:          cfg.epochs,
        examples:        dataset.len(),
        vocabulary_size: dataset.input_size(),
        intent_count:    dataset.output_size(),
        history,
    };
    let classifier = IntentClassifier::new(prepared.vocabulary, prepared.labels, network, device)?;
    Ok((classifier, report))
}

/// Mean squared error and accuracy over a full batch.
fn evaluate(
    network:   &IntentNetwork<TrainBackend>,
    full:      &IntentBatch<TrainBackend>,
    label_ids: &[usize],
    epoch:     usize,
) -> Result<EpochMetrics, EngineError> {
    let output = network.forward(full.features.clone()).output;
    let [_, width] = output.dims();

    let diff = full.targets.clone().sub(output.clone());
    let loss: f32 = diff.clone().mul(diff).mean().into_scalar().elem::<f32>();

    let probs = output
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| EngineError::Tensor(format!("{e:?}")))?;

    let correct = probs
        .chunks(width.max(1))
        .zip(label_ids)
        .filter(|&(row, &label)| argmax(row).map(|(i, _)| i) == Some(label))
        .count();
    let accuracy = if label_ids.is_empty() { 0.0 } else { correct as f32 / label_ids.len() as f32 };

    Ok(EpochMetrics::new(epoch, loss, accuracy))
}
