// ============================================================
// Layer 5 — Inferencer
// ============================================================
// A trained classifier is three things that only make sense
// together: the vocabulary that fixes the input layout, the
// label set that fixes the output layout, and the network.
//
// Prediction:
//   1. Encode the message as bag-of-words over the vocabulary
//   2. One forward pass → probability per intent
//   3. Take the most probable intent (first one on ties)
//   4. Known if its probability is strictly above the
//      threshold, Unknown otherwise
//
// A message sharing no token with the vocabulary carries no
// signal at all and is always Unknown, whatever the biases
// alone would make the network say.

use burn::tensor::backend::Backend;

use crate::data::batcher::IntentBatcher;
use crate::data::vocabulary::{LabelSet, Vocabulary};
use crate::domain::prediction::Prediction;
use crate::error::EngineError;
use crate::ml::model::{IntentNetwork, NetworkParameters};
use crate::ml::CpuBackend;

type InferBackend = CpuBackend;

pub struct IntentClassifier {
    vocabulary: Vocabulary,
    labels:     LabelSet,
    network:    IntentNetwork<InferBackend>,
    device:     <InferBackend as Backend>::Device,
}

impl IntentClassifier {
    /// Assemble a classifier from an already trained network.
    pub fn new(
        vocabulary: Vocabulary,
        labels:     LabelSet,
        network:    IntentNetwork<InferBackend>,
        device:     <InferBackend as Backend>::Device,
    ) -> Result<Self, EngineError> {
        let [input, _, output] = network.dims();
        if input != vocabulary.len() || output != labels.len() {
            return Err(EngineError::Deserialization(format!(
                "network is {input}->{output} but vocabulary has {} tokens and {} labels",
                vocabulary.len(),
                labels.len()
            )));
        }
        Ok(Self { vocabulary, labels, network, device })
    }

    /// Rebuild a classifier from host-side parameters, e.g. a model file.
    pub fn from_parameters(
        vocabulary: Vocabulary,
        labels:     LabelSet,
        params:     &NetworkParameters,
    ) -> Result<Self, EngineError> {
        params.check_shapes(vocabulary.len(), labels.len())?;
        let device: <InferBackend as Backend>::Device = Default::default();
        let network = IntentNetwork::<InferBackend>::from_parameters(params, &device);
        tracing::debug!(
            "Classifier restored: {} tokens, {} hidden, {} intents",
            vocabulary.len(),
            params.hidden_size(),
            labels.len()
        );
        Self::new(vocabulary, labels, network, device)
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn hidden_size(&self) -> usize {
        self.network.dims()[1]
    }

    /// Copy of the network parameters.
    pub fn parameters(&self) -> Result<NetworkParameters, EngineError> {
        self.network.to_parameters()
    }

    /// Softmax output for one message, one entry per label.
    pub fn probabilities(&self, sentence: &str) -> Result<Vec<f32>, EngineError> {
        let features = self.vocabulary.encode(sentence);
        self.probabilities_for(features)
    }

    fn probabilities_for(&self, features: Vec<f32>) -> Result<Vec<f32>, EngineError> {
        let x = IntentBatcher::<InferBackend>::new(self.device.clone()).features_row(features);
        self.network
            .forward(x)
            .output
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| EngineError::Tensor(format!("{e:?}")))
    }

    /// Classify a message against a confidence threshold.
    /// A message with no vocabulary token (all-zero features) is always Unknown.
    pub fn predict(&self, sentence: &str, threshold: f32) -> Result<Prediction, EngineError> {
        let features = self.vocabulary.encode(sentence);
        let has_signal = features.iter().any(|&f| f > 0.0);

        let probs = self.probabilities_for(features)?;
        let (best_idx, best_prob) = argmax(&probs)
            .ok_or_else(|| EngineError::Tensor("network produced no outputs".to_string()))?;

        let prediction = match self.labels.get(best_idx) {
            Some(label) if has_signal && best_prob > threshold => Prediction::Known {
                label:       label.to_string(),
                probability: best_prob,
            },
            _ => Prediction::Unknown { probability: best_prob },
        };

        tracing::debug!(
            "'{}' → {} (p={:.4}, threshold={:.2})",
            sentence,
            prediction.label(),
            best_prob,
            threshold
        );
        Ok(prediction)
    }
}

/// Index and value of the largest entry; the first one wins ties.
pub fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    values
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, v)| match best {
            Some((_, b)) if v <= b => best,
            _ => Some((i, v)),
        })
}
