// ============================================================
// Layer 4 — Intent Batcher
// ============================================================
// Stacks encoded examples into Burn tensors.
//
// Two shapes of batch are used by the trainer:
//   - one example at a time ([1, V] and [1, L]) for the
//     stochastic update step
//   - the whole training set ([N, V] and [N, L]) for the
//     periodic loss/accuracy report
//
// Rows are laid out in the order the examples are given:
//   [e1_f1, e1_f2, ..., e1_fV, e2_f1, ..., eN_fV] → [N, V]
//
// Reference: Burn Book §4 (Batcher)
//            Rust Book §8 (Vectors)

use burn::tensor::{backend::Backend, Tensor, TensorData};

use crate::data::dataset::EncodedExample;

// ─── IntentBatch ──────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct IntentBatch<B: Backend> {
    /// Bag-of-words rows — shape: [batch_size, vocabulary_size]
    pub features: Tensor<B, 2>,

    /// One-hot rows — shape: [batch_size, label_count]
    pub targets: Tensor<B, 2>,
}

// ─── IntentBatcher ────────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct IntentBatcher<B: Backend> {
    /// The device to create tensors on
    pub device: B::Device,
}

impl<B: Backend> IntentBatcher<B> {
    /// Create a new batcher for the given device
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    /// Stack `items` into one batch. `items` must be non-empty and
    /// every example must share the same feature and target widths.
    pub fn batch(&self, items: &[EncodedExample]) -> IntentBatch<B> {
        let batch_size  = items.len();
        let input_size  = items.first().map_or(0, |e| e.features.len());
        let output_size = items.first().map_or(0, |e| e.target.len());

        let features_flat: Vec<f32> = items
            .iter()
            .flat_map(|e| e.features.iter().copied())
            .collect();
        let targets_flat: Vec<f32> = items
            .iter()
            .flat_map(|e| e.target.iter().copied())
            .collect();

        IntentBatch {
            features: matrix(features_flat, batch_size, input_size, &self.device),
            targets:  matrix(targets_flat, batch_size, output_size, &self.device),
        }
    }

    /// Single-row batch of raw features, used at inference time.
    pub fn features_row(&self, features: Vec<f32>) -> Tensor<B, 2> {
        let width = features.len();
        matrix(features, 1, width, &self.device)
    }
}

/// Row-major values → [rows, cols] float tensor.
pub fn matrix<B: Backend>(values: Vec<f32>, rows: usize, cols: usize, device: &B::Device) -> Tensor<B, 2> {
    Tensor::from_data(TensorData::new(values, [rows, cols]), device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::CpuBackend;

    #[test]
    fn test_batch_shapes() {
        let items = vec![
            EncodedExample { features: vec![1.0, 0.0, 1.0], target: vec![1.0, 0.0], label_index: 0 },
            EncodedExample { features: vec![0.0, 1.0, 0.0], target: vec![0.0, 1.0], label_index: 1 },
        ];
        let batcher = IntentBatcher::<CpuBackend>::new(Default::default());
        let batch   = batcher.batch(&items);
        assert_eq!(batch.features.dims(), [2, 3]);
        assert_eq!(batch.targets.dims(), [2, 2]);

        let values = batch.features.into_data().to_vec::<f32>().unwrap();
        assert_eq!(values, vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_single_row() {
        let batcher = IntentBatcher::<CpuBackend>::new(Default::default());
        let row     = batcher.features_row(vec![0.0, 1.0]);
        assert_eq!(row.dims(), [1, 2]);
    }
}
