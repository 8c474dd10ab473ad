// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains the Burn framework specific code.
// Apart from the batcher that builds input tensors, no other
// layer touches tensors directly.
//
// What's in this layer:
//
//   model.rs      — The two-layer intent network
//                   • sigmoid hidden layer (clamped)
//                   • softmax output layer (max-stabilised)
//                   • hand-written backprop update
//
//   trainer.rs    — The training loop
//                   Seeded init, per-example SGD in corpus
//                   order, periodic MSE/accuracy report
//
//   inferencer.rs — The classifier
//                   Vocabulary + labels + network, one
//                   forward pass per message, threshold
//
// Everything runs on the CPU NdArray backend.
//
// Reference: Burn Book §3 (Building Blocks)

/// Backend used for training and inference
pub type CpuBackend = burn::backend::NdArray<f32>;

/// Two-layer feedforward network and its update rule
pub mod model;

/// Epoch loop with stochastic single-example updates
pub mod trainer;

/// Trained classifier: encode, forward, threshold
pub mod inferencer;
