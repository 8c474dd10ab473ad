// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish a
// specific goal (training, or answering a chat message).
//
// Rules for this layer:
//   - No tensor math here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The model handle shared by both workflows
pub mod engine;

// The training workflow
pub mod train_use_case;

// The chat workflow
pub mod ask_use_case;
