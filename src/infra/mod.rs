// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the filesystem on behalf of the
// engine:
//
//   checkpoint.rs  Model file (bincode, magic + version header)
//                  written atomically, plus the TrainConfig
//                  sidecar as JSON.
//
//   metrics.rs     Epoch loss / accuracy appended to a CSV
//                  file when a metrics directory is given.
//
// Reference: Rust Book §7 (Modules)

/// Model file saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;
