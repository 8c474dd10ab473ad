// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the intents JSON file and the tensors
// the network trains on.
//
// The pipeline flows in this order:
//
//   intents.json
//       │
//       ▼
//   JsonCorpusLoader   → reads and validates intent records
//       │
//       ▼
//   Preprocessor       → lowercases and splits each pattern
//       │
//       ▼
//   VocabularyBuilder  → sorted vocabulary + label set
//       │
//       ▼
//   IntentDataset      → bag-of-words / one-hot pairs
//       │
//       ▼
//   IntentBatcher      → Burn tensors for the trainer
//
// Reference: Burn Book §4 (Datasets and Dataloaders)
//            Rust Book §13 (Iterators and Closures)

/// Loads and validates the intents corpus JSON
pub mod loader;

/// Lowercase + whitespace tokenisation
pub mod preprocessor;

/// Vocabulary, label set and the bag-of-words encoder
pub mod vocabulary;

/// Encoded (features, target) training examples
pub mod dataset;

/// Stacks encoded examples into tensors
pub mod batcher;
