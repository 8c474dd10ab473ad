// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits describing what the system
// talks about: intents, their example phrases and replies,
// and the outcome of classifying a message.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §6 (Enums), §10 (Traits)

// An intent record and the corpus that groups them
pub mod intent;

// Prediction outcome and the reply handed back to the user
pub mod prediction;

// Core abstractions (traits) that other layers implement
pub mod traits;
