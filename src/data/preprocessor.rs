// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Turns a raw sentence into the normalised tokens the
// vocabulary is built from and the encoder looks up.
//
// Normalisation is deliberately minimal:
//   1. Lowercase the whole sentence
//   2. Split on any run of whitespace
//   3. Drop tokens that are exactly one punctuation mark
//      from the ignore set: ? ! . ,
//
// Punctuation glued to a word is NOT stripped:
//   "What are stocks?" → ["what", "are", "stocks?"]
//   "What are stocks ?" → ["what", "are", "stocks"]
//
// Training and inference must both go through this one
// function, otherwise feature indices drift apart.
//
// Reference: Rust Book §8 (Strings in Rust)
//            Rust Book §13 (Iterators)

/// Standalone tokens discarded during normalisation.
pub const IGNORE_TOKENS: [&str; 4] = ["?", "!", ".", ","];

pub struct Preprocessor;

impl Preprocessor {
    /// Create a new Preprocessor instance
    pub fn new() -> Self {
        Self
    }

    /// Lowercase, split on whitespace, drop ignored marks.
    /// Keeps the original token order and repeats.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split_whitespace()
            .filter(|tok| !IGNORE_TOKENS.contains(tok))
            .map(str::to_string)
            .collect()
    }
}

/// Implement Default so Preprocessor can be created with Preprocessor::default()
impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
