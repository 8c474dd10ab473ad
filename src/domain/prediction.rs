// ============================================================
// Layer 3 — Prediction Domain Types
// ============================================================
// The classifier either recognises an intent with enough
// confidence, or it doesn't. Both cases carry the winning
// probability so callers can report confidence either way.
//
//   Known   { label: "investing", probability: 0.91 }
//   Unknown { probability: 0.22 }          ← below threshold
//
// Reference: Rust Book §6 (Enums and Pattern Matching)

use serde::{Deserialize, Serialize};

/// Label reported for messages the classifier cannot place.
pub const UNKNOWN_INTENT: &str = "unknown";

/// Default confidence a prediction must exceed to count as known.
pub const DEFAULT_THRESHOLD: f32 = 0.25;

/// Reply used when the message is not recognised.
pub const FALLBACK_RESPONSE: &str = "I'm not sure about that. Could you rephrase your question \
     or ask about investing, budgeting, retirement, or other finance topics?";

/// Reply used when a recognised intent has no replies in the corpus.
pub const GENERIC_RESPONSE: &str = "I'm here to help with finance questions!";

/// Outcome of classifying one message.
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    Known { label: String, probability: f32 },
    Unknown { probability: f32 },
}

impl Prediction {
    /// The predicted label, or "unknown".
    pub fn label(&self) -> &str {
        match self {
            Prediction::Known { label, .. } => label,
            Prediction::Unknown { .. }      => UNKNOWN_INTENT,
        }
    }

    pub fn probability(&self) -> f32 {
        match self {
            Prediction::Known { probability, .. } | Prediction::Unknown { probability } => *probability,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Prediction::Unknown { .. })
    }
}

/// What a chat turn hands back to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    /// The canned reply text
    pub response: String,

    /// The predicted intent label ("unknown" when unsure)
    pub intent: String,

    /// Probability of the winning intent
    pub confidence: f32,
}
