// ============================================================
// Layer 3 — Intent Domain Types
// ============================================================
// An intent is one category of user question ("investing",
// "retirement", ...). Each intent comes with:
//   - example phrases the classifier learns from
//   - candidate replies, one of which is returned at chat time
//
// The corpus is the ordered list of these records. Order
// matters: training visits examples in corpus order, which
// keeps runs reproducible.
//
// Example record (JSON):
//   { "tag": "greeting",
//     "patterns":  ["hello", "hi there"],
//     "responses": ["Hi! Ask me about money."] }

use serde::{Deserialize, Serialize};

use crate::domain::prediction::UNKNOWN_INTENT;
use crate::error::EngineError;

/// One intent: its label, example phrases and candidate replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentRecord {
    /// The intent label, e.g. "budgeting"
    pub tag: String,

    /// Example user phrases for this intent
    pub patterns: Vec<String>,

    /// Replies to pick from when this intent is predicted
    pub responses: Vec<String>,
}

impl IntentRecord {
    pub fn new(
        tag:       impl Into<String>,
        patterns:  impl IntoIterator<Item = impl Into<String>>,
        responses: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            tag:       tag.into(),
            patterns:  patterns.into_iter().map(Into::into).collect(),
            responses: responses.into_iter().map(Into::into).collect(),
        }
    }
}

/// The full, validated intents corpus.
///
/// Construction goes through [`Corpus::new`], so every `Corpus`
/// value has non-blank tags and never uses the reserved
/// "unknown" label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    records: Vec<IntentRecord>,
}

impl Corpus {
    /// Validate and wrap a list of records.
    pub fn new(records: Vec<IntentRecord>) -> Result<Self, EngineError> {
        for (i, record) in records.iter().enumerate() {
            if record.tag.trim().is_empty() {
                return Err(EngineError::CorpusFormat(format!(
                    "intent #{i} has an empty tag"
                )));
            }
            if record.tag == UNKNOWN_INTENT {
                return Err(EngineError::CorpusFormat(format!(
                    "intent #{i} uses the reserved tag '{UNKNOWN_INTENT}'"
                )));
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[IntentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replies for the first record carrying `tag`, if any.
    pub fn responses_for(&self, tag: &str) -> Option<&[String]> {
        self.records
            .iter()
            .find(|r| r.tag == tag)
            .map(|r| r.responses.as_slice())
    }
}
