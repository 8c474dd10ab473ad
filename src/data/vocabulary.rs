// ============================================================
// Layer 4 — Vocabulary Builder and Feature Encoder
// ============================================================
// Derives the two fixed orderings a model depends on:
//
//   Vocabulary  — every distinct token in every pattern,
//                 sorted; token i is input feature i
//   LabelSet    — every distinct intent tag, sorted;
//                 label j is output unit j
//
// Sorting (rather than first-seen order) makes both
// orderings a pure function of the corpus contents.
//
// The encoder turns a sentence into a bag-of-words vector:
//
//   vocabulary: ["bond", "buy", "hello", "stock"]
//   sentence:   "Hello, should I buy a stock?"
//   tokens:     {"hello,", "should", "i", "buy", "a", "stock?"}
//   vector:     [0.0,    1.0,   0.0,     0.0]
//
// Unknown tokens contribute nothing. A sentence that shares
// no token with the vocabulary encodes to all zeros.
//
// Reference: Rust Book §8 (Collections)

use std::collections::BTreeSet;

use crate::data::preprocessor::Preprocessor;
use crate::domain::intent::Corpus;
use crate::error::EngineError;

// ─── Vocabulary ───────────────────────────────────────────────────────────────
/// Sorted, duplicate-free list of normalised tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    tokens: Vec<String>,
}

impl Vocabulary {
    /// Build from any token collection; sorts and dedups.
    pub fn from_tokens(tokens: impl IntoIterator<Item = String>) -> Self {
        let set: BTreeSet<String> = tokens.into_iter().collect();
        Self { tokens: set.into_iter().collect() }
    }

    /// Wrap an already sorted list, e.g. one read from a model file.
    /// Fails if the list is unsorted or has duplicates.
    pub fn from_sorted(tokens: Vec<String>) -> Result<Self, EngineError> {
        if !is_strictly_sorted(&tokens) {
            return Err(EngineError::Deserialization(
                "vocabulary is not sorted or contains duplicates".to_string(),
            ));
        }
        Ok(Self { tokens })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Feature index of a token.
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.tokens.binary_search_by(|t| t.as_str().cmp(token)).ok()
    }

    /// Bag-of-words vector for a raw sentence.
    pub fn encode(&self, sentence: &str) -> Vec<f32> {
        let tokens = Preprocessor::new().tokenize(sentence);
        self.encode_tokens(&tokens)
    }

    /// Bag-of-words vector for already tokenised input.
    pub fn encode_tokens(&self, tokens: &[String]) -> Vec<f32> {
        let mut features = vec![0.0f32; self.tokens.len()];
        for token in tokens {
            if let Some(i) = self.index_of(token) {
                features[i] = 1.0;
            }
        }
        features
    }
}

// ─── LabelSet ─────────────────────────────────────────────────────────────────
/// Sorted, duplicate-free list of intent labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    pub fn from_labels(labels: impl IntoIterator<Item = String>) -> Self {
        let set: BTreeSet<String> = labels.into_iter().collect();
        Self { labels: set.into_iter().collect() }
    }

    pub fn from_sorted(labels: Vec<String>) -> Result<Self, EngineError> {
        if !is_strictly_sorted(&labels) {
            return Err(EngineError::Deserialization(
                "label set is not sorted or contains duplicates".to_string(),
            ));
        }
        Ok(Self { labels })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.binary_search_by(|l| l.as_str().cmp(label)).ok()
    }

    /// One-hot target vector for a label.
    pub fn one_hot(&self, label: &str) -> Option<Vec<f32>> {
        let index = self.index_of(label)?;
        let mut target = vec![0.0f32; self.labels.len()];
        target[index] = 1.0;
        Some(target)
    }
}

fn is_strictly_sorted(items: &[String]) -> bool {
    items.windows(2).all(|w| w[0] < w[1])
}

// ─── Training examples ────────────────────────────────────────────────────────
/// One tokenised pattern and the intent it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExample {
    pub tokens: Vec<String>,
    pub label:  String,
}

/// Everything derived from a corpus before encoding.
#[derive(Debug, Clone)]
pub struct PreparedCorpus {
    pub vocabulary: Vocabulary,
    pub labels:     LabelSet,
    /// In corpus order: record by record, pattern by pattern
    pub examples:   Vec<TrainingExample>,
}

// ─── VocabularyBuilder ────────────────────────────────────────────────────────
pub struct VocabularyBuilder {
    preprocessor: Preprocessor,
}

impl VocabularyBuilder {
    pub fn new() -> Self {
        Self { preprocessor: Preprocessor::new() }
    }

    /// Derive vocabulary, label set and training examples.
    pub fn build(&self, corpus: &Corpus) -> Result<PreparedCorpus, EngineError> {
        if corpus.is_empty() {
            return Err(EngineError::CorpusFormat("corpus contains no intents".to_string()));
        }

        let mut examples = Vec::new();
        for record in corpus.records() {
            for pattern in &record.patterns {
                examples.push(TrainingExample {
                    tokens: self.preprocessor.tokenize(pattern),
                    label:  record.tag.clone(),
                });
            }
        }

        let vocabulary = Vocabulary::from_tokens(
            examples.iter().flat_map(|ex| ex.tokens.iter().cloned()),
        );
        if vocabulary.is_empty() {
            return Err(EngineError::CorpusFormat(
                "corpus patterns contain no usable tokens".to_string(),
            ));
        }

        let labels = LabelSet::from_labels(corpus.records().iter().map(|r| r.tag.clone()));

        tracing::debug!(
            "Vocabulary: {} tokens, {} intents, {} examples",
            vocabulary.len(),
            labels.len(),
            examples.len()
        );

        Ok(PreparedCorpus { vocabulary, labels, examples })
    }
}

impl Default for VocabularyBuilder {
    fn default() -> Self {
        Self::new()
    }
}
