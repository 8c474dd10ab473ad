use crate::data::vocabulary::PreparedCorpus;
use crate::error::EngineError;

/// One training example as numbers: bag-of-words features and a
/// one-hot target.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedExample {
    pub features:    Vec<f32>,
    pub target:      Vec<f32>,
    pub label_index: usize,
}

/// The encoded training set, kept in corpus order.
pub struct IntentDataset {
    examples:    Vec<EncodedExample>,
    input_size:  usize,
    output_size: usize,
}

impl IntentDataset {
    pub fn encode(prepared: &PreparedCorpus) -> Result<Self, EngineError> {
        let examples = prepared
            .examples
            .iter()
            .map(|ex| {
                let label_index = prepared.labels.index_of(&ex.label).ok_or_else(|| {
                    EngineError::CorpusFormat(format!("label '{}' missing from label set", ex.label))
                })?;
                let target = prepared.labels.one_hot(&ex.label).ok_or_else(|| {
                    EngineError::CorpusFormat(format!("label '{}' has no output slot", ex.label))
                })?;
                Ok(EncodedExample {
                    features: prepared.vocabulary.encode_tokens(&ex.tokens),
                    target,
                    label_index,
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        Ok(Self {
            examples,
            input_size:  prepared.vocabulary.len(),
            output_size: prepared.labels.len(),
        })
    }

    pub fn examples(&self) -> &[EncodedExample] {
        &self.examples
    }

    pub fn get(&self, index: usize) -> Option<&EncodedExample> {
        self.examples.get(index)
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }
}
