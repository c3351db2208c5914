// Annotated-document model produced by the pipeline worker.

use serde::{Deserialize, Serialize};

/// Result of a `document.annotate` call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnnotatedDocument {
    pub document: DocumentBody,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentBody {
    pub sentences: SentenceList,
}

/// The worker serializes a one-sentence document as a bare sentence object
/// and a multi-sentence document as an array. Both shapes must decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SentenceList {
    pub sentence: OneOrMany<Sentence>,
}

/// Untagged single-value-or-array wrapper matching the worker's
/// cardinality-dependent serialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::One(item) => std::slice::from_ref(item),
            Self::Many(items) => items,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One sentence as annotated by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Sentence {
    /// Worker-assigned ordinal, 1-based.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Bracketed constituency tree, e.g. `(ROOT (S (NP ...) (VP ...)))`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_tree: Option<String>,
}

impl AnnotatedDocument {
    /// Flatten to one tree per sentence, preserving worker order.
    /// A single-sentence document yields a one-element sequence.
    /// Sentences the pipeline could not tree-annotate are skipped.
    pub fn parse_trees(&self) -> Vec<String> {
        self.document
            .sentences
            .sentence
            .as_slice()
            .iter()
            .filter_map(|sentence| sentence.parsed_tree.clone())
            .collect()
    }
}
