//! Question-type classification and named-entity extraction
//!
//! The analysis is reported to clients alongside answers; it does not feed
//! back into retrieval or the generation prompt.

pub mod entities;
pub mod intent;

use serde::{Deserialize, Serialize};

pub use entities::{EntityRecognizer, OllamaEntityRecognizer, PatternEntityRecognizer};
pub use intent::{filter_entities, IntentAnalyzer};

/// A named entity found in text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// PER, ORG, LOC or MISC
    pub entity_group: String,
    /// Surface form, possibly several words
    pub word: String,
    /// Recogniser confidence
    pub score: f32,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
}

/// Result of [`IntentAnalyzer::analyze`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentAnalysis {
    pub question: String,
    /// Candidate labels, best first
    pub labels: Vec<String>,
    /// Scores aligned with `labels`; they sum to 1
    pub scores: Vec<f32>,
    pub top_label: String,
    pub top_score: f32,
    pub entities: Vec<Entity>,
}
