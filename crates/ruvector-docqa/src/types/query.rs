//! Request types

use serde::{Deserialize, Serialize};

/// Number of chunks retrieved when the caller does not say
pub const DEFAULT_TOP_K: usize = 3;

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

/// JSON body of `POST /query`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question to answer
    pub question: String,
}

impl QueryRequest {
    /// Create a new query
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// Query-string parameters of `POST /query`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QueryParams {
    /// Number of chunks to retrieve (default: 3)
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self { top_k: DEFAULT_TOP_K }
    }
}

/// JSON body of `POST /analyze`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Text to classify and scan for entities
    pub question: String,
    /// Keep only entities of these groups in `filtered_entities`
    #[serde(default)]
    pub entity_types: Option<Vec<String>>,
}
