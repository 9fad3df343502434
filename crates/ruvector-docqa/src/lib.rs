//! ruvector-docqa: question answering over uploaded documents
//!
//! Uploaded PDF, text and CSV files are split into page, whole-file or row
//! chunks, embedded, and indexed in ruvector-core. Questions are answered by
//! an LLM from the top-k retrieved chunks. By default each upload replaces
//! the previous one; `vector_db.scope = "corpus"` keeps every upload.

pub mod config;
pub mod embeddings;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod nlu;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use types::{
    document::{Chunk, DocumentRecord, FileType},
    query::QueryRequest,
    response::QueryResponse,
};

/// Re-export ruvector-core for convenience
pub use ruvector_core;
