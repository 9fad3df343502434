//! Core types for the document QA service

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, DocumentRecord, FileType, Metadata};
pub use query::{AnalyzeRequest, QueryParams, QueryRequest, DEFAULT_TOP_K};
pub use response::{
    AnalyzeResponse, DeleteResponse, DocumentListResponse, DocumentSummary, ProcessResponse,
    QueryResponse, UploadResponse,
};
