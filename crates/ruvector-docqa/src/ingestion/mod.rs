//! Document ingestion

pub mod parser;

pub use parser::{DocumentProcessor, ProcessedDocument};
