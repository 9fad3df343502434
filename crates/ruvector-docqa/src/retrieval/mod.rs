//! Chunk storage and similarity search

pub mod index;
pub mod manifest;
pub mod store;

pub use index::{ChunkIndex, SearchResult};
pub use manifest::Manifest;
pub use store::VectorStore;
