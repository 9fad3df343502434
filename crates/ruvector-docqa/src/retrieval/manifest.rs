//! Persistent list of the documents currently visible in the store

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::Result;
use crate::types::DocumentRecord;

/// Live documents, in ingestion order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub documents: Vec<DocumentRecord>,
}

impl Manifest {
    /// Load from `path`; a missing file is an empty manifest
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write to a sibling temp file, then rename over `path`
    pub async fn save(&self, path: &Path) -> Result<()> {
        let tmp = temp_path(path);
        let json = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Ids of the live documents
    pub fn live_ids(&self) -> HashSet<Uuid> {
        self.documents.iter().map(|d| d.id).collect()
    }

    /// Total chunks across live documents
    pub fn chunk_count(&self) -> usize {
        self.documents.iter().map(|d| d.chunk_ids.len()).sum()
    }

    pub fn get(&self, id: &Uuid) -> Option<&DocumentRecord> {
        self.documents.iter().find(|d| d.id == *id)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
