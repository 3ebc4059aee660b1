use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const DEFAULT_MIME: &str = "application/octet-stream";

/// An uploaded file as handed over by the upload source. Consumed once by
/// `StateStore::add_artifact`.
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub name: String,
    pub mime: Option<String>,
    pub bytes: Bytes,
}

/// Stored artefact record. Always owned by exactly one section.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub id: String,
    pub name: String,
    pub mime: String,
    pub bytes: Bytes,
    pub section_key: String,
    pub created_at: DateTime<Utc>,
}

impl Artifact {
    pub fn summary(&self) -> ArtifactSummary {
        ArtifactSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            mime: self.mime.clone(),
            size_bytes: self.bytes.len(),
            section_key: self.section_key.clone(),
            created_at: self.created_at,
        }
    }
}

/// Artefact metadata without the payload, as listed to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactSummary {
    pub id: String,
    pub name: String,
    pub mime: String,
    pub size_bytes: usize,
    pub section_key: String,
    pub created_at: DateTime<Utc>,
}

/// Result of a download: everything needed to stream the file back.
#[derive(Debug, Clone)]
pub struct Download {
    pub name: String,
    pub mime: String,
    pub bytes: Bytes,
}
