/// Metadata provider backed by a local JSON snapshot
///
/// The snapshot maps external ids to metadata records:
/// `{"19995": {"rating": 7.2, "genres": ["Action"], ...}, ...}`.
/// It is read once at startup and served from memory.
use std::{collections::HashMap, path::Path};

use crate::{
    error::{AppError, AppResult},
    models::TitleMetadata,
    services::providers::MetadataProvider,
};

#[derive(Debug, Clone, Default)]
pub struct StaticMetadataProvider {
    entries: HashMap<u64, TitleMetadata>,
}

impl StaticMetadataProvider {
    pub fn new(entries: HashMap<u64, TitleMetadata>) -> Self {
        Self { entries }
    }

    /// Loads a snapshot file; keys that aren't numeric ids are skipped
    pub async fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        let raw: HashMap<String, TitleMetadata> = serde_json::from_slice(&bytes)?;

        let mut entries = HashMap::with_capacity(raw.len());
        for (key, metadata) in raw {
            match key.trim().parse::<u64>() {
                Ok(id) => {
                    entries.insert(id, metadata);
                }
                Err(_) => {
                    tracing::debug!(key = %key, "Skipping metadata entry with non-numeric id");
                }
            }
        }

        tracing::info!(
            path = %path.as_ref().display(),
            entries = entries.len(),
            "Loaded metadata snapshot"
        );

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait::async_trait]
impl MetadataProvider for StaticMetadataProvider {
    async fn fetch(&self, external_id: u64) -> AppResult<TitleMetadata> {
        self.entries
            .get(&external_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("No metadata for title {}", external_id)))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
