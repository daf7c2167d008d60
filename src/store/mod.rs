use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

use crate::{
    config::Config,
    error::AppResult,
    models::{Catalog, DenseMatrix, RankOptions, Recommendations, SimilaritySource},
    services::ranker,
};

pub mod catalog;
pub mod similarity;

pub use catalog::parse_catalog;
pub use similarity::parse_similarity;

/// Placeholder catalog size used when the catalog artifact can't be read
pub const FALLBACK_CATALOG_SIZE: usize = 3;

/// Catalog and similarity matrix, loaded once and read-only afterwards
pub struct Dataset {
    catalog: Catalog,
    matrix: Box<dyn SimilaritySource>,
    loaded_at: DateTime<Utc>,
}

/// Operator-facing summary of the loaded data
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DatasetInfo {
    pub catalog_size: usize,
    pub matrix_rows: usize,
    pub consistent: bool,
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    pub fn new(catalog: Catalog, matrix: Box<dyn SimilaritySource>) -> Self {
        Self {
            catalog,
            matrix,
            loaded_at: Utc::now(),
        }
    }

    /// Loads both artifacts named in `config`.
    ///
    /// Never fails: an unreadable catalog becomes a placeholder catalog and an
    /// unreadable matrix becomes an empty one, which the ranker reports as a
    /// size mismatch.
    pub async fn load(config: &Config) -> Self {
        let catalog = match load_catalog(&config.catalog_path).await {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(
                    path = %config.catalog_path,
                    error = %e,
                    "Failed to load catalog, using placeholder titles"
                );
                Catalog::placeholder(FALLBACK_CATALOG_SIZE)
            }
        };

        let matrix: Box<dyn SimilaritySource> = match load_similarity(&config.similarity_path).await {
            Ok(matrix) => matrix,
            Err(e) => {
                tracing::warn!(
                    path = %config.similarity_path,
                    error = %e,
                    "Failed to load similarity matrix, recommendations disabled"
                );
                Box::new(DenseMatrix::default())
            }
        };

        let dataset = Self::new(catalog, matrix);
        let info = dataset.info();

        if info.consistent {
            tracing::info!(
                catalog_size = info.catalog_size,
                matrix_rows = info.matrix_rows,
                "Dataset loaded"
            );
        } else {
            tracing::error!(
                catalog_size = info.catalog_size,
                matrix_rows = info.matrix_rows,
                "Similarity matrix does not match catalog size"
            );
        }

        dataset
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn matrix(&self) -> &dyn SimilaritySource {
        self.matrix.as_ref()
    }

    pub fn info(&self) -> DatasetInfo {
        DatasetInfo {
            catalog_size: self.catalog.len(),
            matrix_rows: self.matrix.row_count(),
            consistent: self.catalog.len() == self.matrix.row_count(),
            loaded_at: self.loaded_at,
        }
    }

    pub fn recommend(&self, title: &str, options: RankOptions) -> Recommendations {
        ranker::recommend(title, &self.catalog, self.matrix(), options)
    }

    pub fn recommend_by_index(&self, index: usize, options: RankOptions) -> Recommendations {
        ranker::recommend_by_index(index, &self.catalog, self.matrix(), options)
    }
}

async fn read_json(path: impl AsRef<Path>) -> AppResult<serde_json::Value> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub async fn load_catalog(path: impl AsRef<Path>) -> AppResult<Catalog> {
    let value = read_json(path).await?;
    parse_catalog(&value)
}

pub async fn load_similarity(path: impl AsRef<Path>) -> AppResult<Box<dyn SimilaritySource>> {
    let value = read_json(path).await?;
    parse_similarity(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_json(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn config_for(catalog_path: &str, similarity_path: &str) -> Config {
        Config {
            catalog_path: catalog_path.to_string(),
            similarity_path: similarity_path.to_string(),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_load_consistent_dataset() {
        let catalog = write_json(r#"[{"title":"A","movie_id":1},{"title":"B","movie_id":2}]"#);
        let matrix = write_json("[[1.0, 0.5], [0.5, 1.0]]");
        let config = config_for(
            catalog.path().to_str().unwrap(),
            matrix.path().to_str().unwrap(),
        );

        let dataset = Dataset::load(&config).await;
        let info = dataset.info();
        assert_eq!(info.catalog_size, 2);
        assert_eq!(info.matrix_rows, 2);
        assert!(info.consistent);

        let result = dataset.recommend("A", RankOptions::default());
        assert_eq!(result.titles(), vec![("B", Some(2))]);
    }

    #[tokio::test]
    async fn test_missing_catalog_falls_back_to_placeholders() {
        let matrix = write_json("[[1.0]]");
        let config = config_for("/nonexistent/catalog.json", matrix.path().to_str().unwrap());

        let dataset = Dataset::load(&config).await;
        assert_eq!(dataset.catalog().len(), FALLBACK_CATALOG_SIZE);
        assert!(!dataset.info().consistent);
    }

    #[tokio::test]
    async fn test_corrupt_matrix_disables_recommendations() {
        let catalog = write_json(r#"[{"title":"A"},{"title":"B"}]"#);
        let matrix = write_json("{ not json");
        let config = config_for(
            catalog.path().to_str().unwrap(),
            matrix.path().to_str().unwrap(),
        );

        let dataset = Dataset::load(&config).await;
        assert_eq!(dataset.info().matrix_rows, 0);

        let result = dataset.recommend("A", RankOptions::default());
        assert!(result.is_empty());
        assert!(result.diagnostic.is_some());
    }

    #[tokio::test]
    async fn test_load_catalog_reports_io_error() {
        let result = load_catalog("/nonexistent/catalog.json").await;
        assert!(matches!(result, Err(crate::error::AppError::Io(_))));
    }
}
