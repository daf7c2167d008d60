use serde::{Deserialize, Serialize};

use super::{TitleMetadata, AVAILABILITY_UNKNOWN};

/// Default number of recommendations per query
pub const DEFAULT_K: usize = 5;

/// What to do when fewer than `k` candidates survive ranking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Padding {
    /// Return the shorter list
    #[default]
    None,
    /// Fill up to `k` with the lowest-index unranked catalog items
    FillFromCatalog,
}

/// Ranking parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankOptions {
    pub k: usize,
    pub padding: Padding,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            padding: Padding::None,
        }
    }
}

impl RankOptions {
    pub fn with_k(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    pub fn padded(mut self) -> Self {
        self.padding = Padding::FillFromCatalog;
        self
    }
}

/// Data-integrity problem detected while ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Matrix row count disagrees with catalog size; no alignment is guessed
    SizeMismatch {
        catalog_size: usize,
        matrix_rows: usize,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::SizeMismatch {
                catalog_size,
                matrix_rows,
            } => write!(
                f,
                "similarity matrix has {} rows but catalog has {} items",
                matrix_rows, catalog_size
            ),
        }
    }
}

/// One ranked title
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub index: usize,
    pub title: String,
    pub external_id: Option<u64>,
    /// Similarity to the query; `None` only for padded entries
    pub score: Option<f64>,
}

/// Ranker output: an ordered, possibly short list plus an optional diagnostic
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Recommendations {
    pub items: Vec<Recommendation>,
    pub diagnostic: Option<Diagnostic>,
}

impl Recommendations {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_diagnostic(diagnostic: Diagnostic) -> Self {
        Self {
            items: Vec::new(),
            diagnostic: Some(diagnostic),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `(title, external_id)` pairs in ranked order
    pub fn titles(&self) -> Vec<(&str, Option<u64>)> {
        self.items
            .iter()
            .map(|item| (item.title.as_str(), item.external_id))
            .collect()
    }
}

const TRAILER_SEARCH_URL: &str = "https://www.youtube.com/results?search_query=";

/// YouTube search link for `"{title} trailer"`
pub fn trailer_search_url(title: &str) -> String {
    format!(
        "{}{}",
        TRAILER_SEARCH_URL,
        urlencoding::encode(&format!("{} trailer", title))
    )
}

/// A recommendation decorated with provider metadata, if any was found in time.
///
/// `trailer_url` and `availability` are always filled: the provider's trailer
/// when it has one, a YouTube search link otherwise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EnrichedRecommendation {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub metadata: Option<TitleMetadata>,
    pub trailer_url: String,
    pub availability: String,
}

impl EnrichedRecommendation {
    pub fn new(recommendation: Recommendation, metadata: Option<TitleMetadata>) -> Self {
        let trailer_url = metadata
            .as_ref()
            .and_then(|m| m.trailer_url.as_deref())
            .filter(|url| !url.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| trailer_search_url(&recommendation.title));

        let availability = metadata
            .as_ref()
            .map(|m| m.availability.summary())
            .unwrap_or_else(|| AVAILABILITY_UNKNOWN.to_string());

        Self {
            recommendation,
            metadata,
            trailer_url,
            availability,
        }
    }
}
