use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod recommendation;
pub mod similarity;

pub use catalog::{Catalog, Item, PLACEHOLDER_TITLE};
pub use recommendation::{
    trailer_search_url, Diagnostic, EnrichedRecommendation, Padding, RankOptions, Recommendation,
    Recommendations, DEFAULT_K,
};
pub use similarity::{DenseMatrix, SimilaritySource, SparseTopK};

// ============================================================================
// Title metadata
// ============================================================================

/// Enrichment data for one title, as supplied by a metadata provider
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TitleMetadata {
    /// Average user rating on a 0-10 scale
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub trailer_url: Option<String>,
    #[serde(default)]
    pub availability: Availability,
}

/// Where a title can be watched
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Availability {
    /// Subscription services streaming the title
    #[serde(default)]
    pub streaming: Vec<String>,
    /// Whether the title can be rented or bought online
    #[serde(default)]
    pub rent_or_buy: bool,
}

/// Shown when a provider has nothing on where to watch a title
pub const AVAILABILITY_UNKNOWN: &str = "Availability info not found";

impl Availability {
    pub fn is_known(&self) -> bool {
        !self.streaming.is_empty() || self.rent_or_buy
    }

    /// One-line description for a title card; streaming wins over rent/buy
    pub fn summary(&self) -> String {
        if !self.is_known() {
            AVAILABILITY_UNKNOWN.to_string()
        } else if !self.streaming.is_empty() {
            format!("Streaming on: {}", self.streaming.join(", "))
        } else {
            "Available to rent/buy online".to_string()
        }
    }
}

/// Catalog entry as exposed to the title picklist.
///
/// `index` is `None` for placeholder entries that stand in for missing titles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitleSummary {
    pub index: Option<usize>,
    pub title: String,
}

impl From<&Item> for TitleSummary {
    fn from(item: &Item) -> Self {
        Self {
            index: Some(item.index),
            title: item.title.clone(),
        }
    }
}
