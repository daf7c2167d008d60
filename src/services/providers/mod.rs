/// Title metadata provider abstraction
///
/// Providers decorate ranked titles with rating, genres, overview, poster,
/// trailer and availability data. They are looked up by the external id
/// carried on each catalog item and never influence ranking.
use crate::{error::AppResult, models::TitleMetadata};

pub mod local;

pub use local::StaticMetadataProvider;

/// Trait for title metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch metadata for one title by its external id
    async fn fetch(&self, external_id: u64) -> AppResult<TitleMetadata>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
