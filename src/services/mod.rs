pub mod enrichment;
pub mod featured;
pub mod providers;
pub mod ranker;

pub use enrichment::enrich;
pub use featured::featured_titles;
pub use providers::{MetadataProvider, StaticMetadataProvider};
pub use ranker::{recommend, recommend_by_index};
