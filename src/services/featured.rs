use rand::Rng;

use crate::models::{Catalog, TitleSummary, PLACEHOLDER_TITLE};

/// Picks `count` distinct catalog titles at random.
///
/// When the catalog holds fewer than `count` items, every item is returned
/// followed by placeholder entries, which carry no index.
pub fn featured_titles<R: Rng + ?Sized>(
    catalog: &Catalog,
    count: usize,
    rng: &mut R,
) -> Vec<TitleSummary> {
    let picked = count.min(catalog.len());

    let mut featured: Vec<TitleSummary> = rand::seq::index::sample(rng, catalog.len(), picked)
        .into_iter()
        .filter_map(|index| catalog.get(index))
        .map(TitleSummary::from)
        .collect();

    featured.extend((picked..count).map(|_| TitleSummary {
        index: None,
        title: PLACEHOLDER_TITLE.to_string(),
    }));

    featured
}
