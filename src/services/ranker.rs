use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::{
    Catalog, Diagnostic, Padding, RankOptions, Recommendation, Recommendations, SimilaritySource,
};

/// Recommends titles similar to `query_title`.
///
/// The title is matched exactly against the catalog; duplicates resolve to the
/// lowest index. An unknown title yields an empty result without a diagnostic.
pub fn recommend(
    query_title: &str,
    catalog: &Catalog,
    matrix: &dyn SimilaritySource,
    options: RankOptions,
) -> Recommendations {
    match catalog.find_by_title(query_title) {
        Some(item) => recommend_by_index(item.index, catalog, matrix, options),
        None => {
            tracing::debug!(query = %query_title, "Query title not in catalog");
            Recommendations::empty()
        }
    }
}

/// Recommends titles similar to the catalog item at `query_index`.
///
/// Results are sorted by descending score with ties going to the lower index.
/// Cells that are absent or non-finite never rank, and the query never
/// recommends itself. A catalog/matrix size mismatch returns an empty result
/// carrying a [`Diagnostic`].
pub fn recommend_by_index(
    query_index: usize,
    catalog: &Catalog,
    matrix: &dyn SimilaritySource,
    options: RankOptions,
) -> Recommendations {
    if query_index >= catalog.len() {
        tracing::debug!(query_index, catalog_size = catalog.len(), "Query index out of range");
        return Recommendations::empty();
    }

    if matrix.row_count() != catalog.len() {
        let diagnostic = Diagnostic::SizeMismatch {
            catalog_size: catalog.len(),
            matrix_rows: matrix.row_count(),
        };
        tracing::debug!(
            catalog_size = catalog.len(),
            matrix_rows = matrix.row_count(),
            "Similarity matrix does not match catalog, returning no recommendations"
        );
        return Recommendations::with_diagnostic(diagnostic);
    }

    let ranked = rank_row(query_index, catalog.len(), matrix.row(query_index), options.k);

    let mut items: Vec<Recommendation> = ranked
        .into_iter()
        .filter_map(|(index, score)| {
            catalog.get(index).map(|item| Recommendation {
                index,
                title: item.title.clone(),
                external_id: item.external_id,
                score: Some(score),
            })
        })
        .collect();

    if options.padding == Padding::FillFromCatalog && items.len() < options.k {
        pad_from_catalog(&mut items, query_index, catalog, options.k);
    }

    tracing::debug!(
        query_index,
        k = options.k,
        returned = items.len(),
        "Ranked similar titles"
    );

    Recommendations {
        items,
        diagnostic: None,
    }
}

/// Orders one matrix row into at most `k` `(candidate_index, score)` pairs.
fn rank_row(
    query_index: usize,
    catalog_size: usize,
    row: Vec<(usize, f64)>,
    k: usize,
) -> Vec<(usize, f64)> {
    let mut candidates: Vec<(usize, f64)> = row
        .into_iter()
        .filter(|&(index, score)| index != query_index && index < catalog_size && score.is_finite())
        .collect();

    candidates.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    // A neighbour list may name the same candidate twice; keep its best score.
    let mut seen = HashSet::with_capacity(candidates.len());
    candidates.retain(|(index, _)| seen.insert(*index));

    candidates.truncate(k);
    candidates
}

fn pad_from_catalog(
    items: &mut Vec<Recommendation>,
    query_index: usize,
    catalog: &Catalog,
    k: usize,
) {
    let present: HashSet<usize> = items.iter().map(|item| item.index).collect();
    let missing = k - items.len();

    let fillers: Vec<Recommendation> = catalog
        .items()
        .iter()
        .filter(|item| item.index != query_index && !present.contains(&item.index))
        .take(missing)
        .map(|item| Recommendation {
            index: item.index,
            title: item.title.clone(),
            external_id: item.external_id,
            score: None,
        })
        .collect();

    items.extend(fillers);
}
