use reelmatch_api::{
    models::{Catalog, DenseMatrix, Diagnostic, RankOptions, Recommendations},
    services::{recommend, recommend_by_index},
};

fn abc() -> Catalog {
    Catalog::from_rows(vec![
        ("A".to_string(), Some(100)),
        ("B".to_string(), Some(200)),
        ("C".to_string(), Some(300)),
    ])
}

fn matrix_with_row_a(row_a: Vec<Option<f64>>) -> DenseMatrix {
    DenseMatrix::new(vec![
        row_a,
        vec![Some(0.8), Some(1.0), Some(0.4)],
        vec![Some(0.2), Some(0.4), Some(1.0)],
    ])
}

fn titles(result: &Recommendations) -> Vec<&str> {
    result.items.iter().map(|item| item.title.as_str()).collect()
}

#[test]
fn test_scenario_ranked_by_score() {
    let matrix = matrix_with_row_a(vec![Some(1.0), Some(0.8), Some(0.2)]);
    let result = recommend("A", &abc(), &matrix, RankOptions::with_k(2));

    assert_eq!(titles(&result), vec!["B", "C"]);
    let scores: Vec<Option<f64>> = result.items.iter().map(|item| item.score).collect();
    assert_eq!(scores, vec![Some(0.8), Some(0.2)]);
}

#[test]
fn test_scenario_tie_broken_by_lower_index() {
    let matrix = matrix_with_row_a(vec![Some(1.0), Some(0.5), Some(0.5)]);
    let result = recommend("A", &abc(), &matrix, RankOptions::with_k(1));
    assert_eq!(titles(&result), vec!["B"]);
}

#[test]
fn test_scenario_unknown_title() {
    let matrix = matrix_with_row_a(vec![Some(1.0), Some(0.8), Some(0.2)]);
    let result = recommend("Z", &abc(), &matrix, RankOptions::default());
    assert!(result.is_empty());
}

#[test]
fn test_scenario_nan_excluded_and_not_padded() {
    let matrix = matrix_with_row_a(vec![Some(1.0), Some(f64::NAN), Some(0.3)]);
    let result = recommend("A", &abc(), &matrix, RankOptions::with_k(2));
    assert_eq!(titles(&result), vec!["C"]);
}

#[test]
fn test_scenario_size_mismatch() {
    let matrix = DenseMatrix::from_values(vec![vec![0.1; 5]; 5]);
    let result = recommend("A", &abc(), &matrix, RankOptions::default());

    assert!(result.is_empty());
    assert_eq!(
        result.diagnostic,
        Some(Diagnostic::SizeMismatch {
            catalog_size: 3,
            matrix_rows: 5,
        })
    );
}

/// Deterministic pseudo-random scores with repeats, gaps and bad cells
fn noisy_matrix(size: usize) -> DenseMatrix {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    let rows = (0..size)
        .map(|_| {
            (0..size)
                .map(|_| match next() % 10 {
                    0 => None,
                    1 => Some(f64::NAN),
                    2 => Some(f64::INFINITY),
                    n => Some((n % 4) as f64 / 4.0),
                })
                .collect()
        })
        .collect();

    DenseMatrix::new(rows)
}

#[test]
fn test_properties_hold_for_every_query() {
    let size = 40;
    let catalog = Catalog::from_rows((0..size).map(|i| (format!("Title {}", i), Some(i as u64 + 1))));
    let matrix = noisy_matrix(size);

    for k in [1, 5, 12, 60] {
        for query in 0..size {
            let result = recommend_by_index(query, &catalog, &matrix, RankOptions::with_k(k));

            assert!(result.len() <= k);
            assert!(result.diagnostic.is_none());
            assert!(result.items.iter().all(|item| item.index != query));
            assert!(result.items.iter().all(|item| item.score.is_some_and(f64::is_finite)));

            for pair in result.items.windows(2) {
                let (first, second) = (&pair[0], &pair[1]);
                let (a, b) = (first.score.unwrap(), second.score.unwrap());
                assert!(a >= b);
                if a == b {
                    assert!(first.index < second.index);
                }
            }

            let again = recommend_by_index(query, &catalog, &matrix, RankOptions::with_k(k));
            assert_eq!(result, again);
        }
    }
}

#[test]
fn test_catalog_and_matrix_are_shareable_across_threads() {
    let size = 25;
    let catalog = std::sync::Arc::new(Catalog::from_rows(
        (0..size).map(|i| (format!("Title {}", i), None)),
    ));
    let matrix = std::sync::Arc::new(noisy_matrix(size));
    let expected = recommend("Title 3", &catalog, matrix.as_ref(), RankOptions::default());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let catalog = catalog.clone();
            let matrix = matrix.clone();
            std::thread::spawn(move || {
                recommend("Title 3", &catalog, matrix.as_ref(), RankOptions::default())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
