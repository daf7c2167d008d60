/// Read access to a precomputed pairwise similarity table.
///
/// Implementations never assume symmetry: a query at index `i` only ever reads row `i`.
pub trait SimilaritySource: Send + Sync {
    /// Number of rows; must equal the catalog size for the data to be usable
    fn row_count(&self) -> usize;

    /// Finite `(candidate_index, score)` pairs of row `index`.
    ///
    /// Absent and non-finite cells are left out. An out-of-range row yields nothing.
    fn row(&self, index: usize) -> Vec<(usize, f64)>;
}

/// Square table of optional scores, `None` where the cell was missing or unusable
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DenseMatrix {
    rows: Vec<Vec<Option<f64>>>,
}

impl DenseMatrix {
    /// Non-finite values are stored as absent.
    pub fn new(rows: Vec<Vec<Option<f64>>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| cell.filter(|value| value.is_finite()))
                    .collect()
            })
            .collect();

        Self { rows }
    }

    pub fn from_values(rows: Vec<Vec<f64>>) -> Self {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Some).collect())
                .collect(),
        )
    }
}

impl SimilaritySource for DenseMatrix {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row(&self, index: usize) -> Vec<(usize, f64)> {
        self.rows
            .get(index)
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter_map(|(column, cell)| cell.map(|score| (column, score)))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Top-K-per-item neighbour lists, one list per catalog row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseTopK {
    rows: Vec<Vec<(usize, f64)>>,
}

impl SparseTopK {
    pub fn new(rows: Vec<Vec<(usize, f64)>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().filter(|(_, score)| score.is_finite()).collect())
            .collect();

        Self { rows }
    }
}

impl SimilaritySource for SparseTopK {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row(&self, index: usize) -> Vec<(usize, f64)> {
        self.rows.get(index).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_row_drops_absent_and_non_finite() {
        let matrix = DenseMatrix::new(vec![vec![
            Some(1.0),
            Some(f64::NAN),
            None,
            Some(f64::INFINITY),
            Some(0.3),
        ]]);

        assert_eq!(matrix.row(0), vec![(0, 1.0), (4, 0.3)]);
    }

    #[test]
    fn test_dense_out_of_range_row_is_empty() {
        let matrix = DenseMatrix::from_values(vec![vec![1.0]]);
        assert_eq!(matrix.row_count(), 1);
        assert!(matrix.row(7).is_empty());
    }

    #[test]
    fn test_dense_does_not_assume_symmetry() {
        let matrix = DenseMatrix::from_values(vec![vec![1.0, 0.9], vec![0.1, 1.0]]);
        assert_eq!(matrix.row(0)[1], (1, 0.9));
        assert_eq!(matrix.row(1)[0], (0, 0.1));
    }

    #[test]
    fn test_sparse_row_filters_non_finite() {
        let matrix = SparseTopK::new(vec![vec![(2, 0.7), (1, f64::NAN)], vec![]]);
        assert_eq!(matrix.row_count(), 2);
        assert_eq!(matrix.row(0), vec![(2, 0.7)]);
        assert!(matrix.row(1).is_empty());
    }
}
