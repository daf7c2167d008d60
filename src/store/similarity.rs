use serde_json::Value;

use super::catalog::json_kind;
use crate::{
    error::{AppError, AppResult},
    models::{DenseMatrix, SimilaritySource, SparseTopK},
};

const SPARSE_FORMAT: &str = "top_k";

/// Parses a similarity artifact into a ranker-ready source.
///
/// A list of rows is read as a dense matrix. An object tagged
/// `{"format": "top_k", "rows": [[[j, score], ...], ...]}` is read as
/// per-item neighbour lists.
pub fn parse_similarity(value: &Value) -> AppResult<Box<dyn SimilaritySource>> {
    match value {
        Value::Array(rows) => Ok(Box::new(parse_dense(rows))),
        Value::Object(object) => match object.get("format").and_then(Value::as_str) {
            Some(SPARSE_FORMAT) => {
                let rows = object.get("rows").and_then(Value::as_array).ok_or_else(|| {
                    AppError::InvalidData("top_k similarity is missing its 'rows' list".to_string())
                })?;
                Ok(Box::new(parse_sparse(rows)))
            }
            Some(other) => Err(AppError::InvalidData(format!(
                "unknown similarity format '{}'",
                other
            ))),
            None => Err(AppError::InvalidData(
                "similarity object needs a 'format' field".to_string(),
            )),
        },
        other => Err(AppError::InvalidData(format!(
            "similarity must be a list of rows or a tagged object, found {}",
            json_kind(other)
        ))),
    }
}

fn parse_dense(rows: &[Value]) -> DenseMatrix {
    DenseMatrix::new(
        rows.iter()
            .map(|row| match row_cells(row) {
                Some(cells) => cells.iter().map(coerce_score).collect(),
                None => Vec::new(),
            })
            .collect(),
    )
}

/// Cells of a dense row; `[[...]]` is unwrapped to its single inner row.
fn row_cells(row: &Value) -> Option<&Vec<Value>> {
    let cells = row.as_array()?;
    match cells.as_slice() {
        [Value::Array(inner)] => Some(inner),
        _ => Some(cells),
    }
}

fn parse_sparse(rows: &[Value]) -> SparseTopK {
    SparseTopK::new(
        rows.iter()
            .map(|row| {
                row.as_array()
                    .map(|pairs| pairs.iter().filter_map(neighbour).collect())
                    .unwrap_or_default()
            })
            .collect(),
    )
}

fn neighbour(pair: &Value) -> Option<(usize, f64)> {
    match pair.as_array()?.as_slice() {
        [index, score] => {
            let index = usize::try_from(index.as_u64()?).ok()?;
            Some((index, coerce_score(score)?))
        }
        _ => None,
    }
}

/// Coerces one cell to a finite score; anything else is absent.
pub fn coerce_score(cell: &Value) -> Option<f64> {
    let score = match cell {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    score.filter(|value| value.is_finite())
}
