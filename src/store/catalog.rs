use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    models::Catalog,
};

const TITLE_FIELD: &str = "title";
const EXTERNAL_ID_FIELD: &str = "movie_id";

/// Parses a catalog artifact.
///
/// Two shapes are accepted:
/// * a list of records, `[{"title": "...", "movie_id": 19995}, ...]`
/// * a column map keyed by row label, `{"title": {"0": "..."}, "movie_id": {"0": 19995}}`
///
/// A missing title falls back to the row label, a null title becomes `""`,
/// and a missing or unusable id becomes `None`.
pub fn parse_catalog(value: &Value) -> AppResult<Catalog> {
    match value {
        Value::Array(records) => Ok(parse_records(records)),
        Value::Object(columns) => parse_columns(columns),
        other => Err(AppError::InvalidData(format!(
            "catalog must be a list of records or a column map, found {}",
            json_kind(other)
        ))),
    }
}

fn parse_records(records: &[Value]) -> Catalog {
    Catalog::from_rows(records.iter().enumerate().map(|(position, record)| {
        let title = match record.get(TITLE_FIELD) {
            Some(value) => title_text(value),
            None => position.to_string(),
        };
        let external_id = record.get(EXTERNAL_ID_FIELD).and_then(external_id);
        (title, external_id)
    }))
}

fn parse_columns(columns: &Map<String, Value>) -> AppResult<Catalog> {
    let titles = columns.get(TITLE_FIELD).map(column_cells).transpose()?;
    let ids = columns.get(EXTERNAL_ID_FIELD).map(column_cells).transpose()?;

    if titles.is_none() && ids.is_none() {
        return Err(AppError::InvalidData(format!(
            "catalog column map has neither a '{}' nor a '{}' column",
            TITLE_FIELD, EXTERNAL_ID_FIELD
        )));
    }

    let mut labels: Vec<usize> = titles
        .iter()
        .chain(ids.iter())
        .flat_map(|cells| cells.keys().copied())
        .collect();
    labels.sort_unstable();
    labels.dedup();

    Ok(Catalog::from_rows(labels.into_iter().map(|label| {
        let title = match titles.as_ref().and_then(|cells| cells.get(&label)) {
            Some(value) => title_text(value),
            None => label.to_string(),
        };
        let external_id = ids
            .as_ref()
            .and_then(|cells| cells.get(&label))
            .and_then(|value| external_id(value));
        (title, external_id)
    })))
}

/// Cells of one column by row label, from either `{"label": value}` or a positional list
fn column_cells(column: &Value) -> AppResult<HashMap<usize, &Value>> {
    match column {
        Value::Array(cells) => Ok(cells.iter().enumerate().collect()),
        Value::Object(cells) => cells
            .iter()
            .map(|(label, value)| {
                label
                    .trim()
                    .parse::<usize>()
                    .map(|label| (label, value))
                    .map_err(|_| {
                        AppError::InvalidData(format!("catalog row label '{}' is not an index", label))
                    })
            })
            .collect(),
        other => Err(AppError::InvalidData(format!(
            "catalog column must be a list or a map, found {}",
            json_kind(other)
        ))),
    }
}

fn title_text(value: &Value) -> String {
    match value {
        Value::String(title) => title.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Coerces a provider id; zero and non-integral values count as absent.
fn external_id(value: &Value) -> Option<u64> {
    let id = match value {
        Value::Number(number) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };
    id.filter(|id| *id != 0)
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
