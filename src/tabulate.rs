//! Tabulate
//!
//! Build contingency tables from raw categorical observations. Category levels
//! are listed in lexicographic order, each observation is counted in exactly one cell.
use crate::data::ContingencyTable;
use crate::errors::ContingencyError;
use hashbrown::HashMap;
use log::debug;

/// A raw observation exposing its categorical fields by name.
pub trait Record {
    /// The category of this observation for the given field, if present.
    fn category(&self, field: &str) -> Option<&str>;
}

impl Record for HashMap<String, String> {
    fn category(&self, field: &str) -> Option<&str> {
        self.get(field).map(String::as_str)
    }
}

impl Record for std::collections::HashMap<String, String> {
    fn category(&self, field: &str) -> Option<&str> {
        self.get(field).map(String::as_str)
    }
}

impl Record for serde_json::Map<String, serde_json::Value> {
    fn category(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(serde_json::Value::as_str)
    }
}

/// Sorted unique levels and a lookup from level to position.
fn levels<'a>(values: &[&'a str]) -> (Vec<String>, HashMap<&'a str, usize>) {
    let mut unique: Vec<&str> = values.to_vec();
    unique.sort_unstable();
    unique.dedup();
    let index = unique.iter().enumerate().map(|(i, &v)| (v, i)).collect();
    (unique.into_iter().map(String::from).collect(), index)
}

/// Tabulate a single categorical variable into a one-way table.
pub fn from_labels<I, S>(labels: I) -> Result<ContingencyTable, ContingencyError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let owned: Vec<S> = labels.into_iter().collect();
    let values: Vec<&str> = owned.iter().map(AsRef::as_ref).collect();
    let (col_labels, index) = levels(&values);
    if col_labels.len() < 2 {
        return Err(ContingencyError::InvalidInput(format!(
            "at least 2 categories are required, found {}",
            col_labels.len()
        )));
    }
    let mut counts = vec![0i64; col_labels.len()];
    for v in &values {
        counts[index[v]] += 1;
    }
    debug!("Tabulated {} observations into {} categories.", values.len(), col_labels.len());
    ContingencyTable::new(counts, 1, col_labels.len())?.with_labels(vec![String::new()], col_labels)
}

/// Cross-tabulate pairs of (row category, column category).
pub fn from_pairs<I, R, C>(pairs: I) -> Result<ContingencyTable, ContingencyError>
where
    I: IntoIterator<Item = (R, C)>,
    R: AsRef<str>,
    C: AsRef<str>,
{
    let owned: Vec<(R, C)> = pairs.into_iter().collect();
    let row_values: Vec<&str> = owned.iter().map(|(r, _)| r.as_ref()).collect();
    let col_values: Vec<&str> = owned.iter().map(|(_, c)| c.as_ref()).collect();
    cross_tabulate(&row_values, &col_values)
}

/// Build a table from records, using one field (one-way table) or two fields
/// (rows, then columns).
///
/// * `records` - Raw observations.
/// * `fields` - Names of the categorical fields to tabulate.
pub fn from_records<T: Record>(records: &[T], fields: &[&str]) -> Result<ContingencyTable, ContingencyError> {
    match fields {
        [field] => from_labels(extract(records, field)?),
        [row_field, col_field] => {
            let row_values = extract(records, row_field)?;
            let col_values = extract(records, col_field)?;
            let table = cross_tabulate(&row_values, &col_values)?;
            debug!(
                "Cross-tabulated {} by {} into a {}x{} table.",
                row_field,
                col_field,
                table.rows(),
                table.cols()
            );
            Ok(table)
        }
        _ => Err(ContingencyError::InvalidInput(format!(
            "one or two category fields are required, got {}",
            fields.len()
        ))),
    }
}

fn extract<'a, T: Record>(records: &'a [T], field: &str) -> Result<Vec<&'a str>, ContingencyError> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            r.category(field)
                .ok_or_else(|| ContingencyError::InvalidInput(format!("record {} has no category for field {}", i, field)))
        })
        .collect()
}

fn cross_tabulate(row_values: &[&str], col_values: &[&str]) -> Result<ContingencyTable, ContingencyError> {
    let (row_labels, row_index) = levels(row_values);
    let (col_labels, col_index) = levels(col_values);
    if row_labels.len() * col_labels.len() < 2 {
        return Err(ContingencyError::InvalidInput(format!(
            "at least 2 categories are required, found {}x{}",
            row_labels.len(),
            col_labels.len()
        )));
    }
    let cols = col_labels.len();
    let mut counts = vec![0i64; row_labels.len() * cols];
    for (r, c) in row_values.iter().zip(col_values) {
        counts[row_index[r] * cols + col_index[c]] += 1;
    }
    ContingencyTable::new(counts, row_labels.len(), cols)?.with_labels(row_labels, col_labels)
}
