//! Data
//!
//! Dense row-major containers for observed and expected frequencies.
use crate::errors::ContingencyError;
use crate::utils::{col_sums, row_sums};
use serde::{Deserialize, Serialize};
use std::fmt;

fn default_labels(n: usize) -> Vec<String> {
    (1..=n).map(|i| i.to_string()).collect()
}

/// Observed counts cross-classified by a row and a column variable.
///
/// Counts are stored in a single contiguous block in row-major order.
/// A one-sample (one-way) table is represented with a single row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawContingencyTable")]
pub struct ContingencyTable {
    counts: Vec<u64>,
    rows: usize,
    cols: usize,
    row_labels: Vec<String>,
    col_labels: Vec<String>,
}

impl ContingencyTable {
    /// Create a new table from row-major counts.
    ///
    /// * `counts` - The counts, in row-major order. Signed so that negative
    ///   values coming from the caller can be rejected instead of wrapped.
    /// * `rows` - Number of rows.
    /// * `cols` - Number of columns.
    pub fn new(counts: Vec<i64>, rows: usize, cols: usize) -> Result<Self, ContingencyError> {
        if rows == 0 || cols == 0 {
            return Err(ContingencyError::InvalidInput(format!(
                "table must have at least one row and one column, got {}x{}",
                rows, cols
            )));
        }
        if rows.checked_mul(cols) != Some(counts.len()) {
            return Err(ContingencyError::InvalidInput(format!(
                "{} counts provided for a {}x{} table",
                counts.len(),
                rows,
                cols
            )));
        }
        if counts.len() < 2 {
            return Err(ContingencyError::InvalidInput(
                "at least 2 categories are required".to_string(),
            ));
        }
        let counts = counts
            .into_iter()
            .enumerate()
            .map(|(idx, c)| {
                u64::try_from(c).map_err(|_| {
                    ContingencyError::InvalidInput(format!(
                        "negative count {} at row {}, column {}",
                        c,
                        idx / cols,
                        idx % cols
                    ))
                })
            })
            .collect::<Result<Vec<u64>, ContingencyError>>()?;
        // Margins never exceed the grand total, which must fit in an i64.
        counts
            .iter()
            .try_fold(0i64, |acc, &c| acc.checked_add(c as i64))
            .ok_or_else(|| ContingencyError::InvalidInput(format!("grand total exceeds {}", i64::MAX)))?;
        Ok(ContingencyTable {
            counts,
            rows,
            cols,
            row_labels: default_labels(rows),
            col_labels: default_labels(cols),
        })
    }

    /// Create a table from a vector of rows.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, ContingencyError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, |r| r.len());
        if let Some(i) = rows.iter().position(|r| r.len() != n_cols) {
            return Err(ContingencyError::InvalidInput(format!(
                "row {} has {} columns, expected {}",
                i,
                rows[i].len(),
                n_cols
            )));
        }
        ContingencyTable::new(rows.into_iter().flatten().collect(), n_rows, n_cols)
    }

    /// Create a one-way table from named category counts.
    pub fn from_counts<S: Into<String>>(labels: Vec<S>, counts: Vec<i64>) -> Result<Self, ContingencyError> {
        let cols = counts.len();
        let labels = labels.into_iter().map(Into::into).collect();
        ContingencyTable::new(counts, 1, cols)?.with_labels(vec![String::new()], labels)
    }

    /// Attach row and column category labels.
    pub fn with_labels(mut self, row_labels: Vec<String>, col_labels: Vec<String>) -> Result<Self, ContingencyError> {
        if row_labels.len() != self.rows || col_labels.len() != self.cols {
            return Err(ContingencyError::InvalidInput(format!(
                "{} row labels and {} column labels provided for a {}x{} table",
                row_labels.len(),
                col_labels.len(),
                self.rows,
                self.cols
            )));
        }
        self.row_labels = row_labels;
        self.col_labels = col_labels;
        Ok(self)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn n_cells(&self) -> usize {
        self.counts.len()
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    pub fn col_labels(&self) -> &[String] {
        &self.col_labels
    }

    /// Get the count at row `i` and column `j`.
    pub fn get(&self, i: usize, j: usize) -> u64 {
        self.counts[i * self.cols + j]
    }

    /// Get access to a row of the table.
    pub fn row(&self, i: usize) -> &[u64] {
        &self.counts[i * self.cols..(i + 1) * self.cols]
    }

    pub fn grand_total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn row_totals(&self) -> Vec<u64> {
        (0..self.rows).map(|i| self.row(i).iter().sum()).collect()
    }

    pub fn col_totals(&self) -> Vec<u64> {
        (0..self.cols)
            .map(|j| (0..self.rows).map(|i| self.get(i, j)).sum())
            .collect()
    }

    /// A table with a single row or a single column, tested for goodness of fit.
    pub fn is_one_way(&self) -> bool {
        self.rows == 1 || self.cols == 1
    }

    pub fn is_2x2(&self) -> bool {
        self.rows == 2 && self.cols == 2
    }

    /// Counts converted to floating point, row-major.
    pub fn as_f64(&self) -> Vec<f64> {
        self.counts.iter().map(|&c| c as f64).collect()
    }
}

impl fmt::Display for ContingencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .col_labels
            .iter()
            .map(|l| l.len())
            .chain(self.counts.iter().map(|c| c.to_string().len()))
            .max()
            .unwrap_or(1);
        let label_width = self.row_labels.iter().map(|l| l.len()).max().unwrap_or(0);
        write!(f, "{:label_width$}", "")?;
        for l in &self.col_labels {
            write!(f, " {:>width$}", l)?;
        }
        for i in 0..self.rows {
            writeln!(f)?;
            write!(f, "{:label_width$}", self.row_labels[i])?;
            for c in self.row(i) {
                write!(f, " {:>width$}", c)?;
            }
        }
        Ok(())
    }
}

// Serialized form of a table, checked by `ContingencyTable::new` on the way in.
#[derive(Deserialize)]
struct RawContingencyTable {
    counts: Vec<i64>,
    rows: usize,
    cols: usize,
    row_labels: Vec<String>,
    col_labels: Vec<String>,
}

impl TryFrom<RawContingencyTable> for ContingencyTable {
    type Error = ContingencyError;

    fn try_from(raw: RawContingencyTable) -> Result<Self, Self::Error> {
        ContingencyTable::new(raw.counts, raw.rows, raw.cols)?.with_labels(raw.row_labels, raw.col_labels)
    }
}

/// Expected frequencies under the null hypothesis, same shape as the observed table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawExpectedTable")]
pub struct ExpectedTable {
    values: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl ExpectedTable {
    pub(crate) fn new(values: Vec<f64>, rows: usize, cols: usize) -> Self {
        ExpectedTable { values, rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the expected value at row `i` and column `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.cols + j]
    }

    pub fn row_totals(&self) -> Vec<f64> {
        row_sums(&self.values, self.rows, self.cols)
    }

    pub fn col_totals(&self) -> Vec<f64> {
        col_sums(&self.values, self.rows, self.cols)
    }

    /// Smallest expected value of the table.
    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }
}

#[derive(Deserialize)]
struct RawExpectedTable {
    values: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl TryFrom<RawExpectedTable> for ExpectedTable {
    type Error = ContingencyError;

    fn try_from(raw: RawExpectedTable) -> Result<Self, Self::Error> {
        if raw.rows == 0 || raw.cols == 0 || raw.rows.checked_mul(raw.cols) != Some(raw.values.len()) {
            return Err(ContingencyError::InvalidInput(format!(
                "{} expected values provided for a {}x{} table",
                raw.values.len(),
                raw.rows,
                raw.cols
            )));
        }
        if raw.values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ContingencyError::InvalidInput(
                "expected values must be finite and non-negative".to_string(),
            ));
        }
        Ok(ExpectedTable::new(raw.values, raw.rows, raw.cols))
    }
}
