//! Expected
//!
//! Expected frequencies under the null hypothesis and the residuals derived from them.
//! Two-way tables use the independence model, one-way tables use null proportions.
use crate::constants::LOW_EXPECTED_THRESHOLD;
use crate::data::{ContingencyTable, ExpectedTable};
use crate::errors::ContingencyError;

/// Expected frequencies of a table.
///
/// Two-way tables: `E_ij = r_i * c_j / n`. One-way tables are tested for goodness
/// of fit against equal proportions.
pub fn compute_expected(table: &ContingencyTable) -> Result<ExpectedTable, ContingencyError> {
    if table.is_one_way() {
        compute_expected_proportions(table, None)
    } else {
        compute_expected_independence(table)
    }
}

/// Expected frequencies of a two-way table under independence of rows and columns.
pub fn compute_expected_independence(table: &ContingencyTable) -> Result<ExpectedTable, ContingencyError> {
    let n = table.grand_total() as f64;
    if n == 0.0 {
        return Err(ContingencyError::EmptyData);
    }
    let row_totals = table.row_totals();
    let col_totals = table.col_totals();
    let mut values = Vec::with_capacity(table.n_cells());
    for r in &row_totals {
        for c in &col_totals {
            values.push(*r as f64 * *c as f64 / n);
        }
    }
    Ok(ExpectedTable::new(values, table.rows(), table.cols()))
}

/// Expected frequencies of a one-way table, `E_j = n * p_j`.
///
/// * `table` - A table with a single row or a single column.
/// * `probabilities` - Null proportions, one per cell. Equal proportions when `None`.
pub fn compute_expected_proportions(
    table: &ContingencyTable,
    probabilities: Option<&[f64]>,
) -> Result<ExpectedTable, ContingencyError> {
    if !table.is_one_way() {
        return Err(ContingencyError::InvalidConfiguration(format!(
            "null proportions apply to one-way tables, got a {}x{} table",
            table.rows(),
            table.cols()
        )));
    }
    let n = table.grand_total() as f64;
    if n == 0.0 {
        return Err(ContingencyError::EmptyData);
    }
    let k = table.n_cells();
    let values = match probabilities {
        None => vec![n / k as f64; k],
        Some(p) => {
            if p.len() != k {
                return Err(ContingencyError::InvalidInput(format!(
                    "{} probabilities provided for {} categories",
                    p.len(),
                    k
                )));
            }
            p.iter().map(|pj| n * pj).collect()
        }
    };
    Ok(ExpectedTable::new(values, table.rows(), table.cols()))
}

/// Check null proportions, optionally rescaling them to sum to one.
pub fn normalize_probabilities(probabilities: &[f64], rescale: bool) -> Result<Vec<f64>, ContingencyError> {
    if probabilities.iter().any(|p| p.is_nan() || *p < 0.0) {
        return Err(ContingencyError::InvalidInput(
            "probabilities must be non-negative".to_string(),
        ));
    }
    let total: f64 = probabilities.iter().sum();
    if rescale {
        if total == 0.0 {
            return Err(ContingencyError::InvalidInput(
                "probabilities must not all be zero".to_string(),
            ));
        }
        Ok(probabilities.iter().map(|p| p / total).collect())
    } else if (total - 1.0).abs() > f64::EPSILON.sqrt() {
        Err(ContingencyError::InvalidInput(format!(
            "probabilities must sum to 1, got {}",
            total
        )))
    } else {
        Ok(probabilities.to_vec())
    }
}

/// True if any expected frequency is below 5.
pub fn low_expected_cell_warning(expected: &ExpectedTable) -> bool {
    expected.values().iter().any(|&e| e < LOW_EXPECTED_THRESHOLD)
}

/// Pearson residuals `(O - E) / sqrt(E)`, row-major.
pub fn pearson_residuals(observed: &ContingencyTable, expected: &ExpectedTable) -> Vec<f64> {
    observed
        .counts()
        .iter()
        .zip(expected.values())
        .map(|(&o, &e)| (o as f64 - e) / e.sqrt())
        .collect()
}

/// Standardized residuals, row-major.
///
/// Two-way tables: `(O - E) / sqrt(E (1 - r_i/n) (1 - c_j/n))`.
/// One-way tables: `(O - E) / sqrt(E (1 - p_j))` with `p_j = E_j / n`.
pub fn standardized_residuals(observed: &ContingencyTable, expected: &ExpectedTable) -> Vec<f64> {
    let n = observed.grand_total() as f64;
    let cols = observed.cols();
    if observed.is_one_way() {
        return observed
            .counts()
            .iter()
            .zip(expected.values())
            .map(|(&o, &e)| (o as f64 - e) / (e * (1.0 - e / n)).sqrt())
            .collect();
    }
    let row_totals = observed.row_totals();
    let col_totals = observed.col_totals();
    observed
        .counts()
        .iter()
        .zip(expected.values())
        .enumerate()
        .map(|(idx, (&o, &e))| {
            let row_share = row_totals[idx / cols] as f64 / n;
            let col_share = col_totals[idx % cols] as f64 / n;
            (o as f64 - e) / (e * (1.0 - row_share) * (1.0 - col_share)).sqrt()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smile_weather() -> ContingencyTable {
        ContingencyTable::from_rows(vec![vec![37, 33], vec![25, 50]]).unwrap()
    }

    #[test]
    fn test_expected_independence() {
        let expected = compute_expected(&smile_weather()).unwrap();
        assert!((expected.get(0, 0) - 70.0 * 62.0 / 145.0).abs() < 1e-12);
        assert!((expected.get(1, 1) - 75.0 * 83.0 / 145.0).abs() < 1e-12);
    }

    #[test]
    fn test_expected_margins_match_observed() {
        let tables = vec![
            smile_weather(),
            ContingencyTable::from_rows(vec![vec![4, 2], vec![5, 7]]).unwrap(),
            ContingencyTable::from_rows(vec![vec![120, 85, 30, 15], vec![115, 90, 32, 18], vec![1, 0, 3, 9]]).unwrap(),
        ];
        for table in tables {
            let expected = compute_expected(&table).unwrap();
            for (e, o) in expected.row_totals().iter().zip(table.row_totals()) {
                assert!((e - o as f64).abs() < 1e-9);
            }
            for (e, o) in expected.col_totals().iter().zip(table.col_totals()) {
                assert!((e - o as f64).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_expected_one_way_uniform() {
        let table = ContingencyTable::from_counts(vec!["Smile", "No Smile"], vec![25, 37]).unwrap();
        let expected = compute_expected(&table).unwrap();
        assert_eq!(expected.values(), &[31.0, 31.0]);
    }

    #[test]
    fn test_expected_one_way_column() {
        let table = ContingencyTable::new(vec![10, 20, 30], 3, 1).unwrap();
        let expected = compute_expected(&table).unwrap();
        assert_eq!(expected.values(), &[20.0, 20.0, 20.0]);
        assert_eq!(expected.rows(), 3);
    }

    #[test]
    fn test_expected_proportions() {
        let table = ContingencyTable::from_counts(vec!["a", "b", "c"], vec![10, 30, 60]).unwrap();
        let expected = compute_expected_proportions(&table, Some(&[0.2, 0.3, 0.5])).unwrap();
        assert!((expected.values()[0] - 20.0).abs() < 1e-12);
        assert!((expected.values()[2] - 50.0).abs() < 1e-12);
        assert!(compute_expected_proportions(&table, Some(&[0.5, 0.5])).is_err());
        let err = compute_expected_proportions(&smile_weather(), None).unwrap_err();
        assert!(matches!(err, ContingencyError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_expected_empty() {
        let table = ContingencyTable::from_rows(vec![vec![0, 0], vec![0, 0]]).unwrap();
        assert_eq!(compute_expected(&table).unwrap_err(), ContingencyError::EmptyData);
        let table = ContingencyTable::from_counts(vec!["a", "b"], vec![0, 0]).unwrap();
        assert_eq!(compute_expected(&table).unwrap_err(), ContingencyError::EmptyData);
    }

    #[test]
    fn test_normalize_probabilities() {
        assert_eq!(normalize_probabilities(&[0.25, 0.75], false).unwrap(), vec![0.25, 0.75]);
        assert!(normalize_probabilities(&[0.5, 0.6], false).is_err());
        assert_eq!(normalize_probabilities(&[1.0, 3.0], true).unwrap(), vec![0.25, 0.75]);
        assert!(normalize_probabilities(&[-0.5, 1.5], false).is_err());
        assert!(normalize_probabilities(&[0.0, 0.0], true).is_err());
    }

    #[test]
    fn test_low_expected_cell_warning() {
        let table = ContingencyTable::from_rows(vec![vec![4, 2], vec![5, 7]]).unwrap();
        let expected = compute_expected(&table).unwrap();
        assert!(low_expected_cell_warning(&expected));
        let expected = compute_expected(&smile_weather()).unwrap();
        assert!(!low_expected_cell_warning(&expected));
    }

    #[test]
    fn test_residuals() {
        let table = smile_weather();
        let expected = compute_expected(&table).unwrap();
        let pearson = pearson_residuals(&table, &expected);
        let chi2: f64 = pearson.iter().map(|r| r * r).sum();
        assert!((chi2 - 5.6386).abs() < 1e-3);
        // Standardized residuals of a 2x2 table share one magnitude.
        let standardized = standardized_residuals(&table, &expected);
        for r in &standardized {
            assert!((r.abs() - standardized[0].abs()).abs() < 1e-9);
        }
        assert!((standardized[0] * standardized[0] - chi2).abs() < 1e-9);
        assert!(standardized[0] > 0.0 && standardized[1] < 0.0);
    }

    #[test]
    fn test_residuals_one_way() {
        let table = ContingencyTable::from_counts(vec!["Smile", "No Smile"], vec![25, 37]).unwrap();
        let expected = compute_expected(&table).unwrap();
        let standardized = standardized_residuals(&table, &expected);
        // (25 - 31) / sqrt(31 * 0.5)
        assert!((standardized[0] + 6.0 / 15.5f64.sqrt()).abs() < 1e-12);
    }
}
