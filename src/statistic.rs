//! Statistic
//!
//! Pearson's Chi-Square statistic, its degrees of freedom and the asymptotic p-value.
use crate::constants::YATES_CORRECTION;
use crate::data::{ContingencyTable, ExpectedTable};
use crate::errors::ContingencyError;
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Degrees of freedom, `(rows - 1) * (cols - 1)`, or `k - 1` for a one-way table of `k` cells.
pub fn degrees_of_freedom(table: &ContingencyTable) -> usize {
    if table.is_one_way() {
        table.n_cells() - 1
    } else {
        (table.rows() - 1) * (table.cols() - 1)
    }
}

/// Yates continuity correction for a table, capped by the smallest absolute deviation
/// so that a perfect fit keeps a statistic of zero.
pub fn yates_correction(observed: &[f64], expected: &[f64]) -> f64 {
    observed
        .iter()
        .zip(expected)
        .map(|(o, e)| (o - e).abs())
        .fold(YATES_CORRECTION, f64::min)
}

/// `sum((|O - E| - c)^2 / E)` over raw row-major values.
#[inline]
pub fn statistic_from_values(observed: &[f64], expected: &[f64], correction: f64) -> f64 {
    observed
        .iter()
        .zip(expected)
        .map(|(o, e)| {
            let d = (o - e).abs() - correction;
            d * d / e
        })
        .sum()
}

/// Compute the Chi-Square statistic and its degrees of freedom.
///
/// * `observed` - The observed table.
/// * `expected` - Expected frequencies of the same shape.
/// * `continuity_correction` - Apply the Yates correction. Only valid for 2x2 tables.
pub fn chi_square_statistic(
    observed: &ContingencyTable,
    expected: &ExpectedTable,
    continuity_correction: bool,
) -> Result<(f64, usize), ContingencyError> {
    if observed.rows() != expected.rows() || observed.cols() != expected.cols() {
        return Err(ContingencyError::InvalidInput(format!(
            "observed table is {}x{} but expected table is {}x{}",
            observed.rows(),
            observed.cols(),
            expected.rows(),
            expected.cols()
        )));
    }
    if continuity_correction && !observed.is_2x2() {
        return Err(ContingencyError::InvalidConfiguration(format!(
            "continuity correction applies to 2x2 tables, got a {}x{} table",
            observed.rows(),
            observed.cols()
        )));
    }
    if let Some(idx) = expected.values().iter().position(|&e| e == 0.0) {
        return Err(ContingencyError::DegenerateTable(idx / expected.cols(), idx % expected.cols()));
    }
    let o = observed.as_f64();
    let correction = if continuity_correction {
        yates_correction(&o, expected.values())
    } else {
        0.0
    };
    let statistic = statistic_from_values(&o, expected.values(), correction);
    Ok((statistic, degrees_of_freedom(observed)))
}

/// Upper-tail probability of `statistic` under a Chi-Square distribution.
pub fn p_value(statistic: f64, degrees_of_freedom: usize) -> Result<f64, ContingencyError> {
    if degrees_of_freedom == 0 {
        return Err(ContingencyError::InvalidInput(
            "degrees of freedom must be at least 1".to_string(),
        ));
    }
    if statistic.is_nan() || statistic < 0.0 {
        return Err(ContingencyError::InvalidInput(format!(
            "statistic must be a non-negative number, got {}",
            statistic
        )));
    }
    let dist =
        ChiSquared::new(degrees_of_freedom as f64).map_err(|e| ContingencyError::InvalidInput(e.to_string()))?;
    Ok(dist.sf(statistic).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expected::compute_expected;

    fn run(table: &ContingencyTable, correct: bool) -> (f64, usize) {
        let expected = compute_expected(table).unwrap();
        chi_square_statistic(table, &expected, correct).unwrap()
    }

    #[test]
    fn test_one_sample() {
        let table = ContingencyTable::from_counts(vec!["Smile", "No Smile"], vec![25, 37]).unwrap();
        let (stat, df) = run(&table, false);
        assert!((stat - 2.3226).abs() < 1e-4);
        assert_eq!(df, 1);
        let p = p_value(stat, df).unwrap();
        assert!((p - 0.1275).abs() < 1e-4);
    }

    #[test]
    fn test_two_by_two_uncorrected() {
        let table = ContingencyTable::from_rows(vec![vec![37, 33], vec![25, 50]]).unwrap();
        let (stat, df) = run(&table, false);
        assert!((stat - 5.6388).abs() < 1e-4);
        assert_eq!(df, 1);
        let p = p_value(stat, df).unwrap();
        assert!((p - 0.017567).abs() < 1e-5);
    }

    #[test]
    fn test_two_by_two_corrected() {
        let table = ContingencyTable::from_rows(vec![vec![37, 33], vec![25, 50]]).unwrap();
        let (stat, _) = run(&table, true);
        assert!((stat - 4.8693).abs() < 1e-4);
        assert!((p_value(stat, 1).unwrap() - 0.027338).abs() < 1e-5);
    }

    #[test]
    fn test_correction_capped_by_deviation() {
        // Every deviation is 1, the full correction applies.
        let table = ContingencyTable::from_rows(vec![vec![4, 2], vec![5, 7]]).unwrap();
        let (stat, _) = run(&table, true);
        assert!((stat - 0.25).abs() < 1e-12);
        // A perfect fit keeps a statistic of zero.
        let table = ContingencyTable::from_rows(vec![vec![10, 10], vec![10, 10]]).unwrap();
        let (stat, _) = run(&table, true);
        assert_eq!(stat, 0.0);
    }

    #[test]
    fn test_correction_rejected_for_larger_tables() {
        let table = ContingencyTable::from_rows(vec![vec![10, 20, 30], vec![20, 25, 15]]).unwrap();
        let expected = compute_expected(&table).unwrap();
        let err = chi_square_statistic(&table, &expected, true).unwrap_err();
        assert!(matches!(err, ContingencyError::InvalidConfiguration(_)));
        let (stat, df) = chi_square_statistic(&table, &expected, false).unwrap();
        assert_eq!(df, 2);
        assert!((stat - 8.8889).abs() < 1e-4);
        assert!((p_value(stat, df).unwrap() - 0.011744).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_table() {
        let table = ContingencyTable::from_rows(vec![vec![0, 0], vec![3, 4]]).unwrap();
        let expected = compute_expected(&table).unwrap();
        let err = chi_square_statistic(&table, &expected, false).unwrap_err();
        assert_eq!(err, ContingencyError::DegenerateTable(0, 0));
    }

    #[test]
    fn test_statistic_zero_iff_fit() {
        let table = ContingencyTable::from_rows(vec![vec![10, 20], vec![30, 60]]).unwrap();
        let (stat, _) = run(&table, false);
        assert!(stat.abs() < 1e-12);
        let table = ContingencyTable::from_rows(vec![vec![11, 19], vec![30, 60]]).unwrap();
        let (stat, _) = run(&table, false);
        assert!(stat > 0.0);
    }

    #[test]
    fn test_degrees_of_freedom() {
        let table = ContingencyTable::new(vec![1; 12], 3, 4).unwrap();
        assert_eq!(degrees_of_freedom(&table), 6);
        let table = ContingencyTable::new(vec![1; 5], 1, 5).unwrap();
        assert_eq!(degrees_of_freedom(&table), 4);
        let table = ContingencyTable::new(vec![1; 5], 5, 1).unwrap();
        assert_eq!(degrees_of_freedom(&table), 4);
    }

    #[test]
    fn test_p_value_monotone() {
        for df in 1..6 {
            let mut last = 1.0;
            for i in 0..200 {
                let p = p_value(i as f64 * 0.25, df).unwrap();
                assert!((0.0..=1.0).contains(&p));
                assert!(p <= last + 1e-15);
                last = p;
            }
        }
        assert!((p_value(0.0, 3).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_p_value_invalid() {
        assert!(p_value(1.0, 0).is_err());
        assert!(p_value(-1.0, 1).is_err());
        assert!(p_value(f64::NAN, 1).is_err());
    }
}
