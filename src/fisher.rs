//! Fisher
//!
//! Fisher's exact test of independence for 2x2 tables. Conditional on the margins,
//! the top-left cell follows a hypergeometric distribution.
use crate::constants::FISHER_RELATIVE_ERROR;
use crate::data::ContingencyTable;
use crate::errors::ContingencyError;
use crate::result::FisherResult;
use crate::utils::items_to_strings;
use serde::{Deserialize, Serialize};
use statrs::distribution::{Discrete, Hypergeometric};
use std::fmt;
use std::str::FromStr;

/// Alternative hypothesis of Fisher's exact test.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Default)]
pub enum Alternative {
    /// Odds ratio different from one.
    #[default]
    TwoSided,
    /// Odds ratio below one.
    Less,
    /// Odds ratio above one.
    Greater,
}

impl FromStr for Alternative {
    type Err = ContingencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "two.sided" | "TwoSided" => Ok(Alternative::TwoSided),
            "less" | "Less" => Ok(Alternative::Less),
            "greater" | "Greater" => Ok(Alternative::Greater),
            _ => Err(ContingencyError::ParseString(
                s.to_string(),
                "Alternative".to_string(),
                items_to_strings(vec!["two.sided", "less", "greater"]),
            )),
        }
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Alternative::TwoSided => "two.sided",
            Alternative::Less => "less",
            Alternative::Greater => "greater",
        };
        f.write_str(s)
    }
}

/// Sample odds ratio `(a * d) / (b * c)` of a 2x2 table.
///
/// Infinite when only `b * c` is zero, NaN when both products are zero.
pub fn odds_ratio(a: u64, b: u64, c: u64, d: u64) -> f64 {
    (a as f64 * d as f64) / (b as f64 * c as f64)
}

/// Fisher's exact test.
///
/// * `table` - A 2x2 table, cells `a, b, c, d` in row-major order.
/// * `alternative` - The alternative hypothesis.
pub fn fisher_exact_test(table: &ContingencyTable, alternative: Alternative) -> Result<FisherResult, ContingencyError> {
    if !table.is_2x2() {
        return Err(ContingencyError::InvalidConfiguration(format!(
            "Fisher's exact test applies to 2x2 tables, got a {}x{} table",
            table.rows(),
            table.cols()
        )));
    }
    let (a, b, c, d) = (table.get(0, 0), table.get(0, 1), table.get(1, 0), table.get(1, 1));
    let n = a + b + c + d;
    if n == 0 {
        return Err(ContingencyError::EmptyData);
    }
    let row1 = a + b;
    let col1 = a + c;
    let dist = Hypergeometric::new(n, col1, row1).map_err(|e| ContingencyError::InvalidInput(e.to_string()))?;
    let lo = (row1 + col1).saturating_sub(n);
    let hi = row1.min(col1);
    // Log scale keeps the binomial coefficients of large tables finite.
    let pmf = |k: u64| dist.ln_pmf(k).exp();

    let p_value = match alternative {
        Alternative::Less => (lo..=a).map(pmf).sum::<f64>(),
        Alternative::Greater => (a..=hi).map(pmf).sum::<f64>(),
        Alternative::TwoSided => {
            let observed = pmf(a) * FISHER_RELATIVE_ERROR;
            (lo..=hi).map(pmf).filter(|&p| p <= observed).sum::<f64>()
        }
    };

    Ok(FisherResult {
        odds_ratio: odds_ratio(a, b, c, d),
        p_value: p_value.clamp(0.0, 1.0),
        alternative,
    })
}
