//! Results
//!
//! Outcomes of a test run and the significance verdict derived from them.
use crate::data::{ContingencyTable, ExpectedTable};
use crate::fisher::Alternative;
use crate::sampler::SampleMethod;
use crate::utils::fmt_vec_output;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// Non-finite floats are written as null in JSON.
pub(crate) fn parse_nullable_f64<'de, D>(d: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Deserialize::deserialize(d).map(|x: Option<_>| x.unwrap_or(f64::NAN))
}

/// Outcome of a Chi-Square test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Name of the test that was run.
    pub method: String,
    /// The Chi-Square statistic.
    pub statistic: f64,
    pub degrees_of_freedom: usize,
    pub p_value: f64,
    /// At least one expected frequency is below 5, the asymptotic p-value may be inaccurate.
    pub low_expected: bool,
    /// Whether the Yates continuity correction was applied.
    pub continuity_correction: bool,
    /// How null tables were drawn, when the p-value was simulated.
    pub sample_method: Option<SampleMethod>,
}

/// Outcome of Fisher's exact test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FisherResult {
    /// Sample odds ratio `(a * d) / (b * c)`.
    #[serde(deserialize_with = "parse_nullable_f64")]
    pub odds_ratio: f64,
    pub p_value: f64,
    pub alternative: Alternative,
}

impl FisherResult {
    pub fn verdict(&self, alpha: f64) -> Verdict {
        Verdict::from_p_value(self.p_value, alpha)
    }
}

/// Significance verdict at a given alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Verdict {
    /// The p-value is below alpha, the null hypothesis is rejected.
    Significant,
    NotSignificant,
}

impl Verdict {
    pub fn from_p_value(p_value: f64, alpha: f64) -> Self {
        if p_value < alpha {
            Verdict::Significant
        } else {
            Verdict::NotSignificant
        }
    }

    pub fn is_significant(&self) -> bool {
        matches!(self, Verdict::Significant)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Significant => f.write_str("significant, the null hypothesis is rejected"),
            Verdict::NotSignificant => f.write_str("not significant, the null hypothesis is retained"),
        }
    }
}

/// Everything computed for one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationReport {
    pub table: ContingencyTable,
    pub expected: ExpectedTable,
    pub chi_square: TestResult,
    /// Present for 2x2 tables unless disabled.
    pub fisher: Option<FisherResult>,
    /// `(O - E) / sqrt(E)`, row-major.
    pub pearson_residuals: Vec<f64>,
    /// Residuals scaled to unit variance under the null, row-major.
    pub standardized_residuals: Vec<f64>,
    pub alpha: f64,
    /// Verdict of the Chi-Square test at `alpha`.
    pub verdict: Verdict,
}

impl fmt::Display for AssociationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.table)?;
        writeln!(f)?;
        writeln!(f, "{}", self.chi_square.method)?;
        match self.chi_square.sample_method {
            Some(_) => writeln!(
                f,
                "X-squared = {:.4}, simulated p-value = {:.4}",
                self.chi_square.statistic, self.chi_square.p_value
            )?,
            None => writeln!(
                f,
                "X-squared = {:.4}, df = {}, p-value = {:.4}",
                self.chi_square.statistic, self.chi_square.degrees_of_freedom, self.chi_square.p_value
            )?,
        }
        writeln!(f, "At alpha = {}: {}", self.alpha, self.verdict)?;
        writeln!(f, "Expected: {}", fmt_vec_output(self.expected.values()))?;
        if self.chi_square.low_expected {
            writeln!(f, "Warning: Chi-squared approximation may be incorrect, expected frequencies below 5.")?;
        }
        if let Some(fisher) = &self.fisher {
            writeln!(f)?;
            writeln!(f, "Fisher's Exact Test for Count Data")?;
            writeln!(
                f,
                "p-value = {:.4}, odds ratio = {:.4}, alternative = {}",
                fisher.p_value, fisher.odds_ratio, fisher.alternative
            )?;
            writeln!(f, "At alpha = {}: {}", self.alpha, fisher.verdict(self.alpha))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict() {
        assert_eq!(Verdict::from_p_value(0.0175, 0.05), Verdict::Significant);
        assert_eq!(Verdict::from_p_value(0.128, 0.05), Verdict::NotSignificant);
        assert_eq!(Verdict::from_p_value(0.05, 0.05), Verdict::NotSignificant);
        assert!(Verdict::Significant.is_significant());
        assert!(Verdict::NotSignificant.to_string().contains("retained"));
    }

    #[test]
    fn test_fisher_result_infinite_odds_ratio_json() {
        let result = FisherResult {
            odds_ratio: f64::INFINITY,
            p_value: 1.0,
            alternative: Alternative::TwoSided,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"odds_ratio\":null"));
        let back: FisherResult = serde_json::from_str(&json).unwrap();
        assert!(back.odds_ratio.is_nan());
        assert_eq!(back.p_value, 1.0);
        assert_eq!(back.verdict(0.05), Verdict::NotSignificant);
    }
}
