//! Categorical Association Tester
//!
//! Runs the Chi-Square test (goodness of fit for one-way tables, independence for
//! two-way tables) and, for 2x2 tables, Fisher's exact test.
use crate::config::TestConfig;
use crate::data::{ContingencyTable, ExpectedTable};
use crate::errors::ContingencyError;
use crate::expected::{
    compute_expected_independence, compute_expected_proportions, low_expected_cell_warning, normalize_probabilities,
    pearson_residuals, standardized_residuals,
};
use crate::fisher::{fisher_exact_test, Alternative};
use crate::result::{AssociationReport, TestResult, Verdict};
use crate::sampler::{simulate_p_value, FixedMarginSampler, MultinomialSampler, SampleMethod};
use crate::statistic::{chi_square_statistic, p_value};
use crate::tabulate::{from_records, Record};
use log::{info, warn};

/// Tests association between categorical variables.
#[derive(Debug, Clone, Default)]
pub struct CategoricalAssociationTester {
    pub cfg: TestConfig,
}

impl CategoricalAssociationTester {
    pub fn new(cfg: TestConfig) -> Result<Self, ContingencyError> {
        cfg.validate()?;
        Ok(CategoricalAssociationTester { cfg })
    }

    /// Set the significance level.
    /// * `alpha` - p-values below this value are significant.
    pub fn set_alpha(mut self, alpha: f64) -> Self {
        self.cfg.alpha = alpha;
        self
    }

    /// Set the continuity correction.
    /// * `continuity_correction` - `None` applies the Yates correction to 2x2 tables only.
    pub fn set_continuity_correction(mut self, continuity_correction: Option<bool>) -> Self {
        self.cfg.continuity_correction = continuity_correction;
        self
    }

    /// Set whether Fisher's exact test runs.
    /// * `fisher_exact` - `None` runs it for 2x2 tables only.
    pub fn set_fisher_exact(mut self, fisher_exact: Option<bool>) -> Self {
        self.cfg.fisher_exact = fisher_exact;
        self
    }

    /// Set the alternative hypothesis of Fisher's exact test.
    pub fn set_alternative(mut self, alternative: Alternative) -> Self {
        self.cfg.alternative = alternative;
        self
    }

    /// Set the null proportions of one-way tables.
    pub fn set_probabilities(mut self, probabilities: Option<Vec<f64>>) -> Self {
        self.cfg.probabilities = probabilities;
        self
    }

    pub fn set_rescale_probabilities(mut self, rescale_probabilities: bool) -> Self {
        self.cfg.rescale_probabilities = rescale_probabilities;
        self
    }

    /// Set whether the p-value is computed by Monte Carlo simulation.
    pub fn set_simulate_p_value(mut self, simulate_p_value: bool) -> Self {
        self.cfg.simulate_p_value = simulate_p_value;
        self
    }

    /// Set the number of simulated tables.
    pub fn set_replicates(mut self, replicates: usize) -> Self {
        self.cfg.replicates = replicates;
        self
    }

    pub fn set_seed(mut self, seed: u64) -> Self {
        self.cfg.seed = seed;
        self
    }

    /// Tabulate raw records and test them.
    ///
    /// * `records` - Raw observations.
    /// * `fields` - One field for a goodness-of-fit test, two fields (rows, columns)
    ///   for a test of independence.
    pub fn test_records<T: Record>(&self, records: &[T], fields: &[&str]) -> Result<AssociationReport, ContingencyError> {
        let table = from_records(records, fields)?;
        self.test(&table)
    }

    /// Test a table of counts.
    pub fn test(&self, table: &ContingencyTable) -> Result<AssociationReport, ContingencyError> {
        self.cfg.validate()?;
        if table.grand_total() == 0 {
            return Err(ContingencyError::EmptyData);
        }
        let correction = self.cfg.continuity_correction_for(table)?;
        let run_fisher = self.cfg.fisher_exact_for(table)?;

        let (expected, probabilities) = self.expected(table)?;
        let (statistic, degrees_of_freedom) = chi_square_statistic(table, &expected, correction)?;

        let low_expected = low_expected_cell_warning(&expected);
        if low_expected {
            warn!(
                "Chi-squared approximation may be incorrect, smallest expected frequency is {:.4}.",
                expected.min()
            );
        }

        let (p, sample_method) = if self.cfg.simulate_p_value {
            let n = table.grand_total();
            let p = match &probabilities {
                Some(probabilities) => {
                    let mut sampler = MultinomialSampler::new(n, probabilities)?;
                    simulate_p_value(&mut sampler, expected.values(), statistic, self.cfg.replicates, self.cfg.seed)?
                }
                None => {
                    let mut sampler = FixedMarginSampler::new(table);
                    simulate_p_value(&mut sampler, expected.values(), statistic, self.cfg.replicates, self.cfg.seed)?
                }
            };
            let method = match probabilities {
                Some(_) => SampleMethod::Multinomial,
                None => SampleMethod::FixedMargins,
            };
            (p, Some(method))
        } else {
            (p_value(statistic, degrees_of_freedom)?, None)
        };

        let chi_square = TestResult {
            method: self.method_name(table, correction),
            statistic,
            degrees_of_freedom,
            p_value: p,
            low_expected,
            continuity_correction: correction,
            sample_method,
        };

        let fisher = if run_fisher {
            Some(fisher_exact_test(table, self.cfg.alternative)?)
        } else {
            None
        };

        let verdict = Verdict::from_p_value(chi_square.p_value, self.cfg.alpha);
        info!(
            "{}: X-squared = {:.4}, df = {}, p-value = {:.4}, {}.",
            chi_square.method, chi_square.statistic, chi_square.degrees_of_freedom, chi_square.p_value, verdict
        );

        Ok(AssociationReport {
            pearson_residuals: pearson_residuals(table, &expected),
            standardized_residuals: standardized_residuals(table, &expected),
            table: table.clone(),
            expected,
            chi_square,
            fisher,
            alpha: self.cfg.alpha,
            verdict,
        })
    }

    /// Expected frequencies, along with the null proportions for one-way tables.
    fn expected(&self, table: &ContingencyTable) -> Result<(ExpectedTable, Option<Vec<f64>>), ContingencyError> {
        if !table.is_one_way() {
            if self.cfg.probabilities.is_some() {
                return Err(ContingencyError::InvalidConfiguration(format!(
                    "null proportions apply to one-way tables, got a {}x{} table",
                    table.rows(),
                    table.cols()
                )));
            }
            return Ok((compute_expected_independence(table)?, None));
        }
        let k = table.n_cells();
        let probabilities = match &self.cfg.probabilities {
            Some(p) => normalize_probabilities(p, self.cfg.rescale_probabilities)?,
            None => vec![1.0 / k as f64; k],
        };
        let expected = compute_expected_proportions(table, Some(&probabilities))?;
        Ok((expected, Some(probabilities)))
    }

    fn method_name(&self, table: &ContingencyTable, correction: bool) -> String {
        let mut method = if table.is_one_way() {
            "Chi-squared test for given probabilities".to_string()
        } else if correction {
            "Pearson's Chi-squared test with Yates' continuity correction".to_string()
        } else {
            "Pearson's Chi-squared test".to_string()
        };
        if self.cfg.simulate_p_value {
            method.push_str(&format!(
                " with simulated p-value (based on {} replicates)",
                self.cfg.replicates
            ));
        }
        method
    }
}
