//! Sampler
//!
//! Draw random tables under the null hypothesis, used to compute Monte Carlo p-values
//! when expected frequencies are too small for the asymptotic distribution.
use crate::constants::SIMULATION_RELATIVE_ERROR;
use crate::data::ContingencyTable;
use crate::errors::ContingencyError;
use crate::statistic::statistic_from_values;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Binomial, Distribution, Hypergeometric};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum SampleMethod {
    /// Random tables sharing the observed row and column totals.
    FixedMargins,
    /// Multinomial draws from the null proportions of a one-way table.
    Multinomial,
}

// A sampler draws one table under the null hypothesis.
pub trait Sampler {
    /// Draw a table, returning row-major counts.
    fn sample(&mut self, rng: &mut StdRng) -> Result<Vec<f64>, ContingencyError>;
}

fn sampling_error<E: std::fmt::Display>(e: E) -> ContingencyError {
    ContingencyError::InvalidInput(format!("unable to sample table: {}", e))
}

/// Samples tables with fixed margins, filling cells one at a time.
///
/// Cell `(i, j)` is hypergeometric given the cells drawn before it: row `i` still has
/// `r` observations to place among the `N` observations left in columns `j..`, of which
/// `c_j` belong to column `j`. The last column of each row takes the remainder.
pub struct FixedMarginSampler {
    row_totals: Vec<u64>,
    col_totals: Vec<u64>,
}

impl FixedMarginSampler {
    pub fn new(table: &ContingencyTable) -> Self {
        FixedMarginSampler {
            row_totals: table.row_totals(),
            col_totals: table.col_totals(),
        }
    }
}

impl Sampler for FixedMarginSampler {
    fn sample(&mut self, rng: &mut StdRng) -> Result<Vec<f64>, ContingencyError> {
        let cols = self.col_totals.len();
        let mut counts = Vec::with_capacity(self.row_totals.len() * cols);
        let mut col_left = self.col_totals.clone();
        for &row_total in &self.row_totals {
            let mut row_left = row_total;
            let mut population: u64 = col_left.iter().sum();
            for j in 0..cols - 1 {
                let successes = col_left[j];
                let x = if row_left == 0 || successes == 0 {
                    0
                } else if successes == population {
                    row_left
                } else {
                    Hypergeometric::new(population, successes, row_left)
                        .map_err(sampling_error)?
                        .sample(rng)
                };
                counts.push(x as f64);
                row_left -= x;
                col_left[j] -= x;
                population -= successes;
            }
            counts.push(row_left as f64);
            col_left[cols - 1] -= row_left;
        }
        Ok(counts)
    }
}

/// Samples one-way tables of `n` observations from fixed category proportions.
///
/// Category `j` is binomial given the categories drawn before it, with success
/// probability `p_j` over the probability mass left. The last category takes the remainder.
pub struct MultinomialSampler {
    n: u64,
    probabilities: Vec<f64>,
}

impl MultinomialSampler {
    pub fn new(n: u64, probabilities: &[f64]) -> Result<Self, ContingencyError> {
        if probabilities.is_empty() {
            return Err(ContingencyError::InvalidInput("no categories to sample".to_string()));
        }
        if probabilities.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(ContingencyError::InvalidInput(
                "sampling weights must be finite and non-negative".to_string(),
            ));
        }
        if probabilities.iter().sum::<f64>() <= 0.0 {
            return Err(ContingencyError::InvalidInput(
                "sampling weights must not all be zero".to_string(),
            ));
        }
        Ok(MultinomialSampler {
            n,
            probabilities: probabilities.to_vec(),
        })
    }
}

impl Sampler for MultinomialSampler {
    fn sample(&mut self, rng: &mut StdRng) -> Result<Vec<f64>, ContingencyError> {
        let k = self.probabilities.len();
        let mut counts = vec![0.0; k];
        // The last category with positive weight takes the remainder.
        let last = self.probabilities.iter().rposition(|&p| p > 0.0).unwrap_or(k - 1);
        let mut n_left = self.n;
        let mut mass_left: f64 = self.probabilities.iter().sum();
        for (j, &p) in self.probabilities.iter().enumerate().take(last) {
            if n_left == 0 {
                break;
            }
            if p == 0.0 {
                continue;
            }
            let share = (p / mass_left).clamp(0.0, 1.0);
            let x = Binomial::new(n_left, share).map_err(sampling_error)?.sample(rng);
            counts[j] = x as f64;
            n_left -= x;
            mass_left -= p;
        }
        counts[last] = n_left as f64;
        Ok(counts)
    }
}

/// Monte Carlo p-value, `(1 + #{simulated >= observed}) / (replicates + 1)`.
///
/// * `sampler` - Draws tables under the null hypothesis.
/// * `expected` - Expected frequencies, row-major, shared by every simulated table.
/// * `statistic` - The observed (uncorrected) statistic.
/// * `replicates` - Number of simulated tables.
/// * `seed` - Seed of the random number generator.
pub fn simulate_p_value<S: Sampler>(
    sampler: &mut S,
    expected: &[f64],
    statistic: f64,
    replicates: usize,
    seed: u64,
) -> Result<f64, ContingencyError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let threshold = statistic * SIMULATION_RELATIVE_ERROR;
    let mut extreme = 0;
    for _ in 0..replicates {
        if statistic_from_values(&sampler.sample(&mut rng)?, expected, 0.0) >= threshold {
            extreme += 1;
        }
    }
    Ok((1 + extreme) as f64 / (replicates + 1) as f64)
}
