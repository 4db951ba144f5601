//! Test Configuration
//!
//! Options of a test run and their JSON persistence.
use crate::constants::{DEFAULT_ALPHA, DEFAULT_REPLICATES};
use crate::data::ContingencyTable;
use crate::errors::ContingencyError;
use crate::fisher::Alternative;
use crate::result::AssociationReport;
use crate::utils::validate_open_unit_parameter;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}
fn default_continuity_correction() -> Option<bool> {
    None
}
fn default_fisher_exact() -> Option<bool> {
    None
}
fn default_probabilities() -> Option<Vec<f64>> {
    None
}
fn default_replicates() -> usize {
    DEFAULT_REPLICATES
}

/// Configuration of a `CategoricalAssociationTester`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestConfig {
    /// Significance level.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Yates continuity correction. `None` applies it to 2x2 tables only.
    #[serde(default = "default_continuity_correction")]
    pub continuity_correction: Option<bool>,
    /// Fisher's exact test. `None` runs it for 2x2 tables only.
    #[serde(default = "default_fisher_exact")]
    pub fisher_exact: Option<bool>,
    /// Alternative hypothesis of Fisher's exact test.
    #[serde(default)]
    pub alternative: Alternative,
    /// Null proportions of a one-way table. Equal proportions when `None`.
    #[serde(default = "default_probabilities")]
    pub probabilities: Option<Vec<f64>>,
    /// Rescale `probabilities` to sum to one instead of rejecting them.
    #[serde(default)]
    pub rescale_probabilities: bool,
    /// Compute the p-value by Monte Carlo simulation.
    #[serde(default)]
    pub simulate_p_value: bool,
    /// Number of simulated tables.
    #[serde(default = "default_replicates")]
    pub replicates: usize,
    /// Seed for random number generation.
    #[serde(default)]
    pub seed: u64,
}

impl Default for TestConfig {
    fn default() -> Self {
        TestConfig {
            alpha: DEFAULT_ALPHA,
            continuity_correction: None,
            fisher_exact: None,
            alternative: Alternative::TwoSided,
            probabilities: None,
            rescale_probabilities: false,
            simulate_p_value: false,
            replicates: DEFAULT_REPLICATES,
            seed: 0,
        }
    }
}

impl TestConfig {
    /// Check the parameters that do not depend on the table.
    pub fn validate(&self) -> Result<(), ContingencyError> {
        validate_open_unit_parameter(self.alpha, "alpha")?;
        if self.simulate_p_value && self.replicates == 0 {
            return Err(ContingencyError::InvalidParameter(
                "replicates".to_string(),
                "at least 1".to_string(),
                self.replicates.to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the continuity correction for a table shape.
    pub fn continuity_correction_for(&self, table: &ContingencyTable) -> Result<bool, ContingencyError> {
        match self.continuity_correction {
            None => Ok(table.is_2x2() && !self.simulate_p_value),
            Some(false) => Ok(false),
            Some(true) if !table.is_2x2() => Err(ContingencyError::InvalidConfiguration(format!(
                "continuity correction applies to 2x2 tables, got a {}x{} table",
                table.rows(),
                table.cols()
            ))),
            Some(true) if self.simulate_p_value => Err(ContingencyError::InvalidConfiguration(
                "continuity correction is not applied to simulated p-values".to_string(),
            )),
            Some(true) => Ok(true),
        }
    }

    /// Resolve whether Fisher's exact test runs for a table shape.
    pub fn fisher_exact_for(&self, table: &ContingencyTable) -> Result<bool, ContingencyError> {
        match self.fisher_exact {
            None => Ok(table.is_2x2()),
            Some(false) => Ok(false),
            Some(true) if !table.is_2x2() => Err(ContingencyError::InvalidConfiguration(format!(
                "Fisher's exact test applies to 2x2 tables, got a {}x{} table",
                table.rows(),
                table.cols()
            ))),
            Some(true) => Ok(true),
        }
    }
}

/// IO
pub trait JsonIO: Serialize + DeserializeOwned + Sized {
    /// Save as a json object to a file.
    ///
    /// * `path` - Path to save to.
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ContingencyError> {
        fs::write(path, self.json_dump()?).map_err(|e| ContingencyError::UnableToWrite(e.to_string()))
    }

    /// Dump as a json object.
    fn json_dump(&self) -> Result<String, ContingencyError> {
        serde_json::to_string(self).map_err(|e| ContingencyError::UnableToWrite(e.to_string()))
    }

    /// Load from a json string.
    ///
    /// * `json_str` - String object, which can be deserialized from json.
    fn from_json(json_str: &str) -> Result<Self, ContingencyError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| ContingencyError::UnableToRead(e.to_string()))
    }

    /// Load from a path to a json object.
    ///
    /// * `path` - Path to load from.
    fn load<P: AsRef<Path>>(path: P) -> Result<Self, ContingencyError> {
        let json_str = fs::read_to_string(path).map_err(|e| ContingencyError::UnableToRead(e.to_string()))?;
        Self::from_json(&json_str)
    }
}

impl JsonIO for TestConfig {}
impl JsonIO for AssociationReport {}
