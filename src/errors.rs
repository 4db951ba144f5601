//! Errors
//!
//! Custom error types used throughout the `contingency` crate.
use thiserror::Error;

/// Errors that can occur while building or testing a contingency table.
#[derive(Debug, Error, PartialEq)]
pub enum ContingencyError {
    /// Malformed input data: negative counts, ragged rows, missing fields, too few categories.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The grand total of the table is zero.
    #[error("The table has a grand total of zero, no observations to test.")]
    EmptyData,
    /// An expected cell is exactly zero, the statistic would be undefined.
    #[error("Expected frequency at row {0}, column {1} is zero, the table is degenerate.")]
    DegenerateTable(usize, usize),
    /// An option was requested that does not apply to the table shape.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// Invalid value parsing.
    #[error("Invalid value {0} passed for {1}, expected one of {2}.")]
    ParseString(String, String, String),
    /// Unable to write configuration or report.
    #[error("Unable to write to file: {0}")]
    UnableToWrite(String),
    /// Unable to read configuration or report.
    #[error("Unable to read from file {0}")]
    UnableToRead(String),
}
