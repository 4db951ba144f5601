// Modules
pub mod config;
pub mod constants;
pub mod data;
pub mod errors;
pub mod expected;
pub mod fisher;
pub mod result;
pub mod sampler;
pub mod statistic;
pub mod tabulate;
pub mod tester;
pub mod utils;

// Individual classes, and functions
pub use config::{JsonIO, TestConfig};
pub use data::{ContingencyTable, ExpectedTable};
pub use errors::ContingencyError;
pub use fisher::{fisher_exact_test, Alternative};
pub use result::{AssociationReport, FisherResult, TestResult, Verdict};
pub use tester::CategoricalAssociationTester;
