/// Expected counts below this value make the Chi-Square approximation unreliable.
pub const LOW_EXPECTED_THRESHOLD: f64 = 5.0;
pub const DEFAULT_ALPHA: f64 = 0.05;
/// Upper bound of the Yates continuity correction.
pub const YATES_CORRECTION: f64 = 0.5;
pub const DEFAULT_REPLICATES: usize = 2000;
/// Relative tolerance used when comparing hypergeometric probabilities in Fisher's test.
pub const FISHER_RELATIVE_ERROR: f64 = 1.0 + 1e-7;
/// Relative tolerance used when comparing simulated statistics to the observed one.
pub const SIMULATION_RELATIVE_ERROR: f64 = 1.0 - 64.0 * f64::EPSILON;
