//! Configuration management for the coauthorship graph analyzer

/// Default configuration for the analysis pipeline
pub struct Config {
    /// First year of the snapshot range (inclusive)
    pub start_year: i32,

    /// Last year of the snapshot range (inclusive)
    pub end_year: i32,

    /// Number of hubs removed in a robustness attack
    pub num_hubs: usize,

    /// Eigenvector centrality solver settings
    pub eigenvector: EigenvectorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_year: 1998,
            end_year: 2024,
            num_hubs: 20,
            eigenvector: EigenvectorConfig::default(),
        }
    }
}

/// Settings for the eigenvector centrality power iteration
#[derive(Debug, Clone, Copy)]
pub struct EigenvectorConfig {
    /// Iteration bound; reaching it without converging is reported as failure
    pub max_iterations: usize,

    /// Convergence tolerance on the L2 norm of the score change
    pub tolerance: f64,
}

impl Default for EigenvectorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}
