use cutstock_rs::freespace::ScrapFilter;
use serde::{Deserialize, Serialize};

/// Configuration for the genetic cutting optimizer
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(default, rename_all = "camelCase")]
pub struct GACConfig {
    /// Number of individuals per generation
    pub population_size: usize,
    /// Upper bound on generations; the search may stop earlier on convergence
    pub generations: usize,
    /// Probability of the random-swap mutation per child
    pub mutation_rate: f64,
    /// Fraction of the population carried over unchanged each generation
    pub elitism_rate: f64,
    /// Number of random draws per tournament selection
    pub tournament_size: usize,
    /// Minimum width for a leftover piece to count as usable scrap
    pub min_scrap_width: i64,
    /// Minimum height for a leftover piece to count as usable scrap
    pub min_scrap_height: i64,
    /// Seed for the PRNG. If undefined, the algorithm will run in non-deterministic mode using entropy
    pub prng_seed: Option<u64>,
}

impl Default for GACConfig {
    fn default() -> Self {
        Self {
            population_size: 1000,
            generations: 50,
            mutation_rate: 0.15,
            elitism_rate: 0.1,
            tournament_size: 4,
            min_scrap_width: 0,
            min_scrap_height: 0,
            prng_seed: None,
        }
    }
}

impl GACConfig {
    pub fn scrap_filter(&self) -> ScrapFilter {
        ScrapFilter::new(self.min_scrap_width, self.min_scrap_height)
    }
}
