pub mod chromosome;
pub mod eval;
pub mod evolution;
pub mod operators;

pub use chromosome::Chromosome;
pub use evolution::GeneticOptimizer;
