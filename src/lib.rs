pub mod crossover;
pub mod distance;
pub mod error;
pub mod evolution;
pub mod individual;
pub mod instance;
pub mod mutation;
pub mod rng;
pub mod selection;

// Re-export commonly used types for convenience
pub use crossover::CrossoverKind;
pub use distance::DistanceMatrix;
pub use error::{Result, TspError};
pub use evolution::{EvolutionEngine, Progress, RunHandle, RunOutcome, RunParameters, RunReport};
pub use individual::{Genome, Individual};
pub use instance::TspInstance;
pub use mutation::MutationKind;
