//! Connectome Modularity - community detection by simulated annealing
//!
//! This crate partitions a connectivity network into modules by maximizing
//! Newman modularity with a stochastic search:
//! - A partition type mapping vertices to dense module indices
//! - A modularity cost function scoring partitions
//! - A permutation strategy proposing vertex shifts and temperature-gated
//!   module splits/joins, recursively re-optimizing split candidates on
//!   induced subgraphs
//! - A cooling-schedule manager driving any permutation strategy
//!
//! All randomness flows through caller-supplied seedable generators, so
//! runs are reproducible.

pub mod annealing;
pub mod cost;
pub mod partition;
pub mod permutation;

// Re-exports for convenience
pub use annealing::{
    AnnealingError, AnnealingState, CancelToken, SimulatedAnnealingManager,
    DEFAULT_PERMUTATIONS_PER_TEMPERATURE, STOP_TEMPERATURE,
};
pub use cost::{CostFunction, ModularityCostFunction, ModularityError};
pub use partition::Partition;
pub use permutation::{ModularityPermutation, PermutationStrategy};
