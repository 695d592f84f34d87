//! Modularity Cost Function
//!
//! Scores a partition with Newman's modularity
//! `Q = Σ_s ( l_s/L − (d_s/2L)² )`, where `l_s` counts the edges inside
//! module `s`, `d_s` sums the degrees of its vertices and `L` is the total
//! edge count: how much denser the modules are internally than a random
//! graph with the same degree sequence would be.
//!
//! The annealing manager minimizes, so [`CostFunction::evaluate`] maps
//! modularity to the cost `100·(1 − Q)`; the scale keeps temperatures and
//! acceptance probabilities in a convenient range.

use connectome_core::Network;
use thiserror::Error;
use tracing::warn;

use crate::partition::Partition;

/// Errors that can occur while scoring a partition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModularityError {
    /// Partition does not cover the network's vertex set
    #[error("partition covers {actual} vertices but the network has {expected}")]
    PartitionSizeMismatch { expected: usize, actual: usize },
}

/// Scores a candidate solution; lower is better.
pub trait CostFunction {
    /// Cost of a partition of the given network.
    fn evaluate(&self, network: &Network, partition: &Partition) -> f64;
}

/// Newman-modularity scoring.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModularityCostFunction;

impl ModularityCostFunction {
    /// Create a new cost function.
    pub fn new() -> Self {
        Self
    }

    /// Compute Newman's Q for a partition.
    ///
    /// The all-one-module partition scores exactly `0.0`, as does a network
    /// without edges. Fails when the partition's vertex set does not match
    /// the network's.
    pub fn calculate_modularity(
        &self,
        network: &Network,
        partition: &Partition,
    ) -> Result<f64, ModularityError> {
        if partition.len() != network.vertex_count() {
            return Err(ModularityError::PartitionSizeMismatch {
                expected: network.vertex_count(),
                actual: partition.len(),
            });
        }
        let modules = partition.number_of_modules();
        if modules == 0 {
            return Ok(0.0);
        }

        // Each undirected edge is visited from both endpoints, so the
        // intra-module and total tallies are halved below.
        let mut twice_links_in_module = vec![0u64; modules];
        let mut degree_sum = vec![0u64; modules];
        let mut twice_total_edges = 0u64;

        for (&v, &module) in partition.iter() {
            for neighbor in network.inner().neighbors(v) {
                degree_sum[module] += 1;
                twice_total_edges += 1;
                if partition.module_of(neighbor) == Some(module) {
                    twice_links_in_module[module] += 1;
                }
            }
        }

        if twice_total_edges == 0 {
            return Ok(0.0);
        }
        let total_edges = twice_total_edges as f64 / 2.0;

        let mut modularity = 0.0;
        for s in 0..modules {
            let links = twice_links_in_module[s] as f64 / 2.0;
            let degrees = degree_sum[s] as f64;
            modularity += links / total_edges - (degrees / (2.0 * total_edges)).powi(2);
        }
        Ok(modularity)
    }
}

impl CostFunction for ModularityCostFunction {
    /// `100·(1 − Q)`, to be minimized.
    ///
    /// A partition/network mismatch is recoverable: it warns and scores as
    /// modularity `0.0`.
    fn evaluate(&self, network: &Network, partition: &Partition) -> f64 {
        let modularity = match self.calculate_modularity(network, partition) {
            Ok(q) => q,
            Err(error) => {
                warn!(%error, "partition scoring failed, falling back to zero modularity");
                0.0
            }
        };
        100.0 * (1.0 - modularity)
    }
}
