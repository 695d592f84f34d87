//! Network Thresholding
//!
//! Statistics sweeps analyze a network at several sparsity levels. The
//! schemes here produce a pruned copy of a source network, leaving the
//! original untouched so one network can be thresholded repeatedly.
//!
//! Density targets are measured against the source vertex count; vertices
//! left unconnected are pruned only once the target is reached, so the
//! sweep makes monotonic progress.

use rand::{Rng, RngCore};
use tracing::debug;

use crate::network::Network;

/// How to sparsify a network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdScheme {
    /// Drop every edge observed fewer than `threshold` times.
    ThresholdBased { threshold: u32 },
    /// Raise the weight threshold until connection density is at or below
    /// the target.
    LargestLowerThanDensity { target_density: f64 },
    /// Repeatedly delete one uniformly-chosen minimum-weight edge until
    /// connection density is at or below the target.
    RandomRemovalOfWeakest { target_density: f64 },
}

/// Produce a thresholded copy of a network.
///
/// All schemes prune vertices left unconnected and renumber, so the result
/// is ready for id-indexed metrics. The RNG is consulted only by the
/// random-removal scheme.
pub fn thresholded_network(
    network: &Network,
    scheme: ThresholdScheme,
    rng: &mut dyn RngCore,
) -> Network {
    let mut pruned = network.clone();
    let vertices = network.vertex_count();

    match scheme {
        ThresholdScheme::ThresholdBased { threshold } => {
            pruned.prune_edges_below_weight(threshold);
        }
        ThresholdScheme::LargestLowerThanDensity { target_density } => {
            let mut threshold = 1;
            while density(pruned.edge_count(), vertices) > target_density
                && pruned.edge_count() > 0
            {
                threshold += 1;
                remove_edges_below(&mut pruned, threshold);
            }
            debug!(threshold, "density target reached");
            pruned.prune_unconnected_single_nodes();
        }
        ThresholdScheme::RandomRemovalOfWeakest { target_density } => {
            while density(pruned.edge_count(), vertices) > target_density
                && pruned.edge_count() > 0
            {
                let Some(weakest) = pruned
                    .inner()
                    .edge_indices()
                    .map(|e| pruned.inner()[e].weight)
                    .min()
                else {
                    break;
                };
                let candidates: Vec<_> = pruned
                    .inner()
                    .edge_indices()
                    .filter(|&e| pruned.inner()[e].weight == weakest)
                    .collect();
                let victim = candidates[rng.random_range(0..candidates.len())];
                pruned.remove_edge_index(victim);
            }
            pruned.prune_unconnected_single_nodes();
        }
    }
    pruned
}

/// Connection density of `edges` over a fixed vertex count.
fn density(edges: usize, vertices: usize) -> f64 {
    if vertices < 2 {
        return 0.0;
    }
    edges as f64 / ((vertices * (vertices - 1)) as f64 / 2.0)
}

/// Drop edges below a weight threshold without touching the vertex set.
fn remove_edges_below(network: &mut Network, threshold: u32) {
    let weak: Vec<_> = network
        .inner()
        .edge_indices()
        .filter(|&e| network.inner()[e].weight < threshold)
        .collect();
    for e in weak {
        network.remove_edge_index(e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::VertexIndex;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    /// Five vertices in a ring, weights 1..=5.
    fn ring() -> Network {
        let mut network = Network::new();
        let v: Vec<VertexIndex> = (0..5).map(|id| network.add_vertex(id)).collect();
        for i in 0..5 {
            network.add_edge(v[i], v[(i + 1) % 5], i as u32 + 1).unwrap();
        }
        network
    }

    #[test]
    fn test_threshold_based_matches_direct_pruning() {
        let network = ring();
        let mut rng = SmallRng::seed_from_u64(0);
        let pruned = thresholded_network(
            &network,
            ThresholdScheme::ThresholdBased { threshold: 3 },
            &mut rng,
        );

        let mut expected = network.clone();
        expected.prune_edges_below_weight(3);
        assert_eq!(pruned.edge_count(), expected.edge_count());
        assert_eq!(pruned.vertex_count(), expected.vertex_count());
        // the source is untouched
        assert_eq!(network.edge_count(), 5);
    }

    #[test]
    fn test_density_target_keeps_the_strongest_edges() {
        let network = ring();
        let mut rng = SmallRng::seed_from_u64(0);
        let pruned = thresholded_network(
            &network,
            ThresholdScheme::LargestLowerThanDensity { target_density: 0.3 },
            &mut rng,
        );

        // 3 of 10 possible connections hits the 0.3 target exactly
        assert_eq!(pruned.edge_count(), 3);
        let weights: Vec<u32> = pruned.edges().map(|(_, _, e)| e.weight).collect();
        assert_eq!(weights, vec![3, 4, 5]);
        // the vertex that lost both its edges is pruned
        assert_eq!(pruned.vertex_count(), 4);
        assert!(pruned.ids_current());
    }

    #[test]
    fn test_random_removal_is_seed_reproducible() {
        let network = ring();
        let scheme = ThresholdScheme::RandomRemovalOfWeakest { target_density: 0.4 };

        let mut rng_a = SmallRng::seed_from_u64(99);
        let mut rng_b = SmallRng::seed_from_u64(99);
        let pruned_a = thresholded_network(&network, scheme, &mut rng_a);
        let pruned_b = thresholded_network(&network, scheme, &mut rng_b);

        // one weakest edge removed brings 5/10 down to the 0.4 target
        assert_eq!(pruned_a.edge_count(), 4);
        let weights_a: Vec<u32> = pruned_a.edges().map(|(_, _, e)| e.weight).collect();
        let weights_b: Vec<u32> = pruned_b.edges().map(|(_, _, e)| e.weight).collect();
        assert_eq!(weights_a, weights_b);
        assert_eq!(weights_a, vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_unreachable_density_target_empties_the_network() {
        let network = ring();
        let mut rng = SmallRng::seed_from_u64(0);
        let pruned = thresholded_network(
            &network,
            ThresholdScheme::LargestLowerThanDensity { target_density: 0.0 },
            &mut rng,
        );
        assert_eq!(pruned.edge_count(), 0);
        assert_eq!(pruned.vertex_count(), 0);
    }
}
