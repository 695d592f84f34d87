//! Common test utilities for integration tests.
//!
//! Provides the 12-region reference network: three densely connected
//! clusters (sizes 5, 4 and 3) joined by one bridge edge per cluster pair,
//! every connection observed twice.

#![allow(dead_code)]

use connectome_core::{Network, VertexIndex};
use connectome_modularity::Partition;

/// Edge list of the reference network.
pub const EDGES: [(usize, usize); 18] = [
    (0, 1),
    (0, 2),
    (0, 4),
    (0, 5),
    (1, 2),
    (1, 3),
    (2, 3),
    (2, 9),
    (3, 4),
    (5, 6),
    (5, 7),
    (6, 7),
    (6, 8),
    (6, 11),
    (7, 8),
    (9, 10),
    (9, 11),
    (10, 11),
];

/// Build the reference network and return the vertex handles in id order.
pub fn reference_network() -> (Network, Vec<VertexIndex>) {
    let mut network = Network::new();
    let handles: Vec<VertexIndex> = (0..12).map(|id| network.add_vertex(id)).collect();
    for &(a, b) in &EDGES {
        network.add_edge(handles[a], handles[b], 2).unwrap();
    }
    (network, handles)
}

/// Build a partition by assigning `modules[i]` to the vertex with id `i`.
pub fn partition_by_id(handles: &[VertexIndex], modules: &[usize]) -> Partition {
    handles
        .iter()
        .zip(modules)
        .map(|(&v, &m)| (v, m))
        .collect()
}

/// Initialize test logging once; respects `RUST_LOG`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
