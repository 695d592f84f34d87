//! Common test utilities for integration tests.
//!
//! Provides the 12-region reference network shared across test files:
//! three densely connected clusters (sizes 5, 4 and 3) joined by one
//! bridge edge per cluster pair, every connection observed twice.

#![allow(dead_code)]

use connectome_core::{Network, VertexIndex};

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

/// Build the reference network: 12 vertices, 18 edges, all weights 2,
/// labels `region-0` .. `region-11`.
pub fn reference_network() -> Network {
    let (network, _) = reference_network_with_handles();
    network
}

/// Build the reference network and return the vertex handles in id order.
pub fn reference_network_with_handles() -> (Network, Vec<VertexIndex>) {
    let mut network = Network::new();
    let handles: Vec<VertexIndex> = (0..12).map(|id| network.add_vertex(id)).collect();
    for (id, &v) in handles.iter().enumerate() {
        network.set_label(v, format!("region-{id}")).unwrap();
        network.set_coordinates(v, [id as f32, 0.0, 0.0]).unwrap();
    }
    for &(a, b) in &EDGES {
        assert!(!network.edge_exists(handles[a], handles[b]));
        network.add_edge(handles[a], handles[b], 2).unwrap();
    }
    (network, handles)
}
