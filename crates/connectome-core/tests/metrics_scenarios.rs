//! Metric values on the 12-region reference network.
//!
//! The expected numbers are exact arithmetic on the fixture topology
//! (fractions given in comments where they are not obvious).

mod common;

use common::reference_network;
use connectome_core::NetworkMetrics;

const TOLERANCE: f64 = 1e-3;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn reference_network_counts() {
    let network = reference_network();
    assert_eq!(network.vertex_count(), 12);
    assert_eq!(network.edge_count(), 18);
    assert_eq!(network.self_loop_count(), 0);
    assert_eq!(network.max_weight(), 2);
    assert!(network.ids_current());
}

#[test]
fn reference_network_degree_and_density() {
    let network = reference_network();
    let metrics = NetworkMetrics::new(&network);

    assert_close(metrics.average_degree(), 3.0);
    assert_close(metrics.connection_density(), 18.0 / 66.0); // ≈ 0.2727
    assert_eq!(
        metrics.degree_of_nodes(),
        vec![4, 3, 4, 3, 2, 3, 4, 3, 2, 3, 2, 3]
    );
}

#[test]
fn reference_network_clustering() {
    let network = reference_network();
    let metrics = NetworkMetrics::new(&network);

    let local = metrics.local_clustering_coefficients();
    let expected = [
        1.0 / 6.0,
        2.0 / 3.0,
        1.0 / 3.0,
        1.0 / 3.0,
        0.0,
        1.0 / 3.0,
        1.0 / 3.0,
        2.0 / 3.0,
        1.0,
        1.0 / 3.0,
        1.0,
        1.0 / 3.0,
    ];
    for (actual, expected) in local.iter().zip(expected) {
        assert_close(*actual, expected);
    }

    let by_degree = metrics.clustering_coefficients_by_degree();
    assert_eq!(by_degree.len(), 5);
    assert_close(by_degree[0], 0.0);
    assert_close(by_degree[1], 0.0);
    assert_close(by_degree[2], 2.0 / 3.0);
    assert_close(by_degree[3], 4.0 / 9.0);
    assert_close(by_degree[4], 5.0 / 18.0);

    assert_close(metrics.global_clustering_coefficient(), 11.0 / 24.0); // ≈ 0.4583
}

#[test]
fn reference_network_betweenness() {
    let network = reference_network();
    let metrics = NetworkMetrics::new(&network);

    let node = metrics.node_betweenness_vector();
    let expected_node = [
        17.9405, 1.5357, 13.5952, 2.3333, 1.5357, 14.6071, 12.5714, 2.7619, 0.0, 10.3929, 0.0,
        8.7262,
    ];
    for (actual, expected) in node.iter().zip(expected_node) {
        assert_close(*actual, expected);
    }

    let edge = metrics.edge_betweenness_vector();
    let expected_edge = [
        7.0357, 10.5357, 9.2024, 20.1071, 4.0, 3.0357, 7.7619, 15.8929, 4.8690, 11.3452, 8.7619,
        4.0, 7.2381, 13.5595, 3.7619, 6.0, 9.8929, 5.0,
    ];
    for (actual, expected) in edge.iter().zip(expected_edge) {
        assert_close(*actual, expected);
    }

    assert_close(metrics.average_node_betweenness(), 86.0 / 12.0);
    assert_close(metrics.average_edge_betweenness(), 152.0 / 18.0);
}

#[test]
fn reference_network_shortest_distances() {
    let network = reference_network();
    let metrics = NetworkMetrics::new(&network);

    // all edges carry the default unit distance
    let distances = metrics.shortest_distance_vector_from_label("region-0");
    let expected = [0.0, 1.0, 1.0, 2.0, 1.0, 1.0, 2.0, 2.0, 3.0, 2.0, 3.0, 3.0];
    for (actual, expected) in distances.iter().zip(expected) {
        assert_close(*actual, expected);
    }
}

#[test]
fn reference_network_component_and_distance_statistics() {
    let network = reference_network();
    let metrics = NetworkMetrics::new(&network);

    assert_eq!(metrics.connected_component_sizes(), vec![12]);
    assert_eq!(metrics.number_of_isolated_points(), 0);
    assert_eq!(metrics.number_of_end_points(), 0);
    assert_eq!(
        metrics.eccentricity_vector(),
        vec![3, 4, 4, 5, 4, 3, 4, 4, 5, 3, 4, 4]
    );
    assert_eq!(metrics.diameter(), 5);
    assert_eq!(metrics.radius(), 3);
    assert_close(metrics.average_eccentricity(), 47.0 / 12.0);
    assert_close(metrics.average_path_length(), 152.0 / 66.0); // ≈ 2.3030
}
