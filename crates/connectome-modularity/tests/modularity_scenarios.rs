//! Modularity scores of hand-picked partitions of the reference network.
//!
//! Expected values are exact arithmetic on the fixture topology; fractions
//! are given where the decimal is rounded.

mod common;

use common::{partition_by_id, reference_network};
use connectome_modularity::{CostFunction, ModularityCostFunction};

#[test]
fn cluster_aligned_partition_scores_high() {
    let (network, handles) = reference_network();
    let partition = partition_by_id(&handles, &[0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2]);
    let cost = ModularityCostFunction::new();

    assert_eq!(partition.number_of_modules(), 3);
    assert_eq!(partition.module_sizes(), vec![5, 4, 3]);

    let q = cost.calculate_modularity(&network, &partition).unwrap();
    assert!((q - 0.4753).abs() < 1e-3); // exactly 616/1296

    // the minimized cost mirrors the score
    let evaluated = cost.evaluate(&network, &partition);
    assert!((evaluated - 100.0 * (1.0 - q)).abs() < 1e-9);
}

#[test]
fn all_one_module_partition_scores_zero() {
    let (network, handles) = reference_network();
    let partition = partition_by_id(&handles, &[0; 12]);

    let q = ModularityCostFunction::new()
        .calculate_modularity(&network, &partition)
        .unwrap();
    assert!(q.abs() < 1e-3);
}

#[test]
fn misaligned_bisection_scores_low() {
    let (network, handles) = reference_network();
    let partition = partition_by_id(&handles, &[0, 0, 0, 0, 0, 1, 1, 1, 0, 1, 1, 0]);

    let q = ModularityCostFunction::new()
        .calculate_modularity(&network, &partition)
        .unwrap();
    assert!((q - 0.097222).abs() < 1e-5); // exactly 7/72
}

#[test]
fn interleaved_partition_scores_negative() {
    let (network, handles) = reference_network();
    let modules: Vec<usize> = (0..12).map(|id| id % 3).collect();
    let partition = partition_by_id(&handles, &modules);

    // no edge of the fixture stays inside a module under this interleaving
    for &(a, b) in &common::EDGES {
        assert_ne!(a % 3, b % 3);
    }

    let q = ModularityCostFunction::new()
        .calculate_modularity(&network, &partition)
        .unwrap();
    assert!((q - (-0.3395)).abs() < 1e-3); // exactly -440/1296
}
