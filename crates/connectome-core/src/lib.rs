//! Connectome Core - in-memory brain connectivity networks
//!
//! This crate provides the network engine underlying connectome analysis:
//! - Weighted undirected graph storage with stable vertex handles
//! - Structural mutation: edge-weight accumulation, pruning, renumbering
//! - Graph metrics: degree, density, clustering, betweenness centrality,
//!   weighted shortest paths, component statistics
//! - Density- and weight-targeted network thresholding
//!
//! The engine is single-threaded and synchronous. Networks are built by
//! external producers (tractography pipelines, synthetic generators) and
//! consumed by external renderers and reports; this crate owns only the
//! graph itself and the queries over it.

pub mod error;
pub mod metrics;
pub mod network;
pub mod threshold;

// Re-exports for convenience
pub use error::{NetworkError, Result};
pub use metrics::NetworkMetrics;
pub use network::{Edge, InducedSubgraph, Network, Vertex, VertexIndex};
pub use threshold::{thresholded_network, ThresholdScheme};
