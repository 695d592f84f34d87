//! Connectivity Network Storage
//!
//! This module defines the vertex/edge value types and the `Network` store:
//! a weighted undirected graph over `petgraph::StableGraph`, which keeps
//! vertex handles stable across unrelated deletions and gives O(1) neighbor
//! access for the metric algorithms.
//!
//! Vertex ids mirror enumeration positions. Deletions desynchronize the two
//! until [`Network::update_ids`] renumbers; both prune operations call it on
//! completion, so id-indexed algorithms can run directly after pruning.

use std::collections::HashMap;

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{NetworkError, Result};

/// Stable handle to a vertex in a [`Network`].
pub type VertexIndex = NodeIndex;

// ============================================================================
// Value Types
// ============================================================================

/// A vertex in a connectivity network: one parcellated brain region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Enumeration-position mirror; current only after the last renumbering
    pub id: usize,

    /// Free-text region label (e.g. an atlas name); empty by default
    pub label: String,

    /// Region center in world coordinates
    pub coordinates: [f32; 3],
}

impl Vertex {
    /// Create a new vertex with an empty label at the origin.
    pub fn new(id: usize) -> Self {
        Self {
            id,
            label: String::new(),
            coordinates: [0.0; 3],
        }
    }

    /// Set the region label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the region center.
    pub fn with_coordinates(mut self, coordinates: [f32; 3]) -> Self {
        self.coordinates = coordinates;
        self
    }
}

/// An undirected edge: the connection between two regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Id of one endpoint at the last renumbering
    pub source_id: usize,

    /// Id of the other endpoint at the last renumbering
    pub target_id: usize,

    /// Observation count backing this connection (e.g. fiber count)
    pub weight: u32,

    /// Traversal cost used by weighted shortest-path queries only
    pub distance: f64,
}

impl Edge {
    /// Create an edge with the default unit traversal cost.
    pub fn new(source_id: usize, target_id: usize, weight: u32) -> Self {
        Self {
            source_id,
            target_id,
            weight,
            distance: 1.0,
        }
    }
}

/// An induced subgraph together with handle translations to and from the
/// network it was extracted from.
#[derive(Debug, Clone)]
pub struct InducedSubgraph {
    /// The extracted network (ids renumbered to `0..n`)
    pub network: Network,
    /// Parent handle → subgraph handle
    pub to_sub: HashMap<VertexIndex, VertexIndex>,
    /// Subgraph handle → parent handle
    pub to_parent: HashMap<VertexIndex, VertexIndex>,
}

// ============================================================================
// Network
// ============================================================================

/// A weighted undirected connectivity network.
///
/// The store is the only writer of its vertices and edges. Every mutation
/// sets the dirty flag; consumers that have caught up clear it with
/// [`Network::set_modified`]. Mutation from multiple threads is unsupported.
///
/// At most one edge may connect any unordered vertex pair. The store does
/// not deduplicate on insertion; callers check [`Network::edge_exists`]
/// first and use [`Network::increase_edge_weight`] for repeat observations.
#[derive(Debug, Clone, Default)]
pub struct Network {
    graph: StableUnGraph<Vertex, Edge>,
    modified: bool,
}

impl Network {
    /// Create a new empty network.
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Vertex Operations
    // ------------------------------------------------------------------------

    /// Add a vertex with the given id, returning its handle.
    ///
    /// Always succeeds; the store accepts any id. Producers that must reject
    /// duplicate ids pre-check with [`Network::vertex_with_id`].
    pub fn add_vertex(&mut self, id: usize) -> VertexIndex {
        self.modified = true;
        self.graph.add_node(Vertex::new(id))
    }

    /// Get a vertex by its handle.
    pub fn get_vertex(&self, v: VertexIndex) -> Option<&Vertex> {
        self.graph.node_weight(v)
    }

    /// Find the first vertex carrying the given id, in enumeration order.
    pub fn vertex_with_id(&self, id: usize) -> Option<VertexIndex> {
        self.graph.node_indices().find(|&v| self.graph[v].id == id)
    }

    /// Set a vertex label.
    pub fn set_label(&mut self, v: VertexIndex, label: impl Into<String>) -> Result<()> {
        let vertex = self
            .graph
            .node_weight_mut(v)
            .ok_or_else(|| NetworkError::vertex_not_found(v))?;
        vertex.label = label.into();
        self.modified = true;
        Ok(())
    }

    /// Set a vertex position.
    pub fn set_coordinates(&mut self, v: VertexIndex, coordinates: [f32; 3]) -> Result<()> {
        let vertex = self
            .graph
            .node_weight_mut(v)
            .ok_or_else(|| NetworkError::vertex_not_found(v))?;
        vertex.coordinates = coordinates;
        self.modified = true;
        Ok(())
    }

    /// Find the first vertex whose label matches, in enumeration order.
    pub fn find_vertex_by_label(&self, label: &str) -> Option<VertexIndex> {
        self.graph
            .node_indices()
            .find(|&v| self.graph[v].label == label)
    }

    /// Check whether any vertex carries the given label.
    pub fn check_for_label(&self, label: &str) -> bool {
        self.find_vertex_by_label(label).is_some()
    }

    /// Number of live vertices.
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Iterate over all vertices in enumeration order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexIndex, &Vertex)> + '_ {
        self.graph.node_indices().map(move |v| (v, &self.graph[v]))
    }

    /// Number of edges adjacent to a vertex.
    pub fn degree(&self, v: VertexIndex) -> usize {
        self.graph.neighbors(v).count()
    }

    // ------------------------------------------------------------------------
    // Edge Operations
    // ------------------------------------------------------------------------

    /// Add an edge between two vertices, mirroring their current ids.
    ///
    /// Inserting a second edge between an already-connected pair is a caller
    /// error; check [`Network::edge_exists`] first.
    pub fn add_edge(&mut self, a: VertexIndex, b: VertexIndex, weight: u32) -> Result<EdgeIndex> {
        let source_id = self
            .graph
            .node_weight(a)
            .ok_or_else(|| NetworkError::vertex_not_found(a))?
            .id;
        let target_id = self
            .graph
            .node_weight(b)
            .ok_or_else(|| NetworkError::vertex_not_found(b))?
            .id;
        self.add_edge_with_ids(a, b, source_id, target_id, weight)
    }

    /// Add an edge with explicit id mirrors.
    pub fn add_edge_with_ids(
        &mut self,
        a: VertexIndex,
        b: VertexIndex,
        source_id: usize,
        target_id: usize,
        weight: u32,
    ) -> Result<EdgeIndex> {
        if !self.graph.contains_node(a) {
            return Err(NetworkError::vertex_not_found(a));
        }
        if !self.graph.contains_node(b) {
            return Err(NetworkError::vertex_not_found(b));
        }
        self.modified = true;
        Ok(self
            .graph
            .add_edge(a, b, Edge::new(source_id, target_id, weight)))
    }

    /// Check whether an edge connects the two vertices (in either order).
    pub fn edge_exists(&self, a: VertexIndex, b: VertexIndex) -> bool {
        self.graph.find_edge(a, b).is_some()
    }

    /// Get the edge between two vertices.
    pub fn get_edge(&self, a: VertexIndex, b: VertexIndex) -> Result<&Edge> {
        self.graph
            .find_edge(a, b)
            .map(|e| &self.graph[e])
            .ok_or_else(|| NetworkError::edge_not_found(a, b))
    }

    /// Record one more observation of an existing connection.
    pub fn increase_edge_weight(&mut self, a: VertexIndex, b: VertexIndex) -> Result<()> {
        let e = self
            .graph
            .find_edge(a, b)
            .ok_or_else(|| NetworkError::edge_not_found(a, b))?;
        self.graph[e].weight += 1;
        self.modified = true;
        Ok(())
    }

    /// Set the traversal cost of an existing edge.
    pub fn set_edge_distance(&mut self, a: VertexIndex, b: VertexIndex, distance: f64) -> Result<()> {
        let e = self
            .graph
            .find_edge(a, b)
            .ok_or_else(|| NetworkError::edge_not_found(a, b))?;
        self.graph[e].distance = distance;
        self.modified = true;
        Ok(())
    }

    /// Number of live edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterate over all edges as `(endpoint, endpoint, edge)` in enumeration
    /// order.
    pub fn edges(&self) -> impl Iterator<Item = (VertexIndex, VertexIndex, &Edge)> + '_ {
        self.graph.edge_indices().filter_map(move |e| {
            let (a, b) = self.graph.edge_endpoints(e)?;
            Some((a, b, &self.graph[e]))
        })
    }

    /// Largest edge weight in the network, 0 when there are no edges.
    pub fn max_weight(&self) -> u32 {
        self.graph
            .edge_indices()
            .map(|e| self.graph[e].weight)
            .max()
            .unwrap_or(0)
    }

    /// Number of edges whose endpoints are the same vertex.
    pub fn self_loop_count(&self) -> usize {
        self.graph
            .edge_indices()
            .filter(|&e| {
                self.graph
                    .edge_endpoints(e)
                    .map(|(a, b)| a == b)
                    .unwrap_or(false)
            })
            .count()
    }

    // ------------------------------------------------------------------------
    // Renumbering and Pruning
    // ------------------------------------------------------------------------

    /// True when every vertex id equals its enumeration position.
    pub fn ids_current(&self) -> bool {
        self.graph
            .node_indices()
            .enumerate()
            .all(|(position, v)| self.graph[v].id == position)
    }

    /// Reassign every vertex id to its enumeration position and refresh the
    /// id mirrors on every edge.
    ///
    /// Must run after any deletion before id-indexed results are consumed.
    /// Idempotent.
    pub fn update_ids(&mut self) {
        let order: Vec<VertexIndex> = self.graph.node_indices().collect();
        for (position, &v) in order.iter().enumerate() {
            self.graph[v].id = position;
        }
        let edges: Vec<EdgeIndex> = self.graph.edge_indices().collect();
        for e in edges {
            if let Some((a, b)) = self.graph.edge_endpoints(e) {
                let source_id = self.graph[a].id;
                let target_id = self.graph[b].id;
                let edge = &mut self.graph[e];
                edge.source_id = source_id;
                edge.target_id = target_id;
            }
        }
        self.modified = true;
    }

    /// Remove vertices with no adjacent edges until a full pass removes
    /// nothing, then renumber. Returns the number of vertices removed.
    pub fn prune_unconnected_single_nodes(&mut self) -> usize {
        let mut removed = 0;
        loop {
            let isolated: Vec<VertexIndex> = self
                .graph
                .node_indices()
                .filter(|&v| self.graph.neighbors(v).next().is_none())
                .collect();
            if isolated.is_empty() {
                break;
            }
            for v in isolated {
                self.graph.remove_node(v);
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(removed, "pruned unconnected vertices");
            self.modified = true;
        }
        self.update_ids();
        removed
    }

    /// Remove edges with `weight < threshold` until a full pass removes
    /// nothing, then prune newly unconnected vertices and renumber.
    /// Returns the number of edges removed.
    pub fn prune_edges_below_weight(&mut self, threshold: u32) -> usize {
        let mut removed = 0;
        loop {
            let weak: Vec<EdgeIndex> = self
                .graph
                .edge_indices()
                .filter(|&e| self.graph[e].weight < threshold)
                .collect();
            if weak.is_empty() {
                break;
            }
            for e in weak {
                self.graph.remove_edge(e);
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(removed, threshold, "pruned edges below weight threshold");
            self.modified = true;
        }
        self.prune_unconnected_single_nodes();
        removed
    }

    /// Remove a single edge by its index. Leaves ids stale until the next
    /// renumbering.
    pub(crate) fn remove_edge_index(&mut self, e: EdgeIndex) {
        if self.graph.remove_edge(e).is_some() {
            self.modified = true;
        }
    }

    // ------------------------------------------------------------------------
    // Subgraph Extraction
    // ------------------------------------------------------------------------

    /// Extract the subgraph induced by a vertex subset: the vertices plus
    /// every edge of this network connecting a pair within the subset.
    ///
    /// Handles not present in the network are skipped. The extracted network
    /// is renumbered to ids `0..n`.
    pub fn induced_subgraph(&self, vertices: &[VertexIndex]) -> InducedSubgraph {
        let mut network = Network::new();
        let mut to_sub = HashMap::with_capacity(vertices.len());
        let mut to_parent = HashMap::with_capacity(vertices.len());

        for &v in vertices {
            if let Some(vertex) = self.graph.node_weight(v) {
                let sub = network.graph.add_node(vertex.clone());
                to_sub.insert(v, sub);
                to_parent.insert(sub, v);
            }
        }
        for e in self.graph.edge_indices() {
            if let Some((a, b)) = self.graph.edge_endpoints(e) {
                if let (Some(&sa), Some(&sb)) = (to_sub.get(&a), to_sub.get(&b)) {
                    network.graph.add_edge(sa, sb, self.graph[e].clone());
                }
            }
        }
        network.update_ids();

        InducedSubgraph {
            network,
            to_sub,
            to_parent,
        }
    }

    // ------------------------------------------------------------------------
    // Dirty Flag
    // ------------------------------------------------------------------------

    /// Whether the network changed since a consumer last cleared the flag.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Set or clear the dirty flag. Consumers clear it after catching up.
    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    // ------------------------------------------------------------------------
    // Low-level Access
    // ------------------------------------------------------------------------

    /// Get a reference to the underlying graph (read-only; mutation goes
    /// through the store so the dirty flag stays truthful).
    pub fn inner(&self) -> &StableUnGraph<Vertex, Edge> {
        &self.graph
    }
}

// Neighbor enumeration for the metric algorithms; kept here so the EdgeRef
// import stays in one place.
impl Network {
    pub(crate) fn neighbor_edges(
        &self,
        v: VertexIndex,
    ) -> impl Iterator<Item = (VertexIndex, EdgeIndex)> + '_ {
        self.graph.edges(v).map(|e| (e.target(), e.id()))
    }
}
