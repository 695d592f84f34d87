//! Network Metrics
//!
//! Read-only graph measures over a [`Network`]: degree and density,
//! clustering coefficients, Brandes betweenness centrality, weighted
//! shortest paths, and component/distance statistics.
//!
//! Every returned vector is indexed by enumeration position, which equals
//! the vertex `id` whenever ids are current (they are after construction
//! and after every prune/renumber). Run [`Network::update_ids`] after
//! manual deletions before consuming these results as id-indexed.

use std::collections::{HashMap, VecDeque};

use petgraph::algo::dijkstra;
use petgraph::visit::EdgeRef;
use tracing::warn;

use crate::network::{Network, VertexIndex};

/// Computes graph measures over a borrowed network.
///
/// All queries are pure; the engine holds no state beyond the borrow.
#[derive(Debug, Clone, Copy)]
pub struct NetworkMetrics<'a> {
    network: &'a Network,
}

impl<'a> NetworkMetrics<'a> {
    /// Create a metrics engine over a network.
    pub fn new(network: &'a Network) -> Self {
        Self { network }
    }

    fn vertex_order(&self) -> Vec<VertexIndex> {
        self.network.vertices().map(|(v, _)| v).collect()
    }

    fn positions(&self) -> HashMap<VertexIndex, usize> {
        self.vertex_order()
            .into_iter()
            .enumerate()
            .map(|(position, v)| (v, position))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Degree and Density
    // ------------------------------------------------------------------------

    /// Mean degree `2E / V`; `0.0` for the empty network.
    pub fn average_degree(&self) -> f64 {
        let v = self.network.vertex_count();
        if v == 0 {
            return 0.0;
        }
        2.0 * self.network.edge_count() as f64 / v as f64
    }

    /// Fraction of possible connections present, `E / (V·(V−1)/2)`;
    /// `0.0` for networks with fewer than two vertices.
    pub fn connection_density(&self) -> f64 {
        let v = self.network.vertex_count();
        if v < 2 {
            return 0.0;
        }
        let possible = (v * (v - 1)) as f64 / 2.0;
        self.network.edge_count() as f64 / possible
    }

    /// Neighbor count per vertex.
    pub fn degree_of_nodes(&self) -> Vec<usize> {
        self.vertex_order()
            .into_iter()
            .map(|v| self.network.degree(v))
            .collect()
    }

    /// Number of vertices with no adjacent edges.
    pub fn number_of_isolated_points(&self) -> usize {
        self.degree_of_nodes().into_iter().filter(|&d| d == 0).count()
    }

    /// Fraction of vertices with no adjacent edges.
    pub fn ratio_of_isolated_points(&self) -> f64 {
        self.degree_ratio(0)
    }

    /// Number of vertices with exactly one adjacent edge.
    pub fn number_of_end_points(&self) -> usize {
        self.degree_of_nodes().into_iter().filter(|&d| d == 1).count()
    }

    /// Fraction of vertices with exactly one adjacent edge.
    pub fn ratio_of_end_points(&self) -> f64 {
        self.degree_ratio(1)
    }

    fn degree_ratio(&self, degree: usize) -> f64 {
        let v = self.network.vertex_count();
        if v == 0 {
            return 0.0;
        }
        self.degree_of_nodes()
            .into_iter()
            .filter(|&d| d == degree)
            .count() as f64
            / v as f64
    }

    // ------------------------------------------------------------------------
    // Clustering Coefficients
    // ------------------------------------------------------------------------

    /// Per-vertex triangle density among neighbors: the fraction of a
    /// vertex's neighbor pairs that are themselves connected. Vertices of
    /// degree below two score `0.0`.
    pub fn local_clustering_coefficients(&self) -> Vec<f64> {
        let order = self.vertex_order();
        order
            .iter()
            .map(|&v| {
                let neighbors: Vec<VertexIndex> =
                    self.network.inner().neighbors(v).collect();
                let k = neighbors.len();
                if k < 2 {
                    return 0.0;
                }
                let mut closed = 0usize;
                for i in 0..k {
                    for j in (i + 1)..k {
                        if self.network.edge_exists(neighbors[i], neighbors[j]) {
                            closed += 1;
                        }
                    }
                }
                2.0 * closed as f64 / (k * (k - 1)) as f64
            })
            .collect()
    }

    /// Mean local clustering coefficient per degree value, indexed by
    /// degree. Degree classes with no vertices score `0.0`.
    pub fn clustering_coefficients_by_degree(&self) -> Vec<f64> {
        let degrees = self.degree_of_nodes();
        let local = self.local_clustering_coefficients();
        let max_degree = degrees.iter().copied().max().unwrap_or(0);

        let mut sums = vec![0.0; max_degree + 1];
        let mut counts = vec![0usize; max_degree + 1];
        for (coefficient, degree) in local.iter().zip(&degrees) {
            sums[*degree] += coefficient;
            counts[*degree] += 1;
        }
        sums.iter()
            .zip(&counts)
            .map(|(&sum, &count)| if count > 0 { sum / count as f64 } else { 0.0 })
            .collect()
    }

    /// Degree-distribution-weighted clustering, `Σ_k P(k)·c̄(k)`, where
    /// `P(k)` is the empirical degree distribution.
    pub fn global_clustering_coefficient(&self) -> f64 {
        let v = self.network.vertex_count();
        if v == 0 {
            return 0.0;
        }
        let degrees = self.degree_of_nodes();
        let by_degree = self.clustering_coefficients_by_degree();

        let mut counts = vec![0usize; by_degree.len()];
        for &degree in &degrees {
            counts[degree] += 1;
        }
        by_degree
            .iter()
            .zip(&counts)
            .map(|(&mean, &count)| mean * count as f64 / v as f64)
            .sum()
    }

    // ------------------------------------------------------------------------
    // Betweenness Centrality
    // ------------------------------------------------------------------------

    /// Vertex betweenness centrality: for each vertex, the number of
    /// all-pairs shortest paths passing through it (Brandes, every edge at
    /// unit length). Each unordered pair is counted once.
    pub fn node_betweenness_vector(&self) -> Vec<f64> {
        self.betweenness().0
    }

    /// Edge betweenness centrality, aligned with [`Network::edges`]
    /// enumeration order. Each unordered pair is counted once.
    pub fn edge_betweenness_vector(&self) -> Vec<f64> {
        self.betweenness().1
    }

    /// Mean vertex betweenness; `0.0` for the empty network.
    pub fn average_node_betweenness(&self) -> f64 {
        mean(&self.node_betweenness_vector())
    }

    /// Mean edge betweenness; `0.0` for the edgeless network.
    pub fn average_edge_betweenness(&self) -> f64 {
        mean(&self.edge_betweenness_vector())
    }

    /// Brandes' algorithm, accumulating vertex and edge scores in one pass.
    /// Every vertex acts as a source; undirected double counting is halved
    /// at the end.
    fn betweenness(&self) -> (Vec<f64>, Vec<f64>) {
        let order = self.vertex_order();
        let positions = self.positions();
        let n = order.len();

        let edge_positions: HashMap<_, usize> = self
            .network
            .inner()
            .edge_indices()
            .enumerate()
            .map(|(position, e)| (e, position))
            .collect();
        let m = edge_positions.len();

        let mut node_score = vec![0.0; n];
        let mut edge_score = vec![0.0; m];

        for &source in &order {
            let s = positions[&source];

            let mut visit_stack: Vec<usize> = Vec::with_capacity(n);
            let mut predecessors: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
            let mut path_counts = vec![0u64; n];
            let mut hops = vec![-1i64; n];
            path_counts[s] = 1;
            hops[s] = 0;

            let mut queue = VecDeque::new();
            queue.push_back(source);
            while let Some(v) = queue.pop_front() {
                let vp = positions[&v];
                visit_stack.push(vp);
                for (neighbor, edge) in self.network.neighbor_edges(v) {
                    let np = positions[&neighbor];
                    if hops[np] < 0 {
                        hops[np] = hops[vp] + 1;
                        queue.push_back(neighbor);
                    }
                    if hops[np] == hops[vp] + 1 {
                        path_counts[np] += path_counts[vp];
                        predecessors[np].push((vp, edge_positions[&edge]));
                    }
                }
            }

            let mut dependency = vec![0.0; n];
            while let Some(w) = visit_stack.pop() {
                for &(v, e) in &predecessors[w] {
                    let credit =
                        path_counts[v] as f64 / path_counts[w] as f64 * (1.0 + dependency[w]);
                    edge_score[e] += credit;
                    dependency[v] += credit;
                }
                if w != s {
                    node_score[w] += dependency[w];
                }
            }
        }

        for score in &mut node_score {
            *score /= 2.0;
        }
        for score in &mut edge_score {
            *score /= 2.0;
        }
        (node_score, edge_score)
    }

    // ------------------------------------------------------------------------
    // Shortest Paths
    // ------------------------------------------------------------------------

    /// Weighted single-source shortest distances from the first vertex
    /// carrying the given label, using each edge's `distance` as its cost.
    ///
    /// A missing label warns and yields a zero-filled vector of length V.
    /// Unreachable vertices are `f64::INFINITY`.
    pub fn shortest_distance_vector_from_label(&self, label: &str) -> Vec<f64> {
        let n = self.network.vertex_count();
        let Some(start) = self.network.find_vertex_by_label(label) else {
            warn!(label, "label not found in network, returning zeroed distances");
            return vec![0.0; n];
        };

        let costs = dijkstra(self.network.inner(), start, None, |e| e.weight().distance);
        self.vertex_order()
            .into_iter()
            .map(|v| costs.get(&v).copied().unwrap_or(f64::INFINITY))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Components and Distance Statistics
    // ------------------------------------------------------------------------

    /// Sizes of the connected components, largest first.
    pub fn connected_component_sizes(&self) -> Vec<usize> {
        let order = self.vertex_order();
        let positions = self.positions();
        let mut seen = vec![false; order.len()];
        let mut sizes = Vec::new();

        for &start in &order {
            if seen[positions[&start]] {
                continue;
            }
            let mut size = 0;
            let mut queue = VecDeque::from([start]);
            seen[positions[&start]] = true;
            while let Some(v) = queue.pop_front() {
                size += 1;
                for neighbor in self.network.inner().neighbors(v) {
                    let np = positions[&neighbor];
                    if !seen[np] {
                        seen[np] = true;
                        queue.push_back(neighbor);
                    }
                }
            }
            sizes.push(size);
        }
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes
    }

    /// Number of connected components.
    pub fn number_of_connected_components(&self) -> usize {
        self.connected_component_sizes().len()
    }

    /// Vertex count of the largest component, 0 for the empty network.
    pub fn largest_component_size(&self) -> usize {
        self.connected_component_sizes().first().copied().unwrap_or(0)
    }

    /// Mean component size; `0.0` for the empty network.
    pub fn average_component_size(&self) -> f64 {
        let sizes = self.connected_component_sizes();
        if sizes.is_empty() {
            return 0.0;
        }
        sizes.iter().sum::<usize>() as f64 / sizes.len() as f64
    }

    /// Per-vertex eccentricity: the hop count to the farthest reachable
    /// vertex.
    pub fn eccentricity_vector(&self) -> Vec<usize> {
        let order = self.vertex_order();
        let positions = self.positions();
        order
            .iter()
            .map(|&v| {
                self.hop_distances(v, &positions)
                    .into_iter()
                    .filter(|&d| d >= 0)
                    .max()
                    .unwrap_or(0) as usize
            })
            .collect()
    }

    /// Largest eccentricity, 0 for the empty network.
    pub fn diameter(&self) -> usize {
        self.eccentricity_vector().into_iter().max().unwrap_or(0)
    }

    /// Smallest eccentricity, 0 for the empty network.
    pub fn radius(&self) -> usize {
        self.eccentricity_vector().into_iter().min().unwrap_or(0)
    }

    /// Mean eccentricity; `0.0` for the empty network.
    pub fn average_eccentricity(&self) -> f64 {
        let eccentricities = self.eccentricity_vector();
        if eccentricities.is_empty() {
            return 0.0;
        }
        eccentricities.iter().sum::<usize>() as f64 / eccentricities.len() as f64
    }

    /// Mean hop count over reachable unordered vertex pairs; `0.0` when no
    /// pair is reachable.
    pub fn average_path_length(&self) -> f64 {
        let order = self.vertex_order();
        let positions = self.positions();
        let mut total = 0u64;
        let mut pairs = 0u64;

        for (i, &v) in order.iter().enumerate() {
            for (j, &d) in self.hop_distances(v, &positions).iter().enumerate() {
                if j > i && d >= 0 {
                    total += d as u64;
                    pairs += 1;
                }
            }
        }
        if pairs == 0 {
            return 0.0;
        }
        total as f64 / pairs as f64
    }

    /// Unit-length BFS distances by position; `-1` marks unreachable.
    fn hop_distances(&self, start: VertexIndex, positions: &HashMap<VertexIndex, usize>) -> Vec<i64> {
        let mut distances = vec![-1i64; positions.len()];
        distances[positions[&start]] = 0;
        let mut queue = VecDeque::from([start]);
        while let Some(v) = queue.pop_front() {
            let vp = positions[&v];
            for neighbor in self.network.inner().neighbors(v) {
                let np = positions[&neighbor];
                if distances[np] < 0 {
                    distances[np] = distances[vp] + 1;
                    queue.push_back(neighbor);
                }
            }
        }
        distances
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
