//! Vertex Partitions
//!
//! A [`Partition`] maps every vertex of a network to a module index.
//! Module indices are kept dense (`0..number_of_modules`): the compaction
//! in [`Partition::remove_module`] renumbers the highest-indexed module
//! into a freed slot instead of re-scanning all indices.
//!
//! The map is ordered so that iteration is deterministic; the optimizer
//! depends on this for seed-reproducible runs.

use std::collections::BTreeMap;

use connectome_core::VertexIndex;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

/// Assignment of vertices to integer-labeled modules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    map: BTreeMap<VertexIndex, usize>,
}

impl Partition {
    /// Create an empty partition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `vertices` across `modules` modules uniformly at random.
    ///
    /// When `modules ≤ vertices.len()`, every module is guaranteed at least
    /// one vertex. A request for more modules than vertices is clamped.
    pub fn randomly_assign(
        vertices: &[VertexIndex],
        modules: usize,
        rng: &mut dyn RngCore,
    ) -> Self {
        if vertices.is_empty() {
            return Self::new();
        }
        let modules = modules.clamp(1, vertices.len());

        let mut order: Vec<usize> = (0..vertices.len()).collect();
        order.shuffle(rng);

        let mut map = BTreeMap::new();
        for (slot, &position) in order.iter().enumerate() {
            let module = if slot < modules {
                slot
            } else {
                rng.random_range(0..modules)
            };
            map.insert(vertices[position], module);
        }
        Self { map }
    }

    /// Number of vertices covered.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no vertex is covered.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Module of a vertex, if assigned.
    pub fn module_of(&self, v: VertexIndex) -> Option<usize> {
        self.map.get(&v).copied()
    }

    /// Assign a vertex to a module.
    pub fn set_module(&mut self, v: VertexIndex, module: usize) {
        self.map.insert(v, module);
    }

    /// Iterate over `(vertex, module)` assignments in vertex order.
    pub fn iter(&self) -> impl Iterator<Item = (&VertexIndex, &usize)> {
        self.map.iter()
    }

    /// One past the highest module index; 0 for the empty partition.
    pub fn number_of_modules(&self) -> usize {
        self.map.values().max().map_or(0, |&m| m + 1)
    }

    /// Vertex count per module, indexed by module.
    pub fn module_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.number_of_modules()];
        for &module in self.map.values() {
            sizes[module] += 1;
        }
        sizes
    }

    /// Vertex count of one module.
    pub fn module_size(&self, module: usize) -> usize {
        self.map.values().filter(|&&m| m == module).count()
    }

    /// Vertices of one module, in vertex order.
    pub fn vertices_in_module(&self, module: usize) -> Vec<VertexIndex> {
        self.map
            .iter()
            .filter(|(_, &m)| m == module)
            .map(|(&v, _)| v)
            .collect()
    }

    /// Free the slot of module `module` by renumbering the highest-indexed
    /// module into it.
    ///
    /// Callers empty the module first (or accept the merge of its remaining
    /// vertices into the relabeled module). Keeps indices dense.
    pub fn remove_module(&mut self, module: usize) {
        let modules = self.number_of_modules();
        if modules == 0 || module >= modules - 1 {
            return;
        }
        let highest = modules - 1;
        for m in self.map.values_mut() {
            if *m == highest {
                *m = module;
            }
        }
    }

    /// Merge module `b` into module `a` and compact the freed slot.
    pub fn join_modules(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for m in self.map.values_mut() {
            if *m == b {
                *m = a;
            }
        }
        self.remove_module(b);
    }
}

impl FromIterator<(VertexIndex, usize)> for Partition {
    fn from_iter<I: IntoIterator<Item = (VertexIndex, usize)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}
