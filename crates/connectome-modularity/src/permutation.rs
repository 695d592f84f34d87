//! Modularity Permutation Strategy
//!
//! Proposes candidate moves for the annealing manager. Two move families:
//!
//! - **vertex shift**: move one randomly chosen vertex into a different
//!   module;
//! - **module move** (hot phase only): merge two random modules, or split
//!   one by extracting its induced subgraph, bisecting it at random and
//!   refining the bisection with a fresh nested annealing run while the
//!   recursion budget lasts.
//!
//! A candidate replaces the working partition only when the Metropolis
//! criterion accepts it; the best partition seen so far is retained
//! separately and returned by [`ModularityPermutation::mapping`].

use connectome_core::{Network, VertexIndex};
use rand::{Rng, RngCore};
use tracing::{debug, warn};

use crate::annealing::SimulatedAnnealingManager;
use crate::cost::{CostFunction, ModularityCostFunction};
use crate::partition::Partition;

/// Chance of proposing a module split/join instead of a vertex shift.
const MODULE_MOVE_PROBABILITY: f64 = 0.2;

/// Module moves are proposed only at or above this temperature; the cold
/// phase refines with vertex shifts alone.
const MODULE_MOVE_MIN_TEMPERATURE: f64 = 0.25;

/// A candidate-move proposer driven by the annealing manager.
pub trait PermutationStrategy {
    /// Produce the starting solution. Called once per run.
    fn initialize(&mut self, rng: &mut dyn RngCore);

    /// Propose one candidate move at the given temperature and apply it if
    /// accepted.
    fn permutate(&mut self, temperature: f64, rng: &mut dyn RngCore);

    /// Release scratch state once the run is over.
    fn clean_up(&mut self);
}

/// Modularity-maximizing permutation over a borrowed network.
#[derive(Debug, Clone)]
pub struct ModularityPermutation<'a> {
    network: &'a Network,
    cost: ModularityCostFunction,
    /// Vertex handles in enumeration order; the shift move indexes into this
    vertices: Vec<VertexIndex>,
    /// Remaining recursion budget for module splitting
    depth: u32,
    /// Cooling divisor handed to nested annealing runs
    step_size: f64,
    /// Starting partition for nested runs; `initialize` falls back to the
    /// √V heuristic when unset
    initial: Option<Partition>,
    current: Partition,
    current_cost: f64,
    best: Partition,
    best_cost: f64,
}

impl<'a> ModularityPermutation<'a> {
    /// Create a strategy over a network with the given recursion depth and
    /// cooling step size.
    pub fn new(network: &'a Network, depth: u32, step_size: f64) -> Self {
        Self {
            network,
            cost: ModularityCostFunction::new(),
            vertices: network.vertices().map(|(v, _)| v).collect(),
            depth,
            step_size,
            initial: None,
            current: Partition::new(),
            current_cost: 0.0,
            best: Partition::new(),
            best_cost: 0.0,
        }
    }

    /// Create a strategy that starts from a given partition instead of a
    /// random one. Used by the nested runs refining a module bisection.
    pub fn with_initial_partition(
        network: &'a Network,
        depth: u32,
        step_size: f64,
        initial: Partition,
    ) -> Self {
        let mut strategy = Self::new(network, depth, step_size);
        strategy.initial = Some(initial);
        strategy
    }

    /// The best partition found so far.
    pub fn mapping(&self) -> &Partition {
        &self.best
    }

    /// Consume the strategy, returning the best partition.
    pub fn into_mapping(self) -> Partition {
        self.best
    }

    /// Cost of the best partition found so far.
    pub fn best_cost(&self) -> f64 {
        self.best_cost
    }

    /// Remaining recursion budget.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Metropolis criterion: never reject an improvement, accept a
    /// worsening of `Δ` with probability `exp(−Δ/T)`. Non-positive
    /// temperatures accept improvements only.
    pub fn accept_change(
        &self,
        cost_before: f64,
        cost_after: f64,
        temperature: f64,
        rng: &mut dyn RngCore,
    ) -> bool {
        if cost_after <= cost_before {
            return true;
        }
        if temperature <= 0.0 {
            return false;
        }
        let acceptance = (-(cost_after - cost_before) / temperature).exp();
        rng.random::<f64>() < acceptance
    }

    /// Move one random vertex to a different module. `None` when only one
    /// module exists.
    fn propose_vertex_shift(&self, rng: &mut dyn RngCore) -> Option<Partition> {
        let modules = self.current.number_of_modules();
        if modules < 2 {
            return None;
        }
        let v = self.vertices[rng.random_range(0..self.vertices.len())];
        let from = self.current.module_of(v)?;
        let target = (from + 1 + rng.random_range(0..modules - 1)) % modules;

        let mut candidate = self.current.clone();
        candidate.set_module(v, target);
        if candidate.module_size(from) == 0 {
            candidate.remove_module(from);
        }
        Some(candidate)
    }

    /// Merge two random modules or split one, whichever is possible; a coin
    /// flip decides when both are.
    fn propose_module_move(&self, temperature: f64, rng: &mut dyn RngCore) -> Option<Partition> {
        let modules = self.current.number_of_modules();
        let join_possible = modules >= 2;
        let split_candidates: Vec<usize> = self
            .current
            .module_sizes()
            .iter()
            .enumerate()
            .filter(|(_, &size)| size >= 2)
            .map(|(module, _)| module)
            .collect();

        let join = match (join_possible, !split_candidates.is_empty()) {
            (false, false) => return None,
            (true, false) => true,
            (false, true) => false,
            (true, true) => rng.random::<f64>() < 0.5,
        };

        let mut candidate = self.current.clone();
        if join {
            let a = rng.random_range(0..modules);
            let b = (a + 1 + rng.random_range(0..modules - 1)) % modules;
            candidate.join_modules(a, b);
        } else {
            let module = split_candidates[rng.random_range(0..split_candidates.len())];
            self.split_module(&mut candidate, module, temperature, rng);
        }
        Some(candidate)
    }

    /// Bisect a module at random and, while the recursion budget lasts,
    /// refine the bisection with a nested annealing run on the module's
    /// induced subgraph.
    ///
    /// Sub-module 0 keeps the original module index; every other sub-module
    /// lands in one fresh index, so the parent-level move is always a
    /// bisection. An exhausted budget keeps the plain random bisection.
    fn split_module(
        &self,
        partition: &mut Partition,
        module: usize,
        temperature: f64,
        rng: &mut dyn RngCore,
    ) {
        let members = partition.vertices_in_module(module);
        if members.len() < 2 {
            return;
        }
        let sub = self.network.induced_subgraph(&members);
        let sub_vertices: Vec<VertexIndex> = sub.network.vertices().map(|(v, _)| v).collect();
        let bisection = Partition::randomly_assign(&sub_vertices, 2, rng);

        let refined = if self.depth > 0 {
            debug!(module, depth = self.depth, "refining split with nested annealing");
            let strategy = ModularityPermutation::with_initial_partition(
                &sub.network,
                self.depth - 1,
                self.step_size,
                bisection,
            );
            let mut manager = SimulatedAnnealingManager::new(strategy);
            match manager.run_simulated_annealing(temperature, self.step_size, rng) {
                Ok(()) => manager.into_strategy().into_mapping(),
                Err(error) => {
                    warn!(%error, "nested annealing rejected its configuration");
                    return;
                }
            }
        } else {
            bisection
        };

        let fresh = partition.number_of_modules();
        for (&sub_v, &sub_module) in refined.iter() {
            if sub_module == 0 {
                continue;
            }
            if let Some(&parent_v) = sub.to_parent.get(&sub_v) {
                partition.set_module(parent_v, fresh);
            }
        }
        if partition.module_size(module) == 0 {
            partition.remove_module(module);
        }
    }
}

impl PermutationStrategy for ModularityPermutation<'_> {
    /// Start from the preset partition when one was supplied, otherwise
    /// assign vertices across `round(√V)` modules at random.
    fn initialize(&mut self, rng: &mut dyn RngCore) {
        let partition = match self.initial.take() {
            Some(partition) => partition,
            None => {
                let modules = (self.vertices.len() as f64).sqrt().round().max(1.0) as usize;
                Partition::randomly_assign(&self.vertices, modules, rng)
            }
        };
        self.current_cost = self.cost.evaluate(self.network, &partition);
        self.best = partition.clone();
        self.best_cost = self.current_cost;
        self.current = partition;
    }

    fn permutate(&mut self, temperature: f64, rng: &mut dyn RngCore) {
        if self.vertices.is_empty() {
            return;
        }
        let module_move = temperature >= MODULE_MOVE_MIN_TEMPERATURE
            && rng.random::<f64>() < MODULE_MOVE_PROBABILITY;
        let candidate = if module_move {
            self.propose_module_move(temperature, rng)
        } else {
            self.propose_vertex_shift(rng)
        };
        let Some(candidate) = candidate else {
            return;
        };

        let candidate_cost = self.cost.evaluate(self.network, &candidate);
        if self.accept_change(self.current_cost, candidate_cost, temperature, rng) {
            self.current = candidate;
            self.current_cost = candidate_cost;
            if candidate_cost < self.best_cost {
                self.best = self.current.clone();
                self.best_cost = candidate_cost;
            }
        }
    }

    /// Drops the working partition; the retained best mapping is unaffected.
    fn clean_up(&mut self) {
        self.current = Partition::new();
        self.current_cost = 0.0;
    }
}
