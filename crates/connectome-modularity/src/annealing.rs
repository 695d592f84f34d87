//! Simulated Annealing Manager
//!
//! Drives a [`PermutationStrategy`] through a geometric cooling schedule:
//! initialize once, then propose moves at each temperature level until the
//! temperature falls below the stopping threshold. The manager owns the
//! loop and the state machine only; retained solutions live in the
//! strategy.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::RngCore;
use thiserror::Error;
use tracing::debug;

use crate::permutation::PermutationStrategy;

/// Cooling stops once the temperature falls to or below this value.
pub const STOP_TEMPERATURE: f64 = 1e-5;

/// Default number of proposed moves per temperature level.
pub const DEFAULT_PERMUTATIONS_PER_TEMPERATURE: usize = 128;

/// Errors that can occur when configuring a run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnnealingError {
    /// Geometric cooling needs a divisor above one to make progress
    #[error("step size must be greater than 1.0 for geometric cooling, got {0}")]
    InvalidStepSize(f64),
}

/// Lifecycle of an annealing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnealingState {
    /// No run has started yet
    NotStarted,
    /// The cooling loop is executing
    Running,
    /// The cooling loop ran to completion
    Converged,
    /// A cancellation request ended the run early
    Cancelled,
}

/// Cloneable cancellation handle, checked once per cooling iteration.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the run holding this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Cooling-schedule driver over an injected permutation strategy.
pub struct SimulatedAnnealingManager<S: PermutationStrategy> {
    strategy: S,
    state: AnnealingState,
    permutations_per_temperature: usize,
    cancel: CancelToken,
}

impl<S: PermutationStrategy> SimulatedAnnealingManager<S> {
    /// Create a manager over a strategy.
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            state: AnnealingState::NotStarted,
            permutations_per_temperature: DEFAULT_PERMUTATIONS_PER_TEMPERATURE,
            cancel: CancelToken::new(),
        }
    }

    /// Attach a cancellation token.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Override how many moves are proposed per temperature level
    /// (minimum one).
    pub fn set_permutations_per_temperature(&mut self, count: usize) {
        self.permutations_per_temperature = count.max(1);
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AnnealingState {
        self.state
    }

    /// Borrow the driven strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Consume the manager, returning the strategy with its retained
    /// solution.
    pub fn into_strategy(self) -> S {
        self.strategy
    }

    /// Run the full schedule: initialize the strategy, then cool
    /// geometrically from `start_temperature`, dividing by `step_size`
    /// after each level of proposed moves, until [`STOP_TEMPERATURE`].
    ///
    /// Cancellation is honored between temperature levels and leaves the
    /// strategy's best-so-far solution intact.
    pub fn run_simulated_annealing(
        &mut self,
        start_temperature: f64,
        step_size: f64,
        rng: &mut dyn RngCore,
    ) -> Result<(), AnnealingError> {
        if !(step_size > 1.0) {
            return Err(AnnealingError::InvalidStepSize(step_size));
        }
        debug!(start_temperature, step_size, "starting annealing run");
        self.state = AnnealingState::Running;
        self.strategy.initialize(rng);

        let mut temperature = start_temperature;
        let mut levels = 0usize;
        while temperature > STOP_TEMPERATURE {
            if self.cancel.is_cancelled() {
                debug!(temperature, levels, "annealing cancelled");
                self.state = AnnealingState::Cancelled;
                return Ok(());
            }
            for _ in 0..self.permutations_per_temperature {
                self.strategy.permutate(temperature, rng);
            }
            temperature /= step_size;
            levels += 1;
        }

        self.strategy.clean_up();
        debug!(levels, "annealing converged");
        self.state = AnnealingState::Converged;
        Ok(())
    }
}
