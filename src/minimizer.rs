use std::{fmt::Display, sync::Arc};

use parking_lot::RwLock;

use crate::{AbortSignal, Float, Objective, Swarm, SwarmObserver};

/// The main struct used for running a [`Swarm`] on an [`Objective`] with observers and an
/// [`AbortSignal`] attached.
pub struct SwarmMinimizer<U> {
    /// The [`Swarm`] of the [`SwarmMinimizer`], usually read after minimization.
    pub swarm: Swarm,
    max_steps: usize,
    observers: Vec<Arc<RwLock<dyn SwarmObserver<U>>>>,
}

impl<U> Display for SwarmMinimizer<U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.swarm)
    }
}

impl<U> SwarmMinimizer<U> {
    const DEFAULT_MAX_STEPS: usize = 4000;
    /// Creates a new [`SwarmMinimizer`] around an already initialized [`Swarm`].
    pub fn new(swarm: Swarm) -> Self {
        Self {
            swarm,
            max_steps: Self::DEFAULT_MAX_STEPS,
            observers: Vec::default(),
        }
    }
    /// Set the maximum number of steps to perform before failure (default: 4000).
    pub const fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
    /// Adds a single [`SwarmObserver`] to the [`SwarmMinimizer`].
    pub fn with_observer(mut self, observer: Arc<RwLock<dyn SwarmObserver<U>>>) -> Self {
        self.observers.push(observer);
        self
    }
    /// Minimize the given [`Objective`] with the swarm.
    ///
    /// This runs [`Swarm::update_step`] in a loop, terminating when the global best reaches the
    /// exit error, when more than `max_steps` generations would be needed, when the
    /// `abort_signal` fires, or when an observer breaks. Each step will be followed by a
    /// sequential call to all given [`SwarmObserver`]s' callback functions. If the swarm did not
    /// converge in the given step limit, the [`Swarm::message`] will be set to `"MAX EVALS"` at
    /// termination.
    ///
    /// Returns the global best value after each generation.
    ///
    /// # Errors
    ///
    /// Returns an `Err(E)` if the evaluation fails. See [`Objective::evaluate`] for more
    /// information.
    pub fn minimize<E>(
        &mut self,
        func: &dyn Objective<U, E>,
        args: &U,
        abort_signal: &dyn AbortSignal,
    ) -> Result<Vec<Float>, E> {
        self.swarm.run(
            self.max_steps,
            |swarm| swarm.update_step(func, args),
            &mut self.observers,
            args,
            abort_signal,
        )
    }
    /// The parallel counterpart of [`SwarmMinimizer::minimize`], built on
    /// [`Swarm::par_update_step`]. Observers are still called sequentially between generations.
    ///
    /// # Errors
    ///
    /// Returns an `Err(E)` if the evaluation fails. See [`Objective::evaluate`] for more
    /// information.
    #[cfg(feature = "rayon")]
    pub fn par_minimize<E>(
        &mut self,
        func: &(dyn Objective<U, E> + Sync),
        args: &U,
        abort_signal: &dyn AbortSignal,
    ) -> Result<Vec<Float>, E>
    where
        U: Sync,
        E: Send,
    {
        self.swarm.run(
            self.max_steps,
            |swarm| swarm.par_update_step(func, args),
            &mut self.observers,
            args,
            abort_signal,
        )
    }
}
