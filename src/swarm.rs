use std::{cmp::Ordering, fmt::Display, sync::Arc};

use fastrand::Rng;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::ConfigError, AbortSignal, Float, NopAbortSignal, Objective, Particle, Point,
    SwarmConfig, SwarmError, SwarmObserver,
};

/// The state of a [`Swarm`] over the course of an optimization run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwarmStatus {
    /// The swarm has been built and its global best seeded, but no generation has run yet
    #[default]
    Initialized,
    /// An optimization run is in progress
    Iterating,
    /// The global best reached the exit error
    Converged,
    /// The iteration budget ran out before the exit error was reached
    BudgetExhausted,
    /// The run was stopped by an [`SwarmObserver`] or an [`AbortSignal`]
    Aborted,
}

impl Display for SwarmStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Initialized => "Initialized",
            Self::Iterating => "Iterating",
            Self::Converged => "Converged",
            Self::BudgetExhausted => "Budget Exhausted",
            Self::Aborted => "Aborted",
        };
        write!(f, "{}", label)
    }
}

/// A fully-connected (global best) swarm of particles used in particle swarm optimization.
///
/// The swarm is built once per optimization run with [`Swarm::new`], which draws every particle
/// and seeds the global best. Each call to [`Swarm::update_step`] advances every particle by
/// one generation:
///
/// ```math
/// v_i \leftarrow \omega v_i + c_1 r_{1,i}(p_i - x_i) + c_2 r_{2,i}(g - x_i), \qquad x_i \leftarrow x_i + v_i
/// ```
///
/// where $`r_{1,i}, r_{2,i} \sim U[0,1)`$ are drawn once per particle per generation, $`p_i`$ is
/// the particle's personal best, and $`g`$ is the global best at the start of the generation.
/// After moving, each particle is re-randomized with probability `p_death`.
///
/// <div class="warning">
///
/// Positions are never clamped: the `limits` of the [`SwarmConfig`] only apply to the initial
/// draw and to restarted particles. Particles can and will leave that region, and a swarm with
/// unstable coefficients can diverge.
///
/// </div>
///
/// A swarm can be serialized for inspection, but it can only be built through [`Swarm::new`]
/// so that its configuration is always validated.
#[derive(Clone, Serialize)]
pub struct Swarm {
    /// A list of the particles in the swarm
    pub particles: Vec<Particle>,
    /// The global best position found by all particles
    pub gbest: Point,
    /// A message containing information about the condition of the swarm or convergence
    pub message: String,
    config: SwarmConfig,
    status: SwarmStatus,
    history: Vec<Float>,
}

impl Swarm {
    /// Construct a new [`Swarm`] from a [`SwarmConfig`].
    ///
    /// Every particle receives its own random stream forked from `rng`, so a seeded `rng` makes
    /// the whole run reproducible. The objective is evaluated at every initial position and the
    /// global best is set to the lowest one (the first particle wins ties).
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::Config`] if the configuration is invalid and
    /// [`SwarmError::Objective`] if the evaluation of an initial position fails.
    pub fn new<U, E>(
        config: SwarmConfig,
        func: &dyn Objective<U, E>,
        args: &U,
        rng: &mut Rng,
    ) -> Result<Self, SwarmError<E>> {
        config.validate()?;
        let particles = (0..config.n_particles)
            .map(|_| Particle::new(&config.dimension, config.limits, rng.fork()))
            .collect::<Result<Vec<Particle>, ConfigError>>()?;
        let mut swarm = Self {
            particles,
            gbest: Point::default(),
            message: String::new(),
            config,
            status: SwarmStatus::Initialized,
            history: Vec::new(),
        };
        for particle in &mut swarm.particles {
            particle
                .position
                .evaluate(func, args)
                .map_err(SwarmError::Objective)?;
            particle.best.fx = particle.position.fx;
        }
        swarm.gbest = swarm.best_particle().best.clone();
        swarm.update_message("Initialized");
        info!(
            n_particles = swarm.particles.len(),
            n_parameters = swarm.gbest.x.len(),
            fx = swarm.best_fx(),
            "swarm initialized"
        );
        Ok(swarm)
    }
    /// The configuration the swarm was built with.
    pub const fn config(&self) -> &SwarmConfig {
        &self.config
    }
    /// The current [`SwarmStatus`].
    pub const fn status(&self) -> SwarmStatus {
        self.status
    }
    /// Returns `true` if the last run reached the exit error.
    pub fn converged(&self) -> bool {
        matches!(self.status, SwarmStatus::Converged)
    }
    /// Get the global best position found by the swarm.
    pub const fn get_best(&self) -> &Point {
        &self.gbest
    }
    /// Get list of the particles in the swarm.
    pub fn get_particles(&self) -> &[Particle] {
        &self.particles
    }
    /// The global best value recorded after each generation of the last run.
    pub fn history(&self) -> &[Float] {
        &self.history
    }
    /// Updates the [`Swarm::message`] field.
    pub fn update_message(&mut self, message: &str) {
        self.message = message.to_string();
    }
    fn best_fx(&self) -> Float {
        self.gbest.fx.unwrap_or(Float::INFINITY)
    }
    // Lowest personal best, first index on ties. A validated swarm is never empty.
    fn best_particle(&self) -> &Particle {
        let mut best = &self.particles[0];
        for particle in &self.particles[1..] {
            if particle.best.total_cmp(&best.best) == Ordering::Less {
                best = particle;
            }
        }
        best
    }
    fn promote<I: IntoIterator<Item = Point>>(&mut self, candidates: I) {
        for candidate in candidates {
            if candidate.total_cmp(&self.gbest) == Ordering::Less {
                self.gbest = candidate;
            }
        }
    }
    /// Recompute the global best from the personal bests of all current particles.
    ///
    /// Candidates are personal bests, not current positions: a particle that just moved uphill
    /// still offers its best point. The global best is only replaced by a strictly better position, so its value never
    /// increases over a run.
    ///
    /// # Errors
    ///
    /// Returns an `Err(E)` if the evaluation fails. See [`Objective::evaluate`] for more
    /// information.
    pub fn update_global_best<U, E>(
        &mut self,
        func: &dyn Objective<U, E>,
        args: &U,
    ) -> Result<(), E> {
        for particle in &mut self.particles {
            particle.best.evaluate(func, args)?;
        }
        let candidate = self.best_particle().best.clone();
        self.promote([candidate]);
        Ok(())
    }
    /// Run a single generation of the swarm.
    ///
    /// Particles are updated in order, each one reading the global best as it was at the start
    /// of the generation. Personal bests of particles that were re-randomized during the
    /// generation are still considered when the global best is recomputed at the end.
    ///
    /// # Errors
    ///
    /// Returns an `Err(E)` if the evaluation fails. See [`Objective::evaluate`] for more
    /// information.
    pub fn update_step<U, E>(&mut self, func: &dyn Objective<U, E>, args: &U) -> Result<(), E> {
        let gbest = self.gbest.x.clone();
        let mut retired = Vec::new();
        for particle in &mut self.particles {
            if let Some(dead) = particle.step(&gbest, &self.config, func, args)? {
                retired.push(dead);
            }
        }
        self.promote(retired);
        self.update_global_best(func, args)
    }
    /// Run a single generation of the swarm, updating the particles in parallel.
    ///
    /// Since every particle owns its random stream, this produces exactly the same swarm as
    /// [`Swarm::update_step`] for the same seed.
    ///
    /// # Errors
    ///
    /// Returns an `Err(E)` if the evaluation fails. See [`Objective::evaluate`] for more
    /// information. If several particles fail, which error is returned is unspecified.
    #[cfg(feature = "rayon")]
    pub fn par_update_step<U, E>(
        &mut self,
        func: &(dyn Objective<U, E> + Sync),
        args: &U,
    ) -> Result<(), E>
    where
        U: Sync,
        E: Send,
    {
        use rayon::prelude::*;

        let gbest = self.gbest.x.clone();
        let config = &self.config;
        let retired = self
            .particles
            .par_iter_mut()
            .map(|particle| particle.step(&gbest, config, func, args))
            .collect::<Result<Vec<Option<Point>>, E>>()?;
        self.promote(retired.into_iter().flatten());
        self.update_global_best(func, args)
    }
    /// Optimize until the global best reaches the exit error or `iterations + 1` generations have
    /// run, whichever comes first.
    ///
    /// Returns the value of the global best after each completed generation. Running out of
    /// iterations is not an error: check [`Swarm::status`] (or compare the last value with the
    /// exit error) to tell the two outcomes apart.
    ///
    /// # Errors
    ///
    /// Returns an `Err(E)` if the evaluation fails. See [`Objective::evaluate`] for more
    /// information.
    pub fn optimise<U, E>(
        &mut self,
        iterations: usize,
        func: &dyn Objective<U, E>,
        args: &U,
    ) -> Result<Vec<Float>, E> {
        self.run(
            iterations,
            |swarm| swarm.update_step(func, args),
            &mut [],
            args,
            &NopAbortSignal,
        )
    }
    /// The parallel counterpart of [`Swarm::optimise`], built on [`Swarm::par_update_step`].
    ///
    /// # Errors
    ///
    /// Returns an `Err(E)` if the evaluation fails. See [`Objective::evaluate`] for more
    /// information.
    #[cfg(feature = "rayon")]
    pub fn par_optimise<U, E>(
        &mut self,
        iterations: usize,
        func: &(dyn Objective<U, E> + Sync),
        args: &U,
    ) -> Result<Vec<Float>, E>
    where
        U: Sync,
        E: Send,
    {
        self.run(
            iterations,
            |swarm| swarm.par_update_step(func, args),
            &mut [],
            args,
            &NopAbortSignal,
        )
    }
    pub(crate) fn run<U, E, S>(
        &mut self,
        iterations: usize,
        mut step: S,
        observers: &mut [Arc<RwLock<dyn SwarmObserver<U>>>],
        args: &U,
        abort_signal: &dyn AbortSignal,
    ) -> Result<Vec<Float>, E>
    where
        S: FnMut(&mut Self) -> Result<(), E>,
    {
        self.history.clear();
        self.status = SwarmStatus::Iterating;
        self.update_message("Iterating");
        let mut current_step = 0;
        loop {
            if self.best_fx() <= self.config.exit_error {
                self.status = SwarmStatus::Converged;
                self.update_message("Converged");
                info!(steps = current_step, fx = self.best_fx(), "swarm converged");
                break;
            }
            if current_step > iterations {
                self.status = SwarmStatus::BudgetExhausted;
                self.update_message("MAX EVALS");
                info!(
                    steps = current_step,
                    fx = self.best_fx(),
                    exit_error = self.config.exit_error,
                    "iteration budget exhausted"
                );
                break;
            }
            if abort_signal.is_aborted() {
                self.status = SwarmStatus::Aborted;
                self.update_message("Aborted");
                info!(steps = current_step, "swarm aborted");
                break;
            }
            step(self)?;
            current_step += 1;
            self.history.push(self.best_fx());
            debug!(step = current_step, fx = self.best_fx(), "generation complete");
            let mut observer_termination = false;
            for observer in observers.iter() {
                observer_termination = observer
                    .write()
                    .callback(current_step, self, args)
                    .is_break()
                    || observer_termination;
            }
            if observer_termination {
                self.status = SwarmStatus::Aborted;
                self.update_message("Terminated by observer");
                info!(steps = current_step, "swarm stopped by observer");
                break;
            }
        }
        Ok(self.history.clone())
    }
}

impl Display for Swarm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let title = format!(
            "╒{}╕\n│{:^94}│",
            "═".repeat(94),
            "SWARM STATUS"
        );
        let status = format!(
            "╞{}╤{}╡\n│ Status: {:<54} │ fval: {:>+21.8E} │",
            "═".repeat(64),
            "═".repeat(29),
            self.status.to_string(),
            self.best_fx(),
        );
        let message = format!(
            "├{}┴{}┤\n│ Message: {:<83} │",
            "─".repeat(64),
            "─".repeat(29),
            self.message,
        );
        let header = format!(
            "├{}╥{}╥{}┤\n│ {:>5} ║ {:>5} ║ {:<76} │\n├{}╫{}╫{}┤",
            "─".repeat(7),
            "─".repeat(7),
            "─".repeat(78),
            "Block",
            "Par #",
            "Value",
            "─".repeat(7),
            "─".repeat(7),
            "─".repeat(78),
        );
        let mut res_list: Vec<String> = vec![];
        for (b, block) in self.gbest.x.blocks().iter().enumerate() {
            for (i, xi) in block.iter().enumerate() {
                res_list.push(format!(
                    "│ {:>5} ║ {:>5} ║ {:<76} │",
                    b,
                    i,
                    format!("{:+.8E}", xi)
                ));
            }
        }
        let bottom = format!(
            "└{}╨{}╨{}┘",
            "─".repeat(7),
            "─".repeat(7),
            "─".repeat(78)
        );
        let out = [title, status, message, header, res_list.join("\n"), bottom].join("\n");
        write!(f, "{}", out)
    }
}
