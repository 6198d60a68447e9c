use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, Float};

const DEFAULT_N_PARTICLES: usize = 20;
const DEFAULT_P_DEATH: Float = 0.005;
const DEFAULT_OMEGA: Float = 0.729;
const DEFAULT_C1: Float = 1.49445;
const DEFAULT_C2: Float = 1.49445;
const DEFAULT_EXIT_ERROR: Float = 0.1;
const DEFAULT_LIMITS: (Float, Float) = (-5.0, 5.0);

/// The hyperparameters of a [`Swarm`](crate::Swarm).
///
/// A [`SwarmConfig`] is fixed once the swarm has been built. The defaults are the constriction
/// coefficients $`\omega = 0.729`$, $`c_1 = c_2 = 1.49445`$ with a death probability of `0.005`,
/// an exit error of `0.1`, and initialization limits of `[-5, 5]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwarmConfig {
    /// The number of particles in the swarm
    pub n_particles: usize,
    /// The length of each independent parameter block
    pub dimension: Vec<usize>,
    /// The inertial weight $`\omega`$
    pub omega: Float,
    /// The cognitive weight $`c_1`$
    pub c1: Float,
    /// The social weight $`c_2`$
    pub c2: Float,
    /// The probability that a particle is re-randomized after each generation
    pub p_death: Float,
    /// The value of the objective at which the optimization is considered converged
    pub exit_error: Float,
    /// The `(lower, upper)` limits used to draw initial (and restarted) positions
    pub limits: (Float, Float),
}

impl SwarmConfig {
    /// Create a new configuration for the given block lengths with default hyperparameters.
    pub fn new<I: IntoIterator<Item = usize>>(dimension: I) -> Self {
        Self {
            n_particles: DEFAULT_N_PARTICLES,
            dimension: dimension.into_iter().collect(),
            omega: DEFAULT_OMEGA,
            c1: DEFAULT_C1,
            c2: DEFAULT_C2,
            p_death: DEFAULT_P_DEATH,
            exit_error: DEFAULT_EXIT_ERROR,
            limits: DEFAULT_LIMITS,
        }
    }
    /// Create a configuration whose design space holds the weights and biases of a classifier
    /// with a single hidden layer, laid out as `[inputs * hidden, hidden * outputs, hidden,
    /// outputs]`.
    pub fn classifier(inputs: usize, hidden: usize, outputs: usize) -> Self {
        Self::new([inputs * hidden, hidden * outputs, hidden, outputs])
    }
    /// Sets the number of particles (default = `20`).
    pub const fn with_n_particles(mut self, value: usize) -> Self {
        self.n_particles = value;
        self
    }
    /// Sets the inertial weight $`\omega`$ (default = `0.729`).
    pub const fn with_omega(mut self, value: Float) -> Self {
        self.omega = value;
        self
    }
    /// Sets the cognitive weight $`c_1`$ which controls the particle's tendency
    /// to move towards its personal best (default = `1.49445`).
    pub const fn with_c1(mut self, value: Float) -> Self {
        self.c1 = value;
        self
    }
    /// Sets the social weight $`c_2`$ which controls the particle's tendency
    /// to move towards the global best (default = `1.49445`).
    pub const fn with_c2(mut self, value: Float) -> Self {
        self.c2 = value;
        self
    }
    /// Sets the probability of a particle being re-randomized each generation
    /// (default = `0.005`). Higher values lead to more exploration.
    pub const fn with_p_death(mut self, value: Float) -> Self {
        self.p_death = value;
        self
    }
    /// Sets the objective value at or below which the optimization stops (default = `0.1`).
    pub const fn with_exit_error(mut self, value: Float) -> Self {
        self.exit_error = value;
        self
    }
    /// Sets the limits used for drawing initial positions (default = `(-5, 5)`). Initial
    /// velocities are drawn from one tenth of this range.
    ///
    /// These limits are **not** enforced after initialization: particles are free to leave
    /// them once they start moving.
    pub const fn with_limits(mut self, lower: Float, upper: Float) -> Self {
        self.limits = (lower, upper);
        self
    }

    /// Check every hyperparameter.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_particles < 1 {
            return Err(ConfigError::InvalidPopulationSize(self.n_particles));
        }
        validate_dimension(&self.dimension)?;
        validate_limits(self.limits)?;
        if !(0.0..=1.0).contains(&self.p_death) {
            return Err(ConfigError::InvalidProbability(self.p_death));
        }
        for (name, value) in [
            ("omega", self.omega),
            ("c1", self.c1),
            ("c2", self.c2),
            ("exit_error", self.exit_error),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidCoefficient { name, value });
            }
        }
        Ok(())
    }
}

pub(crate) fn validate_dimension(dimension: &[usize]) -> Result<(), ConfigError> {
    if dimension.is_empty() || dimension.contains(&0) {
        return Err(ConfigError::InvalidDimension {
            dimension: dimension.to_vec(),
        });
    }
    Ok(())
}

pub(crate) fn validate_limits((lower, upper): (Float, Float)) -> Result<(), ConfigError> {
    if !(lower.is_finite() && upper.is_finite() && lower < upper) {
        return Err(ConfigError::InvalidBounds { lower, upper });
    }
    Ok(())
}
