use thiserror::Error;

use crate::Float;

/// Errors raised while validating a [`SwarmConfig`](crate::SwarmConfig) or constructing a
/// [`Particle`](crate::Particle).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The design space has no blocks, or one of its blocks has zero length.
    #[error("invalid dimension {dimension:?}: expected a non-empty list of positive block lengths")]
    InvalidDimension {
        /// The rejected block lengths
        dimension: Vec<usize>,
    },
    /// The swarm must contain at least one particle.
    #[error("invalid population size {0}: a swarm needs at least one particle")]
    InvalidPopulationSize(usize),
    /// The death probability must lie in `[0, 1]`.
    #[error("invalid death probability {0}: expected a value in [0, 1]")]
    InvalidProbability(Float),
    /// The initialization limits must be finite with `lower < upper`.
    #[error("invalid limits ({lower}, {upper}): expected finite bounds with lower < upper")]
    InvalidBounds {
        /// Lower limit
        lower: Float,
        /// Upper limit
        upper: Float,
    },
    /// A PSO coefficient or the exit error is not a finite number.
    #[error("invalid value {value} for `{name}`: expected a finite number")]
    InvalidCoefficient {
        /// Name of the offending hyperparameter
        name: &'static str,
        /// The rejected value
        value: Float,
    },
}

/// Errors raised while building a [`Swarm`](crate::Swarm).
///
/// Construction both validates the configuration and evaluates the objective on every initial
/// position, so it can fail in either way. Once a swarm exists, objective errors are returned
/// as the bare `E` instead.
#[derive(Debug, Error)]
pub enum SwarmError<E> {
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The objective function failed while seeding the global best.
    #[error("objective evaluation failed")]
    Objective(#[source] E),
}
