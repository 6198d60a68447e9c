use std::convert::Infallible;

use crate::{BlockVector, Float};

/// A trait which describes the error function $`f(\mathbb{R}^{n_1} \times \dots \times
/// \mathbb{R}^{n_k}) \to \mathbb{R}`$ minimized by a [`Swarm`](crate::Swarm).
///
/// The function may also take an `args: &U` field which can be used to pass external, read-only
/// arguments (a training set, for instance) to the function during minimization.
///
/// The `Objective` trait takes a generic `U` representing the type of arguments and a generic
/// `E` representing any possible errors that might be returned during function execution.
///
/// Implementations must be deterministic and total: particle positions are never clamped, so
/// the function will be called far outside the initialization limits. Parallel updates (the
/// `rayon` feature) additionally require the implementor to be [`Sync`].
pub trait Objective<U = (), E = Infallible> {
    /// The evaluation of the function at a point `x` with the given arguments.
    ///
    /// # Errors
    ///
    /// Returns an `Err(E)` if the evaluation fails. Users should implement this trait to return a
    /// [`std::convert::Infallible`] if the function evaluation never fails.
    fn evaluate(&self, x: &BlockVector, args: &U) -> Result<Float, E>;
}
