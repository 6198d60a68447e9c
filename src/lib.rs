//! `swarmfit` provides a global-best particle swarm optimizer (PSO) for objectives whose design
//! space is split into independent blocks of parameters, such as the weight matrices and bias
//! vectors of a small neural network. The user implements the [`Objective`] trait on some struct
//! which takes a [`BlockVector`] and returns a single-valued [`Result`], and the [`Swarm`] does
//! the rest.
//!
//! <div class="warning">
//!
//! This crate is still in an early development phase, and the API is not stable. It can (and likely will) be subject to breaking changes before the 1.0.0 version release.
//!
//! </div>
//!
//! # Table of Contents
//! - [Key Features](#key-features)
//! - [Quick Start](#quick-start)
//! - [Reproducibility](#reproducibility)
//!
//! # Key Features
//! * Block-structured positions: any list of block lengths can be optimized jointly.
//! * Inertia-weighted velocity updates with random particle restarts to escape local minima.
//! * Observers to log or record the swarm after every generation, with a pickle export of the
//!   swarm history for plotting.
//! * Pressing `Ctrl-C` during a run (with a [`CtrlCAbortSignal`]) still leaves a usable
//!   [`Swarm`], and its status will indicate that the run was aborted.
//! * Optional parallel particle updates behind the `rayon` feature.
//!
//! # Quick Start
//!
//! This crate provides some common test functions in the [`test_functions`] module. Consider the
//! following implementation of a shifted sphere:
//!
//! ```rust
//! use std::convert::Infallible;
//! use swarmfit::prelude::*;
//!
//! pub struct Shifted;
//! impl Objective<(), Infallible> for Shifted {
//!     fn evaluate(&self, x: &BlockVector, _args: &()) -> Result<Float, Infallible> {
//!         Ok(x.iter().map(|xi| (xi - 1.0).powi(2)).sum())
//!     }
//! }
//! ```
//! To minimize this function over two blocks of lengths `2` and `1`:
//! ```rust
//! use swarmfit::prelude::*;
//! # use std::convert::Infallible;
//! # pub struct Shifted;
//! # impl Objective<(), Infallible> for Shifted {
//! #     fn evaluate(&self, x: &BlockVector, _args: &()) -> Result<Float, Infallible> {
//! #         Ok(x.iter().map(|xi| (xi - 1.0).powi(2)).sum())
//! #     }
//! # }
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SwarmConfig::new([2, 1]).with_exit_error(1e-4);
//!     let mut rng = fastrand::Rng::with_seed(0);
//!     let mut swarm = Swarm::new(config, &Shifted, &(), &mut rng)?;
//!     let history = swarm.optimise(1000, &Shifted, &())?;
//!     assert!(swarm.converged());
//!     assert!(history.last().copied().unwrap_or(Float::INFINITY) <= 1e-4);
//!     println!("{}", swarm);
//!     Ok(())
//! }
//! ```
//!
//! # Reproducibility
//! Every particle owns a random stream forked from the [`fastrand::Rng`] passed to
//! [`Swarm::new`]. Two swarms built from the same seed follow exactly the same trajectory, and
//! with the `rayon` feature [`Swarm::par_update_step`] gives the same result as
//! [`Swarm::update_step`].
#![warn(
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::doc_markdown,
    clippy::doc_link_with_quotes,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::perf,
    clippy::style,
    missing_docs
)]

/// Module containing the [`AbortSignal`] trait and its implementations
pub mod abort_signal;
/// Module containing the [`BlockVector`] type
pub mod block;
/// Module containing the [`SwarmConfig`] type
pub mod config;
/// Module containing the crate's error types
pub mod error;
/// Module containing the [`SwarmMinimizer`]
pub mod minimizer;
/// Module containing the [`Objective`] trait
pub mod objective;
/// Module containing [`SwarmObserver`]s
pub mod observers;
/// Module containing the [`Particle`] type
pub mod particle;
/// Module containing the [`Point`] type
pub mod point;
/// Module containing the [`Swarm`] type
pub mod swarm;
/// Module containing standard functions for testing the optimizer
pub mod test_functions;
/// Module containing random sampling utilities
pub mod utils;

pub use abort_signal::{AbortSignal, AtomicAbortSignal, CtrlCAbortSignal, NopAbortSignal};
pub use block::BlockVector;
pub use config::SwarmConfig;
pub use error::{ConfigError, SwarmError};
pub use minimizer::SwarmMinimizer;
pub use objective::Objective;
pub use observers::SwarmObserver;
pub use particle::Particle;
pub use point::Point;
pub use swarm::{Swarm, SwarmStatus};
pub use utils::SampleFloat;

/// Prelude module containing everything someone should need to use this crate for non-development
/// purposes
pub mod prelude {
    pub use crate::{
        AbortSignal, BlockVector, CtrlCAbortSignal, Float, NopAbortSignal, Objective, Swarm,
        SwarmConfig, SwarmError, SwarmMinimizer, SwarmObserver, SwarmStatus,
    };
}

/// A floating-point number type (defaults to [`f64`], see `--features f32`)
#[cfg(not(feature = "f32"))]
pub type Float = f64;

/// A floating-point number type (defaults to [`f64`], see `--features f32`)
#[cfg(feature = "f32")]
pub type Float = f32;

/// The mathematical constant $`\pi`$.
#[cfg(not(feature = "f32"))]
pub const PI: Float = std::f64::consts::PI;

/// The mathematical constant $`\pi`$.
#[cfg(feature = "f32")]
pub const PI: Float = std::f32::consts::PI;
