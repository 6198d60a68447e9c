use std::{io::Write, ops::ControlFlow, sync::Arc};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Float, Swarm};

/// A trait which holds a [`callback`](`SwarmObserver::callback`) function that can be used to
/// check an optimization run after each generation of a [`Swarm`].
///
/// Observers are stored as `Arc<RwLock<_>>` so the caller can keep a handle and read whatever
/// the observer collected once the run is over.
pub trait SwarmObserver<U> {
    /// A function that is called after every generation.
    ///
    /// `step` counts completed generations starting at `1`. Returning
    /// [`ControlFlow::Break`] stops the run after the current generation.
    fn callback(&mut self, step: usize, swarm: &Swarm, args: &U) -> ControlFlow<()>;
}

/// A debugging observer which logs the step, global best, and status of the swarm at `DEBUG`
/// level after every generation.
///
/// # Usage:
///
/// ```rust
/// use swarmfit::prelude::*;
/// use swarmfit::observers::DebugObserver;
/// use swarmfit::test_functions::Sphere;
///
/// let config = SwarmConfig::new([2]);
/// let swarm = Swarm::new(config, &Sphere, &(), &mut fastrand::Rng::with_seed(0)).unwrap();
/// let mut m = SwarmMinimizer::new(swarm).with_observer(DebugObserver::build());
/// m.minimize(&Sphere, &(), &NopAbortSignal).unwrap();
/// // ^ This will emit a debug event for each generation
/// assert!(m.swarm.converged());
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct DebugObserver;

impl DebugObserver {
    /// Finalize the [`SwarmObserver`] by wrapping it in an [`Arc`] and [`RwLock`]
    pub fn build() -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(Self))
    }
}

impl<U> SwarmObserver<U> for DebugObserver {
    fn callback(&mut self, step: usize, swarm: &Swarm, _args: &U) -> ControlFlow<()> {
        debug!(
            step,
            fx = ?swarm.gbest.fx,
            x = %swarm.gbest.x,
            status = %swarm.status(),
            "swarm generation"
        );
        ControlFlow::Continue(())
    }
}

/// An observer which logs the global best at `INFO` level every `n` generations.
#[derive(Debug, Clone, Copy)]
pub struct ProgressObserver {
    every: usize,
}

impl ProgressObserver {
    /// Log every `every` generations (a value of `0` is treated as `1`).
    pub fn build(every: usize) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(Self {
            every: every.max(1),
        }))
    }
}

impl<U> SwarmObserver<U> for ProgressObserver {
    fn callback(&mut self, step: usize, swarm: &Swarm, _args: &U) -> ControlFlow<()> {
        if step % self.every == 0 {
            info!(
                step,
                fx = ?swarm.gbest.fx,
                exit_error = swarm.config().exit_error,
                "swarm progress"
            );
        }
        ControlFlow::Continue(())
    }
}

/// An observer which stores a snapshot of every particle after each generation together with
/// the history of the global best value.
///
/// Only the first two components of each particle are kept, which is what a 2D scatter plot of
/// the swarm needs. Single-component problems store `0.0` as the second coordinate. The whole
/// record can be exported with [`TrackingObserver::to_pickle`].
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TrackingObserver {
    /// `positions[s][i]` is the projected position of particle `i` after generation `s + 1`
    pub positions: Vec<Vec<(Float, Float)>>,
    /// The global best value after each generation
    pub best_values: Vec<Float>,
}

impl TrackingObserver {
    /// Finalize the [`SwarmObserver`] by wrapping it in an [`Arc`] and [`RwLock`]
    pub fn build() -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(Self::default()))
    }
    /// Serialize the recorded history in Python's pickle format.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_pickle::Error`] if serialization or writing fails.
    pub fn to_pickle<W: Write>(&self, writer: &mut W) -> Result<(), serde_pickle::Error> {
        serde_pickle::to_writer(writer, self, Default::default())
    }
}

impl<U> SwarmObserver<U> for TrackingObserver {
    fn callback(&mut self, _step: usize, swarm: &Swarm, _args: &U) -> ControlFlow<()> {
        self.positions.push(
            swarm
                .get_particles()
                .iter()
                .map(|particle| {
                    let mut components = particle.position.x.iter();
                    let x = components.next().copied().unwrap_or_default();
                    let y = components.next().copied().unwrap_or_default();
                    (x, y)
                })
                .collect(),
        );
        self.best_values
            .push(swarm.gbest.fx.unwrap_or(Float::INFINITY));
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use fastrand::Rng;

    use super::*;
    use crate::{test_functions::Sphere, SwarmConfig};

    fn swarm(dimension: &[usize]) -> Swarm {
        let config = SwarmConfig::new(dimension.iter().copied()).with_n_particles(4);
        Swarm::new(config, &Sphere, &(), &mut Rng::with_seed(1)).unwrap()
    }

    #[test]
    fn test_tracking_observer_projects_first_two_components() {
        let swarm = swarm(&[1, 2]);
        let mut tracker = TrackingObserver::default();
        assert!(tracker.callback(1, &swarm, &()).is_continue());
        assert!(tracker.callback(2, &swarm, &()).is_continue());
        assert_eq!(tracker.positions.len(), 2);
        assert_eq!(tracker.best_values, vec![swarm.gbest.fx_checked(); 2]);
        for (particle, (x, y)) in swarm.particles.iter().zip(&tracker.positions[0]) {
            assert_eq!(*x, particle.position.x[0][0]);
            assert_eq!(*y, particle.position.x[1][0]);
        }
    }

    #[test]
    fn test_tracking_observer_single_component() {
        let swarm = swarm(&[1]);
        let mut tracker = TrackingObserver::default();
        let _ = tracker.callback(1, &swarm, &());
        assert!(tracker.positions[0].iter().all(|&(_, y)| y == 0.0));
    }

    #[test]
    fn test_tracking_observer_pickle() {
        let swarm = swarm(&[2]);
        let tracker = TrackingObserver::build();
        let _ = tracker.write().callback(1, &swarm, &());
        let mut buffer = Vec::new();
        tracker.read().to_pickle(&mut buffer).unwrap();
        let restored: TrackingObserver =
            serde_pickle::from_slice(&buffer, Default::default()).unwrap();
        assert_eq!(restored.positions, tracker.read().positions);
        assert_eq!(restored.best_values, tracker.read().best_values);
    }

    #[test]
    fn test_logging_observers_continue() {
        let swarm = swarm(&[2]);
        let progress = ProgressObserver::build(0);
        assert_eq!(progress.read().every, 1);
        for step in 1..4 {
            assert!(progress.write().callback(step, &swarm, &()).is_continue());
            assert!(DebugObserver.callback(step, &swarm, &()).is_continue());
        }
    }
}
