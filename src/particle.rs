use std::cmp::Ordering;

use fastrand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    config::{validate_dimension, validate_limits},
    error::ConfigError,
    BlockVector, Float, Objective, Point, SampleFloat, SwarmConfig,
};

/// A particle with a position, velocity, and best known position
///
/// Every particle owns its own random stream, so particles never share mutable random state and
/// can be advanced independently (and in parallel) within a generation.
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct Particle {
    /// The position of the particle
    pub position: Point,
    /// The velocity of the particle
    pub velocity: BlockVector,
    /// The best position of the particle (as measured by the minimum value of `fx`)
    pub best: Point,
    #[serde(skip)]
    rng: Rng,
}

impl Particle {
    /// Create a new particle with the given block lengths.
    ///
    /// Each component of the position is drawn uniformly from `limits`, and each component of the
    /// velocity from one tenth of `limits`. The personal best starts at the initial position.
    /// Nothing is evaluated yet.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDimension`] if `dimension` is empty or contains a block of
    /// length zero, and [`ConfigError::InvalidBounds`] if the limits are not a finite, non-empty
    /// range.
    pub fn new(
        dimension: &[usize],
        limits: (Float, Float),
        rng: Rng,
    ) -> Result<Self, ConfigError> {
        validate_dimension(dimension)?;
        validate_limits(limits)?;
        Ok(Self::spawn(dimension, limits, rng))
    }
    /// Replace the personal best with the current position if the current position is strictly
    /// better. Both points are evaluated first if they have not been yet.
    ///
    /// Values are ordered with [`Float::total_cmp`], so a `NaN` personal best is replaced by any
    /// finite value.
    ///
    /// # Errors
    ///
    /// Returns an `Err(E)` if the evaluation fails. See [`Objective::evaluate`] for more
    /// information.
    pub fn update_personal_best<U, E>(
        &mut self,
        func: &dyn Objective<U, E>,
        args: &U,
    ) -> Result<(), E> {
        self.position.evaluate(func, args)?;
        self.best.evaluate(func, args)?;
        if self.position.total_cmp(&self.best) == Ordering::Less {
            self.best = self.position.clone();
        }
        Ok(())
    }
    /// Advance the particle by one generation towards its own best and `gbest`.
    ///
    /// The velocity update is
    /// ```math
    /// v \leftarrow \omega v + c_1 r_1 (p - x) + c_2 r_2 (g - x)
    /// ```
    /// with $`r_1, r_2 \sim U[0, 1)`$ drawn once per particle, followed by $`x \leftarrow x + v`$
    /// without any clamping. Afterwards the personal best is updated and, with probability
    /// `p_death`, the particle is replaced by a freshly drawn one. In that case the discarded
    /// personal best is returned.
    pub(crate) fn step<U, E>(
        &mut self,
        gbest: &BlockVector,
        config: &SwarmConfig,
        func: &dyn Objective<U, E>,
        args: &U,
    ) -> Result<Option<Point>, E> {
        let r1 = self.rng.float();
        let r2 = self.rng.float();
        let cognitive = &(&self.best.x - &self.position.x) * (config.c1 * r1);
        let social = &(gbest - &self.position.x) * (config.c2 * r2);
        self.velocity = &(&self.velocity * config.omega) + &(&cognitive + &social);
        self.position.set_position(&self.position.x + &self.velocity);
        self.update_personal_best(func, args)?;
        if self.rng.float() < config.p_death {
            let rng = self.rng.fork();
            let mut reborn = Self::spawn(&config.dimension, config.limits, rng);
            reborn.position.evaluate(func, args)?;
            reborn.best.fx = reborn.position.fx;
            let dead = std::mem::replace(self, reborn);
            trace!(fx = ?dead.best.fx, "particle restarted");
            return Ok(Some(dead.best));
        }
        Ok(None)
    }
    /// Draw a fresh particle.
    ///
    /// `dimension` and `limits` must already have passed [`validate_dimension`] and
    /// [`validate_limits`]; an empty range makes the uniform draw panic.
    fn spawn(dimension: &[usize], limits: (Float, Float), rng: Rng) -> Self {
        let (lower, upper) = limits;
        let mut rng = rng;
        let position = BlockVector::random(dimension, lower, upper, &mut rng);
        let velocity = BlockVector::random(dimension, 0.1 * lower, 0.1 * upper, &mut rng);
        Self {
            position: position.clone().into(),
            velocity,
            best: position.into(),
            rng,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;
    use crate::test_functions::Sphere;

    #[test]
    fn test_shapes_match_dimension() {
        let dimension = [4, 1, 3];
        for seed in 0..10 {
            let p = Particle::new(&dimension, (-5.0, 5.0), Rng::with_seed(seed)).unwrap();
            assert_eq!(p.position.x.shape(), dimension.to_vec());
            assert_eq!(p.velocity.shape(), dimension.to_vec());
            assert_eq!(p.best.x.shape(), dimension.to_vec());
            assert_eq!(p.best.x, p.position.x);
        }
    }

    #[test]
    fn test_initial_sampling_ranges() {
        let p = Particle::new(&[200], (-5.0, 5.0), Rng::with_seed(3)).unwrap();
        assert!(p.position.x.iter().all(|&x| (-5.0..5.0).contains(&x)));
        assert!(p.velocity.iter().all(|&v| (-0.5..0.5).contains(&v)));
    }

    #[test]
    fn test_invalid_dimension() {
        assert_eq!(
            Particle::new(&[], (-5.0, 5.0), Rng::with_seed(0)).err(),
            Some(ConfigError::InvalidDimension { dimension: vec![] })
        );
        assert!(matches!(
            Particle::new(&[2, 0], (-5.0, 5.0), Rng::with_seed(0)),
            Err(ConfigError::InvalidDimension { .. })
        ));
        assert!(matches!(
            Particle::new(&[2], (5.0, -5.0), Rng::with_seed(0)),
            Err(ConfigError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn test_personal_best_is_non_increasing() {
        let mut rng = Rng::with_seed(11);
        let mut p = Particle::new(&[3], (-5.0, 5.0), rng.fork()).unwrap();
        p.update_personal_best(&Sphere, &()).unwrap();
        let mut last = p.best.fx_checked();
        for _ in 0..50 {
            let x = BlockVector::random(&[3], -5.0, 5.0, &mut rng);
            p.position.set_position(x);
            p.update_personal_best(&Sphere, &()).unwrap();
            let current = p.best.fx_checked();
            assert!(current <= last);
            assert!(current <= p.position.fx_checked());
            last = current;
        }
    }

    #[test]
    fn test_personal_best_requires_strict_improvement() {
        let mut p = Particle::new(&[1], (-5.0, 5.0), Rng::with_seed(0)).unwrap();
        p.best = Point {
            x: BlockVector::from(vec![vec![1.0]]),
            fx: None,
        };
        p.position.set_position(BlockVector::from(vec![vec![-1.0]]));
        p.update_personal_best(&Sphere, &()).unwrap();
        assert_eq!(p.best.x, BlockVector::from(vec![vec![1.0]]));
    }

    #[test]
    fn test_nan_personal_best_is_replaced() {
        let mut p = Particle::new(&[1], (-5.0, 5.0), Rng::with_seed(0)).unwrap();
        p.best = Point {
            x: BlockVector::from(vec![vec![0.0]]),
            fx: Some(Float::NAN),
        };
        p.position.set_position(BlockVector::from(vec![vec![2.0]]));
        p.update_personal_best(&Sphere, &()).unwrap();
        assert_eq!(p.best.x, BlockVector::from(vec![vec![2.0]]));
        assert_eq!(p.best.fx, Some(4.0));
    }

    #[test]
    fn test_step_without_death_moves_particle() {
        let config = SwarmConfig::new([2]).with_p_death(0.0);
        let mut p = Particle::new(&[2], (-5.0, 5.0), Rng::with_seed(5)).unwrap();
        let start = p.position.x.clone();
        let gbest = BlockVector::zeros(&[2]);
        let dead = p.step(&gbest, &config, &Sphere, &()).unwrap();
        assert!(dead.is_none());
        assert_ne!(p.position.x, start);
        assert!(p.best.fx.is_some());
        assert!(p.best.fx_checked() <= Sphere.evaluate(&start, &()).unwrap());
    }

    #[test]
    fn test_step_with_certain_death_restarts_particle() {
        let config = SwarmConfig::new([2]).with_p_death(1.0).with_limits(10.0, 20.0);
        let mut p = Particle::new(&[2], (10.0, 20.0), Rng::with_seed(5)).unwrap();
        let gbest = p.position.x.clone();
        let dead = p.step(&gbest, &config, &Sphere, &()).unwrap();
        let dead = dead.unwrap();
        assert!(dead.fx.is_some());
        assert!(p.position.x.iter().all(|&x| (10.0..20.0).contains(&x)));
        assert_eq!(p.best.x, p.position.x);
        assert_eq!(p.best.fx, p.position.fx);
        assert!(p.best.fx.is_some());
    }

    #[test]
    fn test_objective_errors_propagate() {
        struct Failing;
        impl Objective<(), String> for Failing {
            fn evaluate(&self, _x: &BlockVector, _args: &()) -> Result<Float, String> {
                Err("diverged".to_string())
            }
        }
        let mut p = Particle::new(&[2], (-1.0, 1.0), Rng::with_seed(0)).unwrap();
        assert_eq!(
            p.update_personal_best(&Failing, &()),
            Err("diverged".to_string())
        );
        let ok: Result<(), Infallible> = p.update_personal_best(&Sphere, &());
        assert!(ok.is_ok());
    }
}
