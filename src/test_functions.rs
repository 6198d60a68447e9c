#![allow(clippy::suboptimal_flops)]
use std::convert::Infallible;

use crate::{BlockVector, Float, Objective, PI};

/// A generalized spherical function with a single minimum, summed over every block.
///
/// ```math
/// f(\vec{x}) = \sum_{i=1}^{n} x_i^2
/// ```
/// The global minimum is at $`f(\vec{0}) = 0`$.
pub struct Sphere;
impl Objective<(), Infallible> for Sphere {
    fn evaluate(&self, x: &BlockVector, _args: &()) -> Result<Float, Infallible> {
        Ok(x.norm_squared())
    }
}

/// The Rastrigin function, a non-convex function with multiple modes, evaluated over the
/// flattened blocks.
///
/// ```math
/// f(\vec{x}) = 10n + \sum_{i=1}^{n} [x_i^2 - 10\cos(2\pi x_i)]
/// ```
/// where $`x_i \in [-5.12, 5.12]`$. The global minimum is $`f(\vec{0}) = 0`$.
pub struct Rastrigin;
impl Objective<(), Infallible> for Rastrigin {
    fn evaluate(&self, x: &BlockVector, _args: &()) -> Result<Float, Infallible> {
        Ok(10.0 * (x.len() as Float)
            + x.iter()
                .map(|xi| xi.powi(2) - 10.0 * Float::cos(2.0 * PI * xi))
                .sum::<Float>())
    }
}

/// The Rosenbrock function, a non-convex function with a single minimum, evaluated over the
/// flattened blocks.
///
/// ```math
/// f(\vec{x}) = \sum_{i=1}^{n-1} \left[100(x_{i+1} - x_i^2)^2 + (1 - x_i)^2 \right]
/// ```
/// where $`n \geq 2`$. This function has a minimum at $`f(\vec{1}) = 0`$.
pub struct Rosenbrock;
impl Objective<(), Infallible> for Rosenbrock {
    fn evaluate(&self, x: &BlockVector, _args: &()) -> Result<Float, Infallible> {
        let x = x.flatten();
        Ok((0..x.len().saturating_sub(1))
            .map(|i| 100.0 * (x[i + 1] - x[i].powi(2)).powi(2) + (1.0 - x[i]).powi(2))
            .sum())
    }
}
