use std::{cmp::Ordering, fmt::Display};

use serde::{Deserialize, Serialize};

use crate::{BlockVector, Float, Objective};

/// Describes a point in the design space along with its (cached) objective value.
#[derive(Clone, Default, Debug, Serialize, Deserialize)]
pub struct Point {
    /// the point's position
    pub x: BlockVector,
    /// the point's evaluation (`None` if the point has not yet been evaluated)
    pub fx: Option<Float>,
}
impl Point {
    /// Compare two points by their `fx` value. Unevaluated points compare greater than any
    /// evaluated one.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (&self.fx, &other.fx) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(s), Some(o)) => s.total_cmp(o),
        }
    }
    /// Move the point to a new position, resetting the evaluation of the point
    pub fn set_position(&mut self, x: BlockVector) {
        self.x = x;
        self.fx = None;
    }
    /// Get the current evaluation of the point, if it has been evaluated
    ///
    /// # Panics
    ///
    /// This method will panic if the point is unevaluated.
    pub fn fx_checked(&self) -> Float {
        #[allow(clippy::expect_used)]
        self.fx.expect("Point value requested before evaluation")
    }
    /// Evaluate the given function at the point's coordinate and set the `fx` value to the result.
    /// Already evaluated points are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an `Err(E)` if the evaluation fails. See [`Objective::evaluate`] for more
    /// information.
    pub fn evaluate<U, E>(&mut self, func: &dyn Objective<U, E>, args: &U) -> Result<Float, E> {
        match self.fx {
            Some(fx) => Ok(fx),
            None => {
                let fx = func.evaluate(&self.x, args)?;
                self.fx = Some(fx);
                Ok(fx)
            }
        }
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "x: {}, f(x): {:?}", self.x, self.fx)
    }
}

impl From<BlockVector> for Point {
    fn from(value: BlockVector) -> Self {
        Self { x: value, fx: None }
    }
}
