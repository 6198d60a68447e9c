use std::{
    fmt::Display,
    ops::{Add, Index, Mul, Sub},
};

use fastrand::Rng;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::{utils::generate_random_vector, Float};

/// A vector in a block-structured design space.
///
/// Each block is an independent [`DVector`] (for instance one flattened weight matrix of a
/// classifier). Positions and velocities of a [`Particle`](crate::Particle) are both
/// [`BlockVector`]s of the same shape, and all arithmetic is elementwise across every block.
///
/// # Panics
///
/// The arithmetic operators panic if the two operands do not share the same block shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockVector(Vec<DVector<Float>>);

impl BlockVector {
    /// Create a zero vector with the given block lengths.
    pub fn zeros(dimension: &[usize]) -> Self {
        Self(dimension.iter().map(|&d| DVector::zeros(d)).collect())
    }
    /// Sample every component independently and uniformly from `[lower, upper)`.
    pub fn random(dimension: &[usize], lower: Float, upper: Float, rng: &mut Rng) -> Self {
        Self(
            dimension
                .iter()
                .map(|&d| generate_random_vector(d, lower, upper, rng))
                .collect(),
        )
    }
    /// The length of each block, in order.
    pub fn shape(&self) -> Vec<usize> {
        self.0.iter().map(|b| b.len()).collect()
    }
    /// The number of blocks.
    pub fn n_blocks(&self) -> usize {
        self.0.len()
    }
    /// The total number of components across all blocks.
    pub fn len(&self) -> usize {
        self.0.iter().map(|b| b.len()).sum()
    }
    /// Returns `true` if there are no components at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Get the blocks as a slice.
    pub fn blocks(&self) -> &[DVector<Float>] {
        &self.0
    }
    /// Iterate over every component, block by block.
    pub fn iter(&self) -> impl Iterator<Item = &Float> {
        self.0.iter().flat_map(|b| b.iter())
    }
    /// Concatenate all blocks into a single vector.
    pub fn flatten(&self) -> DVector<Float> {
        DVector::from_iterator(self.len(), self.iter().copied())
    }
    /// Scale every component by `factor`.
    pub fn scale(&self, factor: Float) -> Self {
        Self(self.0.iter().map(|b| b.scale(factor)).collect())
    }
    /// Squared Euclidean norm over all components.
    pub fn norm_squared(&self) -> Float {
        self.0.iter().map(|b| b.norm_squared()).sum()
    }
    fn zip_with(
        &self,
        other: &Self,
        f: impl Fn(&DVector<Float>, &DVector<Float>) -> DVector<Float>,
    ) -> Self {
        assert_eq!(
            self.shape(),
            other.shape(),
            "Block vectors must have the same shape!"
        );
        Self(self.0.iter().zip(&other.0).map(|(a, b)| f(a, b)).collect())
    }
}

impl From<Vec<DVector<Float>>> for BlockVector {
    fn from(value: Vec<DVector<Float>>) -> Self {
        Self(value)
    }
}
impl From<Vec<Vec<Float>>> for BlockVector {
    fn from(value: Vec<Vec<Float>>) -> Self {
        Self(value.into_iter().map(DVector::from_vec).collect())
    }
}
impl From<DVector<Float>> for BlockVector {
    fn from(value: DVector<Float>) -> Self {
        Self(vec![value])
    }
}

impl Index<usize> for BlockVector {
    type Output = DVector<Float>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl Add for &BlockVector {
    type Output = BlockVector;

    fn add(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a + b)
    }
}
impl Sub for &BlockVector {
    type Output = BlockVector;

    fn sub(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a - b)
    }
}
impl Mul<Float> for &BlockVector {
    type Output = BlockVector;

    fn mul(self, rhs: Float) -> Self::Output {
        self.scale(rhs)
    }
}

impl Display for BlockVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let blocks: Vec<String> = self
            .0
            .iter()
            .map(|b| {
                let values: Vec<String> = b.iter().map(|v| format!("{:+.3E}", v)).collect();
                format!("[{}]", values.join(", "))
            })
            .collect();
        write!(f, "[{}]", blocks.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::dvector;

    #[test]
    fn test_shape_and_len() {
        let v = BlockVector::zeros(&[3, 1, 2]);
        assert_eq!(v.shape(), vec![3, 1, 2]);
        assert_eq!(v.n_blocks(), 3);
        assert_eq!(v.len(), 6);
        assert!(!v.is_empty());
        assert!(BlockVector::default().is_empty());
    }

    #[test]
    fn test_random_respects_limits() {
        let mut rng = Rng::with_seed(0);
        let v = BlockVector::random(&[10, 5], -2.0, 3.0, &mut rng);
        assert_eq!(v.shape(), vec![10, 5]);
        assert!(v.iter().all(|&x| (-2.0..3.0).contains(&x)));
    }

    #[test]
    fn test_elementwise_arithmetic() {
        let a = BlockVector::from(vec![dvector![1.0, 2.0], dvector![3.0]]);
        let b = BlockVector::from(vec![dvector![0.5, -1.0], dvector![2.0]]);
        assert_eq!(&a + &b, BlockVector::from(vec![vec![1.5, 1.0], vec![5.0]]));
        assert_eq!(&a - &b, BlockVector::from(vec![vec![0.5, 3.0], vec![1.0]]));
        assert_eq!(&a * 2.0, BlockVector::from(vec![vec![2.0, 4.0], vec![6.0]]));
        assert_relative_eq!(a.norm_squared(), 14.0);
        assert_eq!(a.flatten(), dvector![1.0, 2.0, 3.0]);
        assert_eq!(a[1], dvector![3.0]);
    }

    #[test]
    #[should_panic(expected = "Block vectors must have the same shape!")]
    fn test_mismatched_shapes_panic() {
        let a = BlockVector::zeros(&[2, 1]);
        let b = BlockVector::zeros(&[1, 2]);
        let _ = &a + &b;
    }

    #[test]
    fn test_display() {
        let a = BlockVector::from(vec![vec![1.0], vec![-2.0, 0.5]]);
        let s = format!("{}", a);
        assert!(s.starts_with("[[+1.000E0]"));
        assert!(s.contains("-2.000E0"));
    }
}
