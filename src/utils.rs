use fastrand::Rng;
use fastrand_contrib::RngExt;
use nalgebra::DVector;

use crate::Float;

pub(crate) fn generate_random_vector(
    dimension: usize,
    lb: Float,
    ub: Float,
    rng: &mut Rng,
) -> DVector<Float> {
    DVector::from_vec((0..dimension).map(|_| rng.range(lb, ub)).collect())
}

/// A helper trait to get feature-gated floating-point random values
pub trait SampleFloat {
    /// Get a random value in the range `[lower, upper)`
    fn range(&mut self, lower: Float, upper: Float) -> Float;
    /// Get a random value in the range `[0, 1)`
    fn float(&mut self) -> Float;
}
impl SampleFloat for Rng {
    #[cfg(not(feature = "f32"))]
    fn range(&mut self, lower: Float, upper: Float) -> Float {
        self.f64_range(lower..upper)
    }
    #[cfg(feature = "f32")]
    fn range(&mut self, lower: Float, upper: Float) -> Float {
        self.f32_range(lower..upper)
    }
    #[cfg(not(feature = "f32"))]
    fn float(&mut self) -> Float {
        self.f64()
    }
    #[cfg(feature = "f32")]
    fn float(&mut self) -> Float {
        self.f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_vector_in_range() {
        let mut rng = Rng::with_seed(0);
        let v = generate_random_vector(100, -0.5, 0.25, &mut rng);
        assert_eq!(v.len(), 100);
        assert!(v.iter().all(|&vi| (-0.5..0.25).contains(&vi)));
    }

    #[test]
    fn test_float_in_unit_interval() {
        let mut rng = Rng::with_seed(7);
        for _ in 0..1000 {
            let u = rng.float();
            assert!((0.0..1.0).contains(&u));
        }
    }
}
