use crate::error::{EnhanceError, EnhanceResult};
use ndarray::{Array2, Zip};

/// Weight given to the original depth when blending with the enhanced map.
pub const DEFAULT_ALPHA: f64 = 0.4;

/// `alpha * original + (1 - alpha) * enhanced`, element-wise.
///
/// The result is not renormalized, so its range follows the inputs.
pub fn fuse(original: &Array2<f64>, enhanced: &Array2<f64>, alpha: f64) -> EnhanceResult<Array2<f64>> {
	validate_alpha(alpha)?;

	if original.dim() != enhanced.dim() {
		return Err(EnhanceError::Shape(format!(
			"Cannot fuse maps of different shapes: {:?} vs {:?}",
			original.dim(),
			enhanced.dim()
		)));
	}

	let beta = 1.0 - alpha;
	let mut fused = Array2::zeros(original.dim());
	Zip::from(&mut fused)
		.and(original)
		.and(enhanced)
		.for_each(|out, &o, &e| *out = alpha * o + beta * e);

	Ok(fused)
}

pub fn validate_alpha(alpha: f64) -> EnhanceResult<()> {
	if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
		return Err(EnhanceError::Config(format!(
			"Blend weight must be within [0, 1] (got {})",
			alpha
		)));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use ndarray::array;

	#[test]
	fn test_default_weights() {
		let original = array![[10.0, 0.0], [5.0, 1.0]];
		let enhanced = array![[0.0, 1.0], [0.5, 1.0]];
		let fused = fuse(&original, &enhanced, DEFAULT_ALPHA).unwrap();

		let expected = array![[4.0, 0.6], [2.3, 1.0]];
		for (a, b) in fused.iter().zip(expected.iter()) {
			assert!((a - b).abs() < 1e-12, "{} != {}", a, b);
		}
	}

	#[test]
	fn test_deterministic() {
		let original = Array2::from_shape_fn((8, 8), |(y, x)| (x as f64).powi(2) - y as f64 * 0.7);
		let enhanced = Array2::from_shape_fn((8, 8), |(y, x)| ((x + y) % 3) as f64 / 2.0);
		let a = fuse(&original, &enhanced, 0.4).unwrap();
		let b = fuse(&original, &enhanced, 0.4).unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn test_extreme_weights() {
		let original = array![[1.0, 2.0]];
		let enhanced = array![[0.25, 0.75]];
		assert_eq!(fuse(&original, &enhanced, 1.0).unwrap(), original);
		assert_eq!(fuse(&original, &enhanced, 0.0).unwrap(), enhanced);
	}

	#[test]
	fn test_rejects_bad_inputs() {
		let a = Array2::<f64>::zeros((2, 2));
		let b = Array2::<f64>::zeros((2, 3));
		assert!(matches!(fuse(&a, &b, 0.4), Err(EnhanceError::Shape(_))));
		assert!(matches!(fuse(&a, &a, 1.5), Err(EnhanceError::Config(_))));
		assert!(matches!(fuse(&a, &a, f64::NAN), Err(EnhanceError::Config(_))));
	}
}
