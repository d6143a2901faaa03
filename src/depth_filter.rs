use crate::backend::ComputeBackend;
use crate::convolution::convolve_separable;
use crate::error::{EnhanceError, EnhanceResult};
use ndarray::{Array2, Zip};

pub const DEFAULT_GAUSS_KSIZE: usize = 5;
pub const DEFAULT_SOBEL_KSIZE: usize = 3;
pub const MAX_SOBEL_KSIZE: usize = 31;

// Fixed binomial tables used when sigma is derived from a small aperture.
const SMALL_GAUSSIAN_TAB: [&[f64]; 4] = [
	&[1.0],
	&[0.25, 0.5, 0.25],
	&[0.0625, 0.25, 0.375, 0.25, 0.0625],
	&[0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
];

/// Gaussian-Sobel edge enhancer for a single depth map.
///
/// Kernels are built once in [`DepthEnhancer::new`]; [`DepthEnhancer::process`]
/// then runs blur, gradient, magnitude and min-max normalization.
pub struct DepthEnhancer {
	gauss_kernel: Vec<f64>,
	sobel_deriv: Vec<f64>,
	sobel_smooth: Vec<f64>,
	backend: ComputeBackend,
}

impl DepthEnhancer {
	pub fn new(gauss_ksize: usize, sobel_ksize: usize, backend: ComputeBackend) -> EnhanceResult<Self> {
		validate_gauss_ksize(gauss_ksize)?;
		validate_sobel_ksize(sobel_ksize)?;

		let gauss_kernel = gaussian_kernel(gauss_ksize);
		// A 1-tap aperture still differentiates with 3 taps, just without cross smoothing.
		let deriv_ksize = if sobel_ksize == 1 { 3 } else { sobel_ksize };
		let sobel_deriv = sobel_kernel(1, deriv_ksize);
		let sobel_smooth = sobel_kernel(0, sobel_ksize);

		tracing::debug!(
			gauss = ?gauss_kernel,
			deriv = ?sobel_deriv,
			smooth = ?sobel_smooth,
			backend = backend.name(),
			"Filter kernels built"
		);

		Ok(Self {
			gauss_kernel,
			sobel_deriv,
			sobel_smooth,
			backend,
		})
	}

	pub fn process(&self, depth: &Array2<f64>) -> Array2<f64> {
		let smoothed = gaussian_blur(depth, &self.gauss_kernel, self.backend);
		let (grad_x, grad_y) = self.sobel_xy(&smoothed);
		normalize_minmax(gradient_magnitude(&grad_x, &grad_y))
	}

	fn sobel_xy(&self, src: &Array2<f64>) -> (Array2<f64>, Array2<f64>) {
		let gx = convolve_separable(src, &self.sobel_deriv, &self.sobel_smooth, self.backend);
		let gy = convolve_separable(src, &self.sobel_smooth, &self.sobel_deriv, self.backend);
		(gx, gy)
	}
}

/// Blur, take the Sobel gradient magnitude and rescale it to [0, 1].
pub fn enhance_depth_map(
	depth: &Array2<f64>,
	gauss_ksize: usize,
	sobel_ksize: usize,
	backend: ComputeBackend,
) -> EnhanceResult<Array2<f64>> {
	let enhancer = DepthEnhancer::new(gauss_ksize, sobel_ksize, backend)?;
	Ok(enhancer.process(depth))
}

pub fn validate_gauss_ksize(ksize: usize) -> EnhanceResult<()> {
	if ksize == 0 || ksize % 2 == 0 {
		return Err(EnhanceError::Config(format!(
			"Gaussian kernel size must be a positive odd number (got {})",
			ksize
		)));
	}
	Ok(())
}

pub fn validate_sobel_ksize(ksize: usize) -> EnhanceResult<()> {
	if ksize % 2 == 0 || ksize > MAX_SOBEL_KSIZE {
		return Err(EnhanceError::Config(format!(
			"Sobel kernel size must be odd and not larger than {} (got {})",
			MAX_SOBEL_KSIZE, ksize
		)));
	}
	Ok(())
}

/// 1-D Gaussian taps for an odd `ksize`, sigma derived from the size.
///
/// Sizes up to 7 use the fixed binomial tables; larger sizes sample
/// `exp(-x^2 / 2 sigma^2)` with `sigma = 0.3 * ((ksize - 1) * 0.5 - 1) + 0.8`
/// and normalize to a unit sum.
pub fn gaussian_kernel(ksize: usize) -> Vec<f64> {
	if ksize % 2 == 1 && ksize <= 7 {
		return SMALL_GAUSSIAN_TAB[ksize / 2].to_vec();
	}

	let sigma = 0.3 * ((ksize as f64 - 1.0) * 0.5 - 1.0) + 0.8;
	let coeff = -0.5 / (sigma * sigma);
	let center = (ksize as f64 - 1.0) * 0.5;

	let mut kernel: Vec<f64> = (0..ksize)
		.map(|i| {
			let x = i as f64 - center;
			(coeff * x * x).exp()
		})
		.collect();
	let ksum: f64 = kernel.iter().sum();
	for v in &mut kernel {
		*v /= ksum;
	}
	kernel
}

/// Unnormalized 1-D Sobel factor of derivative `order` and length `ksize`.
///
/// Larger apertures are built from binomial coefficients (repeated `[1, 1]`
/// smoothing) followed by `order` rounds of `[-1, 1]` differencing.
pub fn sobel_kernel(order: usize, ksize: usize) -> Vec<f64> {
	match ksize {
		1 => vec![1.0],
		3 => match order {
			0 => vec![1.0, 2.0, 1.0],
			1 => vec![-1.0, 0.0, 1.0],
			_ => vec![1.0, -2.0, 1.0],
		},
		_ => {
			let mut ker = vec![0i64; ksize + 1];
			ker[0] = 1;

			for _ in 0..ksize.saturating_sub(order + 1) {
				let mut oldval = ker[0];
				for j in 1..=ksize {
					let newval = ker[j] + ker[j - 1];
					ker[j - 1] = oldval;
					oldval = newval;
				}
			}

			for _ in 0..order {
				let mut oldval = -ker[0];
				for j in 1..=ksize {
					let newval = ker[j - 1] - ker[j];
					ker[j - 1] = oldval;
					oldval = newval;
				}
			}

			ker[..ksize].iter().map(|&v| v as f64).collect()
		}
	}
}

pub fn gaussian_blur(depth: &Array2<f64>, kernel: &[f64], backend: ComputeBackend) -> Array2<f64> {
	convolve_separable(depth, kernel, kernel, backend)
}

pub fn gradient_magnitude(grad_x: &Array2<f64>, grad_y: &Array2<f64>) -> Array2<f64> {
	let mut out = Array2::zeros(grad_x.dim());
	Zip::from(&mut out)
		.and(grad_x)
		.and(grad_y)
		.for_each(|m, &gx, &gy| *m = (gx * gx + gy * gy).sqrt());
	out
}

/// Linear rescale so the minimum maps to 0 and the maximum to 1.
///
/// A flat map (zero range) becomes all zeros.
pub fn normalize_minmax(mut values: Array2<f64>) -> Array2<f64> {
	let min = values.iter().copied().fold(f64::INFINITY, f64::min);
	let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
	let range = max - min;

	if range > f64::EPSILON {
		values.mapv_inplace(|v| (v - min) / range);
	} else {
		values.fill(0.0);
	}
	values
}
