// Separable 1-D correlation over `Array2<f64>`.
//
// Border handling is reflect-101 (gfedcb|abcdefgh|gfedcba): the edge pixel
// itself is not repeated. A single-element axis maps every tap to index 0.

use crate::backend::ComputeBackend;
use ndarray::{Array2, ArrayView1, ArrayViewMut1, Zip};

/// Map a possibly out-of-range index onto `[0, len)` using reflect-101.
pub fn reflect_101(index: isize, len: usize) -> usize {
	if len == 1 {
		return 0;
	}
	let len = len as isize;
	let mut p = index;
	while p < 0 || p >= len {
		if p < 0 {
			p = -p;
		} else {
			p = 2 * len - 2 - p;
		}
	}
	p as usize
}

fn correlate_lane(src: ArrayView1<f64>, kernel: &[f64], mut dst: ArrayViewMut1<f64>) {
	let len = src.len();
	let half = (kernel.len() / 2) as isize;

	for (i, out) in dst.iter_mut().enumerate() {
		let mut acc = 0.0f64;
		for (k, &kv) in kernel.iter().enumerate() {
			let j = reflect_101(i as isize + k as isize - half, len);
			acc += src[j] * kv;
		}
		*out = acc;
	}
}

/// Correlate each row with `kernel` (horizontal pass).
pub fn convolve_rows(src: &Array2<f64>, kernel: &[f64], backend: ComputeBackend) -> Array2<f64> {
	debug_assert!(kernel.len() % 2 == 1, "kernel length must be odd");
	let mut dst = Array2::zeros(src.dim());
	let zip = Zip::from(dst.rows_mut()).and(src.rows());

	if backend.is_parallel() {
		zip.par_for_each(|out, row| correlate_lane(row, kernel, out));
	} else {
		zip.for_each(|out, row| correlate_lane(row, kernel, out));
	}

	dst
}

/// Correlate each column with `kernel` (vertical pass).
pub fn convolve_cols(src: &Array2<f64>, kernel: &[f64], backend: ComputeBackend) -> Array2<f64> {
	debug_assert!(kernel.len() % 2 == 1, "kernel length must be odd");
	let mut dst = Array2::zeros(src.dim());
	let zip = Zip::from(dst.columns_mut()).and(src.columns());

	if backend.is_parallel() {
		zip.par_for_each(|out, col| correlate_lane(col, kernel, out));
	} else {
		zip.for_each(|out, col| correlate_lane(col, kernel, out));
	}

	dst
}

/// Apply `row_kernel` along x, then `col_kernel` along y.
pub fn convolve_separable(
	src: &Array2<f64>,
	row_kernel: &[f64],
	col_kernel: &[f64],
	backend: ComputeBackend,
) -> Array2<f64> {
	let tmp = convolve_rows(src, row_kernel, backend);
	convolve_cols(&tmp, col_kernel, backend)
}
