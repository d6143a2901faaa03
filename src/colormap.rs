use image::{ImageBuffer, Rgb, RgbImage};
use ndarray::Array2;

/// Upper normalization bound for previews, as a percentile of the map.
pub const PREVIEW_PERCENTILE: f64 = 95.0;

/// Number of discrete colors the preview colormap is quantized to.
pub const COLORMAP_BINS: usize = 256;

/// Magma color for `t`, clamped to [0, 1].
///
/// `t` is quantized into [`COLORMAP_BINS`] bins (`min(floor(t * 256), 255)`)
/// and each bin takes the gradient's color at that table position.
pub fn magma(t: f64) -> Rgb<u8> {
	let t = t.clamp(0.0, 1.0);
	let bin = ((t * COLORMAP_BINS as f64) as usize).min(COLORMAP_BINS - 1);
	let c = colorous::MAGMA.eval_rational(bin, COLORMAP_BINS);
	Rgb([c.r, c.g, c.b])
}

/// Percentile `q` (0..=100) with linear interpolation between ranks.
///
/// NaN entries are ignored; returns `None` when nothing is left.
pub fn percentile<'a>(values: impl IntoIterator<Item = &'a f64>, q: f64) -> Option<f64> {
	let mut sorted: Vec<f64> = values.into_iter().copied().filter(|v| !v.is_nan()).collect();
	if sorted.is_empty() {
		return None;
	}
	sorted.sort_by(f64::total_cmp);

	let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
	let lo = rank.floor() as usize;
	let hi = rank.ceil() as usize;
	let frac = rank - lo as f64;
	Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Render a depth map as an 8-bit magma image.
///
/// Values are scaled so the map minimum lands at 0 and the
/// [`PREVIEW_PERCENTILE`] value at 1; anything above saturates. NaN pixels
/// are drawn black.
pub fn colorize_depth(depth: &Array2<f64>) -> RgbImage {
	let (h, w) = depth.dim();
	let vmin = depth
		.iter()
		.copied()
		.filter(|v| !v.is_nan())
		.fold(f64::INFINITY, f64::min);
	let vmax = percentile(depth.iter(), PREVIEW_PERCENTILE).unwrap_or(vmin);
	let range = vmax - vmin;

	tracing::debug!(vmin, vmax, "Preview normalization bounds");

	ImageBuffer::from_fn(w as u32, h as u32, |x, y| {
		let v = depth[[y as usize, x as usize]];
		if v.is_nan() {
			return Rgb([0, 0, 0]);
		}
		let t = if range > 0.0 { (v - vmin) / range } else { 0.0 };
		magma(t)
	})
}
