pub mod backend;
pub mod colormap;
pub mod convolution;
pub mod depth_filter;
pub mod depth_io;
pub mod error;
pub mod fusion;
pub mod output;

pub use backend::{BackendReport, ComputeBackend};
pub use depth_filter::{enhance_depth_map, DepthEnhancer};
pub use depth_io::{load_depth_map, save_depth_map};
pub use error::{EnhanceError, EnhanceResult};
pub use fusion::{fuse, DEFAULT_ALPHA};
pub use output::EnhanceOutputs;

use depth_filter::{DEFAULT_GAUSS_KSIZE, DEFAULT_SOBEL_KSIZE};
use output::{DEFAULT_JPEG_QUALITY, DEFAULT_OUTPUT_DIR};
use std::path::PathBuf;

/// Settings for one enhancement run.
#[derive(Clone, Debug)]
pub struct EnhanceConfig {
	pub image_path: PathBuf,
	pub output_path: PathBuf,
	/// Force single-threaded filtering.
	pub no_cuda: bool,
	pub gauss_ksize: usize,
	pub sobel_ksize: usize,
	pub alpha: f64,
	/// Quality of the JPEG preview, 1-100.
	pub jpeg_quality: u8,
}

impl Default for EnhanceConfig {
	fn default() -> Self {
		Self {
			image_path: PathBuf::new(),
			output_path: PathBuf::from(DEFAULT_OUTPUT_DIR),
			no_cuda: false,
			gauss_ksize: DEFAULT_GAUSS_KSIZE,
			sobel_ksize: DEFAULT_SOBEL_KSIZE,
			alpha: DEFAULT_ALPHA,
			jpeg_quality: DEFAULT_JPEG_QUALITY,
		}
	}
}

impl EnhanceConfig {
	pub fn new(image_path: impl Into<PathBuf>) -> Self {
		Self {
			image_path: image_path.into(),
			..Self::default()
		}
	}

	/// Reject bad parameters before any file is touched.
	pub fn validate(&self) -> EnhanceResult<()> {
		depth_filter::validate_gauss_ksize(self.gauss_ksize)?;
		depth_filter::validate_sobel_ksize(self.sobel_ksize)?;
		fusion::validate_alpha(self.alpha)?;
		if !(1..=100).contains(&self.jpeg_quality) {
			return Err(EnhanceError::Config(format!(
				"JPEG quality must be within 1-100 (got {})",
				self.jpeg_quality
			)));
		}
		Ok(())
	}
}

/// Load, enhance, fuse and write one depth map.
///
/// The output directory is recreated from scratch before anything is written.
pub fn process_depth_file(config: &EnhanceConfig) -> EnhanceResult<EnhanceOutputs> {
	config.validate()?;

	let backend = ComputeBackend::select(config.no_cuda);
	let enhancer = DepthEnhancer::new(config.gauss_ksize, config.sobel_ksize, backend)?;

	tracing::info!(input = %config.image_path.display(), "Loading depth map");
	let depth = load_depth_map(&config.image_path)?;
	let (h, w) = depth.dim();
	tracing::info!(height = h, width = w, backend = %backend, "Enhancing depth map");

	let enhanced = enhancer.process(&depth);
	let fused = fuse(&depth, &enhanced, config.alpha)?;

	tracing::info!(output = %config.output_path.display(), "Writing outputs");
	output::write_outputs(
		&fused,
		&config.image_path,
		&config.output_path,
		config.jpeg_quality,
	)
}
