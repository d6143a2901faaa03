use crate::colormap::colorize_depth;
use crate::depth_io::save_depth_map;
use crate::error::{EnhanceError, EnhanceResult};
use image::RgbImage;
use ndarray::Array2;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR: &str = "jpg";
/// libjpeg's stock quality setting.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;
pub const PREVIEW_EXTENSION: &str = "jpeg";

/// Files written by one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnhanceOutputs {
	pub npy_path: PathBuf,
	pub preview_path: PathBuf,
}

/// Start from an empty `dir`.
///
/// An existing directory is removed recursively, with whatever it held, and
/// recreated. A regular file at `dir` is an error.
pub fn prepare_output_dir(dir: impl AsRef<Path>) -> EnhanceResult<()> {
	let dir = dir.as_ref();

	if dir.is_dir() {
		let removed = std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0);
		if removed > 0 {
			tracing::warn!(
				dir = %dir.display(),
				entries = removed,
				"Output directory is not empty, removing its contents"
			);
		}
		std::fs::remove_dir_all(dir).map_err(|e| {
			EnhanceError::Io(format!("Failed to clear output directory {:?}: {}", dir, e))
		})?;
	} else if dir.exists() {
		return Err(EnhanceError::Io(format!(
			"Output path exists and is not a directory: {:?}",
			dir
		)));
	}

	std::fs::create_dir_all(dir).map_err(|e| {
		EnhanceError::Io(format!("Failed to create output directory {:?}: {}", dir, e))
	})?;
	Ok(())
}

/// `<dir>/<stem>_enhanced.<ext>`, where `stem` drops the input's last extension.
pub fn enhanced_file_path(dir: &Path, input: &Path, ext: &str) -> PathBuf {
	let stem = input
		.file_stem()
		.map(|s| s.to_string_lossy().into_owned())
		.unwrap_or_else(|| "depth".to_string());
	dir.join(format!("{}_enhanced.{}", stem, ext))
}

/// Recreate `dir`, then write the fused map as `.npy` and its colorized preview.
pub fn write_outputs(
	fused: &Array2<f64>,
	input: &Path,
	dir: &Path,
	jpeg_quality: u8,
) -> EnhanceResult<EnhanceOutputs> {
	prepare_output_dir(dir)?;

	let npy_path = enhanced_file_path(dir, input, "npy");
	save_depth_map(&npy_path, fused)?;
	println!("Enhanced npy file saved to: {}", npy_path.display());

	let preview_path = enhanced_file_path(dir, input, PREVIEW_EXTENSION);
	let preview = colorize_depth(fused);
	save_jpeg(&preview, &preview_path, jpeg_quality)?;
	println!("Enhanced {} saved to: {}", PREVIEW_EXTENSION, preview_path.display());

	Ok(EnhanceOutputs {
		npy_path,
		preview_path,
	})
}

pub fn save_jpeg(image: &RgbImage, path: &Path, quality: u8) -> EnhanceResult<()> {
	let file = std::fs::File::create(path)
		.map_err(|e| EnhanceError::Image(format!("Failed to create {:?}: {}", path, e)))?;

	image::codecs::jpeg::JpegEncoder::new_with_quality(file, quality)
		.encode_image(image)
		.map_err(|e| EnhanceError::Image(format!("Failed to encode preview JPEG: {}", e)))
}
