use crate::error::{EnhanceError, EnhanceResult};
use ndarray::{Array2, ArrayD, Axis, Ix2};
use ndarray_npy::{ReadNpyError, ReadNpyExt, ReadableElement, WriteNpyExt};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Load a depth map from an `.npy` file as `f64`.
///
/// Any integer, float or bool dtype is accepted and upcast. Singleton axes
/// are squeezed away while the rank is above 2; the result must be 2-D.
pub fn load_depth_map(path: impl AsRef<Path>) -> EnhanceResult<Array2<f64>> {
	let path = path.as_ref();

	if path.is_dir() {
		return Err(EnhanceError::Config(format!(
			"Folder input is not supported, pass a single .npy file: {:?}",
			path
		)));
	}
	if !path.exists() {
		return Err(EnhanceError::Io(format!("Depth file not found: {:?}", path)));
	}

	let bytes = std::fs::read(path)
		.map_err(|e| EnhanceError::Io(format!("Failed to read {:?}: {}", path, e)))?;

	let raw = decode_any_dtype(&bytes)
		.map_err(|e| EnhanceError::Npy(format!("Failed to parse {:?}: {}", path, e)))?;
	tracing::debug!(shape = ?raw.shape(), "Loaded npy array");

	squeeze_to_2d(raw)
}

fn read_as<T>(bytes: &[u8], cast: impl Fn(T) -> f64) -> Result<Option<ArrayD<f64>>, ReadNpyError>
where
	T: ReadableElement + Copy,
{
	match ArrayD::<T>::read_npy(bytes) {
		Ok(arr) => Ok(Some(arr.mapv(cast))),
		Err(ReadNpyError::WrongDescriptor(_)) => Ok(None),
		Err(e) => Err(e),
	}
}

fn decode_any_dtype(bytes: &[u8]) -> Result<ArrayD<f64>, EnhanceError> {
	macro_rules! try_dtypes {
		($($t:ty),* $(,)?) => {
			$(
				if let Some(arr) = read_as::<$t>(bytes, |v: $t| v as f64)? {
					return Ok(arr);
				}
			)*
		};
	}

	try_dtypes!(f64, f32, i64, i32, i16, i8, u64, u32, u16, u8);

	if let Some(arr) = read_as::<bool>(bytes, |v: bool| if v { 1.0 } else { 0.0 })? {
		return Ok(arr);
	}

	Err(EnhanceError::Npy(
		"unsupported dtype (expected a numeric or bool array)".to_string(),
	))
}

/// Drop length-1 axes until the array is 2-D.
///
/// `(1, H, W)` and `(H, W, 1)` both become `(H, W)`; a genuine `(1, W)` row
/// is left alone.
pub fn squeeze_to_2d(mut arr: ArrayD<f64>) -> EnhanceResult<Array2<f64>> {
	let original_shape = arr.shape().to_vec();

	while arr.ndim() > 2 {
		match arr.shape().iter().position(|&len| len == 1) {
			Some(axis) => arr = arr.index_axis_move(Axis(axis), 0),
			None => break,
		}
	}

	let depth = arr.into_dimensionality::<Ix2>().map_err(|_| {
		EnhanceError::Shape(format!(
			"Expected a 2-D depth map after squeezing, got shape {:?}",
			original_shape
		))
	})?;

	if depth.is_empty() {
		return Err(EnhanceError::Shape(format!(
			"Depth map is empty (shape {:?})",
			original_shape
		)));
	}

	Ok(depth)
}

/// Write `depth` as a little-endian f64 `.npy` file.
pub fn save_depth_map(path: impl AsRef<Path>, depth: &Array2<f64>) -> EnhanceResult<()> {
	let path = path.as_ref();
	let file = File::create(path)
		.map_err(|e| EnhanceError::Io(format!("Failed to create {:?}: {}", path, e)))?;
	let mut writer = BufWriter::new(file);
	depth.write_npy(&mut writer)?;
	writer.flush()?;
	Ok(())
}
