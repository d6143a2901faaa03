use thiserror::Error;

pub type EnhanceResult<T> = Result<T, EnhanceError>;

#[derive(Debug, Error)]
pub enum EnhanceError {
	#[error("I/O error: {0}")]
	Io(String),
	#[error("NPY error: {0}")]
	Npy(String),
	#[error("Shape error: {0}")]
	Shape(String),
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Image error: {0}")]
	Image(String),
}

impl From<std::io::Error> for EnhanceError {
	fn from(e: std::io::Error) -> Self {
		EnhanceError::Io(e.to_string())
	}
}

impl From<image::ImageError> for EnhanceError {
	fn from(e: image::ImageError) -> Self {
		EnhanceError::Image(e.to_string())
	}
}

impl From<ndarray_npy::ReadNpyError> for EnhanceError {
	fn from(e: ndarray_npy::ReadNpyError) -> Self {
		EnhanceError::Npy(e.to_string())
	}
}

impl From<ndarray_npy::WriteNpyError> for EnhanceError {
	fn from(e: ndarray_npy::WriteNpyError) -> Self {
		EnhanceError::Npy(e.to_string())
	}
}

impl From<ndarray::ShapeError> for EnhanceError {
	fn from(e: ndarray::ShapeError) -> Self {
		EnhanceError::Shape(e.to_string())
	}
}
