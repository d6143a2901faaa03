// End-to-end runs of process_depth_file on temporary directories.

use depth_enhance::{
	enhance_depth_map, fuse, load_depth_map, process_depth_file, ComputeBackend, EnhanceConfig,
	EnhanceError, DEFAULT_ALPHA,
};
use ndarray::{Array2, Array3};
use ndarray_npy::write_npy;
use std::path::Path;
use tempfile::tempdir;

fn wavy_depth(h: usize, w: usize) -> Array2<f32> {
	Array2::from_shape_fn((h, w), |(y, x)| {
		let step = if x > w / 2 { 3.0 } else { 1.0 };
		step + (y as f32 * 0.25).sin() * 0.5
	})
}

fn config_for(input: &Path, out: &Path) -> EnhanceConfig {
	EnhanceConfig {
		output_path: out.to_path_buf(),
		..EnhanceConfig::new(input)
	}
}

#[test]
fn writes_npy_and_jpeg_named_after_input() {
	let root = tempdir().unwrap();
	let input = root.path().join("scene_0001.npy");
	write_npy(&input, &wavy_depth(24, 32)).unwrap();
	let out = root.path().join("jpg");

	let outputs = process_depth_file(&config_for(&input, &out)).unwrap();

	assert_eq!(outputs.npy_path, out.join("scene_0001_enhanced.npy"));
	assert_eq!(outputs.preview_path, out.join("scene_0001_enhanced.jpeg"));
	assert!(outputs.npy_path.is_file());
	assert!(outputs.preview_path.is_file());
}

#[test]
fn saved_npy_matches_in_memory_fusion() {
	let root = tempdir().unwrap();
	let input = root.path().join("depth.npy");
	let raw = wavy_depth(16, 20);
	write_npy(&input, &raw).unwrap();

	let outputs = process_depth_file(&config_for(&input, &root.path().join("out"))).unwrap();

	let depth = raw.mapv(f64::from);
	let enhanced = enhance_depth_map(&depth, 5, 3, ComputeBackend::Serial).unwrap();
	let expected = fuse(&depth, &enhanced, DEFAULT_ALPHA).unwrap();

	let saved = load_depth_map(&outputs.npy_path).unwrap();
	assert_eq!(saved.dim(), expected.dim());
	for (a, b) in saved.iter().zip(expected.iter()) {
		assert!((a - b).abs() < 1e-12);
	}
}

#[test]
fn repeated_runs_are_bit_identical() {
	let root = tempdir().unwrap();
	let input = root.path().join("depth.npy");
	write_npy(&input, &wavy_depth(12, 12)).unwrap();
	let out = root.path().join("out");
	let config = config_for(&input, &out);

	let first = process_depth_file(&config).unwrap();
	let bytes_a = std::fs::read(&first.npy_path).unwrap();
	let second = process_depth_file(&config).unwrap();
	let bytes_b = std::fs::read(&second.npy_path).unwrap();

	assert_eq!(bytes_a, bytes_b);
}

#[test]
fn serial_backend_matches_default() {
	let root = tempdir().unwrap();
	let input = root.path().join("depth.npy");
	write_npy(&input, &wavy_depth(30, 18)).unwrap();

	let default_run = process_depth_file(&config_for(&input, &root.path().join("a"))).unwrap();
	let serial_run = process_depth_file(&EnhanceConfig {
		no_cuda: true,
		..config_for(&input, &root.path().join("b"))
	})
	.unwrap();

	assert_eq!(
		std::fs::read(default_run.npy_path).unwrap(),
		std::fs::read(serial_run.npy_path).unwrap()
	);
}

#[test]
fn output_directory_is_recreated_empty() {
	let root = tempdir().unwrap();
	let input = root.path().join("depth.npy");
	write_npy(&input, &wavy_depth(8, 8)).unwrap();
	let out = root.path().join("out");
	std::fs::create_dir_all(out.join("old_run")).unwrap();
	std::fs::write(out.join("unrelated.txt"), b"stale").unwrap();

	process_depth_file(&config_for(&input, &out)).unwrap();

	let mut names: Vec<String> = std::fs::read_dir(&out)
		.unwrap()
		.map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
		.collect();
	names.sort();
	assert_eq!(names, vec!["depth_enhanced.jpeg", "depth_enhanced.npy"]);
}

#[test]
fn preview_matches_depth_dimensions() {
	let root = tempdir().unwrap();
	let input = root.path().join("batch.npy");
	// Leading singleton axis, as produced by batched depth networks.
	let raw = Array3::from_shape_fn((1, 10, 14), |(_, y, x)| (x * y) as f64);
	write_npy(&input, &raw).unwrap();

	let outputs = process_depth_file(&config_for(&input, &root.path().join("out"))).unwrap();

	let preview = image::open(&outputs.preview_path).unwrap();
	assert_eq!((preview.width(), preview.height()), (14, 10));
	assert_eq!(preview.color().channel_count(), 3);
	assert_eq!(load_depth_map(&outputs.npy_path).unwrap().dim(), (10, 14));
}

#[test]
fn uniform_depth_keeps_scaled_original() {
	let root = tempdir().unwrap();
	let input = root.path().join("flat.npy");
	write_npy(&input, &Array2::<f64>::from_elem((5, 6), 2.5)).unwrap();

	let outputs = process_depth_file(&config_for(&input, &root.path().join("out"))).unwrap();

	// Zero gradient everywhere: enhanced is all zeros, so fused = alpha * original.
	let saved = load_depth_map(&outputs.npy_path).unwrap();
	assert!(saved.iter().all(|&v| (v - 0.4 * 2.5).abs() < 1e-12));
}

#[test]
fn invalid_kernel_sizes_fail_before_touching_output() {
	let root = tempdir().unwrap();
	let input = root.path().join("depth.npy");
	write_npy(&input, &wavy_depth(8, 8)).unwrap();
	let out = root.path().join("out");
	std::fs::create_dir_all(&out).unwrap();
	std::fs::write(out.join("keep.txt"), b"keep").unwrap();

	let even_gauss = EnhanceConfig {
		gauss_ksize: 4,
		..config_for(&input, &out)
	};
	assert!(matches!(process_depth_file(&even_gauss), Err(EnhanceError::Config(_))));

	let even_sobel = EnhanceConfig {
		sobel_ksize: 2,
		..config_for(&input, &out)
	};
	assert!(matches!(process_depth_file(&even_sobel), Err(EnhanceError::Config(_))));

	let zero_quality = EnhanceConfig {
		jpeg_quality: 0,
		..config_for(&input, &out)
	};
	assert!(matches!(process_depth_file(&zero_quality), Err(EnhanceError::Config(_))));

	assert!(out.join("keep.txt").is_file());
}

#[test]
fn folder_input_is_rejected() {
	let root = tempdir().unwrap();
	let folder = root.path().join("maps");
	std::fs::create_dir_all(&folder).unwrap();

	let result = process_depth_file(&config_for(&folder, &root.path().join("out")));
	assert!(matches!(result, Err(EnhanceError::Config(_))));
}

#[test]
fn missing_input_is_io_error() {
	let root = tempdir().unwrap();
	let result = process_depth_file(&config_for(
		&root.path().join("absent.npy"),
		&root.path().join("out"),
	));
	assert!(matches!(result, Err(EnhanceError::Io(_))));
}
