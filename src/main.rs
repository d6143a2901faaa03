use clap::Parser;
use depth_enhance::{backend, process_depth_file, EnhanceConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "depth-enhance")]
#[command(about = "Gaussian-Sobel edge enhancement for precomputed depth maps")]
#[command(version)]
struct Cli {
	/// Path to a single .npy depth map
	#[arg(long = "image_path", alias = "image-path", required_unless_present = "probe")]
	image_path: Option<PathBuf>,

	/// Output folder, deleted and recreated on every run
	#[arg(long = "output_path", alias = "output-path", default_value = "jpg")]
	output_path: PathBuf,

	/// If set, disables parallel filtering and runs on a single thread
	#[arg(long = "no_cuda", alias = "no-cuda")]
	no_cuda: bool,

	/// Gaussian kernel size (must be odd)
	#[arg(long = "gauss_ksize", alias = "gauss-ksize", default_value_t = 5)]
	gauss_ksize: usize,

	/// Sobel kernel size (must be odd, at most 31)
	#[arg(long = "sobel_ksize", alias = "sobel-ksize", default_value_t = 3)]
	sobel_ksize: usize,

	/// Weight of the original depth in the blend (enhanced gets 1 - alpha)
	#[arg(long, default_value_t = 0.4)]
	alpha: f64,

	/// JPEG quality for the preview (1-100)
	#[arg(long, default_value_t = 75)]
	quality: u8,

	/// Report the available compute backend and exit
	#[arg(long)]
	probe: bool,
}

fn main() {
	// RUST_LOG controls verbosity, e.g. RUST_LOG=depth_enhance=debug
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
		)
		.with_writer(std::io::stderr)
		.with_target(true)
		.init();

	let cli = Cli::parse();

	let report = backend::probe(cli.no_cuda);
	if cli.probe {
		println!("{}", report);
		return;
	}
	tracing::info!(backend = %report.selected, "Compute backend selected");

	let image_path = cli
		.image_path
		.expect("clap requires --image_path unless --probe is given");

	let config = EnhanceConfig {
		image_path,
		output_path: cli.output_path,
		no_cuda: cli.no_cuda,
		gauss_ksize: cli.gauss_ksize,
		sobel_ksize: cli.sobel_ksize,
		alpha: cli.alpha,
		jpeg_quality: cli.quality,
	};

	if let Err(e) = process_depth_file(&config) {
		eprintln!("Error: {}", e);
		std::process::exit(1);
	}
}
