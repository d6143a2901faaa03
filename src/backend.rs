use std::fmt;

/// Execution strategy for the convolution passes.
///
/// `Parallel` splits row and column passes across the rayon pool, `Serial`
/// runs them on the calling thread. Both produce bit-identical results.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComputeBackend {
	Parallel { threads: usize },
	Serial,
}

impl ComputeBackend {
	/// Pick a backend for this run. `force_serial` mirrors the `--no_cuda` flag.
	pub fn select(force_serial: bool) -> Self {
		if force_serial {
			return ComputeBackend::Serial;
		}

		let threads = rayon::current_num_threads();
		if threads > 1 {
			ComputeBackend::Parallel { threads }
		} else {
			ComputeBackend::Serial
		}
	}

	pub fn is_parallel(&self) -> bool {
		matches!(self, ComputeBackend::Parallel { .. })
	}

	pub fn name(&self) -> &'static str {
		match self {
			ComputeBackend::Parallel { .. } => "parallel",
			ComputeBackend::Serial => "serial",
		}
	}
}

impl fmt::Display for ComputeBackend {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ComputeBackend::Parallel { threads } => write!(f, "parallel ({} threads)", threads),
			ComputeBackend::Serial => write!(f, "serial"),
		}
	}
}

#[derive(Clone, Debug)]
pub struct BackendReport {
	pub available_threads: usize,
	pub selected: ComputeBackend,
}

impl fmt::Display for BackendReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Worker threads available: {}", self.available_threads)?;
		match self.selected {
			ComputeBackend::Parallel { .. } => write!(f, "Running filters on {}", self.selected),
			ComputeBackend::Serial => write!(f, "Running filters on a single thread"),
		}
	}
}

pub fn probe(force_serial: bool) -> BackendReport {
	let report = BackendReport {
		available_threads: rayon::current_num_threads(),
		selected: ComputeBackend::select(force_serial),
	};
	tracing::debug!(
		threads = report.available_threads,
		backend = report.selected.name(),
		"Compute backend probed"
	);
	report
}
