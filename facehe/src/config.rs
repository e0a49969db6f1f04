//! Environment-driven engine configuration.
//!
//! Mirrors the `Settings` object the original service loaded from environment
//! variables, minus anything owned by a transport layer (host/port, CORS,
//! auth secrets): those stay outside this crate.

use std::path::PathBuf;

const ENV_CONTEXT_DIR: &str = "FACEHE_CONTEXT_DIR";
const ENV_MODEL_PATH: &str = "FACEHE_MODEL_PATH";
const ENV_MAX_WORKERS: &str = "FACEHE_MAX_INFERENCE_WORKERS";
const ENV_TIMEOUT_MS: &str = "FACEHE_REQUEST_TIMEOUT_MS";
const ENV_MAX_QUEUE_DEPTH: &str = "FACEHE_MAX_QUEUE_DEPTH";

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_MAX_QUEUE_DEPTH: usize = 64;

/// Runtime configuration for the inference engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
	/// Directory where persisted evaluation contexts (`<key_id>.seal`) live.
	pub context_dir: PathBuf,
	/// Path to the trained model weights artifact.
	pub model_path: PathBuf,
	/// Maximum number of forward passes allowed to run concurrently.
	pub max_inference_workers: usize,
	/// Per-request deadline.
	pub request_timeout_ms: u64,
	/// How many requests may wait for a free worker before new ones are
	/// rejected with `EngineError::Overloaded`.
	pub max_queue_depth: usize,
}

impl EngineConfig {
	/// Loads configuration from `FACEHE_*` environment variables, falling
	/// back to sane defaults for anything unset.
	pub fn load() -> Self {
		let context_dir = std::env::var(ENV_CONTEXT_DIR)
			.map(PathBuf::from)
			.unwrap_or_else(|_| PathBuf::from("./data/contexts"));

		let model_path = std::env::var(ENV_MODEL_PATH)
			.map(PathBuf::from)
			.unwrap_or_else(|_| PathBuf::from("./data/model.json"));

		let max_inference_workers = std::env::var(ENV_MAX_WORKERS)
			.ok()
			.and_then(|v| v.parse().ok())
			.unwrap_or_else(default_worker_count);

		let request_timeout_ms = std::env::var(ENV_TIMEOUT_MS)
			.ok()
			.and_then(|v| v.parse().ok())
			.unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS);

		let max_queue_depth = std::env::var(ENV_MAX_QUEUE_DEPTH)
			.ok()
			.and_then(|v| v.parse().ok())
			.unwrap_or(DEFAULT_MAX_QUEUE_DEPTH);

		Self {
			context_dir,
			model_path,
			max_inference_workers,
			request_timeout_ms,
			max_queue_depth,
		}
	}
}

fn default_worker_count() -> usize {
	std::thread::available_parallelism()
		.map(|n| n.get())
		.unwrap_or(1)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_sane_without_any_env() {
		// We don't touch std::env here since tests may run concurrently;
		// this only checks the fallback math, not env resolution.
		assert!(default_worker_count() >= 1);
		assert_eq!(DEFAULT_REQUEST_TIMEOUT_MS, 30_000);
	}
}
