//! Bounded concurrency in front of the forward pass: a fixed number of
//! permits, a bounded wait queue, and a per-request deadline, so a burst of
//! requests degrades into fast `Overloaded`/`TimedOut` errors instead of
//! unbounded memory growth or a pool of stuck ciphertexts.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use super::Engine;
use crate::config::EngineConfig;
use crate::context::EvalContext;
use crate::error::{EngineError, Result};

/// Runs forward passes through a fixed-size `tokio::sync::Semaphore`: at most
/// `max_inference_workers` run at once, at most `max_queue_depth` more wait
/// for a permit, and anything beyond that is rejected immediately rather than
/// queued.
pub struct InferencePool {
	engine: Arc<dyn Engine>,
	semaphore: Arc<Semaphore>,
	waiting: Arc<AtomicUsize>,
	max_queue_depth: usize,
	request_timeout: Duration,
}

impl InferencePool {
	/// Builds a pool in front of `engine`, sized from `config`.
	pub fn new(
		engine: Arc<dyn Engine>,
		config: &EngineConfig,
	) -> Self {
		Self {
			engine,
			semaphore: Arc::new(Semaphore::new(config.max_inference_workers)),
			waiting: Arc::new(AtomicUsize::new(0)),
			max_queue_depth: config.max_queue_depth,
			request_timeout: Duration::from_millis(config.request_timeout_ms),
		}
	}

	/// Runs one forward pass, subject to the pool's concurrency bound and
	/// deadline.
	///
	/// Returns `Overloaded` immediately if the wait queue is already at
	/// `max_queue_depth`, without ever acquiring a permit. Once a slot in the
	/// queue is claimed, waits for a permit (or the deadline, whichever comes
	/// first) and then runs the forward pass under `tokio::time::timeout`.
	pub async fn run(
		&self,
		ciphertext_b64: &str,
		eval_ctx: Arc<EvalContext>,
	) -> Result<String> {
		if self.waiting.fetch_add(1, Ordering::SeqCst) >= self.max_queue_depth {
			self.waiting.fetch_sub(1, Ordering::SeqCst);
			tracing::warn!("inference pool queue is full, rejecting request");
			return Err(EngineError::Overloaded);
		}

		let permit_fut = self.semaphore.clone().acquire_owned();
		let permit = tokio::time::timeout(self.request_timeout, permit_fut).await;
		self.waiting.fetch_sub(1, Ordering::SeqCst);

		let permit = match permit {
			Ok(Ok(permit)) => permit,
			Ok(Err(_)) => return Err(EngineError::Overloaded),
			Err(_) => {
				tracing::warn!("timed out waiting for a free inference worker");
				return Err(EngineError::TimedOut);
			}
		};

		let engine = self.engine.clone();
		let ciphertext_b64 = ciphertext_b64.to_string();

		let result = tokio::time::timeout(
			self.request_timeout,
			tokio::task::spawn_blocking(move || {
				let _permit = permit;
				engine.forward(&ciphertext_b64, &eval_ctx)
			}),
		)
		.await;

		match result {
			Ok(Ok(forward_result)) => forward_result,
			Ok(Err(join_error)) => Err(EngineError::WorkerPanicked(join_error.to_string())),
			Err(_elapsed) => {
				tracing::warn!("inference request timed out mid-flight");
				Err(EngineError::TimedOut)
			}
		}
	}
}
