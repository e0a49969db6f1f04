//! Error taxonomy for the encrypted inference engine.

use thiserror::Error;

/// Errors produced while registering evaluation contexts or running encrypted
/// forward passes.
///
/// Display messages deliberately never include ciphertext bytes, base64 blobs,
/// or key material: only `key_id` values and step names are safe to surface to
/// a caller or a log line.
#[derive(Debug, Error)]
pub enum EngineError {
	/// No evaluation context is registered under this `key_id`, and none was
	/// found on disk either.
	#[error("no evaluation context registered for key_id {0}")]
	UnknownKey(String),

	/// A `key_id` contains characters that are not safe to use as a filename
	/// component.
	#[error("key_id {0} is not a valid identifier")]
	BadKeyId(String),

	/// The supplied ciphertext payload could not be decoded or deserialized
	/// under the registered context.
	#[error("malformed ciphertext for key_id {0}")]
	BadCiphertext(String),

	/// A ciphertext's packed layout does not match what the forward graph
	/// expects at this step (wrong slot count, wrong channel count, ...).
	#[error("shape mismatch at step '{step}': {detail}")]
	ShapeMismatch {
		/// The forward-pass step where the mismatch was detected.
		step: &'static str,
		/// Human-readable detail about the mismatch.
		detail: String,
	},

	/// A homomorphic operation failed inside the evaluator (e.g. depth budget
	/// exhausted, relinearization failure).
	#[error("homomorphic evaluation failed at step '{step}': {source}")]
	HEEvalFailure {
		/// The forward-pass step where the operation failed.
		step: &'static str,
		/// The underlying SEAL error.
		#[source]
		source: sealy::Error,
	},

	/// The inference pool is at capacity and cannot accept more work.
	#[error("inference pool is at capacity")]
	Overloaded,

	/// A request timed out before a result was produced.
	#[error("inference request timed out")]
	TimedOut,

	/// The forward-pass worker task panicked or was cancelled before
	/// producing a result.
	#[error("inference worker task did not complete: {0}")]
	WorkerPanicked(String),

	/// The model weights have not been loaded, or failed validation at
	/// startup.
	#[error("model weights are unavailable: {0}")]
	ModelUnavailable(String),

	/// Filesystem error while reading or writing a context or weights file.
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),

	/// A SEAL operation failed outside the forward pass (context
	/// construction, key generation, (de)serialization).
	#[error("seal error: {0}")]
	Seal(#[from] sealy::Error),
}

/// Convenience alias used throughout the engine.
pub type Result<T> = std::result::Result<T, EngineError>;
