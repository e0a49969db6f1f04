//! The encrypted inference engine: the fixed CNN forward graph evaluated
//! entirely over CKKS ciphertexts, plus a bounded worker pool in front of it.

pub mod ops;
pub mod packed;
pub mod pool;
pub mod scalar;

pub use packed::PackedEngine;
pub use pool::InferencePool;
pub use scalar::ScalarEngine;

use crate::context::EvalContext;
use crate::error::Result;

/// A forward-pass implementation: takes a base64-encoded ciphertext and the
/// evaluation context registered for its `key_id`, returns a base64-encoded
/// ciphertext of the 7 emotion logits.
///
/// Implemented by [`PackedEngine`] (production, im2col-packed) and
/// [`ScalarEngine`] (reference, one ciphertext per scalar) so the pool and
/// API layer can be tested against either without caring which is wired up.
pub trait Engine: Send + Sync {
	/// Runs the forward pass, returning the base64-encoded encrypted logits.
	fn forward(
		&self,
		ciphertext_b64: &str,
		eval_ctx: &EvalContext,
	) -> Result<String>;
}
