//! Production forward pass: one im2col-packed ciphertext in, one
//! ciphertext of 7 encrypted logits out.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sealy::{Ciphertext, FromBytes, ToBytes};
use std::sync::Arc;

use super::{ops, Engine};
use crate::context::factory::GLOBAL_SCALE;
use crate::context::EvalContext;
use crate::error::{EngineError, Result};
use crate::weights::{
	ModelWeights, CONV_CHANNELS, CONV_KERNEL, FEATURE_SIDE, FLATTENED_FEATURES, HIDDEN_UNITS,
};

const WINDOWS_NB: usize = FEATURE_SIDE * FEATURE_SIDE;
const WINDOW_SIZE: usize = CONV_KERNEL * CONV_KERNEL;

/// Evaluates the fixed CNN (conv -> pack -> square -> fc1 -> square -> fc2)
/// entirely over CKKS ciphertext, using the im2col packing scheme.
pub struct PackedEngine {
	weights: Arc<ModelWeights>,
}

impl PackedEngine {
	/// Wraps a loaded, validated model.
	pub fn new(weights: Arc<ModelWeights>) -> Self {
		Self { weights }
	}

	fn decode_input(
		&self,
		ciphertext_b64: &str,
		eval_ctx: &EvalContext,
	) -> Result<Ciphertext> {
		let bytes = STANDARD
			.decode(ciphertext_b64)
			.map_err(|e| EngineError::BadCiphertext(format!("invalid base64: {e}")))?;

		Ciphertext::from_bytes(&eval_ctx.context, &bytes)
			.map_err(|e| EngineError::BadCiphertext(format!("cannot deserialize under registered context: {e}")))
	}

	fn run_forward(
		&self,
		enc_windows: &Ciphertext,
		eval_ctx: &EvalContext,
	) -> Result<Ciphertext> {
		let ctx = &eval_ctx.context;
		let encoder = &eval_ctx.encoder;
		let evaluator = &eval_ctx.evaluator;
		let galois = &eval_ctx.galois_keys;
		let relin = &eval_ctx.relin_keys;

		// `level` tracks the ciphertext's position in the modulus chain;
		// `scale` tracks its actual CKKS scale. The two diverge once a square
		// doubles the scale's exponent without consuming an extra level the
		// same way a `multiply_plain` does — both are threaded explicitly
		// since neither is introspectable from a `sealy::Ciphertext`.
		tracing::debug!(step = "conv1", "evaluating convolution");
		let mut channels = Vec::with_capacity(CONV_CHANNELS);
		for c in 0..CONV_CHANNELS {
			let out = ops::conv2d_im2col_channel(
				ctx,
				encoder,
				evaluator,
				galois,
				enc_windows,
				&self.weights.conv1_weight[c],
				self.weights.conv1_bias[c],
				WINDOWS_NB,
				WINDOW_SIZE,
				GLOBAL_SCALE,
				0,
			)
			.map_err(|source| EngineError::HEEvalFailure { step: "conv1", source })?;
			channels.push(out);
		}
		let level = 1;
		let scale = GLOBAL_SCALE * GLOBAL_SCALE;

		tracing::debug!(step = "pack", "packing channels into a dense feature vector");
		let packed = ops::pack_channels(ctx, evaluator, galois, &channels, WINDOWS_NB, WINDOW_SIZE, level)
			.map_err(|source| EngineError::HEEvalFailure { step: "pack", source })?;

		tracing::debug!(step = "square1", "squaring activation");
		let squared1 = ops::square_activation(evaluator, relin, &packed)
			.map_err(|source| EngineError::HEEvalFailure { step: "square1", source })?;
		let level = level + 1;
		let scale = scale * scale;

		tracing::debug!(step = "fc1", "evaluating first fully connected layer");
		let fc1_out = ops::matmul(
			ctx,
			encoder,
			evaluator,
			galois,
			&squared1,
			&self.weights.fc1_weight_t,
			&self.weights.fc1_bias,
			FLATTENED_FEATURES,
			scale,
			level,
		)
		.map_err(|source| EngineError::HEEvalFailure { step: "fc1", source })?;
		let level = level + 1;
		let scale = scale * GLOBAL_SCALE;

		tracing::debug!(step = "square2", "squaring activation");
		let squared2 = ops::square_activation(evaluator, relin, &fc1_out)
			.map_err(|source| EngineError::HEEvalFailure { step: "square2", source })?;
		let level = level + 1;
		let scale = scale * scale;

		tracing::debug!(step = "fc2", "evaluating second fully connected layer");
		let fc2_out = ops::matmul(
			ctx,
			encoder,
			evaluator,
			galois,
			&squared2,
			&self.weights.fc2_weight_t,
			&self.weights.fc2_bias,
			HIDDEN_UNITS,
			scale,
			level,
		)
		.map_err(|source| EngineError::HEEvalFailure { step: "fc2", source })?;

		Ok(fc2_out)
	}
}

impl Engine for PackedEngine {
	fn forward(
		&self,
		ciphertext_b64: &str,
		eval_ctx: &EvalContext,
	) -> Result<String> {
		let span = tracing::info_span!("inference", engine = "packed");
		let _enter = span.enter();
		tracing::info!("starting encrypted inference");

		let enc_windows = self.decode_input(ciphertext_b64, eval_ctx)?;
		let logits = self.run_forward(&enc_windows, eval_ctx)?;

		let bytes = logits.as_bytes().map_err(EngineError::Seal)?;
		tracing::info!("encrypted inference complete");
		Ok(STANDARD.encode(bytes))
	}
}
