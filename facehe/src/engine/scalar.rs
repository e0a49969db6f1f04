//! Reference forward pass: one ciphertext per pixel, rather than packed
//! into a single im2col ciphertext. Mirrors the scalar runner the original
//! prototype kept alongside its packed, production path; used here the same
//! way — as a slow but easy-to-audit implementation to check the packed
//! engine's results against, not for serving real traffic.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sealy::{Ciphertext, FromBytes, ToBytes};
use std::sync::Arc;

use super::{ops, Engine};
use crate::context::factory::GLOBAL_SCALE;
use crate::context::EvalContext;
use crate::error::{EngineError, Result};
use crate::weights::{
	ModelWeights, CONV_CHANNELS, CONV_KERNEL, CONV_STRIDE, FEATURE_SIDE, FLATTENED_FEATURES,
	HIDDEN_UNITS, IMAGE_SIDE, NUM_CLASSES,
};

/// Evaluates the fixed CNN one scalar ciphertext at a time. The wire format
/// is a JSON array of `IMAGE_SIDE * IMAGE_SIDE` base64-encoded scalar
/// ciphertexts, row-major, rather than the packed engine's single blob.
pub struct ScalarEngine {
	weights: Arc<ModelWeights>,
}

impl ScalarEngine {
	/// Wraps a loaded, validated model.
	pub fn new(weights: Arc<ModelWeights>) -> Self {
		Self { weights }
	}

	fn decode_pixels(
		&self,
		ciphertext_b64: &str,
		eval_ctx: &EvalContext,
	) -> Result<Vec<Ciphertext>> {
		let encoded: Vec<String> = serde_json::from_str(ciphertext_b64)
			.map_err(|e| EngineError::BadCiphertext(format!("expected a json array of pixel ciphertexts: {e}")))?;

		if encoded.len() != IMAGE_SIDE * IMAGE_SIDE {
			return Err(EngineError::ShapeMismatch {
				step: "decode",
				detail: format!("expected {} pixel ciphertexts, got {}", IMAGE_SIDE * IMAGE_SIDE, encoded.len()),
			});
		}

		encoded
			.iter()
			.map(|s| {
				let bytes = STANDARD
					.decode(s)
					.map_err(|e| EngineError::BadCiphertext(format!("invalid base64 pixel: {e}")))?;
				Ciphertext::from_bytes(&eval_ctx.context, &bytes)
					.map_err(|e| EngineError::BadCiphertext(format!("cannot deserialize pixel: {e}")))
			})
			.collect()
	}

	/// Dot product of a window of scalar ciphertexts against a plaintext
	/// kernel, plus bias, accumulated one multiply-add at a time.
	///
	/// `scale_in`/`level` are the entering pixels' scale and modulus-chain
	/// depth; the bias plaintext must be encoded at `scale_in * GLOBAL_SCALE`
	/// (the scale the per-tap products land on) and at `level`, or
	/// `add_plain` rejects it as a scale/parms_id mismatch.
	#[allow(clippy::too_many_arguments)]
	fn conv_window(
		&self,
		ctx: &sealy::Context,
		evaluator: &sealy::CKKSEvaluator,
		encoder: &sealy::CKKSEncoder,
		pixels: &[Ciphertext],
		kernel: &[f64],
		bias: f64,
		wy: usize,
		wx: usize,
		scale_in: f64,
		level: usize,
	) -> sealy::Result<Ciphertext> {
		let mut terms = Vec::with_capacity(kernel.len());
		for (ky, krow) in kernel.chunks(CONV_KERNEL).enumerate() {
			for (kx, &w) in krow.iter().enumerate() {
				let py = wy * CONV_STRIDE + ky;
				let px = wx * CONV_STRIDE + kx;
				let pixel = &pixels[py * IMAGE_SIDE + px];
				let w_plain = ops::encode_at_level(encoder, evaluator, &[w], level)?;
				terms.push(evaluator.multiply_plain(pixel, &w_plain)?);
			}
		}
		let mut acc = evaluator.add_many(&terms)?;
		let bias_plain = ops::encode_at_scale(ctx, evaluator, &[bias], scale_in * GLOBAL_SCALE, level)?;
		acc = evaluator.add_plain(&acc, &bias_plain)?;
		Ok(acc)
	}

	#[allow(clippy::too_many_arguments)]
	fn fully_connected(
		&self,
		ctx: &sealy::Context,
		evaluator: &sealy::CKKSEvaluator,
		encoder: &sealy::CKKSEncoder,
		input: &[Ciphertext],
		weight_cols: &[Vec<f64>],
		bias: &[f64],
		scale_in: f64,
		level: usize,
	) -> sealy::Result<Vec<Ciphertext>> {
		let mut out = Vec::with_capacity(weight_cols.len());
		for (column, &b) in weight_cols.iter().zip(bias.iter()) {
			let mut terms = Vec::with_capacity(input.len());
			for (x, &w) in input.iter().zip(column.iter()) {
				let w_plain = ops::encode_at_level(encoder, evaluator, &[w], level)?;
				terms.push(evaluator.multiply_plain(x, &w_plain)?);
			}
			let mut acc = evaluator.add_many(&terms)?;
			let bias_plain = ops::encode_at_scale(ctx, evaluator, &[b], scale_in * GLOBAL_SCALE, level)?;
			acc = evaluator.add_plain(&acc, &bias_plain)?;
			out.push(acc);
		}
		Ok(out)
	}
}

impl Engine for ScalarEngine {
	fn forward(
		&self,
		ciphertext_b64: &str,
		eval_ctx: &EvalContext,
	) -> Result<String> {
		let span = tracing::info_span!("inference", engine = "scalar");
		let _enter = span.enter();
		tracing::info!("starting encrypted inference");

		let pixels = self.decode_pixels(ciphertext_b64, eval_ctx)?;
		let ctx = &eval_ctx.context;
		let evaluator = &eval_ctx.evaluator;
		let encoder = &eval_ctx.encoder;
		let relin = &eval_ctx.relin_keys;

		// Same level/scale bookkeeping as `PackedEngine`: `level` is the
		// modulus-chain depth, `scale` the ciphertext's actual CKKS scale —
		// squaring doubles the latter's exponent without consuming an extra
		// step of the former.
		let level = 0;
		let scale = GLOBAL_SCALE;

		tracing::debug!(step = "conv1");
		let mut features = Vec::with_capacity(CONV_CHANNELS * FEATURE_SIDE * FEATURE_SIDE);
		for c in 0..CONV_CHANNELS {
			for wy in 0..FEATURE_SIDE {
				for wx in 0..FEATURE_SIDE {
					let value = self
						.conv_window(
							ctx,
							evaluator,
							encoder,
							&pixels,
							&self.weights.conv1_weight[c],
							self.weights.conv1_bias[c],
							wy,
							wx,
							scale,
							level,
						)
						.map_err(|source| EngineError::HEEvalFailure { step: "conv1", source })?;
					features.push(value);
				}
			}
		}
		debug_assert_eq!(features.len(), FLATTENED_FEATURES);
		let scale = scale * GLOBAL_SCALE;

		tracing::debug!(step = "square1");
		let squared1: Vec<Ciphertext> = features
			.iter()
			.map(|c| ops::square_activation(evaluator, relin, c))
			.collect::<sealy::Result<_>>()
			.map_err(|source| EngineError::HEEvalFailure { step: "square1", source })?;
		let level = level + 1;
		let scale = scale * scale;

		tracing::debug!(step = "fc1");
		let fc1_out = self
			.fully_connected(
				ctx,
				evaluator,
				encoder,
				&squared1,
				&self.weights.fc1_weight_t,
				&self.weights.fc1_bias,
				scale,
				level,
			)
			.map_err(|source| EngineError::HEEvalFailure { step: "fc1", source })?;
		debug_assert_eq!(fc1_out.len(), HIDDEN_UNITS);
		let scale = scale * GLOBAL_SCALE;

		tracing::debug!(step = "square2");
		let squared2: Vec<Ciphertext> = fc1_out
			.iter()
			.map(|c| ops::square_activation(evaluator, relin, c))
			.collect::<sealy::Result<_>>()
			.map_err(|source| EngineError::HEEvalFailure { step: "square2", source })?;
		let level = level + 1;
		let scale = scale * scale;

		tracing::debug!(step = "fc2");
		let fc2_out = self
			.fully_connected(
				ctx,
				evaluator,
				encoder,
				&squared2,
				&self.weights.fc2_weight_t,
				&self.weights.fc2_bias,
				scale,
				level,
			)
			.map_err(|source| EngineError::HEEvalFailure { step: "fc2", source })?;
		debug_assert_eq!(fc2_out.len(), NUM_CLASSES);

		let encoded: Result<Vec<String>> = fc2_out
			.iter()
			.map(|c| {
				c.as_bytes()
					.map(|b| STANDARD.encode(b))
					.map_err(EngineError::Seal)
			})
			.collect();

		tracing::info!("encrypted inference complete");
		Ok(serde_json::to_string(&encoded?).map_err(|e| std::io::Error::other(e))?)
	}
}
