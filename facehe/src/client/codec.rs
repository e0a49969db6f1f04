//! Client-side im2col encoding/encryption and logit decryption/decoding.
//!
//! `sealy` has no `im2col_encoding` convenience the way TenSEAL does, so the
//! client builds the packed window layout itself before handing the flat
//! vector to `CKKSEncoder`/`Encryptor` — mirroring what
//! `ts.im2col_encoding(context, image, kh, kw, stride)` did in the original
//! prototype, laid out exactly the way `engine::ops::conv2d_im2col_channel`
//! expects to consume it on the server side.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sealy::{AsymmetricEncryptor, Ciphertext, Decryptor, FromBytes, ToBytes};

use crate::context::ClientContext;
use crate::error::{EngineError, Result};
use crate::weights::{CONV_KERNEL, CONV_STRIDE, FEATURE_SIDE, IMAGE_SIDE, NUM_CLASSES};

/// im2col-encodes a preprocessed 48x48 image into a flat window layout,
/// encrypts it under `ctx`'s public key, and returns the base64-encoded
/// ciphertext ready to send to the inference engine.
///
/// `image` must be `IMAGE_SIDE` rows of `IMAGE_SIDE` values each, row-major,
/// already normalized the way the model was trained on.
pub fn encode_and_encrypt(
	ctx: &ClientContext,
	image: &[Vec<f64>],
) -> Result<String> {
	if image.len() != IMAGE_SIDE || image.iter().any(|row| row.len() != IMAGE_SIDE) {
		return Err(EngineError::ShapeMismatch {
			step: "encode",
			detail: format!("expected a {IMAGE_SIDE}x{IMAGE_SIDE} image"),
		});
	}

	let windows = im2col_encode(image);
	tracing::debug!(windows_nb = FEATURE_SIDE * FEATURE_SIDE, "im2col-encoded image");

	let plaintext = ctx.encoder.encode_f64(&windows)?;
	let encryptor = AsymmetricEncryptor::new(&ctx.context, &ctx.public_key)?;
	let ciphertext = encryptor.encrypt(&plaintext)?;

	let bytes = ciphertext.as_bytes()?;
	Ok(STANDARD.encode(bytes))
}

/// Flattens a `48x48` image into `FEATURE_SIDE * FEATURE_SIDE` windows of
/// `CONV_KERNEL * CONV_KERNEL` values each, back to back — slot
/// `j * window_size + k` holds window `j`'s `k`-th pixel, matching the layout
/// `engine::ops::conv2d_im2col_channel` assumes on the server.
fn im2col_encode(image: &[Vec<f64>]) -> Vec<f64> {
	let window_size = CONV_KERNEL * CONV_KERNEL;
	let mut windows = Vec::with_capacity(FEATURE_SIDE * FEATURE_SIDE * window_size);

	for wy in 0..FEATURE_SIDE {
		for wx in 0..FEATURE_SIDE {
			for ky in 0..CONV_KERNEL {
				for kx in 0..CONV_KERNEL {
					let py = wy * CONV_STRIDE + ky;
					let px = wx * CONV_STRIDE + kx;
					windows.push(image[py][px]);
				}
			}
		}
	}
	windows
}

/// Decrypts a base64-encoded ciphertext of encrypted logits under `ctx`'s
/// secret key and returns the first `NUM_CLASSES` slots — the emotion
/// scores, in [`crate::model::EMOTION_LABELS`] order.
pub fn decode_logits(
	ctx: &ClientContext,
	ciphertext_b64: &str,
) -> Result<Vec<f64>> {
	let bytes = STANDARD
		.decode(ciphertext_b64)
		.map_err(|e| EngineError::BadCiphertext(format!("invalid base64: {e}")))?;
	let ciphertext = Ciphertext::from_bytes(&ctx.context, &bytes)
		.map_err(|e| EngineError::BadCiphertext(format!("cannot deserialize under client context: {e}")))?;

	let decryptor = Decryptor::new(&ctx.context, &ctx.secret_key)?;
	let plaintext = decryptor.decrypt(&ciphertext)?;
	let values = ctx.encoder.decode_f64(&plaintext)?;

	if values.len() < NUM_CLASSES {
		return Err(EngineError::ShapeMismatch {
			step: "decode",
			detail: format!("decoded plaintext has only {} slots, expected at least {NUM_CLASSES}", values.len()),
		});
	}
	Ok(values[..NUM_CLASSES].to_vec())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_wrong_shaped_images() {
		let ctx = ClientContext::generate().unwrap();
		let image = vec![vec![0.0; IMAGE_SIDE]; IMAGE_SIDE - 1];
		let result = encode_and_encrypt(&ctx, &image);
		assert!(matches!(result, Err(EngineError::ShapeMismatch { .. })));
	}

	#[test]
	fn im2col_layout_matches_expected_window_count() {
		let image: Vec<Vec<f64>> = (0..IMAGE_SIDE)
			.map(|y| (0..IMAGE_SIDE).map(|x| (y * IMAGE_SIDE + x) as f64).collect())
			.collect();
		let windows = im2col_encode(&image);
		assert_eq!(windows.len(), FEATURE_SIDE * FEATURE_SIDE * CONV_KERNEL * CONV_KERNEL);
		// first window's first pixel is the image's top-left pixel
		assert_eq!(windows[0], image[0][0]);
	}
}
