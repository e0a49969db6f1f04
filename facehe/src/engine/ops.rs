//! Homomorphic building blocks the forward pass is assembled from.
//!
//! `sealy` binds SEAL's C++ API one-to-one; it has no notion of a packed
//! convolution or a matrix multiply the way the reference TenSEAL prototype
//! did. These are built here from `rotate_rows`, `multiply_plain`, `add` and
//! `square_inplace`/`relinearize_inplace`, the same way `sealy::ext::batched`
//! composes its operations from the `Evaluator` trait.

use sealy::{
	CKKSEncoder, CKKSEvaluator, Ciphertext, Context, Evaluator, GaloisKey, Plaintext,
	RelinearizationKey, Result,
};

use crate::context::factory::GLOBAL_SCALE;

/// Encodes `data` and mod-switches the plaintext down `level` times so it can
/// be combined with a ciphertext that has already undergone `level` rescales.
///
/// `CKKSEncoder` always encodes at the context's first (top) `parms_id`; the
/// forward pass's depth is fixed and known ahead of time, so the caller
/// tracks the current level explicitly rather than introspecting the
/// ciphertext.
pub fn encode_at_level(
	encoder: &CKKSEncoder,
	evaluator: &CKKSEvaluator,
	data: &[f64],
	level: usize,
) -> Result<Plaintext> {
	let mut plaintext = encoder.encode_f64(data)?;
	for _ in 0..level {
		plaintext = evaluator.mod_switch_to_next_plaintext(&plaintext)?;
	}
	Ok(plaintext)
}

/// Encodes `data` at an explicit `scale` rather than the shared encoder's
/// base scale, mod-switched down `level` times.
///
/// `sealy`'s `CKKSEvaluator` exposes no genuine rescale (its bindgen surface
/// has `mod_switch_to_next`, which drops a modulus but leaves the scale
/// untouched — there is no `rescale_to_next`). `multiply_plain` multiplies
/// the ciphertext's scale by the plaintext's encoding scale, so a ciphertext
/// that has already been multiplied against a base-scale plaintext no longer
/// carries the base scale; anything added to it afterwards (`add`/`add_plain`
/// require their operands' scales to match) must be encoded at whatever scale
/// the ciphertext actually landed on, not the encoder's fixed default. This
/// builds a one-off `CKKSEncoder` at that exact scale instead.
pub(crate) fn encode_at_scale(
	ctx: &Context,
	evaluator: &CKKSEvaluator,
	data: &[f64],
	scale: f64,
	level: usize,
) -> Result<Plaintext> {
	let encoder = CKKSEncoder::new(ctx, scale)?;
	let mut plaintext = encoder.encode_f64(data)?;
	for _ in 0..level {
		plaintext = evaluator.mod_switch_to_next_plaintext(&plaintext)?;
	}
	Ok(plaintext)
}

/// Builds a plaintext mask of length `len` that is `1.0` at `true` positions
/// and `0.0` elsewhere, encoded at scale `1.0` so that multiplying by it
/// leaves the ciphertext's scale unchanged — masks only ever zero out slots,
/// they never carry a value that needs the encoder's base-scale precision.
fn mask_at_level(
	ctx: &Context,
	evaluator: &CKKSEvaluator,
	len: usize,
	level: usize,
	keep: impl Fn(usize) -> bool,
) -> Result<Plaintext> {
	let values: Vec<f64> = (0..len).map(|i| if keep(i) { 1.0 } else { 0.0 }).collect();
	encode_at_scale(ctx, evaluator, &values, 1.0, level)
}

/// Sums every contiguous block of `block_size` slots, leaving the block's
/// total in the block's first slot (slots `j * block_size` for each block
/// `j`); other slots in the block hold partial, meaningless sums.
///
/// Works for any `block_size`, not just powers of two: at each doubling step
/// a mask zeroes out contributions that would otherwise bleed in from the
/// next block over.
pub fn sum_within_blocks(
	ctx: &Context,
	evaluator: &CKKSEvaluator,
	galois_keys: &GaloisKey,
	ciphertext: &Ciphertext,
	total_len: usize,
	block_size: usize,
	level: usize,
) -> Result<Ciphertext> {
	let mut acc = ciphertext.clone();
	let mut step = 1usize;
	while step < block_size {
		let shifted = evaluator.rotate_rows(&acc, step as i32, galois_keys)?;
		let mask = mask_at_level(ctx, evaluator, total_len, level, |i| {
			(i % block_size) < block_size - step
		})?;
		// `mask` is scale-1.0, so `masked` lands on exactly `shifted`'s scale
		// (which is `acc`'s, rotation doesn't touch scale) — `add` below sees
		// two equal-scale operands.
		let masked = evaluator.multiply_plain(&shifted, &mask)?;
		acc = evaluator.add(&acc, &masked)?;
		step *= 2;
	}
	Ok(acc)
}

/// Moves the value at `src_index` into `dest_index` within a ciphertext of
/// `total_len` slots, zeroing every other slot. Used to gather scattered
/// per-block totals into a dense, contiguous vector.
pub fn move_slot(
	ctx: &Context,
	evaluator: &CKKSEvaluator,
	galois_keys: &GaloisKey,
	ciphertext: &Ciphertext,
	total_len: usize,
	src_index: usize,
	dest_index: usize,
	level: usize,
) -> Result<Ciphertext> {
	let steps = src_index as i32 - dest_index as i32;
	let rotated = if steps == 0 {
		ciphertext.clone()
	} else {
		evaluator.rotate_rows(ciphertext, steps, galois_keys)?
	};
	// Scale-1.0 mask: the result keeps `ciphertext`'s scale exactly, so
	// `add_many`-ing several `move_slot` outputs together (same source scale)
	// never hits a scale mismatch.
	let mask = mask_at_level(ctx, evaluator, total_len, level, |i| i == dest_index)?;
	Ok(evaluator.multiply_plain(&rotated, &mask)?)
}

/// Performs one channel of a 9x9 stride-6 convolution over an im2col-packed
/// ciphertext: `windows_nb` windows of `window_size` values each, laid out
/// back to back. Returns a ciphertext of the same shape where slot
/// `j * window_size` holds `dot(window_j, kernel) + bias` for window `j`.
///
/// `level` is the ciphertext's level on entry; the result is one level
/// deeper (the multiply_plain consumes one prime from the modulus chain).
/// `scale_in` is the ciphertext's scale on entry — `multiply_plain` against
/// the base-scale `kernel_plain` leaves the product at `scale_in *
/// GLOBAL_SCALE`, which is what the bias plaintext must match to `add_plain`
/// successfully.
#[allow(clippy::too_many_arguments)]
pub fn conv2d_im2col_channel(
	ctx: &Context,
	encoder: &CKKSEncoder,
	evaluator: &CKKSEvaluator,
	galois_keys: &GaloisKey,
	enc_windows: &Ciphertext,
	kernel: &[f64],
	bias: f64,
	windows_nb: usize,
	window_size: usize,
	scale_in: f64,
	level: usize,
) -> Result<Ciphertext> {
	let total_len = windows_nb * window_size;

	let mut tiled_kernel = Vec::with_capacity(total_len);
	for _ in 0..windows_nb {
		tiled_kernel.extend_from_slice(kernel);
	}
	let kernel_plain = encode_at_level(encoder, evaluator, &tiled_kernel, level)?;

	let products = evaluator.multiply_plain(enc_windows, &kernel_plain)?;
	let products = evaluator.mod_switch_to_next(&products)?;
	let scale_out = scale_in * GLOBAL_SCALE;
	let summed = sum_within_blocks(
		ctx,
		evaluator,
		galois_keys,
		&products,
		total_len,
		window_size,
		level + 1,
	)?;

	let mut bias_vec = vec![0.0; total_len];
	for j in 0..windows_nb {
		bias_vec[j * window_size] = bias;
	}
	let bias_plain = encode_at_scale(ctx, evaluator, &bias_vec, scale_out, level + 1)?;
	Ok(evaluator.add_plain(&summed, &bias_plain)?)
}

/// Gathers the per-window totals produced by [`conv2d_im2col_channel`]
/// (strided every `window_size` slots) for every channel into one dense
/// ciphertext of `channels * windows_nb` slots: channel `c`'s window `j`
/// lands at slot `c * windows_nb + j`.
pub fn pack_channels(
	ctx: &Context,
	evaluator: &CKKSEvaluator,
	galois_keys: &GaloisKey,
	channels: &[Ciphertext],
	windows_nb: usize,
	window_size: usize,
	level: usize,
) -> Result<Ciphertext> {
	let dest_len = channels.len() * windows_nb;
	let src_len = windows_nb * window_size;

	let mut parts = Vec::with_capacity(channels.len() * windows_nb);
	for (c, channel) in channels.iter().enumerate() {
		for j in 0..windows_nb {
			let dest_index = c * windows_nb + j;
			let moved = move_slot(
				ctx,
				evaluator,
				galois_keys,
				channel,
				src_len.max(dest_len),
				j * window_size,
				dest_index,
				level,
			)?;
			parts.push(moved);
		}
	}
	Ok(evaluator.add_many(&parts)?)
}

/// Squares a ciphertext, relinearizes it back down to two polynomials, and
/// mod-switches down one level — the HE-friendly stand-in for a ReLU
/// activation in this forward graph. Squaring leaves the ciphertext's scale
/// at its square (`scale²`, not `scale`); callers track this explicitly
/// rather than relying on the library to rescale it back down, since no
/// such primitive is exposed here.
pub fn square_activation(
	evaluator: &CKKSEvaluator,
	relin_keys: &RelinearizationKey,
	ciphertext: &Ciphertext,
) -> Result<Ciphertext> {
	let mut squared = evaluator.square(ciphertext)?;
	evaluator.relinearize_inplace(&mut squared, relin_keys)?;
	Ok(evaluator.mod_switch_to_next(&squared)?)
}

/// Computes `enc_x . weight_col + bias` for every output unit and assembles
/// the results into one dense ciphertext of `output_dim` slots: a fully
/// connected layer evaluated homomorphically, one dot product per output
/// unit. `level` is the ciphertext's level on entry; the result is one
/// level deeper. `scale_in` is the ciphertext's scale on entry — each
/// column's product lands at `scale_in * GLOBAL_SCALE`, which both the
/// cross-column `add_many` and the final bias `add_plain` depend on matching.
#[allow(clippy::too_many_arguments)]
pub fn matmul(
	ctx: &Context,
	encoder: &CKKSEncoder,
	evaluator: &CKKSEvaluator,
	galois_keys: &GaloisKey,
	enc_x: &Ciphertext,
	weight_cols: &[Vec<f64>],
	bias: &[f64],
	input_dim: usize,
	scale_in: f64,
	level: usize,
) -> Result<Ciphertext> {
	let output_dim = weight_cols.len();
	let mut parts = Vec::with_capacity(output_dim);
	let scale_out = scale_in * GLOBAL_SCALE;

	for (k, column) in weight_cols.iter().enumerate() {
		let mut padded = column.clone();
		padded.resize(input_dim, 0.0);
		let w_plain = encode_at_level(encoder, evaluator, &padded, level)?;
		let product = evaluator.multiply_plain(enc_x, &w_plain)?;
		let product = evaluator.mod_switch_to_next(&product)?;
		let summed = sum_within_blocks(
			ctx,
			evaluator,
			galois_keys,
			&product,
			input_dim,
			input_dim,
			level + 1,
		)?;
		let moved = move_slot(
			ctx,
			evaluator,
			galois_keys,
			&summed,
			output_dim.max(input_dim),
			0,
			k,
			level + 1,
		)?;
		parts.push(moved);
	}

	// Every column went through the same multiply-by-base-scale-weight step,
	// so all `parts` share `scale_out` and `add_many` sees matching operands.
	let mut acc = evaluator.add_many(&parts)?;

	let mut bias_vec = bias.to_vec();
	bias_vec.resize(output_dim, 0.0);
	let bias_plain = encode_at_scale(ctx, evaluator, &bias_vec, scale_out, level + 1)?;
	acc = evaluator.add_plain(&acc, &bias_plain)?;

	Ok(acc)
}
