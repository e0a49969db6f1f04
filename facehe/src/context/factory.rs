//! Builds the fixed CKKS parameter set every client and evaluation context in
//! this system shares.
//!
//! Values match `DEFAULT_POLY_MODULUS_DEGREE`, `DEFAULT_COEFF_MOD_BIT_SIZES`
//! and `DEFAULT_GLOBAL_SCALE` from the server-side reference context builder
//! this system was ported from. Client and server must agree on these or
//! ciphertexts produced by one are meaningless to the other.

use sealy::{
	CkksEncryptionParametersBuilder, CoefficientModulusFactory, Context, DegreeType,
	EncryptionParameters, KeyGenerator, SecurityLevel,
};

use crate::error::Result;

/// Ring dimension. Fixes the slot count (`N/2`) available for packing.
pub const POLY_MODULUS_DEGREE: DegreeType = DegreeType::D32768;

/// Coefficient modulus chain, in bits. Eight primes budget five
/// multiplicative levels (conv, square, fc1, square, fc2) with headroom
/// primes at each end for the initial encoding and final rescale.
pub const COEFF_MODULUS_BITS: [i32; 8] = [31, 26, 26, 26, 26, 26, 26, 31];

/// Global CKKS scale applied to every encoding.
pub const GLOBAL_SCALE: f64 = (1u64 << 26) as f64;

/// Builds the encryption parameters shared by every context in this system.
pub fn build_parameters() -> Result<EncryptionParameters> {
	let modulus_chain = CoefficientModulusFactory::build(POLY_MODULUS_DEGREE, &COEFF_MODULUS_BITS)?;

	let params = CkksEncryptionParametersBuilder::new()
		.set_poly_modulus_degree(POLY_MODULUS_DEGREE)
		.set_coefficient_modulus(modulus_chain)
		.build()?;

	Ok(params)
}

/// Builds a `sealy::Context` from the shared parameters, expanding the
/// modulus chain so every intermediate level is reachable via
/// `mod_switch_to_next`.
pub fn build_context() -> Result<Context> {
	let params = build_parameters()?;
	Ok(Context::new(&params, true, SecurityLevel::TC128)?)
}

/// Generates a fresh keypair (secret, public, Galois, relinearization) over a
/// newly built context. This is the client-side provisioning path: the
/// secret key never leaves this call's caller.
pub fn generate_keys(
	ctx: &Context,
) -> Result<(
	sealy::SecretKey,
	sealy::PublicKey,
	sealy::GaloisKey,
	sealy::RelinearizationKey,
)> {
	let keygen = KeyGenerator::new(ctx)?;

	let secret_key = keygen.secret_key();
	let public_key = keygen.create_public_key();
	let galois_keys = keygen.create_galois_keys()?;
	let relin_keys = keygen.create_relinearization_keys()?;

	Ok((secret_key, public_key, galois_keys, relin_keys))
}
