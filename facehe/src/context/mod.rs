//! CKKS context construction, the client/evaluation split, and their
//! (de)serialization.

pub mod factory;
pub mod serialize;

use sealy::{CKKSEncoder, CKKSEvaluator, Context, GaloisKey, PublicKey, RelinearizationKey, SecretKey};

use crate::error::Result;

/// Everything a client needs to encrypt images and decrypt predictions: the
/// full keypair plus the evaluation keys it hands to the server.
pub struct ClientContext {
	/// The underlying SEAL context.
	pub context: Context,
	/// The secret key. Never serialized into an evaluation-context blob.
	pub secret_key: SecretKey,
	/// The public key, used to encrypt plaintext images.
	pub public_key: PublicKey,
	/// Galois (rotation) keys, required by the conv/pack/matmul ops.
	pub galois_keys: GaloisKey,
	/// Relinearization keys, required after every ciphertext-ciphertext
	/// multiplication (including squaring).
	pub relin_keys: RelinearizationKey,
	/// CKKS encoder bound to this context's scale.
	pub encoder: CKKSEncoder,
}

impl ClientContext {
	/// Provisions a brand-new client context: fresh context, fresh keypair.
	pub fn generate() -> Result<Self> {
		let context = factory::build_context()?;
		let (secret_key, public_key, galois_keys, relin_keys) = factory::generate_keys(&context)?;
		let encoder = CKKSEncoder::new(&context, factory::GLOBAL_SCALE)?;

		Ok(Self {
			context,
			secret_key,
			public_key,
			galois_keys,
			relin_keys,
			encoder,
		})
	}

	/// Strips the secret key, producing the bundle that is safe to hand to
	/// the inference server. Goes through the same wire encoding a real
	/// client/server split would use, so there is exactly one code path for
	/// "what does the server receive".
	pub fn to_eval_context(&self) -> Result<EvalContext> {
		let bytes = serialize::serialize_eval(self)?;
		let (eval_ctx, secret_key_present) = serialize::deserialize_eval(&bytes)?;
		debug_assert!(!secret_key_present, "client's own eval bundle must not carry a secret key");
		Ok(eval_ctx)
	}
}

/// Everything the inference engine needs to run a forward pass on ciphertext
/// it did not encrypt itself and cannot decrypt: no secret key.
pub struct EvalContext {
	/// The underlying SEAL context.
	pub context: Context,
	/// The public key. Kept for parity with the client bundle; the engine
	/// never encrypts anything itself.
	pub public_key: PublicKey,
	/// Galois (rotation) keys.
	pub galois_keys: GaloisKey,
	/// Relinearization keys.
	pub relin_keys: RelinearizationKey,
	/// CKKS encoder bound to this context's scale, used to inject model
	/// weights as plaintexts.
	pub encoder: CKKSEncoder,
	/// CKKS evaluator performing the homomorphic operations.
	pub evaluator: CKKSEvaluator,
}
