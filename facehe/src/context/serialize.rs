//! Wire format for client and evaluation context bundles.
//!
//! Every key object round-trips through `sealy`'s `ToBytes`/`FromBytes`
//! (the same pair `Plaintext` and `Ciphertext` use), packed into a small
//! envelope that toggles secret-key inclusion. Encryption parameters are
//! never serialized: both sides reconstruct them from `context::factory`,
//! which is simpler and cannot drift out of sync with itself.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use sealy::{CKKSEncoder, CKKSEvaluator, FromBytes, GaloisKey, PublicKey, RelinearizationKey, SecretKey, ToBytes};

use super::{factory, ClientContext, EvalContext};
use crate::error::Result;

#[derive(Serialize, Deserialize)]
struct Envelope {
	public_key: String,
	galois_keys: String,
	relin_keys: String,
	secret_key: Option<String>,
}

fn to_b64(bytes: &[u8]) -> String {
	STANDARD.encode(bytes)
}

fn from_b64(s: &str) -> Result<Vec<u8>> {
	STANDARD
		.decode(s)
		.map_err(|e| crate::error::EngineError::BadCiphertext(format!("invalid base64 in context bundle: {e}")))
}

/// Serializes a client context's full keypair, including the secret key.
/// This blob must never leave the client's trusted storage.
pub fn serialize_client(ctx: &ClientContext) -> Result<Vec<u8>> {
	let envelope = Envelope {
		public_key: to_b64(&ctx.public_key.as_bytes()?),
		galois_keys: to_b64(&ctx.galois_keys.as_bytes()?),
		relin_keys: to_b64(&ctx.relin_keys.as_bytes()?),
		secret_key: Some(to_b64(&ctx.secret_key.as_bytes()?)),
	};
	Ok(serde_json::to_vec(&envelope).map_err(|e| std::io::Error::other(e))?)
}

/// Serializes the evaluation bundle a client hands to the inference server:
/// public, Galois and relinearization keys, no secret key.
pub fn serialize_eval(ctx: &ClientContext) -> Result<Vec<u8>> {
	let envelope = Envelope {
		public_key: to_b64(&ctx.public_key.as_bytes()?),
		galois_keys: to_b64(&ctx.galois_keys.as_bytes()?),
		relin_keys: to_b64(&ctx.relin_keys.as_bytes()?),
		secret_key: None,
	};
	Ok(serde_json::to_vec(&envelope).map_err(|e| std::io::Error::other(e))?)
}

/// Reconstructs a full client context (including secret key) from bytes
/// produced by `serialize_client`.
pub fn deserialize_client(bytes: &[u8]) -> Result<ClientContext> {
	let envelope: Envelope = serde_json::from_slice(bytes).map_err(|e| std::io::Error::other(e))?;
	let secret_b64 = envelope.secret_key.as_deref().ok_or_else(|| {
		crate::error::EngineError::BadCiphertext("client context bundle is missing its secret key".into())
	})?;

	let context = factory::build_context()?;
	let public_key = PublicKey::from_bytes(&context, &from_b64(&envelope.public_key)?)?;
	let galois_keys = GaloisKey::from_bytes(&context, &from_b64(&envelope.galois_keys)?)?;
	let relin_keys = RelinearizationKey::from_bytes(&context, &from_b64(&envelope.relin_keys)?)?;
	let secret_key = SecretKey::from_bytes(&context, &from_b64(secret_b64)?)?;
	let encoder = CKKSEncoder::new(&context, factory::GLOBAL_SCALE)?;

	Ok(ClientContext {
		context,
		secret_key,
		public_key,
		galois_keys,
		relin_keys,
		encoder,
	})
}

/// Reconstructs an evaluation context from bytes produced by
/// `serialize_eval` (or, tolerantly, `serialize_client`). Returns whether a
/// secret key was present in the blob: the registry logs and accepts rather
/// than rejecting, per this system's key-hygiene policy, but the returned
/// `EvalContext` never carries the secret key either way.
pub fn deserialize_eval(bytes: &[u8]) -> Result<(EvalContext, bool)> {
	let envelope: Envelope = serde_json::from_slice(bytes).map_err(|e| std::io::Error::other(e))?;
	let secret_key_present = envelope.secret_key.is_some();

	let context = factory::build_context()?;
	let public_key = PublicKey::from_bytes(&context, &from_b64(&envelope.public_key)?)?;
	let galois_keys = GaloisKey::from_bytes(&context, &from_b64(&envelope.galois_keys)?)?;
	let relin_keys = RelinearizationKey::from_bytes(&context, &from_b64(&envelope.relin_keys)?)?;
	let encoder = CKKSEncoder::new(&context, factory::GLOBAL_SCALE)?;
	let evaluator = CKKSEvaluator::new(&context)?;

	Ok((
		EvalContext {
			context,
			public_key,
			galois_keys,
			relin_keys,
			encoder,
			evaluator,
		},
		secret_key_present,
	))
}
