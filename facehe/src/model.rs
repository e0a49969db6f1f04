//! Stable identifiers and shared value types used across the engine.

use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::{EngineError, Result};

/// The seven emotion classes the model was trained to distinguish, in the
/// order they occupy the final layer's output slots.
pub const EMOTION_LABELS: [&str; 7] = [
	"angry", "disgust", "fear", "happy", "sad", "surprise", "neutral",
];

/// Opaque identifier naming one client's evaluation context.
///
/// Valid as a filesystem path component: ASCII alphanumeric plus `-` and `_`
/// only, so the registry can use it directly as a filename without risking
/// path traversal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(String);

impl KeyId {
	/// Wraps a caller-supplied string as a `KeyId`, validating it is safe to
	/// use as a filename component.
	pub fn new(raw: impl Into<String>) -> Result<Self> {
		let raw = raw.into();
		if raw.is_empty()
			|| !raw
				.chars()
				.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
		{
			return Err(EngineError::BadKeyId(raw));
		}
		Ok(Self(raw))
	}

	/// Generates a fresh random key id (UUIDv4), the production path used
	/// when a client provisions a new evaluation context.
	pub fn generate() -> Self {
		Self(uuid::Uuid::new_v4().to_string())
	}

	/// Derives a key id deterministically from the serialized evaluation
	/// context bytes, for the case where metadata describing a previously
	/// generated key id has been lost but the eval bytes are still on disk.
	pub fn from_eval_bytes(eval_bytes: &[u8]) -> Self {
		let digest = Sha256::digest(eval_bytes);
		Self(hex_prefix(&digest, 16))
	}

	/// Returns the identifier as a plain string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for KeyId {
	fn fmt(
		&self,
		f: &mut fmt::Formatter<'_>,
	) -> fmt::Result {
		f.write_str(&self.0)
	}
}

fn hex_prefix(
	bytes: &[u8],
	len: usize,
) -> String {
	bytes
		.iter()
		.take(len.div_ceil(2))
		.map(|b| format!("{:02x}", b))
		.collect::<String>()
		.chars()
		.take(len)
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_path_unsafe_characters() {
		assert!(KeyId::new("../etc/passwd").is_err());
		assert!(KeyId::new("a/b").is_err());
		assert!(KeyId::new("").is_err());
	}

	#[test]
	fn accepts_uuid_like_strings() {
		let id = KeyId::new("3fa9c1ab-0000-4000-8000-000000000000").unwrap();
		assert_eq!(id.as_str(), "3fa9c1ab-0000-4000-8000-000000000000");
	}

	#[test]
	fn hash_derivation_is_deterministic() {
		let a = KeyId::from_eval_bytes(b"some eval context bytes");
		let b = KeyId::from_eval_bytes(b"some eval context bytes");
		assert_eq!(a, b);
		assert_eq!(a.as_str().len(), 16);
	}

	#[test]
	fn generate_produces_distinct_ids() {
		assert_ne!(KeyId::generate(), KeyId::generate());
	}
}
