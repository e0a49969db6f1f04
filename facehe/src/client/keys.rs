//! Client-side key lifecycle: generate or load a keypair, persist it, and hand
//! out the `key_id` / evaluation bytes the server needs for registration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::context::{serialize, ClientContext};
use crate::error::Result;
use crate::model::KeyId;

const KEYPAIR_FILE: &str = "keypair.seal";
const EVAL_CONTEXT_FILE: &str = "eval_context.seal";
const METADATA_FILE: &str = "metadata.json";

#[derive(Debug, Serialize, Deserialize)]
struct Metadata {
	key_id: String,
}

/// A client's persisted CKKS keypair plus the bits the server needs: its
/// `key_id` and the evaluation-context bytes to register.
pub struct KeyManager {
	dir: PathBuf,
}

impl KeyManager {
	/// Manages keys stored under `dir`, creating it if necessary.
	pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
		let dir = dir.into();
		std::fs::create_dir_all(&dir)?;
		Ok(Self { dir })
	}

	fn keypair_path(&self) -> PathBuf {
		self.dir.join(KEYPAIR_FILE)
	}

	fn eval_context_path(&self) -> PathBuf {
		self.dir.join(EVAL_CONTEXT_FILE)
	}

	fn metadata_path(&self) -> PathBuf {
		self.dir.join(METADATA_FILE)
	}

	/// Loads a previously persisted keypair if one exists under this
	/// manager's directory, otherwise generates and persists a fresh one.
	/// Returns the client context, its `key_id`, and the base64-encoded
	/// evaluation-context bytes ready to hand to the server.
	pub fn ensure_keypair(&self) -> Result<(ClientContext, KeyId, String)> {
		if self.keypair_path().exists() {
			tracing::info!(dir = %self.dir.display(), "loading persisted client keypair");
			return self.load();
		}
		tracing::info!(dir = %self.dir.display(), "no persisted keypair found, generating one");
		self.generate(KeyIdMode::Uuid)
	}

	/// Generates a fresh CKKS keypair, using identical parameters to the ones
	/// the server expects (`facehe::context::factory`, so client and server
	/// never silently diverge), and persists the secret-bearing form,
	/// evaluation form, and a small metadata file naming its `key_id`.
	pub fn generate(
		&self,
		key_id_mode: KeyIdMode,
	) -> Result<(ClientContext, KeyId, String)> {
		let client = ClientContext::generate()?;
		let eval_bytes = serialize::serialize_eval(&client)?;

		let key_id = match key_id_mode {
			KeyIdMode::Uuid => KeyId::generate(),
			KeyIdMode::HashOfEvalContext => KeyId::from_eval_bytes(&eval_bytes),
		};

		let client_bytes = serialize::serialize_client(&client)?;
		std::fs::write(self.keypair_path(), &client_bytes)?;
		std::fs::write(self.eval_context_path(), &eval_bytes)?;
		std::fs::write(
			self.metadata_path(),
			serde_json::to_vec_pretty(&Metadata { key_id: key_id.to_string() })
				.map_err(|e| std::io::Error::other(e))?,
		)?;

		tracing::info!(key_id = %key_id, "generated and persisted a new client keypair");
		let eval_b64 = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &eval_bytes);
		Ok((client, key_id, eval_b64))
	}

	fn load(&self) -> Result<(ClientContext, KeyId, String)> {
		let client_bytes = std::fs::read(self.keypair_path())?;
		let client = serialize::deserialize_client(&client_bytes)?;

		let eval_bytes = std::fs::read(self.eval_context_path())?;
		let eval_b64 = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &eval_bytes);

		let metadata_bytes = std::fs::read(self.metadata_path())?;
		let metadata: Metadata =
			serde_json::from_slice(&metadata_bytes).map_err(|e| std::io::Error::other(e))?;
		let key_id = KeyId::new(metadata.key_id)?;

		Ok((client, key_id, eval_b64))
	}

	/// The directory this manager persists keys under.
	pub fn dir(&self) -> &Path {
		&self.dir
	}
}

/// How a freshly generated keypair's `key_id` is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIdMode {
	/// A fresh, random UUIDv4 — the default, used whenever the client is free
	/// to pick its own identifier.
	Uuid,
	/// The first 16 hex characters of SHA-256 of the evaluation-context
	/// bytes, for deterministic identification when a metadata file is
	/// unavailable or untrusted.
	HashOfEvalContext,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn generate_then_ensure_loads_the_same_key_id() {
		let dir = tempfile::tempdir().unwrap();
		let manager = KeyManager::new(dir.path()).unwrap();

		let (_client, key_id, eval_b64) = manager.generate(KeyIdMode::Uuid).unwrap();
		let (_client2, key_id2, eval_b64_2) = manager.ensure_keypair().unwrap();

		assert_eq!(key_id, key_id2);
		assert_eq!(eval_b64, eval_b64_2);
	}

	#[test]
	fn hash_mode_is_deterministic_for_the_same_eval_bytes() {
		let dir = tempfile::tempdir().unwrap();
		let manager = KeyManager::new(dir.path()).unwrap();
		let (client, _key_id, _eval_b64) = manager.generate(KeyIdMode::Uuid).unwrap();

		let eval_bytes = serialize::serialize_eval(&client).unwrap();
		let a = KeyId::from_eval_bytes(&eval_bytes);
		let b = KeyId::from_eval_bytes(&eval_bytes);
		assert_eq!(a, b);
	}

	#[test]
	fn a_fresh_manager_generates_when_nothing_is_persisted() {
		let dir = tempfile::tempdir().unwrap();
		let manager = KeyManager::new(dir.path()).unwrap();
		assert!(manager.ensure_keypair().is_ok());
	}
}
