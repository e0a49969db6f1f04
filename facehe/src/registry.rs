//! Evaluation-context registry: in-memory cache plus on-disk persistence,
//! keyed by `KeyId`.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::context::{serialize, EvalContext};
use crate::error::{EngineError, Result};
use crate::model::KeyId;

/// Caches evaluation contexts in memory and persists them under
/// `context_dir/<key_id>.seal`, so a process restart doesn't require every
/// client to re-register.
pub struct Registry {
	context_dir: PathBuf,
	cache: RwLock<HashMap<KeyId, Arc<EvalContext>>>,
}

impl Registry {
	/// Opens a registry rooted at `context_dir`, creating the directory if
	/// it doesn't exist yet.
	pub fn new(context_dir: impl Into<PathBuf>) -> Result<Self> {
		let context_dir = context_dir.into();
		std::fs::create_dir_all(&context_dir)?;
		Ok(Self {
			context_dir,
			cache: RwLock::new(HashMap::new()),
		})
	}

	fn path_for(
		&self,
		key_id: &KeyId,
	) -> PathBuf {
		self.context_dir.join(format!("{}.seal", key_id.as_str()))
	}

	/// Registers an evaluation-context bundle under `key_id`, persisting it
	/// to disk and populating the in-memory cache. Re-registering the same
	/// `key_id` with the same bytes is idempotent; re-registering with
	/// different bytes overwrites the stored context, matching the "newest
	/// registration wins" policy for that key.
	///
	/// If the bundle happens to carry a secret key, this is logged at `warn`
	/// and the registration proceeds anyway: a client is free to hand over
	/// more than the engine strictly needs, and rejecting it outright would
	/// only punish an otherwise-valid registration.
	pub fn register(
		&self,
		key_id: &KeyId,
		eval_bytes: &[u8],
	) -> Result<()> {
		let (eval_ctx, secret_key_present) = serialize::deserialize_eval(eval_bytes)?;

		if secret_key_present {
			tracing::warn!(key_id = %key_id, "evaluation context bundle includes a secret key; accepting anyway");
		}

		std::fs::write(self.path_for(key_id), eval_bytes)?;
		self.cache.write().insert(key_id.clone(), Arc::new(eval_ctx));

		tracing::info!(key_id = %key_id, "registered evaluation context");
		Ok(())
	}

	/// Looks up the evaluation context for `key_id`, checking the in-memory
	/// cache first and falling back to disk (populating the cache on a
	/// disk hit). Returns `UnknownKey` if neither has it.
	pub fn lookup(
		&self,
		key_id: &KeyId,
	) -> Result<Arc<EvalContext>> {
		if let Some(ctx) = self.cache.read().get(key_id) {
			return Ok(ctx.clone());
		}

		let path = self.path_for(key_id);
		let bytes = match std::fs::read(&path) {
			Ok(bytes) => bytes,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				return Err(EngineError::UnknownKey(key_id.to_string()))
			}
			Err(e) => return Err(e.into()),
		};

		let (eval_ctx, secret_key_present) = serialize::deserialize_eval(&bytes)?;
		if secret_key_present {
			tracing::warn!(key_id = %key_id, "evaluation context loaded from disk includes a secret key");
		}

		let ctx = Arc::new(eval_ctx);
		self.cache.write().insert(key_id.clone(), ctx.clone());
		Ok(ctx)
	}

	/// Returns whether a `key_id` is known to this registry, without the
	/// cost of fully deserializing the context (used by health/diagnostic
	/// paths rather than the inference path itself).
	pub fn contains(
		&self,
		key_id: &KeyId,
	) -> bool {
		self.cache.read().contains_key(key_id) || self.path_for(key_id).exists()
	}

	/// The directory this registry persists contexts under.
	pub fn context_dir(&self) -> &Path {
		&self.context_dir
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::context::ClientContext;

	fn temp_registry() -> (tempfile::TempDir, Registry) {
		let dir = tempfile::tempdir().unwrap();
		let registry = Registry::new(dir.path()).unwrap();
		(dir, registry)
	}

	#[test]
	fn unknown_key_id_is_rejected() {
		let (_dir, registry) = temp_registry();
		let key_id = KeyId::generate();
		assert!(matches!(registry.lookup(&key_id), Err(EngineError::UnknownKey(_))));
	}

	#[test]
	fn register_then_lookup_round_trips() {
		let (_dir, registry) = temp_registry();
		let client = ClientContext::generate().unwrap();
		let eval_bytes = crate::context::serialize::serialize_eval(&client).unwrap();
		let key_id = KeyId::generate();

		registry.register(&key_id, &eval_bytes).unwrap();
		assert!(registry.contains(&key_id));
		registry.lookup(&key_id).unwrap();
	}

	#[test]
	fn re_registering_the_same_key_id_is_idempotent() {
		let (_dir, registry) = temp_registry();
		let client = ClientContext::generate().unwrap();
		let eval_bytes = crate::context::serialize::serialize_eval(&client).unwrap();
		let key_id = KeyId::generate();

		registry.register(&key_id, &eval_bytes).unwrap();
		registry.register(&key_id, &eval_bytes).unwrap();
		registry.lookup(&key_id).unwrap();
	}

	#[test]
	fn survives_process_restart_via_disk() {
		let (_dir, registry) = temp_registry();
		let client = ClientContext::generate().unwrap();
		let eval_bytes = crate::context::serialize::serialize_eval(&client).unwrap();
		let key_id = KeyId::generate();
		registry.register(&key_id, &eval_bytes).unwrap();

		let context_dir = registry.context_dir().to_path_buf();
		drop(registry);

		let reopened = Registry::new(&context_dir).unwrap();
		reopened.lookup(&key_id).unwrap();
	}

	#[test]
	fn two_distinct_keys_remain_independent() {
		let (_dir, registry) = temp_registry();
		let a = ClientContext::generate().unwrap();
		let b = ClientContext::generate().unwrap();
		let a_id = KeyId::generate();
		let b_id = KeyId::generate();

		registry
			.register(&a_id, &crate::context::serialize::serialize_eval(&a).unwrap())
			.unwrap();
		registry
			.register(&b_id, &crate::context::serialize::serialize_eval(&b).unwrap())
			.unwrap();

		registry.lookup(&a_id).unwrap();
		registry.lookup(&b_id).unwrap();
	}
}
