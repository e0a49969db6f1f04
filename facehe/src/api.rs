//! Request/response contract and the handler a transport layer calls into.
//!
//! Mirrors the `HEKeyRegisterRequest`/`EncryptedImageRequest`/
//! `EncryptedPredictionResponse` pydantic schemas, minus anything owned by a
//! transport layer (routing, auth headers, date-scoped history). No router,
//! no auth middleware, no CORS: a caller wires this into axum, actix, or
//! anything else.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::engine::InferencePool;
use crate::error::Result;
use crate::model::KeyId;
use crate::registry::Registry;

/// Registers a client's evaluation context under a `key_id` it chose.
#[derive(Debug, Deserialize)]
pub struct RegisterKeyRequest {
	/// The identifier the client wants its evaluation context stored under.
	pub key_id: String,
	/// Base64-encoded evaluation-context bundle (public/Galois/relin keys).
	pub eval_context_b64: String,
}

/// Acknowledges a successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterKeyResponse {
	/// The `key_id` the context was registered under, echoed back.
	pub key_id: String,
}

/// Requests an encrypted forward pass over an im2col-packed image.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
	/// Base64-encoded, im2col-packed ciphertext.
	pub ciphertext: String,
	/// The `key_id` whose evaluation context should evaluate this request.
	pub key_id: String,
}

/// The encrypted prediction: still a ciphertext, only the client can read it.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
	/// Base64-encoded ciphertext of the 7 encrypted emotion logits.
	pub ciphertext: String,
}

/// Ties the registry and the bounded inference pool together behind the two
/// operations a transport layer needs: register a key, then run inference
/// against it. Holds `Arc`s so it can be cloned cheaply into request-handler
/// closures.
#[derive(Clone)]
pub struct InferenceHandler {
	registry: Arc<Registry>,
	pool: Arc<InferencePool>,
}

impl InferenceHandler {
	/// Wires a handler to an already-constructed registry and pool. Both are
	/// scoped singletons built once at startup, not globals: the caller
	/// constructs `EngineConfig`, loads `ModelWeights`, builds the `Registry`
	/// and `InferencePool`, and passes them in here.
	pub fn new(
		registry: Arc<Registry>,
		pool: Arc<InferencePool>,
	) -> Self {
		Self { registry, pool }
	}

	/// Registers an evaluation context, returning the `key_id` it was stored
	/// under. Rejects a `key_id` with filesystem-unsafe characters before it
	/// ever reaches the registry.
	pub fn register_key(
		&self,
		request: RegisterKeyRequest,
	) -> Result<RegisterKeyResponse> {
		let key_id = KeyId::new(request.key_id)?;
		let eval_bytes = base64::Engine::decode(
			&base64::engine::general_purpose::STANDARD,
			&request.eval_context_b64,
		)
		.map_err(|e| crate::error::EngineError::BadCiphertext(format!("invalid base64: {e}")))?;

		self.registry.register(&key_id, &eval_bytes)?;
		Ok(RegisterKeyResponse { key_id: key_id.to_string() })
	}

	/// Runs an encrypted forward pass for `request.key_id`, subject to the
	/// pool's concurrency bound and per-request deadline.
	pub async fn analyze(
		&self,
		request: AnalyzeRequest,
	) -> Result<AnalyzeResponse> {
		let key_id = KeyId::new(request.key_id)?;
		let eval_ctx = self.registry.lookup(&key_id)?;
		let ciphertext = self.pool.run(&request.ciphertext, eval_ctx).await?;
		Ok(AnalyzeResponse { ciphertext })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::EngineConfig;
	use crate::context::ClientContext;
	use crate::engine::ScalarEngine;
	use crate::weights::ModelWeights;

	fn test_handler() -> (tempfile::TempDir, InferenceHandler) {
		let dir = tempfile::tempdir().unwrap();
		let registry = Arc::new(Registry::new(dir.path().join("contexts")).unwrap());

		let weights = Arc::new(sample_model_weights());
		let engine: Arc<dyn crate::engine::Engine> = Arc::new(ScalarEngine::new(weights));
		let config = EngineConfig {
			context_dir: dir.path().join("contexts"),
			model_path: dir.path().join("model.json"),
			max_inference_workers: 2,
			request_timeout_ms: 5_000,
			max_queue_depth: 4,
		};
		let pool = Arc::new(InferencePool::new(engine, &config));

		(dir, InferenceHandler::new(registry, pool))
	}

	fn sample_model_weights() -> ModelWeights {
		use crate::weights::{CONV_CHANNELS, CONV_KERNEL, FLATTENED_FEATURES, HIDDEN_UNITS, NUM_CLASSES};
		ModelWeights {
			conv1_weight: vec![vec![0.01; CONV_KERNEL * CONV_KERNEL]; CONV_CHANNELS],
			conv1_bias: vec![0.0; CONV_CHANNELS],
			fc1_weight_t: vec![vec![0.01; FLATTENED_FEATURES]; HIDDEN_UNITS],
			fc1_bias: vec![0.0; HIDDEN_UNITS],
			fc2_weight_t: vec![vec![0.01; HIDDEN_UNITS]; NUM_CLASSES],
			fc2_bias: vec![0.0; NUM_CLASSES],
		}
	}

	#[test]
	fn register_key_rejects_path_unsafe_key_ids() {
		let (_dir, handler) = test_handler();
		let result = handler.register_key(RegisterKeyRequest {
			key_id: "../escape".to_string(),
			eval_context_b64: "".to_string(),
		});
		assert!(result.is_err());
	}

	#[tokio::test]
	async fn analyze_reports_unknown_key_for_unregistered_ids() {
		let (_dir, handler) = test_handler();
		let result = handler
			.analyze(AnalyzeRequest { ciphertext: "".to_string(), key_id: "never-registered".to_string() })
			.await;
		assert!(matches!(result, Err(crate::error::EngineError::UnknownKey(_))));
	}

	#[test]
	fn register_key_accepts_a_real_eval_context() {
		let (_dir, handler) = test_handler();
		let client = ClientContext::generate().unwrap();
		let eval_bytes = crate::context::serialize::serialize_eval(&client).unwrap();
		let eval_b64 = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &eval_bytes);

		let response = handler
			.register_key(RegisterKeyRequest { key_id: "client-a".to_string(), eval_context_b64: eval_b64 })
			.unwrap();
		assert_eq!(response.key_id, "client-a");
	}
}
