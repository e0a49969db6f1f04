//! Privacy-preserving facial emotion inference over CKKS ciphertexts.
//!
//! A fixed CNN (one convolution, two fully connected layers, squaring
//! activations) evaluated homomorphically against SEAL via the `sealy`
//! bindings: the server never sees a plaintext image or a plaintext
//! prediction. `engine` holds the forward pass and its worker pool, `context`
//! and `registry` manage the CKKS keys each client registers, `client` is a
//! reference implementation of the encrypt/decrypt side, and `api` is the
//! thin request/response contract a transport layer wires in.

#![warn(missing_docs)]

pub mod api;
pub mod client;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod model;
pub mod registry;
pub mod weights;

pub use config::EngineConfig;
pub use engine::{Engine, InferencePool, PackedEngine, ScalarEngine};
pub use error::{EngineError, Result};
pub use model::{KeyId, EMOTION_LABELS};
pub use registry::Registry;
pub use weights::ModelWeights;
