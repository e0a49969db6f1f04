//! Loads and validates the trained CNN weights.
//!
//! The forward graph is fixed (see `engine::packed`): one 9x9 stride-6
//! convolution with 16 output channels over a 48x48 input, producing a 7x7
//! feature map per channel (784 values when flattened across channels), then
//! two fully connected layers down to the 7 emotion logits. Mirrors
//! `FHEEmotionCNN` and `extract_fhe_parameters` in the original prototype.

use serde::Deserialize;
use std::path::Path;

use crate::error::{EngineError, Result};

/// Convolution kernel size (both dimensions).
pub const CONV_KERNEL: usize = 9;
/// Convolution stride.
pub const CONV_STRIDE: usize = 6;
/// Input image side length in pixels.
pub const IMAGE_SIDE: usize = 48;
/// Number of convolution output channels.
pub const CONV_CHANNELS: usize = 16;
/// Spatial side length of the feature map each channel produces: `(48 - 9) / 6 + 1`.
pub const FEATURE_SIDE: usize = 7;
/// Flattened feature vector length after packing all channels: `16 * 7 * 7`.
pub const FLATTENED_FEATURES: usize = CONV_CHANNELS * FEATURE_SIDE * FEATURE_SIDE;
/// Hidden layer width.
pub const HIDDEN_UNITS: usize = 128;
/// Number of emotion classes.
pub const NUM_CLASSES: usize = 7;

/// On-disk shape of a model artifact: flat weight vectors plus their
/// declared dimensions, serialized as JSON next to the model binary this was
/// exported from.
#[derive(Debug, Deserialize)]
struct RawModel {
	conv1_weight: Vec<f64>,
	conv1_bias: Vec<f64>,
	fc1_weight: Vec<f64>,
	fc1_bias: Vec<f64>,
	fc2_weight: Vec<f64>,
	fc2_bias: Vec<f64>,
}

/// Weights for the fixed forward graph, validated and laid out for direct
/// consumption by the encrypted engine.
#[derive(Debug, Clone)]
pub struct ModelWeights {
	/// 16 flattened 9x9 kernels, one per output channel (`16 * 81` values).
	pub conv1_weight: Vec<Vec<f64>>,
	/// One bias per output channel.
	pub conv1_bias: Vec<f64>,
	/// First fully connected layer: one row per hidden unit, each of length
	/// `FLATTENED_FEATURES` — the weight vector dotted against the packed,
	/// flattened conv output to produce that unit's pre-activation.
	pub fc1_weight_t: Vec<Vec<f64>>,
	/// Hidden layer bias (128 values).
	pub fc1_bias: Vec<f64>,
	/// Second fully connected layer: one row per output class, each of
	/// length `HIDDEN_UNITS`.
	pub fc2_weight_t: Vec<Vec<f64>>,
	/// Output layer bias (7 values).
	pub fc2_bias: Vec<f64>,
}

impl ModelWeights {
	/// Loads weights from a JSON artifact and validates every tensor against
	/// the fixed topology. Any shape mismatch or missing file is fatal: the
	/// engine cannot serve inference without a conforming model.
	pub fn load(path: &Path) -> Result<Self> {
		let bytes = std::fs::read(path)
			.map_err(|e| EngineError::ModelUnavailable(format!("{}: {}", path.display(), e)))?;

		let raw: RawModel = serde_json::from_slice(&bytes)
			.map_err(|e| EngineError::ModelUnavailable(format!("malformed model json: {e}")))?;

		if raw.conv1_weight.len() != CONV_CHANNELS * CONV_KERNEL * CONV_KERNEL {
			return Err(EngineError::ModelUnavailable(format!(
				"conv1_weight has {} values, expected {}",
				raw.conv1_weight.len(),
				CONV_CHANNELS * CONV_KERNEL * CONV_KERNEL
			)));
		}
		if raw.conv1_bias.len() != CONV_CHANNELS {
			return Err(EngineError::ModelUnavailable(format!(
				"conv1_bias has {} values, expected {}",
				raw.conv1_bias.len(),
				CONV_CHANNELS
			)));
		}
		if raw.fc1_weight.len() != HIDDEN_UNITS * FLATTENED_FEATURES {
			return Err(EngineError::ModelUnavailable(format!(
				"fc1_weight has {} values, expected {}",
				raw.fc1_weight.len(),
				HIDDEN_UNITS * FLATTENED_FEATURES
			)));
		}
		if raw.fc1_bias.len() != HIDDEN_UNITS {
			return Err(EngineError::ModelUnavailable(format!(
				"fc1_bias has {} values, expected {}",
				raw.fc1_bias.len(),
				HIDDEN_UNITS
			)));
		}
		if raw.fc2_weight.len() != NUM_CLASSES * HIDDEN_UNITS {
			return Err(EngineError::ModelUnavailable(format!(
				"fc2_weight has {} values, expected {}",
				raw.fc2_weight.len(),
				NUM_CLASSES * HIDDEN_UNITS
			)));
		}
		if raw.fc2_bias.len() != NUM_CLASSES {
			return Err(EngineError::ModelUnavailable(format!(
				"fc2_bias has {} values, expected {}",
				raw.fc2_bias.len(),
				NUM_CLASSES
			)));
		}

		let conv1_weight = raw
			.conv1_weight
			.chunks(CONV_KERNEL * CONV_KERNEL)
			.map(|chunk| chunk.to_vec())
			.collect();

		// Stored flat as (out_features, in_features) row-major, same
		// convention as conv1_weight: chunk per output unit, no transpose
		// needed since `engine::ops::matmul` dots each row against the
		// input directly.
		let fc1_weight_t = raw.fc1_weight.chunks(FLATTENED_FEATURES).map(|c| c.to_vec()).collect();
		let fc2_weight_t = raw.fc2_weight.chunks(HIDDEN_UNITS).map(|c| c.to_vec()).collect();

		Ok(Self {
			conv1_weight,
			conv1_bias: raw.conv1_bias,
			fc1_weight_t,
			fc1_bias: raw.fc1_bias,
			fc2_weight_t,
			fc2_bias: raw.fc2_bias,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_json() -> String {
		let conv1_weight = vec![0.01_f64; CONV_CHANNELS * CONV_KERNEL * CONV_KERNEL];
		let conv1_bias = vec![0.0_f64; CONV_CHANNELS];
		let fc1_weight = vec![0.01_f64; HIDDEN_UNITS * FLATTENED_FEATURES];
		let fc1_bias = vec![0.0_f64; HIDDEN_UNITS];
		let fc2_weight = vec![0.01_f64; NUM_CLASSES * HIDDEN_UNITS];
		let fc2_bias = vec![0.0_f64; NUM_CLASSES];

		serde_json::json!({
			"conv1_weight": conv1_weight,
			"conv1_bias": conv1_bias,
			"fc1_weight": fc1_weight,
			"fc1_bias": fc1_bias,
			"fc2_weight": fc2_weight,
			"fc2_bias": fc2_bias,
		})
		.to_string()
	}

	#[test]
	fn loads_and_reshapes_a_conforming_artifact() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("model.json");
		std::fs::write(&path, sample_json()).unwrap();

		let weights = ModelWeights::load(&path).unwrap();
		assert_eq!(weights.conv1_weight.len(), CONV_CHANNELS);
		assert_eq!(weights.conv1_weight[0].len(), CONV_KERNEL * CONV_KERNEL);
		assert_eq!(weights.fc1_weight_t.len(), HIDDEN_UNITS);
		assert_eq!(weights.fc1_weight_t[0].len(), FLATTENED_FEATURES);
		assert_eq!(weights.fc2_weight_t.len(), NUM_CLASSES);
		assert_eq!(weights.fc2_weight_t[0].len(), HIDDEN_UNITS);
	}

	#[test]
	fn rejects_shape_mismatch() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("model.json");
		std::fs::write(&path, r#"{"conv1_weight": [1.0], "conv1_bias": [], "fc1_weight": [], "fc1_bias": [], "fc2_weight": [], "fc2_bias": []}"#).unwrap();

		assert!(matches!(
			ModelWeights::load(&path),
			Err(EngineError::ModelUnavailable(_))
		));
	}

	#[test]
	fn rejects_missing_file() {
		let missing = Path::new("/nonexistent/path/model.json");
		assert!(matches!(
			ModelWeights::load(missing),
			Err(EngineError::ModelUnavailable(_))
		));
	}
}
