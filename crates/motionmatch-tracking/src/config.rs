//! Persisted estimation and tracking settings.
//!
//! Uses JSON with a schema version field so older files keep loading.

use motionmatch_core::{MotionError, Result};
use serde::{Deserialize, Serialize};

use crate::motion_field::DenseFieldParams;
use crate::object_tracker::TrackerParams;

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Versioned settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Schema version for migration.
    pub version: u32,
    #[serde(default)]
    pub dense: DenseFieldParams,
    #[serde(default)]
    pub tracker: TrackerParams,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            dense: DenseFieldParams::default(),
            tracker: TrackerParams::default(),
        }
    }
}

impl MotionConfig {
    /// Check every parameter group.
    pub fn validate(&self) -> Result<()> {
        self.dense.validate()?;
        self.tracker.validate()
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| MotionError::Serialization(format!("Failed to serialize config: {}", e)))
    }

    /// Deserialize from JSON bytes and validate the result.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| MotionError::Serialization(format!("Invalid JSON: {}", e)))?;

        let version = raw.get("version").and_then(|v| v.as_u64()).unwrap_or(0);
        if version > CURRENT_VERSION as u64 {
            return Err(MotionError::Serialization(format!(
                "Config version {} is newer than supported version {}",
                version, CURRENT_VERSION
            )));
        }

        let mut config: MotionConfig = serde_json::from_value(migrate(raw, version as u32))
            .map_err(|e| MotionError::Serialization(format!("Failed to parse config: {}", e)))?;
        config.version = CURRENT_VERSION;
        config.validate()?;
        Ok(config)
    }
}

/// Bring an older document up to the current schema.
fn migrate(mut value: serde_json::Value, from_version: u32) -> serde_json::Value {
    // v0 files predate the version field.
    if from_version == 0 {
        if let Some(obj) = value.as_object_mut() {
            obj.insert("version".into(), serde_json::Value::from(CURRENT_VERSION));
        }
    }
    value
}
