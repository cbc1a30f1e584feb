use crate::config::default_max_duration_seconds;

use serde::{Deserialize, Serialize};

/// Recording behaviour configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Time limit per take in seconds. Must be greater than zero.
    #[serde(default = "default_max_duration_seconds")]
    pub max_duration_seconds: u32,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            max_duration_seconds: default_max_duration_seconds(),
        }
    }
}
