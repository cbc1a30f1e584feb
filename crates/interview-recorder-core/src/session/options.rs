use crate::{CoreResult, RecorderError};

use std::panic::Location;

use error_location::ErrorLocation;

/// Time limit applied to every take unless configured otherwise.
pub const DEFAULT_MAX_DURATION_SECONDS: u32 = 10;

/// Tunables for a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingOptions {
    max_duration_seconds: u32,
}

impl RecordingOptions {
    /// Validates and wraps the per-take time limit.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOption` if `max_duration_seconds` is zero.
    #[track_caller]
    pub fn new(max_duration_seconds: u32) -> CoreResult<Self> {
        if max_duration_seconds == 0 {
            return Err(RecorderError::InvalidOption {
                reason: "max_duration_seconds must be greater than zero".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self {
            max_duration_seconds,
        })
    }

    /// Per-take time limit in seconds. Always `> 0`.
    pub fn max_duration_seconds(&self) -> u32 {
        self.max_duration_seconds
    }
}

impl Default for RecordingOptions {
    fn default() -> Self {
        Self {
            max_duration_seconds: DEFAULT_MAX_DURATION_SECONDS,
        }
    }
}
