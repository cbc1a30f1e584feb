use error_location::ErrorLocation;
use thiserror::Error;

/// Interview recording errors with source location tracking.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// Capture device could not be acquired or started.
    ///
    /// Never fatal: the take stays idle and the candidate may retry.
    #[error("Capture device unavailable: {reason} {location}")]
    DeviceUnavailable {
        /// Description of the device failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Question catalog contains no questions.
    #[error("Question catalog is empty {location}")]
    EmptyCatalog {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Two questions in the catalog share the same id.
    #[error("Duplicate question id: {id} {location}")]
    DuplicateQuestion {
        /// The repeated question id.
        id: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Requested question id is not in the catalog.
    #[error("Unknown question id: {id} {location}")]
    UnknownQuestion {
        /// The id that could not be found.
        id: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A recording option was out of range.
    #[error("Invalid recording option: {reason} {location}")]
    InvalidOption {
        /// Description of the rejected value.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`RecorderError`].
pub type Result<T> = std::result::Result<T, RecorderError>;
