mod options;
mod phase;
mod recording;

pub use {
    options::{DEFAULT_MAX_DURATION_SECONDS, RecordingOptions},
    phase::{AcquisitionTicket, RecordingPhase, TickOutcome},
    recording::RecordingSession,
};
