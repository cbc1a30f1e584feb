use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Observable phase of the take for the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingPhase {
    /// Nothing recorded. Also reported while a device request is pending.
    #[default]
    Idle,
    /// Capturing and counting down.
    Recording,
    /// Take finalized and available for preview.
    Reviewing,
}

/// What a timer tick did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Tick was stale or arrived outside `Recording`.
    Ignored,
    /// Elapsed time advanced by one second.
    Counted,
    /// Elapsed time reached the limit and the take was stopped.
    AutoStopped,
}

/// Correlates an asynchronous device request with its result.
///
/// A result whose ticket no longer matches the pending request belongs to
/// an abandoned start and its stream is released on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AcquisitionTicket(Uuid);

impl AcquisitionTicket {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for AcquisitionTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
