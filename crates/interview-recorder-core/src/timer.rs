//! Countdown timer contract.
//!
//! The session never sleeps. It asks a [`TimerService`] to start ticking
//! for a given [`TimerGeneration`] and counts the ticks delivered back as
//! events. Ticks carrying a stale generation are discarded, so a late tick
//! from a stopped timer can never advance a newer take.

/// Identifies one run of the timer. Every fresh take gets a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerGeneration(u64);

impl TimerGeneration {
    /// Wraps a raw generation counter.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// The generation following this one.
    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Raw counter value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TimerGeneration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One-tick-per-second scheduler owned by the recording session.
pub trait TimerService {
    /// Starts ticking once per second, tagging every tick with `generation`.
    ///
    /// Starting while already running replaces the previous run.
    fn start(&mut self, generation: TimerGeneration);

    /// Stops ticking. No tick may be delivered for the stopped run afterwards.
    fn stop(&mut self);
}

/// Seconds left before the take is capped, clamped at zero.
pub fn remaining_seconds(max_duration_seconds: u32, elapsed_seconds: u32) -> u32 {
    max_duration_seconds.saturating_sub(elapsed_seconds)
}

/// Formats a second count as `MM:SS`.
///
/// Minutes wrap at the hour, matching a clock face.
pub fn format_countdown(seconds: u32) -> String {
    format!("{:02}:{:02}", (seconds / 60) % 60, seconds % 60)
}
