//! Interview Recorder Core Library
//!
//! Recording and navigation state machine for answering a fixed sequence
//! of interview questions with short, time-limited media takes.
//!
//! # Example
//!
//! ```no_run
//! use interview_recorder_core::{
//!     ChunkSink, CoreResult, Intent, Interview, InterviewEvent, MicrophoneDevice, Question,
//!     QuestionCatalog, RecordingOptions, TimerGeneration, TimerService,
//! };
//!
//! use std::sync::Arc;
//!
//! struct NoTimer;
//!
//! impl TimerService for NoTimer {
//!     fn start(&mut self, _generation: TimerGeneration) {}
//!     fn stop(&mut self) {}
//! }
//!
//! fn main() -> CoreResult<()> {
//!     let catalog = Arc::new(QuestionCatalog::new(vec![Question {
//!         id: "intro".to_string(),
//!         title: "Introduce yourself".to_string(),
//!         description: "Who are you and what do you do?".to_string(),
//!     }])?);
//!     let sink: ChunkSink = Arc::new(|_, _| {});
//!     let mut interview = Interview::new(
//!         catalog,
//!         "intro",
//!         Arc::new(MicrophoneDevice::new()),
//!         NoTimer,
//!         sink,
//!         RecordingOptions::default(),
//!     )?;
//!
//!     let effects = interview.handle(InterviewEvent::User(Intent::Record));
//!     println!("{:?}", effects);
//!     Ok(())
//! }
//! ```

mod capture;
mod error;
mod event;
mod interview;
mod navigator;
mod question;
mod session;
mod timer;
mod view;

pub use {
    capture::{
        CaptureDevice, ChunkSink, MediaArtifact, MediaChunk, MicrophoneDevice, RecorderHandle,
        RecorderId, StreamHandle,
    },
    error::{RecorderError, Result as CoreResult},
    event::{Effect, Intent, InterviewEvent},
    interview::Interview,
    navigator::{AnsweredFlags, Completion, QuestionNavigator},
    question::{Question, QuestionCatalog},
    session::{
        AcquisitionTicket, DEFAULT_MAX_DURATION_SECONDS, RecordingOptions, RecordingPhase,
        RecordingSession, TickOutcome,
    },
    timer::{TimerGeneration, TimerService, format_countdown, remaining_seconds},
    view::InterviewView,
};

#[cfg(test)]
mod tests;
