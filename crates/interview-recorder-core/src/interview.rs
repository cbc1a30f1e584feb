//! Interview orchestration.
//!
//! Glues the question catalog, the navigator and the recording session
//! together and consumes [`InterviewEvent`]s one at a time. Everything the
//! outside world must do in response comes back as [`Effect`]s.

use crate::{
    CoreResult, RecorderError,
    capture::{CaptureDevice, ChunkSink},
    event::{Effect, Intent, InterviewEvent},
    navigator::QuestionNavigator,
    question::{Question, QuestionCatalog},
    session::{RecordingOptions, RecordingPhase, RecordingSession, TickOutcome},
    timer::TimerService,
    view::InterviewView,
};

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

/// A candidate working through the catalog.
pub struct Interview<D: CaptureDevice, T: TimerService> {
    catalog: Arc<QuestionCatalog>,
    navigator: QuestionNavigator,
    recording: RecordingSession<D, T>,
    completed: bool,
}

impl<D: CaptureDevice, T: TimerService> Interview<D, T> {
    /// Opens the interview on the question with `start_id`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownQuestion` if `start_id` is not in the catalog.
    #[track_caller]
    pub fn new(
        catalog: Arc<QuestionCatalog>,
        start_id: &str,
        device: Arc<D>,
        timer: T,
        sink: ChunkSink,
        options: RecordingOptions,
    ) -> CoreResult<Self> {
        let start = catalog.position(start_id)?;
        let navigator = QuestionNavigator::new(catalog.len(), start)?;
        let recording = RecordingSession::new(device, timer, sink, options);

        info!(
            question_index = start,
            question_count = catalog.len(),
            "Interview opened"
        );

        Ok(Self {
            catalog,
            navigator,
            recording,
            completed: false,
        })
    }

    /// Applies one event.
    #[instrument(level = "trace", skip(self))]
    pub fn handle(&mut self, event: InterviewEvent) -> Vec<Effect> {
        match event {
            // Routed even after completion so a late stream is released.
            InterviewEvent::DeviceAcquired { ticket, result } => {
                match self.recording.complete_acquisition(ticket, result) {
                    Ok(_) => Vec::new(),
                    Err(e) => {
                        warn!(error = ?e, "Recording could not start");
                        vec![Effect::DeviceUnavailable {
                            reason: describe(&e),
                        }]
                    }
                }
            }
            _ if self.completed => {
                debug!("Interview complete, event ignored");
                Vec::new()
            }
            InterviewEvent::ChunkReceived { recorder, chunk } => {
                self.recording.accept_chunk(recorder, chunk);
                Vec::new()
            }
            InterviewEvent::TimerTick { generation } => match self.recording.tick(generation) {
                TickOutcome::AutoStopped => self.mark_current_answered(),
                TickOutcome::Counted | TickOutcome::Ignored => Vec::new(),
            },
            InterviewEvent::User(intent) => self.apply(intent),
        }
    }

    /// Applies a candidate intent.
    pub fn apply(&mut self, intent: Intent) -> Vec<Effect> {
        if self.completed {
            return Vec::new();
        }

        match intent {
            Intent::Record => self.record(),
            Intent::Stop => self.stop(),
            Intent::Reset => self.reset(),
            Intent::Next => self.next(),
            Intent::Previous => self.previous(),
            Intent::Finish => self.finish(),
        }
    }

    fn record(&mut self) -> Vec<Effect> {
        match self.recording.request_start() {
            Some(ticket) => vec![Effect::AcquireDevice { ticket }],
            None => Vec::new(),
        }
    }

    fn stop(&mut self) -> Vec<Effect> {
        if self.recording.stop() {
            self.mark_current_answered()
        } else {
            Vec::new()
        }
    }

    fn reset(&mut self) -> Vec<Effect> {
        if !self.recording.reset() {
            return Vec::new();
        }

        let index = self.navigator.current_index();
        if self.navigator.mark_unanswered(index) {
            vec![Effect::AnsweredChanged {
                question_index: index,
                answered: false,
            }]
        } else {
            Vec::new()
        }
    }

    fn next(&mut self) -> Vec<Effect> {
        if self.navigator.is_last() {
            return Vec::new();
        }

        let departed = self.navigator.current_index();
        let mut effects = Vec::new();

        // A take still running is stopped, and that stop answers the
        // departed question. Leaving forward otherwise changes no flag.
        if self.recording.discard_take() && self.navigator.mark_answered(departed) {
            effects.push(Effect::AnsweredChanged {
                question_index: departed,
                answered: true,
            });
        }

        if let Some(index) = self.navigator.go_next() {
            effects.push(Effect::QuestionChanged {
                question_index: index,
            });
        }

        effects
    }

    fn previous(&mut self) -> Vec<Effect> {
        if self.navigator.is_first() {
            return Vec::new();
        }

        let departed = self.navigator.current_index();
        let was_answered = self.navigator.is_answered(departed);
        let mut effects = Vec::new();

        // Leaving backward counts the departed question as answered,
        // recorded or not. go_previous sets the flag.
        let Some(index) = self.navigator.go_previous() else {
            return effects;
        };
        self.recording.discard_take();

        if !was_answered {
            effects.push(Effect::AnsweredChanged {
                question_index: departed,
                answered: true,
            });
        }
        effects.push(Effect::QuestionChanged {
            question_index: index,
        });

        effects
    }

    fn finish(&mut self) -> Vec<Effect> {
        let Some(completion) = self.navigator.finish() else {
            return Vec::new();
        };

        self.recording.discard_take();
        self.completed = true;

        vec![Effect::SessionComplete(completion)]
    }

    fn mark_current_answered(&mut self) -> Vec<Effect> {
        let index = self.navigator.current_index();
        if self.navigator.mark_answered(index) {
            vec![Effect::AnsweredChanged {
                question_index: index,
                answered: true,
            }]
        } else {
            Vec::new()
        }
    }

    /// Question on screen.
    pub fn current_question(&self) -> Option<&Question> {
        self.catalog.get(self.navigator.current_index())
    }

    /// Navigation state and answered flags.
    pub fn navigator(&self) -> &QuestionNavigator {
        &self.navigator
    }

    /// Take for the question on screen.
    pub fn recording(&self) -> &RecordingSession<D, T> {
        &self.recording
    }

    /// Whether `finish` succeeded.
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Derived display flags for the current state.
    pub fn view(&self) -> InterviewView {
        let phase = self.recording.phase();
        let acquiring = self.recording.is_acquiring();
        let recording = phase == RecordingPhase::Recording;
        let open = !self.completed;
        let (title, description) = self
            .current_question()
            .map(|q| (q.title.clone(), q.description.clone()))
            .unwrap_or_default();

        InterviewView {
            question_index: self.navigator.current_index(),
            question_count: self.navigator.question_count(),
            title,
            description,
            phase,
            acquiring,
            countdown: recording.then(|| self.recording.countdown()),
            can_record: open && phase == RecordingPhase::Idle && !acquiring,
            can_stop: open && recording,
            can_reset: open && phase == RecordingPhase::Reviewing,
            show_answered: !recording && self.navigator.is_current_answered(),
            can_previous: open && !self.navigator.is_first(),
            can_next: open && !self.navigator.is_last(),
            can_finish: open && self.navigator.can_finish(),
            answered: self.navigator.answered().as_slice().to_vec(),
        }
    }
}

fn describe(error: &RecorderError) -> String {
    match error {
        RecorderError::DeviceUnavailable { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}
