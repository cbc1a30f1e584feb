use crate::{
    CoreResult,
    capture::{MediaChunk, RecorderId, StreamHandle},
    navigator::Completion,
    session::AcquisitionTicket,
    timer::TimerGeneration,
};

/// Something the candidate asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Start a take for the current question.
    Record,
    /// Stop the running take.
    Stop,
    /// Discard the take under review.
    Reset,
    /// Go to the following question.
    Next,
    /// Go to the preceding question.
    Previous,
    /// Complete the interview.
    Finish,
}

/// Everything that can drive the interview, applied one at a time.
#[derive(Debug)]
pub enum InterviewEvent {
    /// Result of an [`Effect::AcquireDevice`] request.
    DeviceAcquired {
        /// Ticket from the request.
        ticket: AcquisitionTicket,
        /// Acquired stream or the failure.
        result: CoreResult<StreamHandle>,
    },
    /// Chunk pushed by a recorder.
    ChunkReceived {
        /// Recorder that produced the chunk.
        recorder: RecorderId,
        /// Encoded media.
        chunk: MediaChunk,
    },
    /// One second elapsed on the timer run `generation`.
    TimerTick {
        /// Timer run the tick belongs to.
        generation: TimerGeneration,
    },
    /// Candidate input.
    User(Intent),
}

/// Work or notifications for the presentation shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Acquire the capture device off the event loop and report back with
    /// [`InterviewEvent::DeviceAcquired`] carrying `ticket`.
    AcquireDevice {
        /// Ticket to echo back.
        ticket: AcquisitionTicket,
    },
    /// Recording could not start. Transient; the candidate may retry.
    DeviceUnavailable {
        /// Human-readable cause.
        reason: String,
    },
    /// A question's answered flag changed.
    AnsweredChanged {
        /// Question position.
        question_index: usize,
        /// New flag value.
        answered: bool,
    },
    /// A different question is on screen.
    QuestionChanged {
        /// New question position.
        question_index: usize,
    },
    /// All questions answered and finish confirmed.
    SessionComplete(Completion),
}
