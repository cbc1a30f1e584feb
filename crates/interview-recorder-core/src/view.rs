use crate::session::RecordingPhase;

use serde::Serialize;

/// Snapshot of everything the shell needs to draw the recorder screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterviewView {
    /// Position of the question on screen.
    pub question_index: usize,
    /// Total number of questions.
    pub question_count: usize,
    /// Title of the question on screen.
    pub title: String,
    /// Prompt of the question on screen.
    pub description: String,
    /// Phase of the current take.
    pub phase: RecordingPhase,
    /// Device request outstanding.
    pub acquiring: bool,
    /// `MM:SS` remaining, only while recording.
    pub countdown: Option<String>,
    /// Record control enabled.
    pub can_record: bool,
    /// Stop control enabled.
    pub can_stop: bool,
    /// Reset control enabled.
    pub can_reset: bool,
    /// Answered check mark visible.
    pub show_answered: bool,
    /// Previous control enabled.
    pub can_previous: bool,
    /// Next control enabled.
    pub can_next: bool,
    /// Finish control visible.
    pub can_finish: bool,
    /// Answered flag per question.
    pub answered: Vec<bool>,
}
