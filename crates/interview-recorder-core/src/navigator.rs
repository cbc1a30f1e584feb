use crate::{CoreResult, RecorderError};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{debug, info};

/// One answered flag per question, fixed length for the whole interview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsweredFlags(Vec<bool>);

impl AnsweredFlags {
    /// `count` flags, all `false`.
    pub fn new(count: usize) -> Self {
        Self(vec![false; count])
    }

    /// Number of flags (equals the question count).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no flags.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flag at `index`; out of range reads as `false`.
    pub fn get(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    /// Whether every question is answered.
    pub fn all(&self) -> bool {
        self.0.iter().all(|answered| *answered)
    }

    /// Number of answered questions.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|answered| **answered).count()
    }

    /// Flags in question order.
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    fn set(&mut self, index: usize, answered: bool) -> bool {
        match self.0.get_mut(index) {
            Some(flag) if *flag != answered => {
                *flag = answered;
                true
            }
            _ => false,
        }
    }
}

/// Interview is over; the shell should route back to the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// Number of questions in the interview.
    pub question_count: usize,
}

/// Current question index plus answered flags, and the rules for moving
/// between questions and finishing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionNavigator {
    current: usize,
    answered: AnsweredFlags,
}

impl QuestionNavigator {
    /// Starts at `start` within `count` questions.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCatalog` if `count` is zero, `InvalidOption` if
    /// `start` is out of range.
    #[track_caller]
    pub fn new(count: usize, start: usize) -> CoreResult<Self> {
        if count == 0 {
            return Err(RecorderError::EmptyCatalog {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        if start >= count {
            return Err(RecorderError::InvalidOption {
                reason: format!("start index {} outside {} questions", start, count),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self {
            current: start,
            answered: AnsweredFlags::new(count),
        })
    }

    /// Index of the question on screen.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Number of questions.
    pub fn question_count(&self) -> usize {
        self.answered.len()
    }

    /// Whether the first question is on screen.
    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    /// Whether the last question is on screen.
    pub fn is_last(&self) -> bool {
        self.current + 1 == self.question_count()
    }

    /// All answered flags.
    pub fn answered(&self) -> &AnsweredFlags {
        &self.answered
    }

    /// Whether the question at `index` is answered.
    pub fn is_answered(&self, index: usize) -> bool {
        self.answered.get(index)
    }

    /// Whether the question on screen is answered.
    pub fn is_current_answered(&self) -> bool {
        self.answered.get(self.current)
    }

    /// Marks `index` answered. Returns whether the flag changed.
    pub fn mark_answered(&mut self, index: usize) -> bool {
        let changed = self.answered.set(index, true);
        if changed {
            debug!(question_index = index, "Question answered");
        }
        changed
    }

    /// Clears the flag for `index`. Returns whether the flag changed.
    pub fn mark_unanswered(&mut self, index: usize) -> bool {
        let changed = self.answered.set(index, false);
        if changed {
            debug!(question_index = index, "Question unanswered");
        }
        changed
    }

    /// Moves forward one question. The departed question's flag is left
    /// alone.
    ///
    /// Returns the new index, or `None` at the last question.
    pub fn go_next(&mut self) -> Option<usize> {
        if self.is_last() {
            return None;
        }
        self.current += 1;
        debug!(question_index = self.current, "Moved to next question");
        Some(self.current)
    }

    /// Moves back one question, marking the departed question answered
    /// whether or not anything was recorded for it.
    ///
    /// Returns the new index, or `None` at the first question.
    pub fn go_previous(&mut self) -> Option<usize> {
        if self.is_first() {
            return None;
        }
        self.mark_answered(self.current);
        self.current -= 1;
        debug!(question_index = self.current, "Moved to previous question");
        Some(self.current)
    }

    /// Every question answered and the last one on screen.
    pub fn can_finish(&self) -> bool {
        self.is_last() && self.answered.all()
    }

    /// Completes the interview if [`can_finish`](Self::can_finish).
    pub fn finish(&self) -> Option<Completion> {
        if !self.can_finish() {
            debug!(
                answered = self.answered.count(),
                question_count = self.question_count(),
                "Finish rejected"
            );
            return None;
        }

        info!(question_count = self.question_count(), "Interview complete");
        Some(Completion {
            question_count: self.question_count(),
        })
    }
}
