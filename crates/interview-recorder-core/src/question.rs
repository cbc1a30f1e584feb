use crate::{CoreResult, RecorderError};

use std::{collections::HashSet, panic::Location};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// A single interview question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier within the catalog.
    pub id: String,
    /// Short headline shown above the recorder.
    pub title: String,
    /// Longer prompt text.
    pub description: String,
}

/// Ordered, immutable sequence of questions.
///
/// Guaranteed non-empty with unique ids, so every index in
/// `0..len()` is addressable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    /// Builds a catalog from an ordered list of questions.
    ///
    /// # Errors
    ///
    /// Returns error if the list is empty or an id appears twice.
    #[track_caller]
    pub fn new(questions: Vec<Question>) -> CoreResult<Self> {
        if questions.is_empty() {
            return Err(RecorderError::EmptyCatalog {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id.as_str()) {
                return Err(RecorderError::DuplicateQuestion {
                    id: question.id.clone(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }

        Ok(Self { questions })
    }

    /// Number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the catalog has no questions. Never true once constructed.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Question at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Position of the question with `id`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownQuestion` if no question has that id.
    #[track_caller]
    pub fn position(&self, id: &str) -> CoreResult<usize> {
        self.questions
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| RecorderError::UnknownQuestion {
                id: id.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Iterates the questions in order.
    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}
