//! Question catalog sources: a TOML file or the built-in set.

use crate::{AppError, AppResult, config::CatalogConfig};

use std::{fs, panic::Location, path::Path};

use error_location::ErrorLocation;
use interview_recorder_core::{Question, QuestionCatalog};
use serde::Deserialize;
use tracing::{info, instrument};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    questions: Vec<Question>,
}

/// Loads the catalog named by `config`, falling back to the built-in set.
#[track_caller]
#[instrument]
pub(crate) fn load_catalog(config: &CatalogConfig) -> AppResult<QuestionCatalog> {
    match &config.path {
        Some(path) => load_catalog_file(path),
        None => {
            info!("Using built-in questions");
            default_catalog()
        }
    }
}

#[track_caller]
fn load_catalog_file(path: &Path) -> AppResult<QuestionCatalog> {
    let contents = fs::read_to_string(path).map_err(|e| AppError::CatalogError {
        reason: format!("Failed to read {}: {}", path.display(), e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let catalog = parse_catalog(&contents)?;
    info!(path = ?path, question_count = catalog.len(), "Catalog loaded");

    Ok(catalog)
}

/// Parses `[[questions]]` tables with `id`, `title` and `description`.
///
/// # Errors
///
/// Returns `CatalogError` on malformed TOML, and `Recorder` if the list is
/// empty or repeats an id.
#[track_caller]
pub(crate) fn parse_catalog(contents: &str) -> AppResult<QuestionCatalog> {
    let file: CatalogFile = toml::from_str(contents).map_err(|e| AppError::CatalogError {
        reason: format!("Failed to parse catalog: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok(QuestionCatalog::new(file.questions)?)
}

/// Questions used when no catalog file is configured.
#[track_caller]
pub(crate) fn default_catalog() -> AppResult<QuestionCatalog> {
    let questions = [
        (
            "introduction",
            "Introduce yourself",
            "Tell us who you are and what you are working on right now.",
        ),
        (
            "challenge",
            "A hard problem",
            "Describe a difficult technical problem you solved and how you approached it.",
        ),
        (
            "teamwork",
            "Working with others",
            "Describe a disagreement within a team and how it was resolved.",
        ),
        (
            "motivation",
            "Why this role",
            "What draws you to this position and what do you hope to learn?",
        ),
    ]
    .into_iter()
    .map(|(id, title, description)| Question {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
    })
    .collect();

    Ok(QuestionCatalog::new(questions)?)
}
