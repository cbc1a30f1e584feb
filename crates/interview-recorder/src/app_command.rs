use crate::{AppError, AppResult};

use std::{panic::Location, str::FromStr};

use error_location::ErrorLocation;
use interview_recorder_core::Intent;

/// Commands read from the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Show the question list.
    List,
    /// Open the recorder on a question.
    Answer {
        /// Id of the question to start from.
        question_id: String,
    },
    /// Forward a candidate intent to the open interview.
    Intent(Intent),
    /// Leave the recorder and return to the list.
    Home,
    /// Show the command reference.
    Help,
    /// Request application shutdown.
    Quit,
}

impl FromStr for AppCommand {
    type Err = AppError;

    #[track_caller]
    fn from_str(input: &str) -> AppResult<Self> {
        let mut words = input.split_whitespace();
        let verb = words.next().unwrap_or_default().to_ascii_lowercase();

        let command = match verb.as_str() {
            "list" | "ls" => AppCommand::List,
            "answer" | "a" => match words.next() {
                Some(id) => AppCommand::Answer {
                    question_id: id.to_string(),
                },
                None => {
                    return Err(AppError::UnknownCommand {
                        input: "answer needs a question id".to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            },
            "record" | "r" => AppCommand::Intent(Intent::Record),
            "stop" | "s" => AppCommand::Intent(Intent::Stop),
            "reset" => AppCommand::Intent(Intent::Reset),
            "next" | "n" => AppCommand::Intent(Intent::Next),
            "prev" | "previous" | "p" => AppCommand::Intent(Intent::Previous),
            "finish" | "f" => AppCommand::Intent(Intent::Finish),
            "home" | "back" => AppCommand::Home,
            "help" | "?" => AppCommand::Help,
            "quit" | "exit" | "q" => AppCommand::Quit,
            _ => {
                return Err(AppError::UnknownCommand {
                    input: input.trim().to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        Ok(command)
    }
}
