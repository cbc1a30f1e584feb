//! Terminal rendering of the question list and the recorder screen.
//!
//! `render_*` functions build the text so it can be checked without a
//! terminal; `show_*` print it.

use interview_recorder_core::{Completion, InterviewView, QuestionCatalog, RecordingPhase};

use std::fmt::Write;

const HELP: &str = "\
Commands:
  list            show all questions
  answer <id>     open the recorder on a question
  record          start a take
  stop            stop the running take
  reset           discard the take under review
  next / prev     move between questions
  finish          complete the interview once every question is answered
  home            back to the question list
  quit            exit";

/// Question list with the id to pass to `answer`.
pub(crate) fn render_catalog(catalog: &QuestionCatalog) -> String {
    let mut out = String::from("Questions:\n");
    for (index, question) in catalog.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. [{}] {}\n     {}",
            index + 1,
            question.id,
            question.title,
            question.description
        );
    }
    out.push_str("Type `answer <id>` to begin.");
    out
}

/// Recorder screen for the current state.
pub(crate) fn render_view(view: &InterviewView) -> String {
    let mut out = String::new();

    let check = if view.show_answered { " ✓" } else { "" };
    let _ = writeln!(
        out,
        "Question {}/{}: {}{}",
        view.question_index + 1,
        view.question_count,
        view.title,
        check
    );
    let _ = writeln!(out, "  {}", view.description);

    let status = match (view.phase, view.acquiring, &view.countdown) {
        (_, true, _) => "Waiting for the microphone...".to_string(),
        (RecordingPhase::Recording, _, Some(countdown)) => format!("● Recording {}", countdown),
        (RecordingPhase::Recording, _, None) => "● Recording".to_string(),
        (RecordingPhase::Reviewing, _, _) => "Take ready for review".to_string(),
        (RecordingPhase::Idle, _, _) => "Ready".to_string(),
    };
    let _ = writeln!(out, "  {}", status);

    let progress: String = view
        .answered
        .iter()
        .map(|answered| if *answered { '■' } else { '□' })
        .collect();
    let _ = writeln!(out, "  Answered: {}", progress);

    let controls: Vec<&str> = [
        (view.can_record, "record"),
        (view.can_stop, "stop"),
        (view.can_reset, "reset"),
        (view.can_previous, "prev"),
        (view.can_next, "next"),
        (view.can_finish, "finish"),
        (true, "home"),
    ]
    .into_iter()
    .filter_map(|(enabled, name)| enabled.then_some(name))
    .collect();
    let _ = write!(out, "  [{}]", controls.join("] ["));

    out
}

/// Single countdown line shown on each timer tick.
pub(crate) fn render_countdown(view: &InterviewView) -> Option<String> {
    view.countdown
        .as_ref()
        .map(|countdown| format!("  ● Recording {}", countdown))
}

pub(crate) fn render_completion(completion: &Completion) -> String {
    format!(
        "Interview complete: all {} questions answered.",
        completion.question_count
    )
}

pub(crate) fn show_catalog(catalog: &QuestionCatalog) {
    println!("{}", render_catalog(catalog));
}

pub(crate) fn show_view(view: &InterviewView) {
    println!("{}", render_view(view));
}

pub(crate) fn show_countdown(view: &InterviewView) {
    if let Some(line) = render_countdown(view) {
        println!("{}", line);
    }
}

pub(crate) fn show_completion(completion: &Completion) {
    println!("{}", render_completion(completion));
}

pub(crate) fn show_help() {
    println!("{}", HELP);
}

pub(crate) fn notice(message: &str) {
    println!("! {}", message);
}
