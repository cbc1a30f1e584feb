//! Interview Recorder: answer a fixed set of interview questions with
//! short, time-limited microphone takes from the terminal.

mod app;
mod app_command;
mod catalog_loader;
mod command_reader;
mod config;
mod error;
mod presenter;
mod tick_timer;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    tick_timer::TokioTimer,
};

use crate::config::Config;

use std::sync::Arc;

use interview_recorder_core::MicrophoneDevice;
use tracing::error;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "interview_recorder=debug,interview_recorder_core=debug";

/// Application entry point.
fn main() {
    // Logs go to stderr so they can be redirected away from the prompt.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let options = match config.recording_options() {
        Ok(o) => o,
        Err(e) => {
            error!("Recording options invalid: {:?}", e);
            std::process::exit(1);
        }
    };

    let catalog = match catalog_loader::load_catalog(&config.catalog) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Failed to load questions: {:?}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    let app = App::new(catalog, options, Arc::new(MicrophoneDevice::new()));

    rt.block_on(async {
        if let Err(e) = app.run().await {
            error!(error = ?e, "App error");
        }
    });

    // The stdin reader may still be blocked on a read.
    rt.shutdown_background();
}
