use crate::{AppCommand, AppError, presenter};

use std::io::BufRead;

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, error};

/// Forwards stdin lines as parsed commands on a single blocking task.
///
/// End of input becomes `Quit`. The task ends when the receiver is dropped
/// and the next line fails to send.
pub(crate) fn spawn_command_reader(command_tx: mpsc::Sender<AppCommand>) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    error!(error = ?e, "Failed to read stdin");
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<AppCommand>() {
                Ok(command) => {
                    if command_tx.blocking_send(command).is_err() {
                        return;
                    }
                }
                Err(AppError::UnknownCommand { input, .. }) => {
                    presenter::notice(&format!("Unknown command: {}. Type `help`.", input));
                }
                Err(e) => error!(error = ?e, "Failed to parse command"),
            }
        }

        debug!("Input closed");
        let _ = command_tx.blocking_send(AppCommand::Quit);
    })
}
