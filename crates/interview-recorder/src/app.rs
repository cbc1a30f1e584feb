use crate::{
    AppCommand, AppError, AppResult, TokioTimer, command_reader::spawn_command_reader, presenter,
};

use std::{panic::Location, sync::Arc, time::Duration};

use error_location::ErrorLocation;
use interview_recorder_core::{
    AcquisitionTicket, CaptureDevice, ChunkSink, Effect, Interview, InterviewEvent,
    QuestionCatalog, RecorderError, RecordingOptions,
};
use tokio::sync::mpsc::{self, error::SendError};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

const READER_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(250);

pub(crate) struct ActiveInterview<D: CaptureDevice> {
    pub(crate) session_id: Uuid,
    pub(crate) interview: Interview<D, TokioTimer>,
}

/// Main application state.
///
/// Owns the interview event channel. Timer ticks, recorder chunks and
/// device acquisition results all arrive on it and are applied one at a
/// time alongside terminal commands.
pub struct App<D: CaptureDevice + 'static> {
    pub(crate) catalog: Arc<QuestionCatalog>,
    pub(crate) options: RecordingOptions,
    pub(crate) device: Arc<D>,
    pub(crate) event_tx: mpsc::UnboundedSender<InterviewEvent>,
    pub(crate) event_rx: mpsc::UnboundedReceiver<InterviewEvent>,
    pub(crate) interview: Option<ActiveInterview<D>>,
}

impl<D: CaptureDevice + 'static> App<D> {
    pub(crate) fn new(
        catalog: Arc<QuestionCatalog>,
        options: RecordingOptions,
        device: Arc<D>,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Self {
            catalog,
            options,
            device,
            event_tx,
            event_rx,
            interview: None,
        }
    }

    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!(
            question_count = self.catalog.len(),
            max_duration_seconds = self.options.max_duration_seconds(),
            "Interview Recorder starting"
        );

        let (command_tx, mut command_rx) = mpsc::channel(32);
        let reader_handle = spawn_command_reader(command_tx);

        presenter::show_catalog(&self.catalog);

        loop {
            tokio::select! {
                Some(command) = command_rx.recv() => {
                    if command == AppCommand::Quit {
                        info!("Shutdown requested");
                        break;
                    }
                    if let Err(e) = self.handle_command(command) {
                        error!(error = ?e, "Failed to handle command");
                        presenter::notice(&describe(&e));
                    }
                }

                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        self.close_interview();
        drop(command_rx);

        match tokio::time::timeout(READER_SHUTDOWN_TIMEOUT, reader_handle).await {
            Ok(Ok(())) => info!("Command reader stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Command reader task panicked"),
            Err(_) => debug!("Command reader still blocked on stdin, will be cleaned up on exit"),
        }

        info!("Interview Recorder shut down successfully");

        Ok(())
    }

    /// Applies one terminal command. `Quit` is handled by the run loop.
    #[instrument(skip(self))]
    pub(crate) fn handle_command(&mut self, command: AppCommand) -> AppResult<()> {
        match command {
            AppCommand::List => presenter::show_catalog(&self.catalog),
            AppCommand::Help => presenter::show_help(),
            AppCommand::Answer { question_id } => self.open_interview(&question_id)?,
            AppCommand::Intent(intent) => {
                if self.interview.is_some() {
                    self.handle_event(InterviewEvent::User(intent));
                } else {
                    presenter::notice("No question open. Type `answer <id>` first.");
                }
            }
            AppCommand::Home => {
                self.close_interview();
                presenter::show_catalog(&self.catalog);
            }
            AppCommand::Quit => {}
        }

        Ok(())
    }

    /// Feeds one event to the open interview and redraws.
    pub(crate) fn handle_event(&mut self, event: InterviewEvent) {
        let Some(active) = self.interview.as_mut() else {
            if let InterviewEvent::DeviceAcquired {
                result: Ok(stream), ..
            } = event
            {
                debug!("Releasing stream acquired after interview closed");
                self.device.release(stream);
            }
            return;
        };

        let is_tick = matches!(event, InterviewEvent::TimerTick { .. });
        let redraw = !is_tick && !matches!(event, InterviewEvent::ChunkReceived { .. });

        let effects = active.interview.handle(event);
        let changed = !effects.is_empty();
        self.apply_effects(effects);

        if let Some(active) = &self.interview {
            let view = active.interview.view();
            if redraw || changed {
                presenter::show_view(&view);
            } else if is_tick {
                presenter::show_countdown(&view);
            }
        }
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::AcquireDevice { ticket } => self.spawn_acquisition(ticket),
                Effect::DeviceUnavailable { reason } => {
                    presenter::notice(&format!("Could not start recording: {}", reason));
                }
                Effect::AnsweredChanged {
                    question_index,
                    answered,
                } => debug!(question_index, answered, "Answered flag changed"),
                Effect::QuestionChanged { question_index } => {
                    info!(question_index, "Question changed");
                }
                Effect::SessionComplete(completion) => {
                    self.close_interview();
                    presenter::show_completion(&completion);
                    presenter::show_catalog(&self.catalog);
                }
            }
        }
    }

    /// Opens `question_id`, replacing any open interview only once the id
    /// is known to exist.
    #[track_caller]
    fn open_interview(&mut self, question_id: &str) -> AppResult<()> {
        let interview = Interview::new(
            Arc::clone(&self.catalog),
            question_id,
            Arc::clone(&self.device),
            TokioTimer::new(self.event_tx.clone()),
            chunk_sink(self.event_tx.clone()),
            self.options,
        )?;

        let session_id = Uuid::new_v4();
        info!(session_id = %session_id, question_id, "Interview started");

        self.close_interview();
        presenter::show_view(&interview.view());
        self.interview = Some(ActiveInterview {
            session_id,
            interview,
        });

        Ok(())
    }

    fn close_interview(&mut self) {
        if let Some(active) = self.interview.take() {
            info!(
                session_id = %active.session_id,
                answered = active.interview.navigator().answered().count(),
                complete = active.interview.is_complete(),
                "Interview closed"
            );
        }
    }

    /// Acquires the device off the event loop and reports back on the
    /// event channel.
    fn spawn_acquisition(&self, ticket: AcquisitionTicket) {
        let device = Arc::clone(&self.device);
        let event_tx = self.event_tx.clone();

        tokio::spawn(async move {
            let acquiring = Arc::clone(&device);
            let result = match tokio::task::spawn_blocking(move || acquiring.acquire()).await {
                Ok(result) => result,
                Err(e) => Err(RecorderError::DeviceUnavailable {
                    reason: format!("Acquisition task failed: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                }),
            };

            if let Err(SendError(event)) =
                event_tx.send(InterviewEvent::DeviceAcquired { ticket, result })
            {
                warn!(ticket = %ticket, "Event channel closed before acquisition finished");
                if let InterviewEvent::DeviceAcquired {
                    result: Ok(stream), ..
                } = event
                {
                    device.release(stream);
                }
            }
        });
    }
}

/// Sink handed to every recorder; forwards chunks onto the event channel.
pub(crate) fn chunk_sink(event_tx: mpsc::UnboundedSender<InterviewEvent>) -> ChunkSink {
    Arc::new(move |recorder, chunk| {
        if event_tx
            .send(InterviewEvent::ChunkReceived { recorder, chunk })
            .is_err()
        {
            debug!(recorder_id = %recorder, "Event channel closed, chunk dropped");
        }
    })
}

fn describe(error: &AppError) -> String {
    match error {
        AppError::Recorder {
            source: RecorderError::UnknownQuestion { id, .. },
            ..
        } => format!("No question with id `{}`. Type `list` to see them.", id),
        other => other.to_string(),
    }
}
