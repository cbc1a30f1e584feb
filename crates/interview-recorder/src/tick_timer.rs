use interview_recorder_core::{InterviewEvent, TimerGeneration, TimerService};

use std::time::Duration;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::debug;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// One-second timer backed by a tokio task.
///
/// Each tick is sent into the interview event channel tagged with the
/// generation it was started for. Must be started from within a tokio
/// runtime.
pub(crate) struct TokioTimer {
    event_tx: mpsc::UnboundedSender<InterviewEvent>,
    task: Option<JoinHandle<()>>,
}

impl TokioTimer {
    pub(crate) fn new(event_tx: mpsc::UnboundedSender<InterviewEvent>) -> Self {
        Self {
            event_tx,
            task: None,
        }
    }
}

impl TimerService for TokioTimer {
    fn start(&mut self, generation: TimerGeneration) {
        self.stop();

        let event_tx = self.event_tx.clone();
        let mut interval = tokio::time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.task = Some(tokio::spawn(async move {
            loop {
                interval.tick().await;
                if event_tx.send(InterviewEvent::TimerTick { generation }).is_err() {
                    debug!(generation = %generation, "Event channel closed, timer exiting");
                    break;
                }
            }
        }));

        debug!(generation = %generation, "Timer started");
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Timer stopped");
        }
    }
}

impl Drop for TokioTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
