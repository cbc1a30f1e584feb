use crate::{
    CoreResult,
    capture::{
        CaptureDevice, ChunkSink, MediaArtifact, MediaChunk, RecorderHandle, RecorderId,
        StreamHandle,
    },
    session::{AcquisitionTicket, RecordingOptions, RecordingPhase, TickOutcome},
    timer::{self, TimerGeneration, TimerService},
};

use std::{mem, sync::Arc};

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

enum Take {
    Idle {
        pending: Option<AcquisitionTicket>,
    },
    Recording {
        take_id: Uuid,
        stream: StreamHandle,
        recorder: RecorderHandle,
        buffered: Vec<MediaChunk>,
        generation: TimerGeneration,
    },
    Reviewing {
        take_id: Uuid,
        /// Recorder that produced the take; its chunks still in flight at
        /// stop time are accepted here.
        recorder: RecorderId,
        media: Vec<MediaChunk>,
        /// Trailing chunks returned by the device on stop. Late chunks are
        /// inserted before them.
        tail_len: usize,
        media_type: String,
    },
}

impl Take {
    fn idle() -> Self {
        Take::Idle { pending: None }
    }
}

/// Recording state machine for the question currently on screen.
///
/// Owns the timer and, while recording, the device stream and recorder
/// handles. Every path out of `Recording` (manual stop, auto-stop, question
/// switch, drop) stops the timer, stops the recorder and releases the
/// stream exactly once.
///
/// The session does not know about answered flags. Operations that imply
/// a flag change report it through their return value and the owner
/// applies it.
pub struct RecordingSession<D: CaptureDevice, T: TimerService> {
    device: Arc<D>,
    timer: T,
    sink: ChunkSink,
    max_duration_seconds: u32,
    elapsed_seconds: u32,
    generation: TimerGeneration,
    take: Take,
}

impl<D: CaptureDevice, T: TimerService> RecordingSession<D, T> {
    /// Creates an idle session.
    ///
    /// `sink` is handed to every recorder; it must forward chunks back
    /// into [`accept_chunk`](Self::accept_chunk).
    pub fn new(device: Arc<D>, timer: T, sink: ChunkSink, options: RecordingOptions) -> Self {
        Self {
            device,
            timer,
            sink,
            max_duration_seconds: options.max_duration_seconds(),
            elapsed_seconds: 0,
            generation: TimerGeneration::new(0),
            take: Take::idle(),
        }
    }

    /// Current phase. A pending device request reports `Idle`.
    pub fn phase(&self) -> RecordingPhase {
        match self.take {
            Take::Idle { .. } => RecordingPhase::Idle,
            Take::Recording { .. } => RecordingPhase::Recording,
            Take::Reviewing { .. } => RecordingPhase::Reviewing,
        }
    }

    /// Whether a device request is outstanding.
    pub fn is_acquiring(&self) -> bool {
        matches!(self.take, Take::Idle { pending: Some(_) })
    }

    /// Seconds recorded in the current take.
    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    /// Per-take limit.
    pub fn max_duration_seconds(&self) -> u32 {
        self.max_duration_seconds
    }

    /// Seconds left before auto-stop, clamped at zero.
    pub fn remaining_seconds(&self) -> u32 {
        timer::remaining_seconds(self.max_duration_seconds, self.elapsed_seconds)
    }

    /// Remaining time as `MM:SS`.
    pub fn countdown(&self) -> String {
        timer::format_countdown(self.remaining_seconds())
    }

    /// Whether the take ran into the time limit.
    pub fn is_capped(&self) -> bool {
        self.elapsed_seconds >= self.max_duration_seconds
    }

    /// Finalized chunks. Empty unless `Reviewing`.
    pub fn captured_media(&self) -> &[MediaChunk] {
        match &self.take {
            Take::Reviewing { media, .. } => media,
            _ => &[],
        }
    }

    /// Playable blob for the take under review.
    pub fn artifact(&self) -> Option<MediaArtifact> {
        match &self.take {
            Take::Reviewing {
                media, media_type, ..
            } if !media.is_empty() => Some(MediaArtifact::assemble(media_type, media)),
            _ => None,
        }
    }

    /// Asks for a device stream.
    ///
    /// Returns the ticket the acquisition result must carry, or `None` if
    /// the session is not idle or a request is already pending.
    #[instrument(skip(self))]
    pub fn request_start(&mut self) -> Option<AcquisitionTicket> {
        match self.take {
            Take::Idle { pending: None } => {
                let ticket = AcquisitionTicket::new();
                self.take = Take::Idle {
                    pending: Some(ticket),
                };
                debug!(ticket = %ticket, "Device acquisition requested");
                Some(ticket)
            }
            _ => {
                debug!(phase = ?self.phase(), "Start rejected");
                None
            }
        }
    }

    /// Applies the result of a device request.
    ///
    /// Returns `Ok(true)` when recording began, `Ok(false)` when the ticket
    /// was stale (any stream it carried is released immediately).
    ///
    /// # Errors
    ///
    /// Returns `DeviceUnavailable` if acquisition or recorder start-up
    /// failed. The session is left idle with no pending request.
    #[instrument(skip(self, result))]
    pub fn complete_acquisition(
        &mut self,
        ticket: AcquisitionTicket,
        result: CoreResult<StreamHandle>,
    ) -> CoreResult<bool> {
        let is_current = matches!(self.take, Take::Idle { pending: Some(p) } if p == ticket);

        if !is_current {
            match result {
                Ok(stream) => {
                    debug!(ticket = %ticket, "Releasing stream from abandoned start");
                    self.device.release(stream);
                }
                Err(e) => debug!(ticket = %ticket, error = ?e, "Abandoned start failed"),
            }
            return Ok(false);
        }

        self.take = Take::idle();

        let stream = result?;
        let recorder = match self.device.begin_recording(&stream) {
            Ok(recorder) => recorder,
            Err(e) => {
                self.device.release(stream);
                return Err(e);
            }
        };
        self.device.on_chunk(&recorder, Arc::clone(&self.sink));

        self.generation = self.generation.next();
        self.elapsed_seconds = 0;
        self.timer.start(self.generation);

        let take_id = Uuid::new_v4();
        self.take = Take::Recording {
            take_id,
            stream,
            recorder,
            buffered: Vec::new(),
            generation: self.generation,
        };

        info!(
            take_id = %take_id,
            max_duration_seconds = self.max_duration_seconds,
            "Recording started"
        );

        Ok(true)
    }

    /// Buffers a chunk pushed by the active recorder.
    ///
    /// Chunks from the recorder of the take under review were captured
    /// before stop and only delivered afterwards; they join that take ahead
    /// of its tail. Zero-byte chunks and chunks from any other recorder are
    /// dropped.
    pub fn accept_chunk(&mut self, recorder_id: RecorderId, chunk: MediaChunk) -> bool {
        if chunk.is_empty() {
            return false;
        }

        match &mut self.take {
            Take::Recording {
                recorder, buffered, ..
            } if recorder.id() == recorder_id => {
                buffered.push(chunk);
                true
            }
            Take::Reviewing {
                take_id,
                recorder,
                media,
                tail_len,
                ..
            } if *recorder == recorder_id => {
                let at = media.len().saturating_sub(*tail_len);
                media.insert(at, chunk);
                debug!(take_id = %take_id, "Late chunk added to finished take");
                true
            }
            _ => {
                debug!(recorder_id = %recorder_id, "Discarding chunk outside active take");
                false
            }
        }
    }

    /// Counts one second of the take tagged `generation`.
    ///
    /// Reaching the limit stops the take. Ticks from another generation or
    /// outside `Recording` are ignored.
    pub fn tick(&mut self, generation: TimerGeneration) -> TickOutcome {
        match self.take {
            Take::Recording {
                generation: current,
                ..
            } if current == generation => {}
            _ => {
                debug!(generation = %generation, "Discarding stale timer tick");
                return TickOutcome::Ignored;
            }
        }

        self.elapsed_seconds = (self.elapsed_seconds + 1).min(self.max_duration_seconds);

        if self.is_capped() {
            info!(elapsed_seconds = self.elapsed_seconds, "Time limit reached");
            self.stop();
            TickOutcome::AutoStopped
        } else {
            TickOutcome::Counted
        }
    }

    /// Finalizes the running take.
    ///
    /// Returns `true` if a take was stopped, which means the current
    /// question now counts as answered. A no-op returning `false` outside
    /// `Recording`, so a manual stop racing the auto-stop runs once.
    #[instrument(skip(self))]
    pub fn stop(&mut self) -> bool {
        match mem::replace(&mut self.take, Take::idle()) {
            Take::Recording {
                take_id,
                stream,
                recorder,
                mut buffered,
                ..
            } => {
                self.timer.stop();
                let recorder_id = recorder.id();
                let tail: Vec<MediaChunk> = self
                    .device
                    .stop(recorder)
                    .into_iter()
                    .filter(|chunk| !chunk.is_empty())
                    .collect();
                self.device.release(stream);

                let tail_len = tail.len();
                buffered.extend(tail);

                info!(
                    take_id = %take_id,
                    elapsed_seconds = self.elapsed_seconds,
                    chunk_count = buffered.len(),
                    "Recording stopped"
                );

                self.take = Take::Reviewing {
                    take_id,
                    recorder: recorder_id,
                    media: buffered,
                    tail_len,
                    media_type: self.device.media_type(),
                };
                true
            }
            other => {
                self.take = other;
                false
            }
        }
    }

    /// Throws away a reviewed take.
    ///
    /// Returns `true` if the take was cleared, which means the current
    /// question is no longer answered. Only valid in `Reviewing`.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> bool {
        match &self.take {
            Take::Reviewing { take_id, .. } => {
                info!(take_id = %take_id, "Take reset");
                self.take = Take::idle();
                self.elapsed_seconds = 0;
                true
            }
            _ => {
                debug!(phase = ?self.phase(), "Reset rejected");
                false
            }
        }
    }

    /// Returns to a clean `Idle` for a different question.
    ///
    /// A running take is stopped first; the return value says whether that
    /// happened, so the owner can mark the question being left as
    /// answered. A pending device request is abandoned.
    #[instrument(skip(self))]
    pub fn discard_take(&mut self) -> bool {
        let stopped = self.stop();

        if let Take::Idle {
            pending: Some(ticket),
        } = self.take
        {
            debug!(ticket = %ticket, "Abandoning pending device request");
        }

        self.take = Take::idle();
        self.elapsed_seconds = 0;

        stopped
    }
}

impl<D: CaptureDevice, T: TimerService> Drop for RecordingSession<D, T> {
    fn drop(&mut self) {
        if self.discard_take() {
            warn!("Recording session dropped mid-take");
        }
    }
}
