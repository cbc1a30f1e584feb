//! Mock capture device and manual timer shared by the core tests.

#![allow(clippy::unwrap_used)]

use crate::{
    CaptureDevice, ChunkSink, CoreResult, MediaChunk, Question, QuestionCatalog, RecorderError,
    RecorderHandle, RecorderId, StreamHandle, TimerGeneration, TimerService,
};

use std::{
    collections::HashMap,
    panic::Location,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use error_location::ErrorLocation;

pub(crate) const MOCK_MEDIA_TYPE: &str = "video/webm";

/// Capture device that records every call and can be told to fail.
#[derive(Default)]
pub(crate) struct MockDevice {
    pub(crate) fail_acquire: AtomicBool,
    pub(crate) fail_begin: AtomicBool,
    pub(crate) acquired: AtomicUsize,
    pub(crate) released: AtomicUsize,
    pub(crate) stopped: AtomicUsize,
    sinks: Mutex<HashMap<RecorderId, ChunkSink>>,
    tail: Mutex<Vec<MediaChunk>>,
}

impl MockDevice {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn failing() -> Arc<Self> {
        let device = Self::default();
        device.fail_acquire.store(true, Ordering::SeqCst);
        Arc::new(device)
    }

    /// Streams acquired and not yet released.
    pub(crate) fn outstanding(&self) -> usize {
        self.acquired.load(Ordering::SeqCst) - self.released.load(Ordering::SeqCst)
    }

    pub(crate) fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Recorder that currently has a sink attached.
    pub(crate) fn active_recorder(&self) -> Option<RecorderId> {
        self.sinks.lock().unwrap().keys().next().copied()
    }

    /// Pushes `bytes` through the sink of the active recorder.
    pub(crate) fn emit(&self, bytes: &[u8]) {
        let sinks = self.sinks.lock().unwrap();
        for (recorder, sink) in sinks.iter() {
            sink(*recorder, MediaChunk::new(bytes.to_vec()));
        }
    }

    /// Chunks `stop` will hand back as the finalized tail.
    pub(crate) fn set_tail(&self, chunks: Vec<Vec<u8>>) {
        *self.tail.lock().unwrap() = chunks.into_iter().map(MediaChunk::new).collect();
    }
}

impl CaptureDevice for MockDevice {
    fn acquire(&self) -> CoreResult<StreamHandle> {
        if self.fail_acquire.load(Ordering::SeqCst) {
            return Err(RecorderError::DeviceUnavailable {
                reason: "Permission denied".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(StreamHandle::new())
    }

    fn begin_recording(&self, _stream: &StreamHandle) -> CoreResult<RecorderHandle> {
        if self.fail_begin.load(Ordering::SeqCst) {
            return Err(RecorderError::DeviceUnavailable {
                reason: "Encoder failed".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(RecorderHandle::new())
    }

    fn on_chunk(&self, recorder: &RecorderHandle, sink: ChunkSink) {
        self.sinks.lock().unwrap().insert(recorder.id(), sink);
    }

    fn stop(&self, recorder: RecorderHandle) -> Vec<MediaChunk> {
        self.stopped.fetch_add(1, Ordering::SeqCst);
        self.sinks.lock().unwrap().remove(&recorder.id());
        std::mem::take(&mut *self.tail.lock().unwrap())
    }

    fn release(&self, _stream: StreamHandle) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }

    fn media_type(&self) -> String {
        MOCK_MEDIA_TYPE.to_string()
    }
}

#[derive(Debug, Default)]
pub(crate) struct TimerProbe {
    pub(crate) running: Option<TimerGeneration>,
    pub(crate) starts: usize,
    pub(crate) stops: usize,
}

/// Timer that never ticks by itself; tests deliver ticks explicitly.
#[derive(Clone, Default)]
pub(crate) struct ManualTimer {
    probe: Arc<Mutex<TimerProbe>>,
}

impl ManualTimer {
    pub(crate) fn running(&self) -> Option<TimerGeneration> {
        self.probe.lock().unwrap().running
    }

    pub(crate) fn starts(&self) -> usize {
        self.probe.lock().unwrap().starts
    }

    pub(crate) fn stops(&self) -> usize {
        self.probe.lock().unwrap().stops
    }
}

impl TimerService for ManualTimer {
    fn start(&mut self, generation: TimerGeneration) {
        let mut probe = self.probe.lock().unwrap();
        probe.running = Some(generation);
        probe.starts += 1;
    }

    fn stop(&mut self) {
        let mut probe = self.probe.lock().unwrap();
        probe.running = None;
        probe.stops += 1;
    }
}

/// Collects chunks pushed through the sink so a test can feed them back
/// into the session, the way the event loop would.
#[derive(Clone, Default)]
pub(crate) struct ChunkQueue {
    chunks: Arc<Mutex<Vec<(RecorderId, MediaChunk)>>>,
}

impl ChunkQueue {
    pub(crate) fn sink(&self) -> ChunkSink {
        let chunks = Arc::clone(&self.chunks);
        Arc::new(move |recorder, chunk| chunks.lock().unwrap().push((recorder, chunk)))
    }

    pub(crate) fn drain(&self) -> Vec<(RecorderId, MediaChunk)> {
        std::mem::take(&mut *self.chunks.lock().unwrap())
    }
}

pub(crate) fn question(id: &str) -> Question {
    Question {
        id: id.to_string(),
        title: format!("Question {}", id),
        description: format!("Tell us about {}", id),
    }
}

pub(crate) fn catalog(count: usize) -> Arc<QuestionCatalog> {
    let questions = (0..count).map(|i| question(&format!("q{}", i))).collect();
    Arc::new(QuestionCatalog::new(questions).unwrap())
}
