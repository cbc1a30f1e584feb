use crate::{
    CoreResult, RecorderError,
    capture::{CaptureDevice, ChunkSink, MediaChunk, RecorderHandle, RecorderId, StreamHandle},
};

use std::{
    collections::HashMap,
    mem,
    panic::Location,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering},
    },
};

use cpal::{
    Stream,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Media type before any stream has been opened.
pub(crate) const PCM_MEDIA_TYPE: &str = "audio/pcm;format=f32le";

/// Where the audio callback sends encoded chunks.
///
/// Chunks produced before a sink is attached are held back and flushed on
/// `attach`. After that every chunk goes straight to the sink, so `finish`
/// only returns chunks when the recorder stopped before `on_chunk` ran.
pub(crate) struct ChunkRoute {
    recorder: RecorderId,
    pending: Vec<MediaChunk>,
    sink: Option<ChunkSink>,
}

impl ChunkRoute {
    pub(crate) fn new(recorder: RecorderId) -> Self {
        Self {
            recorder,
            pending: Vec::new(),
            sink: None,
        }
    }

    pub(crate) fn push(&mut self, chunk: MediaChunk) {
        match &self.sink {
            Some(sink) => sink(self.recorder, chunk),
            None => self.pending.push(chunk),
        }
    }

    pub(crate) fn attach(&mut self, sink: ChunkSink) {
        for chunk in self.pending.drain(..) {
            sink(self.recorder, chunk);
        }
        self.sink = Some(sink);
    }

    pub(crate) fn finish(&mut self) -> Vec<MediaChunk> {
        self.sink = None;
        mem::take(&mut self.pending)
    }
}

/// Encodes one callback's worth of samples as little-endian `f32` bytes.
pub(crate) fn encode_samples(data: &[f32]) -> MediaChunk {
    let mut bytes = Vec::with_capacity(data.len() * 4);
    for sample in data {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    MediaChunk::new(bytes)
}

type SharedRoute = Arc<Mutex<Option<ChunkRoute>>>;

struct OpenStream {
    stream: Stream,
    route: SharedRoute,
    /// Checked by the audio callback before touching `route`, so nothing is
    /// written after `release` starts tearing the stream down.
    shutdown: Arc<AtomicBool>,
}

/// Capture adapter for the default microphone, backed by CPAL.
///
/// Acquiring builds the input stream paused; `begin_recording` plays it.
/// Each audio callback becomes one raw PCM chunk.
pub struct MicrophoneDevice {
    streams: Mutex<HashMap<Uuid, OpenStream>>,
    recorders: Mutex<HashMap<RecorderId, Uuid>>,
    media_type: Mutex<String>,
}

impl MicrophoneDevice {
    /// Creates the adapter. No device is touched until `acquire`.
    pub fn new() -> Self {
        Self {
            streams: Mutex::new(HashMap::new()),
            recorders: Mutex::new(HashMap::new()),
            media_type: Mutex::new(PCM_MEDIA_TYPE.to_string()),
        }
    }

    fn streams(&self) -> MutexGuard<'_, HashMap<Uuid, OpenStream>> {
        self.streams.lock().unwrap_or_else(|e| {
            error!("Stream table lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }

    fn recorders(&self) -> MutexGuard<'_, HashMap<RecorderId, Uuid>> {
        self.recorders.lock().unwrap_or_else(|e| {
            error!("Recorder table lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }

    fn route_for(&self, recorder: RecorderId) -> Option<SharedRoute> {
        let stream_id = *self.recorders().get(&recorder)?;
        self.streams()
            .get(&stream_id)
            .map(|open| Arc::clone(&open.route))
    }
}

impl Default for MicrophoneDevice {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_route(route: &SharedRoute) -> MutexGuard<'_, Option<ChunkRoute>> {
    route.lock().unwrap_or_else(|e| {
        error!("Chunk route lock poisoned, recovering: {}", e);
        e.into_inner()
    })
}

impl CaptureDevice for MicrophoneDevice {
    #[track_caller]
    #[instrument(skip(self))]
    fn acquire(&self) -> CoreResult<StreamHandle> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or(RecorderError::DeviceUnavailable {
                reason: "No microphone found".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let config = device
            .default_input_config()
            .map_err(|e| RecorderError::DeviceUnavailable {
                reason: format!("Failed to get config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let sample_rate = config.sample_rate();
        let channels = config.channels();

        let route: SharedRoute = Arc::new(Mutex::new(None));
        let shutdown = Arc::new(AtomicBool::new(false));
        let callback_route = Arc::clone(&route);
        let callback_shutdown = Arc::clone(&shutdown);

        let stream = device
            .build_input_stream(
                &config.into(),
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if callback_shutdown.load(Ordering::Acquire) || data.is_empty() {
                        return;
                    }
                    if let Some(route) = lock_route(&callback_route).as_mut() {
                        route.push(encode_samples(data));
                    }
                },
                |err| {
                    error!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| RecorderError::DeviceUnavailable {
                reason: format!("Failed to build stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        if let Err(e) = stream.pause() {
            debug!(error = %e, "Backend cannot pause a freshly built stream");
        }

        let handle = StreamHandle::new();
        self.streams().insert(
            handle.id(),
            OpenStream {
                stream,
                route,
                shutdown,
            },
        );

        *self.media_type.lock().unwrap_or_else(|e| e.into_inner()) = format!(
            "{};rate={};channels={}",
            PCM_MEDIA_TYPE, sample_rate, channels
        );

        info!(
            stream_id = %handle.id(),
            sample_rate,
            channels,
            "Microphone acquired"
        );

        Ok(handle)
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn begin_recording(&self, stream: &StreamHandle) -> CoreResult<RecorderHandle> {
        let recorder = RecorderHandle::new();

        {
            let streams = self.streams();
            let open = streams
                .get(&stream.id())
                .ok_or(RecorderError::DeviceUnavailable {
                    reason: "Stream was not acquired".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })?;

            *lock_route(&open.route) = Some(ChunkRoute::new(recorder.id()));

            open.stream
                .play()
                .map_err(|e| RecorderError::DeviceUnavailable {
                    reason: format!("Failed to start stream: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        }

        self.recorders().insert(recorder.id(), stream.id());
        info!(recorder_id = %recorder.id(), "Microphone recording started");

        Ok(recorder)
    }

    fn on_chunk(&self, recorder: &RecorderHandle, sink: ChunkSink) {
        match self.route_for(recorder.id()) {
            Some(route) => {
                if let Some(route) = lock_route(&route).as_mut() {
                    route.attach(sink);
                }
            }
            None => warn!(recorder_id = %recorder.id(), "Chunk sink for unknown recorder"),
        }
    }

    #[instrument(skip(self))]
    fn stop(&self, recorder: RecorderHandle) -> Vec<MediaChunk> {
        let Some(stream_id) = self.recorders().remove(&recorder.id()) else {
            warn!(recorder_id = %recorder.id(), "Stop for unknown recorder");
            return Vec::new();
        };

        let streams = self.streams();
        let Some(open) = streams.get(&stream_id) else {
            return Vec::new();
        };

        if let Err(e) = open.stream.pause() {
            warn!(error = %e, "Failed to pause stream");
        }

        let tail = lock_route(&open.route)
            .take()
            .map(|mut route| route.finish())
            .unwrap_or_default();

        // Chunks already handed to the sink may still be queued downstream;
        // the session keeps those for the stopped recorder.
        debug!(tail_chunks = tail.len(), "Microphone recording stopped");

        tail
    }

    #[instrument(skip(self))]
    fn release(&self, stream: StreamHandle) {
        self.recorders().retain(|_, stream_id| *stream_id != stream.id());

        if let Some(open) = self.streams().remove(&stream.id()) {
            open.shutdown.store(true, Ordering::Release);
            drop(open.stream);
            info!(stream_id = %stream.id(), "Microphone released");
        }
    }

    fn media_type(&self) -> String {
        self.media_type
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
