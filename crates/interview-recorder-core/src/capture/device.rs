use crate::CoreResult;

use std::sync::Arc;

use uuid::Uuid;

/// Token proving a capture stream was acquired.
///
/// Move-only: [`CaptureDevice::release`] consumes it, so a stream can be
/// released at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct StreamHandle {
    id: Uuid,
}

impl StreamHandle {
    /// Mints a handle for a freshly acquired stream.
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }

    /// Identifier used by adapters to look up their stream state.
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Default for StreamHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier tagging every chunk a recorder delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecorderId(Uuid);

impl RecorderId {
    /// Fresh random recorder id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecorderId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecorderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Token for an active encoder attached to a stream. Consumed by `stop`.
#[derive(Debug, PartialEq, Eq)]
pub struct RecorderHandle {
    id: RecorderId,
}

impl RecorderHandle {
    /// Mints a handle for a freshly started recorder.
    pub fn new() -> Self {
        Self {
            id: RecorderId::new(),
        }
    }

    /// Id carried by chunks from this recorder.
    pub fn id(&self) -> RecorderId {
        self.id
    }
}

impl Default for RecorderHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// One piece of encoded media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaChunk(Vec<u8>);

impl MediaChunk {
    /// Wraps encoded bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    /// Byte length.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Zero-byte chunks carry nothing and are dropped by the session.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Reviewable media assembled from a finished take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaArtifact {
    /// Media type reported by the capture device.
    pub media_type: String,
    /// All chunks of the take, concatenated in arrival order.
    pub bytes: Vec<u8>,
}

impl MediaArtifact {
    /// Concatenates `chunks` into one playable blob.
    pub fn assemble(media_type: &str, chunks: &[MediaChunk]) -> Self {
        let total = chunks.iter().map(MediaChunk::len).sum();
        let mut bytes = Vec::with_capacity(total);
        for chunk in chunks {
            bytes.extend_from_slice(chunk.bytes());
        }

        Self {
            media_type: media_type.to_string(),
            bytes,
        }
    }
}

/// Callback receiving chunks pushed by a recorder, from any thread.
pub type ChunkSink = Arc<dyn Fn(RecorderId, MediaChunk) + Send + Sync>;

/// Platform capture primitive used by the recording session.
///
/// `acquire` may block (permission prompts, device start-up) and is
/// therefore called off the event loop; every other method must return
/// promptly.
pub trait CaptureDevice: Send + Sync {
    /// Opens the capture stream.
    ///
    /// # Errors
    ///
    /// Returns `DeviceUnavailable` if the device is missing or denied.
    fn acquire(&self) -> CoreResult<StreamHandle>;

    /// Attaches an encoder to an acquired stream and starts it.
    ///
    /// # Errors
    ///
    /// Returns `DeviceUnavailable` if the encoder cannot start.
    fn begin_recording(&self, stream: &StreamHandle) -> CoreResult<RecorderHandle>;

    /// Routes chunks produced by `recorder` to `sink`.
    fn on_chunk(&self, recorder: &RecorderHandle, sink: ChunkSink);

    /// Stops the encoder and returns any chunks not yet pushed to the sink.
    fn stop(&self, recorder: RecorderHandle) -> Vec<MediaChunk>;

    /// Returns the stream to the platform.
    fn release(&self, stream: StreamHandle);

    /// Media type of the encoded chunks.
    fn media_type(&self) -> String;
}
