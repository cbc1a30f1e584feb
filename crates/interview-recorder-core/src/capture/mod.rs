mod device;
mod microphone;

pub use {
    device::{
        CaptureDevice, ChunkSink, MediaArtifact, MediaChunk, RecorderHandle, RecorderId,
        StreamHandle,
    },
    microphone::MicrophoneDevice,
};

#[cfg(test)]
pub(crate) use microphone::{ChunkRoute, PCM_MEDIA_TYPE, encode_samples};
