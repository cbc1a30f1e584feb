mod catalog_config;
#[allow(clippy::module_inception)]
mod config;
mod recording_config;

pub(crate) use {
    catalog_config::CatalogConfig, config::Config, recording_config::RecordingConfig,
};

pub(crate) const DEFAULT_MAX_DURATION_SECONDS: u32 =
    interview_recorder_core::DEFAULT_MAX_DURATION_SECONDS;

pub(crate) fn default_max_duration_seconds() -> u32 {
    DEFAULT_MAX_DURATION_SECONDS
}
