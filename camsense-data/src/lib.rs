pub mod config;
pub mod sample;
pub mod snapshot;

pub use config::{CaptureConfig, ChecksumMode, DEFAULT_BUFFER_CAPACITY};
pub use sample::Sample;
pub use snapshot::Snapshot;
