mod capture;
mod constants;
mod decoder;
mod error;
mod marker;
mod numeric;
mod packet;
mod poller;
mod producer;
mod rotation;
mod serial;
mod time;

pub use crate::capture::Capture;
pub use crate::decoder::{Frame, FrameDecoder};
pub use crate::error::CaptureError;
pub use crate::marker::MarkerScanner;
pub use crate::poller::{RotationSource, ScanPoller, ScanReport};
pub use crate::rotation::RotationBuffer;
pub use crate::serial::{open_port, CancellableReader};
pub use crate::time::{Clock, SystemClock};
pub use camsense_data::{CaptureConfig, ChecksumMode, Sample, Snapshot};

/// Function to launch a Camsense X1 capture.
/// # Arguments
///
/// * `config` - Serial port name, buffer capacity and angle convention.
pub fn run_capture(config: CaptureConfig) -> Result<Capture, CaptureError> {
    let mut capture = Capture::new(config)?;
    capture.start()?;
    Ok(capture)
}
