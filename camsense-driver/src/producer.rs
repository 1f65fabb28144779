use crate::decoder::FrameDecoder;
use crate::error::CaptureError;
use crate::rotation::RotationBuffer;
use crossbeam_utils::atomic::AtomicCell;
use std::io::Read;

/// Decodes frames into `buffer` until the reader is cancelled or fails.
///
/// Checksum mismatches only drop the frame. Any other error ends the loop
/// and is returned; nothing is retried.
pub(crate) fn run_producer<R: Read>(
    mut decoder: FrameDecoder<R>,
    buffer: &RotationBuffer,
    rpm: &AtomicCell<f64>,
) -> Result<(), CaptureError> {
    log::info!("Producer started");
    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                rpm.store(frame.rpm);
                buffer.append(&frame.samples, frame.start_angle_degree);
            }
            Err(CaptureError::ChecksumMismatch { .. }) => continue,
            Err(CaptureError::Cancelled) => {
                log::info!(
                    "Producer stopped after {} frames ({} checksum failures)",
                    decoder.frames_decoded(),
                    decoder.checksum_failures()
                );
                return Ok(());
            }
            Err(e) => {
                log::error!("Producer terminated. {e}");
                return Err(e);
            }
        }
    }
}
