use std::io;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Buffer capacity must be positive. Actually {0}.")]
    InvalidCapacity(usize),
    #[error("Checksum mismatched. Calculated = {calculated:04X}, expected = {expected:04X}.")]
    ChecksumMismatch { expected: u16, calculated: u16 },
    #[error("Capture was cancelled")]
    Cancelled,
    #[error("Capture is already running")]
    AlreadyStarted,
    #[error("Producer thread panicked")]
    ProducerPanicked,
    #[error(transparent)]
    SerialError(#[from] serialport::Error),
    #[error(transparent)]
    IoError(io::Error),
}

/// Marker carried inside an [`io::Error`] when a read is interrupted by a stop request.
#[derive(Debug, thiserror::Error)]
#[error("read cancelled by stop request")]
pub(crate) struct ReadCancelled;

pub(crate) fn cancelled_io_error() -> io::Error {
    io::Error::new(io::ErrorKind::Other, ReadCancelled)
}

impl From<io::Error> for CaptureError {
    fn from(err: io::Error) -> Self {
        let cancelled = err
            .get_ref()
            .is_some_and(|inner| inner.is::<ReadCancelled>());
        if cancelled {
            CaptureError::Cancelled
        } else {
            CaptureError::IoError(err)
        }
    }
}
