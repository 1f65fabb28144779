use crate::constants::{BODY_SIZE, MARKER, N_SAMPLES};
use crate::error::CaptureError;
use crate::marker::MarkerScanner;
use crate::numeric::to_string;
use crate::packet::{err_if_checksum_mismatched, to_frame, Packet};
use camsense_data::{ChecksumMode, Sample};
use std::io::Read;

/// Samples of one packet plus what the rotation buffer needs to detect a new lap.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub samples: [Sample; N_SAMPLES],
    /// Start angle in degree, before radian conversion and mirroring.
    pub start_angle_degree: f64,
    pub rpm: f64,
    pub checksum: u16,
    pub checksum_correct: bool,
}

/// Turns a byte stream into frames.
///
/// Reads block until bytes arrive. Noise in front of a marker is skipped
/// silently; a corrupted body is only caught when the checksum is enforced.
pub struct FrameDecoder<R> {
    reader: R,
    scanner: MarkerScanner,
    mirrored: bool,
    checksum_mode: ChecksumMode,
    frames_decoded: u64,
    checksum_failures: u64,
}

impl<R: Read> FrameDecoder<R> {
    pub fn new(reader: R, mirrored: bool, checksum_mode: ChecksumMode) -> Self {
        FrameDecoder {
            reader,
            scanner: MarkerScanner::new(),
            mirrored,
            checksum_mode,
            frames_decoded: 0,
            checksum_failures: 0,
        }
    }

    pub fn next_frame(&mut self) -> Result<Frame, CaptureError> {
        self.sync()?;

        let mut body = [0u8; BODY_SIZE];
        self.reader.read_exact(&mut body)?;
        let packet = Packet::parse(&body);

        let frame_bytes = to_frame(&body);
        let checksum_correct = match err_if_checksum_mismatched(&frame_bytes) {
            Ok(()) => true,
            Err(e) => {
                self.checksum_failures += 1;
                if self.checksum_mode == ChecksumMode::Strict {
                    log::warn!("Dropping frame {}. {e}", to_string(&frame_bytes));
                    return Err(e);
                }
                log::debug!("{e}");
                false
            }
        };

        self.frames_decoded += 1;
        Ok(Frame {
            samples: packet.samples(self.mirrored),
            start_angle_degree: packet.start_angle_degree(),
            rpm: packet.rpm(),
            checksum: packet.checksum,
            checksum_correct,
        })
    }

    /// Consumes bytes until a full marker has been read.
    fn sync(&mut self) -> Result<(), CaptureError> {
        self.scanner.reset();
        let mut n_read = 0usize;
        let mut byte = [0u8; 1];
        loop {
            self.reader.read_exact(&mut byte)?;
            n_read += 1;
            if self.scanner.feed(byte[0]) {
                break;
            }
        }
        if n_read > MARKER.len() {
            log::trace!("Skipped {} bytes before marker", n_read - MARKER.len());
        }
        Ok(())
    }

    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }

    pub fn checksum_failures(&self) -> u64 {
        self.checksum_failures
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}
