pub(crate) const BAUD_RATE: u32 = 115200;
pub(crate) const MARKER: [u8; 4] = [0x55, 0xAA, 0x03, 0x08];
pub(crate) const N_SAMPLES: usize = 8;
pub(crate) const SAMPLE_SIZE: usize = 3;
// speed (2) + start angle (2) + samples + end angle (2) + checksum (2)
pub(crate) const BODY_SIZE: usize = 4 + N_SAMPLES * SAMPLE_SIZE + 4;
pub(crate) const FRAME_SIZE: usize = MARKER.len() + BODY_SIZE;
pub(crate) const ANGLE_OFFSET: u16 = 0xA000;
pub(crate) const ANGLE_SCALE: f64 = 64.;
pub(crate) const SPEED_SCALE: f64 = 64.;
pub(crate) const READ_TIMEOUT_MS: u64 = 10;
pub(crate) const DEFAULT_POLL_INTERVAL_MS: u64 = 10;
