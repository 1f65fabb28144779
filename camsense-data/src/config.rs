#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of sample slots used when nothing else is configured.
/// Exceeds the sample count of one rotation at the nominal motor speed.
pub const DEFAULT_BUFFER_CAPACITY: usize = 460;

/// How the checksum field at the end of each packet is treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ChecksumMode {
    /// The checksum is computed and reported but packets are always delivered.
    #[default]
    Ignore,
    /// Packets whose checksum does not match are dropped.
    ///
    /// The check is an XOR of the little-endian 16 bit words in front of the
    /// checksum field. The Camsense X1 checksum is undocumented and this
    /// scheme is unconfirmed on real devices; if it differs, every frame is
    /// rejected.
    Strict,
}

/// Settings fixed when a capture is constructed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CaptureConfig {
    /// Serial port name such as `/dev/ttyUSB0` or `COM3`.
    pub port: String,
    /// Number of sample slots in the rotation buffer. Must be positive.
    pub buffer_capacity: usize,
    /// Negate every angle to match a mirrored sensor mounting.
    pub mirrored: bool,
    pub checksum_mode: ChecksumMode,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        CaptureConfig {
            port: String::new(),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            mirrored: true,
            checksum_mode: ChecksumMode::Ignore,
        }
    }
}

impl CaptureConfig {
    pub fn new(port: impl Into<String>) -> Self {
        CaptureConfig {
            port: port.into(),
            ..Default::default()
        }
    }

    pub fn with_buffer_capacity(mut self, buffer_capacity: usize) -> Self {
        self.buffer_capacity = buffer_capacity;
        self
    }

    pub fn with_mirrored(mut self, mirrored: bool) -> Self {
        self.mirrored = mirrored;
        self
    }

    pub fn with_checksum_mode(mut self, checksum_mode: ChecksumMode) -> Self {
        self.checksum_mode = checksum_mode;
        self
    }
}
