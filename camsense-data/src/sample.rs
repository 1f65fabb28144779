#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One LiDAR measurement.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample {
    /// Angle in radian. 0 points forward, the sign depends on the mirroring mode.
    pub angle_radian: f64,
    /// Distance to an object in mm.
    pub distance: u16,
    /// Return strength of the laser pulse.
    pub intensity: u8,
}
