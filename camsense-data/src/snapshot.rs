#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Copy of every slot of a rotation buffer, aligned by slot index.
///
/// Slots are ordered by index, not by acquisition time. Since the buffer
/// keeps no read cursor, a snapshot may hold the tail of one rotation and
/// the head of the next one.
#[derive(Clone, Debug, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    /// Scan angle in radian.
    pub angles_radian: Vec<f64>,
    /// Distance to an object (in mm).
    pub distances: Vec<u16>,
    /// Return strength of the laser pulse.
    pub intensities: Vec<u8>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.angles_radian.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles_radian.is_empty()
    }

    /// Largest distance in the snapshot, 0 when empty.
    pub fn max_distance(&self) -> u16 {
        self.distances.iter().copied().max().unwrap_or(0)
    }

    /// Largest intensity in the snapshot, 0 when empty.
    pub fn max_intensity(&self) -> u8 {
        self.intensities.iter().copied().max().unwrap_or(0)
    }
}
