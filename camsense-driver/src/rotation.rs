use crate::error::CaptureError;
use camsense_data::{Sample, Snapshot};
use std::sync::{Mutex, MutexGuard, PoisonError};

struct Ring {
    angles_radian: Vec<f64>,
    distances: Vec<u16>,
    intensities: Vec<u8>,
    write_cursor: usize,
    rotation_complete: bool,
    previous_start_angle: f64,
}

/// Fixed-size ring of the latest samples, shared by one writer and one reader.
///
/// The writer raises a readiness flag when the start angle of a packet goes
/// back below the previous one, that is when the sensor passed 0 degree.
/// Only [`RotationBuffer::snapshot`] clears it.
///
/// The ring holds the last `capacity` samples, not exactly one rotation.
/// A snapshot is ordered by slot and can mix the end of one rotation with
/// the beginning of the next.
pub struct RotationBuffer {
    capacity: usize,
    ring: Mutex<Ring>,
}

impl RotationBuffer {
    pub fn new(capacity: usize) -> Result<Self, CaptureError> {
        if capacity == 0 {
            return Err(CaptureError::InvalidCapacity(capacity));
        }
        let ring = Ring {
            angles_radian: vec![0.; capacity],
            distances: vec![0; capacity],
            intensities: vec![0; capacity],
            write_cursor: 0,
            rotation_complete: false,
            previous_start_angle: 0.,
        };
        Ok(RotationBuffer {
            capacity,
            ring: Mutex::new(ring),
        })
    }

    // the ring is plain data, a poisoned lock is still usable
    fn lock(&self) -> MutexGuard<'_, Ring> {
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn append(&self, samples: &[Sample], start_angle_degree: f64) {
        let mut ring = self.lock();
        for sample in samples {
            let i = ring.write_cursor;
            ring.angles_radian[i] = sample.angle_radian;
            ring.distances[i] = sample.distance;
            ring.intensities[i] = sample.intensity;
            ring.write_cursor = (i + 1) % self.capacity;
        }
        if start_angle_degree < ring.previous_start_angle {
            ring.rotation_complete = true;
        }
        ring.previous_start_angle = start_angle_degree;
    }

    /// Copies every slot and clears the readiness flag.
    pub fn snapshot(&self) -> Snapshot {
        let mut ring = self.lock();
        let snapshot = Snapshot {
            angles_radian: ring.angles_radian.clone(),
            distances: ring.distances.clone(),
            intensities: ring.intensities.clone(),
        };
        ring.rotation_complete = false;
        snapshot
    }

    pub fn is_rotation_ready(&self) -> bool {
        self.lock().rotation_complete
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn write_cursor(&self) -> usize {
        self.lock().write_cursor
    }
}
