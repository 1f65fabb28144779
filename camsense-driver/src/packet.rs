use crate::constants::{BODY_SIZE, FRAME_SIZE, MARKER, N_SAMPLES, SAMPLE_SIZE};
use crate::error::CaptureError;
use crate::numeric::{degree_to_radian, to_angle, to_rpm, to_u16};
use camsense_data::Sample;

/// One decoded wire frame. Expanded into samples right after decoding.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Packet {
    pub(crate) raw_speed: u16,
    pub(crate) raw_start_angle: u16,
    pub(crate) distances: [u16; N_SAMPLES],
    pub(crate) intensities: [u8; N_SAMPLES],
    pub(crate) raw_end_angle: u16,
    pub(crate) checksum: u16,
}

impl Packet {
    /// Parses the bytes following the marker. Every field is little-endian.
    pub(crate) fn parse(body: &[u8; BODY_SIZE]) -> Packet {
        let mut distances = [0u16; N_SAMPLES];
        let mut intensities = [0u8; N_SAMPLES];
        for i in 0..N_SAMPLES {
            let s = sample_index(i);
            distances[i] = to_u16(body[s], body[s + 1]);
            intensities[i] = body[s + 2];
        }
        let tail = sample_index(N_SAMPLES);
        Packet {
            raw_speed: to_u16(body[0], body[1]),
            raw_start_angle: to_u16(body[2], body[3]),
            distances,
            intensities,
            raw_end_angle: to_u16(body[tail], body[tail + 1]),
            checksum: to_u16(body[tail + 2], body[tail + 3]),
        }
    }

    pub(crate) fn rpm(&self) -> f64 {
        to_rpm(self.raw_speed)
    }

    pub(crate) fn start_angle_degree(&self) -> f64 {
        to_angle(self.raw_start_angle)
    }

    pub(crate) fn end_angle_degree(&self) -> f64 {
        to_angle(self.raw_end_angle)
    }

    /// End angle shifted by a full turn when the sweep crosses 0 degree.
    pub(crate) fn sweep_end_angle_degree(&self) -> f64 {
        let start_angle = self.start_angle_degree();
        let end_angle = self.end_angle_degree();
        if end_angle < start_angle {
            end_angle + 360.
        } else {
            end_angle
        }
    }

    /// The device only reports the bounds of the sweep, so the angle of each
    /// sample is linearly interpolated from the start angle.
    pub(crate) fn interpolated_angles_degree(&self) -> [f64; N_SAMPLES] {
        let start_angle = self.start_angle_degree();
        let angle_rate = (self.sweep_end_angle_degree() - start_angle) / (N_SAMPLES as f64);
        let mut angles = [0f64; N_SAMPLES];
        for (i, angle) in angles.iter_mut().enumerate() {
            *angle = start_angle + angle_rate * (i as f64);
        }
        angles
    }

    pub(crate) fn samples(&self, mirrored: bool) -> [Sample; N_SAMPLES] {
        let sign = if mirrored { -1. } else { 1. };
        let angles = self.interpolated_angles_degree();
        let mut samples = [Sample::default(); N_SAMPLES];
        for (i, sample) in samples.iter_mut().enumerate() {
            *sample = Sample {
                angle_radian: sign * degree_to_radian(angles[i]),
                distance: self.distances[i],
                intensity: self.intensities[i],
            };
        }
        samples
    }
}

fn sample_index(idx: usize) -> usize {
    4 + idx * SAMPLE_SIZE
}

/// XOR of every little-endian 16 bit word in front of the checksum field,
/// marker included.
pub(crate) fn calc_checksum(frame: &[u8; FRAME_SIZE]) -> u16 {
    frame[..FRAME_SIZE - 2]
        .chunks_exact(2)
        .fold(0u16, |checksum, word| checksum ^ to_u16(word[0], word[1]))
}

pub(crate) fn err_if_checksum_mismatched(frame: &[u8; FRAME_SIZE]) -> Result<(), CaptureError> {
    let calculated = calc_checksum(frame);
    let expected = to_u16(frame[FRAME_SIZE - 2], frame[FRAME_SIZE - 1]);
    match calculated != expected {
        true => Err(CaptureError::ChecksumMismatch {
            expected,
            calculated,
        }),
        false => Ok(()),
    }
}

pub(crate) fn to_frame(body: &[u8; BODY_SIZE]) -> [u8; FRAME_SIZE] {
    let mut frame = [0u8; FRAME_SIZE];
    frame[..MARKER.len()].copy_from_slice(&MARKER);
    frame[MARKER.len()..].copy_from_slice(body);
    frame
}
