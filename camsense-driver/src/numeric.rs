use crate::constants::{ANGLE_OFFSET, ANGLE_SCALE, SPEED_SCALE};

/// Little-endian 16 bit value from its low and high bytes.
pub(crate) fn to_u16(low: u8, high: u8) -> u16 {
    ((high as u16) << 8) + (low as u16)
}

pub(crate) fn degree_to_radian(degree: f64) -> f64 {
    degree * std::f64::consts::PI / 180.
}

pub(crate) fn to_rpm(raw_speed: u16) -> f64 {
    (raw_speed as f64) / SPEED_SCALE
}

/// Raw angle counts are offset by 0xA000. Values below the offset map to negative degrees.
pub(crate) fn to_angle(raw_angle: u16) -> f64 {
    ((raw_angle as i32) - (ANGLE_OFFSET as i32)) as f64 / ANGLE_SCALE
}

pub(crate) fn to_string(data: &[u8]) -> String {
    data.iter()
        .map(|e| format!("{:02X}", e))
        .collect::<Vec<_>>()
        .join(" ")
}
