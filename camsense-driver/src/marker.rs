use crate::constants::MARKER;

/// Byte-by-byte search for the frame marker `55 AA 03 08`.
///
/// Only a match position is kept, so scanning an endless stream of noise
/// never grows memory.
#[derive(Clone, Debug, Default)]
pub struct MarkerScanner {
    position: usize,
}

impl MarkerScanner {
    pub fn new() -> Self {
        MarkerScanner { position: 0 }
    }

    /// Returns true when `byte` completes the marker. The scanner is then
    /// ready to search for the next one.
    pub fn feed(&mut self, byte: u8) -> bool {
        if byte == MARKER[self.position] {
            self.position += 1;
            if self.position == MARKER.len() {
                self.position = 0;
                return true;
            }
        } else if byte == MARKER[0] {
            // a mismatching byte may itself start a new marker
            self.position = 1;
        } else {
            self.position = 0;
        }
        false
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sync_points(scanner: &mut MarkerScanner, bytes: &[u8]) -> Vec<usize> {
        bytes
            .iter()
            .enumerate()
            .filter(|(_, b)| scanner.feed(**b))
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_exact_marker() {
        let mut scanner = MarkerScanner::new();
        assert_eq!(sync_points(&mut scanner, &MARKER), vec![3]);
        assert_eq!(scanner.position(), 0);
    }

    #[test]
    fn test_leading_noise() {
        let mut scanner = MarkerScanner::new();
        let bytes = [0x00, 0x12, 0x03, 0x08, 0x55, 0xAA, 0x03, 0x08];
        assert_eq!(sync_points(&mut scanner, &bytes), vec![7]);
    }

    #[test]
    fn test_decoy_partial_marker() {
        let mut scanner = MarkerScanner::new();
        let bytes = [0x55, 0xAA, 0x55, 0xAA, 0x03, 0x08];
        assert_eq!(sync_points(&mut scanner, &bytes), vec![5]);
    }

    #[test]
    fn test_repeated_first_byte() {
        let mut scanner = MarkerScanner::new();
        let bytes = [0x55, 0x55, 0x55, 0xAA, 0x03, 0x08];
        assert_eq!(sync_points(&mut scanner, &bytes), vec![5]);
    }

    #[test]
    fn test_broken_marker_does_not_sync() {
        let mut scanner = MarkerScanner::new();
        let bytes = [0x55, 0xAA, 0x03, 0x09, 0xAA, 0x03, 0x08];
        assert!(sync_points(&mut scanner, &bytes).is_empty());
        assert_eq!(scanner.position(), 0);
    }

    #[test]
    fn test_position_is_bounded() {
        let mut scanner = MarkerScanner::new();
        for i in 0..10_000u32 {
            let byte = [0x55, 0xAA, 0x03, 0x07][(i % 4) as usize];
            assert!(!scanner.feed(byte));
            assert!(scanner.position() < MARKER.len());
        }
        scanner.reset();
        assert_eq!(scanner.position(), 0);
    }
}
