use crate::decoder::FrameDecoder;
use crate::error::CaptureError;
use crate::poller::RotationSource;
use crate::producer::run_producer;
use crate::rotation::RotationBuffer;
use crate::serial::{open_port, CancellableReader};
use camsense_data::{CaptureConfig, Snapshot};
use crossbeam_channel::{bounded, Sender};
use crossbeam_utils::atomic::AtomicCell;
use std::io::Read;
use std::sync::Arc;
use std::thread::JoinHandle;

struct Producer {
    terminator_tx: Sender<bool>,
    thread: JoinHandle<Result<(), CaptureError>>,
}

/// Capture session of one Camsense X1.
///
/// A producer thread decodes the serial stream into a [`RotationBuffer`]
/// while the owner polls [`Capture::is_rotation_ready`] and takes snapshots.
/// The producer runs until [`Capture::stop`] is called or the capture is
/// dropped. I/O errors end it for good; the consumer only notices that no
/// rotation becomes ready anymore, or through [`Capture::is_running`].
pub struct Capture {
    config: CaptureConfig,
    buffer: Arc<RotationBuffer>,
    rpm: Arc<AtomicCell<f64>>,
    producer: Option<Producer>,
}

impl Capture {
    pub fn new(config: CaptureConfig) -> Result<Self, CaptureError> {
        let buffer = RotationBuffer::new(config.buffer_capacity)?;
        Ok(Capture {
            config,
            buffer: Arc::new(buffer),
            rpm: Arc::new(AtomicCell::new(0.)),
            producer: None,
        })
    }

    /// Opens the configured serial port and starts the producer thread.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        if self.producer.is_some() {
            return Err(CaptureError::AlreadyStarted);
        }
        let port = open_port(&self.config.port)?;
        self.start_with_reader(port)
    }

    /// Starts the producer on an arbitrary byte source instead of a serial port.
    ///
    /// A stop request is only noticed between two reads of `reader`. A source
    /// that blocks without ever timing out keeps [`Capture::stop`] waiting
    /// until it yields a byte or fails; give such sources a read timeout.
    pub fn start_with_reader<R>(&mut self, reader: R) -> Result<(), CaptureError>
    where
        R: Read + Send + 'static,
    {
        if self.producer.is_some() {
            return Err(CaptureError::AlreadyStarted);
        }
        let (terminator_tx, terminator_rx) = bounded(1);
        let decoder = FrameDecoder::new(
            CancellableReader::new(reader, terminator_rx),
            self.config.mirrored,
            self.config.checksum_mode,
        );
        let buffer = Arc::clone(&self.buffer);
        let rpm = Arc::clone(&self.rpm);
        let thread = std::thread::Builder::new()
            .name("camsense-producer".into())
            .spawn(move || run_producer(decoder, &buffer, &rpm))?;

        self.producer = Some(Producer {
            terminator_tx,
            thread,
        });
        Ok(())
    }

    /// Requests the producer to stop and waits for it. Returns the error
    /// that ended the producer, if it failed before.
    ///
    /// Blocks while the producer is stuck in a read that never times out.
    pub fn stop(&mut self) -> Result<(), CaptureError> {
        let producer = match self.producer.take() {
            Some(producer) => producer,
            None => return Ok(()),
        };
        // the producer may be gone already, in which case nobody listens
        let _ = producer.terminator_tx.send(true);
        match producer.thread.join() {
            Ok(result) => result,
            Err(_) => Err(CaptureError::ProducerPanicked),
        }
    }

    /// True while the producer thread is alive.
    pub fn is_running(&self) -> bool {
        self.producer
            .as_ref()
            .is_some_and(|producer| !producer.thread.is_finished())
    }

    pub fn is_rotation_ready(&self) -> bool {
        self.buffer.is_rotation_ready()
    }

    /// Copies the whole buffer and clears the readiness flag.
    /// See [`RotationBuffer`] for why the copy may span two rotations.
    pub fn take_snapshot(&self) -> Snapshot {
        self.buffer.snapshot()
    }

    /// Motor speed reported by the latest packet, 0 before the first one.
    pub fn current_rpm(&self) -> f64 {
        self.rpm.load()
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn buffer(&self) -> &RotationBuffer {
        &self.buffer
    }
}

impl RotationSource for Capture {
    fn is_rotation_ready(&self) -> bool {
        Capture::is_rotation_ready(self)
    }

    fn take_snapshot(&self) -> Snapshot {
        Capture::take_snapshot(self)
    }
}

/// Dropping a capture requests a stop without waiting for the producer.
/// A producer blocked in a read exits on its next read timeout, or leaks
/// if its source never returns.
impl Drop for Capture {
    fn drop(&mut self) {
        let producer = match self.producer.take() {
            Some(producer) => producer,
            None => return,
        };
        let _ = producer.terminator_tx.send(true);
        if !producer.thread.is_finished() {
            log::debug!("Detaching producer thread");
            return;
        }
        match producer.thread.join() {
            Ok(Err(e)) => log::error!("{e}"),
            Ok(Ok(())) => (),
            Err(_) => log::error!("{}", CaptureError::ProducerPanicked),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::tests::sweep_frame;
    use crate::poller::ScanPoller;
    use crate::serial::tests::{ScriptedPort, SilentPort};
    use crate::time::sleep_ms;
    use camsense_data::ChecksumMode;
    use std::io::{self, Cursor};

    fn scripted(starts: &[f64]) -> ScriptedPort {
        let mut bytes = Vec::new();
        for start in starts {
            bytes.extend_from_slice(&sweep_frame(*start, *start + 8.));
        }
        ScriptedPort {
            data: Cursor::new(bytes),
        }
    }

    fn config(capacity: usize) -> CaptureConfig {
        CaptureConfig::new("unused").with_buffer_capacity(capacity)
    }

    #[test]
    fn test_invalid_capacity() {
        assert!(matches!(
            Capture::new(config(0)),
            Err(CaptureError::InvalidCapacity(0))
        ));
    }

    #[test]
    fn test_capture_from_reader() {
        let mut capture = Capture::new(config(48).with_mirrored(false)).unwrap();
        assert_eq!(capture.current_rpm(), 0.);
        capture
            .start_with_reader(scripted(&[300., 310., 320., 330., 340., 350., 0.]))
            .unwrap();

        let mut poller = ScanPoller::system();
        let report = poller.next_within(&capture, 500).unwrap();
        assert_eq!(report.sequence_id, 0);
        assert_eq!(report.snapshot.len(), 48);
        assert_eq!(capture.current_rpm(), 300.);
        assert!(!capture.is_rotation_ready());
        assert!(capture.is_running());

        // the last packet wrapped onto slots 0..8, slots 8..16 still hold the 310 degree packet
        assert!(f64::abs(report.snapshot.angles_radian[0]) < 1e-12);
        assert!(report.snapshot.angles_radian[8] > 5.);

        capture.stop().unwrap();
        assert!(!capture.is_running());
    }

    #[test]
    fn test_stop_silent_device() {
        let mut capture = Capture::new(config(460)).unwrap();
        capture
            .start_with_reader(SilentPort { n_reads: 0 })
            .unwrap();
        sleep_ms(20);
        assert!(capture.is_running());
        assert!(!capture.is_rotation_ready());
        assert!(capture.stop().is_ok());
        assert!(!capture.is_running());
        // stopping twice is a no-op
        assert!(capture.stop().is_ok());
    }

    #[test]
    fn test_stop_stream_without_marker() {
        let mut capture = Capture::new(config(460)).unwrap();
        capture.start_with_reader(io::repeat(0x55)).unwrap();
        sleep_ms(20);
        assert!(capture.is_running());
        assert!(!capture.is_rotation_ready());
        assert_eq!(capture.buffer().write_cursor(), 0);
        assert!(capture.stop().is_ok());
    }

    #[test]
    fn test_io_failure_is_fatal() {
        struct UnpluggedPort;
        impl Read for UnpluggedPort {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "device unplugged"))
            }
        }

        let mut capture = Capture::new(config(16)).unwrap();
        capture.start_with_reader(UnpluggedPort).unwrap();
        for _ in 0..500 {
            if !capture.is_running() {
                break;
            }
            sleep_ms(1);
        }
        assert!(!capture.is_running());
        assert!(matches!(
            capture.stop(),
            Err(CaptureError::IoError(e)) if e.kind() == io::ErrorKind::BrokenPipe
        ));
    }

    #[test]
    fn test_start_twice() {
        let mut capture = Capture::new(config(16)).unwrap();
        capture
            .start_with_reader(SilentPort { n_reads: 0 })
            .unwrap();
        assert!(matches!(
            capture.start_with_reader(SilentPort { n_reads: 0 }),
            Err(CaptureError::AlreadyStarted)
        ));
        assert!(matches!(capture.start(), Err(CaptureError::AlreadyStarted)));
    }

    #[test]
    fn test_strict_checksum_capture() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&sweep_frame(340., 348.));
        let mut corrupted = sweep_frame(350., 358.);
        corrupted[9] ^= 0x10;
        bytes.extend_from_slice(&corrupted);
        bytes.extend_from_slice(&sweep_frame(2., 10.));

        let config = config(24).with_checksum_mode(ChecksumMode::Strict);
        let mut capture = Capture::new(config).unwrap();
        capture
            .start_with_reader(ScriptedPort {
                data: Cursor::new(bytes),
            })
            .unwrap();
        let mut poller = ScanPoller::system();
        let report = poller.next_within(&capture, 500).unwrap();
        assert_eq!(capture.buffer().write_cursor(), 16);
        assert_eq!(report.snapshot.distances[16..], [0; 8]);
        drop(capture);
    }

    /// Source that blocks forever without a read timeout, like a pipe.
    struct BlockingSource {
        rx: crossbeam_channel::Receiver<u8>,
    }

    impl Read for BlockingSource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.rx.recv() {
                Ok(byte) => {
                    buf[0] = byte;
                    Ok(1)
                }
                Err(_) => Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed")),
            }
        }
    }

    #[test]
    fn test_drop_does_not_wait_for_blocking_source() {
        let (data_tx, data_rx) = crossbeam_channel::unbounded::<u8>();
        let mut capture = Capture::new(config(16)).unwrap();
        capture
            .start_with_reader(BlockingSource { rx: data_rx })
            .unwrap();
        sleep_ms(10);
        assert!(capture.is_running());

        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        std::thread::spawn(move || {
            drop(capture);
            done_tx.send(()).unwrap();
        });
        assert!(done_rx
            .recv_timeout(std::time::Duration::from_secs(2))
            .is_ok());

        // the detached producer sees the stop request on its next read
        data_tx.send(0x00).unwrap();
        drop(data_tx);
    }

    #[test]
    fn test_stop_returns_once_blocking_source_yields() {
        let (data_tx, data_rx) = crossbeam_channel::unbounded::<u8>();
        let mut capture = Capture::new(config(16)).unwrap();
        capture
            .start_with_reader(BlockingSource { rx: data_rx })
            .unwrap();
        sleep_ms(10);

        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        let stopper = std::thread::spawn(move || {
            let result = capture.stop();
            done_tx.send(()).unwrap();
            result
        });
        sleep_ms(20);
        data_tx.send(0x00).unwrap();
        assert!(done_rx
            .recv_timeout(std::time::Duration::from_secs(2))
            .is_ok());
        assert!(stopper.join().unwrap().is_ok());
    }
}
