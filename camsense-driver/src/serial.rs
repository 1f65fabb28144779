use crate::constants::{BAUD_RATE, READ_TIMEOUT_MS};
use crate::error::{cancelled_io_error, CaptureError};
use crossbeam_channel::Receiver;
use serialport::SerialPort;
use std::io::{self, Read};
use std::time::Duration;

/// Opens `port_name` with the settings of the Camsense X1 (115200 baud, 8N1).
///
/// The short read timeout only exists so that a blocked reader can notice
/// a stop request; [`CancellableReader`] hides it from the decoder.
pub fn open_port(port_name: &str) -> Result<Box<dyn SerialPort>, CaptureError> {
    let port = serialport::new(port_name, BAUD_RATE)
        .data_bits(serialport::DataBits::Eight)
        .parity(serialport::Parity::None)
        .stop_bits(serialport::StopBits::One)
        .flow_control(serialport::FlowControl::None)
        .timeout(Duration::from_millis(READ_TIMEOUT_MS))
        .open()?;
    log::info!("Opened \"{}\" at {} baud", port_name, BAUD_RATE);
    Ok(port)
}

pub(crate) fn do_terminate(terminator_rx: &Receiver<bool>) -> bool {
    terminator_rx.try_recv().unwrap_or(false)
}

/// Reader that blocks until data arrives or a stop is requested.
///
/// Timeouts of the inner reader are retried, which turns a port with a read
/// timeout into an unbounded blocking read. Once `true` is received on the
/// terminator channel, every read fails with a cancellation error.
///
/// The terminator is only checked between reads of `inner`, so `inner` must
/// time out (or return data) regularly for a stop request to take effect.
pub struct CancellableReader<R> {
    inner: R,
    terminator_rx: Receiver<bool>,
    cancelled: bool,
}

impl<R: Read> CancellableReader<R> {
    pub fn new(inner: R, terminator_rx: Receiver<bool>) -> Self {
        CancellableReader {
            inner,
            terminator_rx,
            cancelled: false,
        }
    }
}

impl<R: Read> Read for CancellableReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            if self.cancelled || do_terminate(&self.terminator_rx) {
                self.cancelled = true;
                return Err(cancelled_io_error());
            }
            match self.inner.read(buf) {
                Err(e) if is_retryable(&e) => continue,
                result => return result,
            }
        }
    }
}

fn is_retryable(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}
