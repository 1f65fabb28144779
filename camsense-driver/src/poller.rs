use crate::constants::DEFAULT_POLL_INTERVAL_MS;
use crate::rotation::RotationBuffer;
use crate::time::{Clock, SystemClock};
use camsense_data::Snapshot;
use std::time::Duration;

/// Anything a consumer can poll for completed rotations.
pub trait RotationSource {
    fn is_rotation_ready(&self) -> bool;
    /// Copies the buffer and clears the readiness flag.
    fn take_snapshot(&self) -> Snapshot;
}

impl RotationSource for RotationBuffer {
    fn is_rotation_ready(&self) -> bool {
        RotationBuffer::is_rotation_ready(self)
    }

    fn take_snapshot(&self) -> Snapshot {
        self.snapshot()
    }
}

/// A snapshot together with the statistics a downstream relay or display expects.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanReport {
    /// Starts at 0 and grows by one per report.
    pub sequence_id: u64,
    pub snapshot: Snapshot,
    /// Largest distance seen in any report so far.
    pub max_distance: u16,
    /// Largest intensity seen in any report so far.
    pub max_intensity: u8,
    /// Time since the previous report, or since the poller was created.
    pub elapsed: Duration,
    pub max_elapsed: Duration,
}

/// Consumer loop that checks the readiness flag at a fixed interval.
pub struct ScanPoller<C: Clock> {
    clock: C,
    poll_interval: Duration,
    sequence_id: u64,
    max_distance: u16,
    max_intensity: u8,
    max_elapsed: Duration,
    previous: Duration,
}

impl ScanPoller<SystemClock> {
    /// Poller on the wall clock checking every 10 ms.
    pub fn system() -> Self {
        ScanPoller::new(
            SystemClock::new(),
            Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        )
    }
}

impl<C: Clock> ScanPoller<C> {
    pub fn new(clock: C, poll_interval: Duration) -> Self {
        let previous = clock.now();
        ScanPoller {
            clock,
            poll_interval,
            sequence_id: 0,
            max_distance: 0,
            max_intensity: 0,
            max_elapsed: Duration::ZERO,
            previous,
        }
    }

    /// Takes a snapshot if a rotation is ready. Never sleeps.
    pub fn try_next<S: RotationSource + ?Sized>(&mut self, source: &S) -> Option<ScanReport> {
        if !source.is_rotation_ready() {
            return None;
        }
        let snapshot = source.take_snapshot();

        self.max_distance = self.max_distance.max(snapshot.max_distance());
        self.max_intensity = self.max_intensity.max(snapshot.max_intensity());

        let now = self.clock.now();
        let elapsed = now.saturating_sub(self.previous);
        self.previous = now;
        self.max_elapsed = self.max_elapsed.max(elapsed);

        let report = ScanReport {
            sequence_id: self.sequence_id,
            snapshot,
            max_distance: self.max_distance,
            max_intensity: self.max_intensity,
            elapsed,
            max_elapsed: self.max_elapsed,
        };
        self.sequence_id += 1;
        log::debug!(
            "Sequence ID: {}, Elapsed time: {:?}, Max elapsed time: {:?}",
            report.sequence_id,
            report.elapsed,
            report.max_elapsed
        );
        Some(report)
    }

    /// Waits for the next rotation, sleeping between polls. Does not return
    /// if the producer never completes another rotation.
    pub fn next<S: RotationSource + ?Sized>(&mut self, source: &S) -> ScanReport {
        loop {
            if let Some(report) = self.try_next(source) {
                return report;
            }
            self.clock.sleep(self.poll_interval);
        }
    }

    /// Like [`ScanPoller::next`] but gives up after `max_polls` unsuccessful polls.
    pub fn next_within<S: RotationSource + ?Sized>(
        &mut self,
        source: &S,
        max_polls: usize,
    ) -> Option<ScanReport> {
        for _ in 0..max_polls {
            if let Some(report) = self.try_next(source) {
                return Some(report);
            }
            self.clock.sleep(self.poll_interval);
        }
        None
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
