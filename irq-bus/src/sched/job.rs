//! Queued bus requests and their completion reports.

use super::transport::Transport;

/// Direction of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JobKind {
    Write,
    Read,
    /// Write, then read from the same target without releasing the bus.
    WriteRead,
}

/// Where the active job stands on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Start issued, target not yet acknowledged / first unit not moved.
    Addressing,
    Writing,
    Reading,
    /// All data moved, waiting for the bus to confirm the end.
    Completing,
}

/// Report handed to a job's callback, exactly once per job.
#[derive(Debug)]
pub struct Completion<'r, E> {
    pub kind: JobKind,
    /// `Err` carries the failure that exhausted the retries.
    pub result: core::result::Result<(), E>,
    /// Received bytes. Empty for writes and for failed jobs that read nothing.
    pub rx: &'r [u8],
}

impl<E> Completion<'_, E> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Completion callback; user context is whatever the closure captures.
///
/// Usually runs in interrupt context and must not block. When a job's start
/// is refused on every attempt while the bus was idle, the failure is
/// reported from inside the `enqueue` call (foreground context), before it
/// returns.
pub type Callback<'a, E> = &'a (dyn Fn(Completion<'_, E>) + Sync);

/// One queued request for a transport `T`.
///
/// Buffers are borrowed for the scheduler's lifetime `'a`; the receive
/// buffer is written by the transport (or its DMA) while the job is active.
pub struct Job<'a, T: Transport> {
    kind: JobKind,
    address: T::Address<'a>,
    tx: &'a [u8],
    rx: &'a mut [u8],
    callback: Callback<'a, T::Error>,
    /// Next byte of the current phase.
    cursor: usize,
    retries: u8,
    phase: Phase,
}

impl<'a, T: Transport> Job<'a, T> {
    fn new(
        kind: JobKind,
        address: T::Address<'a>,
        tx: &'a [u8],
        rx: &'a mut [u8],
        callback: Callback<'a, T::Error>,
    ) -> Self {
        Job {
            kind,
            address,
            tx,
            rx,
            callback,
            cursor: 0,
            retries: 0,
            phase: Phase::Addressing,
        }
    }

    pub fn write(address: T::Address<'a>, tx: &'a [u8], callback: Callback<'a, T::Error>) -> Self {
        Self::new(JobKind::Write, address, tx, &mut [], callback)
    }

    pub fn read(
        address: T::Address<'a>,
        rx: &'a mut [u8],
        callback: Callback<'a, T::Error>,
    ) -> Self {
        Self::new(JobKind::Read, address, &[], rx, callback)
    }

    pub fn write_read(
        address: T::Address<'a>,
        tx: &'a [u8],
        rx: &'a mut [u8],
        callback: Callback<'a, T::Error>,
    ) -> Self {
        Self::new(JobKind::WriteRead, address, tx, rx, callback)
    }

    #[inline]
    pub fn kind(&self) -> JobKind {
        self.kind
    }

    #[inline]
    pub fn address(&self) -> &T::Address<'a> {
        &self.address
    }

    #[inline]
    pub fn address_mut(&mut self) -> &mut T::Address<'a> {
        &mut self.address
    }

    #[inline]
    pub fn tx(&self) -> &'a [u8] {
        self.tx
    }

    #[inline]
    pub fn rx(&self) -> &[u8] {
        &self.rx[..]
    }

    #[inline]
    pub fn rx_mut(&mut self) -> &mut [u8] {
        &mut self.rx[..]
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    #[inline]
    pub fn advance_cursor(&mut self) {
        self.cursor += 1;
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Restarts consumed so far.
    #[inline]
    pub fn retries(&self) -> u8 {
        self.retries
    }

    pub(super) fn record_retry(&mut self) {
        self.retries = self.retries.saturating_add(1);
    }

    /// Rewind to the beginning of the transfer.
    pub(super) fn rewind(&mut self) {
        self.cursor = 0;
        self.phase = Phase::Addressing;
    }

    pub(super) fn callback(&self) -> Callback<'a, T::Error> {
        self.callback
    }
}
