//! Transport strategy plugged into the [`TransactionScheduler`].
//!
//! The scheduler owns queueing, retries and callbacks; a transport only
//! knows how to validate, start and advance one job on its peripheral.
//!
//! [`TransactionScheduler`]: super::TransactionScheduler

use super::job::Job;
use crate::error::Result;

/// Outcome of one interrupt, as classified by [`Transport::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step<E> {
    /// Data moved or nothing relevant happened; the job stays active.
    Pending,
    /// The job finished successfully.
    Done,
    /// A bus or DMA failure; the scheduler retries or reports it.
    Error(E),
}

/// Bus-specific half of the transaction engine.
///
/// # Contract
///
/// - `start` arms the peripheral's interrupts as its final action.
/// - `advance` is only called from the peripheral's interrupt, for the job
///   that was last started.
/// - Neither blocks.
pub trait Transport: Sized {
    /// Per-job target selector (bus address, chip-select line, ...).
    type Address<'a>;

    /// Transport-specific failure delivered through callbacks.
    type Error: Copy + core::fmt::Debug;

    /// Reject malformed jobs before they are queued.
    fn validate(job: &Job<'_, Self>) -> Result<()>;

    /// Put `job` on the bus from its beginning. An `Err` is handled exactly
    /// like a bus error reported by `advance`.
    fn start(&mut self, job: &mut Job<'_, Self>) -> core::result::Result<(), Self::Error>;

    /// Read peripheral status and move `job` along.
    fn advance(&mut self, job: &mut Job<'_, Self>) -> Step<Self::Error>;

    /// Release per-job resources (chip select, ...) before the callback runs.
    fn finish(&mut self, _job: &mut Job<'_, Self>) {}

    /// Called once the queue has drained.
    fn idle(&mut self) {}

    /// Number of valid bytes at the start of the receive buffer after `job`
    /// completed.
    fn received_len(job: &Job<'_, Self>) -> usize {
        job.rx().len()
    }
}
