//! Interrupt-driven transaction scheduler.
//!
//! One [`TransactionScheduler`] serializes the jobs of one peripheral:
//!
//! ```text
//!  foreground                     interrupt
//!  ──────────                     ─────────
//!  enqueue(job) ──► RingQueue ──► on_interrupt()
//!      │  (producer)      (consumer) │
//!      └── idle? start head job      ├─ Pending → wait
//!                                    ├─ Done    → callback(Ok), start next
//!                                    └─ Error   → restart (≤ MAX_RETRIES)
//!                                                 or callback(Err), start next
//! ```
//!
//! The `transmitting` flag decides who owns the transport and the consumer
//! side of the queue. Whoever flips it from `false` to `true` starts the
//! head job; it is released by the interrupt once the queue is drained, and
//! re-claimed if a job raced in meanwhile.

pub mod job;
pub mod transport;

pub use job::{Callback, Completion, Job, JobKind, Phase};
pub use transport::{Step, Transport};

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::constants::MAX_RETRIES;
use crate::error::{Error, Result};
use crate::queue::RingQueue;

/// Queue of jobs plus the state machine driving them through transport `T`.
pub struct TransactionScheduler<'a, T: Transport, const N: usize> {
    jobs: RingQueue<Job<'a, T>, N>,
    /// A job is on the bus (or being started).
    transmitting: AtomicBool,
    initialized: AtomicBool,
    transport: UnsafeCell<T>,
}

// SAFETY: the transport and the consumer side of `jobs` are only touched by
// the context that currently holds `transmitting`.
unsafe impl<'a, T, const N: usize> Sync for TransactionScheduler<'a, T, N>
where
    T: Transport + Send,
    Job<'a, T>: Send,
{
}

impl<'a, T: Transport, const N: usize> TransactionScheduler<'a, T, N> {
    pub const fn new(transport: T) -> Self {
        TransactionScheduler {
            jobs: RingQueue::new(),
            transmitting: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
            transport: UnsafeCell::new(transport),
        }
    }

    /// Exclusive access to the transport, for configuration.
    pub fn transport_mut(&mut self) -> &mut T {
        self.transport.get_mut()
    }

    /// Open the queue. Returns [`Error::AlreadyInitialized`] on a second call.
    pub fn set_initialized(&mut self) -> Result<()> {
        if self.initialized.swap(true, Ordering::AcqRel) {
            return Err(Error::AlreadyInitialized);
        }
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// A job is currently active.
    pub fn is_busy(&self) -> bool {
        self.transmitting.load(Ordering::Acquire)
    }

    /// Jobs queued, including the active one.
    pub fn pending(&self) -> usize {
        self.jobs.used()
    }

    /// Validate and queue `job`; start it right away if the bus is idle.
    ///
    /// Errors: whatever `T::validate` rejects, `NotInitialized`, `NoMem`.
    /// A rejected job never reaches the hardware and its callback never runs.
    ///
    /// If the bus was idle, the job is started from this call. Should the
    /// transport refuse every start attempt, the job's callback fires with
    /// the failure before `enqueue` returns `Ok`, in the caller's context.
    pub fn enqueue(&self, job: Job<'a, T>) -> Result<()> {
        T::validate(&job)?;

        if !self.is_initialized() {
            return Err(Error::NotInitialized);
        }

        self.jobs.try_push(job)?;

        if self
            .transmitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            // SAFETY: we just claimed `transmitting`.
            unsafe { self.run_queue() };
        }
        Ok(())
    }

    /// Peripheral interrupt entry point.
    ///
    /// Interrupts arriving while no job is active are ignored.
    pub fn on_interrupt(&self) {
        if !self.transmitting.load(Ordering::Acquire) {
            log_trace!("interrupt while idle ignored");
            return;
        }

        // SAFETY: `transmitting` is held; the foreground only touches the
        // transport after claiming it.
        let transport = unsafe { &mut *self.transport.get() };
        // SAFETY: we are the consumer while `transmitting` is held.
        let step = match unsafe { self.jobs.peek_mut() } {
            Ok(job) => transport.advance(job),
            Err(_) => {
                log_error!("active flag set with an empty job queue");
                self.transmitting.store(false, Ordering::Release);
                return;
            }
        };

        match step {
            Step::Pending => {}
            Step::Done => {
                // SAFETY: `transmitting` is held.
                unsafe {
                    self.retire(Ok(()));
                    self.run_queue();
                }
            }
            Step::Error(err) => {
                // SAFETY: `transmitting` is held.
                unsafe {
                    self.handle_error(err);
                    self.run_queue();
                }
            }
        }
    }

    /// Start the head job, or release `transmitting` if there is none.
    ///
    /// # Safety
    ///
    /// The caller holds `transmitting`.
    unsafe fn run_queue(&self) {
        loop {
            // Re-derived each round: `handle_error` takes its own reference.
            let transport = &mut *self.transport.get();
            let err = match self.jobs.peek_mut() {
                Ok(job) => {
                    job.rewind();
                    match transport.start(job) {
                        Ok(()) => return,
                        Err(err) => err,
                    }
                }
                Err(_) => {
                    transport.idle();
                    self.transmitting.store(false, Ordering::Release);

                    // A job pushed after the empty check saw `transmitting`
                    // still set and did not start itself.
                    if self.jobs.is_empty()
                        || self
                            .transmitting
                            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                            .is_err()
                    {
                        return;
                    }
                    continue;
                }
            };

            log_debug!("job start refused");
            self.handle_error(err);
        }
    }

    /// Count a failure against the head job; report and drop it once the
    /// retries are used up. The caller restarts whatever is at the head.
    ///
    /// # Safety
    ///
    /// The caller holds `transmitting`.
    unsafe fn handle_error(&self, err: T::Error) {
        let Ok(job) = self.jobs.peek_mut() else {
            return;
        };

        if job.retries() < MAX_RETRIES {
            job.record_retry();
            log_debug!("bus error, retry {} of {}", job.retries(), MAX_RETRIES);
        } else {
            log_warn!("job failed after {} retries", MAX_RETRIES);
            self.retire(Err(err));
        }
    }

    /// Finish the head job: release transport resources, fire the callback
    /// and drop it from the queue.
    ///
    /// # Safety
    ///
    /// The caller holds `transmitting`.
    unsafe fn retire(&self, result: core::result::Result<(), T::Error>) {
        let transport = &mut *self.transport.get();
        let Ok(job) = self.jobs.peek_mut() else {
            return;
        };

        transport.finish(job);

        let rx = job.rx();
        let received = match result {
            Ok(()) => T::received_len(job).min(rx.len()),
            Err(_) => 0,
        };
        (job.callback())(Completion {
            kind: job.kind(),
            result,
            rx: &rx[..received],
        });

        if self.jobs.pop().is_err() {
            log_error!("retired job vanished from the queue");
        }
    }

    #[cfg(test)]
    pub(crate) fn head_state(&self) -> Option<(Phase, usize, u8)> {
        self.jobs
            .peek()
            .ok()
            .map(|job| (job.phase(), job.cursor(), job.retries()))
    }
}
