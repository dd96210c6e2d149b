//! Lock-free single-producer single-consumer ring of discrete elements.
//!
//! Used as the job queue of every bus driver: foreground code pushes jobs,
//! the peripheral's interrupt handler peeks at the active one and pops it
//! once it has completed.
//!
//! # Safety Contract
//!
//! - Only ONE context may call [`try_push()`](RingQueue::try_push) /
//!   [`try_emplace()`](RingQueue::try_emplace) (the "producer").
//! - Only ONE context may call [`peek()`](RingQueue::peek),
//!   [`peek_mut()`](RingQueue::peek_mut) and [`pop()`](RingQueue::pop)
//!   (the "consumer").
//! - A reference obtained from `peek` must not be held across a `pop`.
//!
//! Violating the contract is not detected.

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, Result};

/// A lock-free SPSC queue with room for exactly `N` elements.
///
/// Fullness is tracked with an explicit occupancy counter, so every slot is
/// usable; `N` must be a power of two.
pub struct RingQueue<T, const N: usize> {
    buffer: [UnsafeCell<MaybeUninit<T>>; N],
    /// Next slot to write (producer-owned).
    head: AtomicUsize,
    /// Next slot to read (consumer-owned).
    tail: AtomicUsize,
    /// Number of published elements. The only acquire/release edge.
    used: AtomicUsize,
}

// SAFETY: T: Send is required because values cross thread/ISR boundaries.
// Head is only written by the producer, tail only by the consumer, and a
// slot changes hands exclusively through the release/acquire pair on `used`.
unsafe impl<T: Send, const N: usize> Sync for RingQueue<T, N> {}
unsafe impl<T: Send, const N: usize> Send for RingQueue<T, N> {}

impl<T, const N: usize> RingQueue<T, N> {
    const MASK: usize = N - 1;
    const VALID_CAPACITY: () = assert!(
        N.is_power_of_two(),
        "RingQueue capacity must be a non-zero power of two"
    );

    /// Create an empty queue.
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_CAPACITY;

        RingQueue {
            // SAFETY: An array of uninitialized MaybeUninit<T> is always valid.
            // UnsafeCell is a transparent wrapper that doesn't affect validity.
            buffer: unsafe {
                MaybeUninit::<[UnsafeCell<MaybeUninit<T>>; N]>::uninit().assume_init()
            },
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            used: AtomicUsize::new(0),
        }
    }

    /// Push a value (producer side).
    ///
    /// Returns [`Error::NoMem`] if the queue is full; the value is dropped.
    pub fn try_push(&self, val: T) -> Result<()> {
        self.try_emplace(|| val)
    }

    /// Construct a value in place (producer side).
    ///
    /// `make` only runs when a slot is free.
    pub fn try_emplace<F>(&self, make: F) -> Result<()>
    where
        F: FnOnce() -> T,
    {
        if self.used.load(Ordering::Acquire) >= N {
            return Err(Error::NoMem);
        }

        let head = self.head.load(Ordering::Relaxed);

        // SAFETY: We are the sole producer and `used < N` means the consumer
        // has released this slot (its decrement happened-before our load).
        unsafe {
            (*self.buffer[head].get()).write(make());
        }

        self.head.store((head + 1) & Self::MASK, Ordering::Relaxed);
        // Publish: the slot write is visible before the new count.
        self.used.fetch_add(1, Ordering::Release);
        Ok(())
    }

    /// Reference to the oldest element (consumer side).
    pub fn peek(&self) -> Result<&T> {
        if self.used.load(Ordering::Acquire) == 0 {
            return Err(Error::Empty);
        }
        let tail = self.tail.load(Ordering::Relaxed);

        // SAFETY: `used > 0` was observed with acquire ordering, so the
        // producer's write to this slot is complete and visible.
        Ok(unsafe { (*self.buffer[tail].get()).assume_init_ref() })
    }

    /// Mutable reference to the oldest element (consumer side).
    ///
    /// # Safety
    ///
    /// The caller must be the queue's only consumer and must not hold any
    /// other reference to the oldest element while the returned one is alive.
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn peek_mut(&self) -> Result<&mut T> {
        if self.used.load(Ordering::Acquire) == 0 {
            return Err(Error::Empty);
        }
        let tail = self.tail.load(Ordering::Relaxed);

        // SAFETY: see `peek`; exclusivity is guaranteed by the caller.
        Ok(unsafe { (*self.buffer[tail].get()).assume_init_mut() })
    }

    /// Remove and return the oldest element (consumer side).
    pub fn pop(&self) -> Result<T> {
        if self.used.load(Ordering::Acquire) == 0 {
            return Err(Error::Empty);
        }
        let tail = self.tail.load(Ordering::Relaxed);

        // SAFETY: We are the sole consumer and the slot is published.
        let val = unsafe { (*self.buffer[tail].get()).assume_init_read() };

        self.tail.store((tail + 1) & Self::MASK, Ordering::Relaxed);
        // Release: our read completes before the producer may reuse the slot.
        self.used.fetch_sub(1, Ordering::Release);
        Ok(val)
    }

    /// Number of stored elements.
    #[inline]
    pub fn used(&self) -> usize {
        self.used.load(Ordering::Acquire)
    }

    /// Number of free slots.
    #[inline]
    pub fn free(&self) -> usize {
        N - self.used()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.used() == N
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.used() == 0
    }

    /// Total number of slots (`N`).
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<T, const N: usize> Default for RingQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Drop for RingQueue<T, N> {
    fn drop(&mut self) {
        // Drop any remaining items to avoid leaks.
        while self.pop().is_ok() {}
    }
}
