//! SPSC ring buffer that hands out contiguous ranges for DMA.
//!
//! A DMA channel needs one linear pointer + length. [`ContiguousRingBuffer`]
//! therefore never returns a logically wrapped region: [`peek_range()`]
//! stops at the physical end of the backing array, and the wrapped part is
//! returned by the following peek.
//!
//! ```text
//!  index:  0           6           12    16
//!          [ wrapped  )[   free   )[ run )
//!                       ^head      ^tail
//!  peek #1 -> [12, 16)     peek #2 -> [0, 6)
//! ```
//!
//! # Safety Contract
//!
//! - Only the producer calls [`put_range()`].
//! - Only the consumer calls [`peek_range()`] / [`drop_range()`], strictly
//!   alternating, and stops using a range once it has been dropped.
//!
//! [`peek_range()`]: ContiguousRingBuffer::peek_range
//! [`drop_range()`]: ContiguousRingBuffer::drop_range
//! [`put_range()`]: ContiguousRingBuffer::put_range

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;
use core::ptr;
use core::slice;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, Result};

/// Fixed-capacity SPSC ring of `Copy` elements with contiguous range reads.
pub struct ContiguousRingBuffer<T: Copy, const N: usize> {
    buffer: UnsafeCell<[MaybeUninit<T>; N]>,
    /// Next index to write (producer-owned).
    head: AtomicUsize,
    /// Next index to read (consumer-owned).
    tail: AtomicUsize,
    /// Published, not yet dropped elements.
    used: AtomicUsize,
    /// Length of the range handed out by the last `peek_range` (consumer-owned).
    pending: AtomicUsize,
}

// SAFETY: the producer only writes slots outside `[tail, tail + used)` and
// the consumer only reads slots inside it; ownership moves through the
// release/acquire pair on `used`.
unsafe impl<T: Copy + Send, const N: usize> Sync for ContiguousRingBuffer<T, N> {}
unsafe impl<T: Copy + Send, const N: usize> Send for ContiguousRingBuffer<T, N> {}

impl<T: Copy, const N: usize> ContiguousRingBuffer<T, N> {
    const MASK: usize = N - 1;
    const VALID_CAPACITY: () = assert!(
        N.is_power_of_two(),
        "ContiguousRingBuffer capacity must be a non-zero power of two"
    );

    /// Create an empty buffer.
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_CAPACITY;

        ContiguousRingBuffer {
            buffer: UnsafeCell::new([MaybeUninit::uninit(); N]),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            used: AtomicUsize::new(0),
            pending: AtomicUsize::new(0),
        }
    }

    #[inline]
    fn base(&self) -> *mut T {
        self.buffer.get().cast::<T>()
    }

    /// Append `data` (producer side).
    ///
    /// All or nothing: returns [`Error::NoMem`] without writing anything if
    /// `data` does not fit. A write that crosses the end of the array is
    /// split into two copies and published as a whole afterwards.
    pub fn put_range(&self, data: &[T]) -> Result<()> {
        if data.len() > self.free() {
            return Err(Error::NoMem);
        }
        if data.is_empty() {
            return Ok(());
        }

        let head = self.head.load(Ordering::Relaxed);
        let first = data.len().min(N - head);

        // SAFETY: `data.len() <= free` so both segments lie in slots the
        // consumer has released; raw pointers avoid creating a reference
        // that would alias the consumer's outstanding range.
        unsafe {
            ptr::copy_nonoverlapping(data.as_ptr(), self.base().add(head), first);
            ptr::copy_nonoverlapping(
                data.as_ptr().add(first),
                self.base(),
                data.len() - first,
            );
        }

        self.head.store((head + data.len()) & Self::MASK, Ordering::Relaxed);
        // Publish both segments at once.
        self.used.fetch_add(data.len(), Ordering::Release);
        Ok(())
    }

    /// Longest contiguous readable run starting at the read index
    /// (consumer side). Empty when nothing is readable.
    ///
    /// The run ends at the write index or at the physical end of the array,
    /// whichever comes first. Release it with [`drop_range()`](Self::drop_range).
    pub fn peek_range(&self) -> &[T] {
        let available = self.used.load(Ordering::Acquire);
        if available == 0 {
            self.pending.store(0, Ordering::Relaxed);
            return &[];
        }

        let tail = self.tail.load(Ordering::Relaxed);
        let len = available.min(N - tail);
        self.pending.store(len, Ordering::Relaxed);

        // SAFETY: `[tail, tail + len)` is inside the published region and
        // does not cross the end of the array.
        unsafe { slice::from_raw_parts(self.base().add(tail), len) }
    }

    /// Release the range returned by the last [`peek_range()`](Self::peek_range)
    /// (consumer side). Returns the number of elements released; 0 when no
    /// range was outstanding.
    pub fn drop_range(&self) -> usize {
        let len = self.pending.swap(0, Ordering::Relaxed);
        if len == 0 {
            return 0;
        }

        let tail = self.tail.load(Ordering::Relaxed);
        self.tail.store((tail + len) & Self::MASK, Ordering::Relaxed);
        // Release: the consumer is done with these slots.
        self.used.fetch_sub(len, Ordering::Release);
        len
    }

    /// Number of published, unread elements.
    #[inline]
    pub fn used(&self) -> usize {
        self.used.load(Ordering::Acquire)
    }

    /// Number of elements `put_range` can accept right now.
    #[inline]
    pub fn free(&self) -> usize {
        N - self.used()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.used() == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.used() == N
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Current read index. Test hook for checking range boundaries.
    #[cfg(test)]
    fn read_index(&self) -> usize {
        self.tail.load(Ordering::Relaxed)
    }
}

impl<T: Copy, const N: usize> Default for ContiguousRingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
