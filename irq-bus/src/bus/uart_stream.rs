//! Buffered, fire-and-forget UART transmitter.
//!
//! [`UartStream::write`] copies into a [`ContiguousRingBuffer`] and returns.
//! The DMA channel always sends the longest contiguous run the ring hands
//! out; its completion interrupt releases that run and starts the next.
//!
//! ```text
//!  write() ──► put_range ──► ring ──► peek_range ──► DMA ──► TXBUF
//!     └── idle? kick ──────────────────────▲            │
//!                                          └─ drop_range ◄┘ on_dma_complete()
//! ```
//!
//! The `active` flag mirrors the scheduler's `transmitting`: whoever sets
//! it owns the consumer side of the ring and the DMA channel.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, Ordering};

use super::uart::{configure, BaudConfig};
use crate::constants::{DMA_MAX_TRANSFER_LEN, UART_TX_BUFFER_SIZE};
use crate::error::{Error, Result};
use crate::hal::dma::{DmaChannel, DmaConfig};
use crate::hal::register::Registers;
use crate::hal::usci::usci_a;
use crate::queue::ContiguousRingBuffer;

struct Port<R, D> {
    regs: R,
    dma: D,
    baud: u32,
    trigger: u8,
}

/// Transmit-only UART with an `N`-byte ring.
pub struct UartStream<R, D, const N: usize = UART_TX_BUFFER_SIZE> {
    ring: ContiguousRingBuffer<u8, N>,
    /// A DMA transfer is running (or being started).
    active: AtomicBool,
    initialized: AtomicBool,
    port: UnsafeCell<Port<R, D>>,
}

// SAFETY: `port` and the consumer side of `ring` are only used by the
// context holding `active`.
unsafe impl<R: Send, D: Send, const N: usize> Sync for UartStream<R, D, N> {}

impl<R, D, const N: usize> UartStream<R, D, N>
where
    R: Registers,
    D: DmaChannel,
{
    const FITS_DMA: () = assert!(
        N <= DMA_MAX_TRANSFER_LEN,
        "UartStream ring must not exceed one DMA transfer"
    );

    pub const fn new(regs: R, tx_dma: D, baud: u32, tx_trigger: u8) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::FITS_DMA;

        UartStream {
            ring: ContiguousRingBuffer::new(),
            active: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
            port: UnsafeCell::new(Port {
                regs,
                dma: tx_dma,
                baud,
                trigger: tx_trigger,
            }),
        }
    }

    /// Configure the module and the TX channel for SMCLK = `smclk_hz`.
    pub fn init(&mut self, smclk_hz: u32) -> Result<BaudConfig> {
        if self.initialized.load(Ordering::Acquire) {
            return Err(Error::AlreadyInitialized);
        }
        let port = self.port.get_mut();
        let cfg = configure(&mut port.regs, smclk_hz, port.baud)?;
        port.dma.setup(&DmaConfig::mem_to_periph(port.trigger))?;
        self.initialized.store(true, Ordering::Release);
        Ok(cfg)
    }

    /// Queue `data` for transmission.
    ///
    /// All or nothing: [`Error::NoMem`] if the ring cannot take the whole
    /// slice. Foreground only (single producer).
    pub fn write(&self, data: &[u8]) -> Result<()> {
        if !self.initialized.load(Ordering::Acquire) {
            return Err(Error::NotInitialized);
        }
        self.ring.put_range(data)?;

        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            // SAFETY: we just claimed `active`.
            unsafe { self.pump() };
        }
        Ok(())
    }

    /// DMA completion interrupt entry point.
    ///
    /// Must only be called from the TX channel's completion interrupt.
    pub fn on_dma_complete(&self) {
        if !self.active.load(Ordering::Acquire) {
            log_trace!("uart stream: dma interrupt while idle");
            return;
        }
        // SAFETY: `active` is held by the running transfer.
        let port = unsafe { &*self.port.get() };
        if port.dma.is_busy() {
            return;
        }

        self.ring.drop_range();
        // SAFETY: `active` is held.
        unsafe { self.pump() };
    }

    /// Send the next contiguous run, or release `active` if the ring is
    /// drained.
    ///
    /// # Safety
    ///
    /// The caller holds `active`.
    unsafe fn pump(&self) {
        let port = &mut *self.port.get();
        loop {
            let run = self.ring.peek_range();
            if run.is_empty() {
                self.active.store(false, Ordering::Release);

                // Bytes written after the empty peek found `active` set.
                if self.ring.is_empty()
                    || self
                        .active
                        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                        .is_err()
                {
                    return;
                }
                continue;
            }

            let txbuf = port.regs.addr_of(usci_a::TXBUF);
            // SAFETY: the run stays reserved in the ring until
            // `on_dma_complete` drops it, after the channel went idle.
            match port.dma.transfer_mem_to_periph(run.as_ptr(), txbuf, run.len()) {
                Ok(()) => return,
                Err(err) => {
                    // Data stays queued; the next `write` retries.
                    log_error!("uart stream: dma refused {} bytes: {}", run.len(), err);
                    self.active.store(false, Ordering::Release);
                    return;
                }
            }
        }
    }

    /// Bytes `write` can accept right now.
    pub fn free(&self) -> usize {
        self.ring.free()
    }

    /// Bytes queued or in flight.
    pub fn pending(&self) -> usize {
        self.ring.used()
    }

    pub fn is_busy(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}
