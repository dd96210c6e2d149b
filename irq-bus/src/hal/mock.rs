//! Test doubles for the hardware capabilities.
//!
//! The drivers own their register block and DMA channels, so the mocks are
//! cheap handles (`&RegisterFile`, `&MockDma`) onto state the test keeps
//! and inspects while the driver runs.

// Not every helper is used by every driver's tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU16, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::vec::Vec;

use super::dma::{DmaChannel, DmaConfig, PtrIncrement};
use super::register::{PeriphAddr, RegOffset, Registers};
use crate::error::{Error, Result};

// ── Register file ─────────────────────────────────────────────────────────

/// Fake base address reported by [`Registers::addr_of`].
pub const MOCK_BASE: usize = 0x4000_2000;

const REG_COUNT: usize = 0x40 / 2;

/// Mock register block with a write log.
pub struct RegisterFile {
    regs: [AtomicU16; REG_COUNT],
    /// Every `set` in chronological order.
    log: Mutex<Vec<(RegOffset, u16)>>,
}

impl RegisterFile {
    pub fn new() -> Self {
        Self {
            regs: core::array::from_fn(|_| AtomicU16::new(0)),
            log: Mutex::new(Vec::new()),
        }
    }

    fn slot(&self, reg: RegOffset) -> &AtomicU16 {
        &self.regs[reg.0 as usize / 2]
    }

    /// Current value, as the hardware would read it.
    pub fn read(&self, reg: RegOffset) -> u16 {
        self.slot(reg).load(Ordering::SeqCst)
    }

    /// Preload a value without logging it (hardware-side change).
    pub fn poke(&self, reg: RegOffset, value: u16) {
        self.slot(reg).store(value, Ordering::SeqCst);
    }

    /// Set flag bits as the peripheral would.
    pub fn raise(&self, reg: RegOffset, bits: u16) {
        self.slot(reg).fetch_or(bits, Ordering::SeqCst);
    }

    /// All values written to `reg`, oldest first.
    pub fn writes_to(&self, reg: RegOffset) -> Vec<u16> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| *r == reg)
            .map(|&(_, v)| v)
            .collect()
    }

    pub fn write_count(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    pub fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }
}

impl Registers for &RegisterFile {
    fn get(&self, reg: RegOffset) -> u16 {
        self.read(reg)
    }

    fn set(&mut self, reg: RegOffset, value: u16) {
        self.slot(reg).store(value, Ordering::SeqCst);
        self.log.lock().unwrap().push((reg, value));
    }

    fn addr_of(&self, reg: RegOffset) -> PeriphAddr {
        PeriphAddr(MOCK_BASE + reg.0 as usize)
    }
}

// ── DMA channel ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    MemToPeriph,
    PeriphToMem,
    Custom,
}

/// Parameters of one armed transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub kind: TransferKind,
    pub src: usize,
    pub dst: usize,
    pub len: usize,
    pub src_incr: PtrIncrement,
    pub dst_incr: PtrIncrement,
}

/// Mock DMA channel. Transfers stay "busy" until the test completes them.
pub struct MockDma {
    config: Mutex<Option<DmaConfig>>,
    last: Mutex<Option<Transfer>>,
    busy: AtomicBool,
    refuse: AtomicBool,
    transfers: AtomicUsize,
    aborts: AtomicUsize,
}

impl MockDma {
    pub fn new() -> Self {
        Self {
            config: Mutex::new(None),
            last: Mutex::new(None),
            busy: AtomicBool::new(false),
            refuse: AtomicBool::new(false),
            transfers: AtomicUsize::new(0),
            aborts: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> Option<DmaConfig> {
        *self.config.lock().unwrap()
    }

    pub fn last(&self) -> Option<Transfer> {
        *self.last.lock().unwrap()
    }

    /// Number of transfers armed so far.
    pub fn transfers(&self) -> usize {
        self.transfers.load(Ordering::SeqCst)
    }

    /// Number of `abort` calls so far.
    pub fn aborts(&self) -> usize {
        self.aborts.load(Ordering::SeqCst)
    }

    pub fn busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Make every following transfer request fail with `Busy`.
    pub fn refuse_transfers(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    /// Finish the running transfer.
    pub fn complete(&self) {
        self.busy.store(false, Ordering::SeqCst);
    }

    /// Finish a peripheral → memory transfer, delivering `data`.
    pub fn complete_with(&self, data: &[u8]) {
        let t = self.last().expect("no transfer armed");
        assert!(self.busy(), "transfer already completed");
        assert_ne!(t.kind, TransferKind::MemToPeriph);
        assert!(data.len() <= t.len);
        // SAFETY: the driver handed out `dst` for `len` bytes and keeps it
        // reserved while the channel is busy.
        unsafe {
            core::ptr::copy_nonoverlapping(data.as_ptr(), t.dst as *mut u8, data.len());
        }
        self.complete();
    }

    /// Bytes of the running memory → peripheral transfer.
    pub fn source_bytes(&self) -> Vec<u8> {
        let t = self.last().expect("no transfer armed");
        let len = if t.src_incr == PtrIncrement::NoIncr { 1 } else { t.len };
        // SAFETY: the source must stay valid while the channel is busy.
        unsafe { core::slice::from_raw_parts(t.src as *const u8, len).to_vec() }
    }

    fn arm(&self, transfer: Transfer) -> Result<()> {
        if self.config().is_none() {
            return Err(Error::NotInitialized);
        }
        if transfer.len == 0 {
            return Err(Error::Empty);
        }
        if self.refuse.load(Ordering::SeqCst) || self.busy() {
            return Err(Error::Busy);
        }
        *self.last.lock().unwrap() = Some(transfer);
        self.transfers.fetch_add(1, Ordering::SeqCst);
        self.busy.store(true, Ordering::SeqCst);
        Ok(())
    }
}

impl DmaChannel for &MockDma {
    fn setup(&mut self, config: &DmaConfig) -> Result<()> {
        let mut slot = self.config.lock().unwrap();
        if slot.is_some() {
            return Err(Error::AlreadyInitialized);
        }
        *slot = Some(*config);
        Ok(())
    }

    unsafe fn transfer_mem_to_periph(
        &mut self,
        src: *const u8,
        dst: PeriphAddr,
        len: usize,
    ) -> Result<()> {
        self.arm(Transfer {
            kind: TransferKind::MemToPeriph,
            src: src as usize,
            dst: dst.0,
            len,
            src_incr: PtrIncrement::Incr8,
            dst_incr: PtrIncrement::NoIncr,
        })
    }

    unsafe fn transfer_periph_to_mem(
        &mut self,
        src: PeriphAddr,
        dst: *mut u8,
        len: usize,
    ) -> Result<()> {
        self.arm(Transfer {
            kind: TransferKind::PeriphToMem,
            src: src.0,
            dst: dst as usize,
            len,
            src_incr: PtrIncrement::NoIncr,
            dst_incr: PtrIncrement::Incr8,
        })
    }

    unsafe fn transfer_custom(
        &mut self,
        src: *const u8,
        src_incr: PtrIncrement,
        dst: *mut u8,
        dst_incr: PtrIncrement,
        len: usize,
    ) -> Result<()> {
        self.arm(Transfer {
            kind: TransferKind::Custom,
            src: src as usize,
            dst: dst as usize,
            len,
            src_incr,
            dst_incr,
        })
    }

    fn is_busy(&self) -> bool {
        self.busy()
    }

    fn abort(&mut self) {
        self.aborts.fetch_add(1, Ordering::SeqCst);
        self.complete();
    }
}

// ── Chip-select pin ───────────────────────────────────────────────────────

/// Output pin recording its level and the number of edges.
#[cfg(feature = "spi")]
pub struct MockPin<'a> {
    pub high: &'a AtomicBool,
    pub edges: &'a AtomicUsize,
}

#[cfg(feature = "spi")]
impl embedded_hal::digital::ErrorType for MockPin<'_> {
    type Error = core::convert::Infallible;
}

#[cfg(feature = "spi")]
impl embedded_hal::digital::OutputPin for MockPin<'_> {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        self.high.store(false, Ordering::SeqCst);
        self.edges.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        self.high.store(true, Ordering::SeqCst);
        self.edges.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
