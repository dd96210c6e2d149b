//! DMA channel capability.
//!
//! The bus drivers only need to start byte transfers between memory and a
//! peripheral data register and to ask whether a channel is still running.
//! The channel's completion interrupt is wired by the application to the
//! owning driver's `on_interrupt`.

use super::register::PeriphAddr;
use crate::error::Result;

/// Element size of one DMA transfer unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataWidth {
    Bits8,
    Bits16,
    Bits32,
}

/// Address increment applied after every transfer unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PtrIncrement {
    Incr8,
    Incr16,
    Incr32,
    /// Address stays fixed (peripheral register or a repeated source byte).
    NoIncr,
}

/// Static channel configuration, applied once by [`DmaChannel::setup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DmaConfig {
    /// Trigger source number for the channel's request mux.
    pub trigger: u8,
    pub width: DataWidth,
    pub src_incr: PtrIncrement,
    pub dst_incr: PtrIncrement,
}

impl DmaConfig {
    /// Byte-wise memory → peripheral register.
    pub const fn mem_to_periph(trigger: u8) -> Self {
        DmaConfig {
            trigger,
            width: DataWidth::Bits8,
            src_incr: PtrIncrement::Incr8,
            dst_incr: PtrIncrement::NoIncr,
        }
    }

    /// Byte-wise peripheral register → memory.
    pub const fn periph_to_mem(trigger: u8) -> Self {
        DmaConfig {
            trigger,
            width: DataWidth::Bits8,
            src_incr: PtrIncrement::NoIncr,
            dst_incr: PtrIncrement::Incr8,
        }
    }
}

/// One DMA channel.
///
/// Transfer methods return once the transfer is armed; completion is
/// signalled by the channel interrupt and observable through
/// [`is_busy`](DmaChannel::is_busy). Errors: `NotInitialized` before
/// `setup`, `Busy` while a transfer runs, `Empty` for zero length.
pub trait DmaChannel {
    fn setup(&mut self, config: &DmaConfig) -> Result<()>;

    /// # Safety
    ///
    /// `src` must stay valid for reads of `len` bytes until the channel is
    /// no longer busy.
    unsafe fn transfer_mem_to_periph(&mut self, src: *const u8, dst: PeriphAddr, len: usize)
        -> Result<()>;

    /// # Safety
    ///
    /// `dst` must stay valid for writes of `len` bytes, and must not be
    /// accessed otherwise, until the channel is no longer busy.
    unsafe fn transfer_periph_to_mem(&mut self, src: PeriphAddr, dst: *mut u8, len: usize)
        -> Result<()>;

    /// Transfer with per-call increments, overriding the configured ones.
    ///
    /// # Safety
    ///
    /// Both pointers must stay valid for the addresses the increments will
    /// touch until the channel is no longer busy.
    unsafe fn transfer_custom(
        &mut self,
        src: *const u8,
        src_incr: PtrIncrement,
        dst: *mut u8,
        dst_incr: PtrIncrement,
        len: usize,
    ) -> Result<()>;

    fn is_busy(&self) -> bool;

    /// Stop the running transfer, if any.
    fn abort(&mut self);
}
