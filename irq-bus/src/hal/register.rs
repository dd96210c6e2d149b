//! Register access capability.
//!
//! Drivers never dereference peripheral addresses themselves. They talk to a
//! [`Registers`] implementation: [`Mmio`] on hardware, a register-file mock in
//! tests. All eUSCI registers are 16 bits wide and addressed by their byte
//! offset from the peripheral base.

use core::ops::BitOr;
use core::ptr;

/// Byte offset of a register inside a peripheral block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegOffset(pub u16);

/// Absolute bus address of a register, as handed to a DMA channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeriphAddr(pub usize);

/// A contiguous bit range `[high:low]` inside a 16-bit register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    mask: u16,
    shift: u8,
}

impl Field {
    /// Field covering bits `high` down to `low` (inclusive).
    pub const fn new(high: u8, low: u8) -> Self {
        assert!(high >= low && high < 16, "invalid register field");
        let width = high - low + 1;
        let ones = if width == 16 { u16::MAX } else { (1u16 << width) - 1 };
        Field {
            mask: ones << low,
            shift: low,
        }
    }

    /// Single-bit field.
    pub const fn bit(n: u8) -> Self {
        Self::new(n, n)
    }

    pub const fn mask(self) -> u16 {
        self.mask
    }

    /// `val` shifted into place and clipped to the field width.
    pub const fn value(self, val: u16) -> FieldValue {
        FieldValue {
            mask: self.mask,
            bits: (val << self.shift) & self.mask,
        }
    }

    /// All bits of the field set.
    pub const fn set(self) -> FieldValue {
        FieldValue {
            mask: self.mask,
            bits: self.mask,
        }
    }

    /// All bits of the field cleared.
    pub const fn clear(self) -> FieldValue {
        FieldValue {
            mask: self.mask,
            bits: 0,
        }
    }

    /// Extract this field from a raw register value.
    pub const fn read(self, reg: u16) -> u16 {
        (reg & self.mask) >> self.shift
    }

    pub const fn is_set(self, reg: u16) -> bool {
        reg & self.mask != 0
    }
}

/// Field contents paired with the mask they occupy. Combine with `|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldValue {
    pub mask: u16,
    pub bits: u16,
}

impl BitOr for FieldValue {
    type Output = FieldValue;

    fn bitor(self, rhs: FieldValue) -> FieldValue {
        FieldValue {
            mask: self.mask | rhs.mask,
            bits: self.bits | rhs.bits,
        }
    }
}

/// Read/write access to one peripheral's 16-bit registers.
pub trait Registers {
    fn get(&self, reg: RegOffset) -> u16;

    fn set(&mut self, reg: RegOffset, value: u16);

    /// Read-modify-write: `new = (current & !mask) | (value & mask)`.
    fn modify(&mut self, reg: RegOffset, mask: u16, value: u16) {
        let current = self.get(reg);
        self.set(reg, (current & !mask) | (value & mask));
    }

    /// Write the given fields, leaving all other bits untouched.
    fn apply(&mut self, reg: RegOffset, fields: FieldValue) {
        self.modify(reg, fields.mask, fields.bits);
    }

    /// Bus address of `reg`, for programming DMA source/destination.
    fn addr_of(&self, reg: RegOffset) -> PeriphAddr;
}

/// Memory-mapped register block.
#[derive(Debug)]
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// # Safety
    ///
    /// `base` must be the address of a peripheral register block that no
    /// other `Mmio` instance drives concurrently.
    pub const unsafe fn new(base: usize) -> Self {
        Mmio { base }
    }

    pub const fn base(&self) -> usize {
        self.base
    }

    #[inline]
    fn ptr(&self, reg: RegOffset) -> *mut u16 {
        (self.base + reg.0 as usize) as *mut u16
    }
}

impl Registers for Mmio {
    #[inline]
    fn get(&self, reg: RegOffset) -> u16 {
        // SAFETY: the constructor's caller vouched for `base`.
        unsafe { ptr::read_volatile(self.ptr(reg)) }
    }

    #[inline]
    fn set(&mut self, reg: RegOffset, value: u16) {
        // SAFETY: see `get`.
        unsafe { ptr::write_volatile(self.ptr(reg), value) }
    }

    fn addr_of(&self, reg: RegOffset) -> PeriphAddr {
        PeriphAddr(self.base + reg.0 as usize)
    }
}
