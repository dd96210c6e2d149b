//! Hardware access seams.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`register`] | `Registers` capability trait and volatile [`Mmio`] block |
//! | [`usci`] | eUSCI register offsets and bitfields |
//! | [`dma`] | `DmaChannel` capability trait and channel configuration |
//!
//! Drivers receive these capabilities through their constructors; nothing
//! in the crate refers to a fixed peripheral instance.

pub mod dma;
pub mod register;
pub mod usci;

#[cfg(test)]
pub(crate) mod mock;

pub use dma::{DataWidth, DmaChannel, DmaConfig, PtrIncrement};
pub use register::{Field, FieldValue, Mmio, PeriphAddr, RegOffset, Registers};
pub use usci::UsciLayout;
