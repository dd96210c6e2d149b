//! # irq-bus
//!
//! A `no_std`, zero-allocation transaction layer for the serial buses of the
//! MSP432 eUSCI modules. Foreground code queues I2C, SPI or UART jobs and
//! returns immediately; interrupt handlers drive each job to completion,
//! retry bus errors a bounded number of times and report the outcome through
//! a callback.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Queues | [`queue`] | Lock-free SPSC [`RingQueue`](queue::RingQueue) and DMA-friendly [`ContiguousRingBuffer`](queue::ContiguousRingBuffer) |
//! | Hardware | [`hal`] | `Registers` / `DmaChannel` capabilities, eUSCI register map |
//! | Engine | [`sched`] | [`TransactionScheduler`](sched::TransactionScheduler) over a `Transport` strategy |
//! | Drivers | [`bus`] | I2C, SPI and UART transports (feature-gated) |
//!
//! ## Quick start
//!
//! ```ignore
//! use irq_bus::bus::i2c::{I2cAddress, I2cMaster, I2cSpeed};
//! use irq_bus::hal::{usci::USCIB0_BASE, Mmio};
//!
//! // Configure once with exclusive access, then share the driver with the
//! // interrupt handler (e.g. through a `static_cell::StaticCell`).
//! let mut master: I2cMaster<'static, Mmio> =
//!     I2cMaster::new(unsafe { Mmio::new(USCIB0_BASE) }, I2cSpeed::KHz400);
//! master.init(12_000_000)?;
//! let bus: &'static I2cMaster<'static, Mmio> = BUS.init(master);
//!
//! static REG: [u8; 1] = [0x0F];
//! bus.write_read(I2cAddress::Seven(0x48), &REG, rx_buf, &|done| {
//!     if done.is_ok() {
//!         // done.rx holds the register contents
//!     }
//! })?;
//!
//! // EUSCIB0 interrupt handler:
//! bus.on_interrupt();
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `i2c` | yes | I2C master (requires `embedded-hal`) |
//! | `spi` | yes | SPI master with chip-select pins (requires `embedded-hal`) |
//! | `uart` | yes | UART job driver and buffered `UartStream` |
//! | `defmt` | no | Logging through `defmt`, `defmt::Format` on public types |
//!
//! ## Limits
//!
//! - **Queue depth:** 16 jobs per bus ([`constants::JOB_QUEUE_DEPTH`])
//! - **Retries:** 3 restarts per job ([`constants::MAX_RETRIES`])
//! - **DMA transfer:** 1024 bytes ([`constants::DMA_MAX_TRANSFER_LEN`])
//! - **UART TX ring:** 512 bytes ([`constants::UART_TX_BUFFER_SIZE`])

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;

pub mod constants;
pub mod error;
pub mod queue;
pub mod hal;
pub mod sched;
pub mod bus;

pub use error::{Error, Result};
