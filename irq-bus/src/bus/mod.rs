//! Bus drivers built on the [`TransactionScheduler`](crate::sched::TransactionScheduler).
//!
//! | Module | Peripheral | Data path |
//! |--------|------------|-----------|
//! | [`i2c`] | eUSCI_B, I2C master | byte-wise interrupts |
//! | [`spi`] | eUSCI_A/B, SPI master | TX + RX DMA |
//! | [`uart`] | eUSCI_A, UART | TX + RX DMA |
//! | [`uart_stream`] | eUSCI_A, UART transmit | ring buffer + TX DMA |

#[cfg(feature = "i2c")]
pub mod i2c;
#[cfg(feature = "spi")]
pub mod spi;
#[cfg(feature = "uart")]
pub mod uart;
#[cfg(feature = "uart")]
pub mod uart_stream;
