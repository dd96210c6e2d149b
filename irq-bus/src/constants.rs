/// Bus-error restarts allowed per job before it is reported as failed.
pub const MAX_RETRIES: u8 = 3;

/// Default number of pending jobs per scheduler.
pub const JOB_QUEUE_DEPTH: usize = 16;

/// Default size of the buffered UART transmit ring, in bytes.
pub const UART_TX_BUFFER_SIZE: usize = 512;

/// Longest single transfer a DMA channel accepts, in bytes.
pub const DMA_MAX_TRANSFER_LEN: usize = 1024;

/// Longest I2C transfer (write and read part combined), in bytes.
pub const I2C_MAX_TRANSFER_LEN: usize = 0xFFFF;

/// Byte clocked out on MOSI while an SPI job only reads.
pub const SPI_IDLE_BYTE: u8 = 0xFF;
