//! Status codes shared by the queues, the scheduler and the bus drivers.
//!
//! Transport-specific failures (NACK, overrun, ...) live next to their
//! drivers and are only ever delivered through job callbacks. The codes here
//! are returned synchronously.

use core::fmt;

/// Result type used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Synchronous status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The resource is in use; retry later.
    Busy,
    /// An address, size or configuration value is outside the accepted range.
    OutOfRange,
    /// The queue has no free slot (or not enough contiguous free space).
    NoMem,
    /// The queue holds nothing to read.
    Empty,
    /// A transfer length exceeds what the peripheral can count.
    Overflow,
    /// The driver has not been initialized yet.
    NotInitialized,
    /// `init` was called on an already running driver.
    AlreadyInitialized,
    /// A buffer required by the request is missing (zero-length).
    NullPtr,
}

impl Error {
    /// Whether the caller can simply retry the same call later.
    pub const fn is_transient(self) -> bool {
        matches!(self, Error::Busy | Error::NoMem | Error::Empty)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::Busy => "resource busy",
            Error::OutOfRange => "value out of range",
            Error::NoMem => "queue full",
            Error::Empty => "queue empty",
            Error::Overflow => "transfer too long",
            Error::NotInitialized => "driver not initialized",
            Error::AlreadyInitialized => "driver already initialized",
            Error::NullPtr => "missing buffer",
        };
        f.write_str(msg)
    }
}
