//! Logging macros.
//!
//! - With the `defmt` feature: forwarded to `defmt`.
//! - Host tests: printed to stdout/stderr.
//! - Otherwise: compiled out (arguments are still type-checked).
//!
//! Format strings use plain `{}` placeholders so they are valid for both
//! `defmt` and `core::fmt`. Arguments must therefore implement both
//! `defmt::Format` and `Display`; in practice that means integers and the
//! crate's error enums.

macro_rules! log_trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::trace!($($arg)*);
        #[cfg(all(not(feature = "defmt"), test))]
        std::println!("[TRACE] {}", format_args!($($arg)*));
        #[cfg(not(any(feature = "defmt", test)))]
        let _ = format_args!($($arg)*);
    }};
}

macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);
        #[cfg(all(not(feature = "defmt"), test))]
        std::println!("[DEBUG] {}", format_args!($($arg)*));
        #[cfg(not(any(feature = "defmt", test)))]
        let _ = format_args!($($arg)*);
    }};
}

macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($arg)*);
        #[cfg(all(not(feature = "defmt"), test))]
        std::println!("[WARN] {}", format_args!($($arg)*));
        #[cfg(not(any(feature = "defmt", test)))]
        let _ = format_args!($($arg)*);
    }};
}

macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($($arg)*);
        #[cfg(all(not(feature = "defmt"), test))]
        std::eprintln!("[ERROR] {}", format_args!($($arg)*));
        #[cfg(not(any(feature = "defmt", test)))]
        let _ = format_args!($($arg)*);
    }};
}
