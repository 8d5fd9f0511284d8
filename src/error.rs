//! Common error model.

use alloc::string::String;
use core::fmt::{self, Debug, Display, Formatter};

/// Represents a hardware setup error.
///
/// Control flow never produces an `Error`: primitives report
/// [`Interruption`](crate::monitor::Interruption)s instead, and device
/// failures during a match are logged and ignored. Only constructing the
/// [`Peripherals`](crate::peripherals::Peripherals) can fail.
pub enum Error {
    /// Represents an error reported by the hardware layer. It wraps the
    /// platform's error code.
    System(i32),
    /// Represents an error which comes from within Rust. It wraps an error
    /// string.
    Custom(String),
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::System(n) => write!(f, "System({})", n),
            Error::Custom(s) => write!(f, "Custom({:?})", s),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::System(n) => write!(f, "hardware error code {}", n),
            Error::Custom(s) => Display::fmt(s, f),
        }
    }
}
