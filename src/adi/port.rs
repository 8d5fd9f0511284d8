//! ADIPort.

use core::fmt::{self, Display, Formatter};

/// One of the eight three-wire ports on the brain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdiPort {
    /// ADI Port 1 / A.
    A,
    /// ADI Port 2 / B.
    B,
    /// ADI Port 3 / C.
    C,
    /// ADI Port 4 / D.
    D,
    /// ADI Port 5 / E.
    E,
    /// ADI Port 6 / F.
    F,
    /// ADI Port 7 / G.
    G,
    /// ADI Port 8 / H.
    H,
}

impl AdiPort {
    /// The port number, 1-8.
    pub fn number(self) -> u8 {
        match self {
            AdiPort::A => 1,
            AdiPort::B => 2,
            AdiPort::C => 3,
            AdiPort::D => 4,
            AdiPort::E => 5,
            AdiPort::F => 6,
            AdiPort::G => 7,
            AdiPort::H => 8,
        }
    }
}

impl Display for AdiPort {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
