use core::fmt::{self, Display, Formatter};

use crate::error::Error;

/// An ADI port configured as a digital output, as exposed by the hardware
/// layer. Writing the value it already holds must be harmless.
pub trait DigitalOutput {
    /// Sets the digital value (true or false) of the output.
    fn write(&mut self, value: bool) -> Result<(), DigitalOutputError>;
}

/// Represents possible errors for ADI digital output operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitalOutputError {
    /// Port is out of range (1-8).
    PortsOutOfRange,
    /// Port cannot be configured as an ADI digital output.
    PortsNotDigitalOutput,
    /// Unknown error.
    Unknown(i32),
}

impl Display for DigitalOutputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DigitalOutputError::PortsOutOfRange => f.write_str("port is out of range"),
            DigitalOutputError::PortsNotDigitalOutput => {
                f.write_str("port is not an adi digital output")
            }
            DigitalOutputError::Unknown(n) => write!(f, "unknown digital output error {}", n),
        }
    }
}

impl From<DigitalOutputError> for Error {
    fn from(err: DigitalOutputError) -> Self {
        match err {
            DigitalOutputError::PortsOutOfRange => Error::Custom("port is out of range".into()),
            DigitalOutputError::PortsNotDigitalOutput => {
                Error::Custom("port is not an adi digital output".into())
            }
            DigitalOutputError::Unknown(n) => Error::System(n),
        }
    }
}
