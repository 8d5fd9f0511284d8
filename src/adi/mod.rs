//! Interfacing with ADI components of the Vex V5 robot.

mod digital_out;
mod pneumatic;
mod port;

pub use digital_out::*;
pub use pneumatic::*;
pub use port::*;
