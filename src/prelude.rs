//! Convenient to `use` common components.

pub use crate::adi::*;
pub use crate::autonomous::*;
pub use crate::competition::*;
pub use crate::controller::*;
pub use crate::drive::*;
pub use crate::mechanism::*;
pub use crate::monitor::*;
pub use crate::motor::*;
pub use crate::opcontrol::*;
pub use crate::peripherals::*;
pub use crate::robot::*;
pub use crate::rtos::*;
pub use crate::Error;
