//! Autonomous sequencing and driver control for a four-motor differential
//! competition robot with an intake, a flywheel and two pneumatic actuators.
//!
//! The crate talks to the hardware exclusively through the traits in
//! [`motor`], [`adi`], [`controller`] and [`rtos`]; an implementation of
//! [`peripherals::Platform`] for the real brain lives with the binary that
//! registers the [`robot::Competition`] entry points.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

extern crate alloc;

mod error;
#[cfg(feature = "logging")]
mod logger;
#[cfg(test)]
mod sim;

pub mod adi;
pub mod autonomous;
pub mod competition;
pub mod config;
pub mod controller;
pub mod drive;
pub mod mechanism;
pub mod monitor;
pub mod motor;
pub mod opcontrol;
pub mod peripherals;
pub mod prelude;
pub mod robot;
pub mod rtos;

pub use error::Error;
#[cfg(feature = "logging")]
pub use logger::init_logger;
