use log::{debug, warn};

use super::DigitalOutput;
use crate::{config::PNEUMATIC_SETTLE, rtos::Clock};

/// A single-acting pneumatic cylinder driven by a solenoid on a digital
/// output.
pub struct Pneumatic<D> {
    name: &'static str,
    output: D,
    engaged: Option<bool>,
}

impl<D: DigitalOutput> Pneumatic<D> {
    /// Wraps a digital output. The state is unknown until the first write.
    pub fn new(name: &'static str, output: D) -> Self {
        Self {
            name,
            output,
            engaged: None,
        }
    }

    /// The last successfully written state.
    pub fn engaged(&self) -> Option<bool> {
        self.engaged
    }

    /// Writes the state without waiting for the cylinder to move.
    ///
    /// Driver control calls this every tick while a button is held, so
    /// repeated writes only log on change.
    pub fn set(&mut self, engaged: bool) {
        match self.output.write(engaged) {
            Ok(()) => {
                if self.engaged != Some(engaged) {
                    debug!(
                        "{} -> {}",
                        self.name,
                        if engaged { "engaged" } else { "released" }
                    );
                }
                self.engaged = Some(engaged);
            }
            Err(err) => warn!("{}: failed to write solenoid: {}", self.name, err),
        }
    }

    /// Writes the state, then blocks for the settle delay so the next step
    /// starts with the cylinder in place.
    ///
    /// The delay is not interruptible by the abort button: once the valve is
    /// switched the cylinder moves regardless.
    pub fn actuate(&mut self, clock: &impl Clock, engaged: bool) {
        self.set(engaged);
        clock.delay(PNEUMATIC_SETTLE);
    }
}
