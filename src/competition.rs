//! The competition state.

use bitflags::bitflags;

bitflags! {
    /// The state of competition, as reported by field control.
    pub struct CompetitionStatus: u8 {
        /// The robot is disabled.
        const DISABLED = 1 << 0;
        /// The robot is connected to field control.
        const CONNECTED = 1 << 2;
        /// The robot is in autonomous.
        const AUTONOMOUS = 1 << 1;
        /// An invalid state.
        const INVALID = 1 << 7;
    }
}

impl CompetitionStatus {
    /// The mode field control is asking for.
    pub fn mode(self) -> Mode {
        if self.intersects(CompetitionStatus::DISABLED | CompetitionStatus::INVALID) {
            Mode::Disabled
        } else if self.contains(CompetitionStatus::AUTONOMOUS) {
            Mode::Autonomous
        } else {
            Mode::Driver
        }
    }
}

/// The three entry points a competition can invoke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// The robot must not move.
    Disabled,
    /// The autonomous period.
    Autonomous,
    /// The driver-control period.
    Driver,
}

/// Source of field-control signals.
pub trait FieldControl {
    /// Gets the current competition state.
    fn status(&self) -> CompetitionStatus;
}
