//! # Motor API.
//!
//! [`Motor`] is the driver-layer interface a platform implements for each
//! smart motor. Everything above it issues [`ActuatorCommand`]s through a
//! [`MotorGroup`] and polls the group for completion.

use core::fmt::{self, Display, Formatter};

use uom::si::{
    angle::revolution,
    f64::{Angle, Ratio},
    ratio::percent,
};

use crate::error::Error;

/// A V5 smart motor, as exposed by the hardware layer.
///
/// Every command is non-blocking unless `blocking` is set; the control code
/// in this crate never sets it and waits through
/// [`Monitor`](crate::monitor::Monitor) instead.
pub trait Motor {
    /// Spins the motor continuously at the given velocity.
    fn spin(&mut self, direction: Direction, velocity: Ratio) -> Result<(), MotorError>;

    /// Spins the motor by a rotation relative to its current position, at the
    /// velocity last set with [`Motor::set_velocity`].
    fn spin_for(
        &mut self,
        direction: Direction,
        rotation: Angle,
        blocking: bool,
    ) -> Result<(), MotorError>;

    /// Spins the motor to an absolute position, at the velocity last set with
    /// [`Motor::set_velocity`].
    fn spin_to_position(&mut self, position: Angle, blocking: bool) -> Result<(), MotorError>;

    /// Sets the default velocity used by profiled movements.
    fn set_velocity(&mut self, velocity: Ratio) -> Result<(), MotorError>;

    /// Commands the motor to stop.
    fn stop(&mut self) -> Result<(), MotorError>;

    /// Checks whether the motor is currently moving.
    fn is_spinning(&self) -> Result<bool, MotorError>;

    /// Checks whether the last profiled movement has reached its target.
    fn is_done(&self) -> Result<bool, MotorError>;
}

/// Represents the two directions a motor can be commanded in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// The positive direction.
    Forward,
    /// The negative direction.
    Reverse,
}

impl Direction {
    /// The other direction.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

/// Represents possible gear cartridges for a motor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gearset {
    /// Blue 6:1 Gearset (600RPM).
    SixToOne,
    /// Green 18:1 Gearset (200RPM).
    EighteenToOne,
    /// Red 36:1 Gearset (100RPM).
    ThirtySixToOne,
}

/// How a motor is wired into the brain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MotorConfig {
    /// Smart port, 1-21.
    pub port: u8,
    /// Installed cartridge.
    pub gearset: Gearset,
    /// Whether positive commands spin the motor backwards.
    pub reversed: bool,
}

/// What an [`ActuatorCommand`] drives the motor towards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Target {
    /// Continuous rotation at a velocity.
    Velocity(Ratio),
    /// A rotation relative to the current position.
    Displacement(Angle),
    /// An absolute position.
    Position(Angle),
}

/// A single request to a motor or motor group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActuatorCommand {
    /// Direction of travel. Ignored for [`Target::Position`].
    pub direction: Direction,
    /// What to drive towards.
    pub target: Target,
    /// Whether the hardware call should block until the target is reached.
    pub blocking: bool,
}

impl ActuatorCommand {
    /// Continuous rotation.
    pub fn spin(direction: Direction, velocity: Ratio) -> Self {
        Self {
            direction,
            target: Target::Velocity(velocity),
            blocking: false,
        }
    }

    /// Non-blocking relative rotation.
    pub fn spin_for(direction: Direction, rotation: Angle) -> Self {
        Self {
            direction,
            target: Target::Displacement(rotation),
            blocking: false,
        }
    }

    /// Non-blocking move to an absolute position.
    pub fn spin_to_position(position: Angle) -> Self {
        Self {
            direction: Direction::Forward,
            target: Target::Position(position),
            blocking: false,
        }
    }

    /// Sends the command to one motor.
    pub fn issue<M: Motor + ?Sized>(&self, motor: &mut M) -> Result<(), MotorError> {
        match self.target {
            Target::Velocity(velocity) => motor.spin(self.direction, velocity),
            Target::Displacement(rotation) => {
                motor.spin_for(self.direction, rotation, self.blocking)
            }
            Target::Position(position) => motor.spin_to_position(position, self.blocking),
        }
    }
}

impl Display for ActuatorCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.target {
            Target::Velocity(v) => {
                write!(f, "spin {:?} at {:.1}%", self.direction, v.get::<percent>())
            }
            Target::Displacement(a) => write!(
                f,
                "spin {:?} for {:.2} turns",
                self.direction,
                a.get::<revolution>()
            ),
            Target::Position(a) => write!(f, "spin to {:.2} turns", a.get::<revolution>()),
        }
    }
}

/// Motors which are always commanded together, e.g. one side of the
/// drivetrain.
///
/// Commands go to every motor even when one of them fails; the first failure
/// is returned.
pub struct MotorGroup<M, const N: usize> {
    motors: [M; N],
}

impl<M: Motor, const N: usize> MotorGroup<M, N> {
    /// Groups the given motors.
    pub fn new(motors: [M; N]) -> Self {
        Self { motors }
    }

    /// Sends a command to every motor in the group.
    pub fn command(&mut self, cmd: &ActuatorCommand) -> Result<(), MotorError> {
        self.for_each(|m| cmd.issue(m))
    }

    /// Sets the profiled-movement velocity of every motor in the group.
    pub fn set_velocity(&mut self, velocity: Ratio) -> Result<(), MotorError> {
        self.for_each(|m| m.set_velocity(velocity))
    }

    /// Stops every motor in the group.
    pub fn stop(&mut self) -> Result<(), MotorError> {
        self.for_each(|m| m.stop())
    }

    /// Whether every motor has finished its profiled movement.
    pub fn is_done(&self) -> Result<bool, MotorError> {
        for m in &self.motors {
            if !m.is_done()? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Whether any motor in the group is moving.
    pub fn is_spinning(&self) -> Result<bool, MotorError> {
        for m in &self.motors {
            if m.is_spinning()? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn for_each(
        &mut self,
        mut f: impl FnMut(&mut M) -> Result<(), MotorError>,
    ) -> Result<(), MotorError> {
        let mut result = Ok(());
        for m in &mut self.motors {
            if let Err(err) = f(m) {
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }
        result
    }
}

/// Represents possible errors for motor operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorError {
    /// Port is out of range (1-21).
    PortOutOfRange,
    /// Port cannot be configured as a motor.
    PortNotMotor,
    /// Unknown error.
    Unknown(i32),
}

impl Display for MotorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PortOutOfRange => f.write_str("port out of range"),
            MotorError::PortNotMotor => f.write_str("port not a motor"),
            MotorError::Unknown(n) => write!(f, "unknown motor error {}", n),
        }
    }
}

impl From<MotorError> for Error {
    fn from(err: MotorError) -> Self {
        match err {
            MotorError::PortOutOfRange => Error::Custom("port out of range".into()),
            MotorError::PortNotMotor => Error::Custom("port not a motor".into()),
            MotorError::Unknown(n) => Error::System(n),
        }
    }
}
