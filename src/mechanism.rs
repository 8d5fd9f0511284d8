//! Intake and flywheel.
//!
//! Neither motor has a position target, so autonomous use is purely timed:
//! running out the duration is success, an abort is failure.

use core::time::Duration;

use log::{debug, warn};
use uom::si::{f64::Ratio, ratio::percent};

use crate::{
    monitor::{AbortSignal, Interruption, Monitor},
    motor::{ActuatorCommand, Direction, Motor, MotorError},
    rtos::Clock,
};

/// Which way the intake and flywheel run together.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MechanismMode {
    /// Both motors stopped.
    Stopped,
    /// Intake and flywheel forward.
    Forward,
    /// Intake reverse, flywheel forward.
    IntakeReverse,
    /// Intake and flywheel reverse.
    Reverse,
}

impl MechanismMode {
    /// Intake and flywheel directions, or `None` when stopped.
    pub fn directions(self) -> Option<(Direction, Direction)> {
        match self {
            MechanismMode::Stopped => None,
            MechanismMode::Forward => Some((Direction::Forward, Direction::Forward)),
            MechanismMode::IntakeReverse => Some((Direction::Reverse, Direction::Forward)),
            MechanismMode::Reverse => Some((Direction::Reverse, Direction::Reverse)),
        }
    }
}

/// The intake/conveyor motor and the flywheel motor.
pub struct Mechanism<M> {
    intake: M,
    flywheel: M,
}

impl<M: Motor> Mechanism<M> {
    /// Wraps the two motors.
    pub fn new(intake: M, flywheel: M) -> Self {
        Self { intake, flywheel }
    }

    /// The intake motor.
    pub fn intake(&self) -> &M {
        &self.intake
    }

    /// The flywheel motor.
    pub fn flywheel(&self) -> &M {
        &self.flywheel
    }

    /// Runs both motors in `mode` at `power`. Never blocks.
    pub fn run(&mut self, mode: MechanismMode, power: Ratio) {
        match mode.directions() {
            Some((intake, flywheel)) => {
                self.spin_intake(intake, power);
                self.spin_flywheel(flywheel, power);
            }
            None => self.stop(),
        }
    }

    /// Spins the intake continuously.
    pub fn spin_intake(&mut self, direction: Direction, speed: Ratio) {
        report(
            "intake",
            ActuatorCommand::spin(direction, speed).issue(&mut self.intake),
        );
    }

    /// Spins the flywheel continuously.
    pub fn spin_flywheel(&mut self, direction: Direction, speed: Ratio) {
        report(
            "flywheel",
            ActuatorCommand::spin(direction, speed).issue(&mut self.flywheel),
        );
    }

    /// Stops the intake.
    pub fn stop_intake(&mut self) {
        report("stop intake", self.intake.stop());
    }

    /// Stops the flywheel.
    pub fn stop_flywheel(&mut self) {
        report("stop flywheel", self.flywheel.stop());
    }

    /// Stops both motors.
    pub fn stop(&mut self) {
        self.stop_intake();
        self.stop_flywheel();
    }

    /// Runs the intake for `duration` at `speed` (negative runs it in
    /// reverse), then stops it.
    ///
    /// With `blocking` unset the intake is started and the call returns
    /// success immediately, leaving it running.
    pub fn timed_intake<K: Clock + ?Sized, A: AbortSignal>(
        &mut self,
        monitor: &Monitor<'_, K, A>,
        duration: Duration,
        speed: Ratio,
        blocking: bool,
    ) -> Result<(), Interruption> {
        debug!("intake {:.0}% for {:?}", speed.get::<percent>(), duration);
        self.spin_intake(Direction::Forward, speed);
        if !blocking {
            return Ok(());
        }
        self.run_out(monitor, duration, Self::stop_intake)
    }

    /// Runs the flywheel for `duration` at `speed`, then stops it.
    ///
    /// With `blocking` unset the flywheel is started and the call returns
    /// success immediately, leaving it running.
    pub fn timed_flywheel<K: Clock + ?Sized, A: AbortSignal>(
        &mut self,
        monitor: &Monitor<'_, K, A>,
        duration: Duration,
        speed: Ratio,
        blocking: bool,
    ) -> Result<(), Interruption> {
        debug!("flywheel {:.0}% for {:?}", speed.get::<percent>(), duration);
        self.spin_flywheel(Direction::Forward, speed);
        if !blocking {
            return Ok(());
        }
        self.run_out(monitor, duration, Self::stop_flywheel)
    }

    fn run_out<K: Clock + ?Sized, A: AbortSignal>(
        &mut self,
        monitor: &Monitor<'_, K, A>,
        duration: Duration,
        finish: fn(&mut Self),
    ) -> Result<(), Interruption> {
        monitor
            .wait_for(
                self,
                |_| false,
                |mechanism, cause| match cause {
                    Interruption::OperatorAbort => {
                        warn!("mechanism {}, stopping", cause);
                        mechanism.stop();
                    }
                    Interruption::Timeout => finish(mechanism),
                },
                duration,
            )
            .into_timed_result()
    }
}

fn report(what: &str, result: Result<(), MotorError>) {
    if let Err(err) = result {
        warn!("{}: {}", what, err);
    }
}
