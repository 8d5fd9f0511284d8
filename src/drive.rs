//! Differential drivetrain control.
//!
//! Driver control streams velocity commands through [`Drivetrain::arcade`].
//! Autonomous moves are profiled by the motors themselves: each primitive
//! issues one non-blocking target per side and then waits on a
//! [`Monitor`](crate::monitor::Monitor). Straight lines come from commanding
//! both sides symmetrically; drift is not corrected.

use core::time::Duration;

use log::{debug, warn};
use uom::si::{
    angle::revolution,
    f64::{Angle, Ratio},
    ratio::percent,
};

use crate::{
    monitor::{AbortSignal, Interruption, Monitor},
    motor::{ActuatorCommand, Direction, Motor, MotorError, MotorGroup},
    rtos::Clock,
};

/// A drivetrain with separate left and right motor groups.
pub struct Drivetrain<M, const N: usize = 2> {
    left: MotorGroup<M, N>,
    right: MotorGroup<M, N>,
}

impl<M: Motor, const N: usize> Drivetrain<M, N> {
    /// Creates a new drivetrain with the provided left/right motors. Motor
    /// reversal must already make positive commands drive forward on both
    /// sides.
    pub fn new(left: [M; N], right: [M; N]) -> Self {
        Self {
            left: MotorGroup::new(left),
            right: MotorGroup::new(right),
        }
    }

    /// Sets the velocity used by subsequent profiled moves, per side.
    pub fn set_velocity(&mut self, left: Ratio, right: Ratio) {
        report("set left velocity", self.left.set_velocity(left));
        report("set right velocity", self.right.set_velocity(right));
    }

    /// Commands every drive motor to stop.
    pub fn stop(&mut self) {
        report("stop left", self.left.stop());
        report("stop right", self.right.stop());
    }

    /// Whether both sides have reached their targets. A failed status query
    /// reads as still moving, leaving the timeout to catch a dead motor.
    pub fn is_done(&self) -> bool {
        let done = |side: &MotorGroup<M, N>| {
            side.is_done().unwrap_or_else(|err| {
                debug!("drive status: {}", err);
                false
            })
        };
        done(&self.left) && done(&self.right)
    }

    /// Continuous velocity command for driver control. Never blocks.
    pub fn arcade(&mut self, left: Ratio, right: Ratio) {
        report(
            "left",
            self.left
                .command(&ActuatorCommand::spin(Direction::Forward, left)),
        );
        report(
            "right",
            self.right
                .command(&ActuatorCommand::spin(Direction::Forward, right)),
        );
    }

    /// Drives straight by `turns` wheel rotations.
    pub fn drive_distance<K: Clock + ?Sized, A: AbortSignal>(
        &mut self,
        monitor: &Monitor<'_, K, A>,
        turns: Angle,
        velocity: Ratio,
        timeout: Duration,
    ) -> Result<(), Interruption> {
        debug!(
            "drive {:.2} turns at {:.0}%",
            turns.get::<revolution>(),
            velocity.get::<percent>()
        );
        self.set_velocity(velocity, velocity);
        let cmd = ActuatorCommand::spin_for(Direction::Forward, turns);
        self.start(&cmd, &cmd);
        self.await_motion(monitor, timeout)
    }

    /// Pivots in place: the left side rotates forward by `turns`, the right
    /// side backward by the same amount.
    pub fn turn_in_place<K: Clock + ?Sized, A: AbortSignal>(
        &mut self,
        monitor: &Monitor<'_, K, A>,
        turns: Angle,
        velocity: Ratio,
        timeout: Duration,
    ) -> Result<(), Interruption> {
        debug!(
            "turn {:.2} turns at {:.0}%",
            turns.get::<revolution>(),
            velocity.get::<percent>()
        );
        self.set_velocity(velocity, velocity);
        let left = Direction::Forward;
        self.start(
            &ActuatorCommand::spin_for(left, turns),
            &ActuatorCommand::spin_for(left.opposite(), turns),
        );
        self.await_motion(monitor, timeout)
    }

    /// Moves each side to its own absolute position, which allows arcs.
    pub fn drive_to_absolute<K: Clock + ?Sized, A: AbortSignal>(
        &mut self,
        monitor: &Monitor<'_, K, A>,
        left: Angle,
        right: Angle,
        velocity: Ratio,
        timeout: Duration,
    ) -> Result<(), Interruption> {
        debug!(
            "drive to ({:.2}, {:.2}) turns at {:.0}%",
            left.get::<revolution>(),
            right.get::<revolution>(),
            velocity.get::<percent>()
        );
        self.set_velocity(velocity, velocity);
        self.start(
            &ActuatorCommand::spin_to_position(left),
            &ActuatorCommand::spin_to_position(right),
        );
        self.await_motion(monitor, timeout)
    }

    fn start(&mut self, left: &ActuatorCommand, right: &ActuatorCommand) {
        report("left", self.left.command(left));
        report("right", self.right.command(right));
    }

    fn await_motion<K: Clock + ?Sized, A: AbortSignal>(
        &mut self,
        monitor: &Monitor<'_, K, A>,
        timeout: Duration,
    ) -> Result<(), Interruption> {
        monitor
            .wait_for(
                self,
                |dt| dt.is_done(),
                |dt, cause| {
                    warn!("drive {}, stopping", cause);
                    dt.stop();
                },
                timeout,
            )
            .into_result()
    }
}

fn report(what: &str, result: Result<(), MotorError>) {
    if let Err(err) = result {
        warn!("drive {}: {}", what, err);
    }
}
