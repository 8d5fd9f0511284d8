//! The autonomous routine.
//!
//! A routine is a fixed slice of [`Step`]s defined at compile time. The
//! [`Sequencer`] runs them in order and halts on the first step that does not
//! succeed; there are no retries.

use alloc::format;
use core::{
    fmt::{self, Display, Formatter},
    time::Duration,
};

use log::{debug, info, warn};
use uom::si::{
    angle::revolution,
    f64::{Angle, Ratio},
    ratio::percent,
};

use crate::{
    config::{DRIVE_TIMEOUT, DRIVE_VELOCITY},
    controller::print_line,
    monitor::{AbortButton, AbortSignal, FieldDisabled, Interruption, Monitor},
    peripherals::{Peripherals, Platform},
};

/// The pneumatic actuators a step can set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Actuator {
    /// The scoop cylinder.
    Scoop,
    /// The descore wing cylinder.
    DescoreWing,
}

/// One primitive action with its parameters.
///
/// Distances are wheel rotations, velocities and speeds are percentages.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// Sets the velocity of later profiled moves, per side. Does not move.
    SetDriveVelocity {
        /// Left side, percent.
        left: f64,
        /// Right side, percent.
        right: f64,
    },
    /// Drives straight by a relative distance.
    DriveDistance {
        /// Wheel rotations, negative drives backwards.
        turns: f64,
        /// Percent.
        velocity: f64,
        /// Longest the move may take.
        timeout: Duration,
    },
    /// Pivots in place, left side forward.
    TurnInPlace {
        /// Wheel rotations per side.
        turns: f64,
        /// Percent.
        velocity: f64,
        /// Longest the turn may take.
        timeout: Duration,
    },
    /// Moves each side to an absolute position.
    DriveToAbsolute {
        /// Left target, wheel rotations.
        left: f64,
        /// Right target, wheel rotations.
        right: f64,
        /// Percent.
        velocity: f64,
        /// Longest the move may take.
        timeout: Duration,
    },
    /// Runs the intake for a while.
    Intake {
        /// How long to run.
        duration: Duration,
        /// Percent, negative reverses.
        speed: f64,
        /// Whether to wait out the duration before the next step.
        blocking: bool,
    },
    /// Runs the flywheel for a while.
    Flywheel {
        /// How long to run.
        duration: Duration,
        /// Percent, negative reverses.
        speed: f64,
        /// Whether to wait out the duration before the next step.
        blocking: bool,
    },
    /// Sets a pneumatic actuator and waits for it to settle.
    Pneumatic {
        /// Which cylinder.
        actuator: Actuator,
        /// Extended or retracted.
        engaged: bool,
    },
    /// Does nothing for a while, still watching the abort button.
    Wait(Duration),
}

impl Display for Step {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Step::SetDriveVelocity { left, right } => write!(f, "velocity {}/{}", left, right),
            Step::DriveDistance { turns, .. } => write!(f, "drive {}", turns),
            Step::TurnInPlace { turns, .. } => write!(f, "turn {}", turns),
            Step::DriveToAbsolute { left, right, .. } => write!(f, "to {}/{}", left, right),
            Step::Intake { speed, .. } => write!(f, "intake {}", speed),
            Step::Flywheel { speed, .. } => write!(f, "flywheel {}", speed),
            Step::Pneumatic { actuator, engaged } => write!(
                f,
                "{} {}",
                match actuator {
                    Actuator::Scoop => "scoop",
                    Actuator::DescoreWing => "wing",
                },
                if engaged { "out" } else { "in" }
            ),
            Step::Wait(d) => write!(f, "wait {}ms", d.as_millis()),
        }
    }
}

/// Drives forward two wheel rotations, roughly one foot.
pub static DRIVE_FORWARD: &[Step] = &[
    Step::SetDriveVelocity {
        left: DRIVE_VELOCITY,
        right: DRIVE_VELOCITY,
    },
    Step::DriveToAbsolute {
        left: 2.0,
        right: 2.0,
        velocity: DRIVE_VELOCITY,
        timeout: DRIVE_TIMEOUT,
    },
];

/// Where a sequence is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceState {
    /// Not started.
    Idle,
    /// Executing the step at `index`.
    Running {
        /// Zero-based step index.
        index: usize,
    },
    /// Every step succeeded.
    Completed,
    /// The step at `index` failed and the sequence stopped there.
    Aborted {
        /// Zero-based step index.
        index: usize,
        /// Why the step failed.
        cause: Interruption,
    },
}

/// The step that ended a sequence early.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepFailure {
    /// Zero-based step index.
    pub index: usize,
    /// Why the step failed.
    pub cause: Interruption,
}

impl Display for StepFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "step {} {}", self.index + 1, self.cause)
    }
}

/// Runs the primitive behind a step.
///
/// The robot's executor aborts a step when the abort button is pressed or
/// field control disables the robot, and stops every motor on any failure.
pub trait StepExecutor<S> {
    /// Executes one step, blocking until it finishes.
    fn execute(&mut self, step: &S) -> Result<(), Interruption>;

    /// Called on every state change of the sequence, before the step runs.
    fn on_transition(&mut self, _state: SequenceState, _steps: &[S]) {}
}

/// Halt-on-failure execution of a fixed list of steps.
pub struct Sequencer<'a, S> {
    steps: &'a [S],
    state: SequenceState,
}

impl<'a, S: Display> Sequencer<'a, S> {
    /// A sequencer in the [`SequenceState::Idle`] state.
    pub fn new(steps: &'a [S]) -> Self {
        Self {
            steps,
            state: SequenceState::Idle,
        }
    }

    /// The current state.
    pub fn state(&self) -> SequenceState {
        self.state
    }

    /// The steps being sequenced.
    pub fn steps(&self) -> &'a [S] {
        self.steps
    }

    /// Runs every step in order, stopping at the first failure.
    ///
    /// Timeouts and operator aborts both end the sequence; the failure keeps
    /// the cause.
    pub fn run<E: StepExecutor<S> + ?Sized>(
        &mut self,
        executor: &mut E,
    ) -> Result<(), StepFailure> {
        let steps = self.steps();
        info!("running {} steps", steps.len());
        for (index, step) in steps.iter().enumerate() {
            self.transition(executor, SequenceState::Running { index });
            debug!("step {}/{}: {}", index + 1, steps.len(), step);
            if let Err(cause) = executor.execute(step) {
                let failure = StepFailure { index, cause };
                self.transition(executor, SequenceState::Aborted { index, cause });
                warn!("sequence halted: {}", failure);
                return Err(failure);
            }
        }
        self.transition(executor, SequenceState::Completed);
        info!("sequence completed");
        Ok(())
    }

    fn transition<E: StepExecutor<S> + ?Sized>(&mut self, executor: &mut E, state: SequenceState) {
        self.state = state;
        executor.on_transition(state, self.steps);
    }
}

fn pct(value: f64) -> Ratio {
    Ratio::new::<percent>(value)
}

fn turns(value: f64) -> Angle {
    Angle::new::<revolution>(value)
}

impl<P: Platform> StepExecutor<Step> for Peripherals<P> {
    fn execute(&mut self, step: &Step) -> Result<(), Interruption> {
        let Peripherals {
            drivetrain,
            mechanism,
            scoop,
            descore_wing,
            controller,
            clock,
            field,
            ..
        } = self;
        let abort = AbortButton::new(&*controller);
        let monitor = Monitor::new(&*clock, abort.or(FieldDisabled::new(&*field)));

        let result = match *step {
            Step::SetDriveVelocity { left, right } => {
                drivetrain.set_velocity(pct(left), pct(right));
                Ok(())
            }
            Step::DriveDistance {
                turns: t,
                velocity,
                timeout,
            } => drivetrain.drive_distance(&monitor, turns(t), pct(velocity), timeout),
            Step::TurnInPlace {
                turns: t,
                velocity,
                timeout,
            } => drivetrain.turn_in_place(&monitor, turns(t), pct(velocity), timeout),
            Step::DriveToAbsolute {
                left,
                right,
                velocity,
                timeout,
            } => drivetrain.drive_to_absolute(
                &monitor,
                turns(left),
                turns(right),
                pct(velocity),
                timeout,
            ),
            Step::Intake {
                duration,
                speed,
                blocking,
            } => mechanism.timed_intake(&monitor, duration, pct(speed), blocking),
            Step::Flywheel {
                duration,
                speed,
                blocking,
            } => mechanism.timed_flywheel(&monitor, duration, pct(speed), blocking),
            Step::Pneumatic { actuator, engaged } => {
                match actuator {
                    Actuator::Scoop => scoop.actuate(monitor.clock(), engaged),
                    Actuator::DescoreWing => descore_wing.actuate(monitor.clock(), engaged),
                }
                Ok(())
            }
            Step::Wait(duration) => monitor.pause(&mut (), |_| {}, duration),
        };

        if result.is_err() {
            self.stop_all();
        }
        result
    }

    fn on_transition(&mut self, state: SequenceState, steps: &[Step]) {
        let text = match state {
            SequenceState::Idle => return,
            SequenceState::Running { index } => {
                format!("{}/{} {}", index + 1, steps.len(), steps[index])
            }
            SequenceState::Completed => "auton done".into(),
            SequenceState::Aborted { index, cause } => match cause {
                Interruption::OperatorAbort => format!("{} ABORT", index + 1),
                Interruption::Timeout => format!("{} TIMEOUT", index + 1),
            },
        };
        print_line(&mut self.screen, 0, &text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adi::AdiPort,
        config::{ABORT_BUTTON, PNEUMATIC_SETTLE, TURN_TIMEOUT},
        motor::Direction,
        rtos::{Clock, Instant},
        sim::{MotorEvent, Sim},
    };
    use alloc::{string::String, vec::Vec};

    /// Steps named by a label; the executor fails those listed in `failing`.
    struct Script {
        failing: Vec<(&'static str, Interruption)>,
        executed: Vec<&'static str>,
        states: Vec<SequenceState>,
    }

    impl Script {
        fn new(failing: &[(&'static str, Interruption)]) -> Self {
            Self {
                failing: failing.to_vec(),
                executed: Vec::new(),
                states: Vec::new(),
            }
        }
    }

    impl StepExecutor<&'static str> for Script {
        fn execute(&mut self, step: &&'static str) -> Result<(), Interruption> {
            self.executed.push(step);
            match self.failing.iter().find(|(name, _)| name == step) {
                Some((_, cause)) => Err(*cause),
                None => Ok(()),
            }
        }

        fn on_transition(&mut self, state: SequenceState, _steps: &[&'static str]) {
            self.states.push(state);
        }
    }

    #[test]
    fn halts_at_the_first_failure() {
        let steps = ["A", "B", "C"];
        let mut script = Script::new(&[("B", Interruption::Timeout)]);
        let mut sequencer = Sequencer::new(&steps[..]);

        let result = sequencer.run(&mut script);
        assert_eq!(
            result,
            Err(StepFailure {
                index: 1,
                cause: Interruption::Timeout
            })
        );
        assert_eq!(script.executed, ["A", "B"]);
        assert_eq!(
            sequencer.state(),
            SequenceState::Aborted {
                index: 1,
                cause: Interruption::Timeout
            }
        );
    }

    #[test]
    fn runs_every_step_in_order_on_success() {
        let steps = ["A", "B"];
        let mut script = Script::new(&[]);
        let mut sequencer = Sequencer::new(&steps[..]);
        assert_eq!(sequencer.state(), SequenceState::Idle);

        assert_eq!(sequencer.run(&mut script), Ok(()));
        assert_eq!(script.executed, ["A", "B"]);
        assert_eq!(
            script.states,
            [
                SequenceState::Running { index: 0 },
                SequenceState::Running { index: 1 },
                SequenceState::Completed
            ]
        );
    }

    #[test]
    fn abort_and_timeout_stay_distinguishable() {
        let steps = ["A"];
        let mut script = Script::new(&[("A", Interruption::OperatorAbort)]);
        let failure = Sequencer::new(&steps[..]).run(&mut script).unwrap_err();
        assert_eq!(failure.cause, Interruption::OperatorAbort);
        assert_eq!(alloc::format!("{}", failure), "step 1 aborted by operator");
    }

    #[test]
    fn drive_forward_routine_on_the_robot() {
        let sim = Sim::new();
        let mut peripherals = sim.peripherals();

        let result = Sequencer::new(DRIVE_FORWARD).run(&mut peripherals);
        assert_eq!(result, Ok(()));
        assert_eq!(
            sim.motor_events(1),
            [
                MotorEvent::SetVelocity(70.0),
                MotorEvent::SetVelocity(70.0),
                MotorEvent::SpinTo(2.0)
            ]
        );
        assert_eq!(
            sim.screen_lines().last(),
            Some(&(0, String::from("auton done")))
        );
    }

    #[test]
    fn aborted_step_stops_every_actuator_and_skips_the_rest() {
        let sim = Sim::new();
        sim.press(ABORT_BUTTON, Duration::from_millis(500), None);
        let mut peripherals = sim.peripherals();
        let steps = [
            Step::Flywheel {
                duration: Duration::from_secs(5),
                speed: 100.0,
                blocking: false,
            },
            Step::Wait(Duration::from_secs(1)),
            Step::Pneumatic {
                actuator: Actuator::Scoop,
                engaged: true,
            },
        ];

        let result = Sequencer::new(&steps[..]).run(&mut peripherals);
        assert_eq!(
            result,
            Err(StepFailure {
                index: 1,
                cause: Interruption::OperatorAbort
            })
        );
        assert_eq!(sim.last_motor_event(8), Some(MotorEvent::Stop));
        for port in [1, 2, 3, 9, 10] {
            assert_eq!(sim.last_motor_event(port), Some(MotorEvent::Stop));
        }
        assert!(sim.digital_writes(AdiPort::A).is_empty());
        assert_eq!(
            sim.screen_lines().last(),
            Some(&(0, String::from("2 ABORT")))
        );
    }

    #[test]
    fn timed_out_step_stops_every_motor() {
        let sim = Sim::new();
        sim.set_motion_time(9, None);
        let mut peripherals = sim.peripherals();
        let steps = [
            Step::Intake {
                duration: Duration::from_secs(5),
                speed: 100.0,
                blocking: false,
            },
            Step::TurnInPlace {
                turns: 0.25,
                velocity: 30.0,
                timeout: TURN_TIMEOUT,
            },
            Step::Pneumatic {
                actuator: Actuator::Scoop,
                engaged: true,
            },
        ];
        let start = peripherals.clock.time_since_start();

        let mut sequencer = Sequencer::new(&steps[..]);
        let result = sequencer.run(&mut peripherals);
        assert_eq!(
            result,
            Err(StepFailure {
                index: 1,
                cause: Interruption::Timeout
            })
        );
        assert_eq!(
            sequencer.state(),
            SequenceState::Aborted {
                index: 1,
                cause: Interruption::Timeout
            }
        );
        assert_eq!(peripherals.clock.time_since_start(), start + TURN_TIMEOUT);
        for port in [1, 2, 3, 8, 9, 10] {
            assert_eq!(sim.last_motor_event(port), Some(MotorEvent::Stop));
        }
        assert!(sim.digital_writes(AdiPort::A).is_empty());
        assert_eq!(
            sim.screen_lines().last(),
            Some(&(0, String::from("2 TIMEOUT")))
        );
    }

    #[test]
    fn field_disable_ends_the_routine() {
        let sim = Sim::new();
        sim.end_mode_at(Duration::from_millis(300));
        let mut peripherals = sim.peripherals();
        let steps = [
            Step::Flywheel {
                duration: Duration::from_secs(5),
                speed: 100.0,
                blocking: true,
            },
            Step::Wait(Duration::from_secs(1)),
        ];

        let result = Sequencer::new(&steps[..]).run(&mut peripherals);
        assert_eq!(
            result,
            Err(StepFailure {
                index: 0,
                cause: Interruption::OperatorAbort
            })
        );
        assert_eq!(
            peripherals.clock.time_since_start(),
            Instant::from_millis(300)
        );
        for port in [1, 2, 3, 8, 9, 10] {
            assert_eq!(sim.last_motor_event(port), Some(MotorEvent::Stop));
        }
    }

    #[test]
    fn every_primitive_through_the_robot() {
        let sim = Sim::new();
        let mut peripherals = sim.peripherals();
        let steps = [
            Step::DriveDistance {
                turns: 1.0,
                velocity: 50.0,
                timeout: Duration::from_secs(2),
            },
            Step::TurnInPlace {
                turns: 0.25,
                velocity: 30.0,
                timeout: Duration::from_secs(2),
            },
            Step::Intake {
                duration: Duration::from_millis(400),
                speed: -100.0,
                blocking: true,
            },
            Step::Pneumatic {
                actuator: Actuator::DescoreWing,
                engaged: true,
            },
        ];

        let start = peripherals.clock.time_since_start();
        assert_eq!(Sequencer::new(&steps[..]).run(&mut peripherals), Ok(()));
        assert_eq!(
            sim.last_motor_event(9),
            Some(MotorEvent::SpinFor(Direction::Reverse, 0.25))
        );
        assert_eq!(
            sim.motor_events(3),
            [
                MotorEvent::Spin(Direction::Forward, -100.0),
                MotorEvent::Stop
            ]
        );
        assert_eq!(
            sim.digital_level(crate::config::DESCORE_WING_PORT),
            Some(true)
        );
        assert!(
            peripherals.clock.time_since_start() >= start + PNEUMATIC_SETTLE
        );
    }
}
