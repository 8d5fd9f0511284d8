//! Tick-based waiting for blocking primitives.
//!
//! Every blocking action in the crate ends in [`await_completion`]: it polls
//! the abort signal, then the completion predicate, then the elapsed time,
//! once per tick, and makes sure the actuators are commanded to stop before
//! returning on an abort or a timeout.

use core::{
    fmt::{self, Display, Formatter},
    time::Duration,
};

use log::warn;

use crate::{
    competition::{FieldControl, Mode},
    config::{ABORT_BUTTON, TICK},
    controller::{pressed_or_released, Button, Controller},
    rtos::Clock,
};

/// How a wait ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionResult {
    /// The completion predicate became true.
    Completed,
    /// The operator requested an abort.
    Aborted,
    /// The timeout elapsed first.
    TimedOut,
}

impl CompletionResult {
    /// Collapses the result for primitives which have a completion predicate:
    /// only [`CompletionResult::Completed`] is a success.
    pub fn into_result(self) -> Result<(), Interruption> {
        match self {
            CompletionResult::Completed => Ok(()),
            CompletionResult::Aborted => Err(Interruption::OperatorAbort),
            CompletionResult::TimedOut => Err(Interruption::Timeout),
        }
    }

    /// Collapses the result for purely timed primitives, where running out
    /// the clock is the success path.
    pub fn into_timed_result(self) -> Result<(), Interruption> {
        match self {
            CompletionResult::Aborted => Err(Interruption::OperatorAbort),
            CompletionResult::Completed | CompletionResult::TimedOut => Ok(()),
        }
    }
}

/// Why a primitive did not complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interruption {
    /// An abort was requested, by the abort button or by field control
    /// disabling the robot.
    OperatorAbort,
    /// The action took longer than allowed. A stalled motor ends up here.
    Timeout,
}

impl Display for Interruption {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Interruption::OperatorAbort => f.write_str("aborted by operator"),
            Interruption::Timeout => f.write_str("timed out"),
        }
    }
}

/// Polls until `is_done` holds, an abort is requested or `timeout` elapses.
///
/// Each tick evaluates, in order: the abort signal, the completion predicate,
/// the elapsed time. A tick which sees both the abort and completion yields
/// [`CompletionResult::Aborted`]. `on_timeout_or_abort` runs at most once and
/// never for [`CompletionResult::Completed`]. Elapsed time is accumulated in
/// whole ticks, so the call returns within `timeout + tick`. A zero tick is
/// treated as one millisecond.
pub fn await_completion<T, K: Clock + ?Sized>(
    clock: &K,
    subject: &mut T,
    mut is_done: impl FnMut(&T) -> bool,
    mut is_abort_requested: impl FnMut() -> bool,
    on_timeout_or_abort: impl FnOnce(&mut T, Interruption),
    timeout: Duration,
    tick: Duration,
) -> CompletionResult {
    let tick = tick.max(Duration::from_millis(1));
    let mut elapsed = Duration::ZERO;
    loop {
        if is_abort_requested() {
            on_timeout_or_abort(subject, Interruption::OperatorAbort);
            return CompletionResult::Aborted;
        }
        if is_done(subject) {
            return CompletionResult::Completed;
        }
        if elapsed >= timeout {
            on_timeout_or_abort(subject, Interruption::Timeout);
            return CompletionResult::TimedOut;
        }
        clock.delay(tick);
        elapsed += tick;
    }
}

/// Something that can ask a running primitive to stop.
pub trait AbortSignal {
    /// Sampled once per tick.
    fn abort_requested(&self) -> bool;

    /// Fires when either signal does. `self` is sampled first.
    fn or<B: AbortSignal>(self, other: B) -> Or<Self, B>
    where
        Self: Sized,
    {
        Or(self, other)
    }
}

/// Two abort signals combined with [`AbortSignal::or`].
pub struct Or<A, B>(A, B);

impl<A: AbortSignal, B: AbortSignal> AbortSignal for Or<A, B> {
    fn abort_requested(&self) -> bool {
        self.0.abort_requested() || self.1.abort_requested()
    }
}

impl<F: Fn() -> bool> AbortSignal for F {
    fn abort_requested(&self) -> bool {
        self()
    }
}

/// Abort signal backed by a controller button.
pub struct AbortButton<'a, C: ?Sized> {
    controller: &'a C,
    button: Button,
}

impl<'a, C: Controller + ?Sized> AbortButton<'a, C> {
    /// Watches the configured [`ABORT_BUTTON`].
    pub fn new(controller: &'a C) -> Self {
        Self::with_button(controller, ABORT_BUTTON)
    }

    /// Watches any button.
    pub fn with_button(controller: &'a C, button: Button) -> Self {
        Self { controller, button }
    }
}

impl<C: Controller + ?Sized> AbortSignal for AbortButton<'_, C> {
    fn abort_requested(&self) -> bool {
        let pressed = pressed_or_released(self.controller, self.button);
        if pressed {
            warn!("abort requested with {:?}", self.button);
        }
        pressed
    }
}

/// Abort signal which fires once field control disables the robot, e.g. at
/// the end of the autonomous period.
pub struct FieldDisabled<'a, F: ?Sized> {
    field: &'a F,
}

impl<'a, F: FieldControl + ?Sized> FieldDisabled<'a, F> {
    /// Watches `field`.
    pub fn new(field: &'a F) -> Self {
        Self { field }
    }
}

impl<F: FieldControl + ?Sized> AbortSignal for FieldDisabled<'_, F> {
    fn abort_requested(&self) -> bool {
        let disabled = self.field.status().mode() == Mode::Disabled;
        if disabled {
            warn!("robot disabled by field control");
        }
        disabled
    }
}

/// Everything a blocking primitive needs besides the actuators it drives:
/// the clock to sleep on, the abort signal and the tick period.
pub struct Monitor<'a, K: ?Sized, A> {
    clock: &'a K,
    abort: A,
    tick: Duration,
}

impl<'a, K: Clock + ?Sized, A: AbortSignal> Monitor<'a, K, A> {
    /// A monitor ticking at the control-loop period.
    pub fn new(clock: &'a K, abort: A) -> Self {
        Self::with_tick(clock, abort, TICK)
    }

    /// A monitor with a custom tick period.
    pub fn with_tick(clock: &'a K, abort: A, tick: Duration) -> Self {
        Self { clock, abort, tick }
    }

    /// The clock the monitor sleeps on.
    pub fn clock(&self) -> &'a K {
        self.clock
    }

    /// Samples the abort signal once.
    pub fn abort_requested(&self) -> bool {
        self.abort.abort_requested()
    }

    /// [`await_completion`] with this monitor's clock, abort signal and tick.
    pub fn wait_for<T>(
        &self,
        subject: &mut T,
        is_done: impl FnMut(&T) -> bool,
        on_timeout_or_abort: impl FnOnce(&mut T, Interruption),
        timeout: Duration,
    ) -> CompletionResult {
        await_completion(
            self.clock,
            subject,
            is_done,
            || self.abort_requested(),
            on_timeout_or_abort,
            timeout,
            self.tick,
        )
    }

    /// Waits out `duration` unless aborted. Nothing is stopped on timeout;
    /// `on_abort` runs if the operator aborts.
    pub fn pause<T>(
        &self,
        subject: &mut T,
        on_abort: impl FnOnce(&mut T),
        duration: Duration,
    ) -> Result<(), Interruption> {
        self.wait_for(
            subject,
            |_| false,
            |s, cause| {
                if cause == Interruption::OperatorAbort {
                    on_abort(s)
                }
            },
            duration,
        )
        .into_timed_result()
    }
}
