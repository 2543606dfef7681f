//! Confirmation state machine.
//!
//! A [`ConfirmController`] owns the lifecycle of a single confirmation
//! button: idle until pressed, then prompting for a second press within a
//! timeout window, then showing the outcome. The caller-supplied action runs
//! exactly once per cycle, on the prompted-to-success transition.
//!
//! The controller is driven from the host's event loop: key or mouse presses
//! arrive through [`ConfirmController::handle_click`], and the tick handler
//! calls [`ConfirmController::poll`] so expired deadlines take effect. Both
//! take `&mut self`, so a click and an expiry can never interleave
//! mid-transition.

use std::time::{Duration, Instant};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::trace;

use super::deadline::Deadline;

/// Lifecycle phase of a confirmation button. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Idle, showing the caller's label.
    Initial,
    /// Waiting for the confirming press; reverts to [`Phase::Initial`] when
    /// the prompt window elapses without one.
    Prompted,
    /// The action has run; shown briefly before the cycle resolves.
    Success,
    /// Terminal resting state of the four-phase cycle. A press returns to
    /// [`Phase::Initial`].
    Completed,
}

/// How the cycle resolves out of [`Phase::Success`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleMode {
    /// `Success` resolves straight back to `Initial`; `Completed` is never
    /// entered.
    ThreePhase,
    /// `Success` resolves to a distinct `Completed` phase.
    #[default]
    FourPhase,
}

/// Timing and cycle configuration for a [`ConfirmController`].
#[derive(Debug, Clone, Copy)]
pub struct ConfirmConfig {
    /// How long the confirmation prompt stays up before reverting.
    pub prompt_timeout: Duration,
    /// How long the success state is shown before resolving.
    pub success_display: Duration,
    pub mode: CycleMode,
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        Self {
            prompt_timeout: Duration::from_millis(3000),
            success_display: Duration::from_millis(2000),
            mode: CycleMode::default(),
        }
    }
}

type Action = Box<dyn FnMut()>;

/// State machine for a single confirmation button.
///
/// Owns the current [`Phase`] and at most one armed [`Deadline`]. Every
/// transition replaces the deadline wholesale, so a deadline armed for a
/// phase the controller has since left no longer exists and cannot fire.
pub struct ConfirmController {
    phase: Phase,
    deadline: Option<Deadline>,
    config: ConfirmConfig,
    on_confirmed: Action,
    subscribers: Vec<UnboundedSender<Phase>>,
    disposed: bool,
}

impl ConfirmController {
    /// Create a controller with default timing (3s prompt, 2s success
    /// display, four-phase cycle).
    pub fn new(on_confirmed: impl FnMut() + 'static) -> Self {
        Self::with_config(on_confirmed, ConfirmConfig::default())
    }

    pub fn with_config(on_confirmed: impl FnMut() + 'static, config: ConfirmConfig) -> Self {
        Self {
            phase: Phase::Initial,
            deadline: None,
            config,
            on_confirmed: Box::new(on_confirmed),
            subscribers: Vec::new(),
            disposed: false,
        }
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Fraction of the confirmation window elapsed, in [0, 1].
    ///
    /// Meaningful only during [`Phase::Prompted`]; 0.0 in every other phase.
    pub fn progress_fraction(&self) -> f64 {
        self.progress_fraction_at(Instant::now())
    }

    /// [`Self::progress_fraction`] against an explicit clock reading.
    pub fn progress_fraction_at(&self, now: Instant) -> f64 {
        match self.phase {
            Phase::Prompted => self
                .deadline
                .map_or(0.0, |deadline| deadline.fraction_elapsed(now)),
            Phase::Initial | Phase::Success | Phase::Completed => 0.0,
        }
    }

    /// Advance the phase in response to a press.
    ///
    /// Every phase has a defined response, so no press is a no-op: idle
    /// starts the prompt, a prompted press confirms (this is the only path
    /// that runs the action), and the later phases step back to idle.
    pub fn handle_click(&mut self) {
        self.handle_click_at(Instant::now());
    }

    /// [`Self::handle_click`] against an explicit clock reading.
    pub fn handle_click_at(&mut self, now: Instant) {
        if self.disposed {
            return;
        }
        match self.phase {
            Phase::Initial => self.transition(Phase::Prompted, now),
            Phase::Prompted => {
                (self.on_confirmed)();
                self.transition(Phase::Success, now);
            }
            Phase::Success => self.transition(self.after_success(), now),
            Phase::Completed => self.transition(Phase::Initial, now),
        }
    }

    /// Apply the expiry transition if the armed deadline has elapsed.
    ///
    /// Expiry only ever moves along the abandonment edges: a stale prompt
    /// reverts to idle, and the success display resolves the cycle. The
    /// action never runs from here.
    pub fn poll(&mut self) {
        self.poll_at(Instant::now());
    }

    /// [`Self::poll`] against an explicit clock reading.
    pub fn poll_at(&mut self, now: Instant) {
        if self.disposed {
            return;
        }
        let Some(deadline) = self.deadline else {
            return;
        };
        if !deadline.is_expired(now) {
            return;
        }
        match self.phase {
            Phase::Prompted => self.transition(Phase::Initial, now),
            Phase::Success => self.transition(self.after_success(), now),
            // No deadline is ever armed for these phases.
            Phase::Initial | Phase::Completed => self.deadline = None,
        }
    }

    /// Receive one message per phase transition, in order.
    ///
    /// Dropping the receiver is fine; closed subscribers are pruned on the
    /// next notification.
    pub fn subscribe(&mut self) -> UnboundedReceiver<Phase> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Cancel any pending deadline and release subscribers. Idempotent; a
    /// disposed controller ignores presses and polls.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.deadline = None;
        self.subscribers.clear();
    }

    const fn after_success(&self) -> Phase {
        match self.config.mode {
            CycleMode::ThreePhase => Phase::Initial,
            CycleMode::FourPhase => Phase::Completed,
        }
    }

    fn transition(&mut self, next: Phase, now: Instant) {
        let previous = self.phase;
        self.phase = next;
        self.deadline = match next {
            Phase::Prompted => Some(Deadline::arm(now, self.config.prompt_timeout)),
            Phase::Success => Some(Deadline::arm(now, self.config.success_display)),
            Phase::Initial | Phase::Completed => None,
        };
        trace!(?previous, ?next, "confirmation phase transition");
        self.subscribers.retain(|tx| tx.send(next).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    fn counting_controller(config: ConfirmConfig) -> (ConfirmController, Rc<Cell<usize>>) {
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let controller =
            ConfirmController::with_config(move || counter.set(counter.get() + 1), config);
        (controller, count)
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_click_cycle_four_phase() {
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let mut controller = ConfirmController::new(move || counter.set(counter.get() + 1));
        assert_eq!(controller.phase(), Phase::Initial);

        controller.handle_click();
        assert_eq!(controller.phase(), Phase::Prompted);
        assert_eq!(count.get(), 0);

        controller.handle_click();
        assert_eq!(controller.phase(), Phase::Success);
        assert_eq!(count.get(), 1);

        controller.handle_click();
        assert_eq!(controller.phase(), Phase::Completed);

        controller.handle_click();
        assert_eq!(controller.phase(), Phase::Initial);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_click_cycle_three_phase() {
        let config = ConfirmConfig {
            mode: CycleMode::ThreePhase,
            ..ConfirmConfig::default()
        };
        let (mut controller, count) = counting_controller(config);

        controller.handle_click();
        controller.handle_click();
        assert_eq!(controller.phase(), Phase::Success);

        controller.handle_click();
        assert_eq!(controller.phase(), Phase::Initial);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_action_fires_once_per_cycle() {
        let (mut controller, count) = counting_controller(ConfirmConfig::default());

        // Two full four-phase cycles, one confirmation each.
        for _ in 0..8 {
            controller.handle_click();
        }
        assert_eq!(controller.phase(), Phase::Initial);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_prompt_times_out_without_confirmation() {
        let (mut controller, count) = counting_controller(ConfirmConfig::default());
        let t0 = Instant::now();

        controller.handle_click_at(t0);
        assert_eq!(controller.phase(), Phase::Prompted);

        controller.poll_at(t0 + ms(2999));
        assert_eq!(controller.phase(), Phase::Prompted);

        controller.poll_at(t0 + ms(3000));
        assert_eq!(controller.phase(), Phase::Initial);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_success_resolves_after_display_window() {
        let (mut controller, count) = counting_controller(ConfirmConfig::default());
        let t0 = Instant::now();

        controller.handle_click_at(t0);
        controller.handle_click_at(t0 + ms(500));
        assert_eq!(controller.phase(), Phase::Success);
        assert_eq!(count.get(), 1);

        controller.poll_at(t0 + ms(2499));
        assert_eq!(controller.phase(), Phase::Success);

        controller.poll_at(t0 + ms(2500));
        assert_eq!(controller.phase(), Phase::Completed);

        controller.handle_click_at(t0 + ms(2600));
        assert_eq!(controller.phase(), Phase::Initial);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_success_resolves_to_initial_in_three_phase() {
        let config = ConfirmConfig {
            mode: CycleMode::ThreePhase,
            ..ConfirmConfig::default()
        };
        let (mut controller, _count) = counting_controller(config);
        let t0 = Instant::now();

        controller.handle_click_at(t0);
        controller.handle_click_at(t0 + ms(100));
        controller.poll_at(t0 + ms(2100));
        assert_eq!(controller.phase(), Phase::Initial);
    }

    #[test]
    fn test_confirming_click_cancels_prompt_deadline() {
        let (mut controller, count) = counting_controller(ConfirmConfig::default());
        let t0 = Instant::now();

        controller.handle_click_at(t0);
        // Confirm just before the prompt window closes.
        controller.handle_click_at(t0 + ms(2900));
        assert_eq!(controller.phase(), Phase::Success);

        // The prompt deadline would have expired by now; only the success
        // deadline (armed at t0+2900) is live, and it has not elapsed.
        controller.poll_at(t0 + ms(3100));
        assert_eq!(controller.phase(), Phase::Success);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_expiry_never_runs_the_action() {
        let (mut controller, count) = counting_controller(ConfirmConfig::default());
        let t0 = Instant::now();

        controller.handle_click_at(t0);
        controller.poll_at(t0 + ms(10_000));
        assert_eq!(controller.phase(), Phase::Initial);
        assert_eq!(count.get(), 0);

        // Idle with no deadline: polling is a no-op.
        controller.poll_at(t0 + ms(20_000));
        assert_eq!(controller.phase(), Phase::Initial);
    }

    #[test]
    fn test_dispose_cancels_pending_deadline() {
        let (mut controller, count) = counting_controller(ConfirmConfig::default());
        let t0 = Instant::now();

        controller.handle_click_at(t0);
        controller.dispose();
        controller.dispose();

        controller.poll_at(t0 + ms(10_000));
        assert_eq!(controller.phase(), Phase::Prompted);
        controller.handle_click_at(t0 + ms(10_001));
        assert_eq!(controller.phase(), Phase::Prompted);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_progress_fraction_tracks_prompt_window() {
        let (mut controller, _count) = counting_controller(ConfirmConfig::default());
        let t0 = Instant::now();

        assert_eq!(controller.progress_fraction_at(t0), 0.0);

        controller.handle_click_at(t0);
        assert_eq!(controller.progress_fraction_at(t0), 0.0);
        let halfway = controller.progress_fraction_at(t0 + ms(1500));
        assert!((halfway - 0.5).abs() < 1e-9);
        assert_eq!(controller.progress_fraction_at(t0 + ms(4000)), 1.0);

        controller.handle_click_at(t0 + ms(1000));
        assert_eq!(controller.phase(), Phase::Success);
        assert_eq!(controller.progress_fraction_at(t0 + ms(1500)), 0.0);
    }

    #[test]
    fn test_subscribers_observe_transitions_in_order() {
        let (mut controller, _count) = counting_controller(ConfirmConfig::default());
        let mut first = controller.subscribe();
        let second = controller.subscribe();

        controller.handle_click();
        controller.handle_click();

        assert_eq!(first.try_recv().ok(), Some(Phase::Prompted));
        assert_eq!(first.try_recv().ok(), Some(Phase::Success));
        assert!(first.try_recv().is_err());

        // A dropped subscriber does not affect the survivors.
        drop(second);
        controller.handle_click();
        assert_eq!(first.try_recv().ok(), Some(Phase::Completed));
    }

    #[test]
    fn test_timeout_then_fresh_cycle() {
        let (mut controller, count) = counting_controller(ConfirmConfig::default());
        let t0 = Instant::now();

        controller.handle_click_at(t0);
        controller.poll_at(t0 + ms(3000));
        assert_eq!(controller.phase(), Phase::Initial);

        // The abandoned prompt leaves no residue for the next cycle.
        let t1 = t0 + ms(5000);
        controller.handle_click_at(t1);
        assert_eq!(controller.progress_fraction_at(t1), 0.0);
        controller.handle_click_at(t1 + ms(500));
        assert_eq!(controller.phase(), Phase::Success);
        assert_eq!(count.get(), 1);
    }
}
