//! Coalescing of filter input for an external filter owner

use std::time::{Duration, Instant};

use dg_core::FilterState;

/// Cancellable one-shot deadline driven by caller-supplied instants
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl DebounceTimer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Change the quiet period; a pending deadline keeps its old value
    pub fn set_quiet_period(&mut self, quiet: Duration) {
        self.quiet = quiet;
    }

    /// Start the quiet period at `now`, replacing any pending deadline
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Disarm and return true once `now` has reached the deadline
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Input echo plus the timer that decides when it is forwarded.
///
/// The echo is what the filter controls display while a forward is pending.
/// Only the mapping as it stands when the timer fires is forwarded.
#[derive(Debug, Clone)]
pub struct FilterDebouncer {
    echo: FilterState,
    timer: DebounceTimer,
}

impl FilterDebouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            echo: FilterState::new(),
            timer: DebounceTimer::new(quiet),
        }
    }

    pub fn set_quiet_period(&mut self, quiet: Duration) {
        self.timer.set_quiet_period(quiet);
    }

    pub fn echo(&self) -> &FilterState {
        &self.echo
    }

    /// Record one input change and restart the quiet period
    pub fn input(&mut self, accessor: &str, value: &str, now: Instant) {
        self.echo.set(accessor, value);
        self.timer.arm(now);
    }

    /// Full echo mapping to forward, if the quiet period has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<FilterState> {
        if self.timer.fire_if_due(now) {
            Some(self.echo.clone())
        } else {
            None
        }
    }

    /// Take in values the external owner reflected back
    pub fn reconcile(&mut self, external: &FilterState) {
        self.echo.overwrite_from(external);
    }

    pub fn cancel(&mut self) {
        self.timer.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }
}
