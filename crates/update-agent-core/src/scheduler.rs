//! The agent's control loop.
//!
//! Every poll tick the loop first looks for the trigger marker; if it was
//! consumed a check runs immediately. Otherwise a check runs only once the
//! check interval has elapsed since the previous one. Both paths reset the
//! interval timer.
//!
//! ```text
//!            ┌──────────── sleep(poll) ◄──────────────┐
//!            ▼                                        │
//!   Idle ─► TriggerCheck ──consumed──► RunCheck ──────┤
//!                │                                    │
//!                └──absent/stuck──► ScheduleCheck ────┘
//!                                     (runs a check when due)
//! ```
//!
//! [`Scheduler::tick`] takes the current [`Instant`] as an argument so the
//! state machine can be driven deterministically; [`Scheduler::run_forever`]
//! supplies the real clock and sleeps between ticks.

use crate::agent::Agent;
use crate::config::AgentConfig;
use crate::error::Result;
use crate::trigger::{consume_trigger, TriggerOutcome};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// A full check cycle, as seen by the scheduler.
pub trait CheckCycle {
    fn run_check(&mut self) -> Result<()>;
}

impl CheckCycle for Agent {
    fn run_check(&mut self) -> Result<()> {
        self.check().map(|_| ())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to do this tick.
    Idle,
    /// The trigger marker was consumed and a check ran.
    Triggered,
    /// The check interval elapsed and a check ran.
    Scheduled,
}

pub struct Scheduler<C> {
    cycle: C,
    trigger_file: PathBuf,
    check_interval: Duration,
    poll_interval: Duration,
    /// Start of the most recent check attempt.
    last_check: Option<Instant>,
    /// Set while an undeletable trigger marker sits in place; it is treated as
    /// already consumed and only reported the first time.
    trigger_stuck: bool,
}

impl<C: CheckCycle> Scheduler<C> {
    pub fn new(cycle: C, config: &AgentConfig) -> Self {
        Scheduler {
            cycle,
            trigger_file: config.trigger_file.clone(),
            check_interval: config.check_interval,
            poll_interval: config.poll_interval,
            last_check: None,
            trigger_stuck: false,
        }
    }

    pub fn cycle(&self) -> &C {
        &self.cycle
    }

    pub fn last_check(&self) -> Option<Instant> {
        self.last_check
    }

    pub fn trigger_stuck(&self) -> bool {
        self.trigger_stuck
    }

    /// Whether the check interval has elapsed at `now`. True before the first
    /// check.
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_check {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.check_interval,
        }
    }

    /// The unconditional startup check. A failure is logged and the loop
    /// still starts.
    pub fn start(&mut self, now: Instant) {
        if let Err(e) = self.run_cycle(now) {
            tracing::error!(error = %e, "Error during initial update check");
        }
    }

    /// One poll tick.
    ///
    /// The interval timer is reset when a check starts, whether or not it
    /// succeeds, so a persistently failing check is retried on the normal
    /// schedule rather than on every tick.
    pub fn tick(&mut self, now: Instant) -> Result<TickOutcome> {
        match consume_trigger(&self.trigger_file) {
            TriggerOutcome::Consumed => {
                self.trigger_stuck = false;
                self.run_cycle(now)?;
                return Ok(TickOutcome::Triggered);
            }
            TriggerOutcome::Absent => self.trigger_stuck = false,
            TriggerOutcome::Stuck(e) => {
                if self.trigger_stuck {
                    tracing::debug!(error = %e, "trigger marker still cannot be removed");
                } else {
                    tracing::warn!(
                        path = %self.trigger_file.display(),
                        error = %e,
                        "Error consuming trigger"
                    );
                    self.trigger_stuck = true;
                }
            }
        }

        if self.is_due(now) {
            self.run_cycle(now)?;
            return Ok(TickOutcome::Scheduled);
        }
        Ok(TickOutcome::Idle)
    }

    /// Run the startup check, then poll forever. Errors never escape a tick.
    pub fn run_forever(mut self) -> ! {
        tracing::info!(
            check_interval_secs = self.check_interval.as_secs(),
            trigger_file = %self.trigger_file.display(),
            "Update agent started. Checking every {} seconds.",
            self.check_interval.as_secs()
        );
        self.start(Instant::now());

        loop {
            std::thread::sleep(self.poll_interval);
            self.poll(Instant::now());
        }
    }

    /// A tick behind the loop boundary: errors are logged and swallowed.
    /// Returns `None` when the tick failed.
    pub fn poll(&mut self, now: Instant) -> Option<TickOutcome> {
        match self.tick(now) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::error!(error = %e, "Error during update check");
                None
            }
        }
    }

    fn run_cycle(&mut self, now: Instant) -> Result<()> {
        self.last_check = Some(now);
        self.cycle.run_check()
    }
}
