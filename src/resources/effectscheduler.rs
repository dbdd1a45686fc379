//! Effect expiry scheduler state.
//!
//! [`EffectScheduler`] remembers when the last sweep ran and throttles sweeps
//! to one per check interval. Each executed sweep decrements every finite
//! effect by the interval itself, not by the real time since the previous
//! sweep, so expiry drifts behind wall time when frames are long.
//!
//! One scheduler per simulation session. Parallel shards each need their own.

use bevy_ecs::prelude::Resource;

use crate::error::SweepError;
use crate::resources::effectconfig::DEFAULT_CHECK_INTERVAL_MS;
use crate::store::EffectStore;
use crate::systems::effectexpiry::{SweepReport, run_sweep, should_run};

/// Result of one [`EffectScheduler::on_tick`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Gate closed, nothing changed.
    Skipped,
    Swept(SweepReport),
}

#[derive(Resource, Debug, Clone)]
pub struct EffectScheduler {
    interval_ms: u64,
    last_sweep_ms: u64,
    sweeps_run: u64,
    last_report: Option<SweepReport>,
}

impl Default for EffectScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_CHECK_INTERVAL_MS)
    }
}

impl EffectScheduler {
    /// Scheduler that sweeps at most every `interval_ms`, starting from time 0.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_sweep_ms: 0,
            sweeps_run: 0,
            last_report: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn last_sweep_ms(&self) -> u64 {
        self.last_sweep_ms
    }

    pub fn sweeps_run(&self) -> u64 {
        self.sweeps_run
    }

    pub fn last_report(&self) -> Option<SweepReport> {
        self.last_report
    }

    /// Advance the scheduler to `now_ms`, sweeping `store` if the gate opens.
    ///
    /// The last-sweep time is updated before the sweep runs, so a failed
    /// sweep still counts as the sweep for this interval.
    pub fn on_tick<S: EffectStore>(
        &mut self,
        now_ms: u64,
        store: &mut S,
    ) -> Result<TickOutcome, SweepError> {
        if !should_run(now_ms, self.last_sweep_ms, self.interval_ms) {
            return Ok(TickOutcome::Skipped);
        }

        self.last_sweep_ms = now_ms;
        let elapsed_ms = i64::try_from(self.interval_ms).unwrap_or(i64::MAX);
        let report = run_sweep(store, elapsed_ms)?;
        self.sweeps_run += 1;
        self.last_report = Some(report);
        Ok(TickOutcome::Swept(report))
    }
}
