//! Timed effect expiry system.
//!
//! This module provides the time gate ([`should_run`]), the sweep
//! ([`run_sweep`]) and the [`effect_expiry_system`] that drives them from the
//! ECS schedule.
//!
//! # System Flow
//!
//! Each frame:
//!
//! 1. `effect_expiry_system` reads the current game time from [`WorldTime`]
//! 2. [`EffectScheduler::on_tick`] asks the gate whether a check interval has
//!    passed since the last sweep; most frames stop here
//! 3. When the gate opens, every [`TimedEffects`] collection is decremented by
//!    the fixed interval and expired entries are removed
//!
//! Effects therefore expire in batches aligned to the check interval, not at
//! their exact expiry instant.
//!
//! [`TimedEffects`]: crate::components::timedeffects::TimedEffects

use bevy_ecs::prelude::*;
use log::{debug, error};

use crate::error::SweepError;
use crate::resources::effectscheduler::{EffectScheduler, TickOutcome};
use crate::resources::worldtime::{TimeSource, WorldTime};
use crate::store::{EffectStore, WorldEffectStore};

/// Counters collected by one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Entities whose non-empty collection was processed.
    pub entities_swept: usize,
    /// Finite entries that were decremented.
    pub effects_decremented: usize,
    pub effects_expired: usize,
    /// Collections the pass left empty.
    pub collections_emptied: usize,
}

/// Whether a sweep is due: `current_ms >= last_sweep_ms + interval_ms`.
pub fn should_run(current_ms: u64, last_sweep_ms: u64, interval_ms: u64) -> bool {
    current_ms >= last_sweep_ms.saturating_add(interval_ms)
}

/// Decrement and prune every collection the store yields.
///
/// Collections that are already empty are left alone and do not trigger the
/// emptied hook. A handle without a collection aborts the pass with
/// [`SweepError::MissingCollection`]; entities processed before it keep their
/// new durations.
pub fn run_sweep<S: EffectStore>(store: &mut S, elapsed_ms: i64) -> Result<SweepReport, SweepError> {
    let mut report = SweepReport::default();

    for handle in store.effect_holders() {
        let (expired, emptied) = {
            let Some(mut effects) = store.timed_effects_mut(handle) else {
                return Err(SweepError::MissingCollection {
                    handle: format!("{handle:?}"),
                });
            };
            if effects.is_empty() {
                continue;
            }
            report.entities_swept += 1;
            report.effects_decremented += effects.finite_count();
            let expired = effects.advance(elapsed_ms);
            (expired, effects.is_empty())
        };

        report.effects_expired += expired.len();
        for effect in &expired {
            store.effect_expired(handle, effect);
        }
        if emptied {
            report.collections_emptied += 1;
            store.collection_emptied(handle);
        }
    }

    Ok(report)
}

/// Run the effect scheduler against the world once per frame.
///
/// Exclusive system: expiry hooks are delivered as observer events while the
/// sweep walks the world. A failed sweep is logged at error level; the
/// scheduler has already advanced its last-sweep time, so the next attempt
/// waits for the following interval.
pub fn effect_expiry_system(world: &mut World) {
    let now_ms = world.resource::<WorldTime>().now_ms();

    world.resource_scope(|world, mut scheduler: Mut<EffectScheduler>| {
        let mut store = WorldEffectStore::new(world);
        match scheduler.on_tick(now_ms, &mut store) {
            Ok(TickOutcome::Skipped) => {}
            Ok(TickOutcome::Swept(report)) => {
                debug!(
                    "Effect sweep at {}ms: {} entities, {} decremented, {} expired, {} emptied",
                    now_ms,
                    report.entities_swept,
                    report.effects_decremented,
                    report.effects_expired,
                    report.collections_emptied
                );
            }
            Err(e) => {
                error!("Effect sweep at {}ms aborted: {}", now_ms, e);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::timedeffects::{
        EffectDuration, ExpiredEffect, TimedEffect, TimedEffects,
    };
    use rustc_hash::FxHashMap;
    use std::ops::DerefMut;

    /// Minimal store keyed by integer handles.
    #[derive(Default)]
    struct MapStore {
        collections: FxHashMap<u32, TimedEffects>,
        /// Handles yielded by the iteration, may include dead ones.
        handles: Vec<u32>,
        emptied: Vec<u32>,
        expired: Vec<(u32, String)>,
    }

    impl MapStore {
        fn insert(&mut self, handle: u32, effects: TimedEffects) {
            self.collections.insert(handle, effects);
            self.handles.push(handle);
        }
    }

    impl EffectStore for MapStore {
        type Handle = u32;

        fn effect_holders(&mut self) -> Vec<u32> {
            self.handles.clone()
        }

        fn timed_effects_mut(
            &mut self,
            handle: u32,
        ) -> Option<impl DerefMut<Target = TimedEffects> + '_> {
            self.collections.get_mut(&handle)
        }

        fn collection_emptied(&mut self, handle: u32) {
            self.emptied.push(handle);
        }

        fn effect_expired(&mut self, handle: u32, expired: &ExpiredEffect) {
            self.expired.push((handle, expired.key.clone()));
        }
    }

    // ==================== TIME GATE TESTS ====================

    #[test]
    fn test_gate_closed_before_interval() {
        assert!(!should_run(50, 0, 100));
        assert!(!should_run(199, 100, 100));
    }

    #[test]
    fn test_gate_opens_at_boundary() {
        assert!(should_run(100, 0, 100));
        assert!(should_run(200, 100, 100));
        assert!(should_run(1000, 100, 100));
    }

    #[test]
    fn test_gate_does_not_wrap_near_max() {
        assert!(!should_run(u64::MAX - 1, u64::MAX - 50, 100));
        assert!(should_run(u64::MAX, u64::MAX - 50, 100));
    }

    // ==================== SWEEP TESTS ====================

    #[test]
    fn test_sweep_decrements_and_removes() {
        let mut store = MapStore::default();
        store.insert(
            1,
            TimedEffects::new()
                .with("strength", TimedEffect::finite(250, 1.0))
                .with("haste", TimedEffect::finite(80, 1.0))
                .with("poison", TimedEffect::infinite(1.0)),
        );

        let report = run_sweep(&mut store, 100).unwrap();

        let effects = &store.collections[&1];
        assert_eq!(effects.remaining("strength"), Some(EffectDuration::Finite(150)));
        assert_eq!(effects.remaining("poison"), Some(EffectDuration::Infinite));
        assert!(!effects.contains("haste"));
        assert_eq!(store.expired, vec![(1, "haste".to_string())]);
        assert!(store.emptied.is_empty());
        assert_eq!(
            report,
            SweepReport {
                entities_swept: 1,
                effects_decremented: 2,
                effects_expired: 1,
                collections_emptied: 0,
            }
        );
    }

    #[test]
    fn test_sweep_notifies_when_collection_empties() {
        let mut store = MapStore::default();
        store.insert(7, TimedEffects::new().with("haste", TimedEffect::finite(100, 1.0)));

        let report = run_sweep(&mut store, 100).unwrap();

        assert_eq!(store.emptied, vec![7]);
        assert_eq!(report.collections_emptied, 1);
        assert!(store.collections[&7].is_empty());
    }

    #[test]
    fn test_sweep_skips_empty_collection_without_hook() {
        let mut store = MapStore::default();
        store.insert(3, TimedEffects::new());

        let report = run_sweep(&mut store, 100).unwrap();

        assert!(store.emptied.is_empty());
        assert_eq!(report, SweepReport::default());
    }

    #[test]
    fn test_sweep_aborts_on_missing_collection() {
        let mut store = MapStore::default();
        store.handles.push(42);
        store.insert(1, TimedEffects::new().with("strength", TimedEffect::finite(250, 1.0)));

        let err = run_sweep(&mut store, 100).unwrap_err();

        assert_eq!(
            err,
            SweepError::MissingCollection {
                handle: "42".to_string()
            }
        );
        // handle 42 comes first, nothing after it was touched
        assert_eq!(
            store.collections[&1].remaining("strength"),
            Some(EffectDuration::Finite(250))
        );
    }

    #[test]
    fn test_sweep_processes_every_entity() {
        let mut store = MapStore::default();
        for handle in 0..50 {
            store.insert(
                handle,
                TimedEffects::new().with("fx", TimedEffect::finite(i64::from(handle) * 10 + 10, 1.0)),
            );
        }

        let report = run_sweep(&mut store, 100).unwrap();

        // durations 10..=100 expire
        assert_eq!(report.entities_swept, 50);
        assert_eq!(report.effects_expired, 10);
        assert_eq!(store.emptied.len(), 10);
    }
}
