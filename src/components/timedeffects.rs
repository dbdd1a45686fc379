//! Timed effects component.
//!
//! The [`TimedEffects`] component maps an effect key (for example
//! `"strength"` or `"poison"`) to a [`TimedEffect`] holding its remaining
//! duration in milliseconds. It is inserted lazily the first time an effect
//! is applied to an entity (see
//! [`apply_effect_observer`](crate::events::effects::apply_effect_observer)).
//!
//! # How It Works
//!
//! 1. Effects are applied or refreshed by the effect-application side
//! 2. The [`effect_expiry_system`](crate::systems::effectexpiry::effect_expiry_system)
//!    runs a sweep every check interval:
//!    - Decrements every finite duration by the interval
//!    - Removes every entry whose duration dropped to zero or below
//! 3. [`EffectDuration::Infinite`] entries are never decremented nor removed
//!
//! # Related
//!
//! - [`crate::systems::effectexpiry`] – time gate and sweep
//! - [`crate::events::effects`] – expiry and emptied notifications

use bevy_ecs::prelude::Component;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Remaining lifetime of a single effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectDuration {
    /// Milliseconds left. May go negative inside a sweep before removal.
    Finite(i64),
    /// Never expires.
    Infinite,
}

impl EffectDuration {
    /// True when this is a finite duration at or below zero.
    pub fn is_expired(self) -> bool {
        matches!(self, EffectDuration::Finite(ms) if ms <= 0)
    }

    /// Finite milliseconds, or `None` for [`EffectDuration::Infinite`].
    pub fn as_millis(self) -> Option<i64> {
        match self {
            EffectDuration::Finite(ms) => Some(ms),
            EffectDuration::Infinite => None,
        }
    }
}

impl From<Option<i64>> for EffectDuration {
    fn from(value: Option<i64>) -> Self {
        value.map_or(EffectDuration::Infinite, EffectDuration::Finite)
    }
}

/// A named modifier with a remaining duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedEffect {
    pub remaining: EffectDuration,
    /// Opaque strength value owned by whoever applied the effect.
    pub magnitude: f32,
}

impl TimedEffect {
    /// Effect that expires after `duration_ms` milliseconds.
    pub fn finite(duration_ms: i64, magnitude: f32) -> Self {
        TimedEffect {
            remaining: EffectDuration::Finite(duration_ms),
            magnitude,
        }
    }

    /// Effect that never expires.
    pub fn infinite(magnitude: f32) -> Self {
        TimedEffect {
            remaining: EffectDuration::Infinite,
            magnitude,
        }
    }
}

/// An entry removed by [`TimedEffects::advance`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExpiredEffect {
    pub key: String,
    pub magnitude: f32,
    /// How far below zero the duration went, `0` when it hit zero exactly.
    pub overshoot_ms: i64,
}

/// Per-entity collection of timed effects keyed by effect name.
#[derive(Component, Debug, Clone, Default)]
pub struct TimedEffects {
    effects: FxHashMap<String, TimedEffect>,
}

impl TimedEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper used when spawning entities.
    pub fn with(mut self, key: impl Into<String>, effect: TimedEffect) -> Self {
        self.apply(key, effect);
        self
    }

    /// Insert a new effect or refresh an existing one, returning the replaced entry.
    pub fn apply(&mut self, key: impl Into<String>, effect: TimedEffect) -> Option<TimedEffect> {
        self.effects.insert(key.into(), effect)
    }

    pub fn get(&self, key: &str) -> Option<&TimedEffect> {
        self.effects.get(key)
    }

    /// Remaining duration of `key`, if present.
    pub fn remaining(&self, key: &str) -> Option<EffectDuration> {
        self.effects.get(key).map(|e| e.remaining)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.effects.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<TimedEffect> {
        self.effects.remove(key)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TimedEffect)> {
        self.effects.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Decrement every finite effect by `elapsed_ms` and drop the expired ones.
    ///
    /// Expired keys are gathered during the decrement pass and removed in a
    /// second pass, so no entry is skipped or visited twice.
    pub fn advance(&mut self, elapsed_ms: i64) -> SmallVec<[ExpiredEffect; 4]> {
        let mut expired_keys: SmallVec<[String; 4]> = SmallVec::new();
        for (key, effect) in self.effects.iter_mut() {
            if let EffectDuration::Finite(ms) = &mut effect.remaining {
                *ms -= elapsed_ms;
                if *ms <= 0 {
                    expired_keys.push(key.clone());
                }
            }
        }

        let mut expired = SmallVec::new();
        for key in expired_keys {
            if let Some(effect) = self.effects.remove(&key) {
                let overshoot_ms = effect.remaining.as_millis().map_or(0, |ms| -ms);
                expired.push(ExpiredEffect {
                    key,
                    magnitude: effect.magnitude,
                    overshoot_ms,
                });
            }
        }
        expired
    }

    /// Number of entries with a finite duration.
    pub fn finite_count(&self) -> usize {
        self.effects
            .values()
            .filter(|e| matches!(e.remaining, EffectDuration::Finite(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_decrements_finite_effects() {
        let mut effects = TimedEffects::new().with("strength", TimedEffect::finite(250, 2.0));
        let expired = effects.advance(100);
        assert!(expired.is_empty());
        assert_eq!(effects.remaining("strength"), Some(EffectDuration::Finite(150)));
    }

    #[test]
    fn test_advance_leaves_infinite_untouched() {
        let mut effects = TimedEffects::new().with("poison", TimedEffect::infinite(1.0));
        for _ in 0..1000 {
            assert!(effects.advance(100).is_empty());
        }
        assert_eq!(effects.remaining("poison"), Some(EffectDuration::Infinite));
    }

    #[test]
    fn test_advance_removes_exactly_zero() {
        let mut effects = TimedEffects::new().with("haste", TimedEffect::finite(100, 1.5));
        let expired = effects.advance(100);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].key, "haste");
        assert_eq!(expired[0].overshoot_ms, 0);
        assert!((expired[0].magnitude - 1.5).abs() < 1e-6);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_advance_reports_overshoot() {
        let mut effects = TimedEffects::new().with("strength", TimedEffect::finite(50, 1.0));
        let expired = effects.advance(100);
        assert_eq!(expired[0].overshoot_ms, 50);
    }

    #[test]
    fn test_advance_removes_many_entries_in_one_pass() {
        let mut effects = TimedEffects::new();
        for i in 0..32 {
            effects.apply(format!("fx{i}"), TimedEffect::finite(i % 3 * 100, 1.0));
        }
        effects.apply("forever", TimedEffect::infinite(1.0));

        let expired = effects.advance(100);
        // durations 0 and 100 expire, 200 survives
        let survivors = (0..32).filter(|i| i % 3 == 2).count();
        assert_eq!(expired.len(), 32 - survivors);
        assert_eq!(effects.len(), survivors + 1);
        assert!(effects.iter().all(|(_, e)| !e.remaining.is_expired()));
    }

    #[test]
    fn test_expires_after_ceil_duration_over_interval_sweeps() {
        let interval = 100;
        for duration in [1, 99, 100, 101, 250, 1000, 1001] {
            let mut effects = TimedEffects::new().with("fx", TimedEffect::finite(duration, 1.0));
            let expected = (duration + interval - 1) / interval;
            let mut sweeps = 0;
            while effects.contains("fx") {
                effects.advance(interval);
                sweeps += 1;
            }
            assert_eq!(sweeps, expected, "duration {duration}");
        }
    }

    #[test]
    fn test_apply_refreshes_existing_effect() {
        let mut effects = TimedEffects::new().with("strength", TimedEffect::finite(100, 1.0));
        let previous = effects.apply("strength", TimedEffect::finite(500, 3.0));
        assert_eq!(previous, Some(TimedEffect::finite(100, 1.0)));
        assert_eq!(effects.len(), 1);
        assert_eq!(effects.remaining("strength"), Some(EffectDuration::Finite(500)));
    }

    #[test]
    fn test_duration_from_option() {
        assert_eq!(EffectDuration::from(Some(10)), EffectDuration::Finite(10));
        assert_eq!(EffectDuration::from(None), EffectDuration::Infinite);
        assert!(EffectDuration::Finite(0).is_expired());
        assert!(EffectDuration::Finite(-5).is_expired());
        assert!(!EffectDuration::Finite(1).is_expired());
        assert!(!EffectDuration::Infinite.is_expired());
    }

    #[test]
    fn test_finite_count() {
        let effects = TimedEffects::new()
            .with("a", TimedEffect::finite(10, 1.0))
            .with("b", TimedEffect::infinite(1.0));
        assert_eq!(effects.finite_count(), 1);
    }
}
