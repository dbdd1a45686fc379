//! Timed effect events and observers.
//!
//! - [`ApplyEffectEvent`] – apply or refresh an effect on an entity
//! - [`EffectExpiredEvent`] – an entry was removed by a sweep
//! - [`TimedEffectsEmptiedEvent`] – a sweep left an entity's collection empty
//!
//! # Event Flow
//!
//! 1. Gameplay code triggers `ApplyEffectEvent`
//! 2. `apply_effect_observer` inserts the [`TimedEffects`] component on first
//!    use, or writes into the existing one
//! 3. `effect_expiry_system` sweeps every check interval and triggers
//!    `EffectExpiredEvent` / `TimedEffectsEmptiedEvent`
//! 4. `detach_empty_effects_observer` removes empty collections when
//!    [`EmptyCollectionPolicy::Detach`] is configured
//!
//! # Related
//!
//! - [`crate::components::timedeffects::TimedEffects`] – the collection
//! - [`crate::systems::effectexpiry::effect_expiry_system`] – the sweep driver

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::components::timedeffects::{TimedEffect, TimedEffects};
use crate::resources::effectconfig::{EffectConfig, EmptyCollectionPolicy};

/// Request to apply (or refresh) an effect on `entity`.
#[derive(Event, Debug, Clone)]
pub struct ApplyEffectEvent {
    pub entity: Entity,
    pub key: String,
    pub effect: TimedEffect,
}

/// Event emitted for every effect a sweep removed.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EffectExpiredEvent {
    /// The entity that carried the effect.
    pub entity: Entity,
    /// Effect key, e.g. `"strength"`.
    pub key: String,
    pub magnitude: f32,
    /// Milliseconds the duration went past zero.
    pub overshoot_ms: i64,
}

/// Event emitted when a sweep leaves an entity's collection empty.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedEffectsEmptiedEvent {
    pub entity: Entity,
}

/// Observer that applies effects, creating the collection lazily.
///
/// The change is queued as an entity command that reads the collection when
/// it is applied, so several applications before the next flush merge into
/// one collection. Applying a key that is already present replaces its
/// duration and magnitude. Events targeting despawned entities are dropped
/// with a warning.
pub fn apply_effect_observer(trigger: On<ApplyEffectEvent>, mut commands: Commands) {
    let event = trigger.event();
    let Ok(mut entity_commands) = commands.get_entity(event.entity) else {
        warn!(
            "Cannot apply effect '{}': entity {:?} does not exist",
            event.key, event.entity
        );
        return;
    };

    let key = event.key.clone();
    let effect = event.effect;
    entity_commands.queue(move |mut entity: EntityWorldMut| {
        let id = entity.id();
        if let Some(mut effects) = entity.get_mut::<TimedEffects>() {
            if effects.apply(key.clone(), effect).is_some() {
                debug!("Refreshed effect '{}' on {:?}", key, id);
            }
        } else {
            entity.insert(TimedEffects::new().with(key, effect));
        }
    });
}

/// Observer that detaches empty collections when the policy asks for it.
///
/// With [`EmptyCollectionPolicy::Keep`] (the default) or no [`EffectConfig`]
/// resource, the empty component stays on the entity.
pub fn detach_empty_effects_observer(
    trigger: On<TimedEffectsEmptiedEvent>,
    mut commands: Commands,
    config: Option<Res<EffectConfig>>,
    query: Query<&TimedEffects>,
) {
    let Some(config) = config else {
        return;
    };
    if config.empty_collections != EmptyCollectionPolicy::Detach {
        return;
    }

    let entity = trigger.event().entity;
    // Something may have re-applied an effect in between.
    if query.get(entity).is_ok_and(|effects| effects.is_empty()) {
        commands.entity(entity).remove::<TimedEffects>();
    }
}
