//! Access to the entities that carry timed effects.
//!
//! The sweep does not know how entities are stored. It goes through the
//! [`EffectStore`] trait, which bundles the capabilities it needs:
//!
//! - iterate the handles currently carrying a [`TimedEffects`] collection
//! - get read-write access to the collection of one handle
//! - notify the host when a collection was emptied or an entry expired
//!
//! [`WorldEffectStore`] implements it over a `bevy_ecs` [`World`], turning
//! the notifications into observer events.

use std::fmt::Debug;
use std::ops::DerefMut;

use bevy_ecs::prelude::*;

use crate::components::timedeffects::{ExpiredEffect, TimedEffects};
use crate::events::effects::{EffectExpiredEvent, TimedEffectsEmptiedEvent};

/// Capabilities the sweep borrows from the host entity store.
pub trait EffectStore {
    type Handle: Copy + Debug;

    /// Handles currently carrying a collection.
    ///
    /// Called once per sweep; the returned snapshot is what the sweep walks.
    fn effect_holders(&mut self) -> Vec<Self::Handle>;

    /// Mutable collection of `handle`, or `None` if it has none.
    fn timed_effects_mut(
        &mut self,
        handle: Self::Handle,
    ) -> Option<impl DerefMut<Target = TimedEffects> + '_>;

    /// Called after a sweep left the collection of `handle` empty.
    fn collection_emptied(&mut self, handle: Self::Handle);

    /// Called for every entry a sweep removed.
    fn effect_expired(&mut self, _handle: Self::Handle, _expired: &ExpiredEffect) {}
}

/// [`EffectStore`] over a bevy [`World`].
///
/// Expired entries trigger [`EffectExpiredEvent`] and emptied collections
/// trigger [`TimedEffectsEmptiedEvent`]. Observers run immediately, before the
/// sweep moves on to the next entity.
pub struct WorldEffectStore<'w> {
    world: &'w mut World,
}

impl<'w> WorldEffectStore<'w> {
    pub fn new(world: &'w mut World) -> Self {
        Self { world }
    }
}

impl EffectStore for WorldEffectStore<'_> {
    type Handle = Entity;

    fn effect_holders(&mut self) -> Vec<Entity> {
        let mut query = self.world.query_filtered::<Entity, With<TimedEffects>>();
        query.iter(self.world).collect()
    }

    fn timed_effects_mut(
        &mut self,
        handle: Entity,
    ) -> Option<impl DerefMut<Target = TimedEffects> + '_> {
        self.world.get_mut::<TimedEffects>(handle)
    }

    fn collection_emptied(&mut self, handle: Entity) {
        self.world.trigger(TimedEffectsEmptiedEvent { entity: handle });
    }

    fn effect_expired(&mut self, handle: Entity, expired: &ExpiredEffect) {
        self.world.trigger(EffectExpiredEvent {
            entity: handle,
            key: expired.key.clone(),
            magnitude: expired.magnitude,
            overshoot_ms: expired.overshoot_ms,
        });
    }
}
