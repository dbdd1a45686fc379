//! Session setup and the headless simulation loop.
//!
//! A session is one [`World`] holding the [`WorldTime`], [`EffectScheduler`]
//! and [`EffectConfig`] resources, the effect observers, and the entities
//! carrying [`TimedEffects`]. The external driver calls [`run_ticks`] (or
//! runs the schedule itself) once per simulation tick.

use bevy_ecs::name::Name;
use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use log::info;

use crate::components::timedeffects::{EffectDuration, TimedEffects};
use crate::events::effects::{apply_effect_observer, detach_empty_effects_observer};
use crate::resources::effectconfig::EffectConfig;
use crate::resources::effectscheduler::EffectScheduler;
use crate::resources::scenario::Scenario;
use crate::resources::worldtime::WorldTime;
use crate::systems::effectexpiry::effect_expiry_system;
use crate::systems::time::update_world_time;

/// Insert session resources and register the effect observers.
pub fn setup_world(world: &mut World, config: EffectConfig) {
    world.insert_resource(WorldTime::default());
    world.insert_resource(EffectScheduler::new(config.check_interval_ms));
    world.insert_resource(config);

    world.spawn(Observer::new(apply_effect_observer));
    world.spawn(Observer::new(detach_empty_effects_observer));
    // Ensure the observers are registered before any system triggers events.
    world.flush();
}

/// Per-tick schedule.
pub fn build_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(effect_expiry_system);
    update
}

/// Spawn one named entity per scenario entry.
pub fn spawn_scenario(world: &mut World, scenario: &Scenario) -> Vec<Entity> {
    let spawned: Vec<Entity> = scenario
        .collections()
        .map(|(name, effects)| world.spawn((Name::new(name.to_string()), effects)).id())
        .collect();
    info!("Spawned {} entities with timed effects", spawned.len());
    spawned
}

/// Advance time by `tick_ms` and run `schedule`, `ticks` times.
pub fn run_ticks(world: &mut World, schedule: &mut Schedule, tick_ms: u64, ticks: u64) {
    for _ in 0..ticks {
        update_world_time(world, tick_ms);
        schedule.run(world);
        world.clear_trackers();
    }
}

/// Snapshot of the effect population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectCensus {
    /// Entities carrying a collection, empty or not.
    pub holders: usize,
    pub empty_collections: usize,
    pub finite_effects: usize,
    pub infinite_effects: usize,
}

pub fn census(world: &mut World) -> EffectCensus {
    let mut census = EffectCensus::default();
    let mut query = world.query::<&TimedEffects>();
    for effects in query.iter(world) {
        census.holders += 1;
        if effects.is_empty() {
            census.empty_collections += 1;
        }
        for (_, effect) in effects.iter() {
            match effect.remaining {
                EffectDuration::Finite(_) => census.finite_effects += 1,
                EffectDuration::Infinite => census.infinite_effects += 1,
            }
        }
    }
    census
}
