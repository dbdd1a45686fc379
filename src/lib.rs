//! Timed effect expiry for `bevy_ecs` worlds.
//!
//! Entities carry a [`TimedEffects`](components::timedeffects::TimedEffects)
//! collection. A throttled sweep decrements every finite effect by a fixed
//! check interval and removes the ones that ran out.

pub mod components;
pub mod error;
pub mod events;
pub mod game;
pub mod resources;
pub mod store;
pub mod systems;
