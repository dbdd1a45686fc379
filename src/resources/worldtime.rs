//! Simulation time resource.
//!
//! [`WorldTime`] holds game time in whole milliseconds. It is advanced once
//! per tick by [`update_world_time`](crate::systems::time::update_world_time)
//! and is the [`TimeSource`] the effect expiry system reads.

use bevy_ecs::prelude::Resource;

/// Monotonic milliseconds since an arbitrary epoch.
pub trait TimeSource {
    fn now_ms(&self) -> u64;
}

#[derive(Resource, Debug, Clone, Copy)]
pub struct WorldTime {
    /// Scaled game time since session start.
    pub elapsed_ms: u64,
    /// Scaled duration of the last tick.
    pub delta_ms: u64,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed_ms: 0,
            delta_ms: 0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl TimeSource for WorldTime {
    fn now_ms(&self) -> u64 {
        self.elapsed_ms
    }
}
