//! Time update system.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per tick, applying `time_scale` to the provided delta.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Advance `elapsed_ms` and `delta_ms` on the `WorldTime` resource.
///
/// `dt_ms` is the unscaled tick length in milliseconds. The scaled delta is
/// rounded to whole milliseconds, so game time never goes backwards.
pub fn update_world_time(world: &mut World, dt_ms: u64) {
    let mut wt = world.resource_mut::<WorldTime>();
    let scaled_dt = (dt_ms as f64 * f64::from(wt.time_scale.max(0.0))).round() as u64;
    wt.elapsed_ms = wt.elapsed_ms.saturating_add(scaled_dt);
    wt.delta_ms = scaled_dt;
    wt.frame_count += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_world_time_accumulates() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());

        update_world_time(&mut world, 16);
        update_world_time(&mut world, 16);

        let wt = world.resource::<WorldTime>();
        assert_eq!(wt.elapsed_ms, 32);
        assert_eq!(wt.delta_ms, 16);
        assert_eq!(wt.frame_count, 2);
    }

    #[test]
    fn test_update_world_time_applies_scale() {
        let mut world = World::new();
        world.insert_resource(WorldTime {
            time_scale: 0.5,
            ..WorldTime::default()
        });

        update_world_time(&mut world, 100);

        assert_eq!(world.resource::<WorldTime>().elapsed_ms, 50);
    }

    #[test]
    fn test_paused_time_does_not_advance() {
        let mut world = World::new();
        world.insert_resource(WorldTime {
            time_scale: 0.0,
            ..WorldTime::default()
        });

        update_world_time(&mut world, 100);

        let wt = world.resource::<WorldTime>();
        assert_eq!(wt.elapsed_ms, 0);
        assert_eq!(wt.frame_count, 1);
    }
}
