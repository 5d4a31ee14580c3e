// World-level systems shared by every actor type.
// Wrap-around coordinates, lifetime expiry and the end-of-frame purge.

use bevy_ecs::prelude::*;
use glam::Vec2;
use super::components::*;

// ============================================================================
// TOROIDAL COORDINATES
// ============================================================================

/// Fold `x` into [0, width).
pub fn wrap_x(x: f32, width: f32) -> f32 {
    let wrapped = x.rem_euclid(width);
    // rem_euclid can round up to `width` for tiny negative inputs.
    if wrapped >= width { 0.0 } else { wrapped }
}

/// Shortest signed horizontal distance from `a` to `b` on a ring of `width`.
/// Result lies in (-width/2, width/2].
pub fn wrap_delta(a: f32, b: f32, width: f32) -> f32 {
    let half = width * 0.5;
    let d = (b - a).rem_euclid(width);
    if d > half { d - width } else { d }
}

/// Shortest displacement from `a` to `b`, wrapping only on x.
pub fn wrapped_offset(a: Vec2, b: Vec2, width: f32) -> Vec2 {
    Vec2::new(wrap_delta(a.x, b.x, width), b.y - a.y)
}

/// Vertical wrap thresholds. The world does not repeat vertically; instead
/// falling past `fall_limit` teleports to `after_fall`, and rising above
/// `rise_limit` teleports to `after_rise`.
#[derive(Debug, Clone, Copy)]
pub struct VerticalWrap {
    pub fall_limit: f32,
    pub after_fall: f32,
    pub rise_limit: f32,
    pub after_rise: f32,
}

impl VerticalWrap {
    /// Player thresholds: generous overshoot so flight above the world is
    /// possible before wrapping.
    pub fn for_player(world_height: f32) -> Self {
        Self {
            fall_limit: world_height + 100.0,
            after_fall: -150.0,
            rise_limit: -200.0,
            after_rise: world_height,
        }
    }

    pub fn for_villager(world_height: f32) -> Self {
        Self {
            fall_limit: world_height + 50.0,
            after_fall: -50.0,
            rise_limit: -100.0,
            after_rise: world_height,
        }
    }

    pub fn apply(&self, y: f32) -> f32 {
        if y > self.fall_limit {
            self.after_fall
        } else if y < self.rise_limit {
            self.after_rise
        } else {
            y
        }
    }
}

// ============================================================================
// LIFETIME + PURGE
// ============================================================================

/// Count down lifetimes and tag anything expired as `Dead`.
pub fn lifetime_system(world: &mut World, delta_time: f32) {
    let mut expired = Vec::new();
    let mut query = world.query_filtered::<(Entity, &mut Lifetime), Without<Dead>>();
    for (entity, mut lifetime) in query.iter_mut(world) {
        lifetime.remaining -= delta_time;
        if lifetime.remaining <= 0.0 {
            expired.push(entity);
        }
    }
    for entity in expired {
        world.entity_mut(entity).insert(Dead);
    }
}

/// Entities removed by one purge, by category.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PurgeCounts {
    pub projectiles: usize,
    pub units: usize,
    pub other: usize,
}

/// Despawn every `Dead` entity: projectiles first, then villagers/warriors,
/// then anything else (particles).
pub fn purge_dead(world: &mut World) -> PurgeCounts {
    let projectiles: Vec<Entity> = world
        .query_filtered::<Entity, (With<Dead>, With<Projectile>)>()
        .iter(world)
        .collect();
    for &entity in &projectiles {
        world.despawn(entity);
    }

    let units: Vec<Entity> = world
        .query_filtered::<Entity, (With<Dead>, With<Villager>)>()
        .iter(world)
        .collect();
    for &entity in &units {
        world.despawn(entity);
    }

    let other: Vec<Entity> = world
        .query_filtered::<Entity, With<Dead>>()
        .iter(world)
        .collect();
    for &entity in &other {
        world.despawn(entity);
    }

    PurgeCounts {
        projectiles: projectiles.len(),
        units: units.len(),
        other: other.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_x_folds_both_directions() {
        assert!((wrap_x(4001.0, 4000.0) - 1.0).abs() < 1e-3);
        assert!((wrap_x(-1.0, 4000.0) - 3999.0).abs() < 1e-3);
        assert_eq!(wrap_x(0.0, 4000.0), 0.0);
        let tiny = wrap_x(-1e-9, 4000.0);
        assert!((0.0..4000.0).contains(&tiny));
    }

    #[test]
    fn wrap_delta_takes_short_way_round() {
        assert_eq!(wrap_delta(100.0, 300.0, 4000.0), 200.0);
        assert_eq!(wrap_delta(3990.0, 10.0, 4000.0), 20.0);
        assert_eq!(wrap_delta(10.0, 3990.0, 4000.0), -20.0);
    }

    #[test]
    fn vertical_wrap_has_no_ping_pong() {
        let wrap = VerticalWrap::for_player(2000.0);
        let top = wrap.apply(2101.0);
        assert_eq!(top, -150.0);
        assert_eq!(wrap.apply(top), top);
        let bottom = wrap.apply(-201.0);
        assert_eq!(bottom, 2000.0);
        assert_eq!(wrap.apply(bottom), bottom);
    }

    #[test]
    fn lifetime_expiry_then_purge() {
        let mut world = World::new();
        let short = world.spawn((Lifetime::new(0.5), Particle { color: [1.0; 3] })).id();
        let long = world.spawn((Lifetime::new(5.0), Particle { color: [1.0; 3] })).id();

        lifetime_system(&mut world, 1.0);
        assert!(world.get::<Dead>(short).is_some());
        assert!(world.get::<Dead>(long).is_none());

        let counts = purge_dead(&mut world);
        assert_eq!(counts, PurgeCounts { projectiles: 0, units: 0, other: 1 });
        assert!(world.get::<Lifetime>(short).is_none());
        assert!(world.get::<Lifetime>(long).is_some());
    }

    #[test]
    fn purge_separates_categories() {
        let mut world = World::new();
        world.spawn((Projectile, Dead));
        world.spawn((Villager { state_timer: 1.0, grounded: false }, Dead));
        world.spawn((Villager { state_timer: 1.0, grounded: false },));
        let counts = purge_dead(&mut world);
        assert_eq!(counts, PurgeCounts { projectiles: 1, units: 1, other: 0 });
        let left = world.query::<&Villager>().iter(&world).count();
        assert_eq!(left, 1);
    }
}
