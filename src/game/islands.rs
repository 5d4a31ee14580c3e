// Floating islands: procedural layout, drift, dragging and snapshots.

use bevy_ecs::prelude::*;
use glam::Vec2;
use rand::Rng;

use crate::engine::components::*;
use crate::engine::systems::{wrap_delta, wrap_x, wrapped_offset};
use super::config::WorldConfig;
use super::player::IslandSurface;

/// Per-frame island velocity retention after a drag is released.
pub const ISLAND_FRICTION: f32 = 0.95;
/// How hard a dragged island is pulled toward the cursor (1/s).
pub const DRAG_STIFFNESS: f32 = 8.0;

/// Fraction of world height islands may occupy.
const ISLAND_BAND: (f32, f32) = (0.2, 0.78);

// ============================================================================
// GENERATION
// ============================================================================

/// Lay out `config.island_count` islands at even intervals with jitter.
/// The first quarter is green, the quarter opposite it is blue, the rest
/// neutral. Team islands always have a teepee and a fireplace.
pub fn generate_islands(world: &mut World, config: &WorldConfig, rng: &mut impl Rng) -> Vec<Entity> {
    let count = config.island_count.max(2);
    let spacing = config.width / count as f32;
    let quarter = (count / 4).max(1);
    let half = count / 2;

    let mut islands = Vec::with_capacity(count);
    for i in 0..count {
        let team = if i < quarter {
            Team::Green
        } else if i >= half && i < half + quarter {
            Team::Blue
        } else {
            Team::Neutral
        };

        let w = rng.gen_range(180.0..300.0_f32).min(spacing * 0.9);
        let h = rng.gen_range(40.0..60.0_f32);
        let slack = (spacing - w).max(0.0);
        let x = i as f32 * spacing + if slack > 0.0 { rng.gen_range(0.0..slack) } else { 0.0 };
        let y = rng.gen_range(config.height * 0.3..config.height * 0.65);

        let owned = team != Team::Neutral;
        let island = Island {
            friction: ISLAND_FRICTION,
            teepee: owned,
            tree: rng.gen_bool(0.5),
            fireplace: owned || rng.gen_bool(0.3),
        };

        let entity = world
            .spawn((
                Transform::from_position(Vec2::new(wrap_x(x, config.width), y)),
                Size::new(w, h),
                Velocity::default(),
                team,
                island,
            ))
            .id();
        islands.push(entity);
    }

    log::info!(
        "generated {} islands ({} green, {} blue)",
        count,
        quarter,
        quarter.min(count - half)
    );
    islands
}

// ============================================================================
// SYSTEMS
// ============================================================================

/// Move islands by their drift velocity and decay it.
pub fn island_drift_system(world: &mut World, dt: f32, config: &WorldConfig) {
    let min_y = config.height * ISLAND_BAND.0;
    let max_y = config.height * ISLAND_BAND.1;
    let mut query = world.query::<(&mut Transform, &mut Velocity, &Island)>();
    for (mut transform, mut velocity, island) in query.iter_mut(world) {
        if velocity.linear == Vec2::ZERO {
            continue;
        }
        transform.position += velocity.linear * dt;
        transform.position.x = wrap_x(transform.position.x, config.width);
        transform.position.y = transform.position.y.clamp(min_y, max_y);
        velocity.linear *= island.friction;
        if velocity.linear.length_squared() < 0.01 {
            velocity.linear = Vec2::ZERO;
        }
    }
}

/// Snapshot every island for collision and proximity checks.
pub fn collect_island_surfaces(world: &mut World) -> Vec<IslandSurface> {
    let mut query = world.query::<(Entity, &Transform, &Size, &Velocity, &Team, &Island)>();
    query
        .iter(world)
        .map(|(entity, transform, size, velocity, team, island)| IslandSurface {
            entity,
            position: transform.position,
            size: Vec2::new(size.w, size.h),
            velocity: velocity.linear,
            team: *team,
            fireplace: island.fireplace,
        })
        .collect()
}

/// Number of islands owned by `team`.
pub fn owned_island_count(islands: &[IslandSurface], team: Team) -> usize {
    islands.iter().filter(|i| i.team == team).count()
}

/// The island whose rect contains `point`, if any.
pub fn island_at(islands: &[IslandSurface], point: Vec2, world_width: f32) -> Option<&IslandSurface> {
    islands.iter().find(|island| {
        let rel_x = wrap_delta(island.position.x, point.x, world_width);
        rel_x >= 0.0
            && rel_x <= island.size.x
            && point.y >= island.position.y
            && point.y <= island.position.y + island.size.y
    })
}

/// Whether `point` is within `radius` of any fireplace.
pub fn near_fireplace(islands: &[IslandSurface], point: Vec2, radius: f32, world_width: f32) -> bool {
    islands.iter().filter(|i| i.fireplace).any(|island| {
        wrapped_offset(point, island.top_center(), world_width).length() <= radius
    })
}

// ============================================================================
// DRAGGING
// ============================================================================

/// An island held by the cursor.
#[derive(Debug, Clone, Copy)]
pub struct IslandDrag {
    pub entity: Entity,
    /// Cursor position relative to the island's top-left at grab time.
    pub grab_offset: Vec2,
}

impl IslandDrag {
    pub fn grab(islands: &[IslandSurface], cursor: Vec2, world_width: f32) -> Option<Self> {
        island_at(islands, cursor, world_width).map(|island| Self {
            entity: island.entity,
            grab_offset: wrapped_offset(island.position, cursor, world_width),
        })
    }

    /// Aim the island's velocity so the grab point chases the cursor.
    /// Returns false when the island no longer exists.
    pub fn pull(&self, world: &mut World, cursor: Vec2, world_width: f32) -> bool {
        let Some(position) = world.get::<Transform>(self.entity).map(|t| t.position) else {
            return false;
        };
        let goal = cursor - self.grab_offset;
        let offset = wrapped_offset(position, goal, world_width);
        match world.get_mut::<Velocity>(self.entity) {
            Some(mut velocity) => {
                velocity.linear = offset * DRAG_STIFFNESS;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn world_with_islands() -> (World, WorldConfig) {
        let config = WorldConfig::default();
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(11);
        generate_islands(&mut world, &config, &mut rng);
        (world, config)
    }

    #[test]
    fn generation_assigns_teams_and_fireplaces() {
        let (mut world, config) = world_with_islands();
        let islands = collect_island_surfaces(&mut world);
        assert_eq!(islands.len(), config.island_count);
        assert_eq!(owned_island_count(&islands, Team::Green), 3);
        assert_eq!(owned_island_count(&islands, Team::Blue), 3);
        for island in islands.iter().filter(|i| i.team != Team::Neutral) {
            assert!(island.fireplace);
        }
        for island in &islands {
            assert!((0.0..config.width).contains(&island.position.x));
        }
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let (mut a, _) = world_with_islands();
        let (mut b, _) = world_with_islands();
        let a = collect_island_surfaces(&mut a);
        let b = collect_island_surfaces(&mut b);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.position, y.position);
            assert_eq!(x.size, y.size);
        }
    }

    #[test]
    fn drift_coasts_and_decays() {
        let config = WorldConfig::default();
        let mut world = World::new();
        let e = world
            .spawn((
                Transform::from_position(Vec2::new(100.0, 800.0)),
                Size::new(200.0, 50.0),
                Velocity::new(Vec2::new(100.0, 0.0)),
                Team::Neutral,
                Island { friction: ISLAND_FRICTION, teepee: false, tree: false, fireplace: false },
            ))
            .id();
        island_drift_system(&mut world, 0.1, &config);
        assert!((world.get::<Transform>(e).unwrap().position.x - 110.0).abs() < 1e-3);
        assert!((world.get::<Velocity>(e).unwrap().linear.x - 95.0).abs() < 1e-3);
        for _ in 0..500 {
            island_drift_system(&mut world, 0.016, &config);
        }
        assert_eq!(world.get::<Velocity>(e).unwrap().linear, Vec2::ZERO);
    }

    #[test]
    fn grab_and_pull_toward_cursor() {
        let mut world = World::new();
        let e = world
            .spawn((
                Transform::from_position(Vec2::new(100.0, 800.0)),
                Size::new(200.0, 50.0),
                Velocity::default(),
                Team::Neutral,
                Island { friction: ISLAND_FRICTION, teepee: false, tree: false, fireplace: false },
            ))
            .id();
        let islands = collect_island_surfaces(&mut world);
        assert!(IslandDrag::grab(&islands, Vec2::new(50.0, 810.0), 4000.0).is_none());
        let drag = IslandDrag::grab(&islands, Vec2::new(150.0, 810.0), 4000.0).unwrap();
        assert_eq!(drag.entity, e);
        assert!(drag.pull(&mut world, Vec2::new(250.0, 810.0), 4000.0));
        let v = world.get::<Velocity>(e).unwrap().linear;
        assert!(v.x > 0.0);
        assert_eq!(v.y, 0.0);
    }

    #[test]
    fn fireplace_proximity() {
        let (mut world, config) = world_with_islands();
        let islands = collect_island_surfaces(&mut world);
        let hearth = islands.iter().find(|i| i.fireplace).unwrap();
        let top = hearth.top_center();
        assert!(near_fireplace(&islands, top - Vec2::new(0.0, 30.0), 90.0, config.width));
        let plain: Vec<IslandSurface> = islands.iter().filter(|i| !i.fireplace).copied().collect();
        assert!(!near_fireplace(&plain, top, 90.0, config.width));
    }
}
