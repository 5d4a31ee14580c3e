// Projectiles, hits and cosmetic particles.
//
// Hit testing uses the projectile's origin point only (its top-left), not
// its full extent. A projectile is spent on the first enemy it touches.

use bevy_ecs::prelude::*;
use glam::Vec2;
use rand::Rng;

use crate::engine::components::*;
use crate::engine::systems::{wrap_delta, wrap_x};
use super::config::CombatConfig;
use super::player::Player;
use super::units::{roll_range, SpawnRequest};

// ============================================================================
// SPAWNING
// ============================================================================

pub fn spawn_projectile(world: &mut World, origin: Vec2, angle: f32, team: Team, config: &CombatConfig) -> Entity {
    let velocity = Vec2::new(angle.cos(), angle.sin()) * config.projectile_speed;
    world
        .spawn((
            Transform::from_position(origin),
            Size::new(config.projectile_size, config.projectile_size),
            Velocity::new(velocity),
            team,
            Lifetime::new(config.projectile_life),
            Projectile,
        ))
        .id()
}

pub fn spawn_burst(world: &mut World, at: Vec2, color: [f32; 3], count: usize, rng: &mut impl Rng) {
    for _ in 0..count {
        let angle = roll_range(rng, 0.0, std::f32::consts::TAU);
        let speed = roll_range(rng, 60.0, 220.0);
        let life = roll_range(rng, 0.4, 0.9);
        world.spawn((
            Transform::from_position(at),
            Size::new(4.0, 4.0),
            Velocity::new(Vec2::new(angle.cos(), angle.sin()) * speed),
            Lifetime::new(life),
            Particle { color },
        ));
    }
}

/// Materialize everything requested during the frame's updates.
pub fn apply_spawn_requests(
    world: &mut World,
    requests: &mut Vec<SpawnRequest>,
    config: &CombatConfig,
    rng: &mut impl Rng,
) {
    for request in requests.drain(..) {
        match request {
            SpawnRequest::Projectile { origin, angle, team } => {
                spawn_projectile(world, origin, angle, team, config);
            }
            SpawnRequest::Burst { at, color, count } => {
                spawn_burst(world, at, color, count, rng);
            }
        }
    }
}

// ============================================================================
// MOTION
// ============================================================================

/// Straight-line motion at the launch velocity. Expiry is `lifetime_system`'s job.
pub fn projectile_system(world: &mut World, dt: f32, world_width: f32) {
    let mut query = world.query_filtered::<(&mut Transform, &Velocity), (With<Projectile>, Without<Dead>)>();
    for (mut transform, velocity) in query.iter_mut(world) {
        transform.position += velocity.linear * dt;
        transform.position.x = wrap_x(transform.position.x, world_width);
    }
}

pub fn particle_system(world: &mut World, dt: f32, gravity: f32, world_width: f32) {
    let mut query = world.query_filtered::<(&mut Transform, &mut Velocity), (With<Particle>, Without<Dead>)>();
    for (mut transform, mut velocity) in query.iter_mut(world) {
        velocity.linear.y += gravity * dt;
        transform.position += velocity.linear * dt;
        transform.position.x = wrap_x(transform.position.x, world_width);
    }
}

// ============================================================================
// HITS
// ============================================================================

/// Point-in-rect on the wrapping x axis.
pub fn point_in_rect(point: Vec2, rect_pos: Vec2, rect_size: Vec2, world_width: f32) -> bool {
    let rel_x = wrap_delta(rect_pos.x, point.x, world_width);
    rel_x >= 0.0
        && rel_x <= rect_size.x
        && point.y >= rect_pos.y
        && point.y <= rect_pos.y + rect_size.y
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitHit {
    pub target: Entity,
    pub target_team: Team,
    pub shooter_team: Team,
    pub at: Vec2,
    pub killed: bool,
    pub warrior: bool,
}

struct Target {
    entity: Entity,
    position: Vec2,
    size: Vec2,
    team: Team,
    hp: f32,
    dead: bool,
    warrior: bool,
}

/// Resolve every live projectile against every live enemy unit.
/// Damaged units keep their new hp; units at hp <= 0 and spent projectiles
/// are tagged `Dead`.
pub fn resolve_unit_hits(world: &mut World, damage: f32, world_width: f32) -> Vec<UnitHit> {
    let projectiles: Vec<(Entity, Vec2, Team)> = world
        .query_filtered::<(Entity, &Transform, &Team), (With<Projectile>, Without<Dead>)>()
        .iter(world)
        .map(|(e, t, team)| (e, t.position, *team))
        .collect();
    if projectiles.is_empty() {
        return Vec::new();
    }

    let mut targets: Vec<Target> = world
        .query_filtered::<(Entity, &Transform, &Size, &Team, &Health, Has<Warrior>), (With<Villager>, Without<Dead>)>()
        .iter(world)
        .map(|(entity, t, size, team, health, warrior)| Target {
            entity,
            position: t.position,
            size: Vec2::new(size.w, size.h),
            team: *team,
            hp: health.hp,
            dead: false,
            warrior,
        })
        .collect();

    let mut hits = Vec::new();
    let mut spent = Vec::new();
    for (projectile, point, shooter) in projectiles {
        let struck = targets.iter_mut().find(|t| {
            !t.dead && shooter.is_hostile_to(t.team) && point_in_rect(point, t.position, t.size, world_width)
        });
        if let Some(target) = struck {
            target.hp -= damage;
            if target.hp <= 0.0 {
                target.dead = true;
            }
            spent.push(projectile);
            hits.push(UnitHit {
                target: target.entity,
                target_team: target.team,
                shooter_team: shooter,
                at: point,
                killed: target.dead,
                warrior: target.warrior,
            });
        }
    }

    for target in &targets {
        if let Some(mut health) = world.get_mut::<Health>(target.entity) {
            health.hp = target.hp;
        }
        if target.dead {
            world.entity_mut(target.entity).insert(Dead);
        }
    }
    for projectile in spent {
        world.entity_mut(projectile).insert(Dead);
    }
    hits
}

/// Resolve live projectiles against a flying character. Returns the number
/// of hits taken.
pub fn resolve_player_hits(world: &mut World, player: &mut Player, damage: f32, world_width: f32) -> usize {
    if player.is_dead() {
        return 0;
    }
    let struck: Vec<Entity> = world
        .query_filtered::<(Entity, &Transform, &Team), (With<Projectile>, Without<Dead>)>()
        .iter(world)
        .filter(|(_, t, team)| {
            team.is_hostile_to(player.team) && point_in_rect(t.position, player.position, player.size, world_width)
        })
        .map(|(e, _, _)| e)
        .collect();
    for &projectile in &struck {
        player.hp -= damage;
        world.entity_mut(projectile).insert(Dead);
    }
    struck.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::systems::{lifetime_system, purge_dead};
    use crate::game::config::{PlayerTuning, ResourceConfig};

    fn villager(world: &mut World, pos: Vec2, team: Team, hp: f32) -> Entity {
        world
            .spawn((
                Transform::from_position(pos),
                Size::new(24.0, 24.0),
                Velocity::default(),
                team,
                Health::new(hp),
                Villager { state_timer: 1.0, grounded: true },
            ))
            .id()
    }

    #[test]
    fn projectile_flies_straight_and_ages() {
        let mut world = World::new();
        let config = CombatConfig::default();
        let p = spawn_projectile(&mut world, Vec2::ZERO, 0.0, Team::Green, &config);
        projectile_system(&mut world, 1.0, 4000.0);
        lifetime_system(&mut world, 1.0);
        let pos = world.get::<Transform>(p).unwrap().position;
        assert!((pos - Vec2::new(600.0, 0.0)).length() < 1e-3);
        assert!((world.get::<Lifetime>(p).unwrap().remaining - 2.0).abs() < 1e-5);
        assert!(world.get::<Dead>(p).is_none());
    }

    #[test]
    fn projectile_expires_after_three_seconds() {
        let mut world = World::new();
        let config = CombatConfig::default();
        let p = spawn_projectile(&mut world, Vec2::ZERO, 0.0, Team::Green, &config);
        for _ in 0..3 {
            projectile_system(&mut world, 1.0, 4000.0);
            lifetime_system(&mut world, 1.0);
        }
        assert!(world.get::<Dead>(p).is_some());
    }

    #[test]
    fn origin_point_hit_damages_and_spends() {
        let mut world = World::new();
        let config = CombatConfig::default();
        let v = villager(&mut world, Vec2::ZERO, Team::Blue, 20.0);
        let p = spawn_projectile(&mut world, Vec2::new(10.0, 10.0), 0.0, Team::Green, &config);

        let hits = resolve_unit_hits(&mut world, config.damage, 4000.0);
        assert_eq!(hits.len(), 1);
        assert!(!hits[0].killed);
        assert_eq!(world.get::<Health>(v).unwrap().hp, 10.0);
        assert!(world.get::<Dead>(p).is_some());
        assert!(world.get::<Dead>(v).is_none());
    }

    #[test]
    fn friendly_fire_passes_through() {
        let mut world = World::new();
        let config = CombatConfig::default();
        villager(&mut world, Vec2::ZERO, Team::Green, 20.0);
        let p = spawn_projectile(&mut world, Vec2::new(10.0, 10.0), 0.0, Team::Green, &config);
        assert!(resolve_unit_hits(&mut world, config.damage, 4000.0).is_empty());
        assert!(world.get::<Dead>(p).is_none());
    }

    #[test]
    fn lethal_hit_kills_and_later_shots_skip_corpse() {
        let mut world = World::new();
        let config = CombatConfig::default();
        let v = villager(&mut world, Vec2::ZERO, Team::Blue, 10.0);
        let first = spawn_projectile(&mut world, Vec2::new(5.0, 5.0), 0.0, Team::Green, &config);
        let second = spawn_projectile(&mut world, Vec2::new(6.0, 6.0), 0.0, Team::Green, &config);

        let hits = resolve_unit_hits(&mut world, config.damage, 4000.0);
        assert_eq!(hits.len(), 1);
        assert!(hits[0].killed);
        assert!(world.get::<Dead>(v).is_some());
        assert!(world.get::<Dead>(first).is_some());
        assert!(world.get::<Dead>(second).is_none());

        let counts = purge_dead(&mut world);
        assert_eq!(counts.projectiles, 1);
        assert_eq!(counts.units, 1);
    }

    #[test]
    fn projectile_extent_does_not_count() {
        let mut world = World::new();
        let config = CombatConfig::default();
        villager(&mut world, Vec2::new(100.0, 100.0), Team::Blue, 20.0);
        // Projectile rect overlaps the villager, but its origin is outside.
        spawn_projectile(&mut world, Vec2::new(95.0, 95.0), 0.0, Team::Green, &config);
        assert!(resolve_unit_hits(&mut world, config.damage, 4000.0).is_empty());
    }

    #[test]
    fn enemy_fire_hurts_player() {
        let mut world = World::new();
        let config = CombatConfig::default();
        let mut player = Player::new(
            Team::Green,
            Vec2::new(200.0, 200.0),
            &PlayerTuning::default(),
            &ResourceConfig::default(),
        );
        spawn_projectile(&mut world, Vec2::new(210.0, 220.0), 0.0, Team::Blue, &config);
        spawn_projectile(&mut world, Vec2::new(210.0, 220.0), 0.0, Team::Green, &config);
        assert_eq!(resolve_player_hits(&mut world, &mut player, config.damage, 4000.0), 1);
        assert_eq!(player.hp, player.max_hp - config.damage);
    }

    #[test]
    fn particles_fall() {
        let mut world = World::new();
        let e = world
            .spawn((
                Transform::from_position(Vec2::new(0.0, 0.0)),
                Velocity::default(),
                Lifetime::new(1.0),
                Particle { color: [1.0; 3] },
            ))
            .id();
        particle_system(&mut world, 0.5, 400.0, 4000.0);
        assert!(world.get::<Transform>(e).unwrap().position.y > 0.0);
    }
}
