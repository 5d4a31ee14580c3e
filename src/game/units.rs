// Villagers and warriors.
//
// Villagers fall, land on islands and random-walk. Warriors hunt the
// nearest enemy unit: inside engage range they stop and shoot on a
// cooldown, outside it they strafe toward the target, and with no target
// they walk like villagers. Shots are returned as spawn requests and
// materialized by the orchestrator after every actor has moved.

use bevy_ecs::prelude::*;
use glam::Vec2;
use rand::Rng;

use crate::engine::components::*;
use crate::engine::systems::{wrap_x, wrapped_offset, VerticalWrap};
use super::config::{UnitConfig, WorldConfig};
use super::player::IslandSurface;

/// Something to create once the frame's updates are finished.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnRequest {
    Projectile { origin: Vec2, angle: f32, team: Team },
    Burst { at: Vec2, color: [f32; 3], count: usize },
}

/// Read-only view of one live unit for targeting.
#[derive(Debug, Clone, Copy)]
pub struct UnitSnapshot {
    pub entity: Entity,
    pub position: Vec2,
    pub size: Vec2,
    pub team: Team,
}

impl UnitSnapshot {
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Aim point near the top of the body.
    pub fn head(&self) -> Vec2 {
        Vec2::new(self.position.x + self.size.x * 0.5, self.position.y + self.size.y * 0.2)
    }
}

pub(crate) fn roll_range(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.gen_range(lo..hi) } else { lo }
}

// ============================================================================
// SPAWNING
// ============================================================================

/// Spawn a villager (or warrior) standing at `feet`, a point on an island top.
pub fn spawn_unit(
    world: &mut World,
    team: Team,
    feet: Vec2,
    warrior: bool,
    config: &UnitConfig,
    rng: &mut impl Rng,
) -> Entity {
    let (w, h) = if warrior { config.warrior_size } else { config.villager_size };
    let hp = if warrior { config.warrior_hp } else { config.villager_hp };
    let villager = Villager {
        state_timer: roll_range(rng, config.walk_timer_min, config.walk_timer_max),
        grounded: false,
    };
    let mut entity = world.spawn((
        Transform::from_position(Vec2::new(feet.x - w * 0.5, feet.y - h)),
        Size::new(w, h),
        Velocity::default(),
        team,
        Health::new(hp),
        villager,
    ));
    if warrior {
        entity.insert(Warrior { cooldown: 0.0 });
    }
    entity.id()
}

/// Snapshot every live villager and warrior.
pub fn collect_units(world: &mut World) -> Vec<UnitSnapshot> {
    let mut query = world.query_filtered::<(Entity, &Transform, &Size, &Team), (With<Villager>, Without<Dead>)>();
    query
        .iter(world)
        .map(|(entity, transform, size, team)| UnitSnapshot {
            entity,
            position: transform.position,
            size: Vec2::new(size.w, size.h),
            team: *team,
        })
        .collect()
}

/// Live unit count for `team`.
pub fn population(units: &[UnitSnapshot], team: Team) -> usize {
    units.iter().filter(|u| u.team == team).count()
}

// ============================================================================
// BEHAVIOUR
// ============================================================================

/// Random walk: re-roll horizontal speed when the state timer runs out.
pub fn villager_walk(villager: &mut Villager, velocity: &mut Vec2, dt: f32, config: &UnitConfig, rng: &mut impl Rng) {
    villager.state_timer -= dt;
    if villager.state_timer <= 0.0 {
        velocity.x = if config.walk_speed > 0.0 {
            rng.gen_range(-config.walk_speed..=config.walk_speed)
        } else {
            0.0
        };
        villager.state_timer = roll_range(rng, config.walk_timer_min, config.walk_timer_max);
    }
}

/// Warrior targeting. Returns false when no enemy exists, in which case the
/// caller falls back to the random walk.
pub fn warrior_think(
    warrior: &mut Warrior,
    me: &UnitSnapshot,
    velocity: &mut Vec2,
    dt: f32,
    targets: &[UnitSnapshot],
    config: &UnitConfig,
    world_width: f32,
    spawns: &mut Vec<SpawnRequest>,
) -> bool {
    warrior.cooldown -= dt;

    let origin = me.center();
    let nearest = targets
        .iter()
        .filter(|t| me.team.is_hostile_to(t.team))
        .map(|t| (wrapped_offset(origin, t.center(), world_width).length(), t))
        .min_by(|a, b| a.0.total_cmp(&b.0));

    let Some((distance, target)) = nearest else {
        return false;
    };

    if distance <= config.engage_range {
        velocity.x = 0.0;
        if warrior.cooldown <= 0.0 {
            let aim = wrapped_offset(origin, target.head(), world_width);
            spawns.push(SpawnRequest::Projectile {
                origin,
                angle: aim.y.atan2(aim.x),
                team: me.team,
            });
            warrior.cooldown = config.attack_cooldown;
        }
    } else {
        let dx = wrapped_offset(origin, target.center(), world_width).x;
        velocity.x = if dx.abs() > f32::EPSILON { config.strafe_speed * dx.signum() } else { 0.0 };
    }
    true
}

/// Gravity, vertical-only island landing, and world wrap for one unit.
pub fn unit_physics(
    position: &mut Vec2,
    size: Vec2,
    velocity: &mut Vec2,
    villager: &mut Villager,
    dt: f32,
    config: &UnitConfig,
    islands: &[IslandSurface],
    world: &WorldConfig,
) {
    velocity.y += config.gravity * dt;
    *position += *velocity * dt;

    villager.grounded = false;
    if velocity.y >= 0.0 {
        let center_x = position.x + size.x * 0.5;
        let feet = position.y + size.y;
        let landing = islands.iter().find(|island| {
            let rel = wrapped_offset(island.position, Vec2::new(center_x, feet), world.width);
            rel.x >= 0.0 && rel.x <= island.size.x && rel.y >= 0.0 && rel.y <= config.land_band
        });
        if let Some(island) = landing {
            position.y = island.position.y - size.y;
            velocity.y = 0.0;
            villager.grounded = true;
        }
    }

    position.y = VerticalWrap::for_villager(world.height).apply(position.y);
    position.x = wrap_x(position.x, world.width);
}

/// Advance every live unit one step. Shots are appended to `spawns`.
pub fn unit_system(
    world: &mut World,
    dt: f32,
    config: &UnitConfig,
    world_config: &WorldConfig,
    islands: &[IslandSurface],
    rng: &mut impl Rng,
    spawns: &mut Vec<SpawnRequest>,
) {
    let targets = collect_units(world);

    let mut query = world.query_filtered::<
        (Entity, &mut Transform, &Size, &mut Velocity, &Team, &mut Villager, Option<&mut Warrior>),
        Without<Dead>,
    >();
    for (entity, mut transform, size, mut velocity, team, mut villager, warrior) in query.iter_mut(world) {
        let size = Vec2::new(size.w, size.h);
        let mut vel = velocity.linear;

        let hunting = match warrior {
            Some(mut warrior) => {
                let me = UnitSnapshot { entity, position: transform.position, size, team: *team };
                warrior_think(&mut warrior, &me, &mut vel, dt, &targets, config, world_config.width, spawns)
            }
            None => false,
        };
        if !hunting {
            villager_walk(&mut villager, &mut vel, dt, config, rng);
        }

        let mut pos = transform.position;
        unit_physics(&mut pos, size, &mut vel, &mut villager, dt, config, islands, world_config);
        transform.position = pos;
        velocity.linear = vel;
    }
}
