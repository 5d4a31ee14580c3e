// Population control: periodic villager/warrior spawns on friendly islands.

use bevy_ecs::prelude::*;
use glam::Vec2;
use rand::Rng;

use crate::engine::components::Team;
use super::config::{SpawnConfig, UnitConfig};
use super::islands::owned_island_count;
use super::player::IslandSurface;
use super::units::{population, spawn_unit, UnitSnapshot};

/// Fires once every `interval` seconds of simulated time.
#[derive(Debug, Clone)]
pub struct SpawnDirector {
    timer: f32,
    interval: f32,
}

impl SpawnDirector {
    pub fn new(config: &SpawnConfig) -> Self {
        Self { timer: 0.0, interval: config.interval }
    }

    /// Advance the timer. Returns true when a spawn wave is due.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.timer += dt;
        if self.timer >= self.interval {
            self.timer -= self.interval;
            true
        } else {
            false
        }
    }
}

/// Population cap for `team` given the current island ownership.
pub fn population_cap(team: Team, islands: &[IslandSurface], config: &SpawnConfig) -> usize {
    match team {
        Team::Green => config.green_per_island * owned_island_count(islands, Team::Green),
        Team::Blue => config.blue_cap,
        Team::Neutral => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawned {
    pub entity: Entity,
    pub team: Team,
    pub warrior: bool,
}

/// One spawn wave: at most one unit per team, placed on a random friendly
/// island top, skipped when the team is at its cap or owns no island.
pub fn spawn_wave(
    world: &mut World,
    islands: &[IslandSurface],
    units: &[UnitSnapshot],
    config: &SpawnConfig,
    unit_config: &UnitConfig,
    rng: &mut impl Rng,
) -> Vec<Spawned> {
    let mut spawned = Vec::new();
    for (team, warrior_chance) in [
        (Team::Green, config.green_warrior_chance),
        (Team::Blue, config.blue_warrior_chance),
    ] {
        if population(units, team) >= population_cap(team, islands, config) {
            continue;
        }
        let homes: Vec<&IslandSurface> = islands.iter().filter(|i| i.team == team).collect();
        if homes.is_empty() {
            continue;
        }
        let home = homes[rng.gen_range(0..homes.len())];
        let x = home.position.x + home.size.x * rng.gen_range(0.2..0.8_f32);
        let warrior = rng.gen_bool(warrior_chance.clamp(0.0, 1.0));
        let entity = spawn_unit(world, team, Vec2::new(x, home.position.y), warrior, unit_config, rng);
        spawned.push(Spawned { entity, team, warrior });
    }
    if !spawned.is_empty() {
        log::debug!("spawn wave: {} new units", spawned.len());
    }
    spawned
}
