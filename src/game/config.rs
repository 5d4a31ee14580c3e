// Data-driven game configuration.
//
// Every tunable the simulation reads lives in `GameConfig`. Defaults match
// the shipped balance; an optional JSON file (first CLI argument) overrides
// any subset of fields. Each section is `#[serde(default)]` so a file only
// has to name what it changes.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// SECTIONS
// ============================================================================

/// World geometry, viewport and seeding.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Horizontal period of the toroidal world.
    pub width: f32,
    pub height: f32,
    /// Logical canvas size in pixels.
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub island_count: usize,
    pub seed: u64,
    /// Seconds of simulated time for one full day/night cycle.
    pub day_length: f32,
    /// Depth of the sea band at the bottom of the world (near-water zone).
    pub sea_band: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 4000.0,
            height: 2000.0,
            viewport_width: 800.0,
            viewport_height: 600.0,
            island_count: 12,
            seed: 0x5eed_7a1b,
            day_length: 240.0,
            sea_band: 250.0,
        }
    }
}

/// Movement tuning shared by the local player and the rival.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    pub max_hp: f32,
    /// Horizontal acceleration in px/s².
    pub speed: f32,
    pub gravity: f32,
    /// Upward speed set by a grounded jump.
    pub jump_force: f32,
    /// Upward acceleration while flying.
    pub fly_accel: f32,
    /// Ceiling on upward speed while flying.
    pub fly_force: f32,
    /// Extra downward acceleration while diving (S).
    pub dive_accel: f32,
    /// Multiplicative velocity decay applied once per frame.
    pub friction: f32,
    /// Air drained per second of sustained flight.
    pub fly_air_cost: f32,
    /// Horizontal inset of island edges for the landing test.
    pub side_margin: f32,
    /// How far above an island's top the feet may be and still land.
    pub land_band_above: f32,
    /// How far below an island's top the feet may be and still land.
    pub land_band_below: f32,
    /// Feet sink this far into the island when standing.
    pub stand_overlap: f32,
    /// Speed (either axis) above which the player counts as moving.
    pub moving_epsilon: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 32.0,
            height: 48.0,
            max_hp: 100.0,
            speed: 1400.0,
            gravity: 1200.0,
            jump_force: 520.0,
            fly_accel: 2600.0,
            fly_force: 380.0,
            dive_accel: 1400.0,
            friction: 0.9,
            fly_air_cost: 18.0,
            side_margin: 10.0,
            land_band_above: 12.0,
            land_band_below: 24.0,
            stand_overlap: 4.0,
            moving_epsilon: 1.0,
        }
    }
}

/// Meter capacities and rates.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    pub max_earth: f32,
    pub max_air: f32,
    pub max_water: f32,
    pub max_fire: u32,
    pub start_earth: f32,
    pub start_fire: u32,
    pub air_depletion_rate: f32,
    pub air_regen_rate: f32,
    pub water_regen_rate: f32,
    /// Passive earth trickle per second.
    pub earth_regen_rate: f32,
    /// Seconds near a fire per regenerated fire charge.
    pub fire_regen_interval: f32,
    /// Earth paid per second of island dragging.
    pub drag_earth_cost: f32,
    /// Water paid per second of focus time dilation.
    pub focus_water_cost: f32,
    /// Earth granted for each enemy unit killed by green fire.
    pub kill_earth_reward: f32,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            max_earth: 100.0,
            max_air: 100.0,
            max_water: 100.0,
            max_fire: 10,
            start_earth: 50.0,
            start_fire: 5,
            air_depletion_rate: 8.0,
            air_regen_rate: 15.0,
            water_regen_rate: 20.0,
            earth_regen_rate: 2.0,
            fire_regen_interval: 0.25,
            drag_earth_cost: 20.0,
            focus_water_cost: 25.0,
            kill_earth_reward: 5.0,
        }
    }
}

/// Camera smoothing, shake and dilation parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub base_zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_rate: f32,
    /// Airborne speed that produces the full zoom-out amount.
    pub zoom_speed_ref: f32,
    pub zoom_out_amount: f32,
    pub follow_rate: f32,
    pub lookahead_scale_x: f32,
    pub lookahead_scale_y: f32,
    pub lookahead_rate_x: f32,
    pub lookahead_rate_y: f32,
    /// How far the view may extend above/below the world.
    pub vertical_band: f32,
    pub max_trauma: f32,
    /// Trauma lost per second.
    pub trauma_decay: f32,
    /// Pixel offset at full trauma.
    pub shake_magnitude: f32,
    /// Rotation (radians) at full trauma.
    pub shake_angle: f32,
    /// Shake phase advance per second.
    pub shake_frequency: f32,
    pub dilation_rate: f32,
    pub focus_dilation: f32,
    /// Offscreen allowance before a rect is culled.
    pub cull_margin: f32,
    /// Trauma added when the local player is hit.
    pub hit_trauma: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            base_zoom: 1.0,
            min_zoom: 0.6,
            max_zoom: 1.5,
            zoom_rate: 3.0,
            zoom_speed_ref: 600.0,
            zoom_out_amount: 0.3,
            follow_rate: 5.0,
            lookahead_scale_x: 0.35,
            lookahead_scale_y: 0.35,
            lookahead_rate_x: 2.0,
            lookahead_rate_y: 1.5,
            vertical_band: 200.0,
            max_trauma: 1.0,
            trauma_decay: 1.2,
            shake_magnitude: 18.0,
            shake_angle: 0.05,
            shake_frequency: 40.0,
            dilation_rate: 6.0,
            focus_dilation: 0.3,
            cull_margin: 64.0,
            hit_trauma: 0.35,
        }
    }
}

/// Villager and warrior behaviour.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitConfig {
    pub villager_size: (f32, f32),
    pub warrior_size: (f32, f32),
    pub villager_hp: f32,
    pub warrior_hp: f32,
    pub gravity: f32,
    pub walk_speed: f32,
    /// Random-walk re-roll window in seconds.
    pub walk_timer_min: f32,
    pub walk_timer_max: f32,
    pub land_band: f32,
    pub engage_range: f32,
    pub strafe_speed: f32,
    pub attack_cooldown: f32,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            villager_size: (24.0, 24.0),
            warrior_size: (28.0, 34.0),
            villager_hp: 20.0,
            warrior_hp: 40.0,
            gravity: 900.0,
            walk_speed: 40.0,
            walk_timer_min: 1.0,
            walk_timer_max: 3.0,
            land_band: 20.0,
            engage_range: 320.0,
            strafe_speed: 70.0,
            attack_cooldown: 1.5,
        }
    }
}

/// Population control.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub interval: f32,
    /// Green cap is this many units per owned island.
    pub green_per_island: usize,
    pub blue_cap: usize,
    pub green_warrior_chance: f64,
    pub blue_warrior_chance: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval: 5.0,
            green_per_island: 5,
            blue_cap: 10,
            green_warrior_chance: 0.2,
            blue_warrior_chance: 0.3,
        }
    }
}

/// Projectiles, hits, rival behaviour and cosmetic particles.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub projectile_speed: f32,
    pub projectile_life: f32,
    pub projectile_size: f32,
    pub damage: f32,
    pub fire_radius: f32,
    pub rival_aggro_radius: f32,
    pub rival_shoot_range: f32,
    pub rival_reaction: f32,
    pub particle_gravity: f32,
    pub hit_particles: usize,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            projectile_speed: 600.0,
            projectile_life: 3.0,
            projectile_size: 8.0,
            damage: 10.0,
            fire_radius: 90.0,
            rival_aggro_radius: 700.0,
            rival_shoot_range: 450.0,
            rival_reaction: 0.6,
            particle_gravity: 400.0,
            hit_particles: 8,
        }
    }
}

/// Frame pacing.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Frames with a longer elapsed time are dropped (tab-switch stalls).
    pub max_frame_dt: f32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { max_frame_dt: 0.1 }
    }
}

// ============================================================================
// GAME CONFIG
// ============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub player: PlayerTuning,
    pub resources: ResourceConfig,
    pub camera: CameraConfig,
    pub units: UnitConfig,
    pub spawning: SpawnConfig,
    pub combat: CombatConfig,
    pub frame: FrameConfig,
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parse game config json")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read game config: {}", path.display()))?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let json = r#"{ "world": { "width": 1234.0 }, "spawning": { "blue_cap": 3 } }"#;
        let config = GameConfig::from_json_str(json).unwrap();
        assert_eq!(config.world.width, 1234.0);
        assert_eq!(config.world.height, WorldConfig::default().height);
        assert_eq!(config.spawning.blue_cap, 3);
        assert_eq!(config.spawning.interval, 5.0);
        assert_eq!(config.resources.fire_regen_interval, 0.25);
    }

    #[test]
    fn default_config_survives_json() {
        let config = GameConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let restored = GameConfig::from_json_str(&json).unwrap();
        assert_eq!(restored.units.attack_cooldown, 1.5);
        assert_eq!(restored.combat.projectile_speed, 600.0);
        assert_eq!(restored.units.villager_size, (24.0, 24.0));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(GameConfig::from_json_str("{ not json").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = GameConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.json"));
    }
}
