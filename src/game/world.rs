// Game orchestrator: owns every piece of simulation state and runs one
// frame at a time.
//
// Frame order (simulated dt = real dt * camera dilation):
//   focus dilation -> camera trackers -> island drag + drift -> player ->
//   rival -> resource ledgers -> units -> projectile/particle motion ->
//   queued spawns -> hit resolution -> spawn wave -> respawns -> purge ->
//   camera follow
//
// Everything that happens is appended to `events`; the host drains it.

use bevy_ecs::prelude::*;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::camera::{Camera2D, FollowTarget, ScreenRect};
use crate::engine::components::*;
use crate::engine::debug_overlay::Meter;
use crate::engine::draw::{DrawList, Layer, QuadInstance};
use crate::engine::events::EventQueue;
use crate::engine::input::InputSnapshot;
use crate::engine::parallax::{daylight, default_layers, sky_gradient, ParallaxLayer};
use crate::engine::systems::{lifetime_system, purge_dead};
use super::combat::{
    apply_spawn_requests, particle_system, projectile_system, resolve_player_hits, resolve_unit_hits,
};
use super::config::GameConfig;
use super::events::GameEvent;
use super::islands::{collect_island_surfaces, generate_islands, island_drift_system, near_fireplace, IslandDrag};
use super::player::{Controls, IslandSurface, Player, PlayerStep};
use super::rival::{aim_angle, RivalBrain, RIVAL_TEAM};
use super::spawning::{spawn_wave, SpawnDirector};
use super::units::{collect_units, unit_system, SpawnRequest, UnitSnapshot};

/// Day phase at simulated time zero (early morning).
const DAWN_PHASE: f32 = 0.3;

// ============================================================================
// FRAME CLOCK
// ============================================================================

/// Turns host timestamps into frame deltas, dropping lag spikes.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<f64>,
    max_dt: f32,
    skipped: u64,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self { last: None, max_dt, skipped: 0 }
    }

    /// Elapsed seconds since the previous tick, or `None` when this frame
    /// must be skipped: the very first tick, a backwards timestamp, or a
    /// gap longer than `max_dt`.
    pub fn tick(&mut self, timestamp: f64) -> Option<f32> {
        let previous = self.last.replace(timestamp)?;
        let dt = (timestamp - previous) as f32;
        if !(0.0..=self.max_dt).contains(&dt) {
            self.skipped += 1;
            log::debug!("skipping frame: dt={dt:.3}s");
            return None;
        }
        Some(dt)
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

// ============================================================================
// GAME
// ============================================================================

/// Counts refreshed at the end of every simulated frame (HUD statistics).
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameStats {
    pub green_units: usize,
    pub blue_units: usize,
    pub projectiles: usize,
    pub particles: usize,
    pub islands: usize,
    pub skipped_frames: u64,
}

pub struct Game {
    pub config: GameConfig,
    pub world: World,
    pub player: Player,
    pub rival: Player,
    brain: RivalBrain,
    pub camera: Camera2D,
    layers: Vec<ParallaxLayer>,
    spawner: SpawnDirector,
    rng: StdRng,
    clock: FrameClock,
    pub events: EventQueue<GameEvent>,
    drag: Option<IslandDrag>,
    prev_input: InputSnapshot,
    spawns: Vec<SpawnRequest>,
    /// Simulated seconds (dilated).
    sim_time: f32,
    /// Real seconds since start, drives parallax wind.
    real_time: f32,
    focused: bool,
    pub stats: FrameStats,
}

fn team_spawn_point(islands: &[IslandSurface], team: Team, rng: &mut impl Rng) -> Option<Vec2> {
    let homes: Vec<&IslandSurface> = islands.iter().filter(|i| i.team == team).collect();
    if homes.is_empty() {
        return None;
    }
    Some(homes[rng.gen_range(0..homes.len())].top_center())
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.world.seed);
        let mut world = World::new();
        generate_islands(&mut world, &config.world, &mut rng);
        let islands = collect_island_surfaces(&mut world);

        let world_size = Vec2::new(config.world.width, config.world.height);
        let fallback = Vec2::new(config.world.width * 0.5, config.world.height * 0.3);

        let mut player = Player::new(Team::Green, Vec2::ZERO, &config.player, &config.resources);
        player.respawn(team_spawn_point(&islands, Team::Green, &mut rng).unwrap_or(fallback));
        let mut rival = Player::new(RIVAL_TEAM, Vec2::ZERO, &config.player, &config.resources);
        rival.respawn(team_spawn_point(&islands, RIVAL_TEAM, &mut rng).unwrap_or(fallback));

        // Opening wave so both tribes start populated.
        spawn_wave(&mut world, &islands, &[], &config.spawning, &config.units, &mut rng);

        let viewport = Vec2::new(config.world.viewport_width, config.world.viewport_height);
        let mut camera = Camera2D::new(&config.camera, viewport, world_size);
        camera.snap_to(&FollowTarget {
            position: player.position,
            size: player.size,
            velocity: Vec2::ZERO,
        });

        let mut game = Self {
            brain: RivalBrain::new(&config.combat),
            spawner: SpawnDirector::new(&config.spawning),
            clock: FrameClock::new(config.frame.max_frame_dt),
            layers: default_layers(),
            events: EventQueue::new(),
            drag: None,
            prev_input: InputSnapshot::default(),
            spawns: Vec::new(),
            sim_time: 0.0,
            real_time: 0.0,
            focused: false,
            stats: FrameStats::default(),
            config,
            world,
            player,
            rival,
            camera,
            rng,
        };
        game.refresh_stats();
        game
    }

    /// Host entry point for one animation frame. Returns false when the
    /// frame was skipped (no update, nothing new to draw).
    pub fn frame(&mut self, timestamp: f64, input: &InputSnapshot) -> bool {
        match self.clock.tick(timestamp) {
            Some(dt) => {
                self.update(dt, input);
                true
            }
            None => {
                self.stats.skipped_frames = self.clock.skipped();
                false
            }
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Day phase in [0, 1): 0 midnight, 0.5 noon.
    pub fn day_phase(&self) -> f32 {
        (self.sim_time / self.config.world.day_length.max(1.0) + DAWN_PHASE).rem_euclid(1.0)
    }

    /// HUD bars for the local player: hp and the four elements.
    pub fn meters(&self) -> Vec<Meter> {
        let p = &self.player;
        let [earth, air, water, fire] = p.ledger.fractions();
        vec![
            Meter { label: "HP", fraction: p.hp / p.max_hp, color: [220, 60, 60], readout: format!("{:.0}", p.hp.max(0.0)) },
            Meter { label: "Earth", fraction: earth, color: [150, 105, 60], readout: format!("{:.0}", p.ledger.earth()) },
            Meter { label: "Air", fraction: air, color: [200, 230, 240], readout: format!("{:.0}", p.ledger.air()) },
            Meter { label: "Water", fraction: water, color: [60, 130, 230], readout: format!("{:.0}", p.ledger.water()) },
            Meter { label: "Fire", fraction: fire, color: [250, 140, 30], readout: format!("{}", p.ledger.fire()) },
        ]
    }

    /// Advance the simulation by one real frame of `real_dt` seconds.
    pub fn update(&mut self, real_dt: f32, input: &InputSnapshot) {
        self.update_focus(real_dt, input);
        self.camera.update(real_dt);
        let dt = real_dt * self.camera.dilation();
        self.sim_time += dt;
        self.real_time += real_dt;

        let cursor = self
            .camera
            .screen_to_world(Vec2::new(input.mouse_x, input.mouse_y));

        let islands = self.update_islands(dt, input, cursor);
        let units = collect_units(&mut self.world);

        let player_step = self.update_player(dt, input, cursor, &islands);
        let rival_step = self.update_rival(dt, &units, &islands);
        self.update_ledgers(dt, player_step, rival_step, &islands);

        let config = &self.config;
        unit_system(
            &mut self.world,
            dt,
            &config.units,
            &config.world,
            &islands,
            &mut self.rng,
            &mut self.spawns,
        );
        projectile_system(&mut self.world, dt, config.world.width);
        particle_system(&mut self.world, dt, config.combat.particle_gravity, config.world.width);
        lifetime_system(&mut self.world, dt);
        apply_spawn_requests(&mut self.world, &mut self.spawns, &config.combat, &mut self.rng);

        self.resolve_hits();

        if self.spawner.tick(dt) {
            let units = collect_units(&mut self.world);
            let config = &self.config;
            for spawned in spawn_wave(&mut self.world, &islands, &units, &config.spawning, &config.units, &mut self.rng) {
                self.events.send(GameEvent::UnitSpawned { team: spawned.team, warrior: spawned.warrior });
            }
        }

        self.respawn_dead(&islands);
        purge_dead(&mut self.world);
        self.update_camera(real_dt);

        self.prev_input = *input;
        self.refresh_stats();
    }

    // ------------------------------------------------------------------------
    // Frame steps
    // ------------------------------------------------------------------------

    fn update_focus(&mut self, real_dt: f32, input: &InputSnapshot) {
        let cost = self.config.resources.focus_water_cost * real_dt;
        self.focused = input.shift && !self.player.is_dead() && self.player.ledger.spend_water(cost);
        let target = if self.focused { self.config.camera.focus_dilation } else { 1.0 };
        self.camera.set_target_dilation(target);
    }

    /// Drag handling and drift. Returns island snapshots after they moved.
    fn update_islands(&mut self, dt: f32, input: &InputSnapshot, cursor: Vec2) -> Vec<IslandSurface> {
        let width = self.config.world.width;
        if input.right_down {
            if self.drag.is_none() && !self.prev_input.right_down {
                let islands = collect_island_surfaces(&mut self.world);
                self.drag = IslandDrag::grab(&islands, cursor, width);
            }
            if let Some(drag) = self.drag {
                let paid = self.player.ledger.spend_earth(self.config.resources.drag_earth_cost * dt);
                if !paid || !drag.pull(&mut self.world, cursor, width) {
                    self.drag = None;
                }
            }
        } else {
            self.drag = None;
        }

        island_drift_system(&mut self.world, dt, &self.config.world);
        collect_island_surfaces(&mut self.world)
    }

    fn update_player(
        &mut self,
        dt: f32,
        input: &InputSnapshot,
        cursor: Vec2,
        islands: &[IslandSurface],
    ) -> PlayerStep {
        if self.player.is_dead() {
            return PlayerStep::default();
        }
        let world_size = Vec2::new(self.config.world.width, self.config.world.height);
        let step = self
            .player
            .update(Controls::from_input(input), dt, &self.config.player, islands, world_size);
        if step.landed {
            self.events.send(GameEvent::Landed { team: self.player.team });
        }

        let pressed = input.left_down && !self.prev_input.left_down;
        if pressed && self.player.ledger.spend_fire() {
            let origin = self.player.center();
            let angle = aim_angle(origin, cursor, world_size.x);
            self.spawns.push(SpawnRequest::Projectile { origin, angle, team: self.player.team });
            self.events.send(GameEvent::Shot { team: self.player.team, at: origin });
        }
        step
    }

    fn update_rival(&mut self, dt: f32, units: &[UnitSnapshot], islands: &[IslandSurface]) -> PlayerStep {
        if self.rival.is_dead() {
            return PlayerStep::default();
        }
        let config = &self.config;
        let intent = self
            .brain
            .think(&self.rival, &self.player, units, islands, dt, &config.combat, &config.world);
        let world_size = Vec2::new(config.world.width, config.world.height);
        let step = self.rival.update(intent.controls, dt, &config.player, islands, world_size);
        if step.landed {
            self.events.send(GameEvent::Landed { team: self.rival.team });
        }

        if let Some(target) = intent.shoot_at {
            if self.rival.ledger.spend_fire() {
                let origin = self.rival.center();
                let angle = aim_angle(origin, target, world_size.x);
                self.spawns.push(SpawnRequest::Projectile { origin, angle, team: self.rival.team });
                self.events.send(GameEvent::Shot { team: self.rival.team, at: origin });
            }
        }
        step
    }

    fn update_ledgers(&mut self, dt: f32, player_step: PlayerStep, rival_step: PlayerStep, islands: &[IslandSurface]) {
        let world = &self.config.world;
        let radius = self.config.combat.fire_radius;
        let sea_line = world.height - world.sea_band;
        for (actor, step) in [(&mut self.player, player_step), (&mut self.rival, rival_step)] {
            let near_fire = near_fireplace(islands, actor.center(), radius, world.width);
            let near_water = actor.feet() > sea_line;
            actor.ledger.update(dt, step.moving, near_water, near_fire);
        }
    }

    fn resolve_hits(&mut self) {
        let config = &self.config;
        let width = config.world.width;
        let burst = config.combat.hit_particles;

        for hit in resolve_unit_hits(&mut self.world, config.combat.damage, width) {
            let color = team_rgb(hit.target_team);
            if hit.killed {
                self.events.send(GameEvent::UnitKilled { team: hit.target_team, at: hit.at, warrior: hit.warrior });
                self.spawns.push(SpawnRequest::Burst { at: hit.at, color, count: burst * 2 });
                if hit.shooter_team == Team::Green && hit.target_team == Team::Blue {
                    self.player.ledger.add_earth(config.resources.kill_earth_reward);
                }
            } else {
                self.events.send(GameEvent::UnitHit { team: hit.target_team, at: hit.at });
                self.spawns.push(SpawnRequest::Burst { at: hit.at, color, count: burst });
            }
        }

        let taken = resolve_player_hits(&mut self.world, &mut self.player, config.combat.damage, width);
        if taken > 0 {
            self.camera.add_trauma(config.camera.hit_trauma * taken as f32);
            self.events.send(GameEvent::PlayerHit { team: self.player.team, local: true });
            self.spawns.push(SpawnRequest::Burst { at: self.player.center(), color: team_rgb(self.player.team), count: burst });
        }
        let taken = resolve_player_hits(&mut self.world, &mut self.rival, config.combat.damage, width);
        if taken > 0 {
            self.events.send(GameEvent::PlayerHit { team: self.rival.team, local: false });
            self.spawns.push(SpawnRequest::Burst { at: self.rival.center(), color: team_rgb(self.rival.team), count: burst });
        }

        apply_spawn_requests(&mut self.world, &mut self.spawns, &config.combat, &mut self.rng);
    }

    fn respawn_dead(&mut self, islands: &[IslandSurface]) {
        let fallback = Vec2::new(self.config.world.width * 0.5, self.config.world.height * 0.3);
        for actor in [&mut self.player, &mut self.rival] {
            if actor.is_dead() {
                let top = team_spawn_point(islands, actor.team, &mut self.rng).unwrap_or(fallback);
                actor.respawn(top);
                log::debug!("{:?} respawned at ({:.0}, {:.0})", actor.team, top.x, top.y);
                self.events.send(GameEvent::Respawned { team: actor.team });
            }
        }
    }

    fn update_camera(&mut self, real_dt: f32) {
        let camera = &self.config.camera;
        let zoom = if self.player.grounded {
            camera.base_zoom
        } else {
            let speed = self.player.velocity.length();
            camera.base_zoom - speed / camera.zoom_speed_ref.max(1.0) * camera.zoom_out_amount
        };
        self.camera.set_target_zoom(zoom);
        self.camera.follow(
            &FollowTarget {
                position: self.player.position,
                size: self.player.size,
                velocity: self.player.velocity,
            },
            real_dt,
        );
    }

    fn refresh_stats(&mut self) {
        let mut stats = FrameStats { skipped_frames: self.clock.skipped(), ..FrameStats::default() };
        let mut units = self.world.query_filtered::<&Team, (With<Villager>, Without<Dead>)>();
        for team in units.iter(&self.world) {
            match team {
                Team::Green => stats.green_units += 1,
                Team::Blue => stats.blue_units += 1,
                Team::Neutral => {}
            }
        }
        stats.projectiles = self.world.query::<&Projectile>().iter(&self.world).count();
        stats.particles = self.world.query::<&Particle>().iter(&self.world).count();
        stats.islands = self.world.query::<&Island>().iter(&self.world).count();
        self.stats = stats;
    }

    // ------------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------------

    /// Fill `draw` with this frame's quads in paint order.
    pub fn build_draw_list(&mut self, draw: &mut DrawList) {
        draw.clear();
        draw.rotation = self.camera.shake_rotation();
        let viewport = self.camera.viewport;
        let phase = self.day_phase();
        let light = 0.35 + 0.65 * daylight(phase);

        let (sky_top, sky_bottom) = sky_gradient(phase);
        let full = ScreenRect { x: 0.0, y: 0.0, w: viewport.x, h: viewport.y };
        draw.push(Layer::Sky, QuadInstance::gradient(full, sky_top, sky_bottom));

        for layer in &self.layers {
            let color = shade(layer.color, light);
            for tile in layer.tiles(self.camera.position(), self.camera.zoom(), self.real_time, viewport.x) {
                let rect = ScreenRect { x: tile.x, y: tile.y, w: tile.w, h: tile.h };
                draw.push(Layer::Parallax, QuadInstance::flat(rect, color));
            }
        }

        let camera = &self.camera;
        let mut islands = self.world.query_filtered::<(&Transform, &Size, &Team, &Island), Without<Dead>>();
        for (transform, size, team, island) in islands.iter(&self.world) {
            push_island(draw, camera, transform.position, Vec2::new(size.w, size.h), *team, island, light);
        }

        let mut units = self
            .world
            .query_filtered::<(&Transform, &Size, &Team, &Health, Has<Warrior>), (With<Villager>, Without<Dead>)>();
        for (transform, size, team, health, warrior) in units.iter(&self.world) {
            let mut color = team_color(*team);
            if warrior {
                color = shade(color, 0.65);
            }
            // Wounded villagers darken toward half brightness.
            color = shade(color, 0.5 + 0.5 * health.fraction());
            push_rect(draw, camera, Layer::Villagers, transform.position, Vec2::new(size.w, size.h), shade(color, light));
        }

        let mut projectiles = self
            .world
            .query_filtered::<(&Transform, &Size, &Team), (With<Projectile>, Without<Dead>)>();
        for (transform, size, team) in projectiles.iter(&self.world) {
            let color = if *team == Team::Green { [1.0, 0.55, 0.1, 1.0] } else { [0.9, 0.2, 0.6, 1.0] };
            push_rect(draw, camera, Layer::Projectiles, transform.position, Vec2::new(size.w, size.h), color);
        }

        let mut particles = self
            .world
            .query_filtered::<(&Transform, &Size, &Lifetime, &Particle), Without<Dead>>();
        for (transform, size, life, particle) in particles.iter(&self.world) {
            let [r, g, b] = particle.color;
            let color = [r, g, b, life.fraction()];
            push_rect(draw, camera, Layer::Particles, transform.position, Vec2::new(size.w, size.h), color);
        }

        for (actor, layer) in [(&self.player, Layer::Player), (&self.rival, Layer::Rival)] {
            if !actor.is_dead() {
                let color = shade(team_color(actor.team), 0.8 + 0.2 * light);
                push_rect(draw, camera, layer, actor.position, actor.size, color);
            }
        }
    }
}

// ============================================================================
// DRAW HELPERS
// ============================================================================

fn team_rgb(team: Team) -> [f32; 3] {
    match team {
        Team::Green => [0.25, 0.75, 0.3],
        Team::Blue => [0.25, 0.45, 0.9],
        Team::Neutral => [0.6, 0.6, 0.6],
    }
}

fn team_color(team: Team) -> [f32; 4] {
    let [r, g, b] = team_rgb(team);
    [r, g, b, 1.0]
}

fn shade(color: [f32; 4], amount: f32) -> [f32; 4] {
    [color[0] * amount, color[1] * amount, color[2] * amount, color[3]]
}

fn push_rect(draw: &mut DrawList, camera: &Camera2D, layer: Layer, position: Vec2, size: Vec2, color: [f32; 4]) {
    if let Some(rect) = camera.screen_rect(position, size) {
        draw.push(layer, QuadInstance::flat(rect, color));
    }
}

/// Island body, team-coloured turf and structure markers.
fn push_island(
    draw: &mut DrawList,
    camera: &Camera2D,
    position: Vec2,
    size: Vec2,
    team: Team,
    island: &Island,
    light: f32,
) {
    let Some(body) = camera.screen_rect(position, size) else {
        return;
    };
    draw.push(
        Layer::Islands,
        QuadInstance::gradient(body, shade([0.45, 0.32, 0.2, 1.0], light), shade([0.25, 0.16, 0.1, 1.0], light)),
    );
    push_rect(draw, camera, Layer::Islands, position, Vec2::new(size.x, 6.0), shade(team_color(team), light));

    let top = position.y;
    if island.tree {
        let at = Vec2::new(position.x + size.x * 0.2, top - 60.0);
        push_rect(draw, camera, Layer::Islands, at, Vec2::new(26.0, 60.0), shade([0.15, 0.5, 0.2, 1.0], light));
    }
    if island.teepee {
        let at = Vec2::new(position.x + size.x * 0.55, top - 40.0);
        push_rect(draw, camera, Layer::Islands, at, Vec2::new(36.0, 40.0), shade([0.85, 0.7, 0.45, 1.0], light));
    }
    if island.fireplace {
        let at = Vec2::new(position.x + size.x * 0.5 - 8.0, top - 12.0);
        push_rect(draw, camera, Layer::Islands, at, Vec2::new(16.0, 12.0), [1.0, 0.5, 0.1, 1.0]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn run(game: &mut Game, frames: usize, input: &InputSnapshot) {
        for _ in 0..frames {
            game.update(DT, input);
        }
    }

    #[test]
    fn clock_skips_first_lagged_and_backwards_frames() {
        let mut clock = FrameClock::new(0.1);
        assert_eq!(clock.tick(10.0), None);
        let dt = clock.tick(10.016).unwrap();
        assert!((dt - 0.016).abs() < 1e-4);
        assert_eq!(clock.tick(10.5), None);
        assert!(clock.tick(10.52).is_some());
        assert_eq!(clock.tick(10.0), None);
        assert_eq!(clock.skipped(), 2);
    }

    #[test]
    fn lag_spike_frame_changes_nothing() {
        let mut game = Game::new(GameConfig::default());
        let input = InputSnapshot::default();
        assert!(!game.frame(1.0, &input));
        assert!(game.frame(1.0 + DT as f64, &input));
        let before = game.player.position;
        assert!(!game.frame(3.0, &input));
        assert_eq!(game.player.position, before);
        // The opening tick has no previous timestamp and is not counted.
        assert_eq!(game.stats.skipped_frames, 1);
    }

    #[test]
    fn player_starts_on_a_green_island() {
        let mut game = Game::new(GameConfig::default());
        run(&mut game, 30, &InputSnapshot::default());
        assert!(game.player.grounded);
        let islands = collect_island_surfaces(&mut game.world);
        let home = islands.iter().find(|i| Some(i.entity) == game.player.standing_on).unwrap();
        assert_eq!(home.team, Team::Green);
        assert!(game.stats.green_units >= 1);
        assert!(game.stats.blue_units >= 1);
    }

    #[test]
    fn same_seed_same_simulation() {
        let script = [
            InputSnapshot { d: true, ..InputSnapshot::default() },
            InputSnapshot { w: true, d: true, ..InputSnapshot::default() },
            InputSnapshot::default(),
        ];
        let mut a = Game::new(GameConfig::default());
        let mut b = Game::new(GameConfig::default());
        for input in &script {
            run(&mut a, 120, input);
            run(&mut b, 120, input);
        }
        assert_eq!(a.player.position, b.player.position);
        assert_eq!(a.rival.position, b.rival.position);
        assert_eq!(a.stats.green_units, b.stats.green_units);
        assert_eq!(a.stats.blue_units, b.stats.blue_units);
        assert_eq!(a.stats.projectiles, b.stats.projectiles);
    }

    #[test]
    fn click_fires_once_per_press() {
        let mut config = GameConfig::default();
        // Keep the rival from shooting during the test.
        config.combat.rival_shoot_range = 0.0;
        let mut game = Game::new(config);
        run(&mut game, 2, &InputSnapshot::default());
        let fire = game.player.ledger.fire();

        // Held for several frames, well under one fire regen interval.
        let click = InputSnapshot { left_down: true, mouse_x: 700.0, mouse_y: 300.0, ..InputSnapshot::default() };
        run(&mut game, 5, &click);
        assert_eq!(game.player.ledger.fire(), fire - 1);
        assert_eq!(game.stats.projectiles, 1);
        assert!(game.events.drain().any(|e| matches!(e, GameEvent::Shot { team: Team::Green, .. })));
    }

    #[test]
    fn focus_needs_water() {
        let mut game = Game::new(GameConfig::default());
        let shift = InputSnapshot { shift: true, ..InputSnapshot::default() };
        run(&mut game, 30, &shift);
        assert_eq!(game.player.ledger.water(), 0.0);
        assert!(!game.is_focused());
        assert_eq!(game.camera.dilation(), 1.0);
    }

    #[test]
    fn camera_stays_in_world_while_flying() {
        let mut game = Game::new(GameConfig::default());
        let fly = InputSnapshot { w: true, a: true, ..InputSnapshot::default() };
        run(&mut game, 240, &fly);
        let x = game.camera.position().x;
        assert!((0.0..game.config.world.width).contains(&x));
    }

    #[test]
    fn meters_track_ledger() {
        let game = Game::new(GameConfig::default());
        let meters = game.meters();
        assert_eq!(meters.len(), 5);
        assert_eq!(meters[0].fraction, 1.0);
        let fire = meters.iter().find(|m| m.label == "Fire").unwrap();
        assert_eq!(fire.readout, "5");
        assert!((fire.fraction - 0.5).abs() < 1e-6);
    }

    #[test]
    fn draw_list_respects_paint_order() {
        let mut game = Game::new(GameConfig::default());
        run(&mut game, 10, &InputSnapshot::default());
        let mut draw = DrawList::new();
        game.build_draw_list(&mut draw);
        assert!(draw.is_ordered());
        assert_eq!(draw.layers()[0], Layer::Sky);
        assert!(draw.layers().contains(&Layer::Player));
    }
}
