// Flying tribal characters: the local player and the AI rival.
//
// Horizontal input accelerates, friction decays x velocity once per frame,
// gravity pulls down. A grounded jump is a single impulse; holding jump in
// the air flies while Air lasts. Landing is only tested while falling.

use std::collections::HashSet;

use bevy_ecs::entity::Entity;
use glam::Vec2;

use crate::engine::components::Team;
use crate::engine::input::InputSnapshot;
use crate::engine::systems::{wrap_delta, wrap_x, VerticalWrap};
use super::config::{PlayerTuning, ResourceConfig};
use super::resources::ResourceLedger;

/// Read-only view of one island, collected before actors move.
#[derive(Debug, Clone, Copy)]
pub struct IslandSurface {
    pub entity: Entity,
    pub position: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub team: Team,
    pub fireplace: bool,
}

impl IslandSurface {
    /// World point at the middle of the island's top edge.
    pub fn top_center(&self) -> Vec2 {
        Vec2::new(self.position.x + self.size.x * 0.5, self.position.y)
    }
}

/// Movement intent for one frame, from keys or from the rival AI.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub dive: bool,
}

impl Controls {
    pub fn from_input(input: &InputSnapshot) -> Self {
        Self {
            left: input.a,
            right: input.d,
            jump: input.w || input.space,
            dive: input.s,
        }
    }
}

/// What happened during one `Player::update`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PlayerStep {
    /// Speed above epsilon on either axis. Feeds the Air meter.
    pub moving: bool,
    /// Touched down this frame after being airborne.
    pub landed: bool,
    pub jumped: bool,
    pub flying: bool,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub grounded: bool,
    pub team: Team,
    pub standing_on: Option<Entity>,
    /// Islands landed on at least once. Recorded, not yet rewarded.
    pub visited_islands: HashSet<Entity>,
    pub ledger: ResourceLedger,
}

impl Player {
    pub fn new(team: Team, position: Vec2, tuning: &PlayerTuning, resources: &ResourceConfig) -> Self {
        Self {
            position,
            size: Vec2::new(tuning.width, tuning.height),
            velocity: Vec2::ZERO,
            hp: tuning.max_hp,
            max_hp: tuning.max_hp,
            grounded: false,
            team,
            standing_on: None,
            visited_islands: HashSet::new(),
            ledger: ResourceLedger::new(resources),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    pub fn feet(&self) -> f32 {
        self.position.y + self.size.y
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    /// Put the player back in play, standing on `top` (an island's top centre).
    pub fn respawn(&mut self, top: Vec2) {
        self.position = Vec2::new(top.x - self.size.x * 0.5, top.y - self.size.y);
        self.velocity = Vec2::ZERO;
        self.hp = self.max_hp;
        self.grounded = false;
        self.standing_on = None;
    }

    pub fn update(
        &mut self,
        controls: Controls,
        dt: f32,
        tuning: &PlayerTuning,
        islands: &[IslandSurface],
        world_size: Vec2,
    ) -> PlayerStep {
        let mut step = PlayerStep::default();
        let was_grounded = self.grounded;

        if controls.left {
            self.velocity.x -= tuning.speed * dt;
        }
        if controls.right {
            self.velocity.x += tuning.speed * dt;
        }
        self.velocity.x *= tuning.friction;

        self.velocity.y += tuning.gravity * dt;
        if controls.dive {
            self.velocity.y += tuning.dive_accel * dt;
        }

        if controls.jump {
            if self.grounded {
                self.velocity.y = -tuning.jump_force;
                step.jumped = true;
            } else if self.ledger.air() > 0.0 {
                self.velocity.y = (self.velocity.y - tuning.fly_accel * dt).max(-tuning.fly_force);
                self.ledger.consume_air(tuning.fly_air_cost * dt);
                step.flying = true;
            }
        }

        self.position += self.velocity * dt;

        self.grounded = false;
        self.standing_on = None;
        if self.velocity.y >= 0.0 {
            if let Some(island) = self.find_landing(islands, tuning, world_size.x) {
                self.position.y = island.position.y - self.size.y + tuning.stand_overlap;
                self.position.x += island.velocity.x * dt;
                self.velocity.y = 0.0;
                self.grounded = true;
                self.standing_on = Some(island.entity);
                self.visited_islands.insert(island.entity);
                step.landed = !was_grounded;
            }
        }

        self.position.y = VerticalWrap::for_player(world_size.y).apply(self.position.y);
        self.position.x = wrap_x(self.position.x, world_size.x);

        step.moving = self.velocity.x.abs() > tuning.moving_epsilon
            || self.velocity.y.abs() > tuning.moving_epsilon;
        step
    }

    fn find_landing<'a>(
        &self,
        islands: &'a [IslandSurface],
        tuning: &PlayerTuning,
        world_width: f32,
    ) -> Option<&'a IslandSurface> {
        let feet = self.feet();
        islands.iter().find(|island| {
            // Player's left edge relative to the island's left edge.
            let rel_x = wrap_delta(island.position.x, self.position.x, world_width);
            let overlaps = rel_x + self.size.x > tuning.side_margin
                && rel_x < island.size.x - tuning.side_margin;
            let top = island.position.y;
            overlaps && feet >= top - tuning.land_band_above && feet <= top + tuning.land_band_below
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: Vec2 = Vec2::new(4000.0, 2000.0);

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(
            Team::Green,
            Vec2::new(x, y),
            &PlayerTuning::default(),
            &ResourceConfig::default(),
        )
    }

    fn island(x: f32, y: f32) -> IslandSurface {
        IslandSurface {
            entity: Entity::from_raw(7),
            position: Vec2::new(x, y),
            size: Vec2::new(200.0, 50.0),
            velocity: Vec2::ZERO,
            team: Team::Green,
            fireplace: false,
        }
    }

    #[test]
    fn wraps_right_edge_into_world() {
        let tuning = PlayerTuning::default();
        let mut p = player_at(4001.0, 500.0);
        p.update(Controls::default(), 0.0, &tuning, &[], WORLD);
        assert!((0.0..4000.0).contains(&p.position.x));
        assert!((p.position.x - 1.0).abs() < 1e-3);
    }

    #[test]
    fn wraps_left_edge_to_far_side() {
        let tuning = PlayerTuning::default();
        let mut p = player_at(-1.0, 500.0);
        p.update(Controls::default(), 0.0, &tuning, &[], WORLD);
        assert!((p.position.x - 3999.0).abs() < 1e-3);
    }

    #[test]
    fn vertical_wrap_thresholds() {
        let tuning = PlayerTuning::default();
        let mut p = player_at(100.0, WORLD.y + 150.0);
        p.update(Controls::default(), 0.0, &tuning, &[], WORLD);
        assert!(p.position.y < 0.0);

        let mut p = player_at(100.0, -250.0);
        p.update(Controls::default(), 0.0, &tuning, &[], WORLD);
        assert_eq!(p.position.y, WORLD.y);
    }

    #[test]
    fn falling_player_snaps_onto_island() {
        let tuning = PlayerTuning::default();
        let isl = island(100.0, 500.0);
        // Feet 5px above the island top, falling.
        let mut p = player_at(150.0, 500.0 - tuning.height - 5.0);
        p.velocity.y = 100.0;
        let step = p.update(Controls::default(), 1.0 / 60.0, &tuning, &[isl], WORLD);
        assert!(p.grounded);
        assert!(step.landed);
        assert_eq!(p.velocity.y, 0.0);
        assert_eq!(p.position.y, 500.0 - tuning.height + tuning.stand_overlap);
        assert!(p.visited_islands.contains(&isl.entity));
    }

    #[test]
    fn rising_player_passes_through_island() {
        let tuning = PlayerTuning::default();
        let isl = island(100.0, 500.0);
        let mut p = player_at(150.0, 500.0 - tuning.height);
        p.velocity.y = -300.0;
        p.update(Controls::default(), 1.0 / 60.0, &tuning, &[isl], WORLD);
        assert!(!p.grounded);
    }

    #[test]
    fn side_margin_prevents_edge_landing() {
        let tuning = PlayerTuning::default();
        let isl = island(100.0, 500.0);
        // Right edge of the player only reaches into the margin.
        let mut p = player_at(100.0 - tuning.width + tuning.side_margin - 1.0, 500.0 - tuning.height);
        p.velocity.y = 50.0;
        p.update(Controls::default(), 1.0 / 60.0, &tuning, &[isl], WORLD);
        assert!(!p.grounded);
    }

    #[test]
    fn landing_works_across_the_seam() {
        let tuning = PlayerTuning::default();
        let isl = island(3950.0, 500.0);
        let mut p = player_at(20.0, 500.0 - tuning.height);
        p.velocity.y = 50.0;
        p.update(Controls::default(), 1.0 / 60.0, &tuning, &[isl], WORLD);
        assert!(p.grounded);
    }

    #[test]
    fn grounded_jump_is_one_impulse_then_flight() {
        let tuning = PlayerTuning::default();
        let isl = island(100.0, 500.0);
        let mut p = player_at(150.0, 500.0 - tuning.height);
        p.update(Controls::default(), 1.0 / 60.0, &tuning, &[isl], WORLD);
        assert!(p.grounded);

        let jump = Controls { jump: true, ..Controls::default() };
        let step = p.update(jump, 1.0 / 60.0, &tuning, &[isl], WORLD);
        assert!(step.jumped);
        assert!(!p.grounded);
        assert_eq!(p.velocity.y, -tuning.jump_force);

        let air_before = p.ledger.air();
        let step = p.update(jump, 1.0 / 60.0, &tuning, &[isl], WORLD);
        assert!(!step.jumped);
        assert!(step.flying);
        assert!(p.ledger.air() < air_before);
    }

    #[test]
    fn flight_clamps_climb_and_needs_air() {
        let tuning = PlayerTuning::default();
        let mut p = player_at(100.0, 800.0);
        let jump = Controls { jump: true, ..Controls::default() };
        for _ in 0..30 {
            p.update(jump, 1.0 / 60.0, &tuning, &[], WORLD);
            assert!(p.velocity.y >= -tuning.fly_force - 1e-3);
        }

        p.ledger.consume_air(1_000.0);
        p.velocity.y = 0.0;
        let step = p.update(jump, 1.0 / 60.0, &tuning, &[], WORLD);
        assert!(!step.flying);
        assert!(p.velocity.y > 0.0);
    }

    #[test]
    fn flight_after_jump_is_capped_at_fly_force() {
        let tuning = PlayerTuning::default();
        assert!(tuning.jump_force > tuning.fly_force);
        let isl = island(100.0, 500.0);
        let mut p = player_at(150.0, 500.0 - tuning.height);
        p.update(Controls::default(), 1.0 / 60.0, &tuning, &[isl], WORLD);
        assert!(p.grounded);

        let jump = Controls { jump: true, ..Controls::default() };
        p.update(jump, 1.0 / 60.0, &tuning, &[isl], WORLD);
        assert_eq!(p.velocity.y, -tuning.jump_force);

        let step = p.update(jump, 1.0 / 60.0, &tuning, &[isl], WORLD);
        assert!(step.flying);
        assert!(p.velocity.y >= -tuning.fly_force);
    }

    #[test]
    fn friction_settles_to_not_moving() {
        let tuning = PlayerTuning::default();
        let isl = island(0.0, 500.0);
        let mut p = player_at(80.0, 500.0 - tuning.height);
        p.velocity.x = 200.0;
        let mut step = PlayerStep::default();
        for _ in 0..120 {
            step = p.update(Controls::default(), 1.0 / 60.0, &tuning, &[isl], WORLD);
        }
        assert!(p.grounded);
        assert!(!step.moving);
    }

    #[test]
    fn respawn_restores_hp() {
        let mut p = player_at(0.0, 0.0);
        p.hp = -5.0;
        assert!(p.is_dead());
        p.respawn(Vec2::new(500.0, 700.0));
        assert_eq!(p.hp, p.max_hp);
        assert_eq!(p.feet(), 700.0);
    }
}
