// AI for the blue rival.
//
// The brain never touches the world: it reads snapshots and returns the
// same `Controls` the keyboard produces, plus an optional aim point. The
// orchestrator gates the shot on the rival's own fire ammo.

use bevy_ecs::entity::Entity;
use glam::Vec2;

use crate::engine::components::Team;
use crate::engine::systems::wrapped_offset;
use super::config::{CombatConfig, WorldConfig};
use super::player::{Controls, IslandSurface, Player};
use super::units::UnitSnapshot;

/// Horizontal slack before the rival steers.
const STEER_DEADZONE: f32 = 24.0;
/// Climb when the goal is this far above the rival's centre.
const CLIMB_THRESHOLD: f32 = 40.0;
/// Dive when the goal is this far below.
const DIVE_THRESHOLD: f32 = 260.0;

/// What the rival is currently after.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RivalGoal {
    /// Out of ammo: recharge at a blue fireplace.
    Refuel(Vec2),
    /// The local player is inside the aggro radius.
    Player(Vec2),
    /// Nearest green unit.
    Unit(Entity, Vec2),
    Idle,
}

impl RivalGoal {
    fn point(&self) -> Option<Vec2> {
        match *self {
            RivalGoal::Refuel(p) | RivalGoal::Player(p) | RivalGoal::Unit(_, p) => Some(p),
            RivalGoal::Idle => None,
        }
    }

    fn is_hostile(&self) -> bool {
        matches!(self, RivalGoal::Player(_) | RivalGoal::Unit(..))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RivalIntent {
    pub controls: Controls,
    /// World point to fire at this frame, if any.
    pub shoot_at: Option<Vec2>,
    pub goal: RivalGoal,
}

#[derive(Debug, Clone)]
pub struct RivalBrain {
    reaction: f32,
    reaction_timer: f32,
}

impl RivalBrain {
    pub fn new(config: &CombatConfig) -> Self {
        Self {
            reaction: config.rival_reaction,
            reaction_timer: config.rival_reaction,
        }
    }

    pub fn choose_goal(
        &self,
        me: &Player,
        enemy: &Player,
        units: &[UnitSnapshot],
        islands: &[IslandSurface],
        config: &CombatConfig,
        world_width: f32,
    ) -> RivalGoal {
        let origin = me.center();
        let distance = |p: Vec2| wrapped_offset(origin, p, world_width).length();

        if me.ledger.fire() == 0 {
            let hearth = islands
                .iter()
                .filter(|i| i.team == me.team && i.fireplace)
                .map(|i| i.top_center())
                .min_by(|a, b| distance(*a).total_cmp(&distance(*b)));
            if let Some(top) = hearth {
                return RivalGoal::Refuel(top - Vec2::new(0.0, me.size.y * 0.5));
            }
        }

        if !enemy.is_dead() && me.team.is_hostile_to(enemy.team) {
            let target = enemy.center();
            if distance(target) <= config.rival_aggro_radius {
                return RivalGoal::Player(target);
            }
        }

        units
            .iter()
            .filter(|u| me.team.is_hostile_to(u.team))
            .map(|u| (distance(u.center()), u))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, u)| RivalGoal::Unit(u.entity, u.head()))
            .unwrap_or(RivalGoal::Idle)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn think(
        &mut self,
        me: &Player,
        enemy: &Player,
        units: &[UnitSnapshot],
        islands: &[IslandSurface],
        dt: f32,
        config: &CombatConfig,
        world: &WorldConfig,
    ) -> RivalIntent {
        self.reaction_timer = (self.reaction_timer - dt).max(0.0);

        let goal = self.choose_goal(me, enemy, units, islands, config, world.width);
        let origin = me.center();
        let mut controls = Controls::default();

        if let Some(point) = goal.point() {
            let offset = wrapped_offset(origin, point, world.width);
            controls.left = offset.x < -STEER_DEADZONE;
            controls.right = offset.x > STEER_DEADZONE;
            controls.jump = offset.y < -CLIMB_THRESHOLD;
            controls.dive = offset.y > DIVE_THRESHOLD && !me.grounded;
        }

        // Never sink into the sea band while airborne.
        if !me.grounded && me.feet() > world.height - world.sea_band {
            controls.jump = true;
            controls.dive = false;
        }

        let mut shoot_at = None;
        if goal.is_hostile() && self.reaction_timer <= 0.0 {
            if let Some(point) = goal.point() {
                if wrapped_offset(origin, point, world.width).length() <= config.rival_shoot_range {
                    shoot_at = Some(point);
                    self.reaction_timer = self.reaction;
                }
            }
        }

        RivalIntent { controls, shoot_at, goal }
    }
}

/// Launch angle from `from` toward `to` on the wrapping x axis.
pub fn aim_angle(from: Vec2, to: Vec2, world_width: f32) -> f32 {
    let d = wrapped_offset(from, to, world_width);
    d.y.atan2(d.x)
}

/// Team the rival plays for.
pub const RIVAL_TEAM: Team = Team::Blue;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::{PlayerTuning, ResourceConfig};

    fn actor(team: Team, x: f32, y: f32) -> Player {
        Player::new(team, Vec2::new(x, y), &PlayerTuning::default(), &ResourceConfig::default())
    }

    fn unit(raw: u32, team: Team, x: f32, y: f32) -> UnitSnapshot {
        UnitSnapshot {
            entity: Entity::from_raw(raw),
            position: Vec2::new(x, y),
            size: Vec2::new(24.0, 24.0),
            team,
        }
    }

    fn hearth(x: f32, y: f32) -> IslandSurface {
        IslandSurface {
            entity: Entity::from_raw(50),
            position: Vec2::new(x, y),
            size: Vec2::new(200.0, 50.0),
            velocity: Vec2::ZERO,
            team: Team::Blue,
            fireplace: true,
        }
    }

    #[test]
    fn chases_player_inside_aggro_radius() {
        let config = CombatConfig::default();
        let brain = RivalBrain::new(&config);
        let me = actor(Team::Blue, 1000.0, 800.0);
        let player = actor(Team::Green, 1300.0, 800.0);
        let villager = unit(1, Team::Green, 1100.0, 800.0);
        let goal = brain.choose_goal(&me, &player, &[villager], &[], &config, 4000.0);
        assert_eq!(goal, RivalGoal::Player(player.center()));
    }

    #[test]
    fn hunts_nearest_green_unit_when_player_far() {
        let config = CombatConfig::default();
        let brain = RivalBrain::new(&config);
        let me = actor(Team::Blue, 1000.0, 800.0);
        let player = actor(Team::Green, 3000.0, 800.0);
        let near = unit(1, Team::Green, 1200.0, 800.0);
        let far = unit(2, Team::Green, 1600.0, 800.0);
        let friend = unit(3, Team::Blue, 1010.0, 800.0);
        let goal = brain.choose_goal(&me, &player, &[far, friend, near], &[], &config, 4000.0);
        assert_eq!(goal, RivalGoal::Unit(near.entity, near.head()));
    }

    #[test]
    fn refuels_at_fireplace_when_out_of_ammo() {
        let config = CombatConfig::default();
        let brain = RivalBrain::new(&config);
        let mut me = actor(Team::Blue, 1000.0, 800.0);
        while me.ledger.spend_fire() {}
        let player = actor(Team::Green, 1100.0, 800.0);
        let goal = brain.choose_goal(&me, &player, &[], &[hearth(2000.0, 700.0)], &config, 4000.0);
        assert!(matches!(goal, RivalGoal::Refuel(_)));
    }

    #[test]
    fn steers_and_climbs_toward_goal() {
        let config = CombatConfig::default();
        let world = WorldConfig::default();
        let mut brain = RivalBrain::new(&config);
        let me = actor(Team::Blue, 1000.0, 900.0);
        let player = actor(Team::Green, 1200.0, 600.0);
        let intent = brain.think(&me, &player, &[], &[], 0.016, &config, &world);
        assert!(intent.controls.right);
        assert!(!intent.controls.left);
        assert!(intent.controls.jump);
    }

    #[test]
    fn shots_wait_for_reaction_time() {
        let config = CombatConfig::default();
        let world = WorldConfig::default();
        let mut brain = RivalBrain::new(&config);
        let me = actor(Team::Blue, 1000.0, 800.0);
        let player = actor(Team::Green, 1200.0, 800.0);

        let intent = brain.think(&me, &player, &[], &[], 0.1, &config, &world);
        assert!(intent.shoot_at.is_none());

        let intent = brain.think(&me, &player, &[], &[], 0.6, &config, &world);
        assert_eq!(intent.shoot_at, Some(player.center()));

        let intent = brain.think(&me, &player, &[], &[], 0.1, &config, &world);
        assert!(intent.shoot_at.is_none());
    }

    #[test]
    fn climbs_out_of_the_sea_band() {
        let config = CombatConfig::default();
        let world = WorldConfig::default();
        let mut brain = RivalBrain::new(&config);
        let me = actor(Team::Blue, 1000.0, world.height - 100.0);
        let player = actor(Team::Green, 3500.0, world.height);
        let intent = brain.think(&me, &player, &[], &[], 0.016, &config, &world);
        assert!(intent.controls.jump);
    }

    #[test]
    fn aim_angle_wraps() {
        let angle = aim_angle(Vec2::new(3990.0, 0.0), Vec2::new(10.0, 0.0), 4000.0);
        assert!(angle.abs() < 1e-5);
    }
}
