// Core ECS components for the world's actors.
// Islands, villagers, warriors, projectiles and particles are composed from
// these; behaviour is chosen by which kind component an entity carries.

use bevy_ecs::prelude::*;
use glam::Vec2;

/// Top-left corner of an entity in world space (y grows downward).
#[derive(Component, Debug, Clone, Copy)]
pub struct Transform {
    pub position: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec2) -> Self {
        Self { position }
    }
}

/// Axis-aligned extent in world units.
#[derive(Component, Debug, Clone, Copy)]
pub struct Size {
    pub w: f32,
    pub h: f32,
}

impl Size {
    pub fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }
}

/// Velocity in world units per second.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Velocity {
    pub linear: Vec2,
}

impl Velocity {
    pub fn new(linear: Vec2) -> Self {
        Self { linear }
    }
}

/// Tribe allegiance.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    Green,
    Blue,
    Neutral,
}

impl Team {
    /// The team a tribe fights. Neutral has no enemy.
    pub fn opponent(self) -> Option<Team> {
        match self {
            Team::Green => Some(Team::Blue),
            Team::Blue => Some(Team::Green),
            Team::Neutral => None,
        }
    }

    pub fn is_hostile_to(self, other: Team) -> bool {
        self.opponent() == Some(other)
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Health {
    pub hp: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { hp: max, max }
    }

    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 { (self.hp / self.max).clamp(0.0, 1.0) } else { 0.0 }
    }
}

/// Remaining and total lifetime in seconds.
#[derive(Component, Debug, Clone, Copy)]
pub struct Lifetime {
    pub remaining: f32,
    pub total: f32,
}

impl Lifetime {
    pub fn new(total: f32) -> Self {
        Self { remaining: total, total }
    }

    /// Fraction of life left in [0, 1].
    pub fn fraction(&self) -> f32 {
        if self.total > 0.0 {
            (self.remaining / self.total).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Marks an entity for removal at the end of the frame.
/// Tagged entities are never updated or drawn again.
#[derive(Component, Debug, Clone, Copy)]
pub struct Dead;

/// A walking tribesperson. Warriors carry this too, plus `Warrior`.
#[derive(Component, Debug, Clone, Copy)]
pub struct Villager {
    /// Seconds until the random walk re-rolls its horizontal velocity.
    pub state_timer: f32,
    pub grounded: bool,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Warrior {
    /// Seconds until the next shot is allowed.
    pub cooldown: f32,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Projectile;

/// Cosmetic spark. Alpha follows the remaining lifetime.
#[derive(Component, Debug, Clone, Copy)]
pub struct Particle {
    pub color: [f32; 3],
}

/// A floating island. Velocity is drift left over from dragging.
#[derive(Component, Debug, Clone, Copy)]
pub struct Island {
    pub friction: f32,
    pub teepee: bool,
    pub tree: bool,
    pub fireplace: bool,
}
