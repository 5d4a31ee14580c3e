// Gameplay: tribes, islands, elements and the frame orchestrator.

pub mod combat;
pub mod config;
pub mod events;
pub mod islands;
pub mod player;
pub mod resources;
pub mod rival;
pub mod spawning;
pub mod units;
pub mod world;

pub use config::GameConfig;
pub use world::Game;
