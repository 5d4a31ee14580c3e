// Engine module - reusable 2D pieces (camera, input, draw list, GPU, audio)
// Gameplay rules live in crate::game.

pub mod audio;
pub mod camera;
pub mod components;
pub mod debug_overlay;
pub mod draw;
pub mod events;
pub mod input;
pub mod parallax;
pub mod renderer;
pub mod systems;
