// Input state tracking for keyboard and mouse
// Abstracts winit events into a plain per-frame snapshot the game consumes.

use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keys and mouse as the game sees them for one frame.
/// Mouse coordinates are canvas-relative (logical viewport pixels).
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct InputSnapshot {
    pub w: bool,
    pub a: bool,
    pub s: bool,
    pub d: bool,
    pub space: bool,
    pub shift: bool,
    pub mouse_x: f32,
    pub mouse_y: f32,
    pub left_down: bool,
    pub right_down: bool,
}

pub struct InputState {
    keys_held: HashSet<KeyCode>,

    // Mouse, in physical window pixels
    mouse_position: (f32, f32),
    left_down: bool,
    right_down: bool,

    // Window dimensions (for canvas-relative mouse coordinates)
    pub window_size: (u32, u32),
    /// Logical canvas the game renders to.
    pub canvas_size: (f32, f32),
}

impl InputState {
    pub fn new(canvas_size: (f32, f32)) -> Self {
        Self {
            keys_held: HashSet::new(),
            mouse_position: (0.0, 0.0),
            left_down: false,
            right_down: false,
            window_size: (0, 0),
            canvas_size,
        }
    }

    /// Feed a winit WindowEvent into the input state.
    /// Call this once per event before the game's own event handling.
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => { self.keys_held.insert(key); }
                        ElementState::Released => { self.keys_held.remove(&key); }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_position = (position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let down = *state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.left_down = down,
                    MouseButton::Right => self.right_down = down,
                    _ => {}
                }
            }
            WindowEvent::Resized(size) => {
                self.window_size = (size.width, size.height);
            }
            WindowEvent::Focused(false) => {
                // Releases are lost while unfocused.
                self.keys_held.clear();
                self.left_down = false;
                self.right_down = false;
            }
            _ => {}
        }
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Mouse position mapped from window pixels to canvas pixels.
    pub fn canvas_mouse(&self) -> (f32, f32) {
        let (ww, wh) = (self.window_size.0 as f32, self.window_size.1 as f32);
        if ww <= 0.0 || wh <= 0.0 {
            return self.mouse_position;
        }
        (
            self.mouse_position.0 * self.canvas_size.0 / ww,
            self.mouse_position.1 * self.canvas_size.1 / wh,
        )
    }

    pub fn snapshot(&self) -> InputSnapshot {
        let (mouse_x, mouse_y) = self.canvas_mouse();
        InputSnapshot {
            w: self.is_key_held(KeyCode::KeyW),
            a: self.is_key_held(KeyCode::KeyA),
            s: self.is_key_held(KeyCode::KeyS),
            d: self.is_key_held(KeyCode::KeyD),
            space: self.is_key_held(KeyCode::Space),
            shift: self.is_key_held(KeyCode::ShiftLeft) || self.is_key_held(KeyCode::ShiftRight),
            mouse_x,
            mouse_y,
            left_down: self.left_down,
            right_down: self.right_down,
        }
    }
}
