// Parallax backdrop and procedural sky.
//
// Layers scroll at a fraction of the camera plus a constant wind drift and
// are tiled horizontally with one spare tile on each side. The sky is a
// vertical two-colour gradient that blends day and night palettes.

use glam::Vec2;

#[derive(Debug, Clone, Copy)]
pub struct ParallaxLayer {
    /// 0 = fixed to the screen, 1 = moves with the world.
    pub scroll_factor: f32,
    /// Auto-scroll in world units per second.
    pub wind_speed: f32,
    pub tile_width: f32,
    pub tile_height: f32,
    /// Layer top in world space before parallax.
    pub y: f32,
    pub color: [f32; 4],
}

/// One tile of a layer in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerTile {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl ParallaxLayer {
    /// Screen-space tiles covering `viewport_width` plus a tile of margin
    /// on each side.
    pub fn tiles(&self, camera_pos: Vec2, zoom: f32, time: f32, viewport_width: f32) -> Vec<LayerTile> {
        let tile_w = self.tile_width * zoom;
        if tile_w <= 0.0 {
            return Vec::new();
        }
        let scroll = camera_pos.x * self.scroll_factor + time * self.wind_speed;
        let offset = scroll.rem_euclid(self.tile_width) * zoom;
        let y = (self.y - camera_pos.y * self.scroll_factor) * zoom;
        let h = self.tile_height * zoom;

        let mut tiles = Vec::new();
        let mut x = -offset - tile_w;
        while x < viewport_width + tile_w {
            tiles.push(LayerTile { x, y, w: tile_w, h });
            x += tile_w;
        }
        tiles
    }
}

/// Default backdrop: far mountains, mid clouds, near clouds.
pub fn default_layers() -> Vec<ParallaxLayer> {
    vec![
        ParallaxLayer {
            scroll_factor: 0.1,
            wind_speed: 0.0,
            tile_width: 900.0,
            tile_height: 260.0,
            y: 1400.0,
            color: [0.35, 0.40, 0.55, 1.0],
        },
        ParallaxLayer {
            scroll_factor: 0.3,
            wind_speed: 12.0,
            tile_width: 600.0,
            tile_height: 90.0,
            y: 500.0,
            color: [1.0, 1.0, 1.0, 0.35],
        },
        ParallaxLayer {
            scroll_factor: 0.6,
            wind_speed: 30.0,
            tile_width: 420.0,
            tile_height: 60.0,
            y: 900.0,
            color: [1.0, 1.0, 1.0, 0.5],
        },
    ]
}

// ============================================================================
// SKY
// ============================================================================

const DAY_TOP: [f32; 3] = [0.36, 0.62, 0.92];
const DAY_BOTTOM: [f32; 3] = [0.78, 0.90, 0.98];
const NIGHT_TOP: [f32; 3] = [0.03, 0.04, 0.12];
const NIGHT_BOTTOM: [f32; 3] = [0.15, 0.12, 0.30];

/// Daylight amount for a day phase in [0, 1): 0 at midnight (phase 0),
/// 1 at noon (phase 0.5).
pub fn daylight(day_phase: f32) -> f32 {
    let p = day_phase.rem_euclid(1.0);
    0.5 - 0.5 * (p * std::f32::consts::TAU).cos()
}

fn lerp3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 4] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        1.0,
    ]
}

/// Top and bottom colours of the sky gradient.
pub fn sky_gradient(day_phase: f32) -> ([f32; 4], [f32; 4]) {
    let t = daylight(day_phase);
    (lerp3(NIGHT_TOP, DAY_TOP, t), lerp3(NIGHT_BOTTOM, DAY_BOTTOM, t))
}
