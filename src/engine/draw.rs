// Screen-space draw list.
// The game fills this in back-to-front order each frame; the renderer
// uploads it as one instance buffer. No GPU types here so it is testable.

use super::camera::ScreenRect;

/// One rectangle in canvas pixels. Colour is a vertical gradient from
/// `color_top` to `color_bottom` (equal for flat fills).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadInstance {
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub color_top: [f32; 4],
    pub color_bottom: [f32; 4],
}

impl QuadInstance {
    pub fn flat(rect: ScreenRect, color: [f32; 4]) -> Self {
        Self {
            position: [rect.x, rect.y],
            size: [rect.w, rect.h],
            color_top: color,
            color_bottom: color,
        }
    }

    pub fn gradient(rect: ScreenRect, top: [f32; 4], bottom: [f32; 4]) -> Self {
        Self {
            position: [rect.x, rect.y],
            size: [rect.w, rect.h],
            color_top: top,
            color_bottom: bottom,
        }
    }
}

/// Draw layers in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Sky,
    Parallax,
    Islands,
    Villagers,
    Projectiles,
    Particles,
    Player,
    Rival,
}

#[derive(Debug, Default)]
pub struct DrawList {
    quads: Vec<QuadInstance>,
    /// Layer of each quad, parallel to `quads`.
    layers: Vec<Layer>,
    /// Rotation applied around the viewport centre (camera shake).
    pub rotation: f32,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.quads.clear();
        self.layers.clear();
        self.rotation = 0.0;
    }

    pub fn push(&mut self, layer: Layer, quad: QuadInstance) {
        self.quads.push(quad);
        self.layers.push(layer);
    }

    pub fn quads(&self) -> &[QuadInstance] {
        &self.quads
    }

    #[cfg(test)]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// True when layers never go backwards, i.e. paint order is respected.
    pub fn is_ordered(&self) -> bool {
        self.layers.windows(2).all(|w| w[0] <= w[1])
    }
}
