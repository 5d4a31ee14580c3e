// Side-scrolling follow camera for a horizontally wrapping world.
//
// Camera model:
//   - `position` is the world-space top-left of the view
//   - zoom, time dilation and look-ahead are exponential trackers
//   - x wraps with the world; y is clamped to a band around the world
//   - trauma drives a screen-space shake (offset + small rotation)
//
// Every tracker is advanced with the REAL frame time, never the dilated
// simulation time, so slow motion cannot slow its own recovery.

use glam::Vec2;
use crate::game::config::CameraConfig;
use super::systems::{wrap_delta, wrap_x};

pub const MIN_DILATION: f32 = 0.05;
pub const MAX_DILATION: f32 = 1.0;

/// What the camera follows: a box and its velocity.
#[derive(Debug, Clone, Copy)]
pub struct FollowTarget {
    pub position: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
}

/// A world rect projected to screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

pub struct Camera2D {
    /// World-space top-left of the view.
    /// Private: x is renormalized into [0, world_width) every follow. Use position() to read.
    position: Vec2,

    zoom: f32,
    target_zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_rate: f32,

    /// Simulation time scale in [MIN_DILATION, MAX_DILATION].
    dilation: f32,
    target_dilation: f32,
    pub dilation_rate: f32,

    lookahead: Vec2,
    pub lookahead_scale: Vec2,
    pub lookahead_rate: Vec2,
    pub follow_rate: f32,
    pub vertical_band: f32,

    trauma: f32,
    pub max_trauma: f32,
    pub trauma_decay: f32,
    pub shake_magnitude: f32,
    pub shake_angle: f32,
    pub shake_frequency: f32,
    shake_phase: f32,
    shake_offset: Vec2,
    shake_rotation: f32,

    pub cull_margin: f32,
    pub viewport: Vec2,
    pub world_size: Vec2,
}

impl Camera2D {
    pub fn new(config: &CameraConfig, viewport: Vec2, world_size: Vec2) -> Self {
        let base_zoom = config.base_zoom.clamp(config.min_zoom, config.max_zoom);
        Self {
            position: Vec2::ZERO,
            zoom: base_zoom,
            target_zoom: base_zoom,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            zoom_rate: config.zoom_rate,
            dilation: MAX_DILATION,
            target_dilation: MAX_DILATION,
            dilation_rate: config.dilation_rate,
            lookahead: Vec2::ZERO,
            lookahead_scale: Vec2::new(config.lookahead_scale_x, config.lookahead_scale_y),
            lookahead_rate: Vec2::new(config.lookahead_rate_x, config.lookahead_rate_y),
            follow_rate: config.follow_rate,
            vertical_band: config.vertical_band,
            trauma: 0.0,
            max_trauma: config.max_trauma,
            trauma_decay: config.trauma_decay,
            shake_magnitude: config.shake_magnitude,
            shake_angle: config.shake_angle,
            shake_frequency: config.shake_frequency,
            shake_phase: 0.0,
            shake_offset: Vec2::ZERO,
            shake_rotation: 0.0,
            cull_margin: config.cull_margin,
            viewport,
            world_size,
        }
    }

    /// Jump straight to the view centred on `target` with no smoothing.
    pub fn snap_to(&mut self, target: &FollowTarget) {
        let view = self.view_size();
        let center = target.position + target.size * 0.5;
        self.position = Vec2::new(
            wrap_x(center.x - view.x * 0.5, self.world_size.x),
            self.clamp_y(center.y - view.y * 0.5),
        );
        self.lookahead = Vec2::ZERO;
    }

    /// Advance zoom, dilation and shake trackers. Call once per real frame.
    pub fn update(&mut self, real_dt: f32) {
        let zoom_step = (self.zoom_rate * real_dt).min(1.0);
        self.zoom += (self.target_zoom - self.zoom) * zoom_step;
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);

        let dilation_step = (self.dilation_rate * real_dt).min(1.0);
        self.dilation += (self.target_dilation - self.dilation) * dilation_step;
        self.dilation = self.dilation.clamp(MIN_DILATION, MAX_DILATION);

        self.trauma = (self.trauma - self.trauma_decay * real_dt).max(0.0);
        self.shake_phase += self.shake_frequency * real_dt;
        let intensity = self.trauma * self.trauma;
        self.shake_offset = Vec2::new(
            self.shake_phase.sin(),
            (self.shake_phase * 1.3).cos(),
        ) * self.shake_magnitude * intensity;
        self.shake_rotation = (self.shake_phase * 0.7).sin() * self.shake_angle * intensity;
    }

    /// Move the view toward `target`, leading in the direction of travel.
    pub fn follow(&mut self, target: &FollowTarget, real_dt: f32) {
        let desired_lookahead = Vec2::new(
            target.velocity.x * self.lookahead_scale.x,
            target.velocity.y * self.lookahead_scale.y * 0.5,
        );
        let la_step = (self.lookahead_rate * real_dt).min(Vec2::ONE);
        self.lookahead += (desired_lookahead - self.lookahead) * la_step;

        let view = self.view_size();
        let focus = target.position + target.size * 0.5 + self.lookahead - view * 0.5;
        let step = (self.follow_rate * real_dt).min(1.0);

        let dx = wrap_delta(self.position.x, focus.x, self.world_size.x);
        self.position.x += dx * step;

        let dy = self.clamp_y(focus.y) - self.position.y;
        self.position.y += dy * step;

        self.position.x = wrap_x(self.position.x, self.world_size.x);
    }

    /// Project a world rect to screen space, or `None` when it is outside
    /// the viewport by more than the cull margin.
    pub fn screen_rect(&self, world_pos: Vec2, size: Vec2) -> Option<ScreenRect> {
        let dx = wrap_delta(self.position.x, world_pos.x, self.world_size.x);
        let dy = world_pos.y - self.position.y;
        let rect = ScreenRect {
            x: dx * self.zoom + self.shake_offset.x,
            y: dy * self.zoom + self.shake_offset.y,
            w: size.x * self.zoom,
            h: size.y * self.zoom,
        };
        let m = self.cull_margin;
        let visible = rect.x + rect.w >= -m
            && rect.x <= self.viewport.x + m
            && rect.y + rect.h >= -m
            && rect.y <= self.viewport.y + m;
        visible.then_some(rect)
    }

    /// Convert a canvas-pixel point back to world space.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let local = (screen - self.shake_offset) / self.zoom;
        Vec2::new(
            wrap_x(self.position.x + local.x, self.world_size.x),
            self.position.y + local.y,
        )
    }

    pub fn add_trauma(&mut self, amount: f32) {
        self.trauma = (self.trauma + amount).clamp(0.0, self.max_trauma);
    }

    pub fn set_target_zoom(&mut self, zoom: f32) {
        self.target_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn set_target_dilation(&mut self, dilation: f32) {
        self.target_dilation = dilation.clamp(MIN_DILATION, MAX_DILATION);
    }

    /// World units covered by the viewport at the current zoom.
    pub fn view_size(&self) -> Vec2 {
        self.viewport / self.zoom
    }

    fn clamp_y(&self, y: f32) -> f32 {
        let view_h = self.view_size().y;
        let lo = -self.vertical_band;
        let hi = (self.world_size.y - view_h + self.vertical_band).max(lo);
        y.clamp(lo, hi)
    }

    pub fn position(&self) -> Vec2 { self.position }
    pub fn zoom(&self) -> f32 { self.zoom }
    pub fn target_zoom(&self) -> f32 { self.target_zoom }
    pub fn dilation(&self) -> f32 { self.dilation }
    pub fn trauma(&self) -> f32 { self.trauma }
    pub fn shake_rotation(&self) -> f32 { self.shake_rotation }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera2D {
        Camera2D::new(
            &CameraConfig::default(),
            Vec2::new(800.0, 600.0),
            Vec2::new(4000.0, 2000.0),
        )
    }

    fn target_at(x: f32, y: f32, vx: f32) -> FollowTarget {
        FollowTarget {
            position: Vec2::new(x, y),
            size: Vec2::new(32.0, 48.0),
            velocity: Vec2::new(vx, 0.0),
        }
    }

    #[test]
    fn follow_keeps_x_in_world() {
        let mut cam = camera();
        for &(x, vx) in &[(3990.0, 800.0), (5.0, -800.0), (2000.0, 0.0), (3999.0, 2000.0)] {
            for _ in 0..120 {
                cam.follow(&target_at(x, 1000.0, vx), 1.0 / 60.0);
                let cx = cam.position().x;
                assert!((0.0..4000.0).contains(&cx), "camera x {cx} escaped");
            }
        }
    }

    #[test]
    fn follow_crosses_seam_the_short_way() {
        let mut cam = camera();
        // Camera sits just right of the seam; target just left of it.
        cam.snap_to(&target_at(400.0, 1000.0, 0.0));
        let before = cam.position().x;
        cam.follow(&target_at(3950.0, 1000.0, 0.0), 1.0 / 60.0);
        let moved = wrap_delta(before, cam.position().x, 4000.0);
        assert!(moved < 0.0, "expected leftward move, got {moved}");
        assert!(moved.abs() < 100.0);
    }

    #[test]
    fn vertical_follow_clamped_to_band() {
        let mut cam = camera();
        for _ in 0..600 {
            cam.follow(&target_at(100.0, -5000.0, 0.0), 1.0 / 60.0);
        }
        assert!(cam.position().y >= -cam.vertical_band - 1e-3);
    }

    #[test]
    fn trauma_clamped_and_decays() {
        let mut cam = camera();
        cam.add_trauma(5.0);
        assert_eq!(cam.trauma(), cam.max_trauma);
        cam.update(0.1);
        assert!(cam.trauma() < cam.max_trauma);
        assert!(cam.shake_offset.length() > 0.0);
        for _ in 0..100 {
            cam.update(0.1);
        }
        assert_eq!(cam.trauma(), 0.0);
        assert_eq!(cam.shake_offset, Vec2::ZERO);
        assert_eq!(cam.shake_rotation(), 0.0);
    }

    #[test]
    fn zoom_and_dilation_stay_in_bounds() {
        let mut cam = camera();
        cam.set_target_zoom(100.0);
        cam.set_target_dilation(-3.0);
        for _ in 0..200 {
            cam.update(0.05);
            assert!(cam.zoom() >= cam.min_zoom && cam.zoom() <= cam.max_zoom);
            assert!(cam.dilation() >= MIN_DILATION && cam.dilation() <= MAX_DILATION);
        }
        assert!((cam.dilation() - MIN_DILATION).abs() < 1e-3);
        assert!((cam.zoom() - cam.max_zoom).abs() < 1e-3);
    }

    #[test]
    fn zoom_approaches_exponentially() {
        let mut cam = camera();
        cam.set_target_zoom(cam.max_zoom);
        let start = cam.zoom();
        cam.update(0.1);
        let expected = start + (cam.max_zoom - start) * 3.0 * 0.1;
        assert!((cam.zoom() - expected).abs() < 1e-5);
    }

    #[test]
    fn screen_rect_wraps_and_culls() {
        let mut cam = camera();
        cam.snap_to(&target_at(3900.0, 1000.0, 0.0));
        // Object just past the seam is on screen, to the right.
        let rect = cam.screen_rect(Vec2::new(50.0, 1000.0), Vec2::new(24.0, 24.0));
        assert!(rect.is_some());
        assert!(rect.unwrap().x > 400.0);
        // Object on the far side of the world is culled.
        assert!(cam.screen_rect(Vec2::new(2000.0, 1000.0), Vec2::new(24.0, 24.0)).is_none());
    }

    #[test]
    fn screen_to_world_inverts_projection() {
        let mut cam = camera();
        cam.snap_to(&target_at(1000.0, 800.0, 0.0));
        let world = Vec2::new(1100.0, 900.0);
        let rect = cam.screen_rect(world, Vec2::ZERO).unwrap();
        let back = cam.screen_to_world(Vec2::new(rect.x, rect.y));
        assert!((back - world).length() < 1e-2);
    }
}
