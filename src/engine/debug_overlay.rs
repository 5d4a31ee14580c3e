// egui overlay: resource meters (always on) and the F3 statistics panel.

use egui::epaint::Shadow;

use super::audio::LoopVoice;

pub struct DebugStats {
    pub fps: u32,
    pub frame_time_avg_ms: f32,
    pub frame_time_min_ms: f32,
    pub frame_time_max_ms: f32,
    pub green_units: usize,
    pub blue_units: usize,
    pub projectiles: usize,
    pub particles: usize,
    pub islands: usize,
    pub draw_quads: usize,
    pub resolution: (u32, u32),
    pub camera_position: (f32, f32),
    pub camera_zoom_pct: f32,
    pub target_zoom_pct: f32,
    pub dilation: f32,
    pub focused: bool,
    pub dragging: bool,
    /// Ambient wind loop, when its sound is present.
    pub wind: Option<LoopVoice>,
    pub trauma: f32,
    /// Lag-spike frames dropped since startup.
    pub skipped_frames: u64,
}

/// One HUD bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Meter {
    pub label: &'static str,
    /// Fill in [0, 1].
    pub fraction: f32,
    pub color: [u8; 3],
    /// Readout drawn next to the bar.
    pub readout: String,
}

const METER_WIDTH: f32 = 160.0;
const METER_HEIGHT: f32 = 12.0;

pub struct DebugOverlay {
    pub visible: bool,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl DebugOverlay {
    pub fn new(
        window: &winit::window::Window,
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let egui_ctx = egui::Context::default();

        // Style: dark, semi-transparent, small monospace white font
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = egui::Color32::from_rgba_premultiplied(0, 0, 0, 180);
        visuals.window_stroke = egui::Stroke::NONE;
        visuals.window_shadow = Shadow::NONE;
        visuals.override_text_color = Some(egui::Color32::WHITE);
        egui_ctx.set_visuals(visuals);

        let mut style = (*egui_ctx.style()).clone();
        style.override_font_id = Some(egui::FontId::monospace(12.0));
        egui_ctx.set_style(style);

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            device,
            surface_format,
            None,  // no depth
            1,     // msaa samples
            false, // no dithering
        );

        Self {
            visible: false,
            egui_ctx,
            egui_state,
            egui_renderer,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn handle_window_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> egui_winit::EventResponse {
        self.egui_state.on_window_event(window, event)
    }

    /// Render one egui frame on top of the game: meters bottom-left, and the
    /// stats panel top-left when `stats` is `Some`.
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &winit::window::Window,
        view: &wgpu::TextureView,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
        meters: &[Meter],
        stats: Option<&DebugStats>,
    ) {
        let raw_input = self.egui_state.take_egui_input(window);

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            // ── Resource meters ──────────────────────────────────────────────
            let screen = ctx.screen_rect();
            let painter = ctx.layer_painter(egui::LayerId::new(
                egui::Order::Foreground,
                egui::Id::new("meters"),
            ));
            let row = METER_HEIGHT + 8.0;
            let top = screen.bottom() - 12.0 - row * meters.len() as f32;
            for (i, meter) in meters.iter().enumerate() {
                let y = top + row * i as f32;
                let origin = egui::pos2(12.0 + 56.0, y);
                let track = egui::Rect::from_min_size(origin, egui::vec2(METER_WIDTH, METER_HEIGHT));
                painter.rect_filled(track, 2.0, egui::Color32::from_rgba_unmultiplied(0, 0, 0, 150));
                let fill = egui::Rect::from_min_size(
                    origin,
                    egui::vec2(METER_WIDTH * meter.fraction.clamp(0.0, 1.0), METER_HEIGHT),
                );
                let [r, g, b] = meter.color;
                painter.rect_filled(fill, 2.0, egui::Color32::from_rgb(r, g, b));
                painter.text(
                    egui::pos2(12.0, y + METER_HEIGHT * 0.5),
                    egui::Align2::LEFT_CENTER,
                    meter.label,
                    egui::FontId::monospace(12.0),
                    egui::Color32::WHITE,
                );
                painter.text(
                    egui::pos2(origin.x + METER_WIDTH + 6.0, y + METER_HEIGHT * 0.5),
                    egui::Align2::LEFT_CENTER,
                    &meter.readout,
                    egui::FontId::monospace(12.0),
                    egui::Color32::WHITE,
                );
            }

            // ── F3: stats panel ──────────────────────────────────────────────
            if let Some(stats) = stats {
                egui::Area::new(egui::Id::new("debug_overlay"))
                    .fixed_pos(egui::pos2(10.0, 10.0))
                    .show(ctx, |ui| {
                        egui::Frame::none()
                            .fill(egui::Color32::from_rgba_premultiplied(0, 0, 0, 180))
                            .inner_margin(egui::Margin::same(8.0))
                            .rounding(4.0)
                            .show(ui, |ui: &mut egui::Ui| {
                                ui.label(format!("FPS: {}", stats.fps));
                                ui.label(format!(
                                    "Frame: {:.2} ms (min: {:.1} | max: {:.1})",
                                    stats.frame_time_avg_ms,
                                    stats.frame_time_min_ms,
                                    stats.frame_time_max_ms
                                ));
                                ui.label(format!(
                                    "Units: {} green | {} blue",
                                    stats.green_units, stats.blue_units
                                ));
                                ui.label(format!(
                                    "Projectiles: {}  Particles: {}  Islands: {}",
                                    stats.projectiles, stats.particles, stats.islands
                                ));
                                ui.label(format!("Quads: {} (1 draw call)", stats.draw_quads));
                                ui.label(format!(
                                    "Resolution: {} x {}",
                                    stats.resolution.0, stats.resolution.1
                                ));
                                ui.label(format!(
                                    "Camera: ({:.0}, {:.0})  zoom {:.0}% -> {:.0}%",
                                    stats.camera_position.0, stats.camera_position.1,
                                    stats.camera_zoom_pct, stats.target_zoom_pct
                                ));
                                ui.label(format!(
                                    "Dilation: {:.2}  Trauma: {:.2}",
                                    stats.dilation, stats.trauma
                                ));
                                ui.label(format!(
                                    "Focus: {}  Drag: {}",
                                    if stats.focused { "on" } else { "off" },
                                    if stats.dragging { "on" } else { "off" }
                                ));
                                match stats.wind {
                                    Some(wind) => ui.label(format!(
                                        "Wind: vol {:.2}  pitch {:.2}",
                                        wind.volume, wind.pitch
                                    )),
                                    None => ui.label("Wind: silent"),
                                };
                                ui.label(format!("Skipped frames: {}", stats.skipped_frames));
                            });
                    });
            }
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, &tris, screen_descriptor);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.egui_renderer
                .render(&mut render_pass.forget_lifetime(), &tris, screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}
