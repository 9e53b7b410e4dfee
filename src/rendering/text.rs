//! Text labels for a scene and the egui overlay that rasterizes them.
//!
//! Labels go straight onto the surface after the canvas blit, so they never
//! smear into the persistent trail canvas.

use glam::Vec2;

use super::scene::{Scene, WHITE};

const LEGEND_NAME_SIZE: f32 = 9.0;
const LEGEND_RANGE_SIZE: f32 = 8.0;
const LEVEL_LABEL_SIZE: f32 = 10.0;
const PROMPT_SIZE: f32 = 18.0;

/// Which point of the text `TextLabel::position` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Horizontally centred, sitting on the position
    CenterBaseline,
    /// Ending at the position, sitting on it
    RightBaseline,
    /// Centred both ways
    Center,
}

impl Anchor {
    fn align(self) -> egui::Align2 {
        match self {
            Anchor::CenterBaseline => egui::Align2::CENTER_BOTTOM,
            Anchor::RightBaseline => egui::Align2::RIGHT_BOTTOM,
            Anchor::Center => egui::Align2::CENTER_CENTER,
        }
    }
}

/// One string to draw, in pixels
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub position: Vec2,
    pub text: String,
    pub size: f32,
    pub anchor: Anchor,
    /// RGBA, `0..=255`
    pub color: [f32; 4],
}

impl TextLabel {
    fn new(position: Vec2, text: impl Into<String>, size: f32, anchor: Anchor) -> Self {
        Self {
            position,
            text: text.into(),
            size,
            anchor,
            color: WHITE,
        }
    }
}

/// Every label the scene carries: band name and range per legend box, the
/// level caption and the start prompt
pub fn scene_labels(scene: &Scene) -> Vec<TextLabel> {
    let mut labels = Vec::with_capacity(scene.legend.len() * 2 + 2);

    for cell in &scene.legend {
        labels.push(TextLabel::new(
            cell.name_position(),
            cell.name,
            LEGEND_NAME_SIZE,
            Anchor::CenterBaseline,
        ));
        labels.push(TextLabel::new(
            cell.range_position(),
            cell.range_label.clone(),
            LEGEND_RANGE_SIZE,
            Anchor::CenterBaseline,
        ));
    }

    if let Some(level) = &scene.level {
        labels.push(TextLabel::new(
            level.label_position(),
            level.label,
            LEVEL_LABEL_SIZE,
            Anchor::RightBaseline,
        ));
    }

    if let Some(prompt) = &scene.prompt {
        labels.push(TextLabel::new(
            prompt.position,
            prompt.text,
            PROMPT_SIZE,
            Anchor::Center,
        ));
    }

    labels
}

/// Tessellated labels for one frame
pub struct PreparedText {
    primitives: Vec<egui::ClippedPrimitive>,
    screen: egui_wgpu::ScreenDescriptor,
    free: Vec<egui::TextureId>,
}

/// egui context plus renderer, used only as a glyph painter
pub struct TextOverlay {
    context: egui::Context,
    renderer: egui_wgpu::Renderer,
}

impl TextOverlay {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        Self {
            context: egui::Context::default(),
            renderer: egui_wgpu::Renderer::new(device, format, None, 1, false),
        }
    }

    /// Lay out `labels` and upload glyph atlas and vertex data. The returned
    /// command buffers must be submitted before the encoder.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        labels: &[TextLabel],
        (width, height): (u32, u32),
    ) -> (PreparedText, Vec<wgpu::CommandBuffer>) {
        // Scene coordinates are physical pixels
        let raw_input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(width as f32, height as f32),
            )),
            ..Default::default()
        };

        let output = self.context.run(raw_input, |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::new(
                egui::Order::Foreground,
                egui::Id::new("scene_labels"),
            ));
            for label in labels {
                let [r, g, b, a] = label.color.map(|c| c.clamp(0.0, 255.0) as u8);
                painter.text(
                    egui::pos2(label.position.x, label.position.y),
                    label.anchor.align(),
                    &label.text,
                    egui::FontId::proportional(label.size),
                    egui::Color32::from_rgba_unmultiplied(r, g, b, a),
                );
            }
        });

        for (id, delta) in &output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }

        let primitives = self
            .context
            .tessellate(output.shapes, output.pixels_per_point);
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: output.pixels_per_point,
        };
        let commands = self
            .renderer
            .update_buffers(device, queue, encoder, &primitives, &screen);

        (
            PreparedText {
                primitives,
                screen,
                free: output.textures_delta.free,
            },
            commands,
        )
    }

    pub fn paint(&self, pass: &mut wgpu::RenderPass<'static>, prepared: &PreparedText) {
        self.renderer
            .render(pass, &prepared.primitives, &prepared.screen);
    }

    /// Release textures egui no longer needs
    pub fn finish(&mut self, prepared: PreparedText) {
        for id in &prepared.free {
            self.renderer.free_texture(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{BandState, BAND_COUNT, FREQUENCY_BANDS};
    use crate::params::RenderConfig;
    use crate::rendering::scene::legend_boxes;
    use crate::rendering::{LevelIndicator, Prompt};

    fn scene_with_legend() -> Scene {
        let states = [BandState::default(); BAND_COUNT];
        Scene {
            width: 1400.0,
            height: 600.0,
            level: Some(LevelIndicator::new(0.3, 1400.0)),
            legend: legend_boxes(
                &FREQUENCY_BANDS,
                &states,
                1400.0,
                600.0,
                0.0,
                &RenderConfig::default(),
            ),
            ..Default::default()
        }
    }

    #[test]
    fn test_legend_labels_follow_boxes() {
        let scene = scene_with_legend();
        let labels = scene_labels(&scene);

        // Two per box plus the level caption
        assert_eq!(labels.len(), BAND_COUNT * 2 + 1);

        let bass = &labels[4];
        assert_eq!(bass.text, "Bass");
        assert_eq!(bass.position, Vec2::new(250.0, 575.0));
        assert_eq!(bass.anchor, Anchor::CenterBaseline);
        assert_eq!(bass.size, LEGEND_NAME_SIZE);

        let range = &labels[5];
        assert_eq!(range.text, "80-160Hz");
        assert_eq!(range.position, Vec2::new(250.0, 585.0));
        assert_eq!(range.size, LEGEND_RANGE_SIZE);
    }

    #[test]
    fn test_level_label_sits_left_of_disc() {
        let scene = scene_with_legend();
        let level = scene_labels(&scene).pop().unwrap();

        assert_eq!(level.text, "Audio Level");
        assert_eq!(level.position, Vec2::new(1370.0, 20.0));
        assert_eq!(level.anchor, Anchor::RightBaseline);
    }

    #[test]
    fn test_prompt_only_while_present() {
        let mut scene = Scene {
            width: 800.0,
            height: 600.0,
            prompt: Some(Prompt::centered(800.0, 600.0)),
            ..Default::default()
        };
        let labels = scene_labels(&scene);
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].position, Vec2::new(400.0, 300.0));
        assert_eq!(labels[0].anchor, Anchor::Center);
        assert_eq!(labels[0].color, WHITE);

        scene.prompt = None;
        assert!(scene_labels(&scene).is_empty());
    }

    #[test]
    fn test_hidden_legend_has_no_band_labels() {
        let mut scene = scene_with_legend();
        scene.legend.clear();

        let labels = scene_labels(&scene);
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].text, "Audio Level");
    }

    #[test]
    fn test_anchor_alignment() {
        assert_eq!(Anchor::CenterBaseline.align(), egui::Align2::CENTER_BOTTOM);
        assert_eq!(Anchor::RightBaseline.align(), egui::Align2::RIGHT_BOTTOM);
        assert_eq!(Anchor::Center.align(), egui::Align2::CENTER_CENTER);
    }
}
