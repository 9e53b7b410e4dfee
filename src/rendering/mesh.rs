//! Scene tessellation into a pixel-space triangle list.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use std::f32::consts::TAU;

use super::scene::{
    LegendBox, Scene, TrailStroke, DIM_WHITE, LEGEND_BACKGROUND, THRESHOLD_MARKER, WHITE,
};

/// Segments used to approximate circles and line caps
pub const CIRCLE_SEGMENTS: usize = 12;

const BORDER_WIDTH: f32 = 2.0;
const STAR_RADIUS: f32 = 1.0;

/// Vertex in window pixels (origin top-left) with a normalized RGBA color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Flatten a scene into triangles, back to front
pub fn tessellate(scene: &Scene) -> Vec<Vertex> {
    let mut mesh = Mesh::default();

    let fade = if scene.clear { 255.0 } else { scene.fade_alpha };
    mesh.rect(
        Vec2::ZERO,
        Vec2::new(scene.width, scene.height),
        [0.0, 0.0, 0.0, fade],
    );

    for &star in &scene.stars {
        mesh.circle(star, STAR_RADIUS, DIM_WHITE);
    }

    for trail in &scene.trails {
        mesh.trail(trail);
    }

    if let Some(level) = &scene.level {
        mesh.circle(level.center, level.diameter / 2.0, DIM_WHITE);
    }

    for legend_box in &scene.legend {
        mesh.legend_box(legend_box);
    }

    mesh.vertices
}

#[derive(Default)]
struct Mesh {
    vertices: Vec<Vertex>,
}

impl Mesh {
    fn triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
        let color = normalize(color);
        self.vertices.extend([a, b, c].map(|p| Vertex {
            position: p.to_array(),
            color,
        }));
    }

    fn quad(&mut self, corners: [Vec2; 4], color: [f32; 4]) {
        let [a, b, c, d] = corners;
        self.triangle(a, b, c, color);
        self.triangle(a, c, d, color);
    }

    fn rect(&mut self, origin: Vec2, size: Vec2, color: [f32; 4]) {
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        self.quad(
            [
                origin,
                origin + Vec2::new(size.x, 0.0),
                origin + size,
                origin + Vec2::new(0.0, size.y),
            ],
            color,
        );
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]) {
        if radius <= 0.0 {
            return;
        }
        let step = TAU / CIRCLE_SEGMENTS as f32;
        for i in 0..CIRCLE_SEGMENTS {
            let a = center + Vec2::from_angle(i as f32 * step) * radius;
            let b = center + Vec2::from_angle((i + 1) as f32 * step) * radius;
            self.triangle(center, a, b, color);
        }
    }

    /// Thick segment with a round cap at the head; a zero-length segment
    /// leaves just the cap
    fn trail(&mut self, trail: &TrailStroke) {
        if trail.weight <= 0.0 || trail.stroke[3] <= 0.0 {
            return;
        }
        let half = trail.weight / 2.0;
        let dir = trail.to - trail.from;
        if let Some(dir) = dir.try_normalize() {
            let normal = dir.perp() * half;
            self.quad(
                [
                    trail.from + normal,
                    trail.to + normal,
                    trail.to - normal,
                    trail.from - normal,
                ],
                trail.stroke,
            );
        }
        self.circle(trail.to, half, trail.stroke);
        self.circle(trail.to, half / 2.0, trail.fill);
    }

    fn legend_box(&mut self, legend_box: &LegendBox) {
        self.rect(legend_box.origin, legend_box.size, LEGEND_BACKGROUND);
        if legend_box.active {
            self.outline(legend_box.origin, legend_box.size, BORDER_WIDTH, WHITE);
        }

        let (origin, size) = legend_box.swatch_rect();
        self.rect(origin, size, legend_box.swatch);

        let (origin, size) = legend_box.bar_rect();
        self.rect(origin, size, legend_box.bar_color);

        let (top, bottom) = legend_box.marker_span();
        self.rect(
            Vec2::new(legend_box.threshold_x - 0.5, top),
            Vec2::new(1.0, bottom - top),
            THRESHOLD_MARKER,
        );
    }

    fn outline(&mut self, origin: Vec2, size: Vec2, width: f32, color: [f32; 4]) {
        let inner_height = size.y - 2.0 * width;
        self.rect(origin, Vec2::new(size.x, width), color);
        self.rect(
            origin + Vec2::new(0.0, size.y - width),
            Vec2::new(size.x, width),
            color,
        );
        self.rect(
            origin + Vec2::new(0.0, width),
            Vec2::new(width, inner_height),
            color,
        );
        self.rect(
            origin + Vec2::new(size.x - width, width),
            Vec2::new(width, inner_height),
            color,
        );
    }
}

fn normalize(color: [f32; 4]) -> [f32; 4] {
    color.map(|c| (c / 255.0).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::scene::{LevelIndicator, BAR_IDLE};

    const QUAD: usize = 6;
    const CIRCLE: usize = 3 * CIRCLE_SEGMENTS;

    fn empty_scene() -> Scene {
        Scene {
            width: 800.0,
            height: 600.0,
            fade_alpha: 200.0,
            ..Default::default()
        }
    }

    fn stroke(from: Vec2, to: Vec2, alpha: f32, weight: f32) -> TrailStroke {
        TrailStroke {
            from,
            to,
            stroke: [255.0, 0.0, 0.0, alpha],
            fill: [128.0, 0.0, 0.0, alpha],
            weight,
        }
    }

    #[test]
    fn test_background_fade_quad() {
        let vertices = tessellate(&empty_scene());

        assert_eq!(vertices.len(), QUAD);
        for v in &vertices {
            assert_eq!(&v.color[..3], &[0.0, 0.0, 0.0]);
            assert!((v.color[3] - 200.0 / 255.0).abs() < 1e-6);
        }
        assert!(vertices.iter().any(|v| v.position == [800.0, 600.0]));
    }

    #[test]
    fn test_clear_scene_is_opaque() {
        let scene = Scene {
            clear: true,
            ..empty_scene()
        };
        let vertices = tessellate(&scene);
        assert!(vertices.iter().all(|v| v.color[3] == 1.0));
    }

    #[test]
    fn test_trail_segment_and_caps() {
        let mut scene = empty_scene();
        scene
            .trails
            .push(stroke(Vec2::new(10.0, 10.0), Vec2::new(20.0, 10.0), 255.0, 4.0));

        let vertices = tessellate(&scene);
        assert_eq!(vertices.len(), QUAD + QUAD + 2 * CIRCLE);

        // Segment edges sit half the weight either side of the line
        let body = &vertices[QUAD..2 * QUAD];
        let ys: Vec<f32> = body.iter().map(|v| v.position[1]).collect();
        assert!(ys.iter().all(|&y| (y - 8.0).abs() < 1e-4 || (y - 12.0).abs() < 1e-4));
    }

    #[test]
    fn test_wrapped_trail_draws_only_a_dot() {
        let mut scene = empty_scene();
        let at = Vec2::new(0.0, 300.0);
        scene.trails.push(stroke(at, at, 255.0, 4.0));

        assert_eq!(tessellate(&scene).len(), QUAD + 2 * CIRCLE);
    }

    #[test]
    fn test_invisible_trails_are_skipped() {
        let mut scene = empty_scene();
        scene
            .trails
            .push(stroke(Vec2::ZERO, Vec2::new(5.0, 5.0), 0.0, 4.0));
        scene
            .trails
            .push(stroke(Vec2::ZERO, Vec2::new(5.0, 5.0), 100.0, 0.0));

        assert_eq!(tessellate(&scene).len(), QUAD);
    }

    #[test]
    fn test_legend_box_parts() {
        let idle = LegendBox {
            origin: Vec2::new(0.0, 550.0),
            size: Vec2::new(100.0, 40.0),
            name: "Bass",
            range_label: "80-160Hz".into(),
            swatch: [255.0, 0.0, 0.0, 255.0],
            bar_width: 45.0,
            bar_color: BAR_IDLE,
            threshold_x: 23.0,
            active: false,
        };
        let active = LegendBox {
            active: true,
            ..idle.clone()
        };

        let mut scene = empty_scene();
        scene.legend.push(idle);
        // Background, swatch, bar, marker
        assert_eq!(tessellate(&scene).len(), QUAD + 4 * QUAD);

        scene.legend[0] = active;
        // Plus four border strips
        assert_eq!(tessellate(&scene).len(), QUAD + 8 * QUAD);
    }

    #[test]
    fn test_empty_bar_is_not_drawn() {
        let mut scene = empty_scene();
        scene.legend.push(LegendBox {
            origin: Vec2::ZERO,
            size: Vec2::new(100.0, 40.0),
            name: "Air",
            range_label: "10000-20000Hz".into(),
            swatch: WHITE,
            bar_width: 0.0,
            bar_color: BAR_IDLE,
            threshold_x: 50.0,
            active: false,
        });
        assert_eq!(tessellate(&scene).len(), QUAD + 3 * QUAD);
    }

    #[test]
    fn test_level_indicator_and_stars() {
        let mut scene = empty_scene();
        scene.stars = vec![Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)];
        scene.level = Some(LevelIndicator::new(1.0, 800.0));

        let vertices = tessellate(&scene);
        assert_eq!(vertices.len(), QUAD + 3 * CIRCLE);

        // Level disc radius is half the diameter
        let disc = &vertices[QUAD + 2 * CIRCLE..];
        let center = Vec2::new(780.0, 20.0);
        let max_r = disc
            .iter()
            .map(|v| (Vec2::from(v.position) - center).length())
            .fold(0.0, f32::max);
        assert!((max_r - 10.0).abs() < 1e-3);
        assert!((disc[0].color[3] - 100.0 / 255.0).abs() < 1e-6);
    }
}
