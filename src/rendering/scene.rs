//! Backend-agnostic description of one frame.
//!
//! Colors are RGBA with every channel in `0..=255`, the units the fade and
//! flicker rules are written in; the tessellator normalizes them.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use crate::audio::{BandState, FrequencyBand};
use crate::math::map_range;
use crate::params::{ParticleParams, RenderConfig};
use crate::particles::Particle;

pub const WHITE: [f32; 4] = [255.0, 255.0, 255.0, 255.0];
pub const LEGEND_BACKGROUND: [f32; 4] = [40.0, 40.0, 40.0, 255.0];
pub const BAR_ACTIVE: [f32; 4] = [100.0, 255.0, 100.0, 255.0];
pub const BAR_IDLE: [f32; 4] = [255.0, 255.0, 0.0, 255.0];
pub const THRESHOLD_MARKER: [f32; 4] = [255.0, 0.0, 0.0, 255.0];
/// Stars and the level indicator
pub const DIM_WHITE: [f32; 4] = [255.0, 255.0, 255.0, 100.0];

/// Inner padding of a legend box (pixels)
const LEGEND_PADDING: f32 = 5.0;
const SWATCH_HEIGHT: f32 = 10.0;
const BAR_HEIGHT: f32 = 5.0;
const NAME_BASELINE: f32 = 25.0;
const RANGE_BASELINE: f32 = 35.0;

const PROMPT_TEXT: &str = "Click anywhere to start audio input";

/// Trail segment drawn for one particle this frame
#[derive(Debug, Clone, PartialEq)]
pub struct TrailStroke {
    pub from: Vec2,
    pub to: Vec2,
    pub stroke: [f32; 4],
    /// Base color with each channel flickered by a fresh random factor
    pub fill: [f32; 4],
    pub weight: f32,
}

impl TrailStroke {
    /// Stroke for a particle's current state; alpha and weight shrink with
    /// remaining lifespan
    pub fn for_particle<R: Rng>(particle: &Particle, params: &ParticleParams, rng: &mut R) -> Self {
        let life = particle.lifespan as f32 / params.max_lifespan as f32;
        let alpha = particle.darkness * 255.0 * life;
        let [r, g, b] = particle.color.map(f32::from);

        Self {
            from: particle.prev_position,
            to: particle.position,
            stroke: [r, g, b, alpha],
            fill: [
                rng.gen_range(0.0..=1.0) * r,
                rng.gen_range(0.0..=1.0) * g,
                rng.gen_range(0.0..=1.0) * b,
                alpha,
            ],
            weight: params.max_stroke_weight * life,
        }
    }
}

/// Top-right disc whose size follows the overall audio level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelIndicator {
    pub center: Vec2,
    pub diameter: f32,
    pub label: &'static str,
}

impl LevelIndicator {
    pub fn new(level: f32, width: f32) -> Self {
        Self {
            center: Vec2::new(width - 20.0, 20.0),
            diameter: map_range(level, 0.0, 1.0, 5.0, 20.0),
            label: "Audio Level",
        }
    }

    /// Baseline anchor of the right-aligned label, left of the disc
    pub fn label_position(&self) -> Vec2 {
        self.center - Vec2::new(10.0, 0.0)
    }
}

/// One band's cell in the frequency legend
#[derive(Debug, Clone, PartialEq)]
pub struct LegendBox {
    /// Top-left corner (pixels)
    pub origin: Vec2,
    pub size: Vec2,
    pub name: &'static str,
    pub range_label: String,
    pub swatch: [f32; 4],
    /// Relative-energy bar width, capped to the box's inner width
    pub bar_width: f32,
    pub bar_color: [f32; 4],
    /// Absolute x of the threshold marker
    pub threshold_x: f32,
    /// Dominant band this frame; drawn with a white border
    pub active: bool,
}

impl LegendBox {
    /// Inner rectangle that holds the swatch, bar and marker
    pub fn inner_width(&self) -> f32 {
        self.size.x - 2.0 * LEGEND_PADDING
    }

    pub fn swatch_rect(&self) -> (Vec2, Vec2) {
        (
            self.origin + Vec2::splat(LEGEND_PADDING),
            Vec2::new(self.inner_width(), SWATCH_HEIGHT),
        )
    }

    pub fn bar_rect(&self) -> (Vec2, Vec2) {
        (
            self.origin + Vec2::new(LEGEND_PADDING, LEGEND_PADDING + SWATCH_HEIGHT),
            Vec2::new(self.bar_width, BAR_HEIGHT),
        )
    }

    /// Vertical extent of the threshold marker: (top, bottom)
    pub fn marker_span(&self) -> (f32, f32) {
        let top = self.origin.y + LEGEND_PADDING + SWATCH_HEIGHT;
        (top, top + BAR_HEIGHT)
    }

    /// Baseline centre of the band name
    pub fn name_position(&self) -> Vec2 {
        self.origin + Vec2::new(self.size.x / 2.0, NAME_BASELINE)
    }

    /// Baseline centre of the Hz range label
    pub fn range_position(&self) -> Vec2 {
        self.origin + Vec2::new(self.size.x / 2.0, RANGE_BASELINE)
    }
}

/// Lay out one legend box per band along the bottom edge
pub fn legend_boxes(
    bands: &[FrequencyBand],
    states: &[BandState],
    width: f32,
    height: f32,
    rotation: f32,
    config: &RenderConfig,
) -> Vec<LegendBox> {
    let box_width = width / bands.len().max(1) as f32;
    let legend_y = height - config.legend_height - config.legend_margin;
    let inner = (box_width - 2.0 * LEGEND_PADDING).max(0.0);

    bands
        .iter()
        .zip(states)
        .enumerate()
        .map(|(i, (band, state))| {
            let x = i as f32 * box_width + rotation % TAU;
            let [r, g, b] = band.color.map(f32::from);
            LegendBox {
                origin: Vec2::new(x, legend_y),
                size: Vec2::new(box_width, config.legend_height),
                name: band.name,
                range_label: band.range_label(),
                swatch: [r, g, b, 255.0],
                bar_width: (inner * state.relative_energy).clamp(0.0, inner),
                bar_color: if state.is_active { BAR_ACTIVE } else { BAR_IDLE },
                threshold_x: x + LEGEND_PADDING + inner * band.threshold,
                active: state.is_active,
            }
        })
        .collect()
}

/// Centred call to action shown until audio is requested
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub position: Vec2,
    pub text: &'static str,
}

impl Prompt {
    pub fn centered(width: f32, height: f32) -> Self {
        Self {
            position: Vec2::new(width / 2.0, height / 2.0),
            text: PROMPT_TEXT,
        }
    }
}

/// Random star positions covering the canvas
pub fn scatter_stars<R: Rng>(count: usize, width: f32, height: f32, rng: &mut R) -> Vec<Vec2> {
    (0..count)
        .map(|_| {
            Vec2::new(
                rng.gen_range(0.0..=width.max(0.0)),
                rng.gen_range(0.0..=height.max(0.0)),
            )
        })
        .collect()
}

/// Everything drawn in one frame, back to front
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    /// Alpha (0-255) of the black overlay that fades the previous frame
    pub fade_alpha: f32,
    /// Discard the previous frame entirely (after a resize)
    pub clear: bool,
    pub stars: Vec<Vec2>,
    pub trails: Vec<TrailStroke>,
    pub level: Option<LevelIndicator>,
    pub legend: Vec<LegendBox>,
    pub prompt: Option<Prompt>,
    /// Dominant band this frame, whether or not the legend is shown
    pub active_band: Option<&'static FrequencyBand>,
}

impl Scene {
    /// Short status line for the window title: the prompt while idle,
    /// otherwise the dominant band
    pub fn caption(&self) -> Option<String> {
        if let Some(prompt) = &self.prompt {
            return Some(prompt.text.to_string());
        }
        self.active_band
            .map(|band| format!("{} ({})", band.name, band.range_label()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{BAND_COUNT, FREQUENCY_BANDS};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_stroke_fades_with_lifespan() {
        let params = ParticleParams::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut particle = Particle::new(Vec2::new(5.0, 5.0), [200, 100, 50], 2.0, 500, 0.8);
        particle.prev_position = Vec2::new(4.0, 4.0);

        let stroke = TrailStroke::for_particle(&particle, &params, &mut rng);

        assert_eq!(stroke.from, Vec2::new(4.0, 4.0));
        assert_eq!(stroke.to, Vec2::new(5.0, 5.0));
        assert!((stroke.stroke[3] - 0.8 * 255.0 * 0.5).abs() < 1e-4);
        assert!((stroke.weight - 5.0).abs() < 1e-6);
        assert_eq!(&stroke.stroke[..3], &[200.0, 100.0, 50.0]);
    }

    #[test]
    fn test_fill_flicker_stays_under_base_color() {
        let params = ParticleParams::default();
        let mut rng = StdRng::seed_from_u64(11);
        let particle = Particle::new(Vec2::ZERO, [200, 100, 50], 2.0, 1000, 1.0);

        for _ in 0..100 {
            let stroke = TrailStroke::for_particle(&particle, &params, &mut rng);
            assert!((0.0..=200.0).contains(&stroke.fill[0]));
            assert!((0.0..=100.0).contains(&stroke.fill[1]));
            assert!((0.0..=50.0).contains(&stroke.fill[2]));
            assert_eq!(stroke.fill[3], stroke.stroke[3]);
        }
    }

    #[test]
    fn test_dead_particle_stroke_is_invisible() {
        let params = ParticleParams::default();
        let mut rng = StdRng::seed_from_u64(0);
        let particle = Particle::new(Vec2::ZERO, [255, 255, 255], 2.0, 0, 1.0);

        let stroke = TrailStroke::for_particle(&particle, &params, &mut rng);
        assert_eq!(stroke.stroke[3], 0.0);
        assert_eq!(stroke.weight, 0.0);
    }

    #[test]
    fn test_level_indicator_size() {
        assert_eq!(LevelIndicator::new(0.0, 800.0).diameter, 5.0);
        assert_eq!(LevelIndicator::new(1.0, 800.0).diameter, 20.0);
        assert_eq!(LevelIndicator::new(0.5, 800.0).center, Vec2::new(780.0, 20.0));
    }

    #[test]
    fn test_legend_layout_and_active_band() {
        let config = RenderConfig::default();
        let mut states = [BandState::default(); BAND_COUNT];
        states[3] = BandState {
            current_energy: 0.6,
            relative_energy: 2.0,
            is_active: true,
        };
        states[5] = BandState {
            current_energy: 0.14,
            relative_energy: 0.5,
            is_active: false,
        };
        let width = BAND_COUNT as f32 * 100.0;

        let boxes = legend_boxes(&FREQUENCY_BANDS, &states, width, 600.0, 0.0, &config);

        assert_eq!(boxes.len(), BAND_COUNT);
        assert_eq!(boxes[2].origin, Vec2::new(200.0, 550.0));
        assert_eq!(boxes[2].size, Vec2::new(100.0, 40.0));

        // Over-threshold bar is capped to the inner width
        assert_eq!(boxes[3].bar_width, 90.0);
        assert_eq!(boxes[3].bar_color, BAR_ACTIVE);
        assert!(boxes[3].active);

        assert!((boxes[5].bar_width - 45.0).abs() < 1e-4);
        assert_eq!(boxes[5].bar_color, BAR_IDLE);
        assert!(!boxes[5].active);

        assert_eq!(boxes.iter().filter(|b| b.active).count(), 1);

        // Sub Bass threshold 0.2 -> 5 + 90 * 0.2
        assert!((boxes[0].threshold_x - 23.0).abs() < 1e-4);
    }

    #[test]
    fn test_caption_prefers_prompt_then_active_band() {
        let mut scene = Scene {
            prompt: Some(Prompt::centered(800.0, 600.0)),
            active_band: Some(&FREQUENCY_BANDS[2]),
            ..Default::default()
        };
        assert_eq!(scene.caption().as_deref(), Some(PROMPT_TEXT));

        scene.prompt = None;
        assert_eq!(scene.caption().as_deref(), Some("Bass (80-160Hz)"));

        scene.active_band = None;
        assert_eq!(scene.caption(), None);
    }

    #[test]
    fn test_caption_does_not_depend_on_legend() {
        let scene = Scene {
            active_band: Some(&FREQUENCY_BANDS[13]),
            legend: Vec::new(),
            ..Default::default()
        };
        assert_eq!(scene.caption().as_deref(), Some("Air (12000-20000Hz)"));
    }

    #[test]
    fn test_label_positions() {
        let level = LevelIndicator::new(0.5, 800.0);
        assert_eq!(level.label_position(), Vec2::new(770.0, 20.0));

        let config = RenderConfig::default();
        let states = [BandState::default(); BAND_COUNT];
        let boxes = legend_boxes(&FREQUENCY_BANDS, &states, 1400.0, 600.0, 0.0, &config);
        assert_eq!(boxes[1].name_position(), Vec2::new(150.0, 575.0));
        assert_eq!(boxes[1].range_position(), Vec2::new(150.0, 585.0));
    }

    #[test]
    fn test_stars_land_on_canvas() {
        let mut rng = StdRng::seed_from_u64(5);
        let stars = scatter_stars(100, 320.0, 240.0, &mut rng);

        assert_eq!(stars.len(), 100);
        assert!(stars
            .iter()
            .all(|s| (0.0..=320.0).contains(&s.x) && (0.0..=240.0).contains(&s.y)));
    }
}
