//! Per-frame orchestration: field, analysis, spawning, particles and scene.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::audio::{BandState, FrequencyBand, SpectrumAnalyzer, SpectrumFrame, SpectrumSource};
use crate::error::AudioError;
use crate::field::VectorField;
use crate::params::{FieldParams, ParticleParams, RenderConfig, SpawnParams};
use crate::particles::ParticleSystem;
use crate::rendering::scene::{legend_boxes, scatter_stars};
use crate::rendering::{LevelIndicator, Prompt, Scene};
use crate::spawn::{select_dominant, SpawnPolicy};

/// Where band energies come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioMode {
    /// Nothing requested yet; no analysis or spawning
    Idle,
    /// Microphone requested, not yet delivering; synthetic energies
    Pending,
    /// Microphone spectra
    Live,
    /// Microphone unavailable; synthetic energies for the rest of the run
    Fallback,
}

impl AudioMode {
    /// Whether band analysis and spawning run in this mode
    pub fn is_analysing(self) -> bool {
        self != AudioMode::Idle
    }
}

/// Everything needed to build a [`Sketch`]
#[derive(Debug, Clone)]
pub struct SketchConfig {
    pub field: FieldParams,
    pub particles: ParticleParams,
    pub spawn: SpawnParams,
    pub render: RenderConfig,
    /// Seed for the sketch's random source (darkness, jitter, flicker, stars)
    pub seed: u64,
    /// Skip the microphone request and start in [`AudioMode::Fallback`]
    pub start_in_fallback: bool,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            field: FieldParams::default(),
            particles: ParticleParams::default(),
            spawn: SpawnParams::default(),
            render: RenderConfig::default(),
            seed: 42,
            start_in_fallback: false,
        }
    }
}

/// Summary of the most recent frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub frame: u64,
    pub live_particles: usize,
    pub spawned: usize,
    pub dominant: Option<&'static str>,
    pub level: f32,
}

/// All mutable state of the visualizer, owned by the loop driver
pub struct Sketch {
    width: f32,
    height: f32,
    field: VectorField,
    particles: ParticleSystem,
    analyzer: SpectrumAnalyzer,
    policy: SpawnPolicy,
    band_states: Vec<BandState>,
    render: RenderConfig,
    stars: Vec<Vec2>,
    rng: StdRng,

    mode: AudioMode,
    latest_spectrum: Option<SpectrumFrame>,
    audio_level: f32,
    dominant: Option<usize>,
    spawned: usize,
    frame_count: u64,
    show_legend: bool,
    /// Next scene must wipe the canvas
    needs_clear: bool,
}

impl Sketch {
    pub fn new(width: f32, height: f32, config: SketchConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let analyzer = SpectrumAnalyzer::default();
        let stars = scatter_stars(config.render.star_count, width, height, &mut rng);
        let mode = if config.start_in_fallback {
            AudioMode::Fallback
        } else {
            AudioMode::Idle
        };

        Self {
            width,
            height,
            field: VectorField::new(config.field, width, height),
            particles: ParticleSystem::new(config.particles),
            band_states: vec![BandState::default(); analyzer.bands().len()],
            analyzer,
            policy: SpawnPolicy::new(config.spawn),
            show_legend: config.render.show_legend,
            render: config.render,
            stars,
            rng,
            mode,
            latest_spectrum: None,
            audio_level: 0.0,
            dominant: None,
            spawned: 0,
            frame_count: 0,
            needs_clear: true,
        }
    }

    /// Advance the simulation one frame and describe what to draw
    pub fn frame(&mut self) -> Scene {
        self.frame_count += 1;
        self.policy.advance();
        self.field.regenerate();

        self.spawned = 0;
        self.dominant = None;
        if self.mode.is_analysing() {
            self.analyse_and_spawn();
        }

        let mut trails = Vec::with_capacity(self.particles.len());
        self.particles
            .step(&self.field, self.width, self.height, &mut self.rng, &mut trails);

        let legend = if self.show_legend {
            legend_boxes(
                self.analyzer.bands(),
                &self.band_states,
                self.width,
                self.height,
                self.policy.rotation(),
                &self.render,
            )
        } else {
            Vec::new()
        };

        Scene {
            width: self.width,
            height: self.height,
            fade_alpha: f32::from(self.render.background_fade),
            clear: std::mem::take(&mut self.needs_clear),
            stars: self.stars.clone(),
            trails,
            level: Some(LevelIndicator::new(self.audio_level, self.width)),
            legend,
            prompt: (self.mode == AudioMode::Idle)
                .then(|| Prompt::centered(self.width, self.height)),
            active_band: self.dominant_band(),
        }
    }

    fn analyse_and_spawn(&mut self) {
        let source = match (self.mode, &self.latest_spectrum) {
            (AudioMode::Live, Some(spectrum)) => SpectrumSource::Live(spectrum),
            _ => SpectrumSource::Synthetic {
                frame_count: self.frame_count,
            },
        };

        self.audio_level = self.analyzer.overall_level(source, &mut self.rng);
        self.analyzer.analyze(source, &mut self.band_states);

        let bands = self.analyzer.bands();
        self.dominant = select_dominant(bands, &mut self.band_states);
        if let Some(index) = self.dominant {
            self.spawned = self.policy.spawn(
                index,
                &bands[index],
                &self.band_states[index],
                bands.len(),
                self.width,
                self.height,
                &mut self.particles,
                &mut self.rng,
            );
        }
    }

    /// Primary pointer press. Returns true exactly once, when the caller
    /// should start acquiring the microphone.
    pub fn pointer_pressed(&mut self) -> bool {
        if self.mode == AudioMode::Idle {
            self.mode = AudioMode::Pending;
            log::info!("Audio input requested");
            true
        } else {
            false
        }
    }

    /// Secondary pointer action
    pub fn toggle_legend(&mut self) {
        self.show_legend = !self.show_legend;
    }

    /// Microphone acquisition succeeded
    pub fn audio_started(&mut self) {
        if self.mode == AudioMode::Pending {
            self.mode = AudioMode::Live;
            log::info!("Audio initialized successfully");
        }
    }

    /// Microphone acquisition or the running stream failed; synthetic
    /// energies take over for good
    pub fn audio_failed(&mut self, err: &AudioError) {
        log::error!("Audio unavailable, switching to fallback: {}", err);
        self.mode = AudioMode::Fallback;
        self.latest_spectrum = None;
    }

    /// Latest microphone spectrum; ignored unless live
    pub fn feed_spectrum(&mut self, spectrum: SpectrumFrame) {
        if self.mode == AudioMode::Live {
            self.latest_spectrum = Some(spectrum);
        }
    }

    /// New canvas size: reallocate the field, re-scatter stars and wipe the
    /// canvas. Particles keep their positions.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.field.resize(width, height);
        self.stars = scatter_stars(self.render.star_count, width, height, &mut self.rng);
        self.needs_clear = true;
    }

    pub fn stats(&self) -> FrameStats {
        FrameStats {
            frame: self.frame_count,
            live_particles: self.particles.len(),
            spawned: self.spawned,
            dominant: self.dominant_band().map(|b| b.name),
            level: self.audio_level,
        }
    }

    pub fn dominant_band(&self) -> Option<&'static FrequencyBand> {
        let bands = self.analyzer.bands();
        self.dominant.map(|i| &bands[i])
    }

    pub fn mode(&self) -> AudioMode {
        self.mode
    }

    pub fn band_states(&self) -> &[BandState] {
        &self.band_states
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn field(&self) -> &VectorField {
        &self.field
    }

    pub fn audio_level(&self) -> f32 {
        self.audio_level
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn show_legend(&self) -> bool {
        self.show_legend
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}
