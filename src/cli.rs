//! Command-line argument parsing.

use clap::Parser;

use spectraflow::params::{FieldParams, RenderConfig, SpawnParams};
use spectraflow::sketch::SketchConfig;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "spectraflow")]
#[command(about = "Audio-reactive flow-field particle visualizer", long_about = None)]
pub struct Args {
    /// Initial window width (pixels)
    #[arg(long, value_name = "PX", default_value_t = 1280)]
    pub width: u32,

    /// Initial window height (pixels)
    #[arg(long, value_name = "PX", default_value_t = 720)]
    pub height: u32,

    /// Seed for noise and randomness
    #[arg(long, value_name = "N", default_value_t = 42)]
    pub seed: u64,

    /// Skip the microphone and use synthetic energies
    #[arg(long)]
    pub fallback: bool,

    /// Start with the frequency legend hidden
    #[arg(long)]
    pub no_legend: bool,

    /// Rotation phase step per frame (radians)
    #[arg(
        long,
        value_name = "RAD",
        default_value_t = 0.0,
        allow_negative_numbers = true
    )]
    pub rotation_speed: f32,

    /// Cap on particles spawned per frame
    #[arg(long, value_name = "N")]
    pub max_burst: Option<usize>,

    /// Run without a window for this many frames and log statistics
    #[arg(long, value_name = "FRAMES")]
    pub headless: Option<u64>,
}

impl Args {
    /// Build the sketch configuration these arguments describe
    pub fn sketch_config(&self) -> SketchConfig {
        SketchConfig {
            field: FieldParams {
                noise_seed: self.seed as u32,
                ..Default::default()
            },
            spawn: SpawnParams {
                max_burst: self.max_burst,
                rotation_step: self.rotation_speed,
                ..Default::default()
            },
            render: RenderConfig {
                window_width: self.width,
                window_height: self.height,
                show_legend: !self.no_legend,
                ..Default::default()
            },
            seed: self.seed,
            start_in_fallback: self.fallback || self.headless.is_some(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["spectraflow"]).unwrap();
        let config = args.sketch_config();

        assert_eq!(config.render.window_width, 1280);
        assert_eq!(config.render.window_height, 720);
        assert_eq!(config.seed, 42);
        assert_eq!(config.field.noise_seed, 42);
        assert!(config.render.show_legend);
        assert!(!config.start_in_fallback);
        assert_eq!(config.spawn.max_burst, None);
        assert_eq!(config.spawn.rotation_step, 0.0);
    }

    #[test]
    fn test_flags_map_onto_config() {
        let args = Args::try_parse_from([
            "spectraflow",
            "--width",
            "640",
            "--no-legend",
            "--rotation-speed",
            "-0.01",
            "--max-burst",
            "12",
            "--seed",
            "7",
        ])
        .unwrap();
        let config = args.sketch_config();

        assert_eq!(config.render.window_width, 640);
        assert!(!config.render.show_legend);
        assert_eq!(config.spawn.rotation_step, -0.01);
        assert_eq!(config.spawn.max_burst, Some(12));
        assert_eq!(config.field.noise_seed, 7);
    }

    #[test]
    fn test_headless_forces_fallback() {
        let args = Args::try_parse_from(["spectraflow", "--headless", "100"]).unwrap();
        assert_eq!(args.headless, Some(100));
        assert!(args.sketch_config().start_in_fallback);
    }
}
