//! Window and scene configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Alpha of the black overlay drawn each frame (0-255, 255 = hard clear)
    pub background_fade: u8,

    /// Number of background stars
    pub star_count: usize,

    /// Height of the frequency legend strip (pixels)
    pub legend_height: f32,

    /// Gap between the legend strip and the bottom edge (pixels)
    pub legend_margin: f32,

    /// Whether the legend is visible at startup
    pub show_legend: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            background_fade: 200,
            star_count: 100,
            legend_height: 40.0,
            legend_margin: 10.0,
            show_legend: true,
        }
    }
}
