//! Named frequency bands and their per-frame derived state.
//!
//! The descriptor table is immutable `'static` data; everything that changes
//! per frame lives in [`BandState`], stored separately by the sketch.

/// Coarse grouping that decides how a band's energy maps to particle speed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandGroup {
    /// Needs a lot of energy to produce fast particles
    Bass,
    /// Linear response
    Mid,
    /// Reaches full speed at half energy
    High,
}

/// Static description of one frequency band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyBand {
    pub name: &'static str,
    pub min_hz: f32,
    pub max_hz: f32,
    pub color: [u8; 3],
    /// Energy a band must exceed before it can become dominant, in (0, 1)
    pub threshold: f32,
    pub group: BandGroup,
}

impl FrequencyBand {
    const fn new(
        name: &'static str,
        min_hz: f32,
        max_hz: f32,
        color: [u8; 3],
        threshold: f32,
        group: BandGroup,
    ) -> Self {
        Self {
            name,
            min_hz,
            max_hz,
            color,
            threshold,
            group,
        }
    }

    /// Legend label, e.g. `"80-160Hz"`
    pub fn range_label(&self) -> String {
        format!("{}-{}Hz", self.min_hz, self.max_hz)
    }
}

/// Band table, low to high. Bass thresholds are deliberately high and
/// treble thresholds low so quiet high-frequency content still registers.
pub const FREQUENCY_BANDS: [FrequencyBand; 14] = [
    FrequencyBand::new("Sub Bass", 20.0, 40.0, [128, 0, 0], 0.2, BandGroup::Bass),
    FrequencyBand::new("Deep Bass", 40.0, 80.0, [255, 0, 0], 0.3, BandGroup::Bass),
    FrequencyBand::new("Bass", 80.0, 160.0, [255, 64, 0], 0.3, BandGroup::Bass),
    FrequencyBand::new("Upper Bass", 160.0, 300.0, [255, 128, 0], 0.3, BandGroup::Bass),
    FrequencyBand::new("Low Mids", 300.0, 500.0, [255, 200, 0], 0.3, BandGroup::Mid),
    FrequencyBand::new("Mid-Low", 500.0, 800.0, [255, 255, 0], 0.28, BandGroup::Mid),
    FrequencyBand::new("Mid", 800.0, 1200.0, [0, 255, 255], 0.15, BandGroup::Mid),
    FrequencyBand::new("Mid-High", 1200.0, 2000.0, [0, 255, 0], 0.2, BandGroup::Mid),
    FrequencyBand::new("High Mids", 2000.0, 3000.0, [0, 255, 128], 0.1, BandGroup::Mid),
    FrequencyBand::new("Low Treble", 3000.0, 4000.0, [180, 255, 0], 0.2, BandGroup::High),
    FrequencyBand::new("Mid Treble", 4000.0, 6000.0, [0, 128, 255], 0.05, BandGroup::High),
    FrequencyBand::new("Presence", 6000.0, 8000.0, [255, 255, 255], 0.05, BandGroup::High),
    FrequencyBand::new("Brilliance", 8000.0, 12000.0, [128, 0, 255], 0.05, BandGroup::High),
    FrequencyBand::new("Air", 12000.0, 20000.0, [255, 0, 255], 0.04, BandGroup::High),
];

/// Number of bands in [`FREQUENCY_BANDS`]
pub const BAND_COUNT: usize = FREQUENCY_BANDS.len();

/// Values derived from the spectrum for one band, overwritten every frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BandState {
    /// Normalized energy, [0, 1]
    pub current_energy: f32,
    /// `current_energy / threshold`; above 1.0 means the band is over threshold
    pub relative_energy: f32,
    /// True only for the dominant band of the current frame
    pub is_active: bool,
}

impl BandState {
    /// Record a fresh energy reading; clears the active flag
    pub fn record(&mut self, band: &FrequencyBand, energy: f32) {
        self.current_energy = energy;
        self.relative_energy = energy / band.threshold;
        self.is_active = false;
    }

    /// Whether the energy is strictly above the band's threshold
    pub fn exceeds(&self, band: &FrequencyBand) -> bool {
        self.current_energy > band.threshold
    }
}
