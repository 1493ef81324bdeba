//! Discrete height levels for normalized noise values
//!
//! Five narrow, non-overlapping bands over `[0, 1]`. A sample inside a band
//! gets that band's level; every other sample gets none and produces no
//! instance, which is what keeps the rendered terrain sparse.
//!
//! Edges are compared in `f64`, before the value is narrowed for storage.

/// Open interval `(low, high)` mapped to a fixed level
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelBand {
    pub low: f64,
    pub high: f64,
    pub level: f32,
}

impl LevelBand {
    const fn new(low: f64, high: f64, level: f32) -> Self {
        Self { low, high, level }
    }

    /// Strictly inside the band; edges are excluded
    pub fn contains(&self, value: f64) -> bool {
        value > self.low && value < self.high
    }
}

/// Bands ordered from the highest level down
pub const LEVEL_BANDS: [LevelBand; 5] = [
    LevelBand::new(0.87, 0.90, 2.0),
    LevelBand::new(0.77, 0.80, 1.5),
    LevelBand::new(0.57, 0.60, 1.0),
    LevelBand::new(0.37, 0.40, 0.5),
    LevelBand::new(0.17, 0.20, 0.0),
];

/// Level for a normalized noise value, or `None` outside every band
pub fn classify(value: f64) -> Option<f32> {
    LEVEL_BANDS
        .iter()
        .find(|band| band.contains(value))
        .map(|band| band.level)
}
