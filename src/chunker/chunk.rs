//! Per-chunk sample grid

use super::coord::LocalOffset;

/// Result of reading a single sample position
///
/// Keeps "no chunk here" and "chunk present but never sampled" apart so
/// callers can tell them apart without a sentinel value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointSample {
    /// No chunk is stored for the position's chunk coordinate
    NoChunk,
    /// The chunk exists but the cell has not been written
    Unsampled,
    /// The cell holds a sampled value
    Sampled(f32),
}

impl PointSample {
    /// The sampled value, if any
    pub fn value(self) -> Option<f32> {
        match self {
            PointSample::Sampled(v) => Some(v),
            _ => None,
        }
    }
}

/// Dense `units × units` grid of optional samples.
///
/// Rows are indexed by local x, columns by local y.
#[derive(Clone, Debug, PartialEq)]
pub struct PointGrid {
    units: u32,
    cells: Vec<Option<f32>>,
}

impl PointGrid {
    /// Create an all-unsampled grid
    pub fn new(units: u32) -> Self {
        let len = units as usize * units as usize;
        Self {
            units,
            cells: vec![None; len],
        }
    }

    /// Side length of the grid
    pub fn units(&self) -> u32 {
        self.units
    }

    /// Total number of cells (always `units²`)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn index(&self, offset: LocalOffset) -> Option<usize> {
        if offset.x >= self.units || offset.y >= self.units {
            return None;
        }
        Some(offset.x as usize * self.units as usize + offset.y as usize)
    }

    /// Read a cell. Out-of-range offsets read as unsampled.
    pub fn get(&self, offset: LocalOffset) -> Option<f32> {
        self.index(offset).and_then(|i| self.cells[i])
    }

    /// Write a cell, returning `false` (and writing nothing) when the
    /// offset is outside the grid.
    pub fn set(&mut self, offset: LocalOffset, value: f32) -> bool {
        match self.index(offset) {
            Some(i) => {
                self.cells[i] = Some(value);
                true
            }
            None => false,
        }
    }

    /// Number of cells holding a sample
    pub fn sampled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// One row (fixed local x) of the grid
    pub fn row(&self, x: u32) -> Option<&[Option<f32>]> {
        if x >= self.units {
            return None;
        }
        let start = x as usize * self.units as usize;
        Some(&self.cells[start..start + self.units as usize])
    }

    /// Raw cell storage in row-major order
    pub fn cells(&self) -> &[Option<f32>] {
        &self.cells
    }
}

/// A chunk owned by the chunker.
///
/// `H` is the handle type for an externally owned visual representation.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk<H = ()> {
    /// Sample grid
    pub points: PointGrid,
    /// Handle to the renderable built for this chunk, once generated
    pub renderable: Option<H>,
}

impl<H> Chunk<H> {
    /// Create a chunk with an all-unsampled grid and no renderable
    pub fn empty(units: u32) -> Self {
        Self {
            points: PointGrid::new(units),
            renderable: None,
        }
    }
}
