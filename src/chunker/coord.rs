//! Chunk coordinates, local offsets and chunk rectangles

use std::fmt;

/// Integer coordinate identifying a chunk on the infinite plane
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    /// Create a new chunk coordinate
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Parse a textual `"x,y"` key.
    ///
    /// Returns `None` for anything that is not exactly two integers
    /// separated by a comma. `"-0"` parses to `0`, so the two zero
    /// spellings name the same chunk.
    pub fn from_key(key: &str) -> Option<Self> {
        let (x, y) = key.split_once(',')?;
        let x = x.trim().parse::<i32>().ok()?;
        let y = y.trim().parse::<i32>().ok()?;
        Some(Self { x, y })
    }

    /// Textual `"x,y"` key, the inverse of [`ChunkCoord::from_key`]
    pub fn to_key(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Offset of a sample inside its chunk, each axis in `[0, units)`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LocalOffset {
    pub x: u32,
    pub y: u32,
}

impl LocalOffset {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Inclusive rectangle of chunk coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkRect {
    pub min: ChunkCoord,
    pub max: ChunkCoord,
}

impl ChunkRect {
    /// Create a rectangle from two inclusive corners
    pub fn new(min: ChunkCoord, max: ChunkCoord) -> Self {
        Self { min, max }
    }

    /// Whether `coord` lies inside the rectangle (edges included)
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        coord.x >= self.min.x
            && coord.x <= self.max.x
            && coord.y >= self.min.y
            && coord.y <= self.max.y
    }

    /// Number of chunk coordinates covered
    pub fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let w = (self.max.x as i64 - self.min.x as i64 + 1) as usize;
        let h = (self.max.y as i64 - self.min.y as i64 + 1) as usize;
        w * h
    }

    /// True when `min` is past `max` on either axis
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Iterate over every coordinate, x-major then y
    pub fn iter(&self) -> impl Iterator<Item = ChunkCoord> + use<> {
        let (min, max) = (self.min, self.max);
        (min.x..=max.x).flat_map(move |x| (min.y..=max.y).map(move |y| ChunkCoord::new(x, y)))
    }
}

impl fmt::Display for ChunkRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]..=[{}]", self.min, self.max)
    }
}
