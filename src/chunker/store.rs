//! Sparse map of chunk coordinates to dense sample grids

use std::collections::HashMap;

use glam::{DVec2, I64Vec2};

use super::chunk::{Chunk, PointSample};
use super::coord::{ChunkCoord, LocalOffset};

/// Fixed-size spatial partition of the plane.
///
/// Chunk coordinates index a conceptually infinite arena that is only
/// realized where chunks have been created. Sample positions are `i64`, so
/// every chunk's bounds fit without overflow for any `i32` chunk coordinate.
/// Single-threaded; callers serialize access.
pub struct Chunker<H = ()> {
    /// Side length of every chunk in sample positions, at most `i32::MAX`
    units: u32,
    /// Map of chunk coordinates to chunks
    chunks: HashMap<ChunkCoord, Chunk<H>>,
}

impl<H> Chunker<H> {
    /// Create an empty chunker.
    ///
    /// # Panics
    /// Panics if `units` is zero or larger than `i32::MAX`.
    pub fn new(units: u32) -> Self {
        assert!(
            units > 0 && i32::try_from(units).is_ok(),
            "chunk units must be in 1..=i32::MAX, got {units}"
        );
        Self {
            units,
            chunks: HashMap::new(),
        }
    }

    /// Chunk side length
    pub fn units(&self) -> u32 {
        self.units
    }

    /// Split an integer sample position into its chunk and local offset.
    ///
    /// Uses floor division and non-negative modulo, so `-1` lands in
    /// chunk `-1` at offset `units - 1`. Returns `None` when the chunk
    /// coordinate does not fit in `i32`.
    pub fn locate(&self, pos: I64Vec2) -> Option<(ChunkCoord, LocalOffset)> {
        let units = self.units as i64;
        let x = i32::try_from(pos.x.div_euclid(units)).ok()?;
        let y = i32::try_from(pos.y.div_euclid(units)).ok()?;
        let offset = LocalOffset::new(
            pos.x.rem_euclid(units) as u32,
            pos.y.rem_euclid(units) as u32,
        );
        Some((ChunkCoord::new(x, y), offset))
    }

    /// [`Chunker::locate`] for real-valued positions; floors first.
    ///
    /// Non-finite positions and positions past the `i64` range have no chunk.
    pub fn locate_world(&self, pos: DVec2) -> Option<(ChunkCoord, LocalOffset)> {
        let floored = pos.floor();
        let limit = i64::MAX as f64;
        if !floored.is_finite() || floored.abs().max_element() >= limit {
            return None;
        }
        self.locate(floored.as_i64vec2())
    }

    /// Chunk containing a real-valued position, saturated to the `i32`
    /// chunk range.
    ///
    /// Infinite components saturate too; NaN components map to chunk 0.
    pub fn chunk_coord_clamped(&self, pos: DVec2) -> ChunkCoord {
        let units = self.units as i64;
        let axis = |v: f64| -> i32 {
            // `as` saturates at the i64 bounds
            let sample = v.floor() as i64;
            sample
                .div_euclid(units)
                .clamp(i32::MIN as i64, i32::MAX as i64) as i32
        };
        ChunkCoord::new(axis(pos.x), axis(pos.y))
    }

    /// Inclusive sample-position range covered by a chunk
    pub fn chunk_bounds(&self, coord: ChunkCoord) -> (I64Vec2, I64Vec2) {
        let units = self.units as i64;
        let min = I64Vec2::new(coord.x as i64 * units, coord.y as i64 * units);
        (min, min + I64Vec2::splat(units - 1))
    }

    /// Check if a chunk is stored for `coord`
    pub fn exists(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Get a chunk by coordinate
    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk<H>> {
        self.chunks.get(&coord)
    }

    /// Get a mutable chunk by coordinate
    pub fn get_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk<H>> {
        self.chunks.get_mut(&coord)
    }

    /// Insert or replace a chunk, returning the replaced one
    pub fn set(&mut self, coord: ChunkCoord, chunk: Chunk<H>) -> Option<Chunk<H>> {
        self.chunks.insert(coord, chunk)
    }

    /// Insert an all-unsampled chunk unless one is already stored
    pub fn create_empty(&mut self, coord: ChunkCoord) -> &mut Chunk<H> {
        let units = self.units;
        self.chunks.entry(coord).or_insert_with(|| Chunk::empty(units))
    }

    /// Remove a chunk and return it
    pub fn remove(&mut self, coord: ChunkCoord) -> Option<Chunk<H>> {
        self.chunks.remove(&coord)
    }

    /// Read the sample at a position
    pub fn point(&self, pos: I64Vec2) -> PointSample {
        let Some((coord, offset)) = self.locate(pos) else {
            return PointSample::NoChunk;
        };
        match self.chunks.get(&coord) {
            None => PointSample::NoChunk,
            Some(chunk) => match chunk.points.get(offset) {
                Some(v) => PointSample::Sampled(v),
                None => PointSample::Unsampled,
            },
        }
    }

    /// Write the sample at a position, creating its chunk if needed.
    ///
    /// Positions without a chunk and offsets outside the grid are dropped
    /// without writing.
    pub fn set_point(&mut self, pos: I64Vec2, value: f32) {
        let Some((coord, offset)) = self.locate(pos) else {
            log::trace!("dropped write at {} outside the chunk range", pos);
            return;
        };
        let chunk = self.create_empty(coord);
        if !chunk.points.set(offset, value) {
            log::trace!("dropped out-of-range write at {} offset {:?}", coord, offset);
        }
    }

    /// Snapshot of every stored chunk coordinate.
    ///
    /// The returned list is independent of the map, so entries may be
    /// removed while walking it.
    pub fn coords(&self) -> Vec<ChunkCoord> {
        self.chunks.keys().copied().collect()
    }

    /// Live view of every stored chunk
    pub fn chunks(&self) -> impl Iterator<Item = (ChunkCoord, &Chunk<H>)> {
        self.chunks.iter().map(|(&coord, chunk)| (coord, chunk))
    }

    /// Number of stored chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(chunker: &Chunker, x: i64, y: i64) -> (ChunkCoord, LocalOffset) {
        chunker.locate(I64Vec2::new(x, y)).unwrap()
    }

    #[test]
    fn test_locate_positive() {
        let chunker: Chunker = Chunker::new(64);
        assert_eq!(at(&chunker, 0, 0), (ChunkCoord::new(0, 0), LocalOffset::new(0, 0)));
        assert_eq!(at(&chunker, 63, 64), (ChunkCoord::new(0, 1), LocalOffset::new(63, 0)));
        assert_eq!(at(&chunker, 130, 5), (ChunkCoord::new(2, 0), LocalOffset::new(2, 5)));
    }

    #[test]
    fn test_locate_negative_uses_floor() {
        let chunker: Chunker = Chunker::new(64);
        assert_eq!(at(&chunker, -1, -1), (ChunkCoord::new(-1, -1), LocalOffset::new(63, 63)));
        assert_eq!(at(&chunker, -64, -65), (ChunkCoord::new(-1, -2), LocalOffset::new(0, 63)));
    }

    #[test]
    fn test_local_offset_is_non_negative_modulo() {
        // A truncating `(p % units) - 1` offset would give -2 here and 63 for p = 0.
        let chunker: Chunker = Chunker::new(64);
        let (_, offset) = at(&chunker, -1, 0);
        assert_eq!(offset, LocalOffset::new(63, 0));
    }

    #[test]
    fn test_locate_round_trip() {
        let chunker: Chunker = Chunker::new(64);
        let units = chunker.units() as i64;
        let far = 5_000_000_000i64;
        let xs = (-300..300).step_by(7).chain([far, -far, far + 63, -far - 1]);
        for x in xs {
            for y in [-129, -128, -65, -64, -1, 0, 1, 63, 64, 127, 128] {
                let pos = I64Vec2::new(x, y);
                let (coord, offset) = chunker.locate(pos).unwrap();
                assert!(offset.x < 64 && offset.y < 64);
                let rebuilt = I64Vec2::new(
                    coord.x as i64 * units + offset.x as i64,
                    coord.y as i64 * units + offset.y as i64,
                );
                assert_eq!(rebuilt, pos);
            }
        }
    }

    #[test]
    fn test_locate_beyond_chunk_range_is_none() {
        let chunker: Chunker = Chunker::new(1);
        let edge = i32::MAX as i64;
        assert!(chunker.locate(I64Vec2::new(edge, 0)).is_some());
        assert!(chunker.locate(I64Vec2::new(edge + 1, 0)).is_none());
        assert!(chunker.locate(I64Vec2::new(0, i32::MIN as i64 - 1)).is_none());
    }

    #[test]
    fn test_locate_world_floors() {
        let chunker: Chunker = Chunker::new(128);
        let chunk = |x: f64, y: f64| chunker.locate_world(DVec2::new(x, y)).unwrap().0;
        assert_eq!(chunk(-32.0, 32.0), ChunkCoord::new(-1, 0));
        assert_eq!(chunk(-0.5, 127.9), ChunkCoord::new(-1, 0));
        assert_eq!(chunk(128.0, -128.0), ChunkCoord::new(1, -1));
        assert_eq!(chunk(3.2e9, 6.4e9), ChunkCoord::new(25_000_000, 50_000_000));
        assert_eq!(
            chunker.locate_world(DVec2::new(-0.5, 0.5)).unwrap().1,
            LocalOffset::new(127, 0)
        );
    }

    #[test]
    fn test_locate_world_rejects_unrepresentable() {
        let chunker: Chunker = Chunker::new(128);
        assert!(chunker.locate_world(DVec2::new(f64::NAN, 0.0)).is_none());
        assert!(chunker.locate_world(DVec2::new(0.0, f64::INFINITY)).is_none());
        assert!(chunker.locate_world(DVec2::new(1e30, 0.0)).is_none());
    }

    #[test]
    fn test_chunk_coord_clamped() {
        let chunker: Chunker = Chunker::new(128);
        assert_eq!(chunker.chunk_coord_clamped(DVec2::new(-0.5, 127.9)), ChunkCoord::new(-1, 0));
        assert_eq!(
            chunker.chunk_coord_clamped(DVec2::new(3.2e9, -6.4e9)),
            ChunkCoord::new(25_000_000, -50_000_000)
        );
        assert_eq!(
            chunker.chunk_coord_clamped(DVec2::new(1e300, f64::NEG_INFINITY)),
            ChunkCoord::new(i32::MAX, i32::MIN)
        );
    }

    #[test]
    fn test_chunk_bounds() {
        let chunker: Chunker = Chunker::new(64);
        assert_eq!(
            chunker.chunk_bounds(ChunkCoord::new(0, 0)),
            (I64Vec2::new(0, 0), I64Vec2::new(63, 63))
        );
        assert_eq!(
            chunker.chunk_bounds(ChunkCoord::new(-1, 2)),
            (I64Vec2::new(-64, 128), I64Vec2::new(-1, 191))
        );
    }

    #[test]
    fn test_chunk_bounds_at_extreme_coords() {
        let chunker: Chunker = Chunker::new(i32::MAX as u32);
        let units = i32::MAX as i64;
        let (min, max) = chunker.chunk_bounds(ChunkCoord::new(i32::MAX, i32::MIN));
        assert_eq!(min, I64Vec2::new(i32::MAX as i64 * units, i32::MIN as i64 * units));
        assert_eq!(max, min + I64Vec2::splat(units - 1));
        assert_eq!(chunker.locate(max).unwrap().0, ChunkCoord::new(i32::MAX, i32::MIN));
    }

    #[test]
    fn test_bounds_are_inverse_of_locate() {
        let chunker: Chunker = Chunker::new(32);
        let coord = ChunkCoord::new(-3, 4);
        let (min, max) = chunker.chunk_bounds(coord);
        assert_eq!(chunker.locate(min), Some((coord, LocalOffset::new(0, 0))));
        assert_eq!(chunker.locate(max), Some((coord, LocalOffset::new(31, 31))));
    }

    #[test]
    fn test_create_empty_and_exists() {
        let mut chunker: Chunker = Chunker::new(16);
        let coord = ChunkCoord::new(1, -1);
        assert!(!chunker.exists(coord));
        chunker.create_empty(coord);
        assert!(chunker.exists(coord));
        assert_eq!(chunker.get(coord).unwrap().points.len(), 256);
        assert_eq!(chunker.len(), 1);
    }

    #[test]
    fn test_create_empty_keeps_existing() {
        let mut chunker: Chunker = Chunker::new(16);
        chunker.set_point(I64Vec2::new(3, 3), 0.75);
        chunker.create_empty(ChunkCoord::new(0, 0));
        assert_eq!(chunker.point(I64Vec2::new(3, 3)), PointSample::Sampled(0.75));
    }

    #[test]
    fn test_set_replaces() {
        let mut chunker: Chunker<u32> = Chunker::new(4);
        let coord = ChunkCoord::new(0, 0);
        let mut first = Chunk::empty(4);
        first.renderable = Some(1);
        assert!(chunker.set(coord, first).is_none());

        let mut second = Chunk::empty(4);
        second.renderable = Some(2);
        let replaced = chunker.set(coord, second).unwrap();
        assert_eq!(replaced.renderable, Some(1));
        assert_eq!(chunker.get(coord).unwrap().renderable, Some(2));
    }

    #[test]
    fn test_point_three_states() {
        let mut chunker: Chunker = Chunker::new(64);
        assert_eq!(chunker.point(I64Vec2::new(-1, -1)), PointSample::NoChunk);

        chunker.set_point(I64Vec2::new(-1, -1), 0.5);
        assert_eq!(chunker.point(I64Vec2::new(-1, -1)), PointSample::Sampled(0.5));
        assert_eq!(chunker.point(I64Vec2::new(-2, -1)), PointSample::Unsampled);
        assert!(chunker.exists(ChunkCoord::new(-1, -1)));

        let chunk = chunker.get(ChunkCoord::new(-1, -1)).unwrap();
        assert_eq!(chunk.points.get(LocalOffset::new(63, 63)), Some(0.5));
    }

    #[test]
    fn test_set_point_beyond_chunk_range_is_dropped() {
        let mut chunker: Chunker = Chunker::new(1);
        let pos = I64Vec2::new(i32::MAX as i64 + 1, 0);
        chunker.set_point(pos, 0.5);
        assert!(chunker.is_empty());
        assert_eq!(chunker.point(pos), PointSample::NoChunk);
    }

    #[test]
    fn test_get_mut_and_remove() {
        let mut chunker: Chunker = Chunker::new(8);
        let coord = ChunkCoord::new(2, 2);
        chunker.create_empty(coord);
        chunker.get_mut(coord).unwrap().points.set(LocalOffset::new(1, 1), 0.1);
        assert_eq!(chunker.point(I64Vec2::new(17, 17)), PointSample::Sampled(0.1));

        let removed = chunker.remove(coord).unwrap();
        assert_eq!(removed.points.sampled_count(), 1);
        assert!(!chunker.exists(coord));
        assert!(chunker.remove(coord).is_none());
        assert!(chunker.is_empty());
    }

    #[test]
    fn test_remove_while_walking_snapshot() {
        let mut chunker: Chunker = Chunker::new(4);
        for x in -2..=2 {
            for y in -2..=2 {
                chunker.create_empty(ChunkCoord::new(x, y));
            }
        }
        assert_eq!(chunker.len(), 25);

        let mut visited = 0;
        for coord in chunker.coords() {
            visited += 1;
            if coord.x != 0 {
                chunker.remove(coord);
            }
            // drop a neighbour that may not have been visited yet
            chunker.remove(ChunkCoord::new(coord.x, 2));
        }
        assert_eq!(visited, 25);
        assert_eq!(chunker.len(), 4);
        assert!(chunker.chunks().all(|(c, _)| c.x == 0 && c.y != 2));
    }

    #[test]
    #[should_panic]
    fn test_zero_units_panics() {
        let _: Chunker = Chunker::new(0);
    }

    #[test]
    #[should_panic]
    fn test_units_past_i32_panics() {
        let _: Chunker = Chunker::new(i32::MAX as u32 + 1);
    }
}
