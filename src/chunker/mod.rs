//! Fixed-size spatial partition of the plane into chunks of samples

pub mod coord;
pub mod chunk;
pub mod store;

pub use coord::{ChunkCoord, ChunkRect, LocalOffset};
pub use chunk::{Chunk, PointGrid, PointSample};
pub use store::Chunker;
