//! Procedural terrain streaming

pub mod config;
pub mod level;
pub mod noise_source;
pub mod renderable;
pub mod streamer;

pub use config::StreamerConfig;
pub use level::{LevelBand, LEVEL_BANDS};
pub use noise_source::{NoiseSource, SeededNoise};
pub use renderable::{Instance, MemorySink, RenderHandle, RenderSink, Renderable, RenderableId};
pub use streamer::{RefreshSummary, StreamerStats, TerrainStreamer};
