//! Sliding window of generated terrain chunks around a focus point
//!
//! The window is the square `[center - radius, center + radius]` in world
//! units, scaled by `segments` into sample positions and mapped to an
//! inclusive rectangle of chunk coordinates. Every refresh generates the
//! chunks missing from that rectangle and evicts the stored chunks outside
//! it. There is no incremental diff: each focus update recomputes the whole
//! window, and `exists` checks keep repeated refreshes free.
//!
//! Window math runs in `f64` and `i64`. Window corners saturate at the `i32`
//! chunk range, so any finite focus yields a valid window.

use glam::{DVec2, I64Vec2, Vec3};
use rayon::prelude::*;

use super::config::StreamerConfig;
use super::level;
use super::noise_source::{NoiseSource, SeededNoise};
use super::renderable::{Instance, RenderHandle, RenderSink, Renderable, RenderableId};
use crate::chunker::{Chunk, ChunkCoord, ChunkRect, Chunker, LocalOffset, PointGrid};
use crate::core::Result;

/// Work done by a single refresh
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub generated: usize,
    pub evicted: usize,
}

impl RefreshSummary {
    /// True when the active set did not change
    pub fn is_noop(&self) -> bool {
        self.generated == 0 && self.evicted == 0
    }
}

/// Cumulative counters over the streamer's lifetime
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamerStats {
    pub chunks_generated: u64,
    pub chunks_evicted: u64,
    pub instances_attached: u64,
}

/// Chunk contents built off to the side, before anything is stored or
/// handed to the sink
struct GeneratedChunk {
    coord: ChunkCoord,
    points: PointGrid,
    instances: Vec<Instance>,
}

/// Streams noise-generated chunks in and out around a moving focus.
///
/// Generation and eviction run synchronously on the calling thread. With
/// `parallel` set, chunk bodies are built on the rayon pool, but every
/// chunker write and sink call still happens here, in window order.
pub struct TerrainStreamer<S: RenderSink, N: NoiseSource = SeededNoise> {
    config: StreamerConfig,
    center: DVec2,
    chunker: Chunker<RenderHandle>,
    noise: N,
    sink: S,
    next_renderable_id: RenderableId,
    stats: StreamerStats,
}

impl<S: RenderSink> TerrainStreamer<S> {
    /// Create a streamer using simplex noise seeded from `config.seed`.
    ///
    /// Nothing is generated until the first [`update_focus`](Self::update_focus)
    /// or [`refresh`](Self::refresh).
    pub fn new(config: StreamerConfig, sink: S) -> Result<Self> {
        let noise = SeededNoise::new(&config.seed);
        Self::with_noise(config, noise, sink)
    }
}

impl<S: RenderSink, N: NoiseSource> TerrainStreamer<S, N> {
    /// Create a streamer sampling an arbitrary noise source
    pub fn with_noise(config: StreamerConfig, noise: N, sink: S) -> Result<Self> {
        config.validate()?;
        let chunker = Chunker::new(config.units);
        Ok(Self {
            config,
            center: DVec2::ZERO,
            chunker,
            noise,
            sink,
            next_renderable_id: 0,
            stats: StreamerStats::default(),
        })
    }

    pub fn config(&self) -> &StreamerConfig {
        &self.config
    }

    /// Current focus point in world units
    pub fn center(&self) -> DVec2 {
        self.center
    }

    /// Stored chunks
    pub fn chunker(&self) -> &Chunker<RenderHandle> {
        &self.chunker
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the streamer and return its sink
    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn stats(&self) -> StreamerStats {
        self.stats
    }

    /// Move the focus point and refresh the window.
    ///
    /// A non-finite focus is ignored and leaves the loaded set untouched.
    pub fn update_focus(&mut self, center: DVec2) -> RefreshSummary {
        if !center.is_finite() {
            log::warn!("ignoring non-finite focus {}", center);
            return RefreshSummary::default();
        }
        self.center = center;
        self.refresh()
    }

    /// Inclusive rectangle of chunk coordinates that should be loaded
    pub fn window_bounds(&self) -> ChunkRect {
        let segments = self.config.segments as f64;
        let radius = DVec2::splat(self.config.radius);
        let start = (self.center - radius) * segments;
        let end = (self.center + radius) * segments;

        ChunkRect::new(
            self.chunker.chunk_coord_clamped(start),
            self.chunker.chunk_coord_clamped(end),
        )
    }

    /// Generate every missing chunk in the window, then trim.
    ///
    /// Returns once the stored set is exactly the window.
    pub fn refresh(&mut self) -> RefreshSummary {
        let window = self.window_bounds();
        let missing: Vec<(ChunkCoord, I64Vec2)> = window
            .iter()
            .filter(|&coord| !self.chunker.exists(coord))
            .map(|coord| (coord, self.chunker.chunk_bounds(coord).0))
            .collect();

        let generated = missing.len();
        if self.config.parallel && missing.len() > 1 {
            let noise = &self.noise;
            let config = &self.config;
            let built: Vec<GeneratedChunk> = missing
                .par_iter()
                .map(|&(coord, origin)| build_chunk(noise, config, coord, origin))
                .collect();
            for chunk in built {
                self.commit(chunk);
            }
        } else {
            for (coord, origin) in missing {
                self.generate(coord, origin);
            }
        }

        let evicted = self.trim();
        if generated > 0 || evicted > 0 {
            log::info!(
                "refresh around ({:.2}, {:.2}): window {}, generated {}, evicted {}, {} chunks loaded",
                self.center.x,
                self.center.y,
                window,
                generated,
                evicted,
                self.chunker.len()
            );
        }

        RefreshSummary { generated, evicted }
    }

    /// Evict every stored chunk outside the window.
    ///
    /// Walks a snapshot of the stored coordinates so removal cannot skip or
    /// revisit entries. Returns the number of chunks evicted.
    pub fn trim(&mut self) -> usize {
        let window = self.window_bounds();
        let mut evicted = 0;

        for coord in self.chunker.coords() {
            if window.contains(coord) {
                continue;
            }
            if let Some(chunk) = self.chunker.remove(coord) {
                log::debug!("removing chunk {}", coord);
                if let Some(handle) = chunk.renderable {
                    self.sink.detach(&handle);
                }
                evicted += 1;
            }
        }

        self.stats.chunks_evicted += evicted as u64;
        evicted
    }

    fn generate(&mut self, coord: ChunkCoord, origin: I64Vec2) {
        let chunk = build_chunk(&self.noise, &self.config, coord, origin);
        self.commit(chunk);
    }

    /// Store a built chunk with its handle, then hand the renderable over
    fn commit(&mut self, generated: GeneratedChunk) {
        let GeneratedChunk { coord, points, instances } = generated;

        let id = self.next_renderable_id;
        self.next_renderable_id += 1;

        let renderable = Renderable {
            id,
            coord,
            instance_size: self.config.sample_size(),
            instances,
        };
        let handle = renderable.handle();
        log::debug!("generating chunk {} ({} instances)", coord, handle.instance_count);

        let chunk = Chunk {
            points,
            renderable: Some(handle),
        };
        if let Some(previous) = self.chunker.set(coord, chunk) {
            if let Some(old) = previous.renderable {
                self.sink.detach(&old);
            }
        }
        self.sink.attach(renderable);

        self.stats.chunks_generated += 1;
        self.stats.instances_attached += handle.instance_count as u64;
    }
}

/// Map raw noise in `[-1, 1]` to `[0, 1]`, clamping overshoot
pub fn normalize(raw: f64) -> f64 {
    ((raw + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Sample every position of one chunk and collect its instances.
///
/// Pure in its inputs, so it can run on any thread.
fn build_chunk<N: NoiseSource>(
    noise: &N,
    config: &StreamerConfig,
    coord: ChunkCoord,
    origin: I64Vec2,
) -> GeneratedChunk {
    let units = config.units;
    let segments = config.segments as f64;

    let mut points = PointGrid::new(units);
    let mut instances = Vec::new();

    for lx in 0..units {
        let x = (origin.x + lx as i64) as f64 / segments;
        let nx = x * config.scale;
        for ly in 0..units {
            let y = (origin.y + ly as i64) as f64 / segments;
            let ny = y * config.scale;

            let value = normalize(noise.sample(nx, ny));
            points.set(LocalOffset::new(lx, ly), value as f32);

            if let Some(level) = level::classify(value) {
                let translation = Vec3::new(x as f32, level, y as f32);
                instances.push(Instance::new(translation, value as f32));
            }
        }
    }

    GeneratedChunk {
        coord,
        points,
        instances,
    }
}
