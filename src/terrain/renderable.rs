//! Batched per-chunk renderables and the sink that displays them
//!
//! A streamer builds one [`Renderable`] per generated chunk and hands it to
//! a [`RenderSink`], which takes ownership. The chunk keeps only a
//! [`RenderHandle`] so it can ask the sink to detach it on eviction.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::chunker::ChunkCoord;

/// Identifier assigned to each renderable by the streamer
pub type RenderableId = u64;

/// A single instanced box.
///
/// `#[repr(C)]` and `Pod` so a GPU sink can upload the instance list as-is.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Instance {
    pub translation: [f32; 3],
    pub color: [f32; 3],
}

impl Instance {
    /// Instance at `translation` with a grey colour of intensity `grey`
    pub fn new(translation: Vec3, grey: f32) -> Self {
        Self {
            translation: translation.to_array(),
            color: [grey; 3],
        }
    }

    pub fn translation(&self) -> Vec3 {
        Vec3::from_array(self.translation)
    }
}

/// Handle retained by a chunk after its renderable went to the sink
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderHandle {
    pub id: RenderableId,
    pub coord: ChunkCoord,
    pub instance_count: usize,
}

/// One chunk's batch of instances
#[derive(Clone, Debug, PartialEq)]
pub struct Renderable {
    pub id: RenderableId,
    pub coord: ChunkCoord,
    /// Edge length of every instanced box
    pub instance_size: f32,
    pub instances: Vec<Instance>,
}

impl Renderable {
    /// Handle for this renderable
    pub fn handle(&self) -> RenderHandle {
        RenderHandle {
            id: self.id,
            coord: self.coord,
            instance_count: self.instances.len(),
        }
    }

    /// Instance data as raw bytes
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

/// Destination for chunk renderables.
///
/// Calls are fire-and-forget and are always issued from the thread that
/// drives the streamer.
pub trait RenderSink {
    /// Take ownership of a renderable and make it visible
    fn attach(&mut self, renderable: Renderable);
    /// Remove the renderable identified by `handle`
    fn detach(&mut self, handle: &RenderHandle);
}

impl<S: RenderSink + ?Sized> RenderSink for &mut S {
    fn attach(&mut self, renderable: Renderable) {
        (**self).attach(renderable);
    }

    fn detach(&mut self, handle: &RenderHandle) {
        (**self).detach(handle);
    }
}

/// In-memory sink that keeps attached renderables and counts calls
#[derive(Debug, Default)]
pub struct MemorySink {
    live: HashMap<RenderableId, Renderable>,
    attached: usize,
    detached: Vec<RenderHandle>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of renderables currently attached
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Total instances across all attached renderables
    pub fn live_instances(&self) -> usize {
        self.live.values().map(|r| r.instances.len()).sum()
    }

    pub fn is_live(&self, id: RenderableId) -> bool {
        self.live.contains_key(&id)
    }

    pub fn get(&self, id: RenderableId) -> Option<&Renderable> {
        self.live.get(&id)
    }

    /// Attached renderables in no particular order
    pub fn renderables(&self) -> impl Iterator<Item = &Renderable> {
        self.live.values()
    }

    /// Total attach calls received
    pub fn attach_count(&self) -> usize {
        self.attached
    }

    /// Total detach calls that removed a live renderable
    pub fn detach_count(&self) -> usize {
        self.detached.len()
    }

    /// Handles detached so far, oldest first
    pub fn detached(&self) -> &[RenderHandle] {
        &self.detached
    }

    /// How many renderables of chunk `coord` have been detached
    pub fn detach_count_for(&self, coord: ChunkCoord) -> usize {
        self.detached.iter().filter(|h| h.coord == coord).count()
    }
}

impl RenderSink for MemorySink {
    fn attach(&mut self, renderable: Renderable) {
        log::trace!(
            "attach renderable {} for chunk {} ({} instances)",
            renderable.id,
            renderable.coord,
            renderable.instances.len()
        );
        self.attached += 1;
        self.live.insert(renderable.id, renderable);
    }

    fn detach(&mut self, handle: &RenderHandle) {
        if self.live.remove(&handle.id).is_some() {
            log::trace!("detach renderable {} for chunk {}", handle.id, handle.coord);
            self.detached.push(*handle);
        } else {
            log::warn!("detach of unknown renderable {} for chunk {}", handle.id, handle.coord);
        }
    }
}
