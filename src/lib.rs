//! Terrastream - chunked procedural terrain streaming
//!
//! The plane is split into square chunks of samples ([`chunker`]). A
//! [`TerrainStreamer`](terrain::TerrainStreamer) keeps the chunks around a
//! moving focus point generated from a seeded noise field and evicts the
//! ones that fall out of its window.

pub mod core;
pub mod chunker;
pub mod terrain;
