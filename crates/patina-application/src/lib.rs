//! Application layer for Patina.
//!
//! Wires the pure aggregation state from `patina-core` to an asynchronous
//! vibe extractor and keeps subscribers informed of the composite.

pub mod vibe_engine;

pub use vibe_engine::VibeEngine;
