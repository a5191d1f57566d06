//! Proximity-weighted vibe aggregation.
//!
//! Items placed on an unbounded canvas each carry an extracted
//! [`vibe::VibeContribution`]. Their influence on the composite
//! [`vibe::VibeProfile`] falls off with distance from the group's centroid.
//!
//! Data flows one way: canvas events and extraction results are applied to a
//! [`state::VibeState`], which recomputes the composite with
//! [`aggregation::recompute`].

pub mod aggregation;
pub mod canvas;
pub mod config;
pub mod error;
pub mod extraction;
pub mod proximity;
pub mod state;
pub mod store;
pub mod vibe;

// Re-export common error type
pub use error::{PatinaError, Result};
