//! Aggregation pipeline: spatial weighting followed by the weighted merge.
//!
//! # Module Structure
//!
//! - `weighting`: centroid-relative influence per qualifying item
//! - `merge`: weighted means and weighted voting into a [`VibeProfile`]

mod merge;
mod weighting;

pub use merge::{
    ACCENT_COLORS, DOMINANT_COLORS, FALLBACK_SONIC_MOOD, FALLBACK_TEXTURE, MAX_AESTHETIC_TAGS,
    MAX_MOOD_TAGS, MOOD_LABEL_TAGS, merge_contributions,
};
pub use weighting::{WeightedContribution, compute_weighted_contributions};

use crate::canvas::Canvas;
use crate::store::ContributionStore;
use crate::vibe::VibeProfile;

/// Runs both stages against the current canvas and store.
///
/// Pure: the same canvas, store and epsilon always give the same result.
pub fn recompute(
    canvas: &Canvas,
    store: &ContributionStore,
    epsilon: f64,
) -> Option<VibeProfile> {
    let weighted = compute_weighted_contributions(canvas, store, epsilon);
    merge_contributions(&weighted)
}
