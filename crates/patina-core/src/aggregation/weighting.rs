//! Spatial weighting stage.

use crate::canvas::Canvas;
use crate::proximity::{centroid, distance_to_weight, euclidean_distance};
use crate::store::ContributionStore;
use crate::vibe::VibeContribution;

/// One item's contribution and its influence, borrowed for a single
/// aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedContribution<'a> {
    pub item_id: &'a str,
    pub contribution: &'a VibeContribution,
    pub weight: f64,
}

/// Weights every qualifying item by its distance to the group's centroid.
///
/// An item qualifies when it is visible, of a contributing kind, and has a
/// cached contribution. Cache entries for items not on the canvas are
/// ignored. Returns an empty vec when nothing qualifies; otherwise the
/// result is ordered by item id.
pub fn compute_weighted_contributions<'a>(
    canvas: &'a Canvas,
    store: &'a ContributionStore,
    epsilon: f64,
) -> Vec<WeightedContribution<'a>> {
    let mut qualifying: Vec<_> = canvas
        .visible_items()
        .iter()
        .filter(|item| item.kind.is_contributing())
        .filter_map(|item| store.get(&item.id).map(|vibe| (item, vibe)))
        .collect();
    // Id order keeps the centroid sum independent of canvas ordering, so a
    // hidden-then-restored item reproduces the exact same weights.
    qualifying.sort_by(|(a, _), (b, _)| a.id.cmp(&b.id));

    if qualifying.is_empty() {
        return Vec::new();
    }

    let center = centroid(qualifying.iter().map(|(item, _)| item.position));

    qualifying
        .into_iter()
        .map(|(item, vibe)| WeightedContribution {
            item_id: item.id.as_str(),
            contribution: vibe,
            weight: distance_to_weight(euclidean_distance(item.position, center), epsilon),
        })
        .collect()
}
