//! Distance and influence-weight model.
//!
//! Influence falls off as `1 / (distance + epsilon)`: strictly positive for
//! every finite distance and bounded by `1 / epsilon` for co-located points.

use crate::canvas::{Item, Position};

/// Default smoothing constant, in canvas units.
pub const DEFAULT_EPSILON: f64 = 1.0;

/// Euclidean distance between two points.
pub fn euclidean_distance(a: Position, b: Position) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Converts a distance into an influence weight. Closer means heavier.
pub fn distance_to_weight(distance: f64, epsilon: f64) -> f64 {
    1.0 / (distance + epsilon)
}

/// Arithmetic mean of the given points, or the origin when there are none.
///
/// The origin is a placeholder, not a meaningful anchor: callers must treat
/// an empty input as "nothing to aggregate".
pub fn centroid<I>(positions: I) -> Position
where
    I: IntoIterator<Item = Position>,
{
    let (sum_x, sum_y, count) = positions
        .into_iter()
        .fold((0.0, 0.0, 0usize), |(x, y, n), p| (x + p.x, y + p.y, n + 1));

    if count == 0 {
        return Position::ORIGIN;
    }
    Position::new(sum_x / count as f64, sum_y / count as f64)
}

/// An item's distance and influence relative to some point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proximity<'a> {
    pub item: &'a Item,
    pub distance: f64,
    pub weight: f64,
}

/// Items within `max_distance` of `point`, nearest first.
pub fn items_near_point<'a, I>(
    items: I,
    point: Position,
    max_distance: f64,
    epsilon: f64,
) -> Vec<Proximity<'a>>
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut near: Vec<Proximity<'a>> = items
        .into_iter()
        .map(|item| {
            let distance = euclidean_distance(item.position, point);
            Proximity {
                item,
                distance,
                weight: distance_to_weight(distance, epsilon),
            }
        })
        .filter(|p| p.distance <= max_distance)
        .collect();

    near.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    near
}
