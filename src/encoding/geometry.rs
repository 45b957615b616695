//! Collectible geometry on axis-aligned edges

use crate::{
    Error, Result,
    maze::{Collectible, Direction, RelativeDirection, Vec2},
};

/// Coordinates closer than this are considered equal.
pub const GEOMETRY_TOLERANCE: f64 = 1e-6;

fn almost_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < GEOMETRY_TOLERANCE
}

fn within(value: f64, bound1: f64, bound2: f64) -> bool {
    let (low, high) = if bound1 < bound2 {
        (bound1, bound2)
    } else {
        (bound2, bound1)
    };
    almost_equal(value, low) || almost_equal(value, high) || (value > low && value < high)
}

/// True if any collectible lies on the segment from `start` to `end`,
/// endpoints included.
///
/// # Errors
///
/// Returns [`Error::DegenerateGeometry`] if the points are not axis aligned.
pub fn edge_has_collectible(start: Vec2, end: Vec2, collectibles: &[Collectible]) -> Result<bool> {
    if almost_equal(start.x, end.x) {
        return Ok(collectibles.iter().any(|c| {
            almost_equal(c.position.x, start.x) && within(c.position.y, start.y, end.y)
        }));
    }
    if almost_equal(start.y, end.y) {
        return Ok(collectibles.iter().any(|c| {
            almost_equal(c.position.y, start.y) && within(c.position.x, start.x, end.x)
        }));
    }
    Err(Error::DegenerateGeometry { start, end })
}

/// Closest collectible by Manhattan distance; the first one wins ties.
pub fn nearest_collectible(
    position: Vec2,
    collectibles: &[Collectible],
) -> Option<(&Collectible, f64)> {
    let mut best: Option<(&Collectible, f64)> = None;
    for collectible in collectibles {
        let distance = position.manhattan_distance(collectible.position);
        if best.is_none_or(|(_, shortest)| distance < shortest) {
            best = Some((collectible, distance));
        }
    }
    best
}

/// Compass quadrant of `to` as seen from `from`, relative to `heading`.
///
/// Quadrant boundaries sit on the diagonals. A point exactly on a diagonal
/// belongs to both neighbouring quadrants and the one earlier in
/// [`RelativeDirection::ALL`] wins, so FORWARD is preferred whenever it is
/// a candidate. A coincident point reads as FORWARD.
pub fn relative_bearing(from: Vec2, to: Vec2, heading: Direction) -> Result<RelativeDirection> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if almost_equal(dx, 0.0) && almost_equal(dy, 0.0) {
        return Ok(RelativeDirection::Forward);
    }

    let horizontal = if dx > 0.0 {
        Direction::Right
    } else {
        Direction::Left
    };
    let vertical = if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };
    let candidates: &[Direction] = if almost_equal(dx.abs(), dy.abs()) {
        &[horizontal, vertical]
    } else if dx.abs() > dy.abs() {
        &[horizontal]
    } else {
        &[vertical]
    };

    let mut relative = candidates
        .iter()
        .map(|&absolute| RelativeDirection::from_absolute(heading, absolute))
        .collect::<Result<Vec<_>>>()?;
    relative.sort();
    Ok(relative[0])
}
