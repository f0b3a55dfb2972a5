use glam::DVec2;

use crate::map::globe::ProjectedPoint;

/// Default hover radius in canvas pixels (about two character cells wide).
pub const DEFAULT_HIT_RADIUS: f64 = 4.0;

/// First visible point, in iteration order, strictly within `threshold`
/// pixels of the pointer.
///
/// Overlapping markers resolve to the lowest index, which can change
/// between frames as the globe turns.
pub fn hit_test(pointer: DVec2, projected: &[ProjectedPoint], threshold: f64) -> Option<usize> {
    let limit = threshold * threshold;
    projected
        .iter()
        .position(|p| p.visible && p.screen().distance_squared(pointer) < limit)
}

/// Closest visible point within `threshold` pixels. Equal distances keep
/// the earlier index.
pub fn nearest_hit(pointer: DVec2, projected: &[ProjectedPoint], threshold: f64) -> Option<usize> {
    let limit = threshold * threshold;
    let mut best: Option<(usize, f64)> = None;

    for (idx, p) in projected.iter().enumerate() {
        if !p.visible {
            continue;
        }
        let d2 = p.screen().distance_squared(pointer);
        if d2 >= limit {
            continue;
        }
        if best.map_or(true, |(_, best_d2)| d2 < best_d2) {
            best = Some((idx, d2));
        }
    }

    best.map(|(idx, _)| idx)
}
