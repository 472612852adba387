//! Force primitives for the layout engine.
//!
//! Pure position-to-force helpers; [`ForceLayout`](super::layout::ForceLayout)
//! combines them with the quadtree repulsion each tick.

use egui::{Pos2, Vec2};

/// Spring force on the link source, pulling the separation toward
/// `rest_length`. The target gets the negation.
pub fn link_spring(
    source: Pos2,
    target: Pos2,
    rest_length: f32,
    strength: f32,
    min_distance: f32,
) -> Vec2 {
    let delta = target - source;
    let distance = delta.length().max(min_distance);
    let displacement = distance - rest_length;
    (delta / distance) * (displacement * strength)
}

/// Positional correction separating two overlapping discs of `radius`.
///
/// Returns the half-push to apply to `a` (apply the negation to `b`),
/// or None when the discs are already clear. Coincident centers are
/// separated along a fixed axis so the correction stays deterministic.
pub fn collision_push(a: Pos2, b: Pos2, radius: f32) -> Option<Vec2> {
    let min_separation = radius * 2.0;
    let delta = a - b;
    let distance = delta.length();
    if distance >= min_separation {
        return None;
    }
    let direction = if distance > 1e-3 {
        delta / distance
    } else {
        Vec2::RIGHT
    };
    Some(direction * ((min_separation - distance) * 0.5))
}

/// Translation pulling the layout centroid toward `center`.
///
/// Applied uniformly to every free node, so it cancels drift without
/// distorting the local arrangement.
pub fn centering_shift(centroid: Pos2, center: Pos2, strength: f32) -> Vec2 {
    (center - centroid) * strength
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn spring_is_zero_at_rest_length() {
        let f = link_spring(pos2(0.0, 0.0), pos2(240.0, 0.0), 240.0, 0.1, 1.0);
        assert!(f.length() < 1e-5);
    }

    #[test]
    fn spring_pulls_stretched_links_together() {
        let f = link_spring(pos2(0.0, 0.0), pos2(400.0, 0.0), 240.0, 0.1, 1.0);
        assert!(f.x > 0.0, "source should be pulled toward target: {f:?}");
    }

    #[test]
    fn spring_pushes_compressed_links_apart() {
        let f = link_spring(pos2(0.0, 0.0), pos2(100.0, 0.0), 240.0, 0.1, 1.0);
        assert!(f.x < 0.0, "source should be pushed away: {f:?}");
    }

    #[test]
    fn collision_ignores_clear_discs() {
        assert!(collision_push(pos2(0.0, 0.0), pos2(301.0, 0.0), 150.0).is_none());
        assert!(collision_push(pos2(0.0, 0.0), pos2(300.0, 0.0), 150.0).is_none());
    }

    #[test]
    fn collision_separates_overlapping_discs_exactly() {
        let a = pos2(0.0, 0.0);
        let b = pos2(200.0, 0.0);
        let push = collision_push(a, b, 150.0).unwrap();
        let a2 = a + push;
        let b2 = b - push;
        assert!(((a2 - b2).length() - 300.0).abs() < 1e-3);
    }

    #[test]
    fn collision_resolves_coincident_centers() {
        let push = collision_push(pos2(10.0, 10.0), pos2(10.0, 10.0), 150.0).unwrap();
        assert!(push.length() > 0.0);
    }

    #[test]
    fn centering_moves_centroid_toward_center() {
        let shift = centering_shift(pos2(100.0, 100.0), pos2(0.0, 0.0), 1.0);
        assert_eq!(shift, Vec2::new(-100.0, -100.0));
        let weak = centering_shift(pos2(100.0, 100.0), pos2(0.0, 0.0), 0.1);
        assert!(weak.length() < shift.length());
    }
}
