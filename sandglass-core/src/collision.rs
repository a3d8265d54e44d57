//! Contact detection and response between particles and boundaries
//!
//! All functions here are pure: they take the current particle values and
//! return the corrected ones, leaving buffer bookkeeping to the integrator.

use glam::Vec2;

use crate::world::Boundary;

/// Normal used when a particle centre lies exactly on a boundary
pub const FALLBACK_NORMAL: Vec2 = Vec2::new(0.0, 1.0);

/// Closest point to `point` on the segment `start..end`.
///
/// The projection is clamped to the segment, so the endpoints behave as
/// rounded caps. A zero-length segment collapses to `start`.
pub fn closest_point_on_segment(point: Vec2, start: Vec2, end: Vec2) -> Vec2 {
    let segment = end - start;
    let length_sq = segment.length_squared();
    if length_sq == 0.0 {
        return start;
    }

    let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
    start + segment * t
}

/// Correction produced by two overlapping particles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairContact {
    /// Added to the first particle's position and subtracted from the second's
    pub correction: Vec2,
    /// Added to the first particle's velocity and subtracted from the second's.
    /// Zero when the pair is already separating.
    pub impulse: Vec2,
}

/// Resolve a contact between two equal-mass particles of the same radius.
///
/// Returns `None` when the particles do not overlap or when their centres
/// coincide (there is no usable normal in that case).
pub fn particle_pair_contact(
    p1: Vec2,
    p2: Vec2,
    v1: Vec2,
    v2: Vec2,
    radius: f32,
    restitution: f32,
) -> Option<PairContact> {
    let axis = p1 - p2;
    let dist_sq = axis.length_squared();
    let min_dist = radius * 2.0;

    if dist_sq >= min_dist * min_dist || dist_sq <= 0.0 {
        return None;
    }

    let dist = dist_sq.sqrt();
    let normal = axis / dist;
    let overlap = min_dist - dist;
    let correction = normal * (overlap * 0.5);

    let vel_along_normal = (v1 - v2).dot(normal);
    let impulse = if vel_along_normal > 0.0 {
        Vec2::ZERO
    } else {
        // equal masses: inv_mass1 + inv_mass2 = 2
        let j = -(1.0 + restitution) * vel_along_normal / 2.0;
        normal * j
    };

    Some(PairContact {
        correction,
        impulse,
    })
}

/// Position and velocity of a particle after touching a boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryContact {
    pub position: Vec2,
    pub velocity: Vec2,
    pub normal: Vec2,
}

/// Resolve a particle against an immovable boundary.
///
/// The particle is pushed out along the contact normal by the full overlap.
/// An approaching normal velocity is reflected and scaled by `restitution`;
/// a receding one is zeroed. Tangential velocity always loses `friction`.
pub fn resolve_boundary_contact(
    position: Vec2,
    velocity: Vec2,
    boundary: &Boundary,
    radius: f32,
    restitution: f32,
    friction: f32,
) -> Option<BoundaryContact> {
    let closest = closest_point_on_segment(position, boundary.a, boundary.b);
    let axis = position - closest;
    let dist_sq = axis.length_squared();

    if dist_sq >= radius * radius {
        return None;
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > 0.0 { axis / dist } else { FALLBACK_NORMAL };

    let overlap = radius - dist;
    let position = position + normal * overlap;

    let vn = velocity.dot(normal);
    let v_normal = normal * vn;
    let v_tangent = velocity - v_normal;

    let v_normal = if vn < 0.0 {
        v_normal * -restitution
    } else {
        Vec2::ZERO
    };
    let v_tangent = v_tangent * (1.0 - friction);

    Some(BoundaryContact {
        position,
        velocity: v_normal + v_tangent,
        normal,
    })
}

/// Distance from `point` to the nearest point of `boundary`
pub fn distance_to_boundary(point: Vec2, boundary: &Boundary) -> f32 {
    point.distance(closest_point_on_segment(point, boundary.a, boundary.b))
}
