//! Diagnostics and measurements of a running simulation
//!
//! This module summarises a World/State pair into a handful of numbers
//! (overlap, penetration, energy).

use crate::collision::distance_to_boundary;
use crate::state::State;
use crate::world::World;

/// Snapshot of simulation health
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    pub particle_count: usize,
    pub boundary_count: usize,
    /// Sum over all particle pairs of how far they sit inside each other
    pub total_overlap: f32,
    /// Deepest penetration of any particle into any boundary
    pub max_penetration: f32,
    pub max_speed: f32,
    pub kinetic_energy: f32,
}

impl Metrics {
    /// Name/value pairs in a stable order, for reporting
    pub fn entries(&self) -> [(&'static str, f32); 6] {
        [
            ("particles", self.particle_count as f32),
            ("boundaries", self.boundary_count as f32),
            ("total_overlap", self.total_overlap),
            ("max_penetration", self.max_penetration),
            ("max_speed", self.max_speed),
            ("kinetic_energy", self.kinetic_energy),
        ]
    }
}

/// Measure the current state against its world
pub fn measure(world: &World, state: &State) -> Metrics {
    Metrics {
        particle_count: state.particle_count(),
        boundary_count: world.boundary_count(),
        total_overlap: total_overlap(world, state),
        max_penetration: max_penetration(world, state),
        max_speed: state
            .velocities()
            .iter()
            .map(|v| v.length())
            .fold(0.0, f32::max),
        kinetic_energy: state
            .velocities()
            .iter()
            .map(|v| 0.5 * world.particle_mass * v.length_squared())
            .sum(),
    }
}

/// Total pairwise overlap (O(n^2), same pairs the stepper visits)
pub fn total_overlap(world: &World, state: &State) -> f32 {
    let min_dist = world.particle_radius * 2.0;
    let positions = state.positions();
    let mut total = 0.0;

    for (i, a) in positions.iter().enumerate() {
        for b in &positions[i + 1..] {
            let dist = a.distance(*b);
            if dist < min_dist {
                total += min_dist - dist;
            }
        }
    }

    total
}

pub fn max_penetration(world: &World, state: &State) -> f32 {
    let radius = world.particle_radius;
    let mut deepest = 0.0f32;

    for position in state.positions() {
        for boundary in world.boundaries() {
            let depth = radius - distance_to_boundary(*position, boundary);
            deepest = deepest.max(depth);
        }
    }

    deepest
}
