//! Test helper utilities for the physics core tests

use glam::Vec2;

use crate::collision::distance_to_boundary;
use crate::state::State;
use crate::world::{Boundary, World};

/// Check if two f32 values are approximately equal within tolerance
pub fn approx_eq_f32(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol
}

/// Check if two vectors are approximately equal component-wise
pub fn approx_eq_vec2(a: Vec2, b: Vec2, tol: f32) -> bool {
    approx_eq_f32(a.x, b.x, tol) && approx_eq_f32(a.y, b.y, tol)
}

/// World with no gravity and no boundaries
pub fn weightless_world(max_particles: usize, radius: f32) -> World {
    let mut world = World::new(max_particles, Vec2::ZERO).expect("world allocation");
    world.particle_radius = radius;
    world
}

/// World with a horizontal floor from (0, floor_y) to (width, floor_y),
/// gravity pointing down the screen (+y)
pub fn floor_world(max_particles: usize, gravity: f32, floor_y: f32, width: f32) -> World {
    let mut world = World::new(max_particles, Vec2::new(0.0, gravity)).expect("world allocation");
    world
        .add_boundary(Boundary::new(
            Vec2::new(0.0, floor_y),
            Vec2::new(width, floor_y),
        ))
        .expect("boundary allocation");
    world
}

/// Build a state from `world` holding particles at `positions`
pub fn state_with(world: &World, positions: &[Vec2]) -> State {
    let mut state = State::new(world).expect("state allocation");
    for position in positions {
        state.add_particle(*position).expect("capacity");
    }
    state
}

/// Distance of particle `index` to the world's first boundary
pub fn distance_to_first_boundary(world: &World, state: &State, index: usize) -> f32 {
    distance_to_boundary(state.positions()[index], &world.boundaries()[0])
}
