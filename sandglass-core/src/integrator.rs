use crate::collision::{particle_pair_contact, resolve_boundary_contact};
use crate::state::State;
use crate::world::World;
use log::trace;

/// Number of sub-iterations performed by every `step` call
pub const SUB_STEPS: u32 = 8;

/// Advance the state by `dt` seconds in `SUB_STEPS` equal sub-steps.
///
/// A non-positive or non-finite `dt` leaves the state untouched.
pub fn step(world: &World, state: &mut State, dt: f32) {
    if dt <= 0.0 || !dt.is_finite() {
        trace!("ignoring step with dt = {}", dt);
        return;
    }

    let sub_dt = dt / SUB_STEPS as f32;
    for _ in 0..SUB_STEPS {
        substep(world, state, sub_dt);
    }
}

/// One sub-iteration: forces, particle pairs, boundaries, then integration
pub fn substep(world: &World, state: &mut State, sub_dt: f32) {
    apply_forces(world, state);
    solve_particle_pairs(world, state);
    solve_boundaries(world, state);
    integrate(state, sub_dt);
}

/// Reset every acceleration to gravity; nothing accumulates across sub-steps
fn apply_forces(world: &World, state: &mut State) {
    let count = state.particle_count();
    for accel in &mut state.accelerations[..count] {
        *accel = world.gravity;
    }
}

fn solve_particle_pairs(world: &World, state: &mut State) {
    let count = state.particle_count();
    let radius = world.particle_radius;

    for p1 in 0..count {
        for p2 in (p1 + 1)..count {
            let contact = particle_pair_contact(
                state.positions[p1],
                state.positions[p2],
                state.velocities[p1],
                state.velocities[p2],
                radius,
                world.restitution,
            );

            if let Some(contact) = contact {
                state.positions[p1] += contact.correction;
                state.positions[p2] -= contact.correction;
                state.velocities[p1] += contact.impulse;
                state.velocities[p2] -= contact.impulse;
            }
        }
    }
}

fn solve_boundaries(world: &World, state: &mut State) {
    let count = state.particle_count();

    for p in 0..count {
        for boundary in world.boundaries() {
            let contact = resolve_boundary_contact(
                state.positions[p],
                state.velocities[p],
                boundary,
                world.particle_radius,
                world.restitution,
                world.friction,
            );

            if let Some(contact) = contact {
                state.positions[p] = contact.position;
                state.velocities[p] = contact.velocity;
            }
        }
    }
}

/// Semi-implicit Euler: v += a*dt, then x += v*dt with the updated velocity
fn integrate(state: &mut State, sub_dt: f32) {
    let count = state.particle_count();
    for p in 0..count {
        state.velocities[p] += state.accelerations[p] * sub_dt;
        state.positions[p] += state.velocities[p] * sub_dt;
    }
}
