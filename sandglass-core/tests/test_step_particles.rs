//! Stepper tests: integration and particle-particle resolution

use glam::Vec2;
use proptest::prelude::*;
use sandglass_core::diagnostics::total_overlap;
use sandglass_core::tests::test_helpers::{approx_eq_f32, state_with, weightless_world};
use sandglass_core::{step, substep, State, World, SUB_STEPS};

const DT: f32 = 1.0 / 60.0;

#[test]
fn test_non_positive_dt_is_a_no_op() {
    let world = World::new(1, Vec2::new(0.0, 980.0)).unwrap();
    let mut state = state_with(&world, &[Vec2::new(10.0, 10.0)]);

    step(&world, &mut state, 0.0);
    step(&world, &mut state, -DT);
    step(&world, &mut state, f32::NAN);

    assert_eq!(state.positions()[0], Vec2::new(10.0, 10.0));
    assert_eq!(state.velocities()[0], Vec2::ZERO);
    assert_eq!(state.accelerations()[0], Vec2::ZERO);
}

#[test]
fn test_empty_state_steps_cleanly() {
    let world = World::new(4, Vec2::new(0.0, 980.0)).unwrap();
    let mut state = State::new(&world).unwrap();
    step(&world, &mut state, DT);
    assert_eq!(state.particle_count(), 0);
}

#[test]
fn test_free_fall_uses_semi_implicit_euler() {
    let g = 980.0;
    let world = World::new(1, Vec2::new(0.0, g)).unwrap();
    let mut state = state_with(&world, &[Vec2::ZERO]);

    step(&world, &mut state, DT);

    // velocity updated before position in each sub-step:
    // y = g * h^2 * (1 + 2 + ... + n)
    let n = SUB_STEPS as f32;
    let h = DT / n;
    let expected_y = g * h * h * n * (n + 1.0) / 2.0;

    assert_eq!(state.accelerations()[0], Vec2::new(0.0, g));
    assert!(approx_eq_f32(state.velocities()[0].y, g * DT, 1e-3));
    assert!(approx_eq_f32(state.positions()[0].y, expected_y, 1e-4));
    assert_eq!(state.positions()[0].x, 0.0);
}

#[test]
fn test_gravity_change_applies_on_next_step() {
    let mut world = World::new(1, Vec2::new(0.0, 980.0)).unwrap();
    let mut state = state_with(&world, &[Vec2::ZERO]);

    world.set_gravity(Vec2::new(-980.0, 0.0));
    step(&world, &mut state, DT);

    assert!(state.positions()[0].x < 0.0);
    assert_eq!(state.positions()[0].y, 0.0);
}

#[test]
fn test_overlapping_pair_separates_to_contact_distance() {
    let radius = 5.0;
    let world = weightless_world(2, radius);
    let mut state = state_with(&world, &[Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0)]);

    step(&world, &mut state, DT);

    let dist = state.positions()[0].distance(state.positions()[1]);
    assert!(approx_eq_f32(dist, 2.0 * radius, 1e-4), "distance {}", dist);
    // resting particles pushed apart gain no velocity
    assert_eq!(state.velocities()[0], Vec2::ZERO);
    assert_eq!(state.velocities()[1], Vec2::ZERO);
}

#[test]
fn test_pair_separates_under_gravity() {
    let radius = 10.0;
    let world = {
        let mut world = World::new(2, Vec2::new(0.0, 980.0)).unwrap();
        world.particle_radius = radius;
        world
    };
    let mut state = state_with(&world, &[Vec2::new(0.0, 0.0), Vec2::new(6.0, 8.0)]);

    step(&world, &mut state, DT);

    let dist = state.positions()[0].distance(state.positions()[1]);
    assert!(approx_eq_f32(dist, 2.0 * radius, 1e-3), "distance {}", dist);
}

#[test]
fn test_coincident_particles_are_left_alone() {
    let world = weightless_world(2, 5.0);
    let mut state = state_with(&world, &[Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0)]);

    step(&world, &mut state, DT);

    assert_eq!(state.positions()[0], Vec2::new(1.0, 1.0));
    assert_eq!(state.positions()[1], Vec2::new(1.0, 1.0));
    assert!(state.positions().iter().all(|p| p.is_finite()));
}

#[test]
fn test_head_on_collision_exchanges_momentum() {
    let world = {
        let mut world = weightless_world(2, 5.0);
        world.restitution = 1.0;
        world
    };
    let mut state = state_with(&world, &[Vec2::new(0.0, 0.0), Vec2::new(9.0, 0.0)]);
    state.velocities_mut()[0] = Vec2::new(10.0, 0.0);

    substep(&world, &mut state, DT / SUB_STEPS as f32);

    // perfectly elastic equal masses swap velocities
    assert!(approx_eq_f32(state.velocities()[0].x, 0.0, 1e-4));
    assert!(approx_eq_f32(state.velocities()[1].x, 10.0, 1e-4));
    let momentum: Vec2 = state.velocities().iter().copied().sum();
    assert!(approx_eq_f32(momentum.x, 10.0, 1e-4));
}

#[test]
fn test_chain_overlap_decreases_monotonically() {
    let radius = 5.0;
    let positions: Vec<Vec2> = (0..10).map(|i| Vec2::new(i as f32 * 7.5, 0.0)).collect();
    let world = weightless_world(positions.len(), radius);
    let mut state = state_with(&world, &positions);

    let mut previous = total_overlap(&world, &state);
    let initial = previous;
    for _ in 0..20 {
        step(&world, &mut state, DT);
        let current = total_overlap(&world, &state);
        assert!(
            current <= previous + 1e-4,
            "overlap grew from {} to {}",
            previous,
            current
        );
        previous = current;
    }

    assert!(previous < initial * 0.01);
}

proptest! {
    #[test]
    fn prop_overlapping_pair_reaches_contact(
        x in -100.0f32..100.0,
        y in -100.0f32..100.0,
        angle in 0.0f32..std::f32::consts::TAU,
        fraction in 0.05f32..0.99,
        radius in 1.0f32..10.0,
    ) {
        let world = weightless_world(2, radius);
        let first = Vec2::new(x, y);
        let second = first + Vec2::from_angle(angle) * (2.0 * radius * fraction);
        let mut state = state_with(&world, &[first, second]);

        step(&world, &mut state, DT);

        let dist = state.positions()[0].distance(state.positions()[1]);
        prop_assert!((dist - 2.0 * radius).abs() <= 1e-3, "distance {} for radius {}", dist, radius);
    }
}
