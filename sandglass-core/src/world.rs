use glam::Vec2;
use log::{debug, warn};

use crate::error::PhysicsError;

/// Boundary storage starts with room for this many segments and doubles when full
pub const INITIAL_BOUNDARY_CAPACITY: usize = 16;

pub const DEFAULT_PARTICLE_RADIUS: f32 = 5.0;
pub const DEFAULT_PARTICLE_MASS: f32 = 1.0;
pub const DEFAULT_RESTITUTION: f32 = 0.4;
pub const DEFAULT_FRICTION: f32 = 0.05;

/// A static, immovable line segment particles collide against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub a: Vec2,
    pub b: Vec2,
}

impl Boundary {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }
}

/// The static description of a simulation: global constants and wall geometry.
///
/// Every `State` built from a world is sized to `max_particles`. The world is
/// only read during a step, so gravity and the material constants may be
/// changed freely between steps.
#[derive(Debug)]
pub struct World {
    pub gravity: Vec2,
    pub particle_radius: f32,
    pub particle_mass: f32,
    /// Not validated; values above 1.0 add energy on every bounce
    pub restitution: f32,
    /// Not validated; scales tangential velocity by `1 - friction` on contact
    pub friction: f32,
    boundaries: Vec<Boundary>,
    boundary_capacity: usize,
    max_particles: usize,
}

impl World {
    /// Create a world with default material constants and room for
    /// `INITIAL_BOUNDARY_CAPACITY` boundaries
    pub fn new(max_particles: usize, gravity: Vec2) -> Result<Self, PhysicsError> {
        let mut boundaries = Vec::new();
        boundaries
            .try_reserve_exact(INITIAL_BOUNDARY_CAPACITY)
            .map_err(|_| {
                warn!("could not allocate initial boundary storage");
                PhysicsError::allocation("boundaries", INITIAL_BOUNDARY_CAPACITY)
            })?;

        debug!(
            "created world: max_particles={}, gravity=({}, {})",
            max_particles, gravity.x, gravity.y
        );

        Ok(Self {
            gravity,
            particle_radius: DEFAULT_PARTICLE_RADIUS,
            particle_mass: DEFAULT_PARTICLE_MASS,
            restitution: DEFAULT_RESTITUTION,
            friction: DEFAULT_FRICTION,
            boundaries,
            boundary_capacity: INITIAL_BOUNDARY_CAPACITY,
            max_particles,
        })
    }

    /// Append a boundary, doubling the storage when it is full.
    ///
    /// If the storage cannot grow the boundary is not added and the existing
    /// ones are left untouched.
    pub fn add_boundary(&mut self, boundary: Boundary) -> Result<(), PhysicsError> {
        if self.boundaries.len() >= self.boundary_capacity {
            let new_capacity = (self.boundary_capacity * 2).max(1);
            let additional = new_capacity - self.boundaries.len();
            self.boundaries
                .try_reserve_exact(additional)
                .map_err(|_| {
                    warn!(
                        "could not grow boundary storage from {} to {}",
                        self.boundary_capacity, new_capacity
                    );
                    PhysicsError::allocation("boundaries", new_capacity)
                })?;
            debug!(
                "boundary storage grown from {} to {}",
                self.boundary_capacity, new_capacity
            );
            self.boundary_capacity = new_capacity;
        }

        self.boundaries.push(boundary);
        Ok(())
    }

    /// Replace gravity; takes effect on the next step
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    pub fn boundary_count(&self) -> usize {
        self.boundaries.len()
    }

    pub fn boundary_capacity(&self) -> usize {
        self.boundary_capacity
    }

    pub fn max_particles(&self) -> usize {
        self.max_particles
    }
}
