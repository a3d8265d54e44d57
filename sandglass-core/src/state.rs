//! Per-particle dynamic buffers

use glam::Vec2;
use log::{debug, warn};

use crate::error::PhysicsError;
use crate::world::World;

/// Dynamic state of one simulation: three parallel buffers sharing an index
/// space, all sized to the capacity of the world the state was created from.
///
/// Only the first `particle_count` slots are live.
#[derive(Debug, Clone)]
pub struct State {
    particle_count: usize,
    pub(crate) positions: Vec<Vec2>,
    pub(crate) velocities: Vec<Vec2>,
    pub(crate) accelerations: Vec<Vec2>,
}

fn zeroed_buffer(what: &'static str, len: usize) -> Result<Vec<Vec2>, PhysicsError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| PhysicsError::allocation(what, len))?;
    buffer.resize(len, Vec2::ZERO);
    Ok(buffer)
}

impl State {
    /// Allocate zeroed buffers for `world.max_particles()` particles
    pub fn new(world: &World) -> Result<Self, PhysicsError> {
        let capacity = world.max_particles();
        let state = Self {
            particle_count: 0,
            positions: zeroed_buffer("positions", capacity)?,
            velocities: zeroed_buffer("velocities", capacity)?,
            accelerations: zeroed_buffer("accelerations", capacity)?,
        };
        debug!("created state with capacity {}", capacity);
        Ok(state)
    }

    /// Add a particle at rest and return its index
    pub fn add_particle(&mut self, position: Vec2) -> Result<usize, PhysicsError> {
        let index = self.particle_count;
        if index >= self.capacity() {
            warn!("rejected particle: capacity {} reached", self.capacity());
            return Err(PhysicsError::CapacityExceeded {
                capacity: self.capacity(),
            });
        }

        self.positions[index] = position;
        self.velocities[index] = Vec2::ZERO;
        self.accelerations[index] = Vec2::ZERO;
        self.particle_count += 1;
        Ok(index)
    }

    pub fn particle_count(&self) -> usize {
        self.particle_count
    }

    pub fn capacity(&self) -> usize {
        self.positions.len()
    }

    pub fn is_full(&self) -> bool {
        self.particle_count >= self.capacity()
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions[..self.particle_count]
    }

    pub fn velocities(&self) -> &[Vec2] {
        &self.velocities[..self.particle_count]
    }

    pub fn accelerations(&self) -> &[Vec2] {
        &self.accelerations[..self.particle_count]
    }

    /// Mutable access to live velocities, for callers that launch particles
    pub fn velocities_mut(&mut self) -> &mut [Vec2] {
        &mut self.velocities[..self.particle_count]
    }
}
