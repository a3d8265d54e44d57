//! Hourglass scene: configuration, geometry and seeded particle placement

use std::fs;
use std::path::Path;

use glam::Vec2;
use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::PhysicsError;
use crate::integrator::step;
use crate::state::State;
use crate::world::{Boundary, World};

/// Errors raised while loading or building a scene
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("could not read scene file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse scene file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid scene: {0}")]
    Invalid(String),
    #[error(transparent)]
    Physics(#[from] PhysicsError),
}

/// Parameters of the hourglass scene. Missing JSON fields take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub width: f32,
    pub height: f32,
    /// Half-width of the gap between the two funnel tips
    pub neck: f32,
    /// Height (fraction of `height`) where the funnels meet the side walls
    pub funnel_top: f32,
    pub max_particles: usize,
    pub gravity_strength: f32,
    pub particle_radius: f32,
    pub particle_mass: f32,
    pub restitution: f32,
    pub friction: f32,
    /// Particles are spawned between the top wall and this fraction of `height`
    pub fill_fraction: f32,
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 450.0,
            height: 800.0,
            neck: 20.0,
            funnel_top: 0.4,
            max_particles: 800,
            gravity_strength: 980.0,
            particle_radius: 3.0,
            particle_mass: 1.0,
            restitution: 0.3,
            friction: 0.05,
            fill_fraction: 0.4,
            seed: 0x5eed,
        }
    }
}

impl SceneConfig {
    pub fn from_json_str(source: &str) -> Result<Self, SceneError> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let source = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&source)
    }

    /// Reject geometry that cannot hold the requested particles, non-finite
    /// values and non-positive mass.
    ///
    /// Restitution and friction are only checked for plausibility; the engine
    /// accepts any value for them.
    pub fn validate(&self) -> Result<(), SceneError> {
        let constants = [
            ("width", self.width),
            ("height", self.height),
            ("neck", self.neck),
            ("funnel_top", self.funnel_top),
            ("gravity_strength", self.gravity_strength),
            ("particle_radius", self.particle_radius),
            ("particle_mass", self.particle_mass),
            ("restitution", self.restitution),
            ("friction", self.friction),
            ("fill_fraction", self.fill_fraction),
        ];
        if let Some((name, value)) = constants.iter().find(|(_, value)| !value.is_finite()) {
            return Err(SceneError::Invalid(format!(
                "{} must be finite, got {}",
                name, value
            )));
        }

        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(SceneError::Invalid(format!(
                "dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.particle_radius > 0.0) {
            return Err(SceneError::Invalid(format!(
                "particle_radius must be positive, got {}",
                self.particle_radius
            )));
        }
        if !(self.particle_mass > 0.0) {
            return Err(SceneError::Invalid(format!(
                "particle_mass must be positive, got {}",
                self.particle_mass
            )));
        }
        if !(self.neck >= 0.0 && self.neck < self.width / 2.0) {
            return Err(SceneError::Invalid(format!(
                "neck {} does not fit in width {}",
                self.neck, self.width
            )));
        }
        if !(self.funnel_top > 0.0 && self.funnel_top < 0.5) {
            return Err(SceneError::Invalid(format!(
                "funnel_top must lie in (0, 0.5), got {}",
                self.funnel_top
            )));
        }
        // sand starts in the upper chamber, above where the funnels begin
        if !(self.fill_fraction > 0.0 && self.fill_fraction <= self.funnel_top) {
            return Err(SceneError::Invalid(format!(
                "fill_fraction must lie in (0, funnel_top = {}], got {}",
                self.funnel_top, self.fill_fraction
            )));
        }

        let margin = self.particle_radius * 2.0;
        let (x_min, x_max) = self.spawn_x_range();
        let (y_min, y_max) = self.spawn_y_range();
        if x_max <= x_min || y_max <= y_min {
            return Err(SceneError::Invalid(format!(
                "fill region too small for particles of radius {} (margin {})",
                self.particle_radius, margin
            )));
        }

        if !(0.0..=1.0).contains(&self.restitution) {
            warn!("restitution {} outside [0, 1]", self.restitution);
        }
        if !(0.0..=1.0).contains(&self.friction) {
            warn!("friction {} outside [0, 1]", self.friction);
        }

        Ok(())
    }

    fn spawn_x_range(&self) -> (f32, f32) {
        let margin = self.particle_radius * 2.0;
        (margin, self.width - margin)
    }

    fn spawn_y_range(&self) -> (f32, f32) {
        let margin = self.particle_radius * 2.0;
        (margin, self.height * self.fill_fraction - margin)
    }

    /// Outer walls followed by the two funnel segments
    pub fn boundaries(&self) -> Vec<Boundary> {
        let w = self.width;
        let h = self.height;
        let neck = self.neck;
        let funnel_y = h * self.funnel_top;

        vec![
            Boundary::new(Vec2::new(0.0, 0.0), Vec2::new(w, 0.0)),
            Boundary::new(Vec2::new(w, 0.0), Vec2::new(w, h)),
            Boundary::new(Vec2::new(w, h), Vec2::new(0.0, h)),
            Boundary::new(Vec2::new(0.0, h), Vec2::new(0.0, 0.0)),
            Boundary::new(Vec2::new(0.0, funnel_y), Vec2::new(w / 2.0 - neck, h / 2.0)),
            Boundary::new(Vec2::new(w, funnel_y), Vec2::new(w / 2.0 + neck, h / 2.0)),
        ]
    }
}

/// Gravity of magnitude `strength` along `direction`, or straight down
/// (+y, screen coordinates) when no direction is given
pub fn tilt_gravity(direction: Vec2, strength: f32) -> Vec2 {
    if direction.length_squared() > 0.0 {
        direction.normalize() * strength
    } else {
        Vec2::new(0.0, strength)
    }
}

/// A world and the single state simulated in it
#[derive(Debug)]
pub struct Scene {
    pub config: SceneConfig,
    pub world: World,
    pub state: State,
    pub elapsed: f32,
}

impl Scene {
    /// Build the hourglass and fill its upper chamber
    pub fn build(config: &SceneConfig) -> Result<Self, SceneError> {
        config.validate()?;

        let mut world = World::new(
            config.max_particles,
            Vec2::new(0.0, config.gravity_strength),
        )?;
        world.particle_radius = config.particle_radius;
        world.particle_mass = config.particle_mass;
        world.restitution = config.restitution;
        world.friction = config.friction;

        for boundary in config.boundaries() {
            world.add_boundary(boundary)?;
        }

        let mut state = State::new(&world)?;
        let mut rng = Pcg32::seed_from_u64(config.seed);
        let (x_min, x_max) = config.spawn_x_range();
        let (y_min, y_max) = config.spawn_y_range();

        while !state.is_full() {
            let x = rng.random_range(x_min..=x_max);
            let y = rng.random_range(y_min..=y_max);
            state.add_particle(Vec2::new(x, y))?;
        }

        info!(
            "hourglass built: {} particles, {} boundaries, seed {:#x}",
            state.particle_count(),
            world.boundary_count(),
            config.seed
        );

        Ok(Self {
            config: config.clone(),
            world,
            state,
            elapsed: 0.0,
        })
    }

    /// Step the scene by one frame
    pub fn advance(&mut self, dt: f32) {
        step(&self.world, &mut self.state, dt);
        if dt > 0.0 && dt.is_finite() {
            self.elapsed += dt;
        }
    }

    /// Point gravity along `direction` at the configured strength
    pub fn tilt(&mut self, direction: Vec2) {
        let gravity = tilt_gravity(direction, self.config.gravity_strength);
        if gravity != self.world.gravity {
            debug!("gravity set to ({}, {})", gravity.x, gravity.y);
        }
        self.world.set_gravity(gravity);
    }
}
