pub mod collision;
pub mod diagnostics;
pub mod error;
pub mod integrator;
pub mod scene;
pub mod state;
pub mod world;

pub use diagnostics::{measure, Metrics};
pub use error::PhysicsError;
pub use integrator::{step, substep, SUB_STEPS};
pub use scene::{tilt_gravity, Scene, SceneConfig, SceneError};
pub use state::State;
pub use world::{Boundary, World, INITIAL_BOUNDARY_CAPACITY};

// Test helpers module (public for integration tests)
// Always compiled - integration tests are separate crates and need access
pub mod tests;
