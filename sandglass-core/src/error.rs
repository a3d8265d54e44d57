//! Error types for the physics core

use thiserror::Error;

/// Failures reported by World and State construction and mutation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PhysicsError {
    #[error("failed to allocate {what} for {requested} entries")]
    AllocationFailed {
        what: &'static str,
        requested: usize,
    },
    #[error("particle capacity of {capacity} exceeded")]
    CapacityExceeded { capacity: usize },
}

impl PhysicsError {
    pub fn allocation(what: &'static str, requested: usize) -> Self {
        Self::AllocationFailed { what, requested }
    }
}
