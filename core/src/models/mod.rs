//! Domain models for the tower simulation.

pub mod aircraft;
pub mod event;
pub mod ground;
pub mod tasks;
