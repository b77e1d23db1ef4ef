//! Control tower: the scheduler driving the simulation.

pub mod checkpoint;
pub mod engine;

pub use checkpoint::{validate_snapshot, CheckpointError, TowerSnapshot};
pub use engine::{ControlTower, TowerError};
