//! # towersim-core-rs
//!
//! Deterministic airport control tower simulation engine.
//!
//! The simulated airport consists of aircraft cycling through task lists
//! (AWAY, LAND, WAIT, LOAD, TAKEOFF), terminals with gates for parking,
//! and a control tower that arbitrates runway access each tick. Landing
//! aircraft compete in a priority queue driven by live aircraft state
//! (emergencies first, then critically low fuel, then passenger
//! aircraft); takeoffs are strictly first-come-first-served.
//!
//! ## Modules
//!
//! - [`models`] — aircraft, task lists, terminals, gates and the event log
//! - [`queues`] — the runway queues and their selection disciplines
//! - [`tower`] — the control tower engine and JSON checkpointing
//! - [`save`] — reading the line-based text save format
//!
//! ## Example
//!
//! ```
//! use towersim_core_rs::models::ground::{Gate, Terminal, TerminalKind};
//! use towersim_core_rs::models::tasks::{Task, TaskList, TaskType};
//! use towersim_core_rs::models::aircraft::{Aircraft, AircraftModel};
//! use towersim_core_rs::tower::ControlTower;
//!
//! let mut tower = ControlTower::new();
//!
//! let mut terminal = Terminal::new(TerminalKind::Airplane, 1);
//! terminal.add_gate(Gate::new(1)).unwrap();
//! tower.add_terminal(terminal);
//!
//! let tasks = TaskList::new(vec![
//!     Task::new(TaskType::Land),
//!     Task::new(TaskType::Wait),
//!     Task::with_load(TaskType::Load, 60),
//!     Task::new(TaskType::Takeoff),
//!     Task::new(TaskType::Away),
//! ]).unwrap();
//! let aircraft = Aircraft::new(
//!     "QFA481".to_string(),
//!     AircraftModel::AirbusA320,
//!     tasks,
//!     10_000.0,
//!     0,
//! ).unwrap();
//! tower.add_aircraft(aircraft).unwrap();
//!
//! assert_eq!(tower.landing_queue().len(), 1);
//! tower.tick();
//! assert_eq!(tower.ticks_elapsed(), 1);
//! ```
//!
//! The engine is single-threaded by design: one tower, ticked by one
//! caller, produces bit-identical runs for identical inputs.

pub mod models;
pub mod queues;
pub mod save;
pub mod tower;

pub use models::aircraft::{Aircraft, AircraftError, AircraftKind, AircraftModel};
pub use models::event::{Event, EventLog};
pub use models::ground::{Gate, GateError, Terminal, TerminalError, TerminalKind};
pub use models::tasks::{Task, TaskList, TaskListError, TaskType};
pub use queues::{AircraftQueue, QueueDiscipline, CRITICAL_FUEL_PERCENT};
pub use save::MalformedSaveError;
pub use tower::{CheckpointError, ControlTower, TowerError, TowerSnapshot};
