//! Snapshot persistence for the control tower.
//!
//! A [`TowerSnapshot`] is a serde-friendly copy of everything needed to
//! rebuild a tower mid-run: the tick counter, the full aircraft roster,
//! terminals with gate occupancy, both queues in raw insertion order and
//! the loading registry. Landing order is a function of live aircraft
//! state, so persisting insertion order is sufficient; priorities are
//! recomputed after restore.
//!
//! Snapshots are validated structurally before restore so a corrupted or
//! hand-edited file fails fast instead of producing a tower whose queues
//! reference aircraft that do not exist.

use crate::models::aircraft::Aircraft;
use crate::models::ground::Terminal;
use crate::queues::AircraftQueue;
use crate::tower::engine::ControlTower;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Errors raised while serialising, deserialising or validating a
/// snapshot.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("snapshot validation failed: {0}")]
    Validation(String),
}

/// Complete persisted state of a [`ControlTower`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerSnapshot {
    pub ticks_elapsed: u64,
    pub aircraft: Vec<Aircraft>,
    pub terminals: Vec<Terminal>,
    /// Landing queue callsigns in insertion order, not priority order.
    pub landing_queue: Vec<String>,
    pub takeoff_queue: Vec<String>,
    pub loading_aircraft: BTreeMap<String, u32>,
}

impl From<&ControlTower> for TowerSnapshot {
    fn from(tower: &ControlTower) -> Self {
        Self {
            ticks_elapsed: tower.ticks_elapsed(),
            aircraft: tower.aircraft(),
            terminals: tower.terminals(),
            landing_queue: tower.landing_queue().callsigns().to_vec(),
            takeoff_queue: tower.takeoff_queue().callsigns().to_vec(),
            loading_aircraft: tower.loading_aircraft(),
        }
    }
}

impl TowerSnapshot {
    /// Serialise to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialise from JSON and validate structural integrity.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let snapshot: Self = serde_json::from_str(json)?;
        validate_snapshot(&snapshot)?;
        Ok(snapshot)
    }

    /// Rebuild a running tower from this snapshot.
    pub fn restore(self) -> Result<ControlTower, CheckpointError> {
        validate_snapshot(&self)?;
        let mut landing_queue = AircraftQueue::landing();
        for callsign in self.landing_queue {
            landing_queue.add(callsign);
        }
        let mut takeoff_queue = AircraftQueue::takeoff();
        for callsign in self.takeoff_queue {
            takeoff_queue.add(callsign);
        }
        let mut tower = ControlTower::with_state(
            self.ticks_elapsed,
            self.aircraft,
            landing_queue,
            takeoff_queue,
            self.loading_aircraft,
        );
        for terminal in self.terminals {
            tower.add_terminal(terminal);
        }
        Ok(tower)
    }
}

/// Structural integrity checks for a snapshot:
///
/// - every queued, loading or parked callsign refers to a roster aircraft
/// - the roster carries no duplicate callsigns
/// - no callsign appears in more than one of {landing, takeoff, loading}
pub fn validate_snapshot(snapshot: &TowerSnapshot) -> Result<(), CheckpointError> {
    let mut roster = HashSet::new();
    for aircraft in &snapshot.aircraft {
        if !roster.insert(aircraft.callsign()) {
            return Err(CheckpointError::Validation(format!(
                "duplicate callsign in roster: {}",
                aircraft.callsign()
            )));
        }
    }

    let check_known = |callsign: &str, place: &str| {
        if roster.contains(callsign) {
            Ok(())
        } else {
            Err(CheckpointError::Validation(format!(
                "{} references unknown aircraft {}",
                place, callsign
            )))
        }
    };
    for callsign in &snapshot.landing_queue {
        check_known(callsign, "landing queue")?;
    }
    for callsign in &snapshot.takeoff_queue {
        check_known(callsign, "takeoff queue")?;
    }
    for callsign in snapshot.loading_aircraft.keys() {
        check_known(callsign, "loading registry")?;
    }
    for terminal in &snapshot.terminals {
        for gate in terminal.gates() {
            if let Some(occupant) = gate.occupant() {
                check_known(occupant, "gate occupant")?;
            }
        }
    }

    let mut placed = HashSet::new();
    let occupancy = snapshot
        .landing_queue
        .iter()
        .chain(snapshot.takeoff_queue.iter())
        .chain(snapshot.loading_aircraft.keys());
    for callsign in occupancy {
        if !placed.insert(callsign.as_str()) {
            return Err(CheckpointError::Validation(format!(
                "aircraft {} appears in more than one queue",
                callsign
            )));
        }
    }

    Ok(())
}
