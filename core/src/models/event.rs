//! Event logging for simulation replay and auditing.
//!
//! The tower records a typed event for every significant state change it
//! makes during a tick: arrivals into its jurisdiction, landings,
//! takeoffs, and loading progress. The log is append-only and ordered by
//! occurrence; every event carries the tick it happened on.

use serde::{Deserialize, Serialize};

/// A state change recorded by the control tower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// An aircraft entered the tower's jurisdiction
    AircraftAdded { tick: u64, callsign: String },

    /// A terminal was registered with the tower
    TerminalAdded { tick: u64, terminal: u32 },

    /// An aircraft landed and was parked at a gate
    Landed {
        tick: u64,
        callsign: String,
        terminal: u32,
        gate: u32,
    },

    /// A landing attempt failed because no suitable gate was free;
    /// the aircraft stays queued and will be retried
    LandingDeferred { tick: u64, callsign: String },

    /// An aircraft left the front of the takeoff queue
    TookOff { tick: u64, callsign: String },

    /// An aircraft entered the loading registry
    LoadingStarted {
        tick: u64,
        callsign: String,
        ticks_remaining: u32,
    },

    /// An aircraft finished loading and left its gate
    LoadingFinished { tick: u64, callsign: String },
}

impl Event {
    /// Tick on which the event occurred.
    pub fn tick(&self) -> u64 {
        match self {
            Event::AircraftAdded { tick, .. }
            | Event::TerminalAdded { tick, .. }
            | Event::Landed { tick, .. }
            | Event::LandingDeferred { tick, .. }
            | Event::TookOff { tick, .. }
            | Event::LoadingStarted { tick, .. }
            | Event::LoadingFinished { tick, .. } => *tick,
        }
    }
}

/// Append-only log of simulation events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events recorded on the given tick, in occurrence order.
    pub fn events_for_tick(&self, tick: u64) -> Vec<&Event> {
        self.events.iter().filter(|e| e.tick() == tick).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_for_tick_filters() {
        let mut log = EventLog::new();
        log.log(Event::AircraftAdded {
            tick: 0,
            callsign: "ABC123".to_string(),
        });
        log.log(Event::TookOff {
            tick: 1,
            callsign: "ABC123".to_string(),
        });
        log.log(Event::LandingDeferred {
            tick: 1,
            callsign: "XYZ987".to_string(),
        });

        assert_eq!(log.len(), 3);
        assert_eq!(log.events_for_tick(1).len(), 2);
        assert_eq!(log.events_for_tick(5).len(), 0);
    }
}
