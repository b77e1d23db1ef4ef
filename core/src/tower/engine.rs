//! Control tower engine.
//!
//! The tower owns the aircraft roster, the terminal list, both runway
//! queues and the loading registry, and drives one discrete simulation
//! step per [`ControlTower::tick`] call.
//!
//! # Tick loop
//!
//! ```text
//! For each aircraft in roster order:
//! 1. Per-tick aircraft update (fuel burn, loading progress)
//! 2. AWAY and WAIT resolve instantly to the next task
//! 3. Runway arbitration gated by tick parity: on landing ticks try one
//!    landing, falling back to one takeoff; otherwise one takeoff only
//! 4. Re-admit every aircraft into the structure matching its task
//! After the loop: loading countdown, a final admission pass, then the
//! tick counter advances by exactly one.
//! ```
//!
//! The arbitration step deliberately runs once per aircraft iterated, not
//! once per tick, so a tick can service up to one landing/takeoff per
//! roster member. See DESIGN.md for the rationale behind keeping this.
//!
//! # Determinism
//!
//! Everything is single-threaded and single-pass: same starting state,
//! same sequence of tick() calls, identical results. Callers must
//! serialise access; the tower performs no internal locking.

use crate::models::aircraft::{Aircraft, AircraftKind};
use crate::models::event::{Event, EventLog};
use crate::models::ground::{Gate, Terminal};
use crate::models::tasks::TaskType;
use crate::queues::AircraftQueue;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Errors surfaced by tower registration operations.
///
/// Resource contention during a tick is never an error; failed landing
/// attempts report `false` internally and retry on a later tick.
#[derive(Debug, Error, PartialEq)]
pub enum TowerError {
    #[error("no suitable gate available for aircraft {callsign}")]
    NoSuitableGate { callsign: String },

    #[error("aircraft {callsign} is already managed by this tower")]
    DuplicateCallsign { callsign: String },
}

/// The airport's control tower.
///
/// # Example
///
/// ```
/// use towersim_core_rs::models::ground::{Gate, Terminal, TerminalKind};
/// use towersim_core_rs::tower::ControlTower;
///
/// let mut tower = ControlTower::new();
/// let mut terminal = Terminal::new(TerminalKind::Airplane, 1);
/// terminal.add_gate(Gate::new(1)).unwrap();
/// tower.add_terminal(terminal);
///
/// assert_eq!(tower.ticks_elapsed(), 0);
/// tower.tick();
/// assert_eq!(tower.ticks_elapsed(), 1);
/// ```
pub struct ControlTower {
    /// Number of ticks elapsed; may start non-zero for resumed state
    ticks_elapsed: u64,

    /// All aircraft under this tower's jurisdiction, in registration order
    aircraft: Vec<Aircraft>,

    /// All terminals, in registration order
    terminals: Vec<Terminal>,

    /// Aircraft waiting in the air to land
    landing_queue: AircraftQueue,

    /// Aircraft waiting on the ground to take off
    takeoff_queue: AircraftQueue,

    /// Loading aircraft mapped to ticks remaining, ordered by callsign
    loading_aircraft: BTreeMap<String, u32>,

    /// All events recorded so far
    event_log: EventLog,
}

impl ControlTower {
    /// Create a tower with no aircraft, terminals or queued work.
    pub fn new() -> Self {
        Self::with_state(
            0,
            Vec::new(),
            AircraftQueue::landing(),
            AircraftQueue::takeoff(),
            BTreeMap::new(),
        )
    }

    /// Create a tower from previously saved state. The terminal list
    /// starts empty; terminals are registered afterwards via
    /// [`ControlTower::add_terminal`].
    pub fn with_state(
        ticks_elapsed: u64,
        aircraft: Vec<Aircraft>,
        landing_queue: AircraftQueue,
        takeoff_queue: AircraftQueue,
        loading_aircraft: BTreeMap<String, u32>,
    ) -> Self {
        Self {
            ticks_elapsed,
            aircraft,
            terminals: Vec::new(),
            landing_queue,
            takeoff_queue,
            loading_aircraft,
            event_log: EventLog::new(),
        }
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Add a terminal to this tower's jurisdiction.
    pub fn add_terminal(&mut self, terminal: Terminal) {
        self.event_log.log(Event::TerminalAdded {
            tick: self.ticks_elapsed,
            terminal: terminal.number(),
        });
        self.terminals.push(terminal);
    }

    /// Add an aircraft to this tower's jurisdiction.
    ///
    /// An aircraft whose current task is WAIT or LOAD must be parked at a
    /// suitable gate immediately. If no gate can be found the registration
    /// fails atomically: the error propagates and the roster, queues and
    /// gates are left untouched.
    pub fn add_aircraft(&mut self, aircraft: Aircraft) -> Result<(), TowerError> {
        if self.index_of(aircraft.callsign()).is_some() {
            return Err(TowerError::DuplicateCallsign {
                callsign: aircraft.callsign().to_string(),
            });
        }
        let task = aircraft.tasks().current_task().kind();
        if matches!(task, TaskType::Wait | TaskType::Load) {
            self.park_at_suitable_gate(aircraft.callsign(), aircraft.kind())?;
        }
        let callsign = aircraft.callsign().to_string();
        self.aircraft.push(aircraft);
        self.event_log.log(Event::AircraftAdded {
            tick: self.ticks_elapsed,
            callsign: callsign.clone(),
        });
        self.place_aircraft_in_queues(&callsign);
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of ticks elapsed, including any carried over from a resumed
    /// save.
    pub fn ticks_elapsed(&self) -> u64 {
        self.ticks_elapsed
    }

    /// Snapshot of all aircraft in registration order.
    pub fn aircraft(&self) -> Vec<Aircraft> {
        self.aircraft.clone()
    }

    /// Snapshot of all terminals in registration order.
    pub fn terminals(&self) -> Vec<Terminal> {
        self.terminals.clone()
    }

    pub fn get_aircraft(&self, callsign: &str) -> Option<&Aircraft> {
        self.aircraft.iter().find(|a| a.callsign() == callsign)
    }

    /// Mutable aircraft access for external state changes between ticks,
    /// e.g. declaring an emergency.
    pub fn get_aircraft_mut(&mut self, callsign: &str) -> Option<&mut Aircraft> {
        self.aircraft.iter_mut().find(|a| a.callsign() == callsign)
    }

    pub fn landing_queue(&self) -> &AircraftQueue {
        &self.landing_queue
    }

    pub fn takeoff_queue(&self) -> &AircraftQueue {
        &self.takeoff_queue
    }

    /// Snapshot of the loading registry, ordered by callsign.
    pub fn loading_aircraft(&self) -> BTreeMap<String, u32> {
        self.loading_aircraft.clone()
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Roster slice for queue state lookups.
    pub fn roster(&self) -> &[Aircraft] {
        &self.aircraft
    }

    // ========================================================================
    // Gate allocation
    // ========================================================================

    /// Find an unoccupied gate in a compatible, non-emergency terminal.
    ///
    /// Terminals are checked in registration order; a compatible terminal
    /// with no free gate is skipped and the search continues with the
    /// next one.
    pub fn find_unoccupied_gate(&self, aircraft: &Aircraft) -> Result<&Gate, TowerError> {
        for terminal in &self.terminals {
            if !terminal.kind().accepts(aircraft.kind()) || terminal.has_emergency() {
                continue;
            }
            if let Some(gate) = terminal.find_unoccupied_gate() {
                return Ok(gate);
            }
        }
        Err(TowerError::NoSuitableGate {
            callsign: aircraft.callsign().to_string(),
        })
    }

    /// Gate where the given aircraft is parked, or `None` if it is not
    /// parked anywhere.
    pub fn find_gate_of(&self, callsign: &str) -> Option<&Gate> {
        self.terminals
            .iter()
            .find_map(|terminal| terminal.gate_of(callsign))
    }

    /// Park the aircraft at the first free gate of the first compatible,
    /// non-emergency terminal. Returns (terminal number, gate number).
    fn park_at_suitable_gate(
        &mut self,
        callsign: &str,
        kind: AircraftKind,
    ) -> Result<(u32, u32), TowerError> {
        for terminal in &mut self.terminals {
            if !terminal.kind().accepts(kind) || terminal.has_emergency() {
                continue;
            }
            if let Some(gate) = terminal.park_first_free(callsign) {
                return Ok((terminal.number(), gate));
            }
        }
        Err(TowerError::NoSuitableGate {
            callsign: callsign.to_string(),
        })
    }

    // ========================================================================
    // Arbitration
    // ========================================================================

    /// Attempt to land the aircraft at the front of the landing queue and
    /// park it at a suitable gate.
    ///
    /// Returns `false` with no state change when the queue is empty or no
    /// gate is available; the front aircraft stays queued with no penalty
    /// and is retried on a later attempt. On success the aircraft is
    /// parked, unloaded, removed from the queue and advanced to its next
    /// task.
    pub fn try_land_aircraft(&mut self) -> bool {
        let Some(callsign) = self.landing_queue.peek(&self.aircraft).map(str::to_string) else {
            return false;
        };
        let Some(index) = self.index_of(&callsign) else {
            return false;
        };
        let kind = self.aircraft[index].kind();
        let (terminal, gate) = match self.park_at_suitable_gate(&callsign, kind) {
            Ok(location) => location,
            Err(_) => {
                self.event_log.log(Event::LandingDeferred {
                    tick: self.ticks_elapsed,
                    callsign,
                });
                return false;
            }
        };
        self.landing_queue.remove(&self.aircraft);
        self.aircraft[index].unload();
        self.aircraft[index].tasks_mut().advance();
        self.event_log.log(Event::Landed {
            tick: self.ticks_elapsed,
            callsign,
            terminal,
            gate,
        });
        true
    }

    /// Allow the aircraft at the front of the takeoff queue to take off.
    ///
    /// No resource check is performed; runway contention is implicit in
    /// the FIFO order. Does nothing when the queue is empty.
    pub fn try_take_off_aircraft(&mut self) {
        if let Some(callsign) = self.takeoff_queue.remove(&self.aircraft) {
            if let Some(index) = self.index_of(&callsign) {
                self.aircraft[index].tasks_mut().advance();
            }
            self.event_log.log(Event::TookOff {
                tick: self.ticks_elapsed,
                callsign,
            });
        }
    }

    /// Count down the loading registry by one tick per entry. Entries
    /// that reach zero are removed; the aircraft leaves its gate and
    /// advances to its next task.
    pub fn load_aircraft(&mut self) {
        // iterate a stable key snapshot; entries are removed mid-loop
        let callsigns: Vec<String> = self.loading_aircraft.keys().cloned().collect();
        for callsign in callsigns {
            let Some(remaining) = self.loading_aircraft.get(&callsign).copied() else {
                continue;
            };
            let remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                self.loading_aircraft.remove(&callsign);
                for terminal in &mut self.terminals {
                    if terminal.vacate_aircraft(&callsign) {
                        break;
                    }
                }
                if let Some(index) = self.index_of(&callsign) {
                    self.aircraft[index].tasks_mut().advance();
                }
                self.event_log.log(Event::LoadingFinished {
                    tick: self.ticks_elapsed,
                    callsign,
                });
            } else {
                self.loading_aircraft.insert(callsign, remaining);
            }
        }
    }

    // ========================================================================
    // Admission
    // ========================================================================

    /// Admit the aircraft into the structure matching its current task.
    /// Idempotent: an aircraft already present is left where it is, and
    /// AWAY/WAIT aircraft are never queued.
    pub fn place_aircraft_in_queues(&mut self, callsign: &str) {
        let Some(aircraft) = self.get_aircraft(callsign) else {
            return;
        };
        let task = aircraft.tasks().current_task().kind();
        let loading_time = aircraft.loading_time();
        match task {
            TaskType::Land => {
                if !self.landing_queue.contains(callsign) {
                    self.landing_queue.add(callsign);
                }
            }
            TaskType::Takeoff => {
                if !self.takeoff_queue.contains(callsign) {
                    self.takeoff_queue.add(callsign);
                }
            }
            TaskType::Load => {
                if !self.loading_aircraft.contains_key(callsign) {
                    self.loading_aircraft
                        .insert(callsign.to_string(), loading_time);
                    self.event_log.log(Event::LoadingStarted {
                        tick: self.ticks_elapsed,
                        callsign: callsign.to_string(),
                        ticks_remaining: loading_time,
                    });
                }
            }
            TaskType::Away | TaskType::Wait => {}
        }
    }

    /// Run admission for every aircraft in the roster.
    pub fn place_all_aircraft_in_queues(&mut self) {
        let callsigns: Vec<String> = self
            .aircraft
            .iter()
            .map(|a| a.callsign().to_string())
            .collect();
        for callsign in callsigns {
            self.place_aircraft_in_queues(&callsign);
        }
    }

    // ========================================================================
    // Tick loop
    // ========================================================================

    /// Advance the simulation by one tick.
    pub fn tick(&mut self) {
        for index in 0..self.aircraft.len() {
            self.aircraft[index].tick();

            // AWAY and WAIT are instantaneous states with no queue residency
            let task = self.aircraft[index].tasks().current_task().kind();
            if task == TaskType::Away || task == TaskType::Wait {
                self.aircraft[index].tasks_mut().advance();
            }

            // Parity test is (ticks_elapsed - 1) % 2 == 0, written without
            // the wrap at zero: tick zero takes the takeoff-only branch.
            if self.ticks_elapsed % 2 == 1 {
                if !self.try_land_aircraft() {
                    self.try_take_off_aircraft();
                }
            } else {
                self.try_take_off_aircraft();
            }

            self.place_all_aircraft_in_queues();
        }

        self.load_aircraft();
        self.place_all_aircraft_in_queues();
        self.ticks_elapsed += 1;
    }

    // ========================================================================
    // Encoding
    // ========================================================================

    /// Machine-readable representation of the loading registry:
    ///
    /// ```text
    /// LoadingAircraft:numAircraft
    /// callsign1:ticksRemaining1,...,callsignN:ticksRemainingN
    /// ```
    ///
    /// The entry line is omitted when the registry is empty. Entries are
    /// in callsign order.
    pub fn encode_loading_aircraft(&self) -> String {
        let mut encoded = format!("LoadingAircraft:{}", self.loading_aircraft.len());
        if !self.loading_aircraft.is_empty() {
            encoded.push('\n');
            encoded.push_str(
                &self
                    .loading_aircraft
                    .iter()
                    .map(|(callsign, ticks)| format!("{}:{}", callsign, ticks))
                    .collect::<Vec<_>>()
                    .join(","),
            );
        }
        encoded
    }

    fn index_of(&self, callsign: &str) -> Option<usize> {
        self.aircraft.iter().position(|a| a.callsign() == callsign)
    }
}

impl Default for ControlTower {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ControlTower {
    /// Single-line summary, e.g.
    /// `ControlTower: 3 terminals, 12 total aircraft (3 LAND, 4 TAKEOFF, 2 LOAD)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ControlTower: {} terminals, {} total aircraft ({} LAND, {} TAKEOFF, {} LOAD)",
            self.terminals.len(),
            self.aircraft.len(),
            self.landing_queue.len(),
            self.takeoff_queue.len(),
            self.loading_aircraft.len()
        )
    }
}
