//! Ground resources: gates grouped into terminals.
//!
//! A gate holds at most one aircraft, tracked by callsign. A terminal
//! groups gates of a single compatibility class (airplane or helicopter)
//! and can be placed under an emergency declaration, which removes it from
//! gate allocation entirely.

use crate::models::aircraft::AircraftKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by gate occupancy operations
#[derive(Debug, Error, PartialEq)]
pub enum GateError {
    #[error("gate {gate} is already occupied by {occupant}")]
    Occupied { gate: u32, occupant: String },
}

/// Errors raised by terminal operations
#[derive(Debug, Error, PartialEq)]
pub enum TerminalError {
    #[error("terminal {terminal} already has the maximum of {max} gates")]
    GatesFull { terminal: u32, max: usize },
}

/// A single parking position for one aircraft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    number: u32,
    occupant: Option<String>,
}

impl Gate {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            occupant: None,
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Callsign of the aircraft parked here, if any.
    pub fn occupant(&self) -> Option<&str> {
        self.occupant.as_deref()
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Park an aircraft at this gate. Fails if the gate already holds an
    /// aircraft; callers locate an unoccupied gate first.
    pub fn park(&mut self, callsign: String) -> Result<(), GateError> {
        if let Some(occupant) = &self.occupant {
            return Err(GateError::Occupied {
                gate: self.number,
                occupant: occupant.clone(),
            });
        }
        self.occupant = Some(callsign);
        Ok(())
    }

    /// Vacate the gate.
    pub fn aircraft_leaves(&mut self) {
        self.occupant = None;
    }

    /// Machine-readable representation: `gateNumber:callsign` with
    /// `empty` standing in for an unoccupied gate.
    pub fn encode(&self) -> String {
        format!(
            "{}:{}",
            self.number,
            self.occupant.as_deref().unwrap_or("empty")
        )
    }
}

/// The aircraft category a terminal serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalKind {
    Airplane,
    Helicopter,
}

impl TerminalKind {
    /// Whether aircraft of the given kind may park at this terminal.
    pub fn accepts(self, kind: AircraftKind) -> bool {
        match self {
            TerminalKind::Airplane => kind == AircraftKind::Airplane,
            TerminalKind::Helicopter => kind == AircraftKind::Helicopter,
        }
    }

    /// Encoded terminal type name.
    pub fn encode_name(self) -> &'static str {
        match self {
            TerminalKind::Airplane => "AirplaneTerminal",
            TerminalKind::Helicopter => "HelicopterTerminal",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "AirplaneTerminal" => Some(TerminalKind::Airplane),
            "HelicopterTerminal" => Some(TerminalKind::Helicopter),
            _ => None,
        }
    }
}

/// A group of gates serving one aircraft category.
///
/// # Example
///
/// ```
/// use towersim_core_rs::models::ground::{Gate, Terminal, TerminalKind};
///
/// let mut terminal = Terminal::new(TerminalKind::Airplane, 1);
/// terminal.add_gate(Gate::new(1)).unwrap();
/// terminal.add_gate(Gate::new(2)).unwrap();
/// assert_eq!(terminal.find_unoccupied_gate().unwrap().number(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terminal {
    kind: TerminalKind,
    number: u32,
    gates: Vec<Gate>,
    emergency: bool,
}

impl Terminal {
    /// Maximum number of gates a terminal may hold.
    pub const MAX_NUM_GATES: usize = 6;

    pub fn new(kind: TerminalKind, number: u32) -> Self {
        Self {
            kind,
            number,
            gates: Vec::new(),
            emergency: false,
        }
    }

    pub fn kind(&self) -> TerminalKind {
        self.kind
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Add a gate, up to [`Terminal::MAX_NUM_GATES`].
    pub fn add_gate(&mut self, gate: Gate) -> Result<(), TerminalError> {
        if self.gates.len() >= Self::MAX_NUM_GATES {
            return Err(TerminalError::GatesFull {
                terminal: self.number,
                max: Self::MAX_NUM_GATES,
            });
        }
        self.gates.push(gate);
        Ok(())
    }

    /// First unoccupied gate in gate order, if any.
    pub fn find_unoccupied_gate(&self) -> Option<&Gate> {
        self.gates.iter().find(|gate| !gate.is_occupied())
    }

    /// Park the aircraft at the first unoccupied gate, returning the gate
    /// number, or `None` if every gate is taken.
    pub fn park_first_free(&mut self, callsign: &str) -> Option<u32> {
        let gate = self.gates.iter_mut().find(|gate| !gate.is_occupied())?;
        // freshly selected unoccupied gate, park cannot fail
        let _ = gate.park(callsign.to_string());
        Some(gate.number())
    }

    /// Gate holding the given aircraft, if it is parked here.
    pub fn gate_of(&self, callsign: &str) -> Option<&Gate> {
        self.gates
            .iter()
            .find(|gate| gate.occupant() == Some(callsign))
    }

    /// Vacate the gate holding the given aircraft. Returns whether the
    /// aircraft was parked at this terminal.
    pub fn vacate_aircraft(&mut self, callsign: &str) -> bool {
        for gate in &mut self.gates {
            if gate.occupant() == Some(callsign) {
                gate.aircraft_leaves();
                return true;
            }
        }
        false
    }

    pub fn has_emergency(&self) -> bool {
        self.emergency
    }

    pub fn declare_emergency(&mut self) {
        self.emergency = true;
    }

    pub fn clear_emergency(&mut self) {
        self.emergency = false;
    }

    /// Machine-readable representation:
    /// `TerminalType:terminalNumber:emergency:numGates`.
    pub fn encode(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.kind.encode_name(),
            self.number,
            self.emergency,
            self.gates.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_park_and_occupied_error() {
        let mut gate = Gate::new(3);
        gate.park("ABC123".to_string()).unwrap();
        assert_eq!(
            gate.park("XYZ987".to_string()),
            Err(GateError::Occupied {
                gate: 3,
                occupant: "ABC123".to_string(),
            })
        );
        gate.aircraft_leaves();
        assert!(gate.park("XYZ987".to_string()).is_ok());
    }

    #[test]
    fn test_gate_limit() {
        let mut terminal = Terminal::new(TerminalKind::Airplane, 1);
        for n in 1..=Terminal::MAX_NUM_GATES as u32 {
            terminal.add_gate(Gate::new(n)).unwrap();
        }
        assert_eq!(
            terminal.add_gate(Gate::new(7)),
            Err(TerminalError::GatesFull {
                terminal: 1,
                max: Terminal::MAX_NUM_GATES,
            })
        );
    }

    #[test]
    fn test_find_unoccupied_skips_taken_gates() {
        let mut terminal = Terminal::new(TerminalKind::Helicopter, 2);
        terminal.add_gate(Gate::new(1)).unwrap();
        terminal.add_gate(Gate::new(2)).unwrap();
        terminal.park_first_free("ABC123");
        assert_eq!(terminal.find_unoccupied_gate().unwrap().number(), 2);
        assert_eq!(terminal.gate_of("ABC123").unwrap().number(), 1);
    }

    #[test]
    fn test_vacate_unknown_callsign() {
        let mut terminal = Terminal::new(TerminalKind::Airplane, 1);
        terminal.add_gate(Gate::new(1)).unwrap();
        assert!(!terminal.vacate_aircraft("NOPE01"));
    }

    #[test]
    fn test_kind_compatibility() {
        assert!(TerminalKind::Airplane.accepts(AircraftKind::Airplane));
        assert!(!TerminalKind::Airplane.accepts(AircraftKind::Helicopter));
        assert!(TerminalKind::Helicopter.accepts(AircraftKind::Helicopter));
    }

    #[test]
    fn test_encode() {
        let mut terminal = Terminal::new(TerminalKind::Airplane, 1);
        terminal.add_gate(Gate::new(1)).unwrap();
        terminal.park_first_free("QFA481");
        assert_eq!(terminal.encode(), "AirplaneTerminal:1:false:1");
        assert_eq!(terminal.gates()[0].encode(), "1:QFA481");
    }
}
