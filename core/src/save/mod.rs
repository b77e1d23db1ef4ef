//! Reading saved simulation state from the line-based text format.
//!
//! A full save is split across four readers, one per section:
//!
//! 1. tick — a single non-negative integer
//! 2. aircraft — a count line, then one encoded aircraft per line
//! 3. queues — takeoff queue, landing queue, then the loading registry
//! 4. terminals — a count line, then each terminal followed by its gates
//!
//! Each reader is generic over [`BufRead`] so callers can feed files,
//! network buffers or in-memory strings. Every malformation maps to a
//! distinct [`MalformedSaveError`] variant naming the offending value;
//! parsing is strict, with no recovery or skipping of bad lines.
//!
//! The line formats mirror the `encode()` methods on the model types, so
//! a tower's encoded state always loads back.

use crate::models::aircraft::{Aircraft, AircraftError, AircraftModel};
use crate::models::ground::{Gate, Terminal, TerminalKind};
use crate::models::tasks::{Task, TaskList, TaskListError, TaskType};
use crate::queues::AircraftQueue;
use crate::tower::engine::ControlTower;
use std::collections::BTreeMap;
use std::io::BufRead;
use thiserror::Error;

/// Everything that can go wrong while reading a save.
#[derive(Debug, Error)]
pub enum MalformedSaveError {
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("expected end of input, found {0:?}")]
    TrailingContent(String),

    #[error("tick count is not an integer: {0:?}")]
    TickNotInteger(String),

    #[error("tick count is negative: {0}")]
    TickNegative(i64),

    #[error("count is not an integer: {0:?}")]
    CountNotInteger(String),

    #[error("line {line:?} has {found} colon-separated fields, expected {expected}")]
    WrongFieldCount {
        line: String,
        expected: usize,
        found: usize,
    },

    #[error("unknown aircraft model: {0:?}")]
    UnknownAircraftModel(String),

    #[error("fuel amount is not numeric: {0:?}")]
    FuelNotNumeric(String),

    #[error(transparent)]
    InvalidAircraft(#[from] AircraftError),

    #[error("emergency flag is not a boolean: {0:?}")]
    EmergencyNotBoolean(String),

    #[error("cargo amount is not an integer: {0:?}")]
    CargoNotInteger(String),

    #[error("unknown task type: {0:?}")]
    UnknownTaskType(String),

    #[error("load percentage is not an integer: {0:?}")]
    LoadPercentNotInteger(String),

    #[error("load percentage out of range: {0}")]
    LoadPercentOutOfRange(i64),

    #[error("task contains more than one @ symbol: {0:?}")]
    TooManyAtSymbols(String),

    #[error(transparent)]
    InvalidTaskList(#[from] TaskListError),

    #[error("queue header names {found:?}, expected {expected:?}")]
    QueueTypeMismatch { expected: String, found: String },

    #[error("queue declares {declared} aircraft but lists {listed}")]
    CallsignCountMismatch { declared: usize, listed: usize },

    #[error("callsign does not belong to any loaded aircraft: {0:?}")]
    UnknownCallsign(String),

    #[error("loading time is not an integer: {0:?}")]
    LoadingTimeNotInteger(String),

    #[error("loading time is negative: {0}")]
    LoadingTimeNegative(i64),

    #[error("unknown terminal type: {0:?}")]
    TerminalTypeInvalid(String),

    #[error("terminal number is not a positive integer: {0:?}")]
    TerminalNumberInvalid(String),

    #[error("gate count is invalid: {0:?}")]
    GateCountInvalid(String),

    #[error("gate number is not a positive integer: {0:?}")]
    GateNumberInvalid(String),
}

fn next_line<R: BufRead>(
    lines: &mut std::io::Lines<R>,
) -> Result<String, MalformedSaveError> {
    match lines.next() {
        Some(line) => Ok(line?),
        None => Err(MalformedSaveError::UnexpectedEof),
    }
}

fn expect_eof<R: BufRead>(lines: &mut std::io::Lines<R>) -> Result<(), MalformedSaveError> {
    match lines.next() {
        Some(line) => Err(MalformedSaveError::TrailingContent(line?)),
        None => Ok(()),
    }
}

fn parse_count(raw: &str) -> Result<usize, MalformedSaveError> {
    raw.parse()
        .map_err(|_| MalformedSaveError::CountNotInteger(raw.to_string()))
}

fn known_callsign<'a>(
    callsign: &str,
    aircraft: &'a [Aircraft],
) -> Result<&'a Aircraft, MalformedSaveError> {
    aircraft
        .iter()
        .find(|a| a.callsign() == callsign)
        .ok_or_else(|| MalformedSaveError::UnknownCallsign(callsign.to_string()))
}

// ============================================================================
// Section 1: tick
// ============================================================================

/// Read the elapsed tick count: a single non-negative integer line.
pub fn load_tick<R: BufRead>(reader: R) -> Result<u64, MalformedSaveError> {
    let mut lines = reader.lines();
    let line = next_line(&mut lines)?;
    let tick: i64 = line
        .trim()
        .parse()
        .map_err(|_| MalformedSaveError::TickNotInteger(line.clone()))?;
    if tick < 0 {
        return Err(MalformedSaveError::TickNegative(tick));
    }
    expect_eof(&mut lines)?;
    Ok(tick as u64)
}

// ============================================================================
// Section 2: aircraft
// ============================================================================

/// Read the aircraft roster: a count line followed by exactly that many
/// encoded aircraft lines.
pub fn load_aircraft<R: BufRead>(reader: R) -> Result<Vec<Aircraft>, MalformedSaveError> {
    let mut lines = reader.lines();
    let count = parse_count(next_line(&mut lines)?.trim())?;
    let mut aircraft = Vec::with_capacity(count);
    for _ in 0..count {
        aircraft.push(read_aircraft(&next_line(&mut lines)?)?);
    }
    expect_eof(&mut lines)?;
    Ok(aircraft)
}

/// Parse one encoded aircraft line:
/// `callsign:model:taskList:fuelAmount:emergency:cargo`.
fn read_aircraft(line: &str) -> Result<Aircraft, MalformedSaveError> {
    let parts: Vec<&str> = line.split(':').collect();
    if parts.len() != 6 {
        return Err(MalformedSaveError::WrongFieldCount {
            line: line.to_string(),
            expected: 6,
            found: parts.len(),
        });
    }
    let callsign = parts[0].to_string();
    let model = AircraftModel::from_code(parts[1])
        .ok_or_else(|| MalformedSaveError::UnknownAircraftModel(parts[1].to_string()))?;
    let tasks = read_task_list(parts[2])?;
    let fuel: f64 = parts[3]
        .parse()
        .map_err(|_| MalformedSaveError::FuelNotNumeric(parts[3].to_string()))?;
    let emergency: bool = parts[4]
        .parse()
        .map_err(|_| MalformedSaveError::EmergencyNotBoolean(parts[4].to_string()))?;
    let cargo: u32 = parts[5]
        .parse()
        .map_err(|_| MalformedSaveError::CargoNotInteger(parts[5].to_string()))?;
    let mut aircraft = Aircraft::new(callsign, model, tasks, fuel, cargo)?;
    if emergency {
        aircraft.declare_emergency();
    }
    Ok(aircraft)
}

/// Parse a comma-separated task list, e.g. `LAND,WAIT,LOAD@60,TAKEOFF,AWAY`.
fn read_task_list(encoded: &str) -> Result<TaskList, MalformedSaveError> {
    let mut tasks = Vec::new();
    for raw in encoded.split(',') {
        let at_count = raw.matches('@').count();
        if at_count > 1 {
            return Err(MalformedSaveError::TooManyAtSymbols(raw.to_string()));
        }
        let (name, load) = match raw.split_once('@') {
            Some((name, load)) => (name, Some(load)),
            None => (raw, None),
        };
        let kind = TaskType::from_code(name)
            .ok_or_else(|| MalformedSaveError::UnknownTaskType(name.to_string()))?;
        let task = match load {
            Some(load) => {
                let percent: i64 = load.parse().map_err(|_| {
                    MalformedSaveError::LoadPercentNotInteger(load.to_string())
                })?;
                if !(0..=100).contains(&percent) {
                    return Err(MalformedSaveError::LoadPercentOutOfRange(percent));
                }
                Task::with_load(kind, percent as u8)
            }
            None => Task::new(kind),
        };
        tasks.push(task);
    }
    Ok(TaskList::new(tasks)?)
}

// ============================================================================
// Section 3: queues and loading registry
// ============================================================================

/// Read both runway queues and the loading registry. Order in the file
/// is takeoff queue, landing queue, loading registry. Every callsign must
/// belong to an aircraft in `aircraft`.
pub fn load_queues<R: BufRead>(
    reader: R,
    aircraft: &[Aircraft],
) -> Result<(AircraftQueue, AircraftQueue, BTreeMap<String, u32>), MalformedSaveError> {
    let mut lines = reader.lines();
    let mut takeoff_queue = AircraftQueue::takeoff();
    read_queue(&mut lines, aircraft, &mut takeoff_queue)?;
    let mut landing_queue = AircraftQueue::landing();
    read_queue(&mut lines, aircraft, &mut landing_queue)?;
    let loading_aircraft = read_loading_aircraft(&mut lines, aircraft)?;
    expect_eof(&mut lines)?;
    Ok((takeoff_queue, landing_queue, loading_aircraft))
}

/// Read one queue section: a `QueueType:count` header, then a
/// comma-separated callsign line when the count is non-zero. The header's
/// queue type must match the queue being filled.
fn read_queue<R: BufRead>(
    lines: &mut std::io::Lines<R>,
    aircraft: &[Aircraft],
    queue: &mut AircraftQueue,
) -> Result<(), MalformedSaveError> {
    let header = next_line(lines)?;
    let parts: Vec<&str> = header.split(':').collect();
    if parts.len() != 2 {
        return Err(MalformedSaveError::WrongFieldCount {
            line: header.clone(),
            expected: 2,
            found: parts.len(),
        });
    }
    if parts[0] != queue.kind_name() {
        return Err(MalformedSaveError::QueueTypeMismatch {
            expected: queue.kind_name().to_string(),
            found: parts[0].to_string(),
        });
    }
    let count = parse_count(parts[1])?;
    if count == 0 {
        return Ok(());
    }
    let line = next_line(lines)?;
    let listed: Vec<&str> = line.split(',').map(str::trim).collect();
    if listed.len() != count {
        return Err(MalformedSaveError::CallsignCountMismatch {
            declared: count,
            listed: listed.len(),
        });
    }
    for callsign in listed {
        known_callsign(callsign, aircraft)?;
        queue.add(callsign);
    }
    Ok(())
}

/// Read the loading registry: a `LoadingAircraft:count` header, then a
/// comma-separated line of `callsign:ticksRemaining` pairs when the count
/// is non-zero. A remaining time of zero is accepted and resolves on the
/// next loading pass; negative times are rejected.
fn read_loading_aircraft<R: BufRead>(
    lines: &mut std::io::Lines<R>,
    aircraft: &[Aircraft],
) -> Result<BTreeMap<String, u32>, MalformedSaveError> {
    let header = next_line(lines)?;
    let parts: Vec<&str> = header.split(':').collect();
    if parts.len() != 2 {
        return Err(MalformedSaveError::WrongFieldCount {
            line: header.clone(),
            expected: 2,
            found: parts.len(),
        });
    }
    if parts[0] != "LoadingAircraft" {
        return Err(MalformedSaveError::QueueTypeMismatch {
            expected: "LoadingAircraft".to_string(),
            found: parts[0].to_string(),
        });
    }
    let count = parse_count(parts[1])?;
    let mut loading = BTreeMap::new();
    if count == 0 {
        return Ok(loading);
    }
    let line = next_line(lines)?;
    let entries: Vec<&str> = line.split(',').collect();
    if entries.len() != count {
        return Err(MalformedSaveError::CallsignCountMismatch {
            declared: count,
            listed: entries.len(),
        });
    }
    for entry in entries {
        let pair: Vec<&str> = entry.split(':').collect();
        if pair.len() != 2 {
            return Err(MalformedSaveError::WrongFieldCount {
                line: entry.to_string(),
                expected: 2,
                found: pair.len(),
            });
        }
        known_callsign(pair[0], aircraft)?;
        let ticks: i64 = pair[1]
            .parse()
            .map_err(|_| MalformedSaveError::LoadingTimeNotInteger(pair[1].to_string()))?;
        if ticks < 0 {
            return Err(MalformedSaveError::LoadingTimeNegative(ticks));
        }
        loading.insert(pair[0].to_string(), ticks as u32);
    }
    Ok(loading)
}

// ============================================================================
// Section 4: terminals and gates
// ============================================================================

/// Read the terminal list: a count line, then for each terminal a header
/// line followed by one line per gate.
pub fn load_terminals_with_gates<R: BufRead>(
    reader: R,
    aircraft: &[Aircraft],
) -> Result<Vec<Terminal>, MalformedSaveError> {
    let mut lines = reader.lines();
    let count = parse_count(next_line(&mut lines)?.trim())?;
    let mut terminals = Vec::with_capacity(count);
    for _ in 0..count {
        terminals.push(read_terminal(&mut lines, aircraft)?);
    }
    expect_eof(&mut lines)?;
    Ok(terminals)
}

/// Parse one terminal header, `TerminalType:number:emergency:gateCount`,
/// then read its gates. The gate count must not exceed the per-terminal
/// maximum.
fn read_terminal<R: BufRead>(
    lines: &mut std::io::Lines<R>,
    aircraft: &[Aircraft],
) -> Result<Terminal, MalformedSaveError> {
    let header = next_line(lines)?;
    let parts: Vec<&str> = header.split(':').collect();
    if parts.len() != 4 {
        return Err(MalformedSaveError::WrongFieldCount {
            line: header.clone(),
            expected: 4,
            found: parts.len(),
        });
    }
    let kind = TerminalKind::from_name(parts[0])
        .ok_or_else(|| MalformedSaveError::TerminalTypeInvalid(parts[0].to_string()))?;
    let number: u32 = parts[1]
        .parse()
        .ok()
        .filter(|n| *n >= 1)
        .ok_or_else(|| MalformedSaveError::TerminalNumberInvalid(parts[1].to_string()))?;
    let emergency: bool = parts[2]
        .parse()
        .map_err(|_| MalformedSaveError::EmergencyNotBoolean(parts[2].to_string()))?;
    let gate_count: usize = parts[3]
        .parse()
        .ok()
        .filter(|n| *n <= Terminal::MAX_NUM_GATES)
        .ok_or_else(|| MalformedSaveError::GateCountInvalid(parts[3].to_string()))?;

    let mut terminal = Terminal::new(kind, number);
    if emergency {
        terminal.declare_emergency();
    }
    for _ in 0..gate_count {
        let gate = read_gate(&next_line(lines)?, aircraft)?;
        // gate count is capped above, add_gate cannot fail
        let _ = terminal.add_gate(gate);
    }
    Ok(terminal)
}

/// Parse one gate line, `gateNumber:occupant`, where the occupant is
/// either a loaded aircraft's callsign or the literal `empty`.
fn read_gate(line: &str, aircraft: &[Aircraft]) -> Result<Gate, MalformedSaveError> {
    let parts: Vec<&str> = line.split(':').collect();
    if parts.len() != 2 {
        return Err(MalformedSaveError::WrongFieldCount {
            line: line.to_string(),
            expected: 2,
            found: parts.len(),
        });
    }
    let number: u32 = parts[0]
        .parse()
        .ok()
        .filter(|n| *n >= 1)
        .ok_or_else(|| MalformedSaveError::GateNumberInvalid(parts[0].to_string()))?;
    let mut gate = Gate::new(number);
    if parts[1] != "empty" {
        let occupant = known_callsign(parts[1], aircraft)?;
        // the gate was just created unoccupied, park cannot fail
        let _ = gate.park(occupant.callsign().to_string());
    }
    Ok(gate)
}

// ============================================================================
// Assembly
// ============================================================================

/// Read all four sections and assemble a running [`ControlTower`].
pub fn create_control_tower<R1, R2, R3, R4>(
    tick: R1,
    aircraft: R2,
    queues: R3,
    terminals: R4,
) -> Result<ControlTower, MalformedSaveError>
where
    R1: BufRead,
    R2: BufRead,
    R3: BufRead,
    R4: BufRead,
{
    let ticks_elapsed = load_tick(tick)?;
    let aircraft = load_aircraft(aircraft)?;
    let (takeoff_queue, landing_queue, loading_aircraft) = load_queues(queues, &aircraft)?;
    let terminals = load_terminals_with_gates(terminals, &aircraft)?;
    let mut tower = ControlTower::with_state(
        ticks_elapsed,
        aircraft,
        landing_queue,
        takeoff_queue,
        loading_aircraft,
    );
    for terminal in terminals {
        tower.add_terminal(terminal);
    }
    Ok(tower)
}
