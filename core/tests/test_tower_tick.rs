//! End-to-end tick behaviour of the control tower.

use std::collections::BTreeMap;
use towersim_core_rs::{
    Aircraft, AircraftModel, AircraftQueue, ControlTower, Event, Gate, Task, TaskList, TaskType,
    Terminal, TerminalKind, TowerError,
};

// ============================================================================
// Helpers
// ============================================================================

/// Five-task cycle rotated so `first` is the current task.
fn cycle_from(first: TaskType) -> TaskList {
    let base = [
        TaskType::Land,
        TaskType::Wait,
        TaskType::Load,
        TaskType::Takeoff,
        TaskType::Away,
    ];
    let start = base.iter().position(|t| *t == first).unwrap();
    let tasks = (0..base.len())
        .map(|i| match base[(start + i) % base.len()] {
            TaskType::Load => Task::with_load(TaskType::Load, 50),
            kind => Task::new(kind),
        })
        .collect();
    TaskList::new(tasks).unwrap()
}

fn aircraft(callsign: &str, model: AircraftModel, first: TaskType) -> Aircraft {
    Aircraft::new(
        callsign.to_string(),
        model,
        cycle_from(first),
        model.fuel_capacity() / 2.0,
        0,
    )
    .unwrap()
}

fn terminal_with_gates(number: u32, gates: u32) -> Terminal {
    let mut terminal = Terminal::new(TerminalKind::Airplane, number);
    for n in 1..=gates {
        terminal.add_gate(Gate::new(n)).unwrap();
    }
    terminal
}

/// Tower resumed at the given tick with every LAND aircraft already queued.
fn tower_with_arrivals(ticks_elapsed: u64, roster: Vec<Aircraft>) -> ControlTower {
    let mut landing_queue = AircraftQueue::landing();
    for a in roster.iter().filter(|a| {
        a.tasks().current_task().kind() == TaskType::Land
    }) {
        landing_queue.add(a.callsign());
    }
    ControlTower::with_state(
        ticks_elapsed,
        roster,
        landing_queue,
        AircraftQueue::takeoff(),
        BTreeMap::new(),
    )
}

// ============================================================================
// Landing
// ============================================================================

#[test]
fn test_landing_on_odd_tick_parks_and_advances() {
    let roster = vec![aircraft("QFA481", AircraftModel::AirbusA320, TaskType::Land)];
    let mut tower = tower_with_arrivals(1, roster);
    tower.add_terminal(terminal_with_gates(1, 2));

    tower.tick();

    assert_eq!(tower.ticks_elapsed(), 2);
    assert!(tower.landing_queue().is_empty());
    let gate = tower.find_gate_of("QFA481").unwrap();
    assert_eq!(gate.occupant(), Some("QFA481"));
    let landed = tower.get_aircraft("QFA481").unwrap();
    assert_eq!(landed.tasks().current_task().kind(), TaskType::Wait);
    assert!(tower
        .event_log()
        .events()
        .iter()
        .any(|e| matches!(e, Event::Landed { callsign, .. } if callsign == "QFA481")));
}

#[test]
fn test_no_landing_on_even_tick() {
    let roster = vec![aircraft("QFA481", AircraftModel::AirbusA320, TaskType::Land)];
    let mut tower = tower_with_arrivals(0, roster);
    tower.add_terminal(terminal_with_gates(1, 2));

    tower.tick();
    // even tick services takeoffs only; still waiting in the air
    assert!(tower.landing_queue().contains("QFA481"));
    assert!(tower.find_gate_of("QFA481").is_none());

    tower.tick();
    assert!(tower.landing_queue().is_empty());
    assert!(tower.find_gate_of("QFA481").is_some());
}

#[test]
fn test_landing_deferred_when_no_gate_free() {
    let roster = vec![aircraft("QFA481", AircraftModel::AirbusA320, TaskType::Land)];
    let mut tower = tower_with_arrivals(1, roster);
    // only terminal is full
    let mut full = terminal_with_gates(1, 1);
    full.park_first_free("OTHER1");
    tower.add_terminal(full);

    tower.tick();

    assert!(tower.landing_queue().contains("QFA481"));
    assert!(tower
        .event_log()
        .events()
        .iter()
        .any(|e| matches!(e, Event::LandingDeferred { callsign, .. } if callsign == "QFA481")));
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn test_wait_aircraft_with_no_gate_is_rejected_atomically() {
    let mut tower = ControlTower::new();
    let result = tower.add_aircraft(aircraft(
        "QFA481",
        AircraftModel::AirbusA320,
        TaskType::Wait,
    ));
    assert_eq!(
        result,
        Err(TowerError::NoSuitableGate {
            callsign: "QFA481".to_string(),
        })
    );
    assert!(tower.aircraft().is_empty());
    assert!(tower.landing_queue().is_empty());
}

#[test]
fn test_tick_counter_advances_by_one() {
    let mut tower = ControlTower::new();
    for expected in 1..=5 {
        tower.tick();
        assert_eq!(tower.ticks_elapsed(), expected);
    }
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_freighter_loads_over_three_ticks_then_queues_for_takeoff() {
    let mut tower = ControlTower::new();
    tower.add_terminal(terminal_with_gates(1, 2));
    // 747-8F at 50%: 68878 kg of freight, the slowest loading bracket
    tower
        .add_aircraft(aircraft(
            "UPS119",
            AircraftModel::Boeing7478F,
            TaskType::Load,
        ))
        .unwrap();
    assert_eq!(tower.loading_aircraft().get("UPS119"), Some(&3));
    assert!(tower.find_gate_of("UPS119").is_some());

    tower.tick();
    assert_eq!(tower.loading_aircraft().get("UPS119"), Some(&2));
    tower.tick();
    assert_eq!(tower.loading_aircraft().get("UPS119"), Some(&1));

    tower.tick();
    // loading finished: gate vacated, aircraft queued to depart this tick
    assert!(tower.loading_aircraft().is_empty());
    assert!(tower.find_gate_of("UPS119").is_none());
    assert!(tower.takeoff_queue().contains("UPS119"));
    let loaded = tower.get_aircraft("UPS119").unwrap();
    assert_eq!(loaded.tasks().current_task().kind(), TaskType::Takeoff);
}

// ============================================================================
// Takeoff
// ============================================================================

#[test]
fn test_takeoff_is_first_come_first_served() {
    let roster = vec![
        aircraft("UTD302", AircraftModel::Boeing787, TaskType::Takeoff),
        aircraft("QFA481", AircraftModel::AirbusA320, TaskType::Takeoff),
    ];
    let mut takeoff_queue = AircraftQueue::takeoff();
    takeoff_queue.add("UTD302");
    takeoff_queue.add("QFA481");
    let tower = ControlTower::with_state(
        0,
        roster,
        AircraftQueue::landing(),
        takeoff_queue,
        BTreeMap::new(),
    );
    assert_eq!(tower.takeoff_queue().peek(tower.roster()), Some("UTD302"));
}

#[test]
fn test_one_tick_can_service_multiple_takeoffs() {
    // arbitration runs once per roster member, so two ready departures
    // both clear the airport within a single tick
    let roster = vec![
        aircraft("UTD302", AircraftModel::Boeing787, TaskType::Takeoff),
        aircraft("QFA481", AircraftModel::AirbusA320, TaskType::Takeoff),
    ];
    let mut takeoff_queue = AircraftQueue::takeoff();
    takeoff_queue.add("UTD302");
    takeoff_queue.add("QFA481");
    let mut tower = ControlTower::with_state(
        0,
        roster,
        AircraftQueue::landing(),
        takeoff_queue,
        BTreeMap::new(),
    );

    tower.tick();

    assert!(tower.takeoff_queue().is_empty());
    let departures: Vec<_> = tower
        .event_log()
        .events()
        .iter()
        .filter(|e| matches!(e, Event::TookOff { .. }))
        .collect();
    assert_eq!(departures.len(), 2);
}

// ============================================================================
// Full cycle
// ============================================================================

#[test]
fn test_aircraft_cycles_from_landing_back_to_away() {
    let roster = vec![aircraft("QFA481", AircraftModel::AirbusA320, TaskType::Land)];
    let mut tower = tower_with_arrivals(1, roster);
    tower.add_terminal(terminal_with_gates(1, 2));

    // LAND at tick 1, WAIT then LOAD at tick 2, finish loading and queue
    // at tick 3, depart at tick 4
    for _ in 0..4 {
        tower.tick();
    }

    let cycled = tower.get_aircraft("QFA481").unwrap();
    assert_eq!(cycled.tasks().current_task().kind(), TaskType::Away);
    assert!(tower.landing_queue().is_empty());
    assert!(tower.takeoff_queue().is_empty());
    assert!(tower.loading_aircraft().is_empty());
    assert!(tower.find_gate_of("QFA481").is_none());
}
