//! Aircraft queues with pluggable selection discipline.
//!
//! A single container type, [`AircraftQueue`], serves both runway queues.
//! The [`QueueDiscipline`] tag selects the front-element policy:
//!
//! - **Takeoff**: strict FIFO; the front is always the earliest-added
//!   aircraft.
//! - **Landing**: rule-based priority. Emergencies land first, then
//!   aircraft at or below the critical fuel level, then passenger
//!   aircraft, then anyone; ties within a tier go to the earliest-added.
//!
//! Queues store callsigns only. The aircraft state the landing policy
//! needs (emergency flag, fuel level, cargo category) is looked up in the
//! roster slice passed to each call, so the selection always reflects the
//! *current* state of each aircraft rather than its state at enqueue time.

use crate::models::aircraft::Aircraft;
use serde::{Deserialize, Serialize};

/// Fuel percentage at or below which an aircraft is prioritised for
/// landing.
pub const CRITICAL_FUEL_PERCENT: f64 = 20.0;

/// Front-element selection policy for an [`AircraftQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueDiscipline {
    /// Strict first-in-first-out
    Takeoff,
    /// Rule-based priority: emergency, then critical fuel, then
    /// passenger aircraft, then arrival order
    Landing,
}

/// An ordered collection of aircraft callsigns with policy-defined
/// `peek`/`remove` semantics.
///
/// # Example
///
/// ```
/// use towersim_core_rs::queues::AircraftQueue;
///
/// let mut queue = AircraftQueue::takeoff();
/// queue.add("ABC123");
/// queue.add("XYZ987");
/// assert_eq!(queue.peek(&[]), Some("ABC123"));
/// assert_eq!(queue.remove(&[]), Some("ABC123".to_string()));
/// assert_eq!(queue.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftQueue {
    discipline: QueueDiscipline,
    /// Callsigns in insertion order; the policy order is computed, never
    /// stored
    entries: Vec<String>,
}

impl AircraftQueue {
    /// Create an empty FIFO takeoff queue.
    pub fn takeoff() -> Self {
        Self {
            discipline: QueueDiscipline::Takeoff,
            entries: Vec::new(),
        }
    }

    /// Create an empty rule-based landing queue.
    pub fn landing() -> Self {
        Self {
            discipline: QueueDiscipline::Landing,
            entries: Vec::new(),
        }
    }

    pub fn discipline(&self) -> QueueDiscipline {
        self.discipline
    }

    /// Queue type name used in encoded representations.
    pub fn kind_name(&self) -> &'static str {
        match self.discipline {
            QueueDiscipline::Takeoff => "TakeoffQueue",
            QueueDiscipline::Landing => "LandingQueue",
        }
    }

    /// Append an aircraft. No duplicate check happens at this layer; the
    /// tower only admits aircraft that are not already present.
    pub fn add(&mut self, callsign: impl Into<String>) {
        self.entries.push(callsign.into());
    }

    /// Membership test by callsign.
    pub fn contains(&self, callsign: &str) -> bool {
        self.entries.iter().any(|c| c == callsign)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Callsigns in raw insertion order, ignoring the selection policy.
    pub fn callsigns(&self) -> &[String] {
        &self.entries
    }

    /// The callsign the policy would remove next, without removing it.
    /// `None` when the queue is empty; emptiness is never an error.
    pub fn peek<'a>(&'a self, roster: &[Aircraft]) -> Option<&'a str> {
        let index = self.select(&self.entries, roster)?;
        Some(self.entries[index].as_str())
    }

    /// Detach and return the policy-selected front element. Only the
    /// selected entry is touched; all other entries keep their insertion
    /// order.
    pub fn remove(&mut self, roster: &[Aircraft]) -> Option<String> {
        let index = self.select(&self.entries, roster)?;
        Some(self.entries.remove(index))
    }

    /// Full policy-order snapshot: the sequence obtained by repeatedly
    /// removing the front element. Computed on a scratch copy so the live
    /// queue is never mutated.
    pub fn in_order(&self, roster: &[Aircraft]) -> Vec<String> {
        let mut scratch = self.entries.clone();
        let mut ordered = Vec::with_capacity(scratch.len());
        while let Some(index) = self.select(&scratch, roster) {
            ordered.push(scratch.remove(index));
        }
        ordered
    }

    /// Selects the index of the next element among `entries`, per the
    /// queue discipline, against the current roster state.
    fn select(&self, entries: &[String], roster: &[Aircraft]) -> Option<usize> {
        if entries.is_empty() {
            return None;
        }
        match self.discipline {
            QueueDiscipline::Takeoff => Some(0),
            QueueDiscipline::Landing => {
                let lookup = |callsign: &str| roster.iter().find(|a| a.callsign() == callsign);
                let first_where = |pred: &dyn Fn(&Aircraft) -> bool| {
                    entries
                        .iter()
                        .position(|c| lookup(c).is_some_and(|a| pred(a)))
                };
                first_where(&|a| a.has_emergency())
                    .or_else(|| {
                        first_where(&|a| a.fuel_percent_remaining() <= CRITICAL_FUEL_PERCENT)
                    })
                    .or_else(|| first_where(&|a| a.is_passenger()))
                    .or(Some(0))
            }
        }
    }

    /// Machine-readable representation:
    ///
    /// ```text
    /// QueueType:numAircraft
    /// callsign1,callsign2,...,callsignN
    /// ```
    ///
    /// The callsign line is omitted for an empty queue. Callsigns appear
    /// in live policy order, not raw storage order.
    pub fn encode(&self, roster: &[Aircraft]) -> String {
        let ordered = self.in_order(roster);
        let mut encoded = format!("{}:{}", self.kind_name(), ordered.len());
        if !ordered.is_empty() {
            encoded.push('\n');
            encoded.push_str(&ordered.join(","));
        }
        encoded
    }

    /// Human-readable representation, e.g.
    /// `LandingQueue [ABC123, XYZ987]`.
    pub fn describe(&self, roster: &[Aircraft]) -> String {
        format!("{} [{}]", self.kind_name(), self.in_order(roster).join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::aircraft::AircraftModel;
    use crate::models::tasks::{Task, TaskList, TaskType};

    fn aircraft(callsign: &str, model: AircraftModel, fuel_percent: f64) -> Aircraft {
        let tasks = TaskList::new(vec![
            Task::new(TaskType::Land),
            Task::new(TaskType::Wait),
            Task::with_load(TaskType::Load, 30),
            Task::new(TaskType::Takeoff),
            Task::new(TaskType::Away),
        ])
        .unwrap();
        Aircraft::new(
            callsign.to_string(),
            model,
            tasks,
            model.fuel_capacity() * fuel_percent / 100.0,
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_takeoff_fifo_order() {
        let mut queue = AircraftQueue::takeoff();
        queue.add("AAA111");
        queue.add("BBB222");
        queue.add("CCC333");
        assert_eq!(queue.remove(&[]), Some("AAA111".to_string()));
        assert_eq!(queue.remove(&[]), Some("BBB222".to_string()));
        assert_eq!(queue.remove(&[]), Some("CCC333".to_string()));
        assert_eq!(queue.remove(&[]), None);
    }

    #[test]
    fn test_takeoff_in_order_is_storage_order() {
        let mut queue = AircraftQueue::takeoff();
        queue.add("AAA111");
        queue.add("BBB222");
        assert_eq!(queue.in_order(&[]), vec!["AAA111", "BBB222"]);
        assert_eq!(queue.len(), 2, "snapshot must not mutate the queue");
    }

    #[test]
    fn test_landing_emergency_beats_fuel() {
        let roster = vec![
            aircraft("LOW001", AircraftModel::AirbusA320, 10.0),
            aircraft("EMG002", AircraftModel::Boeing7478F, 90.0),
        ];
        let mut queue = AircraftQueue::landing();
        queue.add("LOW001");
        queue.add("EMG002");

        let mut roster = roster;
        roster[1].declare_emergency();
        assert_eq!(queue.peek(&roster), Some("EMG002"));
    }

    #[test]
    fn test_landing_fuel_tie_goes_to_earliest_inserted() {
        let roster = vec![
            aircraft("LOW001", AircraftModel::AirbusA320, 15.0),
            aircraft("LOW002", AircraftModel::AirbusA320, 5.0),
        ];
        let mut queue = AircraftQueue::landing();
        queue.add("LOW001");
        queue.add("LOW002");
        // both critical, insertion order decides (not fuel level)
        assert_eq!(queue.peek(&roster), Some("LOW001"));
    }

    #[test]
    fn test_landing_passenger_before_freight() {
        let roster = vec![
            aircraft("FRT001", AircraftModel::Boeing7478F, 80.0),
            aircraft("PAX002", AircraftModel::AirbusA320, 80.0),
        ];
        let mut queue = AircraftQueue::landing();
        queue.add("FRT001");
        queue.add("PAX002");
        assert_eq!(queue.peek(&roster), Some("PAX002"));
    }

    #[test]
    fn test_landing_falls_back_to_arrival_order() {
        let roster = vec![
            aircraft("FRT001", AircraftModel::Boeing7478F, 80.0),
            aircraft("FRT002", AircraftModel::SikorskySkycrane, 80.0),
        ];
        let mut queue = AircraftQueue::landing();
        queue.add("FRT001");
        queue.add("FRT002");
        assert_eq!(queue.peek(&roster), Some("FRT001"));
    }

    #[test]
    fn test_landing_selection_tracks_live_state() {
        let mut roster = vec![
            aircraft("PAX001", AircraftModel::AirbusA320, 80.0),
            aircraft("FRT002", AircraftModel::Boeing7478F, 80.0),
        ];
        let mut queue = AircraftQueue::landing();
        queue.add("PAX001");
        queue.add("FRT002");
        assert_eq!(queue.peek(&roster), Some("PAX001"));

        // freighter's fuel drops to critical after enqueue
        let low = roster[1].model().fuel_capacity() * 0.1;
        roster[1] = {
            let tasks = roster[1].tasks().clone();
            let mut a = Aircraft::new(
                "FRT002".to_string(),
                AircraftModel::Boeing7478F,
                tasks,
                low,
                0,
            )
            .unwrap();
            a.clear_emergency();
            a
        };
        assert_eq!(queue.peek(&roster), Some("FRT002"));
    }

    #[test]
    fn test_landing_remove_detaches_only_winner() {
        let roster = vec![
            aircraft("FRT001", AircraftModel::Boeing7478F, 80.0),
            aircraft("PAX002", AircraftModel::AirbusA320, 80.0),
            aircraft("FRT003", AircraftModel::SikorskySkycrane, 80.0),
        ];
        let mut queue = AircraftQueue::landing();
        queue.add("FRT001");
        queue.add("PAX002");
        queue.add("FRT003");
        assert_eq!(queue.remove(&roster), Some("PAX002".to_string()));
        // remaining entries keep their insertion order
        assert_eq!(queue.callsigns(), &["FRT001".to_string(), "FRT003".to_string()]);
    }

    #[test]
    fn test_encode_empty_and_populated() {
        let mut queue = AircraftQueue::takeoff();
        assert_eq!(queue.encode(&[]), "TakeoffQueue:0");
        queue.add("ABC101");
        queue.add("QWE456");
        queue.add("XYZ789");
        assert_eq!(queue.encode(&[]), "TakeoffQueue:3\nABC101,QWE456,XYZ789");
    }

    #[test]
    fn test_describe_uses_policy_order() {
        let roster = vec![
            aircraft("FRT001", AircraftModel::Boeing7478F, 80.0),
            aircraft("PAX002", AircraftModel::AirbusA320, 80.0),
        ];
        let mut queue = AircraftQueue::landing();
        queue.add("FRT001");
        queue.add("PAX002");
        assert_eq!(queue.describe(&roster), "LandingQueue [PAX002, FRT001]");
    }

    #[test]
    fn test_contains() {
        let mut queue = AircraftQueue::landing();
        queue.add("ABC123");
        assert!(queue.contains("ABC123"));
        assert!(!queue.contains("XYZ987"));
    }
}
