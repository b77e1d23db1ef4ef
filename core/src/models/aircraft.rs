//! Aircraft model and per-tick bookkeeping.
//!
//! An aircraft is identified by its callsign, which is the stable identity
//! key used by every queue and registry in the simulation. Its physical
//! characteristics come from a fixed [`AircraftModel`] table; its behaviour
//! over time is driven by the current task on its [`TaskList`].

use crate::models::tasks::{TaskList, TaskType};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised when constructing an aircraft
#[derive(Debug, Error, PartialEq)]
pub enum AircraftError {
    #[error("fuel amount {fuel} outside 0..={capacity}")]
    FuelOutOfRange { fuel: f64, capacity: f64 },

    #[error("cargo amount {cargo} exceeds capacity {capacity}")]
    CargoOverCapacity { cargo: u32, capacity: u32 },
}

/// Broad airframe category. Terminals only accept aircraft of a
/// matching kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AircraftKind {
    Airplane,
    Helicopter,
}

/// Fixed characteristics table for the supported aircraft models.
///
/// A model either carries passengers or freight, never both; the unused
/// capacity is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AircraftModel {
    AirbusA320,
    Boeing7478F,
    Boeing787,
    Fokker100,
    RobinsonR44,
    SikorskySkycrane,
}

impl AircraftModel {
    pub const ALL: [AircraftModel; 6] = [
        AircraftModel::AirbusA320,
        AircraftModel::Boeing7478F,
        AircraftModel::Boeing787,
        AircraftModel::Fokker100,
        AircraftModel::RobinsonR44,
        AircraftModel::SikorskySkycrane,
    ];

    pub fn kind(self) -> AircraftKind {
        match self {
            AircraftModel::AirbusA320
            | AircraftModel::Boeing7478F
            | AircraftModel::Boeing787
            | AircraftModel::Fokker100 => AircraftKind::Airplane,
            AircraftModel::RobinsonR44 | AircraftModel::SikorskySkycrane => {
                AircraftKind::Helicopter
            }
        }
    }

    /// Maximum fuel onboard, in litres.
    pub fn fuel_capacity(self) -> f64 {
        match self {
            AircraftModel::AirbusA320 => 27_200.0,
            AircraftModel::Boeing7478F => 226_117.0,
            AircraftModel::Boeing787 => 126_206.0,
            AircraftModel::Fokker100 => 13_365.0,
            AircraftModel::RobinsonR44 => 190.0,
            AircraftModel::SikorskySkycrane => 3_328.0,
        }
    }

    /// Passenger capacity; zero for freight-only models.
    pub fn passenger_capacity(self) -> u32 {
        match self {
            AircraftModel::AirbusA320 => 150,
            AircraftModel::Boeing787 => 242,
            AircraftModel::Fokker100 => 97,
            AircraftModel::RobinsonR44 => 4,
            AircraftModel::Boeing7478F | AircraftModel::SikorskySkycrane => 0,
        }
    }

    /// Freight capacity in kilograms; zero for passenger models.
    pub fn freight_capacity(self) -> u32 {
        match self {
            AircraftModel::Boeing7478F => 137_756,
            AircraftModel::SikorskySkycrane => 9_100,
            _ => 0,
        }
    }

    /// Whichever of the two cargo capacities is non-zero.
    pub fn cargo_capacity(self) -> u32 {
        if self.is_passenger() {
            self.passenger_capacity()
        } else {
            self.freight_capacity()
        }
    }

    /// True for models that carry passengers rather than freight.
    pub fn is_passenger(self) -> bool {
        self.passenger_capacity() > 0
    }

    /// Parses the encoded model name (e.g. `"AIRBUS_A320"`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "AIRBUS_A320" => Some(AircraftModel::AirbusA320),
            "BOEING_747_8F" => Some(AircraftModel::Boeing7478F),
            "BOEING_787" => Some(AircraftModel::Boeing787),
            "FOKKER_100" => Some(AircraftModel::Fokker100),
            "ROBINSON_R44" => Some(AircraftModel::RobinsonR44),
            "SIKORSKY_SKYCRANE" => Some(AircraftModel::SikorskySkycrane),
            _ => None,
        }
    }
}

impl fmt::Display for AircraftModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            AircraftModel::AirbusA320 => "AIRBUS_A320",
            AircraftModel::Boeing7478F => "BOEING_747_8F",
            AircraftModel::Boeing787 => "BOEING_787",
            AircraftModel::Fokker100 => "FOKKER_100",
            AircraftModel::RobinsonR44 => "ROBINSON_R44",
            AircraftModel::SikorskySkycrane => "SIKORSKY_SKYCRANE",
        };
        write!(f, "{}", code)
    }
}

/// An aircraft under the tower's jurisdiction.
///
/// # Example
///
/// ```
/// use towersim_core_rs::models::aircraft::{Aircraft, AircraftModel};
/// use towersim_core_rs::models::tasks::{Task, TaskList, TaskType};
///
/// let tasks = TaskList::new(vec![
///     Task::new(TaskType::Land),
///     Task::new(TaskType::Wait),
///     Task::with_load(TaskType::Load, 60),
///     Task::new(TaskType::Takeoff),
///     Task::new(TaskType::Away),
/// ])
/// .unwrap();
///
/// let aircraft =
///     Aircraft::new("QFA481".to_string(), AircraftModel::AirbusA320, tasks, 10_000.0, 120)
///         .unwrap();
/// assert!(aircraft.fuel_percent_remaining() > 36.0);
/// assert!(!aircraft.has_emergency());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aircraft {
    /// Unique callsign, the identity key across all tower structures
    callsign: String,
    model: AircraftModel,
    tasks: TaskList,
    /// Current fuel onboard in litres, 0..=fuel_capacity
    fuel_amount: f64,
    emergency: bool,
    /// Passengers onboard, or freight in kilograms, by model category
    cargo: u32,
}

impl Aircraft {
    /// Create an aircraft, validating fuel and cargo against the model's
    /// capacities.
    pub fn new(
        callsign: String,
        model: AircraftModel,
        tasks: TaskList,
        fuel_amount: f64,
        cargo: u32,
    ) -> Result<Self, AircraftError> {
        let capacity = model.fuel_capacity();
        if !(0.0..=capacity).contains(&fuel_amount) {
            return Err(AircraftError::FuelOutOfRange {
                fuel: fuel_amount,
                capacity,
            });
        }
        if cargo > model.cargo_capacity() {
            return Err(AircraftError::CargoOverCapacity {
                cargo,
                capacity: model.cargo_capacity(),
            });
        }
        Ok(Self {
            callsign,
            model,
            tasks,
            fuel_amount,
            emergency: false,
            cargo,
        })
    }

    pub fn callsign(&self) -> &str {
        &self.callsign
    }

    pub fn model(&self) -> AircraftModel {
        self.model
    }

    pub fn kind(&self) -> AircraftKind {
        self.model.kind()
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskList {
        &mut self.tasks
    }

    pub fn fuel_amount(&self) -> f64 {
        self.fuel_amount
    }

    /// Remaining fuel as a percentage of capacity (0-100).
    pub fn fuel_percent_remaining(&self) -> f64 {
        self.fuel_amount / self.model.fuel_capacity() * 100.0
    }

    pub fn cargo(&self) -> u32 {
        self.cargo
    }

    pub fn is_passenger(&self) -> bool {
        self.model.is_passenger()
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

    /// Cargo amount the current load task is asking for.
    fn cargo_target(&self) -> u32 {
        let percent = self.tasks.current_task().load_percent() as u64;
        (self.model.cargo_capacity() as u64 * percent / 100) as u32
    }

    /// Number of ticks a load task takes for this aircraft.
    ///
    /// Passenger aircraft take `round(log10(passengers to load))` ticks
    /// with a floor of one; freight aircraft take 1, 2 or 3 ticks by
    /// weight bracket.
    pub fn loading_time(&self) -> u32 {
        let to_load = self.cargo_target();
        if self.is_passenger() {
            if to_load == 0 {
                1
            } else {
                ((to_load as f64).log10().round() as u32).max(1)
            }
        } else if to_load < 1_000 {
            1
        } else if to_load <= 50_000 {
            2
        } else {
            3
        }
    }

    /// Per-tick bookkeeping driven by the current task: AWAY burns ten
    /// percent of fuel capacity, LOAD refuels and takes cargo onboard over
    /// the loading time. Other tasks leave the aircraft untouched.
    pub fn tick(&mut self) {
        let capacity = self.model.fuel_capacity();
        match self.tasks.current_task().kind() {
            TaskType::Away => {
                self.fuel_amount = (self.fuel_amount - capacity / 10.0).max(0.0);
            }
            TaskType::Load => {
                let time = self.loading_time();
                self.fuel_amount = (self.fuel_amount + capacity / time as f64).min(capacity);
                let target = self.cargo_target();
                if self.cargo < target {
                    self.cargo = (self.cargo + target.div_ceil(time)).min(target);
                }
            }
            _ => {}
        }
    }

    /// Unload all passengers or freight in one step.
    pub fn unload(&mut self) {
        self.cargo = 0;
    }

    /// Machine-readable representation:
    /// `callsign:MODEL:taskList:fuelAmount:emergency:cargo`.
    pub fn encode(&self) -> String {
        format!(
            "{}:{}:{}:{:.2}:{}:{}",
            self.callsign,
            self.model,
            self.tasks.encode(),
            self.fuel_amount,
            self.emergency,
            self.cargo
        )
    }
}
