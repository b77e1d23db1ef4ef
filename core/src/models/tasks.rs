//! Task cursor for aircraft.
//!
//! Every aircraft owns a circular list of tasks describing its operating
//! cycle: flying away from the airport, landing, waiting at a gate, loading
//! cargo, and taking off again. `TaskList` keeps a cursor over that list;
//! advancing past the last task wraps back to the first.
//!
//! Task lists are validated at construction: each task type only permits
//! certain successors, and the wrap-around pair must be legal too.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised when constructing a task list
#[derive(Debug, Error, PartialEq)]
pub enum TaskListError {
    #[error("task list must contain at least one task")]
    Empty,

    #[error("illegal task order: {from} cannot be followed by {to}")]
    IllegalOrder { from: TaskType, to: TaskType },
}

/// The phase of operation an aircraft is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    /// Flying outside the airport's airspace
    Away,
    /// Waiting in the air to land
    Land,
    /// Parked at a gate, idle
    Wait,
    /// Parked at a gate, loading passengers or freight
    Load,
    /// Waiting on the ground to take off
    Takeoff,
}

impl TaskType {
    /// Task types that may legally follow this one in a task list.
    pub fn legal_successors(self) -> &'static [TaskType] {
        match self {
            TaskType::Away => &[TaskType::Away, TaskType::Land],
            TaskType::Land => &[TaskType::Wait, TaskType::Load],
            TaskType::Wait => &[TaskType::Wait, TaskType::Load],
            TaskType::Load => &[TaskType::Takeoff],
            TaskType::Takeoff => &[TaskType::Away],
        }
    }

    /// Parses the encoded task type name (e.g. `"LAND"`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "AWAY" => Some(TaskType::Away),
            "LAND" => Some(TaskType::Land),
            "WAIT" => Some(TaskType::Wait),
            "LOAD" => Some(TaskType::Load),
            "TAKEOFF" => Some(TaskType::Takeoff),
            _ => None,
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskType::Away => "AWAY",
            TaskType::Land => "LAND",
            TaskType::Wait => "WAIT",
            TaskType::Load => "LOAD",
            TaskType::Takeoff => "TAKEOFF",
        };
        write!(f, "{}", name)
    }
}

/// A single task, optionally parameterized by a load percentage.
///
/// The load percentage is only meaningful for [`TaskType::Load`] tasks,
/// where it states how full the aircraft should be loaded (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    kind: TaskType,
    load_percent: u8,
}

impl Task {
    /// Create a task with a load percentage of zero.
    pub fn new(kind: TaskType) -> Self {
        Self {
            kind,
            load_percent: 0,
        }
    }

    /// Create a task carrying a load percentage (0-100).
    pub fn with_load(kind: TaskType, load_percent: u8) -> Self {
        debug_assert!(load_percent <= 100);
        Self { kind, load_percent }
    }

    pub fn kind(&self) -> TaskType {
        self.kind
    }

    pub fn load_percent(&self) -> u8 {
        self.load_percent
    }

    /// Machine-readable representation, e.g. `"LOAD@60"` or `"AWAY"`.
    pub fn encode(&self) -> String {
        if self.kind == TaskType::Load {
            format!("{}@{}", self.kind, self.load_percent)
        } else {
            self.kind.to_string()
        }
    }
}

/// A circular list of tasks with a cursor marking the current one.
///
/// # Example
///
/// ```
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
/// assert_eq!(tasks.current_task().kind(), TaskType::Land);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    tasks: Vec<Task>,
    current: usize,
}

impl TaskList {
    /// Create a task list, validating the successor rules for every
    /// adjacent pair including the wrap-around from last to first.
    pub fn new(tasks: Vec<Task>) -> Result<Self, TaskListError> {
        if tasks.is_empty() {
            return Err(TaskListError::Empty);
        }
        for (i, task) in tasks.iter().enumerate() {
            let next = tasks[(i + 1) % tasks.len()];
            if !task.kind().legal_successors().contains(&next.kind()) {
                return Err(TaskListError::IllegalOrder {
                    from: task.kind(),
                    to: next.kind(),
                });
            }
        }
        Ok(Self { tasks, current: 0 })
    }

    /// The task the aircraft is currently performing.
    pub fn current_task(&self) -> Task {
        self.tasks[self.current]
    }

    /// Move the cursor to the next task, wrapping at the end of the list.
    pub fn advance(&mut self) {
        self.current = (self.current + 1) % self.tasks.len();
    }

    /// All tasks in list order, independent of the cursor.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Machine-readable representation: comma-joined encoded tasks,
    /// starting from the current task. Decoding the result yields a task
    /// list whose cursor sits on the same task.
    pub fn encode(&self) -> String {
        (0..self.tasks.len())
            .map(|offset| self.tasks[(self.current + offset) % self.tasks.len()].encode())
            .collect::<Vec<_>>()
            .join(",")
    }
}
