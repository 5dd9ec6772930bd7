//! Request and response bodies exchanged with the task API.
//!
//! Two task schemas are in use. The CRUD user speaks the `status` schema
//! ([`NewTask`], [`TaskUpdate`]) and the dashboard user the `priority` +
//! `completed` schema ([`NewPrioritizedTask`], [`CompletionUpdate`]). Responses
//! are only ever read for their `id`.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::api::TASKS_PATH;

/// Identifier assigned to a task by the API.
///
/// Kept verbatim and only rendered back into a path, so both numeric and
/// string identifiers are accepted.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Number(i64),
    Text(String),
}

impl TaskId {
    /// Path of the single-item endpoint for this task, ie `/api/tasks/42`.
    pub fn path(&self) -> String {
        format!("{}/{}", TASKS_PATH, self)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TaskId::Number(id) => write!(f, "{}", id),
            TaskId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for TaskId {
    fn from(id: i64) -> Self {
        TaskId::Number(id)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        TaskId::Text(id.to_string())
    }
}

/// The only part of a task record the load test looks at.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TaskRef {
    #[serde(default)]
    pub id: Option<TaskId>,
}

/// Workflow states understood by the `status` schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// States a newly created task may start in.
    pub const CREATE: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];
    /// States an update moves a task into.
    pub const UPDATE: [TaskStatus; 2] = [TaskStatus::InProgress, TaskStatus::Completed];
}

/// Priorities understood by the `priority` schema.
///
/// This is the full set the API accepts. The dashboard user only sends
/// [`Priority::Medium`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

/// Body of `POST /api/tasks` sent by the CRUD user.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

impl NewTask {
    /// A task with a numbered title and a random initial status.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        NewTask {
            title: format!("Load Test Task {}", rng.random_range(1..=1000)),
            description: format!(
                "This is a load test task created at {}",
                rng.random_range(1..=1000)
            ),
            status: *TaskStatus::CREATE
                .choose(rng)
                .unwrap_or(&TaskStatus::Pending),
        }
    }
}

/// Body of `PUT /api/tasks/{id}` sent by the CRUD user.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TaskUpdate {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

impl TaskUpdate {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        TaskUpdate {
            title: format!("Updated Task {}", rng.random_range(1..=1000)),
            description: "Updated during load test".to_string(),
            status: *TaskStatus::UPDATE
                .choose(rng)
                .unwrap_or(&TaskStatus::InProgress),
        }
    }
}

/// Body of `POST /api/tasks` sent by the dashboard user.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewPrioritizedTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub completed: bool,
}

impl Default for NewPrioritizedTask {
    fn default() -> Self {
        NewPrioritizedTask {
            title: "Load Test Task".to_string(),
            description: "Created by load test".to_string(),
            priority: Priority::Medium,
            completed: false,
        }
    }
}

/// Partial update flagging a task as done.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CompletionUpdate {
    pub completed: bool,
}

/// Body returned by `GET /actuator/health`.
#[derive(Clone, Debug, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_up(&self) -> bool {
        self.status == "UP"
    }
}
