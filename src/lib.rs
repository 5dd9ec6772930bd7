//! # taskapi-loadtest
//!
//! A [Goose](https://docs.rs/goose/) load test for the task management REST
//! API. Two kinds of simulated users are defined, each as its own Goose
//! [`Scenario`]:
//!
//!  - `TaskManagementUser` remembers the tasks it has seen and runs the full
//!    create, read, update and delete mix, plus the actuator health and
//!    Prometheus probes.
//!  - `DashboardUser` loads the dashboard, lists tasks, creates tasks using the
//!    priority schema and marks the first listed task as completed.
//!
//! Scheduling, user spawning and metrics are all left to Goose. Each user
//! picks its next transaction weighted by the values set below and sleeps
//! between 1 and 3 seconds after each one.
//!
//! ## Running
//!
//! ```bash
//! $ TARGET_HOST=http://localhost:8080 cargo run --release -- -u20 -r2 -t10m
//! ```
//!
//! All Goose run-time options are available, for example `--scenarios
//! dashboarduser` to only run the dashboard user, or `--test-plan` to shape
//! the load. See [`config`] for the environment defaults.
//!
//! ## License
//!
//! Copyright 2026 The taskapi-loadtest Authors
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! you may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//! http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

use goose::prelude::*;
use std::time::Duration;

pub mod api;
pub mod config;
pub mod crud;
pub mod dashboard;
pub mod payload;
pub mod session;
pub mod thresholds;

use crate::crud::{
    create_task, delete_task, get_task, health_check, list_tasks, metrics_check, start_session,
    update_task,
};
use crate::dashboard::{browse_tasks, complete_first_task, create_prioritized_task, view_dashboard};

/// Shortest pause between two transactions of the same user.
pub const MIN_WAIT: Duration = Duration::from_secs(1);
/// Longest pause between two transactions of the same user.
pub const MAX_WAIT: Duration = Duration::from_secs(3);

/// Builds the `TaskManagementUser` scenario.
pub fn task_management_user() -> Result<Scenario, GooseError> {
    Ok(scenario!("TaskManagementUser")
        .set_wait_time(MIN_WAIT, MAX_WAIT)?
        .register_transaction(transaction!(start_session).set_on_start())
        .register_transaction(transaction!(list_tasks).set_weight(3)?)
        .register_transaction(transaction!(create_task).set_weight(2)?)
        .register_transaction(transaction!(get_task).set_weight(2)?)
        .register_transaction(transaction!(update_task))
        .register_transaction(transaction!(delete_task))
        .register_transaction(transaction!(health_check))
        .register_transaction(transaction!(metrics_check)))
}

/// Builds the `DashboardUser` scenario.
pub fn dashboard_user() -> Result<Scenario, GooseError> {
    Ok(scenario!("DashboardUser")
        .set_wait_time(MIN_WAIT, MAX_WAIT)?
        .register_transaction(transaction!(view_dashboard).set_weight(3)?)
        .register_transaction(transaction!(browse_tasks).set_weight(2)?)
        .register_transaction(transaction!(create_prioritized_task))
        .register_transaction(transaction!(complete_first_task)))
}

/// Registers both scenarios on `goose_attack`.
pub fn register_scenarios(goose_attack: GooseAttack) -> Result<GooseAttack, GooseError> {
    Ok(goose_attack
        .register_scenario(task_management_user()?)
        .register_scenario(dashboard_user()?))
}
