//! Transactions of the `TaskManagementUser` scenario.
//!
//! This user keeps a list of the tasks it has seen and runs the full
//! create, read, update and delete mix against them, along with the actuator
//! health and metrics probes.

use goose::goose::{GooseUser, TransactionResult};
use log::{debug, info, trace};

use crate::api::{self, HEALTH_PATH, PROMETHEUS_PATH, TASKS_PATH, TASK_ITEM_NAME};
use crate::payload::{HealthStatus, NewTask, TaskRef, TaskUpdate};
use crate::session::{known_tasks, KnownTasks};

/// Statuses returned by `POST /api/tasks` when a task was created.
const CREATED: [u16; 2] = [200, 201];
/// Item statuses that are reported as successful reads and updates.
const ITEM_TOLERATED: [u16; 1] = [404];
/// Item statuses that are reported as successful deletes.
const DELETE_TOLERATED: [u16; 2] = [204, 404];

/// Starts the user with an empty list of known tasks.
pub async fn start_session(user: &mut GooseUser) -> TransactionResult {
    user.set_session_data(KnownTasks::new());

    Ok(())
}

/// Loads the task collection and remembers every listed task.
///
/// Any status other than 200 leaves the known tasks untouched.
pub async fn list_tasks(user: &mut GooseUser) -> TransactionResult {
    let goose = user.get(TASKS_PATH).await?;

    if let Some(tasks) = api::json_body::<Vec<TaskRef>>(goose, &[200]).await? {
        let known = known_tasks(user);
        known.refresh(tasks);
        debug!("list_tasks: {} known tasks", known.len());
    }

    Ok(())
}

/// Creates a task and remembers the identifier the API assigned to it.
pub async fn create_task(user: &mut GooseUser) -> TransactionResult {
    let task = NewTask::random(&mut rand::rng());
    let goose = user.post_json(TASKS_PATH, &task).await?;

    if let Some(created) = api::json_body::<TaskRef>(goose, &CREATED).await? {
        match created.id {
            Some(id) => {
                debug!("create_task: created {}", id);
                known_tasks(user).record(id);
            }
            None => info!("create_task: response carried no id"),
        }
    }

    Ok(())
}

/// Loads one of the known tasks.
pub async fn get_task(user: &mut GooseUser) -> TransactionResult {
    let id = match known_tasks(user).pick(&mut rand::rng()) {
        Some(id) => id.clone(),
        None => {
            trace!("get_task: no known tasks, skipping");
            return Ok(());
        }
    };

    let mut goose = user.get_named(&id.path(), TASK_ITEM_NAME).await?;
    api::tolerate(user, &mut goose, &ITEM_TOLERATED)
}

/// Rewrites the title, description and status of one of the known tasks.
pub async fn update_task(user: &mut GooseUser) -> TransactionResult {
    let id = match known_tasks(user).pick(&mut rand::rng()) {
        Some(id) => id.clone(),
        None => {
            trace!("update_task: no known tasks, skipping");
            return Ok(());
        }
    };
    let update = TaskUpdate::random(&mut rand::rng());

    let mut goose = api::put_task(user, &id, &update).await?;
    api::tolerate(user, &mut goose, &ITEM_TOLERATED)
}

/// Deletes the most recently added known task, as long as enough remain for
/// the other transactions.
pub async fn delete_task(user: &mut GooseUser) -> TransactionResult {
    let id = match known_tasks(user).take_for_delete() {
        Some(id) => id,
        None => {
            trace!("delete_task: too few known tasks, skipping");
            return Ok(());
        }
    };
    debug!("delete_task: deleting {}", id);

    let mut goose = api::delete_task(user, &id).await?;
    api::tolerate(user, &mut goose, &DELETE_TOLERATED)
}

/// Probes the actuator health endpoint, which must report `UP`.
pub async fn health_check(user: &mut GooseUser) -> TransactionResult {
    let mut goose = user.get(HEALTH_PATH).await?;

    if let Ok(response) = goose.response {
        if response.status().as_u16() != 200 {
            // Only a 200 carries a health report.
            return Ok(());
        }
        // Copy the headers so we have them for logging if there are errors.
        let headers = &response.headers().clone();
        let failure = match response.json::<HealthStatus>().await {
            Ok(health) if health.is_up() => return Ok(()),
            Ok(health) => format!("health: status is {}", health.status),
            Err(e) => format!("health: failed to parse body: {}", e),
        };
        return user.set_failure(&failure, &mut goose.request, Some(headers), None);
    }

    Ok(())
}

/// Scrapes the actuator Prometheus endpoint.
pub async fn metrics_check(user: &mut GooseUser) -> TransactionResult {
    let _goose = user.get(PROMETHEUS_PATH).await?;

    Ok(())
}
