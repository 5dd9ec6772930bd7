//! Transactions of the `DashboardUser` scenario.
//!
//! This user browses the frontend, lists tasks and creates tasks using the
//! priority schema. It keeps no state of its own; updates target whichever
//! task the API lists first.

use goose::goose::{GooseUser, TransactionResult};
use log::{debug, trace};

use crate::api::{self, DASHBOARD_PATH, TASKS_PATH};
use crate::payload::{CompletionUpdate, NewPrioritizedTask, TaskRef};

/// Loads the dashboard.
pub async fn view_dashboard(user: &mut GooseUser) -> TransactionResult {
    let _goose = user.get(DASHBOARD_PATH).await?;

    Ok(())
}

/// Loads the task collection without looking at it.
pub async fn browse_tasks(user: &mut GooseUser) -> TransactionResult {
    let _goose = user.get(TASKS_PATH).await?;

    Ok(())
}

/// Creates a medium priority task that is not yet completed.
pub async fn create_prioritized_task(user: &mut GooseUser) -> TransactionResult {
    let _goose = user
        .post_json(TASKS_PATH, &NewPrioritizedTask::default())
        .await?;

    Ok(())
}

/// Lists tasks, then marks the first listed task as completed.
pub async fn complete_first_task(user: &mut GooseUser) -> TransactionResult {
    let goose = user.get(TASKS_PATH).await?;

    let tasks = match api::json_body::<Vec<TaskRef>>(goose, &[200]).await? {
        Some(tasks) => tasks,
        None => return Ok(()),
    };
    let id = match tasks.into_iter().next() {
        Some(TaskRef { id: Some(id) }) => id,
        Some(TaskRef { id: None }) => {
            debug!("complete_first_task: first task has no id");
            return Ok(());
        }
        None => {
            trace!("complete_first_task: no tasks listed, skipping");
            return Ok(());
        }
    };

    let _goose = api::put_task(user, &id, &CompletionUpdate { completed: true }).await?;

    Ok(())
}
