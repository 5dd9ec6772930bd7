//! Endpoints of the task API and the request helpers shared by both scenarios.

use goose::goose::{
    GooseMethod, GooseRequest, GooseResponse, GooseUser, TransactionError, TransactionResult,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::payload::TaskId;

/// Dashboard served by the frontend.
pub const DASHBOARD_PATH: &str = "/";
/// Task collection.
pub const TASKS_PATH: &str = "/api/tasks";
/// Spring actuator health probe.
pub const HEALTH_PATH: &str = "/actuator/health";
/// Spring actuator Prometheus scrape.
pub const PROMETHEUS_PATH: &str = "/actuator/prometheus";

/// Name all single-task requests are aggregated under in the metrics.
pub const TASK_ITEM_NAME: &str = "/api/tasks/{id}";

/// Returns the status code of the response, or `None` if the request failed
/// before a response was received.
pub fn status_code(goose: &GooseResponse) -> Option<u16> {
    goose
        .response
        .as_ref()
        .ok()
        .map(|response| response.status().as_u16())
}

/// Decodes the JSON body of a response whose status is one of `expected`.
///
/// Returns `Ok(None)` without reading the body for any other status, or if no
/// response was received. A body that doesn't decode is returned as a
/// [`TransactionError`] so Goose records it against the transaction.
pub async fn json_body<T: DeserializeOwned>(
    goose: GooseResponse,
    expected: &[u16],
) -> Result<Option<T>, Box<TransactionError>> {
    let response = match goose.response {
        Ok(response) if expected.contains(&response.status().as_u16()) => response,
        _ => return Ok(None),
    };
    match response.json::<T>().await {
        Ok(body) => Ok(Some(body)),
        Err(e) => Err(Box::new(e.into())),
    }
}

/// Sends `body` as JSON in a `PUT` to the task's item endpoint.
pub async fn put_task<T: Serialize>(
    user: &mut GooseUser,
    id: &TaskId,
    body: &T,
) -> Result<GooseResponse, Box<TransactionError>> {
    let path = id.path();
    let request_builder = user
        .get_request_builder(&GooseMethod::Put, &path)?
        .json(body);
    let goose_request = GooseRequest::builder()
        .method(GooseMethod::Put)
        .path(path.as_str())
        .name(TASK_ITEM_NAME)
        .set_request_builder(request_builder)
        .build();

    user.request(goose_request).await
}

/// Sends a `DELETE` to the task's item endpoint.
pub async fn delete_task(
    user: &mut GooseUser,
    id: &TaskId,
) -> Result<GooseResponse, Box<TransactionError>> {
    let path = id.path();
    let goose_request = GooseRequest::builder()
        .method(GooseMethod::Delete)
        .path(path.as_str())
        .name(TASK_ITEM_NAME)
        .build();

    user.request(goose_request).await
}

/// Records a request against a task item as a success when the server
/// answered with one of the `tolerated` statuses.
///
/// Tasks known to one user can be deleted by another at any time, so a 404 on
/// an item endpoint is expected traffic rather than a failure.
pub fn tolerate(
    user: &GooseUser,
    goose: &mut GooseResponse,
    tolerated: &[u16],
) -> TransactionResult {
    match status_code(goose) {
        Some(status) if tolerated.contains(&status) => user.set_success(&mut goose.request),
        _ => Ok(()),
    }
}
