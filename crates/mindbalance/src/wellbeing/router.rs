use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

use super::domain::{CheckInSubmission, DepartmentFilter, Period, ResourceId, UserId};
use super::service::{ResourceFilter, WellbeingError, WellbeingService};
use super::store::{DocumentStore, StoreError};

/// Router builder exposing check-in, dashboard and resource endpoints.
pub fn wellbeing_router<S>(service: Arc<WellbeingService<S>>) -> Router
where
    S: DocumentStore + 'static,
{
    Router::new()
        .route("/api/checkin", post(submit_handler::<S>))
        .route("/api/checkin/history/:user_id", get(history_handler::<S>))
        .route(
            "/api/dashboard/personal/:user_id",
            get(personal_dashboard_handler::<S>),
        )
        .route("/api/dashboard/admin", get(admin_dashboard_handler::<S>))
        .route("/api/resources", get(resources_handler::<S>))
        .route("/api/resources/:resource_id", get(resource_handler::<S>))
        .with_state(service)
}

/// Success envelope: the payload's fields next to `"success": true`.
#[derive(Debug, Serialize)]
struct Success<T> {
    success: bool,
    #[serde(flatten)]
    body: T,
}

fn success<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, Json(Success { success: true, body })).into_response()
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({
        "success": false,
        "message": message.into(),
    });
    (status, Json(payload)).into_response()
}

impl WellbeingError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WellbeingError::NotFound(_) => StatusCode::NOT_FOUND,
            WellbeingError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            WellbeingError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WellbeingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "wellbeing request failed");
        } else {
            warn!(error = %self, "wellbeing request rejected");
        }
        failure(status, self.to_string())
    }
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Run a service call on the blocking pool; the store does synchronous file I/O.
async fn run_blocking<S, T, F>(
    service: Arc<WellbeingService<S>>,
    operation: F,
) -> Result<T, WellbeingError>
where
    S: DocumentStore + 'static,
    T: Send + 'static,
    F: FnOnce(&WellbeingService<S>) -> Result<T, WellbeingError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || operation(&service))
        .await
        .map_err(|err| {
            WellbeingError::Store(StoreError::Unavailable(format!(
                "store task did not complete: {err}"
            )))
        })?
}

fn respond<T: Serialize>(status: StatusCode, outcome: Result<T, WellbeingError>) -> Response {
    match outcome {
        Ok(body) => success(status, body),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Serialize)]
struct CheckInBody<T> {
    checkin: T,
}

#[derive(Debug, Serialize)]
struct ResourceBody<T> {
    resource: T,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PeriodQuery {
    #[serde(default)]
    period: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AdminQuery {
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    period: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResourceQuery {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<WellbeingService<S>>>,
    payload: Result<Json<CheckInSubmission>, JsonRejection>,
) -> Response
where
    S: DocumentStore + 'static,
{
    let Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "check-in payload rejected");
            return failure(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text());
        }
    };

    let now = local_now();
    let outcome = run_blocking(service, move |service| {
        service
            .submit_check_in(submission, now)
            .map(|record| CheckInBody { checkin: record })
    })
    .await;
    respond(StatusCode::CREATED, outcome)
}

pub(crate) async fn history_handler<S>(
    State(service): State<Arc<WellbeingService<S>>>,
    Path(user_id): Path<String>,
    Query(query): Query<PeriodQuery>,
) -> Response
where
    S: DocumentStore + 'static,
{
    let period = Period::from_query(query.period.as_deref());
    let now = local_now();
    let outcome = run_blocking(service, move |service| {
        service.check_in_history(&UserId(user_id), period, now)
    })
    .await;
    respond(StatusCode::OK, outcome)
}

pub(crate) async fn personal_dashboard_handler<S>(
    State(service): State<Arc<WellbeingService<S>>>,
    Path(user_id): Path<String>,
) -> Response
where
    S: DocumentStore + 'static,
{
    let now = local_now();
    let outcome = run_blocking(service, move |service| {
        service.personal_dashboard(&UserId(user_id), now)
    })
    .await;
    respond(StatusCode::OK, outcome)
}

pub(crate) async fn admin_dashboard_handler<S>(
    State(service): State<Arc<WellbeingService<S>>>,
    Query(query): Query<AdminQuery>,
) -> Response
where
    S: DocumentStore + 'static,
{
    let department = DepartmentFilter::from_query(query.department.as_deref());
    let period = Period::from_query(query.period.as_deref());
    let now = local_now();
    let outcome = run_blocking(service, move |service| {
        service.admin_dashboard(&department, period, now)
    })
    .await;
    respond(StatusCode::OK, outcome)
}

pub(crate) async fn resources_handler<S>(
    State(service): State<Arc<WellbeingService<S>>>,
    Query(query): Query<ResourceQuery>,
) -> Response
where
    S: DocumentStore + 'static,
{
    let filter = ResourceFilter {
        category: query.category.filter(|value| !value.is_empty()),
        difficulty: query.difficulty.filter(|value| !value.is_empty()),
    };
    let outcome = run_blocking(service, move |service| service.resources(&filter)).await;
    respond(StatusCode::OK, outcome)
}

pub(crate) async fn resource_handler<S>(
    State(service): State<Arc<WellbeingService<S>>>,
    Path(resource_id): Path<u32>,
) -> Response
where
    S: DocumentStore + 'static,
{
    let outcome = run_blocking(service, move |service| {
        service
            .resource(ResourceId(resource_id))
            .map(|resource| ResourceBody { resource })
    })
    .await;
    respond(StatusCode::OK, outcome)
}
