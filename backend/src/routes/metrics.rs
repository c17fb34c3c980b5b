//! Health metric API routes

use crate::error::ApiError;
use crate::repositories::MetricRecord;
use crate::services::MetricService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use medcalc_shared::types::{
    CreateMetricRequest, MessageResponse, MetricListQuery, MetricResponse, OwnerQuery,
};
use validator::Validate;

/// Create metric routes
pub fn metric_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_metric).get(list_metrics))
        .route("/:id", delete(delete_metric))
}

/// Map a stored record onto the wire shape
fn to_response(record: MetricRecord) -> MetricResponse {
    MetricResponse {
        id: record.id,
        user_id: record.user_id,
        metric_type: record.metric_type,
        value: record.value,
        unit: record.unit,
        notes: record.notes,
        created_at: record.created_at,
    }
}

/// POST /api/v1/metrics - record a caller-reported measurement
///
/// Creates the user on first use, like the calculation flows.
async fn create_metric(
    State(state): State<AppState>,
    Json(req): Json<CreateMetricRequest>,
) -> Result<(StatusCode, Json<MetricResponse>), ApiError> {
    req.validate()?;

    let record = MetricService::create(state.db(), &req).await?;

    Ok((StatusCode::CREATED, Json(to_response(record))))
}

/// GET /api/v1/metrics - list a user's metrics, newest first
async fn list_metrics(
    State(state): State<AppState>,
    Query(query): Query<MetricListQuery>,
) -> Result<Json<Vec<MetricResponse>>, ApiError> {
    let query = query.normalize();

    let records = MetricService::list(state.db(), &query).await?;

    Ok(Json(records.into_iter().map(to_response).collect()))
}

/// DELETE /api/v1/metrics/{id} - delete one metric
///
/// The id is checked for existence before ownership.
async fn delete_metric(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    MetricService::delete(state.db(), &query.user_id, id).await?;

    Ok(Json(MessageResponse {
        message: format!("metric {id} deleted"),
    }))
}
