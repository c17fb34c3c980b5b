//! Medical calculation API routes

use crate::error::ApiError;
use crate::repositories::CalculationRecord;
use crate::services::CalculationService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use medcalc_shared::types::{
    BloodPressureRequest, BmiRequest, BulkDeleteQuery, CalculationResponse, CaloriesRequest,
    DeletedResponse, HistoryQuery, HistoryResponse, MessageResponse, OwnerQuery, StatsResponse,
    UpdateInterpretationRequest,
};
use validator::Validate;

/// Create calculation routes
pub fn calculation_routes() -> Router<AppState> {
    Router::new()
        .route("/imt", post(submit_imt))
        .route("/calories", post(submit_calories))
        .route("/blood-pressure", post(submit_blood_pressure))
        .route("/history", get(get_history))
        .route("/stats", get(get_stats))
        .route("/", delete(delete_all_calculations))
        .route(
            "/:id",
            delete(delete_calculation).patch(update_interpretation),
        )
}

/// Map a stored record onto the wire shape
fn to_response(record: CalculationRecord) -> CalculationResponse {
    CalculationResponse {
        id: record.id,
        user_id: record.user_id,
        calc_type: record.calc_type,
        input_data: record.input_data,
        result: record.result,
        interpretation: record.interpretation,
        created_at: record.created_at,
    }
}

/// POST /api/v1/calculations/imt - BMI with WHO classification
///
/// Creates the user on first use, then computes and stores the calculation.
async fn submit_imt(
    State(state): State<AppState>,
    Json(req): Json<BmiRequest>,
) -> Result<(StatusCode, Json<CalculationResponse>), ApiError> {
    req.validate()?;

    let record = CalculationService::submit_bmi(state.db(), &req).await?;

    Ok((StatusCode::CREATED, Json(to_response(record))))
}

/// POST /api/v1/calculations/calories - daily calories (Harris-Benedict)
async fn submit_calories(
    State(state): State<AppState>,
    Json(req): Json<CaloriesRequest>,
) -> Result<(StatusCode, Json<CalculationResponse>), ApiError> {
    req.validate()?;

    let record =
        CalculationService::submit_calories(state.db(), state.enrichment(), &req).await?;

    Ok((StatusCode::CREATED, Json(to_response(record))))
}

/// POST /api/v1/calculations/blood-pressure - ACC/AHA 2017 classification
async fn submit_blood_pressure(
    State(state): State<AppState>,
    Json(req): Json<BloodPressureRequest>,
) -> Result<(StatusCode, Json<CalculationResponse>), ApiError> {
    req.validate()?;

    let record = CalculationService::submit_blood_pressure(state.db(), &req).await?;

    Ok((StatusCode::CREATED, Json(to_response(record))))
}

/// GET /api/v1/calculations/history - paginated calculation history
///
/// Newest first; `total` counts the rows matching the active filter.
async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let query = query.normalize();

    let (items, total) = CalculationService::history(state.db(), &query).await?;

    Ok(Json(HistoryResponse {
        user_id: query.user_id,
        total,
        limit: query.limit,
        offset: query.offset,
        items: items.into_iter().map(to_response).collect(),
    }))
}

/// GET /api/v1/calculations/stats - per-type statistics
async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<StatsResponse>, ApiError> {
    let stats = CalculationService::stats(state.db(), &query.user_id).await?;

    Ok(Json(stats))
}

/// PATCH /api/v1/calculations/{id} - amend the interpretation
async fn update_interpretation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateInterpretationRequest>,
) -> Result<Json<CalculationResponse>, ApiError> {
    req.validate()?;

    let record = CalculationService::update_interpretation(
        state.db(),
        &req.user_id,
        id,
        &req.interpretation,
    )
    .await?;

    Ok(Json(to_response(record)))
}

/// DELETE /api/v1/calculations/{id} - delete one calculation
///
/// The id is checked for existence before ownership.
async fn delete_calculation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    CalculationService::delete(state.db(), &query.user_id, id).await?;

    Ok(Json(MessageResponse {
        message: format!("calculation {id} deleted"),
    }))
}

/// DELETE /api/v1/calculations - bulk delete, optionally by type
async fn delete_all_calculations(
    State(state): State<AppState>,
    Query(query): Query<BulkDeleteQuery>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted =
        CalculationService::delete_all(state.db(), &query.user_id, query.calc_type).await?;

    Ok(Json(DeletedResponse { deleted }))
}
