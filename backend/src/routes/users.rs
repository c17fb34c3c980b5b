//! User API routes
//!
//! Users come into existence through the calculation and metric write paths;
//! these routes only read, adjust, and remove existing records.

use crate::error::ApiError;
use crate::repositories::{UpdateUser, UserRecord};
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use medcalc_shared::types::{MessageResponse, UpdateUserRequest, UserResponse};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route(
        "/:user_id",
        get(get_user).patch(update_user).delete(delete_user),
    )
}

/// Map a stored record onto the wire shape
fn to_response(record: UserRecord) -> UserResponse {
    UserResponse {
        id: record.id,
        user_id: record.user_id,
        is_active: record.is_active,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

/// GET /api/v1/users/{user_id}
async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserService::get(state.db(), &user_id).await?;

    Ok(Json(to_response(user)))
}

/// PATCH /api/v1/users/{user_id} - partial update, only supplied fields change
async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserService::update(
        state.db(),
        &user_id,
        UpdateUser {
            is_active: req.is_active,
        },
    )
    .await?;

    Ok(Json(to_response(user)))
}

/// DELETE /api/v1/users/{user_id} - delete the user and all owned data
async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    UserService::delete(state.db(), &user_id).await?;

    Ok(Json(MessageResponse {
        message: format!("user {user_id} deleted"),
    }))
}
