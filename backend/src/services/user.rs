//! User lifecycle service
//!
//! Users are never registered explicitly: the first calculation or metric
//! submission creates the record ("get-or-create"). Deletion cascades to all
//! owned data.

use crate::error::{is_unique_violation, ApiError};
use crate::repositories::{UpdateUser, UserRecord, UserRepository};
use sqlx::PgPool;
use tracing::{info, warn};

/// User service for lifecycle operations
pub struct UserService;

impl UserService {
    /// Return the existing user or create one with default attributes.
    ///
    /// A race between two concurrent creates for the same identifier is
    /// resolved by the store's unique constraint; the loser surfaces as
    /// `Conflict` instead of silently producing a duplicate.
    pub async fn get_or_create(pool: &PgPool, user_id: &str) -> Result<UserRecord, ApiError> {
        if let Some(user) = UserRepository::find(pool, user_id).await? {
            return Ok(user);
        }

        match UserRepository::insert(pool, user_id).await {
            Ok(user) => {
                info!(user_id, "created new user");
                Ok(user)
            }
            Err(err) if is_unique_violation(&err) => Err(ApiError::Conflict(format!(
                "user '{user_id}' already exists"
            ))),
            Err(err) => Err(err.into()),
        }
    }

    /// Get a user by identifier
    pub async fn get(pool: &PgPool, user_id: &str) -> Result<UserRecord, ApiError> {
        UserRepository::find(pool, user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("user '{user_id}' not found")))
    }

    /// Partially update a user; only supplied fields change
    pub async fn update(
        pool: &PgPool,
        user_id: &str,
        updates: UpdateUser,
    ) -> Result<UserRecord, ApiError> {
        UserRepository::update(pool, user_id, updates)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("user '{user_id}' not found")))
    }

    /// Delete a user together with all owned calculations and metrics
    pub async fn delete(pool: &PgPool, user_id: &str) -> Result<(), ApiError> {
        if !UserRepository::delete(pool, user_id).await? {
            return Err(ApiError::NotFound(format!("user '{user_id}' not found")));
        }
        info!(user_id, "deleted user");
        Ok(())
    }

    /// Advisory existence check.
    ///
    /// Never raises: a storage failure is logged and reported as `false`.
    /// This is a pre-check helper, not an authorization primitive.
    pub async fn exists(pool: &PgPool, user_id: &str) -> bool {
        match UserRepository::exists(pool, user_id).await {
            Ok(exists) => exists,
            Err(err) => {
                warn!(user_id, "existence check failed: {err}");
                false
            }
        }
    }
}
