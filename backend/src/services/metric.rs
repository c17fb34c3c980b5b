//! Health metric service
//!
//! Metrics are caller-reported measurements (weight readings, glucose,
//! temperature) that no formula produced. Creation get-or-creates the user
//! like the calculation flows; deletion enforces the same
//! existence-then-ownership order as calculations.

use crate::error::ApiError;
use crate::repositories::{CreateMetric, MetricRecord, MetricRepository};
use crate::services::UserService;
use medcalc_shared::types::{CreateMetricRequest, MetricListQuery};
use sqlx::PgPool;
use tracing::info;

/// Health metric service
pub struct MetricService;

impl MetricService {
    /// Persist a caller-reported health metric
    pub async fn create(
        pool: &PgPool,
        req: &CreateMetricRequest,
    ) -> Result<MetricRecord, ApiError> {
        if !req.value.is_finite() {
            return Err(ApiError::Validation(
                "metric value must be a finite number".to_string(),
            ));
        }

        UserService::get_or_create(pool, &req.user_id).await?;

        let record = MetricRepository::create(
            pool,
            CreateMetric {
                user_id: req.user_id.clone(),
                metric_type: req.metric_type.clone(),
                value: req.value,
                unit: req.unit.clone(),
                notes: req.notes.clone(),
            },
        )
        .await?;

        info!(user_id = %req.user_id, metric_type = %record.metric_type, "stored health metric");
        Ok(record)
    }

    /// List a user's metrics, newest first, optionally filtered by type
    pub async fn list(
        pool: &PgPool,
        query: &MetricListQuery,
    ) -> Result<Vec<MetricRecord>, ApiError> {
        let records = MetricRepository::list_for_user(
            pool,
            &query.user_id,
            query.metric_type.as_deref(),
            query.limit,
        )
        .await?;

        Ok(records)
    }

    /// Delete an owned metric.
    ///
    /// Existence is checked before ownership, matching the calculation
    /// deletion contract.
    pub async fn delete(pool: &PgPool, user_id: &str, metric_id: i64) -> Result<(), ApiError> {
        let record = MetricRepository::find_by_id(pool, metric_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("metric {metric_id} not found")))?;

        if record.user_id != user_id {
            return Err(ApiError::Forbidden(
                "metric belongs to another user".to_string(),
            ));
        }

        if !MetricRepository::delete(pool, metric_id).await? {
            return Err(ApiError::NotFound(format!("metric {metric_id} not found")));
        }
        info!(user_id, metric_id, "deleted health metric");
        Ok(())
    }
}
