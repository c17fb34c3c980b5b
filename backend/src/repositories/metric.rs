//! Health metric repository for database operations

use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Health metric record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MetricRecord {
    pub id: i64,
    pub user_id: String,
    pub metric_type: String,
    pub value: f64,
    pub unit: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a health metric
#[derive(Debug, Clone)]
pub struct CreateMetric {
    pub user_id: String,
    pub metric_type: String,
    pub value: f64,
    pub unit: String,
    pub notes: Option<String>,
}

/// Health metric repository for database operations
pub struct MetricRepository;

impl MetricRepository {
    /// Persist a new health metric
    pub async fn create(pool: &PgPool, input: CreateMetric) -> sqlx::Result<MetricRecord> {
        sqlx::query_as::<_, MetricRecord>(
            r#"
            INSERT INTO health_metrics (user_id, metric_type, value, unit, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, metric_type, value, unit, notes, created_at
            "#,
        )
        .bind(&input.user_id)
        .bind(&input.metric_type)
        .bind(input.value)
        .bind(&input.unit)
        .bind(&input.notes)
        .fetch_one(pool)
        .await
    }

    /// Get a metric by id
    pub async fn find_by_id(pool: &PgPool, id: i64) -> sqlx::Result<Option<MetricRecord>> {
        sqlx::query_as::<_, MetricRecord>(
            r#"
            SELECT id, user_id, metric_type, value, unit, notes, created_at
            FROM health_metrics
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// List a user's metrics, newest first, optionally filtered by type
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: &str,
        metric_type: Option<&str>,
        limit: i64,
    ) -> sqlx::Result<Vec<MetricRecord>> {
        sqlx::query_as::<_, MetricRecord>(
            r#"
            SELECT id, user_id, metric_type, value, unit, notes, created_at
            FROM health_metrics
            WHERE user_id = $1 AND ($2::text IS NULL OR metric_type = $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(metric_type)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Delete a metric by id
    pub async fn delete(pool: &PgPool, id: i64) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM health_metrics
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
