//! Calculation repository for database operations

use chrono::{DateTime, Utc};
use medcalc_shared::types::CalcType;
use sqlx::PgPool;

/// Calculation record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CalculationRecord {
    pub id: i64,
    pub user_id: String,
    pub calc_type: String,
    pub input_data: String,
    pub result: f64,
    pub interpretation: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a calculation
#[derive(Debug, Clone)]
pub struct CreateCalculation {
    pub user_id: String,
    pub calc_type: CalcType,
    pub input_data: String,
    pub result: f64,
    pub interpretation: Option<String>,
}

/// Per-type aggregate row for the stats query
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CalcStatsRow {
    pub calc_type: String,
    pub count: i64,
    pub avg: Option<f64>,
}

/// Calculation repository for database operations
pub struct CalculationRepository;

impl CalculationRepository {
    /// Persist a new calculation; the store assigns id and timestamp
    pub async fn create(
        pool: &PgPool,
        input: CreateCalculation,
    ) -> sqlx::Result<CalculationRecord> {
        sqlx::query_as::<_, CalculationRecord>(
            r#"
            INSERT INTO calculations (user_id, calc_type, input_data, result, interpretation)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, calc_type, input_data, result, interpretation, created_at
            "#,
        )
        .bind(&input.user_id)
        .bind(input.calc_type.as_str())
        .bind(&input.input_data)
        .bind(input.result)
        .bind(&input.interpretation)
        .fetch_one(pool)
        .await
    }

    /// Get a calculation by id
    pub async fn find_by_id(pool: &PgPool, id: i64) -> sqlx::Result<Option<CalculationRecord>> {
        sqlx::query_as::<_, CalculationRecord>(
            r#"
            SELECT id, user_id, calc_type, input_data, result, interpretation, created_at
            FROM calculations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// List a user's calculations, newest first, optionally filtered by type.
    ///
    /// The id tie-breaker keeps the ordering deterministic so pagination
    /// neither skips nor duplicates rows under concurrent inserts.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: &str,
        calc_type: Option<CalcType>,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<CalculationRecord>> {
        sqlx::query_as::<_, CalculationRecord>(
            r#"
            SELECT id, user_id, calc_type, input_data, result, interpretation, created_at
            FROM calculations
            WHERE user_id = $1 AND ($2::text IS NULL OR calc_type = $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id)
        .bind(calc_type.map(|t| t.as_str()))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Count a user's calculations under the same filter as `list_for_user`
    pub async fn count_for_user(
        pool: &PgPool,
        user_id: &str,
        calc_type: Option<CalcType>,
    ) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM calculations
            WHERE user_id = $1 AND ($2::text IS NULL OR calc_type = $2)
            "#,
        )
        .bind(user_id)
        .bind(calc_type.map(|t| t.as_str()))
        .fetch_one(pool)
        .await
    }

    /// Amend the interpretation of a calculation
    pub async fn update_interpretation(
        pool: &PgPool,
        id: i64,
        interpretation: &str,
    ) -> sqlx::Result<Option<CalculationRecord>> {
        sqlx::query_as::<_, CalculationRecord>(
            r#"
            UPDATE calculations SET
                interpretation = $2
            WHERE id = $1
            RETURNING id, user_id, calc_type, input_data, result, interpretation, created_at
            "#,
        )
        .bind(id)
        .bind(interpretation)
        .fetch_optional(pool)
        .await
    }

    /// Delete a calculation by id
    pub async fn delete(pool: &PgPool, id: i64) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM calculations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete all of a user's calculations, optionally filtered by type.
    /// Returns the number of deleted rows.
    pub async fn delete_for_user(
        pool: &PgPool,
        user_id: &str,
        calc_type: Option<CalcType>,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM calculations
            WHERE user_id = $1 AND ($2::text IS NULL OR calc_type = $2)
            "#,
        )
        .bind(user_id)
        .bind(calc_type.map(|t| t.as_str()))
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Group a user's calculations by type with count and mean result
    pub async fn stats_for_user(pool: &PgPool, user_id: &str) -> sqlx::Result<Vec<CalcStatsRow>> {
        sqlx::query_as::<_, CalcStatsRow>(
            r#"
            SELECT calc_type, COUNT(*) AS count, AVG(result) AS avg
            FROM calculations
            WHERE user_id = $1
            GROUP BY calc_type
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    // Repository behavior is covered by the integration tests in
    // backend/tests, which run against a real database.
}
