//! Calculation orchestration service
//!
//! For every calculation type the sequence is the same: get-or-create the
//! user, run the formula, serialize the original input next to the result
//! and interpretation, persist, return the stored record. A formula
//! validation failure short-circuits before anything is written to the
//! calculation history.
//!
//! The calorie flow additionally consults the calories-burned API. That
//! enrichment is best-effort: the base BMR/TDEE record is persisted and
//! returned even when no enrichment text could be produced.

use crate::error::ApiError;
use crate::integrations::{
    fallback_activity_samples, weight_loss_plan, ActivityCalories, CaloriesBurnedClient,
};
use crate::repositories::{
    CalculationRecord, CalculationRepository, CreateCalculation,
};
use crate::services::UserService;
use medcalc_shared::calculators::{
    classify_blood_pressure, compute_bmi, compute_calorie_profile, Sex,
};
use medcalc_shared::types::{
    BloodPressureRequest, BmiRequest, CalcType, CalcTypeStats, CaloriesRequest, HistoryQuery,
    StatsResponse,
};
use serde_json::json;
use sqlx::PgPool;
use std::collections::BTreeMap;
use tracing::info;

/// Default weekly weight-loss target for the deficit plan, in kg
const DEFAULT_WEEKLY_LOSS_KG: f64 = 0.5;

/// BMI at and above which the calorie flow suggests a weight-loss plan
const OVERWEIGHT_BMI: f64 = 25.0;

/// Activities sampled for users below the overweight threshold, tried in
/// this order until four succeed
const SAMPLE_ACTIVITIES: [&str; 6] = [
    "running",
    "swimming",
    "cycling",
    "yoga",
    "walking",
    "rowing",
];

/// Duration used for the sampled activity figures
const SAMPLE_DURATION_MINUTES: i64 = 30;

/// Number of successful samples to collect before stopping
const SAMPLE_TARGET: usize = 4;

/// Calculation orchestration service
pub struct CalculationService;

impl CalculationService {
    /// Compute and persist a BMI calculation
    pub async fn submit_bmi(
        pool: &PgPool,
        req: &BmiRequest,
    ) -> Result<CalculationRecord, ApiError> {
        UserService::get_or_create(pool, &req.user_id).await?;

        let bmi = compute_bmi(req.weight, req.height)?;

        let record = CalculationRepository::create(
            pool,
            CreateCalculation {
                user_id: req.user_id.clone(),
                calc_type: CalcType::Imt,
                input_data: json!({"weight": req.weight, "height": req.height}).to_string(),
                result: bmi.value,
                interpretation: Some(bmi.category.description().to_string()),
            },
        )
        .await?;

        info!(user_id = %req.user_id, result = bmi.value, "stored imt calculation");
        Ok(record)
    }

    /// Compute and persist a daily calorie calculation.
    ///
    /// The persisted result is the TDEE; BMR and the activity description go
    /// into the interpretation, followed by the enrichment text when one
    /// could be produced.
    pub async fn submit_calories(
        pool: &PgPool,
        enrichment: &CaloriesBurnedClient,
        req: &CaloriesRequest,
    ) -> Result<CalculationRecord, ApiError> {
        UserService::get_or_create(pool, &req.user_id).await?;

        let sex = Sex::parse(&req.gender)?;
        let profile =
            compute_calorie_profile(req.age, req.weight, req.height, sex, req.activity_level)?;
        let bmi = compute_bmi(req.weight, req.height)?;

        let mut interpretation = format!(
            "BMR: {:.0} kcal, TDEE: {:.0} kcal ({})",
            profile.bmr, profile.tdee, profile.activity_label
        );

        let enrichment_text = if bmi.value >= OVERWEIGHT_BMI {
            weight_loss_plan(profile.tdee, DEFAULT_WEEKLY_LOSS_KG, req.weight)
        } else {
            Self::sample_exercises(enrichment, req.weight).await
        };
        if !enrichment_text.is_empty() {
            interpretation.push_str("\n\n");
            interpretation.push_str(&enrichment_text);
        }

        let record = CalculationRepository::create(
            pool,
            CreateCalculation {
                user_id: req.user_id.clone(),
                calc_type: CalcType::Calories,
                input_data: json!({
                    "age": req.age,
                    "weight": req.weight,
                    "height": req.height,
                    "gender": req.gender,
                    "activity_level": req.activity_level,
                })
                .to_string(),
                result: profile.tdee,
                interpretation: Some(interpretation),
            },
        )
        .await?;

        info!(user_id = %req.user_id, result = profile.tdee, "stored calories calculation");
        Ok(record)
    }

    /// Classify and persist a blood pressure reading.
    ///
    /// The persisted result is the systolic value.
    pub async fn submit_blood_pressure(
        pool: &PgPool,
        req: &BloodPressureRequest,
    ) -> Result<CalculationRecord, ApiError> {
        UserService::get_or_create(pool, &req.user_id).await?;

        let category = classify_blood_pressure(req.systolic, req.diastolic)?;

        let record = CalculationRepository::create(
            pool,
            CreateCalculation {
                user_id: req.user_id.clone(),
                calc_type: CalcType::BloodPressure,
                input_data: json!({"systolic": req.systolic, "diastolic": req.diastolic})
                    .to_string(),
                result: f64::from(req.systolic),
                interpretation: Some(format!(
                    "{}: {}",
                    category.description(),
                    category.advice()
                )),
            },
        )
        .await?;

        info!(user_id = %req.user_id, "stored blood pressure calculation");
        Ok(record)
    }

    /// Sample 30-minute calorie figures for a fixed set of activities.
    ///
    /// Activities are tried sequentially in a fixed order and the loop stops
    /// after four successes; when the external capability yields nothing the
    /// locally generated samples stand in.
    async fn sample_exercises(enrichment: &CaloriesBurnedClient, weight_kg: f64) -> String {
        let mut samples: Vec<ActivityCalories> = Vec::new();

        for activity in SAMPLE_ACTIVITIES {
            if samples.len() >= SAMPLE_TARGET {
                break;
            }
            let results = enrichment
                .calories_burned(activity, Some(weight_kg), Some(SAMPLE_DURATION_MINUTES))
                .await;
            if let Some(entry) = results.into_iter().next() {
                samples.push(entry);
            }
        }

        if samples.is_empty() {
            samples = fallback_activity_samples(weight_kg, SAMPLE_DURATION_MINUTES);
        }

        Self::format_activity_samples(&samples)
    }

    /// Render activity samples as interpretation text
    fn format_activity_samples(samples: &[ActivityCalories]) -> String {
        let mut lines = vec![format!(
            "Sample activities for {SAMPLE_DURATION_MINUTES} minutes:"
        )];
        for sample in samples {
            lines.push(format!(
                "- {}: ~{:.0} kcal ({:.0} kcal/hour)",
                sample.name, sample.total_calories, sample.calories_per_hour
            ));
        }
        lines.join("\n")
    }

    // ========================================================================
    // History and statistics
    // ========================================================================

    /// Paginated calculation history, newest first.
    ///
    /// Returns `(items, total)` where `total` counts the rows matching the
    /// active filter.
    pub async fn history(
        pool: &PgPool,
        query: &HistoryQuery,
    ) -> Result<(Vec<CalculationRecord>, i64), ApiError> {
        let items = CalculationRepository::list_for_user(
            pool,
            &query.user_id,
            query.calc_type,
            query.limit,
            query.offset,
        )
        .await?;
        let total =
            CalculationRepository::count_for_user(pool, &query.user_id, query.calc_type).await?;

        Ok((items, total))
    }

    /// Per-type statistics over a user's calculations.
    ///
    /// A user with no calculations gets the `{total: 0}` shape, not an error.
    pub async fn stats(pool: &PgPool, user_id: &str) -> Result<StatsResponse, ApiError> {
        let rows = CalculationRepository::stats_for_user(pool, user_id).await?;

        let mut by_type = BTreeMap::new();
        let mut total = 0;
        for row in rows {
            total += row.count;
            by_type.insert(
                row.calc_type,
                CalcTypeStats {
                    count: row.count,
                    avg: (row.avg.unwrap_or(0.0) * 100.0).round() / 100.0,
                },
            );
        }

        Ok(StatsResponse {
            user_id: user_id.to_string(),
            total,
            by_type,
        })
    }

    /// Amend the interpretation of an owned calculation.
    ///
    /// Existence is checked before ownership, so a missing id is `NotFound`
    /// even when the caller would not have owned it.
    pub async fn update_interpretation(
        pool: &PgPool,
        user_id: &str,
        calculation_id: i64,
        interpretation: &str,
    ) -> Result<CalculationRecord, ApiError> {
        Self::find_owned(pool, user_id, calculation_id).await?;

        CalculationRepository::update_interpretation(pool, calculation_id, interpretation)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!("calculation {calculation_id} not found"))
            })
    }

    /// Delete an owned calculation
    pub async fn delete(
        pool: &PgPool,
        user_id: &str,
        calculation_id: i64,
    ) -> Result<(), ApiError> {
        Self::find_owned(pool, user_id, calculation_id).await?;

        if !CalculationRepository::delete(pool, calculation_id).await? {
            return Err(ApiError::NotFound(format!(
                "calculation {calculation_id} not found"
            )));
        }
        info!(user_id, calculation_id, "deleted calculation");
        Ok(())
    }

    /// Delete all of a user's calculations, optionally filtered by type.
    /// An empty filtered set is `NotFound`.
    pub async fn delete_all(
        pool: &PgPool,
        user_id: &str,
        calc_type: Option<CalcType>,
    ) -> Result<u64, ApiError> {
        let deleted = CalculationRepository::delete_for_user(pool, user_id, calc_type).await?;
        if deleted == 0 {
            return Err(ApiError::NotFound("no calculations found".to_string()));
        }
        info!(user_id, deleted, "deleted user calculations");
        Ok(deleted)
    }

    /// Fetch a calculation, enforcing existence before ownership
    async fn find_owned(
        pool: &PgPool,
        user_id: &str,
        calculation_id: i64,
    ) -> Result<CalculationRecord, ApiError> {
        let record = CalculationRepository::find_by_id(pool, calculation_id)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound(format!("calculation {calculation_id} not found"))
            })?;

        if record.user_id != user_id {
            return Err(ApiError::Forbidden(
                "calculation belongs to another user".to_string(),
            ));
        }

        Ok(record)
    }
}
