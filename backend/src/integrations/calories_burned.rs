//! Client for the API-Ninjas calories-burned API
//!
//! The client is strictly best-effort: timeouts, non-2xx responses and
//! malformed payloads are logged and reported as an empty result. Callers
//! hold the fallback policy; this module never raises.
//!
//! The pure planning helpers (calorie deficit sizing, exercise
//! recommendations) live here as well so the whole enrichment vocabulary
//! stays in one place.

use crate::config::EnrichmentConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// kg to lb conversion factor; the API expects pounds
const KG_TO_LB: f64 = 2.20462;

/// Calories in one kilogram of body fat
const KCAL_PER_KG_FAT: f64 = 7700.0;

/// One activity record returned by the calories-burned API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityCalories {
    pub name: String,
    #[serde(default)]
    pub calories_per_hour: f64,
    #[serde(default)]
    pub total_calories: f64,
}

/// HTTP client for the calories-burned endpoint
pub struct CaloriesBurnedClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    enabled: bool,
}

impl CaloriesBurnedClient {
    /// Build a client from configuration.
    ///
    /// The base URL is configurable so tests can point at a local mock.
    pub fn new(config: &EnrichmentConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            enabled: config.enabled,
        })
    }

    /// Look up calorie figures for an activity.
    ///
    /// Returns an empty list when the client is disabled or on any failure.
    pub async fn calories_burned(
        &self,
        activity: &str,
        weight_kg: Option<f64>,
        duration_minutes: Option<i64>,
    ) -> Vec<ActivityCalories> {
        if !self.enabled {
            return Vec::new();
        }

        match self.request(activity, weight_kg, duration_minutes).await {
            Ok(results) => {
                debug!(activity, found = results.len(), "calories-burned lookup");
                results
            }
            Err(err) => {
                warn!(activity, "calories-burned lookup failed: {err}");
                Vec::new()
            }
        }
    }

    async fn request(
        &self,
        activity: &str,
        weight_kg: Option<f64>,
        duration_minutes: Option<i64>,
    ) -> Result<Vec<ActivityCalories>, reqwest::Error> {
        let mut params = vec![("activity", activity.to_string())];
        if let Some(kg) = weight_kg {
            params.push(("weight", ((kg * KG_TO_LB) as i64).to_string()));
        }
        if let Some(minutes) = duration_minutes {
            params.push(("duration", minutes.to_string()));
        }

        self.http
            .get(format!("{}/caloriesburned", self.base_url))
            .header("X-Api-Key", &self.api_key)
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

// ============================================================================
// Deficit Planning
// ============================================================================

/// Calorie deficit recommendation for a weight loss target
#[derive(Debug, Clone)]
pub struct DeficitPlan {
    pub tdee: f64,
    /// Daily calorie intake to aim for
    pub target_calories: f64,
    pub daily_deficit: f64,
    pub weekly_deficit: f64,
    /// Weight loss per week the recommended deficit actually yields
    pub achievable_loss_per_week: f64,
    pub warning: Option<String>,
    /// Share of the deficit to cover with exercise (40%)
    pub exercise_burn_target: f64,
    /// Share of the deficit to cover with diet (60%)
    pub diet_reduction_target: f64,
}

/// Size a calorie deficit for a weekly weight-loss target.
///
/// The deficit is clamped to the safe 15-25% band of TDEE and the resulting
/// intake never drops below 60% of TDEE.
pub fn deficit_recommendation(tdee: f64, target_kg_per_week: f64) -> DeficitPlan {
    let daily_deficit_needed = target_kg_per_week * KCAL_PER_KG_FAT / 7.0;

    let max_safe_deficit = tdee * 0.25;
    let min_deficit = tdee * 0.15;

    let (mut recommended, mut achievable, mut warning) = if daily_deficit_needed > max_safe_deficit
    {
        (
            max_safe_deficit,
            max_safe_deficit * 7.0 / KCAL_PER_KG_FAT,
            Some("The desired pace is too fast. A slower weight loss is recommended.".to_string()),
        )
    } else if daily_deficit_needed < min_deficit {
        (min_deficit, min_deficit * 7.0 / KCAL_PER_KG_FAT, None)
    } else {
        (daily_deficit_needed, target_kg_per_week, None)
    };

    let mut target_calories = tdee - recommended;

    let min_calories = tdee * 0.60;
    if target_calories < min_calories {
        target_calories = min_calories;
        recommended = tdee - target_calories;
        achievable = recommended * 7.0 / KCAL_PER_KG_FAT;
        warning = Some("The minimum safe calorie intake has been reached.".to_string());
    }

    DeficitPlan {
        tdee,
        target_calories,
        daily_deficit: recommended,
        weekly_deficit: recommended * 7.0,
        achievable_loss_per_week: achievable,
        warning,
        exercise_burn_target: recommended * 0.4,
        diet_reduction_target: recommended * 0.6,
    }
}

// ============================================================================
// Exercise Recommendations
// ============================================================================

/// Fitness level selecting the reference activity table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitnessLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

/// Reference calories-per-hour figures for a 70 kg person
fn reference_activities(level: FitnessLevel) -> &'static [(&'static str, f64, &'static str)] {
    match level {
        FitnessLevel::Beginner => &[
            ("Walking (5 km/h)", 240.0, "low"),
            ("Swimming (easy)", 360.0, "low"),
            ("Yoga", 180.0, "low"),
            ("Cycling (15 km/h)", 360.0, "medium"),
        ],
        FitnessLevel::Intermediate => &[
            ("Jogging (8 km/h)", 480.0, "medium"),
            ("Aerobics", 420.0, "medium"),
            ("Cycling (20 km/h)", 540.0, "medium"),
            ("Dancing", 330.0, "medium"),
        ],
        FitnessLevel::Advanced => &[
            ("Running (12 km/h)", 720.0, "high"),
            ("HIIT workout", 660.0, "high"),
            ("Swimming (fast)", 600.0, "high"),
            ("Jump rope", 750.0, "high"),
        ],
    }
}

/// Generate exercise suggestions for burning a calorie target.
///
/// Figures are scaled to the user's weight; suggestions that would take two
/// hours or more are left out.
pub fn exercise_recommendations(
    target_calories: f64,
    weight_kg: f64,
    level: FitnessLevel,
) -> String {
    let weight_factor = weight_kg / 70.0;

    let mut lines = vec![format!(
        "To burn {target_calories:.0} kcal (at {weight_kg:.0} kg):"
    )];

    for (name, reference_cal_per_hour, intensity) in reference_activities(level) {
        let cal_per_hour = reference_cal_per_hour * weight_factor;
        let minutes_needed = target_calories / cal_per_hour * 60.0;

        if minutes_needed < 120.0 {
            lines.push(format!(
                "- {name}: {minutes_needed:.0} min ({cal_per_hour:.0} kcal/hour, {intensity} intensity)"
            ));
        }
    }

    lines.push("Tip: combine different activities for the best results.".to_string());
    lines.join("\n")
}

/// Locally generated activity samples, used when the external API yields
/// nothing. Same shape as the API response so callers format both uniformly.
pub fn fallback_activity_samples(weight_kg: f64, duration_minutes: i64) -> Vec<ActivityCalories> {
    reference_activities(FitnessLevel::Intermediate)
        .iter()
        .map(|(name, reference_cal_per_hour, _)| {
            let calories_per_hour = reference_cal_per_hour * weight_kg / 70.0;
            ActivityCalories {
                name: (*name).to_string(),
                calories_per_hour,
                total_calories: calories_per_hour * duration_minutes as f64 / 60.0,
            }
        })
        .collect()
}

/// Build the full weight-loss plan text: deficit sizing plus exercise
/// suggestions for the exercise share of the deficit.
pub fn weight_loss_plan(tdee: f64, target_kg_per_week: f64, weight_kg: f64) -> String {
    let plan = deficit_recommendation(tdee, target_kg_per_week);
    let exercises = exercise_recommendations(
        plan.exercise_burn_target,
        weight_kg,
        FitnessLevel::Intermediate,
    );

    let mut lines = vec![
        "Weight loss plan:".to_string(),
        format!("- TDEE: {:.0} kcal/day", plan.tdee),
        format!("- Target intake: {:.0} kcal/day", plan.target_calories),
        format!(
            "- Deficit: {:.0} kcal/day ({:.0} kcal/week)",
            plan.daily_deficit, plan.weekly_deficit
        ),
        format!(
            "- Projected loss: {:.1} kg/week",
            plan.achievable_loss_per_week
        ),
    ];

    if let Some(warning) = &plan.warning {
        lines.push(warning.clone());
    }

    lines.push("How to create the deficit:".to_string());
    lines.push(format!(
        "- Diet reduction: {:.0} kcal (60%)",
        plan.diet_reduction_target
    ));
    lines.push(format!(
        "- Physical activity: {:.0} kcal (40%)",
        plan.exercise_burn_target
    ));
    lines.push(String::new());
    lines.push(exercises);

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_deficit_in_band_is_used_as_is() {
        // 0.5 kg/week at TDEE 2750: needed deficit 550, band is 412.5..687.5
        let plan = deficit_recommendation(2750.0, 0.5);
        assert!((plan.daily_deficit - 550.0).abs() < 0.01);
        assert!((plan.achievable_loss_per_week - 0.5).abs() < 0.001);
        assert!(plan.warning.is_none());
    }

    #[test]
    fn test_too_aggressive_target_is_clamped() {
        // 2 kg/week at TDEE 2000: needed 2200/day, clamped to 25% = 500
        let plan = deficit_recommendation(2000.0, 2.0);
        assert!((plan.daily_deficit - 500.0).abs() < 0.01);
        assert!(plan.warning.is_some());
    }

    #[test]
    fn test_tiny_target_raised_to_minimum() {
        // 0.1 kg/week at TDEE 2000: needed 110/day, raised to 15% = 300
        let plan = deficit_recommendation(2000.0, 0.1);
        assert!((plan.daily_deficit - 300.0).abs() < 0.01);
        assert!(plan.warning.is_none());
    }

    #[test]
    fn test_deficit_split_is_60_40() {
        let plan = deficit_recommendation(2500.0, 0.5);
        assert!((plan.diet_reduction_target - plan.daily_deficit * 0.6).abs() < 0.01);
        assert!((plan.exercise_burn_target - plan.daily_deficit * 0.4).abs() < 0.01);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: target intake never drops below 60% of TDEE
        #[test]
        fn prop_intake_floor(tdee in 1200.0f64..4000.0, target in 0.0f64..5.0) {
            let plan = deficit_recommendation(tdee, target);
            prop_assert!(plan.target_calories >= tdee * 0.60 - 0.01);
        }

        /// Property: the recommended deficit never exceeds 25% of TDEE
        #[test]
        fn prop_deficit_ceiling(tdee in 1200.0f64..4000.0, target in 0.0f64..5.0) {
            let plan = deficit_recommendation(tdee, target);
            prop_assert!(plan.daily_deficit <= tdee * 0.25 + 0.01);
        }
    }

    #[test]
    fn test_exercise_recommendations_skip_long_sessions() {
        // A small target keeps everything under two hours
        let text = exercise_recommendations(200.0, 70.0, FitnessLevel::Intermediate);
        assert!(text.contains("Jogging"));
        assert!(text.contains("Tip:"));

        // A huge target rules every activity out, leaving header and footer
        let text = exercise_recommendations(5000.0, 70.0, FitnessLevel::Beginner);
        assert!(!text.contains("Walking"));
    }

    #[test]
    fn test_exercise_recommendations_scale_with_weight() {
        // At 140kg every figure doubles relative to the 70kg reference
        let text = exercise_recommendations(480.0, 140.0, FitnessLevel::Intermediate);
        assert!(text.contains("960 kcal/hour"));
    }

    #[test]
    fn test_fallback_samples_scale_with_weight_and_duration() {
        let samples = fallback_activity_samples(140.0, 30);
        assert_eq!(samples.len(), 4);
        // Jogging reference is 480 kcal/hour at 70kg, doubled at 140kg
        assert_eq!(samples[0].name, "Jogging (8 km/h)");
        assert!((samples[0].calories_per_hour - 960.0).abs() < 0.01);
        assert!((samples[0].total_calories - 480.0).abs() < 0.01);
    }

    #[test]
    fn test_weight_loss_plan_contains_headline_figures() {
        let text = weight_loss_plan(2750.0, 0.5, 80.0);
        assert!(text.contains("Weight loss plan:"));
        assert!(text.contains("TDEE: 2750 kcal/day"));
        assert!(text.contains("Deficit: 550 kcal/day"));
        assert!(text.contains("Diet reduction: 330 kcal (60%)"));
        assert!(text.contains("Physical activity: 220 kcal (40%)"));
    }
}
