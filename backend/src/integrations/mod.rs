//! External service integrations
//!
//! Integrations are best-effort: a failure never propagates to the caller,
//! it degrades to an empty result the orchestrator can fall back from.

pub mod calories_burned;

pub use calories_burned::{
    deficit_recommendation, exercise_recommendations, fallback_activity_samples,
    weight_loss_plan, ActivityCalories, CaloriesBurnedClient, DeficitPlan, FitnessLevel,
};
