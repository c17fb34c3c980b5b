//! API request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Default history page size
const DEFAULT_HISTORY_LIMIT: i64 = 10;
/// Maximum history page size
const MAX_HISTORY_LIMIT: i64 = 100;

/// Default metric list size
const DEFAULT_METRIC_LIMIT: i64 = 100;

// ============================================================================
// Calculation Types
// ============================================================================

/// The formula that produced a calculation record.
///
/// Serialized values (`imt`, `calories`, `blood_pressure`) are the
/// wire-stable enumeration used in storage and over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalcType {
    Imt,
    Calories,
    BloodPressure,
}

impl CalcType {
    /// Storage representation of the calculation type
    pub fn as_str(&self) -> &'static str {
        match self {
            CalcType::Imt => "imt",
            CalcType::Calories => "calories",
            CalcType::BloodPressure => "blood_pressure",
        }
    }
}

impl fmt::Display for CalcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalcType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "imt" => Ok(CalcType::Imt),
            "calories" => Ok(CalcType::Calories),
            "blood_pressure" => Ok(CalcType::BloodPressure),
            other => Err(format!("unknown calculation type '{other}'")),
        }
    }
}

// ============================================================================
// Calculation Requests
// ============================================================================

/// BMI calculation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BmiRequest {
    #[validate(length(min = 1, max = 255))]
    pub user_id: String,
    /// Weight in kilograms
    pub weight: f64,
    /// Height in centimeters
    pub height: f64,
}

/// Daily calorie calculation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CaloriesRequest {
    #[validate(length(min = 1, max = 255))]
    pub user_id: String,
    /// Age in years
    pub age: i32,
    /// Weight in kilograms
    pub weight: f64,
    /// Height in centimeters
    pub height: f64,
    /// Biological sex: `m`/`f`/`male`/`female` (Cyrillic `м`/`ж` accepted)
    pub gender: String,
    /// Activity factor in [1.0, 2.5]
    #[serde(default = "default_activity_factor")]
    pub activity_level: f64,
}

fn default_activity_factor() -> f64 {
    1.5
}

/// Blood pressure classification request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BloodPressureRequest {
    #[validate(length(min = 1, max = 255))]
    pub user_id: String,
    /// Systolic (upper) pressure in mmHg
    pub systolic: i32,
    /// Diastolic (lower) pressure in mmHg
    pub diastolic: i32,
}

/// Interpretation amendment request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateInterpretationRequest {
    #[validate(length(min = 1, max = 255))]
    pub user_id: String,
    pub interpretation: String,
}

// ============================================================================
// Calculation Responses
// ============================================================================

/// A persisted calculation record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub id: i64,
    pub user_id: String,
    pub calc_type: String,
    /// The serialized original input, opaque to the store
    pub input_data: String,
    pub result: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// History query parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub user_id: String,
    #[serde(default = "default_history_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calc_type: Option<CalcType>,
}

fn default_history_limit() -> i64 {
    DEFAULT_HISTORY_LIMIT
}

impl HistoryQuery {
    /// Clamp pagination parameters to sane bounds
    pub fn normalize(mut self) -> Self {
        self.limit = self.limit.clamp(1, MAX_HISTORY_LIMIT);
        self.offset = self.offset.max(0);
        self
    }
}

/// Paginated calculation history.
///
/// `total` counts the rows matching the active filter, not the user's whole
/// history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub user_id: String,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub items: Vec<CalculationResponse>,
}

/// Per-type aggregate over a user's calculations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalcTypeStats {
    pub count: i64,
    /// Mean of the stored results, rounded to 2 decimals
    pub avg: f64,
}

/// Aggregate statistics over a user's calculation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub user_id: String,
    pub total: i64,
    pub by_type: BTreeMap<String, CalcTypeStats>,
}

/// Bulk delete query parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDeleteQuery {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calc_type: Option<CalcType>,
}

/// Bulk delete outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub deleted: u64,
}

/// Generic confirmation message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// User Types
// ============================================================================

/// A user record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub user_id: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial user update; only supplied fields change
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

// ============================================================================
// Health Metric Types
// ============================================================================

/// Caller-reported health measurement
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMetricRequest {
    #[validate(length(min = 1, max = 255))]
    pub user_id: String,
    #[validate(length(min = 1, max = 100))]
    pub metric_type: String,
    pub value: f64,
    #[validate(length(min = 1, max = 50))]
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// A persisted health metric record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricResponse {
    pub id: i64,
    pub user_id: String,
    pub metric_type: String,
    pub value: f64,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Metric list query parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricListQuery {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_type: Option<String>,
    #[serde(default = "default_metric_limit")]
    pub limit: i64,
}

fn default_metric_limit() -> i64 {
    DEFAULT_METRIC_LIMIT
}

impl MetricListQuery {
    /// Clamp the list size to sane bounds
    pub fn normalize(mut self) -> Self {
        self.limit = self.limit.clamp(1, DEFAULT_METRIC_LIMIT);
        self
    }
}

/// Ownership query attached to delete endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerQuery {
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_type_round_trip() {
        for calc_type in [CalcType::Imt, CalcType::Calories, CalcType::BloodPressure] {
            assert_eq!(calc_type.as_str().parse::<CalcType>().unwrap(), calc_type);
        }
        assert!("pulse".parse::<CalcType>().is_err());
    }

    #[test]
    fn test_calc_type_serde_uses_snake_case() {
        let json = serde_json::to_string(&CalcType::BloodPressure).unwrap();
        assert_eq!(json, "\"blood_pressure\"");
    }

    #[test]
    fn test_history_query_normalization() {
        let query = HistoryQuery {
            user_id: "u1".to_string(),
            limit: 10_000,
            offset: -5,
            calc_type: None,
        }
        .normalize();

        assert_eq!(query.limit, 100);
        assert_eq!(query.offset, 0);
    }

    #[test]
    fn test_calories_request_default_activity() {
        let req: CaloriesRequest = serde_json::from_str(
            r#"{"user_id":"u1","age":30,"weight":80,"height":180,"gender":"m"}"#,
        )
        .unwrap();
        assert_eq!(req.activity_level, 1.5);
    }

    #[test]
    fn test_user_id_length_is_validated() {
        let req = BmiRequest {
            user_id: String::new(),
            weight: 70.0,
            height: 175.0,
        };
        assert!(req.validate().is_err());

        let req = BmiRequest {
            user_id: "a".repeat(256),
            weight: 70.0,
            height: 175.0,
        };
        assert!(req.validate().is_err());
    }
}
