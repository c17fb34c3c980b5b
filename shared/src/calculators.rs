//! Medical formula calculations
//!
//! Provides calculations for BMI, BMR/TDEE, blood pressure classification,
//! ideal body weight, and daily water intake.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: All calculations are pure, no side effects
//! 2. **Evidence-Based**: Harris-Benedict (revised), Devine, ACC/AHA 2017
//! 3. **Validated Inputs**: Every function checks its preconditions and
//!    fails with [`FormulaError::InvalidInput`] instead of producing garbage
//! 4. **Stable Rounding**: Results are rounded to one decimal place

use crate::errors::FormulaError;
use serde::{Deserialize, Serialize};

/// Round to one decimal place, the precision used for all formula results
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ============================================================================
// Input Types
// ============================================================================

/// Biological sex for physiological calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Parse a caller-supplied sex value.
    ///
    /// Accepts ASCII (`m`/`f`/`male`/`female`) and the Cyrillic single-letter
    /// forms (`м`/`ж`) used by legacy clients.
    pub fn parse(value: &str) -> Result<Self, FormulaError> {
        match value.trim().to_lowercase().as_str() {
            "m" | "male" | "м" => Ok(Sex::Male),
            "f" | "female" | "ж" => Ok(Sex::Female),
            other => Err(FormulaError::InvalidInput(format!(
                "sex must be one of m/f/male/female/м/ж, got '{other}'"
            ))),
        }
    }
}

/// Activity level for the water intake calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WaterActivityLevel {
    Low,
    #[default]
    Moderate,
    High,
}

impl WaterActivityLevel {
    /// Additional liters of water on top of the weight-based baseline
    pub fn additional_liters(&self) -> f64 {
        match self {
            WaterActivityLevel::Low => 0.0,
            WaterActivityLevel::Moderate => 0.5,
            WaterActivityLevel::High => 1.0,
        }
    }
}

impl std::str::FromStr for WaterActivityLevel {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(WaterActivityLevel::Low),
            "moderate" => Ok(WaterActivityLevel::Moderate),
            "high" => Ok(WaterActivityLevel::High),
            other => Err(FormulaError::InvalidInput(format!(
                "activity level must be low/moderate/high, got '{other}'"
            ))),
        }
    }
}

// ============================================================================
// BMI
// ============================================================================

/// BMI category classification (WHO thresholds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    SevereUnderweight,
    Underweight,
    Normal,
    Overweight,
    ObesityClass1,
    ObesityClass2,
    ObesityClass3,
}

impl BmiCategory {
    /// Human-readable interpretation of the category
    pub fn description(&self) -> &'static str {
        match self {
            BmiCategory::SevereUnderweight => "Severe underweight",
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal body weight",
            BmiCategory::Overweight => "Overweight (pre-obesity)",
            BmiCategory::ObesityClass1 => "Obesity class I",
            BmiCategory::ObesityClass2 => "Obesity class II",
            BmiCategory::ObesityClass3 => "Obesity class III (morbid)",
        }
    }
}

/// BMI calculation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmiResult {
    /// BMI value rounded to one decimal
    pub value: f64,
    /// WHO category for the value
    pub category: BmiCategory,
}

/// Classify an already-computed BMI value
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < 16.0 {
        BmiCategory::SevereUnderweight
    } else if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else if bmi < 35.0 {
        BmiCategory::ObesityClass1
    } else if bmi < 40.0 {
        BmiCategory::ObesityClass2
    } else {
        BmiCategory::ObesityClass3
    }
}

/// Calculate BMI from weight and height
///
/// Formula: BMI = weight(kg) / height(m)²
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> Result<BmiResult, FormulaError> {
    if weight_kg <= 0.0 || height_cm <= 0.0 {
        return Err(FormulaError::InvalidInput(
            "weight and height must be positive numbers".to_string(),
        ));
    }

    let height_m = height_cm / 100.0;
    let bmi = round1(weight_kg / (height_m * height_m));

    Ok(BmiResult {
        value: bmi,
        category: classify_bmi(bmi),
    })
}

// ============================================================================
// BMR and TDEE
// ============================================================================

/// Calculate Basal Metabolic Rate using the revised Harris-Benedict equation
///
/// Men:   BMR = 88.362 + 13.397 × weight(kg) + 4.799 × height(cm) - 5.677 × age(y)
/// Women: BMR = 447.593 + 9.247 × weight(kg) + 3.098 × height(cm) - 4.330 × age(y)
pub fn compute_bmr(age: i32, weight_kg: f64, height_cm: f64, sex: Sex) -> Result<f64, FormulaError> {
    if age <= 0 || weight_kg <= 0.0 || height_cm <= 0.0 {
        return Err(FormulaError::InvalidInput(
            "age, weight and height must be positive numbers".to_string(),
        ));
    }

    let age = age as f64;
    let bmr = match sex {
        Sex::Male => 88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age,
        Sex::Female => 447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age,
    };

    Ok(round1(bmr))
}

/// Calculate Total Daily Energy Expenditure
///
/// TDEE = BMR × activity factor, factor bounded to [1.0, 2.5]
pub fn compute_tdee(bmr: f64, activity_factor: f64) -> Result<f64, FormulaError> {
    if bmr <= 0.0 {
        return Err(FormulaError::InvalidInput(
            "bmr must be a positive number".to_string(),
        ));
    }
    if !(1.0..=2.5).contains(&activity_factor) {
        return Err(FormulaError::InvalidInput(format!(
            "activity factor must be between 1.0 and 2.5, got {activity_factor}"
        )));
    }

    Ok(round1(bmr * activity_factor))
}

/// Well-known activity factor constants and their descriptions
const ACTIVITY_FACTOR_LABELS: [(f64, &str); 5] = [
    (1.2, "Sedentary (little or no exercise)"),
    (1.375, "Light activity (1-3 days/week)"),
    (1.55, "Moderate activity (3-5 days/week)"),
    (1.725, "High activity (6-7 days/week)"),
    (1.9, "Extreme activity (twice per day)"),
];

/// Describe an activity factor.
///
/// Known constants map to fixed labels; anything else echoes the raw factor.
pub fn activity_label(activity_factor: f64) -> String {
    ACTIVITY_FACTOR_LABELS
        .iter()
        .find(|(factor, _)| (factor - activity_factor).abs() < 1e-9)
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| format!("Activity factor: {activity_factor}"))
}

/// Complete calorie calculation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalorieProfile {
    /// Basal Metabolic Rate in kcal/day
    pub bmr: f64,
    /// Total Daily Energy Expenditure in kcal/day
    pub tdee: f64,
    /// Description of the activity factor used
    pub activity_label: String,
}

/// Full calorie calculation: BMR and TDEE plus an activity description
pub fn compute_calorie_profile(
    age: i32,
    weight_kg: f64,
    height_cm: f64,
    sex: Sex,
    activity_factor: f64,
) -> Result<CalorieProfile, FormulaError> {
    let bmr = compute_bmr(age, weight_kg, height_cm, sex)?;
    let tdee = compute_tdee(bmr, activity_factor)?;

    Ok(CalorieProfile {
        bmr,
        tdee,
        activity_label: activity_label(activity_factor),
    })
}

// ============================================================================
// Blood Pressure
// ============================================================================

/// Blood pressure category per the ACC/AHA 2017 classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BloodPressureCategory {
    Normal,
    Elevated,
    HypertensionStage1,
    HypertensionStage2,
    HypertensiveCrisis,
}

impl BloodPressureCategory {
    /// Human-readable category name
    pub fn description(&self) -> &'static str {
        match self {
            BloodPressureCategory::Normal => "Normal blood pressure",
            BloodPressureCategory::Elevated => "Elevated blood pressure",
            BloodPressureCategory::HypertensionStage1 => "Stage 1 hypertension",
            BloodPressureCategory::HypertensionStage2 => "Stage 2 hypertension",
            BloodPressureCategory::HypertensiveCrisis => "Hypertensive crisis",
        }
    }

    /// Advice associated with the category
    pub fn advice(&self) -> &'static str {
        match self {
            BloodPressureCategory::Normal => {
                "Your blood pressure is normal. Keep up the healthy lifestyle."
            }
            BloodPressureCategory::Elevated => {
                "Monitor your blood pressure and maintain a healthy lifestyle."
            }
            BloodPressureCategory::HypertensionStage1 => {
                "A doctor consultation and lifestyle changes are recommended."
            }
            BloodPressureCategory::HypertensionStage2 => {
                "A doctor consultation and medication are required."
            }
            BloodPressureCategory::HypertensiveCrisis => {
                "Seek medical attention URGENTLY. Call emergency services immediately."
            }
        }
    }
}

/// Classify a blood pressure reading.
///
/// Rules are evaluated highest-severity-first; the first match wins. A
/// diastolic of 80 already satisfies the stage-1 rule, so 120/80 is stage 1
/// while 120/79 is merely elevated.
pub fn classify_blood_pressure(
    systolic: i32,
    diastolic: i32,
) -> Result<BloodPressureCategory, FormulaError> {
    if systolic <= 0 || diastolic <= 0 {
        return Err(FormulaError::InvalidInput(
            "systolic and diastolic pressure must be positive".to_string(),
        ));
    }
    if systolic < diastolic {
        return Err(FormulaError::InvalidInput(
            "systolic pressure cannot be lower than diastolic".to_string(),
        ));
    }

    let category = if systolic > 180 || diastolic > 120 {
        BloodPressureCategory::HypertensiveCrisis
    } else if systolic >= 140 || diastolic >= 90 {
        BloodPressureCategory::HypertensionStage2
    } else if systolic >= 130 || diastolic >= 80 {
        BloodPressureCategory::HypertensionStage1
    } else if systolic >= 120 && diastolic < 80 {
        BloodPressureCategory::Elevated
    } else {
        BloodPressureCategory::Normal
    };

    Ok(category)
}

// ============================================================================
// Ideal Weight
// ============================================================================

/// Ideal body weight result with tolerance band
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdealWeight {
    /// Ideal weight in kg per the Devine formula
    pub ideal_kg: f64,
    /// Accepted deviation, ±10% of the ideal weight
    pub margin_kg: f64,
}

/// Calculate ideal body weight using the Devine (1974) formula
///
/// Men:   50.0 kg + 2.3 kg × (height(in) - 60)
/// Women: 45.5 kg + 2.3 kg × (height(in) - 60)
pub fn compute_ideal_weight(height_cm: f64, sex: Sex) -> Result<IdealWeight, FormulaError> {
    if height_cm <= 0.0 {
        return Err(FormulaError::InvalidInput(
            "height must be a positive number".to_string(),
        ));
    }

    let height_inches = height_cm / 2.54;
    let base = match sex {
        Sex::Male => 50.0,
        Sex::Female => 45.5,
    };
    let ideal = base + 2.3 * (height_inches - 60.0);

    Ok(IdealWeight {
        ideal_kg: round1(ideal),
        margin_kg: round1(ideal * 0.1),
    })
}

// ============================================================================
// Water Intake
// ============================================================================

/// Calculate recommended daily water intake in liters
///
/// Base: 35 ml per kg of body weight, plus an activity-dependent addition.
pub fn compute_water_intake(
    weight_kg: f64,
    activity_level: WaterActivityLevel,
) -> Result<f64, FormulaError> {
    if weight_kg <= 0.0 {
        return Err(FormulaError::InvalidInput(
            "weight must be a positive number".to_string(),
        ));
    }

    let base = weight_kg * 0.035;
    Ok(round1(base + activity_level.additional_liters()))
}
