use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, FieldError, Result};

pub const BASE_SCORE: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Condition {
    HeartDisease,
    Diabetes,
    RespiratoryCondition,
    KidneyDisease,
    HighBloodPressure,
    Obesity,
}

impl Condition {
    pub const ALL: [Condition; 6] = [
        Condition::HeartDisease,
        Condition::Diabetes,
        Condition::RespiratoryCondition,
        Condition::KidneyDisease,
        Condition::HighBloodPressure,
        Condition::Obesity,
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    #[default]
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Symptoms {
    pub dizziness: bool,
    pub headache: bool,
    pub nausea: bool,
    pub muscle_cramps: bool,
    pub heavy_sweating: bool,
    pub rapid_heartbeat: bool,
}

impl Symptoms {
    /// Wire names, in the order the form lists them.
    pub const NAMES: [&'static str; 6] = [
        "dizziness",
        "headache",
        "nausea",
        "muscleCramps",
        "heavySweating",
        "rapidHeartbeat",
    ];

    pub fn count(&self) -> u32 {
        [
            self.dizziness,
            self.headache,
            self.nausea,
            self.muscle_cramps,
            self.heavy_sweating,
            self.rapid_heartbeat,
        ]
        .iter()
        .filter(|present| **present)
        .count() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthAssessmentInput {
    pub age: i32,
    pub outdoor_hours: f64,
    /// Cups of water so far today.
    pub hydration: f64,
    #[serde(default)]
    pub conditions: BTreeSet<Condition>,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub symptoms: Symptoms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Severe,
}

impl RiskLevel {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 80 => RiskLevel::Low,
            s if s >= 60 => RiskLevel::Moderate,
            s if s >= 40 => RiskLevel::High,
            _ => RiskLevel::Severe,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScoreResult {
    pub score: i32,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
}

impl HealthAssessmentInput {
    /// Decodes a form payload field by field, so a missing or mistyped field
    /// is reported by name alongside every other one.
    pub fn from_value(value: &Value) -> std::result::Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        let age = match number(value, "age", &mut errors) {
            Some(age) if age.fract() == 0.0 => Some(age as i32),
            Some(_) => {
                errors.push(FieldError::new("age", "Age must be a whole number"));
                None
            }
            None => None,
        };
        let outdoor_hours = number(value, "outdoorHours", &mut errors);
        let hydration = number(value, "hydration", &mut errors);
        let conditions = optional(value, "conditions", &mut errors);
        let activity_level = optional(value, "activityLevel", &mut errors);
        let symptoms = optional(value, "symptoms", &mut errors);

        match (age, outdoor_hours, hydration) {
            (Some(age), Some(outdoor_hours), Some(hydration)) if errors.is_empty() => Ok(Self {
                age,
                outdoor_hours,
                hydration,
                conditions,
                activity_level,
                symptoms,
            }),
            _ => Err(errors),
        }
    }

    /// Collects every out-of-range field rather than stopping at the first.
    pub fn validate(&self) -> std::result::Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if !(0..=120).contains(&self.age) {
            errors.push(FieldError::new("age", "Age must be between 0 and 120"));
        }
        if !in_range(self.outdoor_hours, 0.0, 24.0) {
            errors.push(FieldError::new("outdoorHours", "Outdoor hours must be between 0 and 24"));
        }
        if !in_range(self.hydration, 0.0, 24.0) {
            errors.push(FieldError::new("hydration", "Hydration must be between 0 and 24 cups"));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn number(value: &Value, field: &'static str, errors: &mut Vec<FieldError>) -> Option<f64> {
    match value.get(field) {
        None | Some(Value::Null) => {
            errors.push(FieldError::new(field, format!("{} is required", field)));
            None
        }
        Some(v) => {
            let n = v.as_f64();
            if n.is_none() {
                errors.push(FieldError::new(field, format!("{} must be a number", field)));
            }
            n
        }
    }
}

fn optional<T: DeserializeOwned + Default>(value: &Value, field: &'static str, errors: &mut Vec<FieldError>) -> T {
    match value.get(field) {
        None | Some(Value::Null) => T::default(),
        Some(v) => T::deserialize(v).unwrap_or_else(|e| {
            errors.push(FieldError::new(field, e.to_string()));
            T::default()
        }),
    }
}

fn in_range(value: f64, min: f64, max: f64) -> bool {
    value.is_finite() && value >= min && value <= max
}

/// Validates, then scores. Invalid input never reaches the scorer.
pub fn assess(input: &HealthAssessmentInput) -> Result<HealthScoreResult> {
    input.validate().map_err(AppError::Validation)?;
    Ok(score(input))
}

/// Scores input that has already passed [`HealthAssessmentInput::validate`].
pub fn score(input: &HealthAssessmentInput) -> HealthScoreResult {
    let mut score = BASE_SCORE;
    let mut recommendations = Vec::new();

    if input.age > 75 {
        score -= 30;
        recommendations.push(
            "Adults over 75 are at very high risk in the heat: stay in air conditioning and have someone check on you twice a day."
                .to_string(),
        );
    } else if input.age > 60 {
        score -= 20;
        recommendations.push(
            "Adults over 60 are more sensitive to heat: plan activities for cooler hours and check in with family or friends."
                .to_string(),
        );
    }

    if input.outdoor_hours > 4.0 {
        score -= 35;
        recommendations.push(
            "Limit outdoor activity to off-peak hours (before 10am or after 6pm).".to_string(),
        );
    } else if input.outdoor_hours > 2.0 {
        score -= 20;
        recommendations.push(
            "Reduce time outdoors during peak heat hours (10am to 4pm).".to_string(),
        );
    }

    if input.hydration < 3.0 {
        score -= 30;
        recommendations.push(
            "Increase your water intake immediately: aim for at least 8 cups today.".to_string(),
        );
    } else if input.hydration < 6.0 {
        score -= 15;
        recommendations.push(
            "Drink more water: aim for at least 8 cups throughout the day.".to_string(),
        );
    }

    if !input.conditions.is_empty() {
        score -= 10 * input.conditions.len() as i32;
        recommendations.push(
            "Consult your healthcare provider about how your conditions or medications affect heat tolerance."
                .to_string(),
        );
    }

    if input.activity_level == ActivityLevel::High && input.outdoor_hours > 2.0 {
        score -= 25;
        recommendations.push(
            "Reduce physical exertion outdoors and take frequent breaks in the shade.".to_string(),
        );
    }

    let symptoms = input.symptoms.count();
    if symptoms >= 3 {
        score -= 40;
        recommendations.push(
            "You are showing several signs of heat illness: move to a cool place, rest and seek medical help if symptoms persist."
                .to_string(),
        );
    } else if symptoms > 0 {
        score -= 15 * symptoms as i32;
        recommendations.push(
            "Monitor your symptoms closely and cool down if they get worse.".to_string(),
        );
    }

    if recommendations.is_empty() {
        recommendations.push(
            "Your risk is low. Keep following standard heat safety practices.".to_string(),
        );
    }

    let score = score.clamp(0, BASE_SCORE);
    HealthScoreResult {
        score,
        risk_level: RiskLevel::from_score(score),
        recommendations,
    }
}
