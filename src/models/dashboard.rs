use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require, Validate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub day: String,
    pub high: f64,
    pub low: f64,
    pub condition: String,
}

/// Snapshot shown on the authenticated dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub current_temperature: f64,
    pub heat_index: f64,
    pub humidity: f64,
    pub risk_level: String,
    pub summary: String,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub forecast: Vec<ForecastDay>,
}

impl Dashboard {
    pub fn unavailable(now: DateTime<Utc>) -> Self {
        Self {
            current_temperature: 0.0,
            heat_index: 0.0,
            humidity: 0.0,
            risk_level: "unknown".to_string(),
            summary: "Dashboard data is currently unavailable.".to_string(),
            updated_at: now,
            forecast: Vec::new(),
        }
    }
}

impl Validate for Dashboard {
    fn validate(&self) -> Result<(), String> {
        require("riskLevel", &self.risk_level)?;
        if !(0.0..=100.0).contains(&self.humidity) {
            return Err(format!("humidity {} is not a percentage", self.humidity));
        }
        if let Some(day) = self.forecast.iter().find(|d| d.low > d.high) {
            return Err(format!("forecast for {} has low above high", day.day));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_forecast() {
        let mut dashboard = Dashboard::unavailable(Utc::now());
        assert!(dashboard.validate().is_ok());
        dashboard.forecast.push(ForecastDay {
            day: "Mon".to_string(),
            high: 90.0,
            low: 95.0,
            condition: "Sunny".to_string(),
        });
        assert!(dashboard.validate().is_err());
    }
}
