use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{matches_query, require, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
    Extreme,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advisory {
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub region: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub heat_index: Option<f64>,
    #[serde(default)]
    pub instructions: Vec<String>,
}

impl Advisory {
    pub const FALLBACK_ID: &'static str = "fallback-advisory";

    /// Placeholder served when no current advisory could be loaded.
    /// Valid for 24 hours from `now`.
    pub fn unavailable(now: DateTime<Utc>) -> Self {
        Self {
            id: Self::FALLBACK_ID.to_string(),
            title: "Advisory information unavailable".to_string(),
            description: "Current heat advisory data could not be loaded. Check local news \
                          or your weather service and follow standard heat safety practices."
                .to_string(),
            severity: Severity::Moderate,
            region: "unknown".to_string(),
            issued_at: now,
            expires_at: now + Duration::hours(24),
            temperature: None,
            heat_index: None,
            instructions: vec![
                "Stay hydrated".to_string(),
                "Avoid strenuous activity during the hottest hours".to_string(),
            ],
        }
    }

    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.issued_at <= at && at < self.expires_at
    }

    pub fn matches(&self, query: &str) -> bool {
        matches_query(query, &[&self.title, &self.description, &self.region])
    }
}

impl Validate for Advisory {
    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)?;
        require("title", &self.title)?;
        require("description", &self.description)?;
        require("region", &self.region)?;
        if self.expires_at < self.issued_at {
            return Err(format!("advisory {} expires before it is issued", self.id));
        }
        Ok(())
    }
}

pub fn find_by_id<'a>(advisories: &'a [Advisory], id: &str) -> Option<&'a Advisory> {
    advisories.iter().find(|a| a.id == id)
}

pub fn by_severity(advisories: &[Advisory], severity: Severity) -> Vec<Advisory> {
    advisories.iter().filter(|a| a.severity == severity).cloned().collect()
}

pub fn active_at(advisories: &[Advisory], at: DateTime<Utc>) -> Vec<Advisory> {
    advisories.iter().filter(|a| a.is_active_at(at)).cloned().collect()
}

pub fn search(advisories: &[Advisory], query: &str) -> Vec<Advisory> {
    advisories.iter().filter(|a| a.matches(query)).cloned().collect()
}
