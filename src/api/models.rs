use serde::{Deserialize, Serialize};

use crate::health::Condition;
use crate::models::{ContactKind, Priority, Severity, TipPriority, User};
use crate::services::ResourceStatus;

#[derive(Debug, Default, Deserialize)]
pub struct AdvisoryQuery {
    pub severity: Option<Severity>,
    pub q: Option<String>,
    /// Only advisories in effect right now.
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct TipQuery {
    pub category: Option<String>,
    pub priority: Option<TipPriority>,
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResourceQuery {
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FaqQuery {
    pub category: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactQuery {
    pub kind: Option<ContactKind>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NotificationQuery {
    pub priority: Option<Priority>,
    #[serde(default)]
    pub unread: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub resources: Vec<ResourceStatus>,
    pub active_sessions: usize,
}

/// The fixed lists the assessment form offers.
#[derive(Serialize)]
pub struct AssessmentOptions {
    pub conditions: Vec<Condition>,
    pub symptoms: Vec<&'static str>,
    pub activity_levels: Vec<&'static str>,
}
