use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub category: Option<String>,
}

impl Validate for Notification {
    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)?;
        require("title", &self.title)?;
        require("message", &self.message)
    }
}

pub fn by_priority(notifications: &[Notification], priority: Priority) -> Vec<Notification> {
    notifications
        .iter()
        .filter(|n| n.priority == priority)
        .cloned()
        .collect()
}

pub fn unread(notifications: &[Notification]) -> Vec<Notification> {
    notifications.iter().filter(|n| !n.read).cloned().collect()
}

/// Highest priority first, newest first within a priority.
pub fn sort_for_display(notifications: &mut [Notification]) {
    notifications.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.timestamp.cmp(&a.timestamp))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn notification(id: &str, priority: Priority, minutes: i64, read: bool) -> Notification {
        let base = Utc.with_ymd_and_hms(2026, 7, 1, 12, 0, 0).unwrap();
        Notification {
            id: id.to_string(),
            title: "Heat alert".to_string(),
            message: "Cooling centers open until 9pm".to_string(),
            priority,
            timestamp: base + Duration::minutes(minutes),
            read,
            category: None,
        }
    }

    #[test]
    fn sorts_by_priority_then_recency() {
        let mut list = vec![
            notification("old-urgent", Priority::Urgent, 0, false),
            notification("low", Priority::Low, 30, false),
            notification("new-urgent", Priority::Urgent, 10, true),
        ];
        sort_for_display(&mut list);
        let ids: Vec<&str> = list.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["new-urgent", "old-urgent", "low"]);
        assert_eq!(unread(&list).len(), 2);
        assert_eq!(by_priority(&list, Priority::Urgent).len(), 2);
    }
}
