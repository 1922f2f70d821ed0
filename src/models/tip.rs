use serde::{Deserialize, Serialize};

use super::{matches_query, require, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tip {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub priority: TipPriority,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Validate for Tip {
    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)?;
        require("title", &self.title)?;
        require("content", &self.content)?;
        require("category", &self.category)
    }
}

pub fn find_by_id<'a>(tips: &'a [Tip], id: &str) -> Option<&'a Tip> {
    tips.iter().find(|t| t.id == id)
}

pub fn by_category(tips: &[Tip], category: &str) -> Vec<Tip> {
    tips.iter()
        .filter(|t| t.category.eq_ignore_ascii_case(category))
        .cloned()
        .collect()
}

pub fn by_priority(tips: &[Tip], priority: TipPriority) -> Vec<Tip> {
    tips.iter().filter(|t| t.priority == priority).cloned().collect()
}

/// Matches title, content and tags.
pub fn search(tips: &[Tip], query: &str) -> Vec<Tip> {
    tips.iter()
        .filter(|t| {
            matches_query(query, &[&t.title, &t.content])
                || t.tags.iter().any(|tag| matches_query(query, &[tag]))
        })
        .cloned()
        .collect()
}

/// Distinct categories in first-seen order.
pub fn categories(tips: &[Tip]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for tip in tips {
        if !seen.iter().any(|c| c.eq_ignore_ascii_case(&tip.category)) {
            seen.push(tip.category.clone());
        }
    }
    seen
}
