use serde::{Deserialize, Serialize};

use super::{require, Validate};

/// An external link or document (cooling centers, hotlines, guides).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub url: String,
    pub resource_type: String,
}

impl Validate for Resource {
    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)?;
        require("title", &self.title)?;
        require("url", &self.url)
    }
}

pub fn by_category(resources: &[Resource], category: &str) -> Vec<Resource> {
    resources
        .iter()
        .filter(|r| r.category.eq_ignore_ascii_case(category))
        .cloned()
        .collect()
}

pub fn by_type(resources: &[Resource], resource_type: &str) -> Vec<Resource> {
    resources
        .iter()
        .filter(|r| r.resource_type.eq_ignore_ascii_case(resource_type))
        .cloned()
        .collect()
}
