use serde::{Deserialize, Serialize};

use super::{matches_query, require, Validate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: String,
}

impl Validate for Faq {
    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)?;
        require("question", &self.question)?;
        require("answer", &self.answer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Phone,
    Email,
    Chat,
    Web,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMethod {
    pub id: String,
    pub name: String,
    pub description: String,
    pub value: String,
    pub kind: ContactKind,
    /// Opening hours, e.g. "24/7".
    #[serde(default)]
    pub available: Option<String>,
}

impl Validate for ContactMethod {
    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)?;
        require("name", &self.name)?;
        require("value", &self.value)
    }
}

pub fn faqs_by_category(faqs: &[Faq], category: &str) -> Vec<Faq> {
    faqs.iter()
        .filter(|f| f.category.eq_ignore_ascii_case(category))
        .cloned()
        .collect()
}

pub fn search_faqs(faqs: &[Faq], query: &str) -> Vec<Faq> {
    faqs.iter()
        .filter(|f| matches_query(query, &[&f.question, &f.answer]))
        .cloned()
        .collect()
}

pub fn contacts_by_kind(methods: &[ContactMethod], kind: ContactKind) -> Vec<ContactMethod> {
    methods.iter().filter(|m| m.kind == kind).cloned().collect()
}
