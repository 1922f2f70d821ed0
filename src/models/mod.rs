pub mod advisory;
pub mod dashboard;
pub mod help;
pub mod notification;
pub mod resource;
pub mod tip;
pub mod user;

pub use advisory::{Advisory, Severity};
pub use dashboard::{Dashboard, ForecastDay};
pub use help::{ContactKind, ContactMethod, Faq};
pub use notification::{Notification, Priority};
pub use resource::Resource;
pub use tip::{Tip, TipPriority};
pub use user::{ProfileUpdate, User, UserPreferences};

/// Shape checks that serde alone cannot express.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

pub(crate) fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("`{}` must not be empty", field))
    } else {
        Ok(())
    }
}

/// Case-insensitive substring match against any of `fields`.
pub(crate) fn matches_query(query: &str, fields: &[&str]) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields.iter().any(|field| field.to_lowercase().contains(&needle))
}
