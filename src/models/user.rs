use serde::{Deserialize, Serialize};

use super::{require, Validate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub alerts: bool,
    pub email_notifications: bool,
    pub sms_notifications: bool,
    /// "F" or "C".
    pub temperature_unit: String,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            alerts: true,
            email_notifications: true,
            sms_notifications: false,
            temperature_unit: "F".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub preferences: UserPreferences,
}

impl Validate for User {
    fn validate(&self) -> Result<(), String> {
        require("id", &self.id)?;
        require("name", &self.name)?;
        if !self.email.contains('@') {
            return Err(format!("`{}` is not an email address", self.email));
        }
        match self.preferences.temperature_unit.as_str() {
            "F" | "C" => Ok(()),
            other => Err(format!("unknown temperature unit `{}`", other)),
        }
    }
}

/// Partial profile edit; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub preferences: Option<UserPreferences>,
}

impl User {
    /// Applies `update` and re-validates; on failure the user is unchanged.
    pub fn apply(&mut self, update: ProfileUpdate) -> Result<(), String> {
        let mut next = self.clone();
        if let Some(name) = update.name {
            next.name = name;
        }
        if let Some(email) = update.email {
            next.email = email;
        }
        if update.phone.is_some() {
            next.phone = update.phone;
        }
        if update.location.is_some() {
            next.location = update.location;
        }
        if let Some(preferences) = update.preferences {
            next.preferences = preferences;
        }
        next.validate()?;
        *self = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "u1".to_string(),
            name: "Sam".to_string(),
            email: "sam@example.org".to_string(),
            phone: None,
            location: None,
            preferences: UserPreferences::default(),
        }
    }

    #[test]
    fn apply_is_partial() {
        let mut u = user();
        u.apply(ProfileUpdate {
            location: Some("Phoenix, AZ".to_string()),
            ..ProfileUpdate::default()
        })
        .unwrap();
        assert_eq!(u.name, "Sam");
        assert_eq!(u.location.as_deref(), Some("Phoenix, AZ"));
    }

    #[test]
    fn invalid_update_leaves_user_untouched() {
        let mut u = user();
        let err = u.apply(ProfileUpdate {
            name: Some("Alex".to_string()),
            email: Some("not-an-email".to_string()),
            ..ProfileUpdate::default()
        });
        assert!(err.is_err());
        assert_eq!(u, user());
    }
}
