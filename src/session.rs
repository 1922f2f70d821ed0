use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{AppError, FieldError, Result};
use crate::models::{ProfileUpdate, User, UserPreferences};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    LoggedIn(User),
    LoggedOut { user_id: String },
    ProfileUpdated(User),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, User>>,
    observers: Mutex<Vec<(SubscriptionId, Observer)>>,
    next_id: AtomicU64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.observers).push((id, Arc::new(observer)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = lock(&self.observers);
        let before = observers.len();
        observers.retain(|(sid, _)| *sid != id);
        observers.len() != before
    }

    /// Accepts any well-formed email with a password of at least six
    /// characters. There is no credential store behind this.
    pub fn login(&self, credentials: &Credentials) -> Result<(String, User)> {
        let mut errors = Vec::new();
        let email = credentials.email.trim();
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            errors.push(FieldError::new("email", "Enter a valid email address"));
        }
        if credentials.password.chars().count() < 6 {
            errors.push(FieldError::new("password", "Password must be at least 6 characters"));
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let stamp = Utc::now().timestamp_millis();
        let seq = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = format!("mock-token-{}-{}", stamp, seq);
        let name = email.split('@').next().unwrap_or(email).to_string();
        let user = User {
            id: format!("user-{}", seq),
            name,
            email: email.to_string(),
            phone: None,
            location: None,
            preferences: UserPreferences::default(),
        };

        lock(&self.sessions).insert(token.clone(), user.clone());
        info!(user_id = %user.id, "user logged in");
        self.notify(&SessionEvent::LoggedIn(user.clone()));
        Ok((token, user))
    }

    pub fn logout(&self, token: &str) -> Result<()> {
        let user = lock(&self.sessions)
            .remove(token)
            .ok_or_else(|| AppError::Unauthorized("unknown session".to_string()))?;
        info!(user_id = %user.id, "user logged out");
        self.notify(&SessionEvent::LoggedOut { user_id: user.id });
        Ok(())
    }

    pub fn current_user(&self, token: &str) -> Result<User> {
        lock(&self.sessions)
            .get(token)
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("unknown session".to_string()))
    }

    pub fn update_profile(&self, token: &str, update: ProfileUpdate) -> Result<User> {
        let updated = {
            let mut sessions = lock(&self.sessions);
            let user = sessions
                .get_mut(token)
                .ok_or_else(|| AppError::Unauthorized("unknown session".to_string()))?;
            user.apply(update)
                .map_err(|msg| AppError::Validation(vec![FieldError::new("profile", msg)]))?;
            user.clone()
        };
        debug!(user_id = %updated.id, "profile updated");
        self.notify(&SessionEvent::ProfileUpdated(updated.clone()));
        Ok(updated)
    }

    pub fn active_sessions(&self) -> usize {
        lock(&self.sessions).len()
    }

    fn notify(&self, event: &SessionEvent) {
        // Snapshot so observers may subscribe or unsubscribe re-entrantly.
        let observers: Vec<Observer> = lock(&self.observers)
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();
        for observer in observers {
            observer(event);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn login_issues_distinct_tokens() {
        let store = SessionStore::new();
        let (t1, u1) = store.login(&credentials("sam@example.org", "secret1")).unwrap();
        let (t2, _) = store.login(&credentials("sam@example.org", "secret1")).unwrap();
        assert_ne!(t1, t2);
        assert_eq!(u1.name, "sam");
        assert_eq!(store.current_user(&t1).unwrap(), u1);
        assert_eq!(store.active_sessions(), 2);
    }

    #[test]
    fn login_rejects_bad_credentials() {
        let store = SessionStore::new();
        match store.login(&credentials("nope", "123")) {
            Err(AppError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {:?}", other.map(|(t, _)| t)),
        }
        assert_eq!(store.active_sessions(), 0);
    }

    #[test]
    fn logout_invalidates_token() {
        let store = SessionStore::new();
        let (token, _) = store.login(&credentials("a@b.org", "password")).unwrap();
        store.logout(&token).unwrap();
        assert!(matches!(store.current_user(&token), Err(AppError::Unauthorized(_))));
        assert!(matches!(store.logout(&token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn observers_see_events_in_order() {
        let store = SessionStore::new();
        let seen: Arc<Mutex<Vec<String>>> = Arc::default();

        let log = seen.clone();
        let id = store.subscribe(move |event| {
            let tag = match event {
                SessionEvent::LoggedIn(_) => "in",
                SessionEvent::LoggedOut { .. } => "out",
                SessionEvent::ProfileUpdated(_) => "updated",
            };
            log.lock().unwrap().push(tag.to_string());
        });

        let (token, _) = store.login(&credentials("a@b.org", "password")).unwrap();
        let user = store
            .update_profile(&token, ProfileUpdate {
                location: Some("Tucson".to_string()),
                ..ProfileUpdate::default()
            })
            .unwrap();
        assert_eq!(user.location.as_deref(), Some("Tucson"));
        store.logout(&token).unwrap();

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.login(&credentials("c@d.org", "password")).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["in", "updated", "out"]);
    }

    #[test]
    fn rejected_profile_update_is_not_broadcast() {
        let store = SessionStore::new();
        let (token, before) = store.login(&credentials("a@b.org", "password")).unwrap();
        let calls = Arc::new(AtomicU64::new(0));
        let counter = calls.clone();
        store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let result = store.update_profile(&token, ProfileUpdate {
            email: Some("invalid".to_string()),
            ..ProfileUpdate::default()
        });
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(store.current_user(&token).unwrap(), before);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
