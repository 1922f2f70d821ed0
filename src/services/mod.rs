pub mod advisory;
pub mod dashboard;
pub mod help;
pub mod notification;
pub mod resource;
pub mod tip;

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::cache::TtlCache;
use crate::error::{AppError, Result};
use crate::http_client::HttpClient;
use crate::models::Validate;

pub use advisory::AdvisoryService;
pub use dashboard::DashboardService;
pub use help::HelpService;
pub use notification::NotificationService;
pub use resource::ResourceService;
pub use tip::TipService;

/// Lifecycle of one logical resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceState {
    Empty,
    Loading,
    Ready,
    StaleServed,
    ErrorFallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceStatus {
    pub name: &'static str,
    pub path: &'static str,
    pub state: ResourceState,
}

/// Fetches a JSON array and keeps only the elements that decode and validate.
pub async fn fetch_valid_list<T>(client: &HttpClient, path: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned + Validate,
{
    let raw: Vec<serde_json::Value> = client.get_json(path).await?;
    let (items, dropped) = keep_valid(path, raw);
    if dropped > 0 {
        warn!(path, dropped, kept = items.len(), "filtered invalid elements from response");
    }
    Ok(items)
}

/// Decodes and validates each element, returning the survivors and how many
/// were dropped.
fn keep_valid<T>(path: &str, raw: Vec<serde_json::Value>) -> (Vec<T>, usize)
where
    T: DeserializeOwned + Validate,
{
    let total = raw.len();
    let items: Vec<T> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let item = match serde_json::from_value::<T>(value) {
                Ok(item) => item,
                Err(e) => {
                    debug!(path, index, error = %e, "dropping undecodable element");
                    return None;
                }
            };
            match item.validate() {
                Ok(()) => Some(item),
                Err(reason) => {
                    debug!(path, index, %reason, "dropping invalid element");
                    None
                }
            }
        })
        .collect();

    let dropped = total - items.len();
    (items, dropped)
}

/// Fetches a single JSON object; an invalid object is a parse error.
pub async fn fetch_valid_one<T>(client: &HttpClient, path: &str) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    let item: T = client.get_json(path).await?;
    item.validate()
        .map_err(|reason| AppError::ParseError(format!("Invalid object from {}: {}", path, reason)))?;
    Ok(item)
}

/// One cached logical resource: a path, its cache slot and its state.
pub struct CachedResource<T> {
    name: &'static str,
    path: &'static str,
    cache: Arc<TtlCache<T>>,
    state: Mutex<ResourceState>,
}

impl<T: Clone> CachedResource<T> {
    pub fn new(name: &'static str, path: &'static str, cache: Arc<TtlCache<T>>) -> Self {
        Self {
            name,
            path,
            cache,
            state: Mutex::new(ResourceState::Empty),
        }
    }

    pub fn state(&self) -> ResourceState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn status(&self) -> ResourceStatus {
        ResourceStatus {
            name: self.name,
            path: self.path,
            state: self.state(),
        }
    }

    /// Cached value if fresh; otherwise `fetch`, then the stale value, then
    /// `fallback`. The fallback is never cached so the next call retries.
    pub async fn load<Fut, F>(&self, fetch: Fut, fallback: F) -> T
    where
        Fut: Future<Output = Result<T>>,
        F: FnOnce() -> T,
    {
        if let Some(value) = self.cache.get(self.path) {
            self.set_state(ResourceState::Ready);
            return value;
        }

        self.set_state(ResourceState::Loading);
        match self.cache.get_or_set(self.path, || fetch).await {
            Ok(value) => {
                self.set_state(ResourceState::Ready);
                value
            }
            Err(err) => match self.cache.get_stale(self.path) {
                Some(stale) => {
                    warn!(resource = self.name, error = %err, "refresh failed, serving cached data");
                    self.set_state(ResourceState::StaleServed);
                    stale
                }
                None => {
                    error!(resource = self.name, error = %err, "fetch failed with nothing cached, serving fallback");
                    self.set_state(ResourceState::ErrorFallback);
                    fallback()
                }
            },
        }
    }

    fn set_state(&self, state: ResourceState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }
}

/// All resource services, sharing one fetch client.
pub struct Services {
    pub advisories: AdvisoryService,
    pub tips: TipService,
    pub resources: ResourceService,
    pub help: HelpService,
    pub notifications: NotificationService,
    pub dashboard: DashboardService,
}

impl Services {
    /// Builds every service with its own cache, each with `cache_ttl`.
    pub fn new(client: HttpClient, cache_ttl: Duration) -> Self {
        Self {
            advisories: AdvisoryService::new(
                client.clone(),
                Arc::new(TtlCache::new(cache_ttl)),
                Arc::new(TtlCache::new(cache_ttl)),
            ),
            tips: TipService::new(client.clone(), Arc::new(TtlCache::new(cache_ttl))),
            resources: ResourceService::new(client.clone(), Arc::new(TtlCache::new(cache_ttl))),
            help: HelpService::new(
                client.clone(),
                Arc::new(TtlCache::new(cache_ttl)),
                Arc::new(TtlCache::new(cache_ttl)),
            ),
            notifications: NotificationService::new(client.clone(), Arc::new(TtlCache::new(cache_ttl))),
            dashboard: DashboardService::new(client, Arc::new(TtlCache::new(cache_ttl))),
        }
    }

    pub fn status(&self) -> Vec<ResourceStatus> {
        let mut status = self.advisories.status();
        status.extend(self.tips.status());
        status.extend(self.resources.status());
        status.extend(self.help.status());
        status.extend(self.notifications.status());
        status.extend(self.dashboard.status());
        status
    }
}
