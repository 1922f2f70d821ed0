use std::sync::Arc;

use super::{fetch_valid_list, CachedResource, ResourceStatus};
use crate::cache::TtlCache;
use crate::error::Result;
use crate::http_client::HttpClient;
use crate::models::notification::sort_for_display;
use crate::models::Notification;

pub const URGENT_ALERTS_PATH: &str = "/data/urgentAlerts.json";

pub struct NotificationService {
    client: HttpClient,
    urgent: CachedResource<Vec<Notification>>,
}

impl NotificationService {
    pub fn new(client: HttpClient, cache: Arc<TtlCache<Vec<Notification>>>) -> Self {
        Self {
            client,
            urgent: CachedResource::new("urgent_alerts", URGENT_ALERTS_PATH, cache),
        }
    }

    /// Urgent alerts, highest priority and newest first.
    pub async fn fetch_urgent_alerts(&self) -> Vec<Notification> {
        self.urgent.load(self.fetch_sorted(), Vec::new).await
    }

    async fn fetch_sorted(&self) -> Result<Vec<Notification>> {
        let mut alerts = fetch_valid_list(&self.client, URGENT_ALERTS_PATH).await?;
        sort_for_display(&mut alerts);
        Ok(alerts)
    }

    pub fn status(&self) -> Vec<ResourceStatus> {
        vec![self.urgent.status()]
    }
}
