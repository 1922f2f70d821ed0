use std::sync::Arc;

use chrono::Utc;

use super::{fetch_valid_one, CachedResource, ResourceStatus};
use crate::cache::TtlCache;
use crate::http_client::HttpClient;
use crate::models::Dashboard;

pub const DASHBOARD_PATH: &str = "/data/dashboard.json";

pub struct DashboardService {
    client: HttpClient,
    dashboard: CachedResource<Dashboard>,
}

impl DashboardService {
    pub fn new(client: HttpClient, cache: Arc<TtlCache<Dashboard>>) -> Self {
        Self {
            client,
            dashboard: CachedResource::new("dashboard", DASHBOARD_PATH, cache),
        }
    }

    pub async fn fetch_dashboard(&self) -> Dashboard {
        self.dashboard
            .load(fetch_valid_one(&self.client, DASHBOARD_PATH), || {
                Dashboard::unavailable(Utc::now())
            })
            .await
    }

    pub fn status(&self) -> Vec<ResourceStatus> {
        vec![self.dashboard.status()]
    }
}
