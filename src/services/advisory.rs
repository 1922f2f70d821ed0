use std::sync::Arc;

use chrono::Utc;

use super::{fetch_valid_list, fetch_valid_one, CachedResource, ResourceStatus};
use crate::cache::TtlCache;
use crate::http_client::HttpClient;
use crate::models::Advisory;

pub const ADVISORIES_PATH: &str = "/data/advisories.json";
pub const CURRENT_ADVISORY_PATH: &str = "/data/currentAdvisory.json";
pub const GROUP_ADVISORIES_PATH: &str = "/data/groupAdvisories.json";

pub struct AdvisoryService {
    client: HttpClient,
    advisories: CachedResource<Vec<Advisory>>,
    group: CachedResource<Vec<Advisory>>,
    current: CachedResource<Advisory>,
}

impl AdvisoryService {
    /// `lists` backs both the regional and group lists, keyed by path.
    pub fn new(client: HttpClient, lists: Arc<TtlCache<Vec<Advisory>>>, current: Arc<TtlCache<Advisory>>) -> Self {
        Self {
            client,
            advisories: CachedResource::new("advisories", ADVISORIES_PATH, lists.clone()),
            group: CachedResource::new("group_advisories", GROUP_ADVISORIES_PATH, lists),
            current: CachedResource::new("current_advisory", CURRENT_ADVISORY_PATH, current),
        }
    }

    pub async fn fetch_advisories(&self) -> Vec<Advisory> {
        self.advisories
            .load(fetch_valid_list(&self.client, ADVISORIES_PATH), Vec::new)
            .await
    }

    pub async fn fetch_group_advisories(&self) -> Vec<Advisory> {
        self.group
            .load(fetch_valid_list(&self.client, GROUP_ADVISORIES_PATH), Vec::new)
            .await
    }

    /// Falls back to a 24-hour placeholder when nothing can be loaded.
    pub async fn fetch_current_advisory(&self) -> Advisory {
        self.current
            .load(fetch_valid_one(&self.client, CURRENT_ADVISORY_PATH), || {
                Advisory::unavailable(Utc::now())
            })
            .await
    }

    pub fn status(&self) -> Vec<ResourceStatus> {
        vec![self.advisories.status(), self.current.status(), self.group.status()]
    }
}
