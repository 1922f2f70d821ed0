use std::sync::Arc;

use super::{fetch_valid_list, CachedResource, ResourceStatus};
use crate::cache::TtlCache;
use crate::http_client::HttpClient;
use crate::models::Resource;

pub const RESOURCES_PATH: &str = "/data/resources.json";

pub struct ResourceService {
    client: HttpClient,
    resources: CachedResource<Vec<Resource>>,
}

impl ResourceService {
    pub fn new(client: HttpClient, cache: Arc<TtlCache<Vec<Resource>>>) -> Self {
        Self {
            client,
            resources: CachedResource::new("resources", RESOURCES_PATH, cache),
        }
    }

    pub async fn fetch_resources(&self) -> Vec<Resource> {
        self.resources
            .load(fetch_valid_list(&self.client, RESOURCES_PATH), Vec::new)
            .await
    }

    pub fn status(&self) -> Vec<ResourceStatus> {
        vec![self.resources.status()]
    }
}
