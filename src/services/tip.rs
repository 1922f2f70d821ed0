use std::sync::Arc;

use super::{fetch_valid_list, CachedResource, ResourceStatus};
use crate::cache::TtlCache;
use crate::http_client::HttpClient;
use crate::models::Tip;

pub const TIPS_PATH: &str = "/data/tips.json";

pub struct TipService {
    client: HttpClient,
    tips: CachedResource<Vec<Tip>>,
}

impl TipService {
    pub fn new(client: HttpClient, cache: Arc<TtlCache<Vec<Tip>>>) -> Self {
        Self {
            client,
            tips: CachedResource::new("tips", TIPS_PATH, cache),
        }
    }

    pub async fn fetch_tips(&self) -> Vec<Tip> {
        self.tips.load(fetch_valid_list(&self.client, TIPS_PATH), Vec::new).await
    }

    pub fn status(&self) -> Vec<ResourceStatus> {
        vec![self.tips.status()]
    }
}
