use std::sync::Arc;

use super::{fetch_valid_list, CachedResource, ResourceStatus};
use crate::cache::TtlCache;
use crate::http_client::HttpClient;
use crate::models::{ContactMethod, Faq};

pub const FAQS_PATH: &str = "/data/faqs.json";
pub const CONTACT_METHODS_PATH: &str = "/data/contactMethods.json";

/// FAQs and support contact channels.
pub struct HelpService {
    client: HttpClient,
    faqs: CachedResource<Vec<Faq>>,
    contacts: CachedResource<Vec<ContactMethod>>,
}

impl HelpService {
    pub fn new(
        client: HttpClient,
        faqs: Arc<TtlCache<Vec<Faq>>>,
        contacts: Arc<TtlCache<Vec<ContactMethod>>>,
    ) -> Self {
        Self {
            client,
            faqs: CachedResource::new("faqs", FAQS_PATH, faqs),
            contacts: CachedResource::new("contact_methods", CONTACT_METHODS_PATH, contacts),
        }
    }

    pub async fn fetch_faqs(&self) -> Vec<Faq> {
        self.faqs.load(fetch_valid_list(&self.client, FAQS_PATH), Vec::new).await
    }

    pub async fn fetch_contact_methods(&self) -> Vec<ContactMethod> {
        self.contacts
            .load(fetch_valid_list(&self.client, CONTACT_METHODS_PATH), Vec::new)
            .await
    }

    pub fn status(&self) -> Vec<ResourceStatus> {
        vec![self.faqs.status(), self.contacts.status()]
    }
}
