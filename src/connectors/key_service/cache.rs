use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::ApiKeyValidation;

/// Positive validations keyed by key hash, trusted for `ttl`
pub(crate) struct ValidationCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CachedValidation>>,
}

struct CachedValidation {
    validation: ApiKeyValidation,
    expires_at: Instant,
}

impl ValidationCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key_hash: &str) -> Option<ApiKeyValidation> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key_hash) {
                Some(entry) if entry.expires_at > now => return Some(entry.validation.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(key_hash) {
            if entry.expires_at <= now {
                entries.remove(key_hash);
            } else {
                return Some(entry.validation.clone());
            }
        }

        None
    }

    pub async fn insert(&self, key_hash: String, validation: ApiKeyValidation) {
        if !validation.valid || self.ttl.is_zero() {
            return;
        }
        let expires_at = Instant::now() + self.ttl;
        let mut entries = self.entries.write().await;
        entries.insert(
            key_hash,
            CachedValidation {
                validation,
                expires_at,
            },
        );
    }
}
