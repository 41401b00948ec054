use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use crate::models::{RecommendationResult, TravelPreferences};

struct CacheEntry {
    payload: RecommendationResult,
    created_at: Instant,
}

/// Time-boxed cache for recommendation payloads, keyed by a preference
/// fingerprint. Constructed once at startup and shared via `Arc`; the lock
/// is never held across an await. Entries past the TTL are treated as a
/// miss even while physically present; they are replaced on the next `put`.
/// No bounded eviction: growth over process lifetime is accepted.
pub struct RecommendationCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl RecommendationCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn get(&self, fingerprint: &str) -> Option<RecommendationResult> {
        let entries = self
            .entries
            .lock()
            .expect("cache mutex should not be poisoned");
        entries.get(fingerprint).and_then(|entry| {
            if entry.created_at.elapsed() < self.ttl {
                Some(entry.payload.clone())
            } else {
                None
            }
        })
    }

    pub fn put(&self, fingerprint: String, payload: RecommendationResult) {
        let mut entries = self
            .entries
            .lock()
            .expect("cache mutex should not be poisoned");
        entries.insert(
            fingerprint,
            CacheEntry {
                payload,
                created_at: Instant::now(),
            },
        );
    }
}

/// Canonical fingerprint for a preference set: sha256 over the fields in a
/// fixed order, so logically-identical values always collide regardless of
/// how the caller assembled them. Activities order IS significant - no
/// sorting. Reordered activity lists are distinct entries; a simplicity
/// tradeoff, not a correctness requirement.
pub fn fingerprint(prefs: &TravelPreferences) -> String {
    let budget = prefs
        .budget
        .map(|b| b.to_string())
        .unwrap_or_default();
    let region = prefs.region.as_deref().unwrap_or_default();
    let activities = prefs
        .activities
        .as_deref()
        .unwrap_or_default()
        .join("\x1f");

    let mut hasher = Sha256::new();
    hasher.update(budget.as_bytes());
    hasher.update([0x1e]);
    hasher.update(region.as_bytes());
    hasher.update([0x1e]);
    hasher.update(activities.as_bytes());
    hex::encode(hasher.finalize())
}
