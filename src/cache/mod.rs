//! Read Cache
//!
//! In-memory cache for RESTlet read actions with a jittered time-to-live.
//! Entries expire naturally or are bypassed with a force-refresh flag; writes
//! never invalidate them.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::types::{CachedResult, CallResult};

/// Default jitter applied to the TTL (+/-10%).
pub const DEFAULT_TTL_JITTER: f64 = 0.1;

/// Build a cache key from an action name and optional qualifiers.
///
/// Absent qualifiers are dropped and the rest sorted, so the same filter
/// yields the same key regardless of argument order.
///
/// # Examples
///
/// ```
/// use netsuite_integration::cache::cache_key;
///
/// assert_eq!(cache_key("projects", &[]), "projects");
/// assert_eq!(
///     cache_key("projects", &[("customerId", Some("42".to_string())), ("a", None)]),
///     "projects|customerId=42"
/// );
/// ```
pub fn cache_key(action: &str, qualifiers: &[(&str, Option<String>)]) -> String {
    let mut parts: Vec<String> = qualifiers
        .iter()
        .filter_map(|(k, v)| v.as_ref().map(|v| format!("{}={}", k, v)))
        .collect();

    if parts.is_empty() {
        return action.to_string();
    }

    parts.sort();
    format!("{}|{}", action, parts.join("&"))
}

#[derive(Clone, Debug)]
struct CacheEntry {
    result: CallResult,
    stored_at: Instant,
}

/// TTL cache of successful read results.
pub struct ReadCache {
    ttl: Duration,
    jitter: f64,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ReadCache {
    /// Create cache with default jitter.
    pub fn new(ttl: Duration) -> Self {
        Self::with_jitter(ttl, DEFAULT_TTL_JITTER)
    }

    /// Create cache with a custom jitter factor (0.0-1.0).
    pub fn with_jitter(ttl: Duration, jitter: f64) -> Self {
        Self {
            ttl,
            jitter: jitter.clamp(0.0, 1.0),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// TTL with a fresh random offset, drawn per lookup.
    fn jittered_ttl(&self) -> Duration {
        let delta = self.ttl.as_secs_f64() * self.jitter;
        let offset = (rand::random::<f64>() * 2.0 - 1.0) * delta;
        Duration::from_secs_f64((self.ttl.as_secs_f64() + offset).max(0.0))
    }

    /// Longest any entry can stay fresh, whatever jitter is drawn.
    fn max_ttl(&self) -> Duration {
        self.ttl.mul_f64(1.0 + self.jitter)
    }

    /// Look up a fresh entry. A stale entry is removed.
    pub fn get(&self, key: &str) -> Option<CallResult> {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries.get(key)?;
        if entry.stored_at.elapsed() < self.jittered_ttl() {
            return Some(entry.result.clone());
        }
        entries.remove(key);
        None
    }

    /// Store a result. Failed results are ignored.
    pub fn put(&self, key: &str, result: &CallResult) {
        if !result.success {
            return;
        }
        let max_ttl = self.max_ttl();
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|_, entry| entry.stored_at.elapsed() < max_ttl);
        entries.insert(
            key.to_string(),
            CacheEntry {
                result: result.clone(),
                stored_at: Instant::now(),
            },
        );
    }

    /// Serve from cache, or run `fetch` and store its result.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, force_refresh: bool, fetch: F) -> CachedResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CallResult>,
    {
        if !force_refresh {
            if let Some(result) = self.get(key) {
                debug!(key = key, "Serving RESTlet read from cache");
                return CachedResult {
                    result,
                    cached: true,
                };
            }
        }

        let result = fetch().await;
        self.put(key, &result);
        CachedResult {
            result,
            cached: false,
        }
    }

    /// Drop one entry.
    pub fn invalidate(&self, key: &str) -> bool {
        self.entries.lock().unwrap().remove(key).is_some()
    }

    /// Drop everything.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
