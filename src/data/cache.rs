use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Raw response bodies keyed by endpoint, so slow-moving listings such as
/// the active sports do not cost API quota every cycle.
pub struct ResponseCache {
    cache: DashMap<String, CachedBody>,
    ttl: Duration,
}

struct CachedBody {
    body: Vec<u8>,
    timestamp: Instant,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: DashMap::new(),
            ttl,
        }
    }

    pub fn insert(&self, key: String, body: Vec<u8>) {
        self.cache.insert(key, CachedBody {
            body,
            timestamp: Instant::now(),
        });
    }

    /// Get body if not expired (evict on read)
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.cache.get(key).and_then(|entry| {
            if entry.timestamp.elapsed() > self.ttl {
                drop(entry); // Drop the read lock
                self.cache.remove(key);
                None
            } else {
                Some(entry.body.clone())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_cache_insert_and_get() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.insert("/v3/sports/".to_string(), b"{}".to_vec());

        assert_eq!(cache.get("/v3/sports/"), Some(b"{}".to_vec()));
        assert_eq!(cache.get("/v3/odds/"), None);
    }

    #[test]
    fn test_cache_ttl_expiration() {
        let cache = ResponseCache::new(Duration::from_millis(200));
        cache.insert("sports".to_string(), b"[]".to_vec());

        assert!(cache.get("sports").is_some());

        thread::sleep(Duration::from_millis(300));

        // Should be evicted
        assert_eq!(cache.get("sports"), None);

        cache.insert("sports".to_string(), b"[1]".to_vec());
        assert_eq!(cache.get("sports"), Some(b"[1]".to_vec()));
    }
}
