use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use orgcontent_common::{Config, Organisation};

/// Retention policy for assembled organisations. Both limits off means
/// entries live for the life of the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CachePolicy {
    pub ttl: Option<Duration>,
    pub max_entries: Option<u64>,
}

impl CachePolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            ttl: config.cache_ttl_secs.map(Duration::from_secs),
            max_entries: config.cache_max_entries,
        }
    }
}

/// Process-wide memo of assembled organisations keyed by identifier.
/// Safe to share across concurrent requests; racing writers for the same
/// identifier simply overwrite each other.
pub struct ResultCache {
    inner: Cache<String, Arc<Organisation>>,
}

impl ResultCache {
    pub fn new(policy: CachePolicy) -> Self {
        let mut builder = Cache::builder();
        if let Some(max) = policy.max_entries {
            builder = builder.max_capacity(max);
        }
        if let Some(ttl) = policy.ttl {
            builder = builder.time_to_live(ttl);
        }
        Self {
            inner: builder.build(),
        }
    }

    pub fn unbounded() -> Self {
        Self::new(CachePolicy::default())
    }

    pub fn get(&self, id: &str) -> Option<Arc<Organisation>> {
        self.inner.get(id)
    }

    pub fn put(&self, id: &str, org: Arc<Organisation>) {
        self.inner.insert(id.to_string(), org);
    }

    /// Approximate entry count; pending evictions may not be reflected yet.
    pub fn len(&self) -> u64 {
        self.inner.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org(id: &str) -> Arc<Organisation> {
        Arc::new(Organisation {
            id: id.to_string(),
            title: format!("Org {id}"),
            ..Default::default()
        })
    }

    #[test]
    fn get_returns_what_was_put() {
        let cache = ResultCache::unbounded();
        assert!(cache.get("123").is_none());

        let stored = org("123");
        cache.put("123", stored.clone());

        let hit = cache.get("123").unwrap();
        assert!(Arc::ptr_eq(&hit, &stored));
        assert!(cache.get("456").is_none());
    }

    #[test]
    fn entries_expire_after_ttl() {
        let cache = ResultCache::new(CachePolicy {
            ttl: Some(Duration::from_millis(50)),
            max_entries: None,
        });
        cache.put("123", org("123"));
        assert!(cache.get("123").is_some());

        std::thread::sleep(Duration::from_millis(120));
        assert!(cache.get("123").is_none());
    }

    #[test]
    fn capacity_bounds_entry_count() {
        let cache = ResultCache::new(CachePolicy {
            ttl: None,
            max_entries: Some(3),
        });
        assert!(cache.is_empty());

        for i in 0..10 {
            let id = i.to_string();
            cache.put(&id, org(&id));
        }
        cache.inner.run_pending_tasks();

        assert!(!cache.is_empty());
        assert!(cache.len() <= 3);
    }

    #[test]
    fn concurrent_writers_do_not_corrupt_entries() {
        let cache = Arc::new(ResultCache::unbounded());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for j in 0..50 {
                        let id = format!("{i}-{j}");
                        cache.put(&id, org(&id));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        for i in 0..8 {
            for j in 0..50 {
                let id = format!("{i}-{j}");
                assert_eq!(cache.get(&id).unwrap().id, id);
            }
        }
    }
}
