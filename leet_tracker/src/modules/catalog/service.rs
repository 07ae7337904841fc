use crate::modules::catalog::fetcher::CatalogSource;
use crate::types::{error::Result, tables::Problem};
use leet_tracker_libs::cache::Cache;
use tokio::time::Duration;

/// Well-known key under which the whole catalog is cached.
pub const CATALOG_CACHE_KEY: &str = "leetcode_problems";

/// Cache-aside front for the catalog source. The cache is an optimization:
/// a failure to read it degrades to a source fetch and a failure to
/// populate it is logged and swallowed.
pub struct CatalogService<S, C> {
    source: S,
    cache: C,
    cache_ttl: Duration,
}

impl<S, C> CatalogService<S, C>
where
    S: CatalogSource,
    C: Cache,
{
    pub fn new(source: S, cache: C, cache_ttl: Duration) -> Self {
        Self {
            source,
            cache,
            cache_ttl,
        }
    }

    pub async fn fetch_catalog(&self) -> Result<Vec<Problem>> {
        match self.cache.get::<Vec<Problem>>(CATALOG_CACHE_KEY).await {
            Ok(Some(problems)) => {
                tracing::info!("{} problems served from the cache.", problems.len());
                return Ok(problems);
            }
            Ok(None) => {
                tracing::debug!("catalog cache miss");
            }
            Err(e) => {
                tracing::warn!("catalog cache read failed, falling back to the source: {}", e);
            }
        }

        let problems = self.source.fetch().await?.into_problems();
        tracing::info!("{} problems normalized from the catalog source.", problems.len());

        if let Err(e) = self
            .cache
            .set(CATALOG_CACHE_KEY, &problems, self.cache_ttl)
            .await
        {
            tracing::warn!("failed to populate the catalog cache: {}", e);
        }

        Ok(problems)
    }

    /// Forces the next `fetch_catalog` call to bypass the cache.
    pub async fn invalidate_catalog(&self) -> Result<()> {
        self.cache.invalidate(CATALOG_CACHE_KEY).await?;
        tracing::info!("catalog cache invalidated");

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::catalog::{CatalogResponse, DifficultyLevel, ProblemStat, StatStatusPair};
    use async_trait::async_trait;
    use leet_tracker_libs::cache::{decode_payload, CacheError};
    use serde::{de::DeserializeOwned, Serialize};
    use std::{
        collections::HashMap,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
    };

    struct StubSource {
        fetches: AtomicUsize,
    }

    impl StubSource {
        fn new() -> Self {
            Self {
                fetches: AtomicUsize::new(0),
            }
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CatalogSource for &StubSource {
        async fn fetch(&self) -> Result<CatalogResponse> {
            self.fetches.fetch_add(1, Ordering::SeqCst);

            Ok(CatalogResponse {
                num_total: 1,
                stat_status_pairs: vec![StatStatusPair {
                    stat: ProblemStat {
                        title: String::from("Two Sum"),
                        slug: String::from("two-sum"),
                        total_accepted: 1,
                        total_submitted: 2,
                        frontend_id: 1,
                    },
                    difficulty: DifficultyLevel { level: 1 },
                    paid_only: false,
                }],
            })
        }
    }

    /// In-memory stand-in honoring the same empty-payload-is-a-miss
    /// contract as the redis backend.
    #[derive(Default)]
    struct MemoryCache {
        store: Mutex<HashMap<String, Vec<u8>>>,
        fail_writes: bool,
        fail_reads: bool,
    }

    #[async_trait]
    impl Cache for &MemoryCache {
        async fn get<T>(&self, key: &str) -> std::result::Result<Option<T>, CacheError>
        where
            T: DeserializeOwned + Send,
        {
            if self.fail_reads {
                return Err(CacheError::Timeout);
            }
            let payload = self.store.lock().unwrap().get(key).cloned();

            decode_payload(payload)
        }

        async fn set<T>(
            &self,
            key: &str,
            value: &T,
            _ttl: Duration,
        ) -> std::result::Result<(), CacheError>
        where
            T: Serialize + Send + Sync,
        {
            if self.fail_writes {
                return Err(CacheError::Timeout);
            }
            let payload = serde_json::to_vec(value).map_err(CacheError::Serialize)?;
            self.store.lock().unwrap().insert(key.to_string(), payload);

            Ok(())
        }

        async fn invalidate(&self, key: &str) -> std::result::Result<(), CacheError> {
            self.store.lock().unwrap().insert(key.to_string(), Vec::new());

            Ok(())
        }
    }

    #[tokio::test]
    async fn only_the_first_fetch_hits_the_source() {
        let source = StubSource::new();
        let cache = MemoryCache::default();
        let service = CatalogService::new(&source, &cache, Duration::from_secs(60));

        let first = service.fetch_catalog().await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(source.fetch_count(), 1);

        let second = service.fetch_catalog().await.unwrap();
        assert_eq!(second, first);
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn invalidation_forces_the_next_fetch_back_to_the_source() {
        let source = StubSource::new();
        let cache = MemoryCache::default();
        let service = CatalogService::new(&source, &cache, Duration::from_secs(60));

        service.fetch_catalog().await.unwrap();
        service.invalidate_catalog().await.unwrap();

        service.fetch_catalog().await.unwrap();
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn populate_failures_are_swallowed() {
        let source = StubSource::new();
        let cache = MemoryCache {
            fail_writes: true,
            ..MemoryCache::default()
        };
        let service = CatalogService::new(&source, &cache, Duration::from_secs(60));

        let problems = service.fetch_catalog().await.unwrap();
        assert_eq!(problems.len(), 1);

        // nothing was cached, so every call goes to the source
        service.fetch_catalog().await.unwrap();
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn cache_read_failures_degrade_to_the_source() {
        let source = StubSource::new();
        let cache = MemoryCache {
            fail_reads: true,
            ..MemoryCache::default()
        };
        let service = CatalogService::new(&source, &cache, Duration::from_secs(60));

        let problems = service.fetch_catalog().await.unwrap();
        assert_eq!(problems.len(), 1);
        assert_eq!(source.fetch_count(), 1);
    }
}
