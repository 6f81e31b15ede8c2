use crate::models::ShopRecord;
use crate::services::postgres::RepositoryError;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Catalog load failed: {0}")]
    Load(Arc<RepositoryError>),
}

/// In-memory snapshot of the shop catalog
///
/// The nearby query scans every shop, so the whole catalog is cached as one
/// entry and refreshed after `ttl_secs`. Concurrent misses share one load.
pub struct CatalogCache {
    cache: moka::future::Cache<(), Arc<Vec<ShopRecord>>>,
    ttl_secs: u64,
}

impl CatalogCache {
    /// Create a new catalog cache
    pub fn new(ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(1)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache, ttl_secs }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Get the cached catalog, loading it on a miss
    ///
    /// Failed loads are not cached.
    pub async fn get_or_load<F, Fut>(&self, load: F) -> Result<Arc<Vec<ShopRecord>>, CacheError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<ShopRecord>, RepositoryError>>,
    {
        self.cache
            .try_get_with((), async move {
                let shops = load().await?;
                tracing::debug!("Catalog cache refreshed with {} shops", shops.len());
                Ok::<_, RepositoryError>(Arc::new(shops))
            })
            .await
            .map_err(CacheError::Load)
    }

    /// Drop the cached catalog so the next read reloads it
    pub async fn invalidate(&self) {
        self.cache.invalidate(&()).await;
        tracing::debug!("Catalog cache invalidated");
    }
}
