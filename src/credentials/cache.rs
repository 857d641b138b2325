use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::config::ShopType;
use crate::credentials::{CredentialsError, CredentialsProvider, ShopCredentials};

type Entries = HashMap<String, HashMap<ShopType, ShopCredentials>>;

/// In-memory credentials cache in front of a [`CredentialsProvider`].
///
/// Entries are keyed `user_id -> shop_type`. Nothing expires on its own;
/// [`clear`](Self::clear) empties the whole cache, usually from
/// [`spawn_periodic_clear`](Self::spawn_periodic_clear).
#[derive(Debug)]
pub struct CredentialCache<P> {
    provider: P,
    entries: RwLock<Entries>,
}

impl<P: CredentialsProvider> CredentialCache<P> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the underlying provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns cached credentials, fetching and caching them on a miss.
    ///
    /// Failed fetches are not cached.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`CredentialsError`] on a miss that cannot be
    /// resolved.
    #[tracing::instrument(skip(self))]
    pub async fn get(
        &self,
        user_id: &str,
        shop_type: &ShopType,
    ) -> Result<ShopCredentials, CredentialsError> {
        if let Some(credentials) = self.cached(user_id, shop_type).await {
            return Ok(credentials);
        }

        tracing::debug!("Credentials cache miss");
        let credentials = self
            .provider
            .fetch(user_id, shop_type)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to fetch shop credentials");
                e
            })?;

        self.insert(user_id, shop_type.clone(), credentials.clone())
            .await;
        Ok(credentials)
    }

    /// Stores credentials, replacing any previous entry.
    pub async fn insert(&self, user_id: &str, shop_type: ShopType, credentials: ShopCredentials) {
        self.entries
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .insert(shop_type, credentials);
    }

    /// Returns `true` if credentials are cached for the pair.
    pub async fn contains(&self, user_id: &str, shop_type: &ShopType) -> bool {
        self.cached(user_id, shop_type).await.is_some()
    }

    /// Total number of cached `(user_id, shop_type)` entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.values().map(HashMap::len).sum()
    }

    /// Returns `true` if nothing is cached.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drops every cached entry.
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        let users = entries.len();
        entries.clear();
        tracing::debug!(users, "Cleared credentials cache");
    }

    /// Spawns a task that clears the cache every `interval`.
    ///
    /// The first clear happens one full `interval` after the call. Abort the
    /// returned handle to stop it.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero.
    #[must_use]
    pub fn spawn_periodic_clear(self: Arc<Self>, interval: Duration) -> JoinHandle<()>
    where
        P: 'static,
    {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // interval() completes its first tick immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                self.clear().await;
            }
        })
    }

    async fn cached(&self, user_id: &str, shop_type: &ShopType) -> Option<ShopCredentials> {
        self.entries
            .read()
            .await
            .get(user_id)
            .and_then(|by_type| by_type.get(shop_type))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::BoxFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl CountingProvider {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl CredentialsProvider for CountingProvider {
        fn fetch<'a>(
            &'a self,
            user_id: &'a str,
            _shop_type: &'a ShopType,
        ) -> BoxFuture<'a, Result<ShopCredentials, CredentialsError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                if user_id == "missing" {
                    return Err(CredentialsError::Status {
                        status: 404,
                        user_id: user_id.to_string(),
                    });
                }
                Ok(ShopCredentials::new(format!("shop-{user_id}"), "key", "password").unwrap())
            })
        }
    }

    #[tokio::test]
    async fn test_get_fetches_once_then_hits_cache() {
        let cache = CredentialCache::new(CountingProvider::new());
        let shop_type = ShopType::default();

        let first = cache.get("u1", &shop_type).await.unwrap();
        let second = cache.get("u1", &shop_type).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.shop_name.as_ref(), "shop-u1.myshopify.com");
        assert_eq!(cache.provider().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_entries_are_partitioned_by_shop_type() {
        let cache = CredentialCache::new(CountingProvider::new());

        cache.get("u1", &ShopType::default()).await.unwrap();
        cache
            .get("u1", &ShopType::new("shopify-plus").unwrap())
            .await
            .unwrap();

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.provider().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let cache = CredentialCache::new(CountingProvider::new());
        let shop_type = ShopType::default();

        assert!(cache.get("missing", &shop_type).await.is_err());
        assert!(!cache.contains("missing", &shop_type).await);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_clear_empties_everything() {
        let cache = CredentialCache::new(CountingProvider::new());
        let credentials = ShopCredentials::new("acme", "key", "password").unwrap();
        cache
            .insert("u1", ShopType::default(), credentials.clone())
            .await;
        cache.insert("u2", ShopType::default(), credentials).await;
        assert_eq!(cache.len().await, 2);

        cache.clear().await;

        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_periodic_clear_skips_first_tick() {
        let cache = Arc::new(CredentialCache::new(CountingProvider::new()));
        let credentials = ShopCredentials::new("acme", "key", "password").unwrap();
        cache.insert("u1", ShopType::default(), credentials).await;

        let handle = Arc::clone(&cache).spawn_periodic_clear(Duration::from_millis(200));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(cache.len().await, 1);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(cache.is_empty().await);

        handle.abort();
    }
}
