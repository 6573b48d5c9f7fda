//! File-backed TTL cache of the token list with read-through fetch and fuzzy lookup

use std::future::Future;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::shared::types::{Token, TokenList};
use crate::shared::utils::{now_epoch, now_iso8601};

/// Seven days
pub const CACHE_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Persisted cache document. Always replaced wholesale, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenCache {
    pub tokens: Vec<Token>,
    pub last_updated: String,
    pub expires_at: i64,
}

impl TokenCache {
    /// Expired iff `now` is strictly past `expires_at`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_epoch())
    }
}

/// Persistence seam for the cache.
///
/// `load` returns `None` for a missing or unreadable cache; implementations
/// log the reason instead of failing.
pub trait TokenCacheStore: Send + Sync {
    fn load(&self) -> Option<TokenCache>;

    fn save(&self, cache: &TokenCache) -> std::io::Result<()>;
}

/// Process-local store, used where no file should be touched.
#[derive(Debug, Default)]
pub struct InMemoryTokenCacheStore {
    cache: Mutex<Option<TokenCache>>,
}

impl InMemoryTokenCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(cache: TokenCache) -> Self {
        Self {
            cache: Mutex::new(Some(cache)),
        }
    }
}

impl TokenCacheStore for InMemoryTokenCacheStore {
    fn load(&self) -> Option<TokenCache> {
        self.cache.lock().ok().and_then(|guard| guard.clone())
    }

    fn save(&self, cache: &TokenCache) -> std::io::Result<()> {
        let mut guard = self
            .cache
            .lock()
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::Other, "cache lock poisoned"))?;
        *guard = Some(cache.clone());
        Ok(())
    }
}

/// Cache operations over an injected store.
#[derive(Clone)]
pub struct TokenCacheService {
    store: Arc<dyn TokenCacheStore>,
}

impl TokenCacheService {
    pub fn new(store: Arc<dyn TokenCacheStore>) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Option<TokenCache> {
        self.store.load()
    }

    /// Replace the cache. Without a future `expires_at` the entry lives for
    /// [`CACHE_TTL_SECS`]. Write failures are logged; the built cache is
    /// returned either way.
    pub fn save(&self, tokens: Vec<Token>, expires_at: Option<i64>) -> TokenCache {
        let now = now_epoch();
        let cache = TokenCache {
            tokens,
            last_updated: now_iso8601(),
            expires_at: expires_at
                .filter(|&at| at > now)
                .unwrap_or(now + CACHE_TTL_SECS),
        };
        match self.store.save(&cache) {
            Ok(()) => debug!("💾 Cached {} tokens until {}", cache.tokens.len(), cache.expires_at),
            Err(e) => warn!("Error saving token cache: {}", e),
        }
        cache
    }

    pub fn is_expired(&self, cache: &TokenCache) -> bool {
        cache.is_expired()
    }

    /// Read-through: serve a live cache, otherwise call `fetcher` once and persist its result.
    pub async fn get_or_fetch<F, Fut, E>(&self, fetcher: F) -> Result<Vec<Token>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TokenList, E>>,
    {
        if let Some(cache) = self.load() {
            if !cache.is_expired() {
                debug!("Serving {} tokens from cache", cache.tokens.len());
                return Ok(cache.tokens);
            }
            info!("Token cache expired at {}, refreshing", cache.expires_at);
        }

        let fresh = fetcher().await?;
        let cache = self.save(fresh.tokens, fresh.expires_at);
        Ok(cache.tokens)
    }

    /// Look a token up in the persisted cache only; never fetches.
    pub fn find_token(&self, symbol: &str, blockchain: &str) -> Option<Token> {
        let cache = self.load()?;
        find_in(&cache.tokens, symbol, blockchain).cloned()
    }
}

/// Exact case-insensitive symbol match first, then the first token whose
/// symbol contains `symbol`. The blockchain must always match exactly.
pub fn find_in<'a>(tokens: &'a [Token], symbol: &str, blockchain: &str) -> Option<&'a Token> {
    let symbol = symbol.to_lowercase();
    let blockchain = blockchain.to_lowercase();
    let on_chain = |token: &&Token| token.blockchain.to_lowercase() == blockchain;

    tokens
        .iter()
        .filter(on_chain)
        .find(|token| token.symbol.to_lowercase() == symbol)
        .or_else(|| {
            tokens
                .iter()
                .filter(on_chain)
                .find(|token| token.symbol.to_lowercase().contains(&symbol))
        })
}
