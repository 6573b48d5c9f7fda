use std::fs;
use std::path::PathBuf;

use tracing::warn;

use crate::domain::token::{TokenCache, TokenCacheStore};

/// Token cache persisted as pretty JSON (`tokens.json`)
pub struct FileTokenCacheStore {
    path: PathBuf,
}

impl FileTokenCacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenCacheStore for FileTokenCacheStore {
    fn load(&self) -> Option<TokenCache> {
        if !self.path.exists() {
            return None;
        }
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) => {
                warn!("Error loading token cache {}: {}", self.path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&data) {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!("Error parsing token cache {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn save(&self, cache: &TokenCache) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(cache)?;
        fs::write(&self.path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::token::TokenCacheService;
    use crate::shared::types::{Token, TokenList};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn cache() -> TokenCache {
        TokenCache {
            tokens: vec![
                Token {
                    symbol: "wNEAR".to_string(),
                    name: "Wrapped NEAR".to_string(),
                    blockchain: "near".to_string(),
                    decimals: 24,
                    asset_id: "nep141:wrap.near".to_string(),
                },
                Token {
                    symbol: "USDC".to_string(),
                    name: "USD Coin".to_string(),
                    blockchain: "near".to_string(),
                    decimals: 6,
                    asset_id: "nep141:usdc.near".to_string(),
                },
            ],
            last_updated: "2024-01-01T00:00:00.000Z".to_string(),
            expires_at: 1_704_672_000,
        }
    }

    #[test]
    fn test_missing_file_is_absent() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenCacheStore::new(dir.path().join("tokens.json"));
        assert!(store.load().is_none());
    }

    #[test]
    fn test_round_trip_creates_directory() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenCacheStore::new(dir.path().join("nested").join("tokens.json"));
        store.save(&cache()).unwrap();
        assert_eq!(store.load(), Some(cache()));
    }

    #[test]
    fn test_file_uses_camel_case_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tokens.json");
        FileTokenCacheStore::new(&path).save(&cache()).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"lastUpdated\""));
        assert!(raw.contains("\"expiresAt\": 1704672000"));
        assert!(raw.contains("\"assetId\": \"nep141:wrap.near\""));
    }

    #[test]
    fn test_malformed_file_is_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tokens.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(FileTokenCacheStore::new(path).load().is_none());
    }

    #[tokio::test]
    async fn test_unwritable_cache_still_serves_fetched_tokens() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "plain file").unwrap();
        let store = FileTokenCacheStore::new(blocker.join("tokens.json"));
        let service = TokenCacheService::new(Arc::new(store));
        let calls = AtomicUsize::new(0);

        let tokens = service
            .get_or_fetch(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(TokenList {
                    tokens: cache().tokens,
                    cached: false,
                    expires_at: None,
                })
            })
            .await
            .unwrap();

        assert_eq!(tokens, cache().tokens);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(service.load().is_none());
    }
}
