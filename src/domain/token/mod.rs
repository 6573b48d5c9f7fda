//! Token domain - local token list cache and lookup

mod token_cache;

pub use token_cache::{
    find_in, InMemoryTokenCacheStore, TokenCache, TokenCacheService, TokenCacheStore, CACHE_TTL_SECS,
};
