//! File-backed stores under the per-user configuration directory

pub mod config_file;
pub mod secret_staging;
pub mod token_cache_file;
pub mod wallet_registry;

pub use config_file::FileConfigStore;
pub use secret_staging::stage_private_key;
pub use token_cache_file::FileTokenCacheStore;
pub use wallet_registry::{WalletChain, WalletInfo, WalletRegistry, WalletsDocument};
