//! occ-swap - OpenClawChain swap CLI
//! Built with Domain-Driven Design principles

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export main types for convenience
pub use application::{SwapService, WalletService};
pub use domain::amount::to_smallest_unit;
pub use domain::execution::TransactionExecutor;
pub use domain::token::TokenCacheService;
pub use infrastructure::api_client::{SwapApi, SwapApiClient};
pub use shared::errors::SwapError;
