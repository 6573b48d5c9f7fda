//! Application layer - use cases and services

pub mod commands;
pub mod output;
pub mod services;

pub use commands::{Cli, CommandExecutor, Commands, Context};
pub use services::{SwapService, WalletService};
