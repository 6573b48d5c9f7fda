//! Domain layer - core business logic and entities

pub mod amount;
pub mod blockchain;
pub mod token;
pub mod execution;
