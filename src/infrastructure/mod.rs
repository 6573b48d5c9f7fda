//! Infrastructure layer - external service adapters

pub mod api_client;
pub mod blockchain;
pub mod storage;
