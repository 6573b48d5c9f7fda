pub mod swap_api_client;

pub use swap_api_client::{api_error_message, SwapApiClient};

use async_trait::async_trait;

use crate::shared::errors::SwapError;
use crate::shared::types::{
    ExecuteRequest, ExecuteResponse, Quote, QuoteRequest, SubmitRequest, SubmitResponse,
    SwapStatus, TokenList,
};

/// Remote swap quoting/execution service
#[async_trait]
pub trait SwapApi: Send + Sync {
    /// `GET /swap/tokens`
    async fn list_tokens(&self) -> Result<TokenList, SwapError>;

    /// `POST /swap/quote`
    async fn get_quote(&self, request: &QuoteRequest) -> Result<Quote, SwapError>;

    /// `GET /swap/status`
    async fn get_status(
        &self,
        deposit_address: &str,
        memo: Option<&str>,
    ) -> Result<SwapStatus, SwapError>;

    /// `POST /swap/submit`
    async fn submit_deposit(&self, request: &SubmitRequest) -> Result<SubmitResponse, SwapError>;

    /// `POST /swap/execute`
    async fn execute_swap(&self, request: &ExecuteRequest) -> Result<ExecuteResponse, SwapError>;
}
