use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::shared::config::API_BASE_URL;
use crate::shared::errors::SwapError;
use crate::shared::types::{
    ExecuteRequest, ExecuteResponse, Quote, QuoteRequest, SubmitRequest, SubmitResponse,
    SwapStatus, TokenList,
};
use super::SwapApi;

/// Error envelope: `{"error": {"message": "..."}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Structured { message: Option<String> },
    Plain(String),
}

/// Human-readable message for a non-success response.
///
/// Prefers the server's `error.message`; an unparsable or empty body falls
/// back to the status reason, a parsable one without a message to the code.
pub fn api_error_message(status: StatusCode, body: &str) -> String {
    let fallback = || format!("API request failed: {}", status.as_u16());
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope {
            error: Some(ErrorBody::Structured { message: Some(message) }),
        }) if !message.is_empty() => message,
        Ok(ErrorEnvelope {
            error: Some(ErrorBody::Plain(message)),
        }) if !message.is_empty() => message,
        Ok(_) => fallback(),
        Err(_) => status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(fallback),
    }
}

/// JSON-over-HTTP client for the swap API. Stateless; no retries.
pub struct SwapApiClient {
    http_client: Client,
    base_url: String,
}

impl SwapApiClient {
    pub fn new() -> Self {
        Self::with_base_url(API_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, SwapError> {
        let response = request
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| SwapError::Api(format!("Request failed: {}", e)))?;

        let status = response.status();
        debug!("🌐 {} {}", status.as_u16(), response.url());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = api_error_message(status, &body);
            warn!("Swap API returned {}: {}", status, message);
            return Err(SwapError::Api(message));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SwapError::Api(format!("Invalid API response: {}", e)))
    }
}

impl Default for SwapApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SwapApi for SwapApiClient {
    async fn list_tokens(&self) -> Result<TokenList, SwapError> {
        self.send(self.http_client.get(self.endpoint("/swap/tokens")))
            .await
    }

    async fn get_quote(&self, request: &QuoteRequest) -> Result<Quote, SwapError> {
        self.send(self.http_client.post(self.endpoint("/swap/quote")).json(request))
            .await
    }

    async fn get_status(
        &self,
        deposit_address: &str,
        memo: Option<&str>,
    ) -> Result<SwapStatus, SwapError> {
        let mut query = vec![("depositAddress", deposit_address)];
        if let Some(memo) = memo.filter(|m| !m.is_empty()) {
            query.push(("memo", memo));
        }
        self.send(
            self.http_client
                .get(self.endpoint("/swap/status"))
                .query(&query),
        )
        .await
    }

    async fn submit_deposit(&self, request: &SubmitRequest) -> Result<SubmitResponse, SwapError> {
        self.send(self.http_client.post(self.endpoint("/swap/submit")).json(request))
            .await
    }

    async fn execute_swap(&self, request: &ExecuteRequest) -> Result<ExecuteResponse, SwapError> {
        self.send(self.http_client.post(self.endpoint("/swap/execute")).json(request))
            .await
    }
}
