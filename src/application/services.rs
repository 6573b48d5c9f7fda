//! Application services - swap and wallet use cases, no terminal output

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::amount::to_smallest_unit;
use crate::domain::blockchain::{ensure_supported, validate_chain_settings, ChainCredentials};
use crate::domain::execution::{SignerConnector, SignerCredentials, TransactionExecutor};
use crate::domain::token::TokenCacheService;
use crate::infrastructure::api_client::SwapApi;
use crate::infrastructure::blockchain::key_material::{
    encode_public_key, encode_secret_key, generate_signing_key, implicit_account_id,
};
use crate::infrastructure::storage::{stage_private_key, WalletChain, WalletInfo, WalletRegistry};
use crate::shared::config::Settings;
use crate::shared::errors::SwapError;
use crate::shared::types::{
    ExecuteRequest, ExecuteResponse, Quote, QuoteRequest, SubmitRequest, SubmitResponse,
    SwapStatus, Token,
};
use crate::shared::utils::now_iso8601;

/// Last resort when neither a flag nor any NEAR address is configured
pub const PLACEHOLDER_ACCOUNT: &str = "your-account.near";

/// Only NEP-141 fungible tokens can be sent by the built-in signer.
pub const NEP141_PREFIX: &str = "nep141:";

#[derive(Debug, Clone, Default)]
pub struct TokenQuery {
    pub blockchain: Option<String>,
    pub symbol: Option<String>,
    pub refresh: bool,
}

#[derive(Debug, Clone)]
pub struct TokenListing {
    pub tokens: Vec<Token>,
    pub refreshed: bool,
    /// Set when the tokens came from (or were just written to) a live cache.
    pub cache_updated: Option<String>,
}

#[derive(Debug, Clone)]
pub struct QuoteParams {
    pub from: String,
    pub to: String,
    pub amount: String,
    pub from_chain: String,
    pub to_chain: String,
    pub recipient: Option<String>,
    pub refund: Option<String>,
    pub dry: bool,
}

#[derive(Debug, Clone)]
pub struct QuoteOutcome {
    pub from_token: Token,
    pub to_token: Token,
    pub smallest_unit: String,
    pub recipient: String,
    pub refund: String,
    pub quote: Quote,
}

#[derive(Debug, Clone)]
pub struct ExecuteParams {
    pub deposit_address: String,
    pub amount: String,
    pub from: String,
    pub from_chain: String,
    pub memo: Option<String>,
}

/// Everything checked locally before the execute endpoint is called
#[derive(Debug, Clone)]
pub struct PreparedExecution {
    pub credentials: ChainCredentials,
    pub token: Token,
    pub smallest_unit: String,
}

#[derive(Debug, Clone)]
pub struct ExecutionReport {
    pub response: ExecuteResponse,
    pub transaction_hashes: Vec<String>,
    pub submission: SubmitResponse,
}

/// Swap use cases over injected collaborators.
pub struct SwapService {
    api: Arc<dyn SwapApi>,
    cache: TokenCacheService,
    settings: Settings,
    connector: Arc<dyn SignerConnector>,
}

impl SwapService {
    pub fn new(
        api: Arc<dyn SwapApi>,
        cache: TokenCacheService,
        settings: Settings,
        connector: Arc<dyn SignerConnector>,
    ) -> Self {
        Self {
            api,
            cache,
            settings,
            connector,
        }
    }

    pub async fn list_tokens(&self, query: &TokenQuery) -> Result<TokenListing, SwapError> {
        let (tokens, cache_updated) = if query.refresh {
            info!("🔄 Refreshing token cache");
            let fresh = self.api.list_tokens().await?;
            let cache = self.cache.save(fresh.tokens, fresh.expires_at);
            (cache.tokens, None)
        } else {
            let tokens = self.cache.get_or_fetch(|| self.api.list_tokens()).await?;
            let updated = self
                .cache
                .load()
                .filter(|cache| !cache.is_expired())
                .map(|cache| cache.last_updated);
            (tokens, updated)
        };

        let blockchain = query.blockchain.as_deref().map(str::to_lowercase);
        let symbol = query.symbol.as_deref().map(str::to_lowercase);
        let tokens = tokens
            .into_iter()
            .filter(|t| {
                blockchain
                    .as_ref()
                    .map_or(true, |chain| t.blockchain.to_lowercase() == *chain)
            })
            .filter(|t| {
                symbol
                    .as_ref()
                    .map_or(true, |sym| t.symbol.to_lowercase().contains(sym.as_str()))
            })
            .collect();

        Ok(TokenListing {
            tokens,
            refreshed: query.refresh,
            cache_updated,
        })
    }

    /// Both chains are gated and validated before the cache or the API is touched.
    pub async fn quote(&self, params: &QuoteParams) -> Result<QuoteOutcome, SwapError> {
        let from_chain = ensure_supported(&params.from_chain)?;
        let to_chain = ensure_supported(&params.to_chain)?;
        validate_chain_settings(&from_chain, &self.settings)?;
        validate_chain_settings(&to_chain, &self.settings)?;

        let from_token = self.resolve_token(&params.from, &from_chain)?;
        let to_token = self.resolve_token(&params.to, &to_chain)?;
        let smallest_unit = to_smallest_unit(&params.amount, from_token.decimals)?;

        let recipient = resolve_address(
            params.recipient.as_deref(),
            self.settings.near_recipient_address.as_deref(),
            &self.settings,
        );
        let refund = resolve_address(
            params.refund.as_deref(),
            self.settings.near_refund_address.as_deref(),
            &self.settings,
        );

        let request = QuoteRequest {
            from_token: from_token.asset_id.clone(),
            to_token: to_token.asset_id.clone(),
            amount: smallest_unit.clone(),
            recipient_address: recipient.clone(),
            refund_address: refund.clone(),
            dry: params.dry,
        };
        debug!("Quote request: {:?}", request);
        let quote = self.api.get_quote(&request).await?;

        Ok(QuoteOutcome {
            from_token,
            to_token,
            smallest_unit,
            recipient,
            refund,
            quote,
        })
    }

    /// Local checks for `execute`; performs no network I/O.
    pub fn prepare_execution(&self, params: &ExecuteParams) -> Result<PreparedExecution, SwapError> {
        let chain = ensure_supported(&params.from_chain)?;
        let credentials = validate_chain_settings(&chain, &self.settings)?;

        let token = self.resolve_token(&params.from, &chain)?;
        if !token.asset_id.starts_with(NEP141_PREFIX) {
            return Err(SwapError::UnsupportedAsset(token.asset_id));
        }
        let smallest_unit = to_smallest_unit(&params.amount, token.decimals)?;

        Ok(PreparedExecution {
            credentials,
            token,
            smallest_unit,
        })
    }

    pub async fn request_transactions(
        &self,
        prepared: &PreparedExecution,
        params: &ExecuteParams,
    ) -> Result<ExecuteResponse, SwapError> {
        let response = self
            .api
            .execute_swap(&ExecuteRequest {
                deposit_address: params.deposit_address.clone(),
                amount: prepared.smallest_unit.clone(),
                from_token: prepared.token.asset_id.clone(),
                memo: params.memo.clone(),
            })
            .await?;

        if response.transactions.is_empty() {
            return Err(SwapError::Api(
                "Execute response contained no transactions".to_string(),
            ));
        }
        Ok(response)
    }

    /// Sign and send every transaction in order; one hash per transaction.
    pub async fn broadcast(
        &self,
        prepared: &PreparedExecution,
        response: &ExecuteResponse,
    ) -> Result<Vec<String>, SwapError> {
        let credentials = SignerCredentials::from(&prepared.credentials);
        let signer = self.connector.connect(&credentials).await?;
        let hashes = TransactionExecutor::new(signer.as_ref())
            .execute_all(&response.transactions)
            .await?;
        Ok(hashes)
    }

    /// Report the deposit using the final transaction, which carries the token transfer.
    pub async fn submit(
        &self,
        params: &ExecuteParams,
        transaction_hashes: &[String],
    ) -> Result<SubmitResponse, SwapError> {
        let transfer_hash = transaction_hashes
            .last()
            .ok_or_else(|| SwapError::Api("No transaction hash to submit".to_string()))?;

        self.api
            .submit_deposit(&SubmitRequest {
                deposit_address: params.deposit_address.clone(),
                transaction_hash: transfer_hash.clone(),
                memo: params.memo.clone(),
            })
            .await
    }

    pub async fn execute(&self, params: &ExecuteParams) -> Result<ExecutionReport, SwapError> {
        let prepared = self.prepare_execution(params)?;
        let response = self.request_transactions(&prepared, params).await?;
        let transaction_hashes = self.broadcast(&prepared, &response).await?;
        let submission = self.submit(params, &transaction_hashes).await?;
        Ok(ExecutionReport {
            response,
            transaction_hashes,
            submission,
        })
    }

    pub async fn status(
        &self,
        deposit_address: &str,
        memo: Option<&str>,
    ) -> Result<SwapStatus, SwapError> {
        self.api.get_status(deposit_address, memo).await
    }

    fn resolve_token(&self, symbol: &str, blockchain: &str) -> Result<Token, SwapError> {
        self.cache
            .find_token(symbol, blockchain)
            .ok_or_else(|| SwapError::TokenNotFound {
                symbol: symbol.to_string(),
                blockchain: blockchain.to_string(),
            })
    }
}

/// Flag, then the configured override, then the account, then the public key.
pub fn resolve_address(flag: Option<&str>, configured: Option<&str>, settings: &Settings) -> String {
    [
        flag,
        configured,
        settings.near_account_address.as_deref(),
        settings.near_public_key.as_deref(),
    ]
    .into_iter()
    .flatten()
    .find(|value| !value.trim().is_empty())
    .unwrap_or(PLACEHOLDER_ACCOUNT)
    .to_string()
}

#[derive(Debug, Clone)]
pub struct GeneratedWallet {
    pub account_id: String,
    pub public_key: String,
    pub network: String,
    pub staging_file: PathBuf,
}

/// Key generation and the wallet registry
pub struct WalletService {
    config_dir: PathBuf,
    registry: WalletRegistry,
}

impl WalletService {
    pub fn new(config_dir: PathBuf, registry: WalletRegistry) -> Self {
        Self {
            config_dir,
            registry,
        }
    }

    /// New ed25519 key pair on an implicit account. The secret only goes to
    /// the staging file; the registry keeps public data.
    pub fn generate_near_wallet(&self, network: &str) -> Result<GeneratedWallet, SwapError> {
        let signing_key = generate_signing_key();
        let verifying_key = signing_key.verifying_key();
        let account_id = implicit_account_id(&verifying_key);
        let public_key = encode_public_key(&verifying_key);

        let staging_file = stage_private_key(
            &self.config_dir,
            &encode_secret_key(&signing_key),
            &WalletChain::Near.to_string(),
        )?;

        self.registry.upsert(WalletInfo {
            chain: WalletChain::Near,
            network: network.to_string(),
            public_key: public_key.clone(),
            created_at: now_iso8601(),
            account_id: Some(account_id.clone()),
        })?;
        info!("🔐 Generated NEAR wallet {} on {}", account_id, network);

        Ok(GeneratedWallet {
            account_id,
            public_key,
            network: network.to_string(),
            staging_file,
        })
    }

    pub fn list(&self, chain: Option<WalletChain>) -> Vec<WalletInfo> {
        match chain {
            Some(chain) => self.registry.by_chain(chain),
            None => self.registry.load().wallets,
        }
    }

    pub fn find(&self, chain: WalletChain, network: &str) -> Option<WalletInfo> {
        self.registry.by_chain_and_network(chain, network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::execution::{
        ActionParams, FunctionCall, TransactionAction, TransactionSigner, UnsignedTransaction,
    };
    use crate::domain::token::{InMemoryTokenCacheStore, TokenCache};
    use crate::shared::errors::{AmountError, ExecutionError};
    use crate::shared::types::TokenList;
    use crate::shared::utils::now_epoch;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;

    const FULL_SETTINGS: &str = "\
NEAR_ACCOUNT_ADDRESS=alice.near
NEAR_PRIVATE_KEY=ed25519:secret
NEAR_RECIPIENT_ADDRESS=recipient.near
NEAR_REFUND_ADDRESS=refund.near
NEAR_NETWORK=mainnet
NEAR_RPC_URL=https://rpc.mainnet.near.org
";

    fn token(symbol: &str, blockchain: &str, asset_id: &str, decimals: u8) -> Token {
        Token {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            blockchain: blockchain.to_string(),
            decimals,
            asset_id: asset_id.to_string(),
        }
    }

    fn catalog() -> Vec<Token> {
        vec![
            token("wNEAR", "near", "nep141:wrap.near", 24),
            token("USDC", "near", "nep141:usdc.near", 6),
            token("USDC", "ethereum", "nep141:eth-usdc.omft.near", 6),
            token("BTC", "near", "native:btc", 8),
        ]
    }

    fn function_call_tx(receiver: &str) -> UnsignedTransaction {
        UnsignedTransaction {
            receiver_id: receiver.to_string(),
            actions: vec![TransactionAction {
                kind: "FunctionCall".to_string(),
                params: ActionParams {
                    method_name: "ft_transfer_call".to_string(),
                    args: serde_json::json!({ "receiver_id": "dep.near" }),
                    gas: "30000000000000".to_string(),
                    deposit: "1".to_string(),
                },
            }],
        }
    }

    #[derive(Default)]
    struct FakeApi {
        calls: AtomicUsize,
        quotes: Mutex<Vec<QuoteRequest>>,
        submissions: Mutex<Vec<SubmitRequest>>,
        transactions: Vec<UnsignedTransaction>,
    }

    impl FakeApi {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SwapApi for FakeApi {
        async fn list_tokens(&self) -> Result<TokenList, SwapError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(TokenList {
                tokens: catalog(),
                cached: false,
                expires_at: None,
            })
        }

        async fn get_quote(&self, request: &QuoteRequest) -> Result<Quote, SwapError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.quotes.lock().unwrap().push(request.clone());
            Ok(Quote {
                deposit_address: "dep.near".to_string(),
                memo: None,
                expected_output: "1450000".to_string(),
                exchange_rate: "1.45".to_string(),
                fees: "0.1%".to_string(),
                expires_at: now_epoch() + 600,
            })
        }

        async fn get_status(
            &self,
            deposit_address: &str,
            memo: Option<&str>,
        ) -> Result<SwapStatus, SwapError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SwapStatus {
                status: "PENDING_DEPOSIT".to_string(),
                transaction_hash: None,
                timestamp: None,
                message: Some(format!("{}/{}", deposit_address, memo.unwrap_or("-"))),
            })
        }

        async fn submit_deposit(&self, request: &SubmitRequest) -> Result<SubmitResponse, SwapError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.submissions.lock().unwrap().push(request.clone());
            Ok(SubmitResponse {
                success: true,
                message: "ok".to_string(),
            })
        }

        async fn execute_swap(&self, request: &ExecuteRequest) -> Result<ExecuteResponse, SwapError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ExecuteResponse {
                transactions: self.transactions.clone(),
                token_contract: request.from_token.trim_start_matches(NEP141_PREFIX).to_string(),
                blockchain: "near".to_string(),
                instructions: String::new(),
            })
        }
    }

    struct FakeSigner {
        sent: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl TransactionSigner for FakeSigner {
        async fn sign_and_send(
            &self,
            receiver_id: &str,
            _actions: &[FunctionCall],
        ) -> Result<String, ExecutionError> {
            if self.fail {
                return Err(ExecutionError::Rejected("not enough balance".to_string()));
            }
            let n = self.sent.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("hash-{}-{}", n, receiver_id))
        }
    }

    #[derive(Default)]
    struct FakeConnector {
        connects: AtomicUsize,
        sent: Arc<AtomicUsize>,
        fail: bool,
        seen: Mutex<Option<SignerCredentials>>,
    }

    #[async_trait]
    impl SignerConnector for FakeConnector {
        async fn connect(
            &self,
            credentials: &SignerCredentials,
        ) -> Result<Box<dyn TransactionSigner>, ExecutionError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            *self.seen.lock().unwrap() = Some(credentials.clone());
            Ok(Box::new(FakeSigner {
                sent: Arc::clone(&self.sent),
                fail: self.fail,
            }))
        }
    }

    fn cached_service() -> TokenCacheService {
        TokenCacheService::new(Arc::new(InMemoryTokenCacheStore::with_cache(TokenCache {
            tokens: catalog(),
            last_updated: now_iso8601(),
            expires_at: now_epoch() + 3600,
        })))
    }

    fn service(
        api: Arc<FakeApi>,
        settings: &str,
        connector: Arc<FakeConnector>,
    ) -> SwapService {
        SwapService::new(api, cached_service(), Settings::parse(settings), connector)
    }

    fn quote_params(from_chain: &str, to_chain: &str) -> QuoteParams {
        QuoteParams {
            from: "wnear".to_string(),
            to: "usdc".to_string(),
            amount: "1.5".to_string(),
            from_chain: from_chain.to_string(),
            to_chain: to_chain.to_string(),
            recipient: None,
            refund: None,
            dry: false,
        }
    }

    fn execute_params(from: &str, chain: &str) -> ExecuteParams {
        ExecuteParams {
            deposit_address: "dep.near".to_string(),
            amount: "2".to_string(),
            from: from.to_string(),
            from_chain: chain.to_string(),
            memo: None,
        }
    }

    #[tokio::test]
    async fn test_quote_converts_amount_and_uses_configured_addresses() {
        let api = Arc::new(FakeApi::default());
        let svc = service(api.clone(), FULL_SETTINGS, Arc::new(FakeConnector::default()));

        let outcome = svc.quote(&quote_params("NEAR", "near")).await.unwrap();

        assert_eq!(outcome.smallest_unit, "1500000000000000000000000");
        assert_eq!(outcome.quote.deposit_address, "dep.near");
        let sent = api.quotes.lock().unwrap()[0].clone();
        assert_eq!(sent.from_token, "nep141:wrap.near");
        assert_eq!(sent.to_token, "nep141:usdc.near");
        assert_eq!(sent.recipient_address, "recipient.near");
        assert_eq!(sent.refund_address, "refund.near");
        assert!(!sent.dry);
    }

    #[tokio::test]
    async fn test_quote_flags_override_addresses() {
        let api = Arc::new(FakeApi::default());
        let svc = service(api.clone(), FULL_SETTINGS, Arc::new(FakeConnector::default()));
        let params = QuoteParams {
            recipient: Some("bob.near".to_string()),
            dry: true,
            ..quote_params("near", "near")
        };

        let outcome = svc.quote(&params).await.unwrap();
        assert_eq!(outcome.recipient, "bob.near");
        assert_eq!(outcome.refund, "refund.near");
        assert!(api.quotes.lock().unwrap()[0].dry);
    }

    #[tokio::test]
    async fn test_unsupported_chain_never_reaches_api() {
        let api = Arc::new(FakeApi::default());
        let connector = Arc::new(FakeConnector::default());
        let svc = service(api.clone(), FULL_SETTINGS, connector.clone());

        let err = svc.quote(&quote_params("near", "solana")).await.unwrap_err();
        assert!(matches!(err, SwapError::UnsupportedBlockchain { ref chain, .. } if chain == "solana"));

        let err = svc.quote(&quote_params("ethereum", "near")).await.unwrap_err();
        assert!(matches!(err, SwapError::UnsupportedBlockchain { .. }));

        let err = svc.execute(&execute_params("usdc", "Solana")).await.unwrap_err();
        assert!(matches!(err, SwapError::UnsupportedBlockchain { .. }));

        assert_eq!(api.calls(), 0);
        assert_eq!(connector.connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_configuration_lists_keys_in_order() {
        let api = Arc::new(FakeApi::default());
        let svc = service(
            api.clone(),
            "NEAR_ACCOUNT_ADDRESS=alice.near\nNEAR_NETWORK=mainnet\n",
            Arc::new(FakeConnector::default()),
        );

        match svc.quote(&quote_params("near", "near")).await.unwrap_err() {
            SwapError::MissingConfiguration { chain, missing } => {
                assert_eq!(chain, "near");
                assert_eq!(
                    missing,
                    vec![
                        "NEAR_PRIVATE_KEY",
                        "NEAR_RECIPIENT_ADDRESS",
                        "NEAR_REFUND_ADDRESS",
                        "NEAR_RPC_URL"
                    ]
                );
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_token_is_reported_without_fetching() {
        let api = Arc::new(FakeApi::default());
        let svc = service(api.clone(), FULL_SETTINGS, Arc::new(FakeConnector::default()));
        let params = QuoteParams {
            to: "DOGE".to_string(),
            ..quote_params("near", "near")
        };

        let err = svc.quote(&params).await.unwrap_err();
        assert!(matches!(err, SwapError::TokenNotFound { ref symbol, .. } if symbol == "DOGE"));
        assert_eq!(err.hints(), vec!["Run: occ-swap swap tokens --refresh".to_string()]);
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_amount_rejected_before_api() {
        let api = Arc::new(FakeApi::default());
        let svc = service(api.clone(), FULL_SETTINGS, Arc::new(FakeConnector::default()));
        let params = QuoteParams {
            amount: "-1".to_string(),
            ..quote_params("near", "near")
        };

        let err = svc.quote(&params).await.unwrap_err();
        assert!(matches!(err, SwapError::InvalidAmount(AmountError::Negative(_))));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_execute_submits_last_transaction_hash() {
        let api = Arc::new(FakeApi {
            transactions: vec![function_call_tx("usdc.near"), function_call_tx("usdc.near")],
            ..FakeApi::default()
        });
        let connector = Arc::new(FakeConnector::default());
        let svc = service(api.clone(), FULL_SETTINGS, connector.clone());

        let report = svc.execute(&execute_params("USDC", "near")).await.unwrap();

        assert_eq!(
            report.transaction_hashes,
            vec!["hash-1-usdc.near".to_string(), "hash-2-usdc.near".to_string()]
        );
        assert_eq!(report.response.token_contract, "usdc.near");
        let submitted = api.submissions.lock().unwrap()[0].clone();
        assert_eq!(submitted.transaction_hash, "hash-2-usdc.near");
        assert_eq!(submitted.deposit_address, "dep.near");

        let creds = connector.seen.lock().unwrap().clone().unwrap();
        assert_eq!(creds.account_id, "alice.near");
        assert_eq!(creds.rpc_url, "https://rpc.mainnet.near.org");
    }

    #[tokio::test]
    async fn test_execute_prefers_mainnet_credentials() {
        let api = Arc::new(FakeApi {
            transactions: vec![function_call_tx("usdc.near")],
            ..FakeApi::default()
        });
        let connector = Arc::new(FakeConnector::default());
        let settings = format!(
            "{}NEAR_MAINNET_ACCOUNT_ADDRESS=main.near\nNEAR_MAINNET_PRIVATE_KEY=ed25519:main\n",
            FULL_SETTINGS
        );
        let svc = service(api, &settings, connector.clone());

        svc.execute(&execute_params("usdc", "near")).await.unwrap();
        let creds = connector.seen.lock().unwrap().clone().unwrap();
        assert_eq!(creds.account_id, "main.near");
        assert_eq!(creds.private_key, "ed25519:main");
    }

    #[tokio::test]
    async fn test_execute_rejects_non_nep141_asset() {
        let api = Arc::new(FakeApi::default());
        let svc = service(api.clone(), FULL_SETTINGS, Arc::new(FakeConnector::default()));

        let err = svc.execute(&execute_params("BTC", "near")).await.unwrap_err();
        assert!(matches!(err, SwapError::UnsupportedAsset(ref id) if id == "native:btc"));
        assert_eq!(err.hints().len(), 1);
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_broadcast_skips_submission() {
        let api = Arc::new(FakeApi {
            transactions: vec![function_call_tx("usdc.near")],
            ..FakeApi::default()
        });
        let connector = Arc::new(FakeConnector {
            fail: true,
            ..FakeConnector::default()
        });
        let svc = service(api.clone(), FULL_SETTINGS, connector);

        let err = svc.execute(&execute_params("usdc", "near")).await.unwrap_err();
        assert!(matches!(
            err,
            SwapError::Execution(ExecutionError::TransactionFailed { index: 1, .. })
        ));
        assert!(api.submissions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_execute_response_is_an_error() {
        let api = Arc::new(FakeApi::default());
        let connector = Arc::new(FakeConnector::default());
        let svc = service(api, FULL_SETTINGS, connector.clone());

        let err = svc.execute(&execute_params("usdc", "near")).await.unwrap_err();
        assert!(matches!(err, SwapError::Api(_)));
        assert_eq!(connector.connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_list_tokens_filters_and_reports_cache() {
        let api = Arc::new(FakeApi::default());
        let svc = service(api.clone(), "", Arc::new(FakeConnector::default()));

        let listing = svc
            .list_tokens(&TokenQuery {
                blockchain: Some("NEAR".to_string()),
                symbol: Some("us".to_string()),
                refresh: false,
            })
            .await
            .unwrap();

        assert_eq!(listing.tokens.len(), 1);
        assert_eq!(listing.tokens[0].asset_id, "nep141:usdc.near");
        assert!(listing.cache_updated.is_some());
        assert!(!listing.refreshed);
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_refresh_always_fetches() {
        let api = Arc::new(FakeApi::default());
        let svc = service(api.clone(), "", Arc::new(FakeConnector::default()));

        let listing = svc
            .list_tokens(&TokenQuery {
                refresh: true,
                ..TokenQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(listing.tokens, catalog());
        assert!(listing.refreshed);
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn test_status_passes_memo() {
        let api = Arc::new(FakeApi::default());
        let svc = service(api, "", Arc::new(FakeConnector::default()));
        let status = svc.status("dep.near", Some("42")).await.unwrap();
        assert_eq!(status.status, "PENDING_DEPOSIT");
        assert_eq!(status.message.as_deref(), Some("dep.near/42"));
    }

    #[test]
    fn test_resolve_address_fallback_chain() {
        let settings = Settings::parse("NEAR_PUBLIC_KEY=ed25519:pk\n");
        assert_eq!(resolve_address(Some("x.near"), Some("y.near"), &settings), "x.near");
        assert_eq!(resolve_address(None, Some("y.near"), &settings), "y.near");
        assert_eq!(resolve_address(None, None, &settings), "ed25519:pk");

        let settings = Settings::parse("NEAR_ACCOUNT_ADDRESS=alice.near\n");
        assert_eq!(resolve_address(None, None, &settings), "alice.near");
        assert_eq!(
            resolve_address(Some(" "), None, &Settings::default()),
            PLACEHOLDER_ACCOUNT
        );
    }

    #[test]
    fn test_generate_near_wallet_stages_secret_and_registers() {
        let dir = TempDir::new().unwrap();
        let registry = WalletRegistry::new(dir.path().join("wallets.json"));
        let wallets = WalletService::new(dir.path().to_path_buf(), registry);

        let wallet = wallets.generate_near_wallet("mainnet").unwrap();

        assert_eq!(wallet.account_id.len(), 64);
        let staged = std::fs::read_to_string(&wallet.staging_file).unwrap();
        assert!(staged.contains("NEAR_PRIVATE_KEY=ed25519:"));

        let listed = wallets.list(Some(WalletChain::Near));
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].public_key, wallet.public_key);
        assert!(!listed[0].public_key.is_empty());
        assert_eq!(
            wallets.find(WalletChain::Near, "mainnet").unwrap().account_id,
            Some(wallet.account_id)
        );
        assert!(wallets.list(Some(WalletChain::Solana)).is_empty());
    }
}
