//! CLI commands and handlers
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use colored::*;
use tracing::debug;

use crate::application::output;
use crate::application::services::{
    ExecuteParams, QuoteParams, SwapService, TokenQuery, WalletService,
};
use crate::domain::blockchain::DEFAULT_BLOCKCHAIN;
use crate::domain::token::TokenCacheService;
use crate::infrastructure::api_client::SwapApiClient;
use crate::infrastructure::blockchain::NearSignerConnector;
use crate::infrastructure::storage::{
    FileConfigStore, FileTokenCacheStore, WalletChain, WalletRegistry,
};
use crate::shared::config::{ConfigStore, API_BASE_URL};
use crate::shared::errors::SwapError;
use crate::shared::utils::{config_dir, SETTINGS_FILE, TOKENS_FILE, WALLETS_FILE};

#[derive(Parser)]
#[command(name = "occ-swap")]
#[command(version, about = "OpenClawChain Swap CLI - Token swaps on NEAR blockchain")]
pub struct Cli {
    /// Configuration directory (defaults to ~/.occ)
    #[arg(long, global = true, env = "OCC_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Swap API base URL
    #[arg(long, global = true, env = "OCC_API_URL", default_value = API_BASE_URL)]
    pub api_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Token swap operations using NEAR Intents
    #[command(subcommand)]
    Swap(SwapCommands),

    /// Generated wallets
    #[command(subcommand)]
    Wallet(WalletCommands),

    /// Local settings in ~/.occ/.env
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum SwapCommands {
    /// List supported tokens for swapping
    Tokens {
        /// Filter by blockchain (near, ethereum, solana, etc.)
        #[arg(short, long)]
        blockchain: Option<String>,

        /// Filter by token symbol
        #[arg(short, long)]
        symbol: Option<String>,

        /// Force refresh token cache
        #[arg(long)]
        refresh: bool,
    },

    /// Get a swap quote
    Quote(QuoteArgs),

    /// Execute a swap (NEAR tokens only)
    Execute(ExecuteArgs),

    /// Check swap status
    Status {
        /// Deposit address
        #[arg(long)]
        deposit_address: String,

        /// Memo (for certain chains)
        #[arg(long)]
        memo: Option<String>,
    },
}

#[derive(Args)]
pub struct QuoteArgs {
    /// From token (e.g., wrap.near, usdc)
    #[arg(long)]
    pub from: String,

    /// To token (e.g., usdc, usdt)
    #[arg(long)]
    pub to: String,

    /// Amount to swap in token units, e.g. 1.5
    #[arg(long)]
    pub amount: String,

    /// From blockchain
    #[arg(long, default_value = DEFAULT_BLOCKCHAIN)]
    pub from_chain: String,

    /// To blockchain
    #[arg(long, default_value = DEFAULT_BLOCKCHAIN)]
    pub to_chain: String,

    /// Recipient address (defaults to your NEAR account)
    #[arg(long)]
    pub recipient: Option<String>,

    /// Refund address (defaults to your NEAR account)
    #[arg(long)]
    pub refund: Option<String>,

    /// Dry run mode (test with mock addresses)
    #[arg(long)]
    pub dry: bool,
}

#[derive(Args)]
pub struct ExecuteArgs {
    /// Deposit address from quote
    #[arg(long)]
    pub deposit_address: String,

    /// Amount to swap in token units
    #[arg(long)]
    pub amount: String,

    /// From token symbol
    #[arg(long)]
    pub from: String,

    /// From blockchain
    #[arg(long, default_value = DEFAULT_BLOCKCHAIN)]
    pub from_chain: String,

    /// Optional memo
    #[arg(long)]
    pub memo: Option<String>,
}

#[derive(Subcommand)]
pub enum WalletCommands {
    /// List registered wallets
    List {
        /// Only wallets on this chain (near, solana)
        #[arg(long)]
        chain: Option<String>,
    },

    /// Generate a NEAR key pair on an implicit account
    Generate {
        #[arg(long, default_value = "mainnet")]
        network: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print settings with secrets masked
    Show,

    /// Set one setting; an empty value removes it
    Set { key: String, value: String },
}

/// Paths and endpoints shared by every command
pub struct Context {
    pub config_dir: PathBuf,
    pub api_url: String,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Result<Self, SwapError> {
        Ok(Self {
            config_dir: config_dir(cli.config_dir.clone())?,
            api_url: cli.api_url.clone(),
        })
    }

    fn config_store(&self) -> FileConfigStore {
        FileConfigStore::new(self.config_dir.join(SETTINGS_FILE))
    }

    fn swap_service(&self) -> Result<SwapService, SwapError> {
        let settings = self.config_store().load()?;
        let cache = TokenCacheService::new(Arc::new(FileTokenCacheStore::new(
            self.config_dir.join(TOKENS_FILE),
        )));
        Ok(SwapService::new(
            Arc::new(SwapApiClient::with_base_url(&self.api_url)),
            cache,
            settings,
            Arc::new(NearSignerConnector),
        ))
    }

    fn wallet_service(&self) -> WalletService {
        WalletService::new(
            self.config_dir.clone(),
            WalletRegistry::new(self.config_dir.join(WALLETS_FILE)),
        )
    }
}

pub struct CommandExecutor;

impl CommandExecutor {
    /// Execute the selected command
    pub async fn execute(command: Commands, context: &Context) -> Result<(), SwapError> {
        debug!("Config dir: {}", context.config_dir.display());
        match command {
            Commands::Swap(command) => Self::execute_swap_command(command, context).await,
            Commands::Wallet(command) => Self::execute_wallet_command(command, context),
            Commands::Config(command) => Self::execute_config_command(command, context),
        }
    }

    async fn execute_swap_command(command: SwapCommands, context: &Context) -> Result<(), SwapError> {
        let service = context.swap_service()?;
        match command {
            SwapCommands::Tokens {
                blockchain,
                symbol,
                refresh,
            } => {
                if refresh {
                    println!("{}", "Refreshing token cache...".cyan());
                }
                let listing = service
                    .list_tokens(&TokenQuery {
                        blockchain,
                        symbol,
                        refresh,
                    })
                    .await?;
                output::print_tokens(&listing);
                Ok(())
            }
            SwapCommands::Quote(args) => Self::execute_quote_command(&service, args).await,
            SwapCommands::Execute(args) => Self::execute_execute_command(&service, args).await,
            SwapCommands::Status {
                deposit_address,
                memo,
            } => {
                let status = service.status(&deposit_address, memo.as_deref()).await?;
                output::print_status(&status);
                Ok(())
            }
        }
    }

    async fn execute_quote_command(service: &SwapService, args: QuoteArgs) -> Result<(), SwapError> {
        let params = QuoteParams {
            from: args.from.clone(),
            to: args.to,
            amount: args.amount.clone(),
            from_chain: args.from_chain,
            to_chain: args.to_chain,
            recipient: args.recipient,
            refund: args.refund,
            dry: args.dry,
        };
        let outcome = service.quote(&params).await?;
        output::print_quote(&outcome, args.amount.trim(), &args.from, args.dry);
        Ok(())
    }

    async fn execute_execute_command(service: &SwapService, args: ExecuteArgs) -> Result<(), SwapError> {
        let params = ExecuteParams {
            deposit_address: args.deposit_address,
            amount: args.amount,
            from: args.from,
            from_chain: args.from_chain,
            memo: args.memo,
        };

        let prepared = service.prepare_execution(&params)?;
        println!(
            "{}",
            format!("Token: {} ({})", prepared.token.symbol, prepared.token.asset_id).bright_black()
        );
        println!(
            "{}",
            format!(
                "Amount: {} {} = {} (smallest unit)\n",
                params.amount.trim(),
                prepared.token.symbol,
                prepared.smallest_unit
            )
            .bright_black()
        );

        println!("{}", "Step 1: Getting unsigned transactions...".cyan());
        let response = service.request_transactions(&prepared, &params).await?;
        println!(
            "{}",
            format!("Token Contract: {}", response.token_contract).bright_black()
        );
        println!(
            "{}",
            format!("Transactions: {}", response.transactions.len()).bright_black()
        );
        if !response.instructions.is_empty() {
            println!("{}", response.instructions.bright_black());
        }

        println!("{}", "\nStep 2: Signing and sending transactions...".cyan());
        let hashes = service.broadcast(&prepared, &response).await?;
        println!("{}", "✓ Transactions sent successfully!\n".green());
        for (i, hash) in hashes.iter().enumerate() {
            println!(
                "{} {}",
                format!("{}:", output::transaction_label(i, hashes.len())).white(),
                hash.yellow()
            );
        }

        println!("{}", "\nStep 3: Submitting to API...".cyan());
        let submission = service.submit(&params, &hashes).await?;
        if !submission.success {
            return Err(SwapError::Api(if submission.message.is_empty() {
                "Deposit submission was not accepted".to_string()
            } else {
                submission.message
            }));
        }
        println!("{}", "✓ Swap submitted successfully!".green());
        println!("{}", "\nCheck status with:".cyan());
        println!("{}", output::status_hint(&params.deposit_address).white());
        Ok(())
    }

    fn execute_wallet_command(command: WalletCommands, context: &Context) -> Result<(), SwapError> {
        let wallets = context.wallet_service();
        match command {
            WalletCommands::List { chain } => {
                let chain = chain.as_deref().map(parse_wallet_chain).transpose()?;
                output::print_wallets(&wallets.list(chain));
            }
            WalletCommands::Generate { network } => {
                if let Some(existing) = wallets.find(WalletChain::Near, &network) {
                    println!(
                        "{}",
                        format!(
                            "Note: a NEAR {} wallet is already registered ({})\n",
                            network, existing.public_key
                        )
                        .yellow()
                    );
                }
                let wallet = wallets.generate_near_wallet(&network)?;
                output::print_generated_wallet(&wallet);
            }
        }
        Ok(())
    }

    fn execute_config_command(command: ConfigCommands, context: &Context) -> Result<(), SwapError> {
        let store = context.config_store();
        match command {
            ConfigCommands::Show => {
                let settings = store.load()?;
                println!(
                    "{}",
                    format!("Settings file: {}\n", store.path().display()).bright_black()
                );
                output::print_settings(&settings.entries());
            }
            ConfigCommands::Set { key, value } => {
                let key = key.trim().to_uppercase();
                if key.is_empty() || key.contains('=') || key.contains(char::is_whitespace) {
                    return Err(SwapError::Config(format!("invalid setting name \"{}\"", key)));
                }
                store.update(&[(key.clone(), value)])?;
                println!("{}", format!("✓ Updated {}", key).green());
            }
        }
        Ok(())
    }
}

pub fn parse_wallet_chain(chain: &str) -> Result<WalletChain, SwapError> {
    match chain.trim().to_lowercase().as_str() {
        "near" => Ok(WalletChain::Near),
        "solana" => Ok(WalletChain::Solana),
        other => Err(SwapError::Config(format!(
            "unknown wallet chain \"{}\" (expected near or solana)",
            other
        ))),
    }
}
