//! Terminal rendering for command results

use colored::*;

use crate::application::services::{GeneratedWallet, QuoteOutcome, TokenListing};
use crate::infrastructure::storage::WalletInfo;
use crate::shared::types::SwapStatus;
use crate::shared::utils::{format_epoch, is_secret_key, mask_secret};

const RULE_WIDTH: usize = 80;

pub fn rule() -> ColoredString {
    "─".repeat(RULE_WIDTH).bright_black()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Success,
    Pending,
    Failed,
    Unknown,
}

pub fn status_tone(status: &str) -> StatusTone {
    match status.to_uppercase().as_str() {
        "SUCCESS" => StatusTone::Success,
        "PENDING" | "PENDING_DEPOSIT" | "PROCESSING" => StatusTone::Pending,
        "FAILED" | "ERROR" => StatusTone::Failed,
        _ => StatusTone::Unknown,
    }
}

pub fn colorize_status(status: &str) -> ColoredString {
    match status_tone(status) {
        StatusTone::Success => status.green(),
        StatusTone::Pending => status.yellow(),
        StatusTone::Failed => status.red(),
        StatusTone::Unknown => status.bright_black(),
    }
}

fn field(label: &str, value: ColoredString) {
    println!("{} {}", format!("{}:", label).white(), value);
}

pub fn print_tokens(listing: &TokenListing) {
    if listing.refreshed {
        println!("{}", format!("✓ Cached {} tokens\n", listing.tokens.len()).green());
    } else if let Some(updated) = &listing.cache_updated {
        println!("{}", format!("Using cached tokens (updated: {})\n", updated).bright_black());
    }

    if listing.tokens.is_empty() {
        println!("{}", "No tokens found".yellow());
        return;
    }

    println!("{}", format!("Supported Tokens ({}):", listing.tokens.len()).cyan());
    println!("{}", rule());
    for token in &listing.tokens {
        println!(
            "{}{}{}{}",
            format!("{:<10}", token.symbol).white(),
            format!("{:<30}", token.name).bright_black(),
            format!("{:<15}", token.blockchain).blue(),
            format!("{} decimals", token.decimals).bright_black()
        );
    }
    println!("{}", rule());

    if !listing.refreshed {
        println!("{}", "\nTip: Use --refresh to update token cache".bright_black());
    }
}

pub fn print_quote(outcome: &QuoteOutcome, amount: &str, from_arg: &str, dry: bool) {
    let from = &outcome.from_token;
    let to = &outcome.to_token;
    let quote = &outcome.quote;

    println!("{}", format!("From: {} ({})", from.symbol, from.asset_id).bright_black());
    println!("{}", format!("To: {} ({})", to.symbol, to.asset_id).bright_black());
    println!(
        "{}",
        format!(
            "Amount: {} {} = {} (smallest unit)\n",
            amount, from.symbol, outcome.smallest_unit
        )
        .bright_black()
    );

    println!("{}", "Swap Quote".cyan());
    println!("{}", rule());
    field("Deposit Address", quote.deposit_address.yellow());
    if let Some(memo) = &quote.memo {
        field("Memo", memo.yellow());
    }
    field("Expected Output", quote.expected_output.green());
    field("Exchange Rate", quote.exchange_rate.blue());
    field("Fees", quote.fees.bright_black());
    field("Expires At", format_epoch(quote.expires_at).bright_black());
    println!("{}", rule());

    if dry {
        println!("{}", "\n⚠️  This is a DRY RUN with mock addresses".yellow());
    }

    println!("{}", "\nTo execute this swap, run:".cyan());
    println!("{}", execute_hint(&quote.deposit_address, amount, from_arg).white());
}

pub fn execute_hint(deposit_address: &str, amount: &str, from: &str) -> String {
    format!(
        "occ-swap swap execute --deposit-address {} --amount {} --from {}",
        deposit_address, amount, from
    )
}

pub fn status_hint(deposit_address: &str) -> String {
    format!("occ-swap swap status --deposit-address {}", deposit_address)
}

pub fn print_status(status: &SwapStatus) {
    println!("{}", "Swap Status".cyan());
    println!("{}", rule());
    field("Status", colorize_status(&status.status));
    if let Some(hash) = &status.transaction_hash {
        field("Transaction Hash", hash.yellow());
    }
    if let Some(timestamp) = &status.timestamp {
        field("Timestamp", timestamp.bright_black());
    }
    if let Some(message) = &status.message {
        field("Message", message.bright_black());
    }
    println!("{}", rule());
}

/// Label for the n-th broadcast hash; the API sends storage registration first.
pub fn transaction_label(index: usize, total: usize) -> String {
    match (index, total) {
        (_, 1) => "Token Transfer TX".to_string(),
        (i, n) if i + 1 == n => "Token Transfer TX".to_string(),
        (0, _) => "Storage Registration TX".to_string(),
        (i, _) => format!("Transaction {} TX", i + 1),
    }
}

pub fn print_wallets(wallets: &[WalletInfo]) {
    if wallets.is_empty() {
        println!("{}", "No wallets registered".yellow());
        println!("{}", "Run: occ-swap wallet generate".bright_black());
        return;
    }

    println!("{}", format!("Wallets ({}):", wallets.len()).cyan());
    println!("{}", rule());
    for wallet in wallets {
        println!(
            "{}{}{}",
            format!("{:<8}", wallet.chain.to_string()).blue(),
            format!("{:<14}", wallet.network).white(),
            wallet.public_key.yellow()
        );
        if let Some(account_id) = &wallet.account_id {
            println!("{}", format!("        account: {}", account_id).bright_black());
        }
        println!("{}", format!("        created: {}", wallet.created_at).bright_black());
    }
    println!("{}", rule());
}

pub fn print_generated_wallet(wallet: &GeneratedWallet) {
    println!("{}", "✓ NEAR wallet generated".green());
    println!("{}", rule());
    field("Network", wallet.network.white());
    field("Account ID", wallet.account_id.yellow());
    field("Public Key", wallet.public_key.yellow());
    field("Private Key File", wallet.staging_file.display().to_string().white());
    println!("{}", rule());
    println!(
        "{}",
        "\n⚠️  Move NEAR_PRIVATE_KEY into ~/.occ/.env, then delete the file above".yellow()
    );
    println!(
        "{}",
        format!("Then set NEAR_ACCOUNT_ADDRESS={}", wallet.account_id).bright_black()
    );
}

pub fn print_settings(entries: &[(String, String)]) {
    if entries.is_empty() {
        println!("{}", "No settings configured".yellow());
        return;
    }
    println!("{}", "Configuration".cyan());
    println!("{}", rule());
    for (key, value) in entries {
        let shown = if is_secret_key(key) {
            mask_secret(value)
        } else {
            value.clone()
        };
        println!("{}={}", key.white(), shown.bright_black());
    }
    println!("{}", rule());
}
