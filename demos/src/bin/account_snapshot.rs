//! Demo: Account Snapshot
//!
//! Showcases: public market data, signed private calls, envelope errors
//!
//! Reads `KRAKEN_API_KEY` / `KRAKEN_PRIVATE_KEY` from the environment; without
//! them only the public section runs.
//!
//! Run: RUST_LOG=kraken_rest=debug cargo run --bin account_snapshot

use colored::*;
use kraken_rest::{AccountData, KrakenRestClient, MarketData, RestError};
use tracing_subscriber::EnvFilter;

const PAIRS: [&str; 2] = ["XBTUSD", "ETHUSD"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  ACCOUNT SNAPSHOT".cyan().bold());
    println!("{}", "  Kraken REST client demo".cyan());
    println!("{}", "═".repeat(60).cyan());
    println!();

    let client = KrakenRestClient::from_env()?;

    let time = client.server_time().await?;
    let status = client.system_status().await?;
    let when = chrono::DateTime::from_timestamp(time.unixtime as i64, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or(time.rfc1123);
    let status_label = if status.is_online() {
        status.status.green()
    } else {
        status.status.yellow()
    };
    println!("{} Server time {}  status {}", "✓".green(), when, status_label);
    println!();

    let tickers = client.ticker(&PAIRS).await?;
    println!("{}", "  MARKETS".bold());
    let mut names: Vec<_> = tickers.keys().cloned().collect();
    names.sort();
    for name in names {
        let ticker = &tickers[&name];
        println!(
            "  {:<10} {} {:>12}  {} {:>12}  {} {:>8}",
            name,
            "BID".yellow(),
            fmt_opt(ticker.bid_price()),
            "ASK".yellow(),
            fmt_opt(ticker.ask_price()),
            "bps".dimmed(),
            fmt_opt(ticker.spread_bps().map(|b| b.round_dp(2))),
        );
    }
    println!();

    if !client.has_credentials() {
        println!(
            "{} No credentials found, skipping private endpoints",
            "!".yellow()
        );
        return Ok(());
    }

    match client.balance().await {
        Ok(balance) => {
            println!("{}", "  BALANCES".bold());
            let mut assets: Vec<_> = balance.non_zero().into_iter().collect();
            assets.sort_by(|a, b| a.0.cmp(&b.0));
            for (asset, amount) in assets {
                println!("  {:<10} {:>20}", asset, amount);
            }
        }
        Err(e) => report("Balance", &e),
    }
    println!();

    match client.open_orders(false, None).await {
        Ok(orders) => {
            println!("{} {}", "  OPEN ORDERS".bold(), orders.open.len());
            for (txid, order) in &orders.open {
                println!("  {}  {}", txid.dimmed(), order.descr.order);
            }
        }
        Err(e) => report("OpenOrders", &e),
    }

    Ok(())
}

fn fmt_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn report(endpoint: &str, error: &RestError) {
    println!("{} {} failed: {}", "✗".red(), endpoint, error);
    if let Some(failure) = error.api_failure() {
        for parsed in failure.parsed() {
            println!("    {} {:?}", "→".dimmed(), parsed.recovery_strategy());
        }
    }
}
