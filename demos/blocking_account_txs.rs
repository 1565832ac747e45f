//! List an account's transactions with the blocking `BlockingEpochClient`.
//!
//! Run:
//! `cargo run --example blocking_account_txs`
//!
//! Env vars:
//! - `EPOCH_BASE_URL` (defaults to `http://localhost:3013/v2`)
//! - `EPOCH_ACCOUNT` (account public key, required)

use epoch_client::{AccountTxsParams, BlockingEpochClient, TxEncoding};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = std::env::var("EPOCH_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:3013/v2".to_owned());
    let account = std::env::var("EPOCH_ACCOUNT")?;

    let client = BlockingEpochClient::new(base_url)?;

    let params = AccountTxsParams {
        limit: Some(10),
        tx_encoding: Some(TxEncoding::Json),
        tx_types: vec!["spend_tx".to_owned()],
        ..AccountTxsParams::default()
    };

    let txs = client.get_account_transactions(&account, &params)?;
    println!("fetched {} transactions", txs.len());
    for tx in &txs {
        println!("{tx}");
    }
    Ok(())
}
