//! Fetch the current chain top with the async `EpochClient`.
//!
//! Run:
//! `cargo run --example async_get_top`
//!
//! Optional env vars:
//! - `EPOCH_BASE_URL` (defaults to `http://localhost:3013/v2`)

use epoch_client::EpochClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = std::env::var("EPOCH_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:3013/v2".to_owned());

    let client = EpochClient::new(base_url)?;

    let top = client.get_top().await?;
    println!("top block at height {}:", top.height);
    println!("{top}");
    Ok(())
}
