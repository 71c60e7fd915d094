// Print the ticker and 24h volume of a market.
// Run with: cargo run --example ticker -- USD/BTS

use bitshares_market::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), MarketError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let spec = std::env::args().nth(1).unwrap_or_else(|| "USD/BTS".to_string());
    let client = BitsharesClientBuilder::from_env().build()?;
    let market = client.market(&spec).await?;

    let ticker = market.ticker().await?;
    println!("{}", market);
    println!("  latest:       {}", ticker.latest);
    println!("  highest bid:  {}", ticker.highest_bid);
    println!("  lowest ask:   {}", ticker.lowest_ask);
    println!("  change (24h): {}%", ticker.percent_change);
    if let Some(price) = ticker.quote_settlement_price {
        println!("  settlement:   {}", price);
    }

    let volume = market.volume24h().await?;
    for (symbol, amount) in &volume.volumes {
        println!("  volume {:<6} {}", symbol, amount);
    }
    Ok(())
}
