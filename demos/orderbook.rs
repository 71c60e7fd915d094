// Print the top of a market's order book.
// Run with: cargo run --example orderbook -- USD/BTS 25

use bitshares_market::prelude::*;
use bitshares_market::market::query::DEFAULT_LIMIT;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), MarketError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let spec = args.next().unwrap_or_else(|| "USD/BTS".to_string());
    let limit = args
        .next()
        .and_then(|l| l.parse().ok())
        .unwrap_or(DEFAULT_LIMIT);

    let client = BitsharesClientBuilder::from_env().build()?;
    let market = client.market(&spec).await?;
    let book = market.orderbook(limit).await?;

    let (quote, base) = (&market.quote().symbol, &market.base().symbol);
    println!("{:>18} {:>14} {:>18}", "price", quote, base);
    println!("asks");
    for level in book.asks.iter().rev() {
        println!("{:>18} {:>14} {:>18}", level.price, level.quote, level.base);
    }
    println!("bids");
    for level in &book.bids {
        println!("{:>18} {:>14} {:>18}", level.price, level.quote, level.base);
    }
    if let Some(spread) = book.spread() {
        println!("spread {}", spread);
    }
    Ok(())
}
