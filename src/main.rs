use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vantage::config::Config;
use vantage::services::{MarketDataService, SentimentAnalyzer, YahooMarketData};
use vantage::{api, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Arc::new(Config::from_env());

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting {} on {}:{} (forecast {} over {} bars, horizon {})",
        config.app_name,
        config.host,
        config.port,
        config.forecast.order,
        config.forecast.window,
        config.forecast.horizon
    );

    let provider = Arc::new(YahooMarketData::new(config.http_timeout)?);
    let market_data = Arc::new(MarketDataService::new(provider, config.quote_cache_ttl));

    // Periodically drop stale quotes
    if !config.quote_cache_ttl.is_zero() {
        let market_data = market_data.clone();
        let period = config.quote_cache_ttl.max(Duration::from_secs(60));
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                market_data.purge_expired_quotes();
            }
        });
    }

    let state = AppState {
        config: config.clone(),
        market_data,
        sentiment: Arc::new(SentimentAnalyzer::new()),
    };

    let app = api::app(state);

    // Start the server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("{} listening on {}", config.app_name, addr);

    axum::serve(listener, app).await?;

    Ok(())
}
