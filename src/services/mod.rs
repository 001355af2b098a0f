pub mod cache;
pub mod forecast;
pub mod market_data;
pub mod sentiment;
pub mod signals;
pub mod watchlist;

pub use cache::QuoteCache;
pub use forecast::{ArimaOrder, ForecastConfig};
pub use market_data::{MarketDataProvider, MarketDataService, YahooMarketData};
pub use sentiment::SentimentAnalyzer;
pub use signals::{analyze, calculate_indicators, calculate_overlays, Analysis};
