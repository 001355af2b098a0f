//! Market data access for the HTTP layer.
//!
//! Providers fetch price history and headlines; `MarketDataService` adds
//! quote caching and concurrent watchlist lookups on top.

use futures_util::future::join_all;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::services::cache::QuoteCache;
use crate::services::watchlist::WatchlistItem;
use crate::sources::{YahooChartData, YahooFinanceClient};
use crate::types::{PriceQuote, StockData, WatchlistEntry};

/// Period and interval used for price snapshots.
const QUOTE_PERIOD: &str = "5d";
const QUOTE_INTERVAL: &str = "1d";

/// Source of price history and news headlines.
pub trait MarketDataProvider: Send + Sync {
    /// Price history plus company metadata.
    fn stock_data<'a>(
        &'a self,
        ticker: &'a str,
        period: &'a str,
        interval: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<StockData>> + Send + 'a>>;

    /// Recent news headlines, newest first.
    fn headlines<'a>(
        &'a self,
        ticker: &'a str,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>>> + Send + 'a>>;
}

/// Yahoo Finance backed provider.
pub struct YahooMarketData {
    client: YahooFinanceClient,
}

impl YahooMarketData {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: YahooFinanceClient::new(timeout)?,
        })
    }
}

/// Company name, current price and previous close from a chart response.
///
/// Falls back to the last close for the price and the second-to-last close
/// for the previous close when the quote metadata is missing.
pub fn stock_data_from_chart(ticker: &str, chart: YahooChartData) -> StockData {
    let ticker = ticker.trim().to_uppercase();
    let closes: Vec<f64> = chart.bars.iter().map(|b| b.close).collect();

    let current_price = chart
        .regular_market_price
        .or_else(|| closes.last().copied())
        .unwrap_or(0.0);
    let previous_close = chart
        .previous_close
        .or_else(|| closes.len().checked_sub(2).map(|i| closes[i]))
        .unwrap_or(0.0);
    let company_name = chart
        .short_name
        .or(chart.long_name)
        .unwrap_or_else(|| ticker.clone());

    StockData {
        ticker,
        company_name,
        current_price,
        previous_close,
        bars: chart.bars,
    }
}

impl MarketDataProvider for YahooMarketData {
    fn stock_data<'a>(
        &'a self,
        ticker: &'a str,
        period: &'a str,
        interval: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<StockData>> + Send + 'a>> {
        Box::pin(async move {
            let chart = self.client.get_chart(ticker, period, interval).await?;
            Ok(stock_data_from_chart(ticker, chart))
        })
    }

    fn headlines<'a>(
        &'a self,
        ticker: &'a str,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>>> + Send + 'a>> {
        Box::pin(async move { self.client.get_headlines(ticker, limit).await })
    }
}

/// Market data with cached quotes.
pub struct MarketDataService {
    provider: Arc<dyn MarketDataProvider>,
    quotes: QuoteCache<PriceQuote>,
}

impl MarketDataService {
    pub fn new(provider: Arc<dyn MarketDataProvider>, quote_ttl: Duration) -> Self {
        Self {
            provider,
            quotes: QuoteCache::new(quote_ttl),
        }
    }

    /// Price history for analysis. Never cached.
    pub async fn stock_data(&self, ticker: &str, period: &str, interval: &str) -> Result<StockData> {
        debug!("Fetching {} history (period={}, interval={})", ticker, period, interval);
        self.provider.stock_data(ticker, period, interval).await
    }

    pub async fn headlines(&self, ticker: &str, limit: usize) -> Result<Vec<String>> {
        self.provider.headlines(ticker, limit).await
    }

    /// Current price snapshot, served from cache while fresh.
    pub async fn quote(&self, ticker: &str) -> Result<PriceQuote> {
        let key = ticker.trim().to_uppercase();
        self.quotes
            .get_or_try_insert_with(&key, || async {
                let data = self
                    .provider
                    .stock_data(&key, QUOTE_PERIOD, QUOTE_INTERVAL)
                    .await?;
                Ok::<_, AppError>(PriceQuote::from_stock_data(&data))
            })
            .await
    }

    /// Quotes for every item, fetched concurrently. Failed lookups become
    /// rows with null prices.
    pub async fn watchlist_entries(&self, items: &[WatchlistItem]) -> Vec<WatchlistEntry> {
        let lookups = items.iter().map(|item| async move {
            match self.quote(item.ticker).await {
                Ok(quote) => WatchlistEntry::from_quote(item.ticker, item.name, &quote),
                Err(e) => {
                    warn!("Watchlist quote for {} failed: {}", item.ticker, e);
                    WatchlistEntry::unavailable(item.ticker, item.name)
                }
            }
        });
        join_all(lookups).await
    }

    /// Drop expired quotes.
    pub fn purge_expired_quotes(&self) {
        self.quotes.purge_expired();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bar;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                time: 1_704_067_200 + i as i64 * 86_400,
                open: close,
                high: close,
                low: close,
                close,
                volume: 10.0,
            })
            .collect()
    }

    fn chart(closes: &[f64]) -> YahooChartData {
        YahooChartData {
            symbol: "AAPL".to_string(),
            short_name: None,
            long_name: None,
            regular_market_price: None,
            previous_close: None,
            bars: bars(closes),
        }
    }

    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl MarketDataProvider for CountingProvider {
        fn stock_data<'a>(
            &'a self,
            ticker: &'a str,
            _period: &'a str,
            _interval: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<StockData>> + Send + 'a>> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                if ticker == "FAIL-USD" {
                    return Err(AppError::ExternalApi("upstream down".to_string()));
                }
                Ok(StockData {
                    ticker: ticker.to_string(),
                    company_name: ticker.to_string(),
                    current_price: 110.0,
                    previous_close: 100.0,
                    bars: bars(&[100.0, 110.0]),
                })
            })
        }

        fn headlines<'a>(
            &'a self,
            _ticker: &'a str,
            _limit: usize,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<String>>> + Send + 'a>> {
            Box::pin(async { Ok(Vec::new()) })
        }
    }

    // =========================================================================
    // Chart Conversion Tests
    // =========================================================================

    #[test]
    fn test_stock_data_from_chart_prefers_metadata() {
        let mut data = chart(&[100.0, 101.0, 102.0]);
        data.short_name = Some("Apple Inc.".to_string());
        data.long_name = Some("Apple Incorporated".to_string());
        data.regular_market_price = Some(103.0);
        data.previous_close = Some(102.5);

        let stock = stock_data_from_chart("aapl", data);
        assert_eq!(stock.ticker, "AAPL");
        assert_eq!(stock.company_name, "Apple Inc.");
        assert_eq!(stock.current_price, 103.0);
        assert_eq!(stock.previous_close, 102.5);
    }

    #[test]
    fn test_stock_data_from_chart_fallbacks() {
        let stock = stock_data_from_chart("msft", chart(&[100.0, 101.0, 102.0]));
        assert_eq!(stock.company_name, "MSFT");
        assert_eq!(stock.current_price, 102.0);
        assert_eq!(stock.previous_close, 101.0);

        let single = stock_data_from_chart("msft", chart(&[100.0]));
        assert_eq!(single.previous_close, 0.0);
    }

    // =========================================================================
    // Service Tests
    // =========================================================================

    #[tokio::test]
    async fn test_quote_is_cached() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let service = MarketDataService::new(provider.clone(), Duration::from_secs(60));

        let first = service.quote("aapl").await.unwrap();
        let second = service.quote("AAPL").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.ticker, "AAPL");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_watchlist_entries_null_on_failure() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let service = MarketDataService::new(provider, Duration::from_secs(60));
        let items = [
            WatchlistItem {
                ticker: "BTC-USD",
                name: "Bitcoin",
            },
            WatchlistItem {
                ticker: "FAIL-USD",
                name: "Broken",
            },
        ];

        let entries = service.watchlist_entries(&items).await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].price, Some(110.0));
        assert_eq!(entries[0].change_pct, Some(10.0));
        assert_eq!(entries[1], WatchlistEntry::unavailable("FAIL-USD", "Broken"));
    }
}
