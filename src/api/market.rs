use crate::error::{AppError, Result};
use crate::services::sentiment::HEADLINE_LIMIT;
use crate::services::signals::analyze;
use crate::services::watchlist::{self, CATEGORIES};
use crate::types::{
    round_to, BarInterval, OhlcvBar, PriceQuote, SentimentResult, StockAnalysis, WatchlistEntry,
};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Accepted history ranges.
pub const VALID_PERIODS: [&str; 11] = [
    "1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max",
];

/// Accepted bar intervals.
pub const VALID_INTERVALS: [&str; 13] = [
    "1m", "2m", "5m", "15m", "30m", "60m", "90m", "1h", "1d", "5d", "1wk", "1mo", "3mo",
];

/// Query parameters for the analysis endpoint.
#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    #[serde(default = "default_period")]
    pub period: String,
    #[serde(default = "default_interval")]
    pub interval: String,
    #[serde(default = "default_include_sentiment")]
    pub include_sentiment: bool,
}

fn default_period() -> String {
    "1y".to_string()
}

fn default_interval() -> String {
    "1d".to_string()
}

fn default_include_sentiment() -> bool {
    true
}

impl AnalyzeQuery {
    fn validate(&self) -> Result<()> {
        if !VALID_PERIODS.contains(&self.period.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Invalid period '{}'. Use one of: {}",
                self.period,
                VALID_PERIODS.join(", ")
            )));
        }
        if !VALID_INTERVALS.contains(&self.interval.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Invalid interval '{}'. Use one of: {}",
                self.interval,
                VALID_INTERVALS.join(", ")
            )));
        }
        Ok(())
    }
}

/// Sentiment for a ticker.
#[derive(Debug, Serialize)]
pub struct SentimentResponse {
    pub ticker: String,
    #[serde(flatten)]
    pub sentiment: SentimentResult,
}

/// Single watchlist category.
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub category: String,
    pub items: Vec<WatchlistEntry>,
}

fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}

async fn ticker_sentiment(state: &AppState, ticker: &str) -> Result<SentimentResult> {
    let headlines = state.market_data.headlines(ticker, HEADLINE_LIMIT).await?;
    Ok(state.sentiment.score_headlines(&headlines))
}

/// GET /api/market/analyze/:ticker
async fn analyze_stock(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
    Query(query): Query<AnalyzeQuery>,
) -> Result<Json<StockAnalysis>> {
    query.validate()?;
    let ticker = normalize_ticker(&ticker);
    let interval = BarInterval::from_interval(&query.interval);

    let data = state
        .market_data
        .stock_data(&ticker, &query.period, &query.interval)
        .await?;

    let ohlcv: Vec<OhlcvBar> = data
        .bars
        .iter()
        .map(|bar| OhlcvBar::from_bar(bar, interval))
        .collect();

    // The ARIMA fit is CPU-bound.
    let bars = data.bars.clone();
    let forecast_config = state.config.forecast.clone();
    let analysis = tokio::task::spawn_blocking(move || {
        analyze(&bars, interval.is_intraday(), &forecast_config)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Analysis task failed: {}", e)))??;

    let sentiment = if query.include_sentiment {
        match ticker_sentiment(&state, &ticker).await {
            Ok(sentiment) => Some(sentiment),
            Err(e) => {
                warn!("Skipping sentiment for {}: {}", ticker, e);
                None
            }
        }
    } else {
        None
    };

    debug!(
        "Analyzed {} ({} bars): {:?} at {:.0}% confidence",
        data.ticker,
        data.bars.len(),
        analysis.indicators.composite_signal,
        analysis.indicators.confidence * 100.0
    );

    Ok(Json(StockAnalysis {
        current_price: round_to(data.current_price, 2),
        price_change: data.price_change(),
        price_change_pct: data.price_change_pct(),
        ticker: data.ticker,
        company_name: data.company_name,
        ohlcv,
        indicators: analysis.indicators,
        overlays: Some(analysis.overlays),
        sentiment,
        analyzed_at: chrono::Utc::now().to_rfc3339(),
    }))
}

/// GET /api/market/price/:ticker
async fn get_price(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<PriceQuote>> {
    let quote = state.market_data.quote(&ticker).await?;
    Ok(Json(quote))
}

/// GET /api/market/sentiment/:ticker
async fn get_sentiment(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<SentimentResponse>> {
    let ticker = normalize_ticker(&ticker);
    let sentiment = ticker_sentiment(&state, &ticker).await?;
    Ok(Json(SentimentResponse { ticker, sentiment }))
}

/// GET /api/market/watchlist
async fn get_watchlist(
    State(state): State<AppState>,
) -> Json<BTreeMap<&'static str, Vec<WatchlistEntry>>> {
    let lookups = CATEGORIES.iter().map(|(name, items)| {
        let market_data = state.market_data.clone();
        async move { (*name, market_data.watchlist_entries(items).await) }
    });
    Json(join_all(lookups).await.into_iter().collect())
}

/// GET /api/market/watchlist/category/:category
async fn get_watchlist_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<CategoryResponse>> {
    let items = watchlist::category(&category).ok_or_else(|| {
        AppError::NotFound(format!(
            "Category '{}' not found. Use: {}",
            category,
            watchlist::category_names()
        ))
    })?;

    Ok(Json(CategoryResponse {
        category: category.to_lowercase(),
        items: state.market_data.watchlist_entries(items).await,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze/:ticker", get(analyze_stock))
        .route("/price/:ticker", get(get_price))
        .route("/sentiment/:ticker", get(get_sentiment))
        .route("/watchlist", get(get_watchlist))
        .route("/watchlist/category/:category", get(get_watchlist_category))
}
