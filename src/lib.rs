//! Vantage - technical analysis and short-horizon forecasting for stocks and crypto

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use config::Config;
use services::{MarketDataService, SentimentAnalyzer};
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub market_data: Arc<MarketDataService>,
    pub sentiment: Arc<SentimentAnalyzer>,
}

// Re-export commonly used types
pub use error::{AnalysisError, AppError};
pub use types::*;
