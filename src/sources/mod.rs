//! Upstream market data sources.

pub mod yahoo;

pub use yahoo::{YahooChartData, YahooFinanceClient};
