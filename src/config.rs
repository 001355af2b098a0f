use std::env;
use std::time::Duration;

pub use crate::services::forecast::{ArimaOrder, ForecastConfig, MAX_HORIZON};

/// Origins always allowed alongside the configured frontend.
const LOCAL_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Display name returned by the root endpoint.
    pub app_name: String,
    /// Verbose default logging when `RUST_LOG` is unset.
    pub debug: bool,
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Frontend origin allowed by CORS.
    pub frontend_url: String,
    /// How long price quotes are reused (zero disables caching).
    pub quote_cache_ttl: Duration,
    /// Timeout for upstream market data requests.
    pub http_timeout: Duration,
    /// Forecaster tuning.
    pub forecast: ForecastConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup. Unset or
    /// unparsable values fall back to their defaults.
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |key: &str| var(key).and_then(|v| v.trim().parse::<u64>().ok());
        let defaults = ForecastConfig::default();

        Self {
            app_name: var("APP_NAME").unwrap_or_else(|| "Vantage API".to_string()),
            debug: var("DEBUG")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: var("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(8000),
            frontend_url: var("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            quote_cache_ttl: Duration::from_secs(parse("QUOTE_CACHE_TTL_SECS").unwrap_or(30)),
            http_timeout: Duration::from_secs(parse("HTTP_TIMEOUT_SECS").unwrap_or(30)),
            forecast: ForecastConfig {
                window: parse("FORECAST_WINDOW")
                    .map(|v| v as usize)
                    .filter(|v| *v > 0)
                    .unwrap_or(defaults.window),
                horizon: parse("FORECAST_HORIZON")
                    .map(|v| v.min(MAX_HORIZON as u64) as usize)
                    .unwrap_or(defaults.horizon),
                order: var("ARIMA_ORDER")
                    .and_then(|v| ArimaOrder::parse(&v))
                    .unwrap_or(defaults.order),
                min_points: defaults.min_points,
            },
        }
    }

    /// Log filter used when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "vantage=debug,tower_http=debug"
        } else {
            "vantage=info,tower_http=info"
        }
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Origins allowed by CORS, frontend first, without duplicates.
    pub fn cors_origins(&self) -> Vec<String> {
        let mut origins = vec![self.frontend_url.clone()];
        for origin in LOCAL_ORIGINS {
            if !origins.iter().any(|o| o == origin) {
                origins.push(origin.to_string());
            }
        }
        origins
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_vars(|_| None)
    }
}
