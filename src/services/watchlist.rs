//! Curated tickers shown on the dashboard, grouped by category.

/// A watchlist ticker and its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchlistItem {
    pub ticker: &'static str,
    pub name: &'static str,
}

const fn item(ticker: &'static str, name: &'static str) -> WatchlistItem {
    WatchlistItem { ticker, name }
}

const STOCKS: &[WatchlistItem] = &[
    item("AAPL", "Apple"),
    item("MSFT", "Microsoft"),
    item("GOOGL", "Alphabet"),
    item("AMZN", "Amazon"),
    item("TSLA", "Tesla"),
    item("NVDA", "NVIDIA"),
    item("META", "Meta"),
    item("NFLX", "Netflix"),
    item("AMD", "AMD"),
    item("DIS", "Disney"),
];

const CRYPTO: &[WatchlistItem] = &[
    item("BTC-USD", "Bitcoin"),
    item("ETH-USD", "Ethereum"),
    item("SOL-USD", "Solana"),
    item("BNB-USD", "BNB"),
    item("XRP-USD", "XRP"),
    item("ADA-USD", "Cardano"),
    item("DOGE-USD", "Dogecoin"),
    item("AVAX-USD", "Avalanche"),
    item("DOT-USD", "Polkadot"),
    item("MATIC-USD", "Polygon"),
];

const TOKENS: &[WatchlistItem] = &[
    item("LINK-USD", "Chainlink"),
    item("UNI-USD", "Uniswap"),
    item("AAVE-USD", "Aave"),
    item("MKR-USD", "Maker"),
    item("CRV-USD", "Curve"),
    item("LDO-USD", "Lido DAO"),
    item("ARB-USD", "Arbitrum"),
    item("OP-USD", "Optimism"),
    item("GRT-USD", "The Graph"),
    item("SNX-USD", "Synthetix"),
];

/// Categories in display order.
pub const CATEGORIES: &[(&str, &[WatchlistItem])] =
    &[("stocks", STOCKS), ("crypto", CRYPTO), ("tokens", TOKENS)];

/// Items of a category, matched case-insensitively.
pub fn category(name: &str) -> Option<&'static [WatchlistItem]> {
    CATEGORIES
        .iter()
        .find(|(category, _)| category.eq_ignore_ascii_case(name))
        .map(|(_, items)| *items)
}

/// Comma-separated category names, for error messages.
pub fn category_names() -> String {
    CATEGORIES
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}
