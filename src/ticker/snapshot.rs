use crate::catalog::{AssetDescriptor, CATALOG, CATALOG_LEN};
use crate::quote::response::{PriceQuote, QuoteTable};
use chrono::{DateTime, Local, Utc};
use std::sync::Arc;

/// Demo numbers shown whenever a refresh fails, in catalog order.
pub const FALLBACK_QUOTES: [PriceQuote; CATALOG_LEN] = [
    demo_quote(67842.0, 2.47),
    demo_quote(3547.0, 1.83),
    demo_quote(178.0, 4.21),
    demo_quote(0.47, 0.93),
    demo_quote(14.82, 3.15),
    demo_quote(28.91, 2.67),
];

const fn demo_quote(price_usd: f64, change_24h_pct: f64) -> PriceQuote {
    PriceQuote {
        price_usd,
        change_24h_pct,
        market_cap_usd: 0.0,
        volume_24h_usd: 0.0,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    pub fn arrow(self) -> &'static str {
        match self {
            Trend::Up => "▲",
            Trend::Down => "▼",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayRecord {
    pub asset: AssetDescriptor,
    pub quote: PriceQuote,
}

impl DisplayRecord {
    pub fn trend(&self) -> Trend {
        if self.quote.change_24h_pct >= 0.0 {
            Trend::Up
        } else {
            Trend::Down
        }
    }

    /// Zero market cap means "unknown" and is not worth showing.
    pub fn has_market_cap(&self) -> bool {
        self.quote.market_cap_usd != 0.0
    }
}

pub type DisplayRecords = Arc<[DisplayRecord; CATALOG_LEN]>;

/// Walks the catalog, never the table, so order and length come from the
/// catalog no matter what the source returned.
pub fn merge_quotes(table: &QuoteTable) -> DisplayRecords {
    Arc::new(CATALOG.map(|asset| DisplayRecord {
        asset,
        quote: table.get(asset.id).copied().unwrap_or(PriceQuote::ZERO),
    }))
}

pub fn fallback_records() -> DisplayRecords {
    Arc::new(std::array::from_fn(|i| DisplayRecord {
        asset: CATALOG[i],
        quote: FALLBACK_QUOTES[i],
    }))
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RefreshState {
    pub loading: bool,
    pub error: Option<String>,
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl RefreshState {
    pub fn status_line(&self) -> String {
        if self.loading {
            return "Updating...".to_string();
        }

        match self.last_updated_at {
            Some(at) => format!(
                "Last updated: {}",
                at.with_timezone(&Local).format("%-I:%M:%S %p")
            ),
            None => "Real-time data".to_string(),
        }
    }

    pub fn error_banner(&self) -> Option<String> {
        self.error
            .as_ref()
            .map(|error| format!("API Error: {}. Showing demo data.", error))
    }
}

/// Everything a reader needs, published as one unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub records: DisplayRecords,
    pub state: RefreshState,
    /// Sequence number of the refresh cycle that produced `records`, 0 before
    /// any cycle has been published.
    pub cycle: u64,
}

impl Snapshot {
    pub fn initial() -> Self {
        Self {
            records: fallback_records(),
            state: RefreshState {
                loading: true,
                ..RefreshState::default()
            },
            cycle: 0,
        }
    }
}
