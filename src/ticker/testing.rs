//! In-memory quote sources for board and scheduler tests.

use crate::catalog::CATALOG;
use crate::quote::client::QuoteSource;
use crate::quote::error::QuoteRequestError;
use crate::quote::request::BatchQuoteRequest;
use crate::quote::response::{PriceQuote, QuoteTable};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

pub enum Step {
    Reply {
        gate: Option<oneshot::Receiver<()>>,
        table: QuoteTable,
    },
    Status(reqwest::StatusCode),
    TransportError,
}

impl Step {
    pub fn reply(table: QuoteTable) -> Self {
        Step::Reply { gate: None, table }
    }

    /// Replies only once `gate` fires.
    pub fn gated(gate: oneshot::Receiver<()>, table: QuoteTable) -> Self {
        Step::Reply {
            gate: Some(gate),
            table,
        }
    }

    pub fn status(status: reqwest::StatusCode) -> Self {
        Step::Status(status)
    }

    pub fn transport_error() -> Self {
        Step::TransportError
    }
}

/// Plays back `steps` one per call; once they run out every call returns
/// [`full_table`].
pub struct ScriptedSource {
    steps: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteSource for ScriptedSource {
    async fn fetch_quotes(&self, _req: &BatchQuoteRequest) -> Result<QuoteTable, QuoteRequestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().unwrap().pop_front();

        match step {
            Some(Step::Reply { gate, table }) => {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                Ok(table)
            }
            Some(Step::Status(status)) => Err(QuoteRequestError::HttpStatus(status)),
            Some(Step::TransportError) => Err(transport_error()),
            None => Ok(full_table()),
        }
    }
}

/// A real `reqwest::Error`, produced without touching the network.
fn transport_error() -> QuoteRequestError {
    match reqwest::Client::new().get("not a url").build() {
        Ok(_) => QuoteRequestError::Other("expected an invalid url".to_string()),
        Err(err) => err.into(),
    }
}

/// Every catalog asset, priced 101, 102, ... in catalog order.
pub fn full_table() -> QuoteTable {
    CATALOG
        .iter()
        .enumerate()
        .map(|(i, asset)| {
            let n = (i + 1) as f64;
            (
                asset.id.to_string(),
                PriceQuote {
                    price_usd: 100.0 + n,
                    change_24h_pct: n - 3.5,
                    market_cap_usd: n * 1e9,
                    volume_24h_usd: n * 1e8,
                },
            )
        })
        .collect()
}

pub fn table_with_bitcoin_at(price_usd: f64) -> QuoteTable {
    let mut table = full_table();
    table.insert(
        "bitcoin".to_string(),
        PriceQuote {
            price_usd,
            ..PriceQuote::ZERO
        },
    );
    table
}
