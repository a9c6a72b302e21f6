use crate::quote::client::QuoteSource;
use crate::quote::request::BatchQuoteRequest;
use crate::ticker::snapshot::{fallback_records, merge_quotes, Snapshot};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;
use tracing::instrument;
use tracing::trace;
use tracing::warn;

/// What a single refresh cycle did to the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Live quotes were published.
    Updated,
    /// The fetch failed and the fallback snapshot was published.
    FellBack,
    /// A newer cycle had already published; this result was dropped.
    Superseded,
    /// The board was closed; nothing was written.
    Discarded,
}

/// Owns the published [`Snapshot`]. Readers take snapshots or subscribe;
/// [`PriceBoard::refresh`] is the only writer.
pub struct PriceBoard {
    source: Arc<dyn QuoteSource>,
    request: BatchQuoteRequest,
    snapshot_tx: watch::Sender<Snapshot>,
    issued_cycles: AtomicU64,
    in_flight: AtomicUsize,
    closed: AtomicBool,
}

impl PriceBoard {
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        let (snapshot_tx, _) = watch::channel(Snapshot::initial());
        Self {
            source,
            request: BatchQuoteRequest::for_catalog(),
            snapshot_tx,
            issued_cycles: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// The receiver is marked changed on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Stops all future writes. Cycles already in flight finish their request
    /// but leave the snapshot untouched.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    #[instrument(skip(self))]
    pub async fn refresh(&self) -> RefreshOutcome {
        if self.is_closed() {
            trace!("Board is closed, not starting a refresh cycle");
            return RefreshOutcome::Discarded;
        }

        let cycle = self.issued_cycles.fetch_add(1, Ordering::SeqCst) + 1;
        self.snapshot_tx.send_modify(|snapshot| {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            snapshot.state.loading = true;
        });

        debug!(
            "Refresh cycle {} fetching quotes for {} assets...",
            cycle,
            self.request.ids.len()
        );

        let (records, error) = match self.source.fetch_quotes(&self.request).await {
            Ok(table) => (merge_quotes(&table), None),
            Err(error) => {
                warn!(
                    "Error fetching quotes in cycle {}: {}, showing demo data",
                    cycle, error
                );
                (fallback_records(), Some(error.to_string()))
            }
        };

        let mut outcome = RefreshOutcome::Discarded;
        self.snapshot_tx.send_if_modified(|snapshot| {
            let remaining = self.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
            if self.is_closed() {
                return false;
            }

            snapshot.state.loading = remaining > 0;
            if cycle <= snapshot.cycle {
                outcome = RefreshOutcome::Superseded;
                return true;
            }

            outcome = if error.is_none() {
                snapshot.state.last_updated_at = Some(Utc::now());
                RefreshOutcome::Updated
            } else {
                RefreshOutcome::FellBack
            };
            snapshot.records = records;
            snapshot.state.error = error;
            snapshot.cycle = cycle;
            true
        });

        match outcome {
            RefreshOutcome::Superseded => {
                trace!("Cycle {} finished after a newer cycle, result dropped", cycle)
            }
            RefreshOutcome::Discarded => {
                trace!("Cycle {} finished after the board was closed", cycle)
            }
            _ => debug!("Cycle {} published: {:?}", cycle, outcome),
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CATALOG;
    use crate::quote::response::PriceQuote;
    use crate::ticker::testing::{full_table, table_with_bitcoin_at, ScriptedSource, Step};
    use tokio::sync::oneshot;

    fn board_with(steps: Vec<Step>) -> (Arc<PriceBoard>, Arc<ScriptedSource>) {
        let source = Arc::new(ScriptedSource::new(steps));
        (Arc::new(PriceBoard::new(source.clone())), source)
    }

    /// The initial snapshot is already `loading`, so only the source can tell
    /// that a spawned cycle has taken its step.
    async fn wait_until_fetching(source: &ScriptedSource, calls: usize) {
        while source.calls() < calls {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_initial_snapshot_is_full_and_loading() {
        let (board, _) = board_with(vec![]);
        let snapshot = board.snapshot();
        assert_eq!(CATALOG.len(), snapshot.records.len());
        assert!(snapshot.state.loading);
        assert_eq!(0, snapshot.cycle);
    }

    #[tokio::test]
    async fn test_successful_refresh_keeps_catalog_order() {
        let (board, _) = board_with(vec![Step::reply(full_table())]);

        assert_eq!(RefreshOutcome::Updated, board.refresh().await);

        let snapshot = board.snapshot();
        let ids: Vec<&str> = snapshot.records.iter().map(|r| r.asset.id).collect();
        let expected: Vec<&str> = CATALOG.iter().map(|a| a.id).collect();
        assert_eq!(expected, ids);
        assert!(!snapshot.state.loading);
        assert_eq!(None, snapshot.state.error);
        assert!(snapshot.state.last_updated_at.is_some());
        assert_eq!(1, snapshot.cycle);
        assert_eq!(101.0, snapshot.records[0].quote.price_usd);
        assert_eq!(106.0, snapshot.records[5].quote.price_usd);
    }

    #[tokio::test]
    async fn test_omitted_id_defaults_to_zero() {
        let mut table = full_table();
        table.remove("cardano");
        let (board, _) = board_with(vec![Step::reply(table)]);

        board.refresh().await;

        let records = board.snapshot().records;
        assert_eq!(6, records.len());
        assert_eq!("cardano", records[3].asset.id);
        assert_eq!(PriceQuote::ZERO, records[3].quote);
    }

    #[tokio::test]
    async fn test_transport_error_falls_back() {
        let (board, _) = board_with(vec![Step::transport_error()]);

        assert_eq!(RefreshOutcome::FellBack, board.refresh().await);

        let snapshot = board.snapshot();
        assert_eq!(fallback_records(), snapshot.records);
        assert!(!snapshot.state.loading);
        assert!(snapshot
            .state
            .error
            .as_deref()
            .is_some_and(|e| e.starts_with("HTTP Request Error")));
        assert_eq!(None, snapshot.state.last_updated_at);
    }

    #[tokio::test]
    async fn test_bad_status_falls_back_and_recovers() {
        let (board, _) = board_with(vec![
            Step::status(reqwest::StatusCode::SERVICE_UNAVAILABLE),
            Step::reply(full_table()),
        ]);

        assert_eq!(RefreshOutcome::FellBack, board.refresh().await);
        let failed = board.snapshot();
        assert!(failed.state.error.is_some());
        assert_eq!(6, failed.records.len());
        assert!(!failed.state.loading);

        assert_eq!(RefreshOutcome::Updated, board.refresh().await);
        let recovered = board.snapshot();
        assert_eq!(None, recovered.state.error);
        assert_eq!(101.0, recovered.records[0].quote.price_usd);
    }

    #[tokio::test]
    async fn test_identical_responses_give_identical_records() {
        let (board, _) = board_with(vec![Step::reply(full_table()), Step::reply(full_table())]);

        board.refresh().await;
        let first = board.snapshot().records;
        board.refresh().await;
        let second = board.snapshot().records;

        assert_eq!(first, second);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.quote.price_usd.to_bits(), b.quote.price_usd.to_bits());
            assert_eq!(a.quote.change_24h_pct.to_bits(), b.quote.change_24h_pct.to_bits());
        }
    }

    #[tokio::test]
    async fn test_stale_cycle_does_not_overwrite_newer_one() {
        let (release_tx, release_rx) = oneshot::channel();
        let (board, source) = board_with(vec![
            Step::gated(release_rx, table_with_bitcoin_at(1.0)),
            Step::reply(table_with_bitcoin_at(2.0)),
        ]);

        let stale = tokio::spawn({
            let board = board.clone();
            async move { board.refresh().await }
        });
        wait_until_fetching(&source, 1).await;

        assert_eq!(RefreshOutcome::Updated, board.refresh().await);
        assert!(board.snapshot().state.loading);

        release_tx.send(()).unwrap();
        assert_eq!(RefreshOutcome::Superseded, stale.await.unwrap());

        let snapshot = board.snapshot();
        assert_eq!(2.0, snapshot.records[0].quote.price_usd);
        assert_eq!(2, snapshot.cycle);
        assert!(!snapshot.state.loading);
    }

    #[tokio::test]
    async fn test_closed_board_writes_nothing() {
        let (release_tx, release_rx) = oneshot::channel();
        let (board, source) =
            board_with(vec![Step::gated(release_rx, table_with_bitcoin_at(1.0))]);
        let mut updates = board.subscribe();

        let in_flight = tokio::spawn({
            let board = board.clone();
            async move { board.refresh().await }
        });
        wait_until_fetching(&source, 1).await;
        updates.borrow_and_update();

        board.close();
        release_tx.send(()).unwrap();
        assert_eq!(RefreshOutcome::Discarded, in_flight.await.unwrap());
        assert!(!updates.has_changed().unwrap());
        assert_eq!(0, board.snapshot().cycle);

        assert_eq!(RefreshOutcome::Discarded, board.refresh().await);
        assert_eq!(1, source.calls());
    }

    #[tokio::test]
    async fn test_subscribers_see_published_snapshots() {
        let (board, _) = board_with(vec![Step::reply(full_table())]);
        let mut updates = board.subscribe();
        updates.borrow_and_update();

        board.refresh().await;

        assert!(updates.has_changed().unwrap());
        let seen = updates.borrow_and_update().clone();
        assert_eq!(1, seen.cycle);
        assert_eq!(board.snapshot(), seen);
    }
}
