use crate::ticker::board::PriceBoard;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;
use tracing::info;
use tracing::instrument;
use tracing::warn;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Returned by [`start`]. Call [`TickerHandle::stop`] to tear the ticker down;
/// dropping the handle also ends the timer loop but leaves the board open.
pub struct TickerHandle {
    board: Arc<PriceBoard>,
    stop_signal_send: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl TickerHandle {
    pub fn board(&self) -> &Arc<PriceBoard> {
        &self.board
    }

    /// Cancels the timer and closes the board. Returns once the timer loop
    /// has exited; a request already in flight is left to finish on its own
    /// and its result is dropped.
    pub async fn stop(self) {
        info!("Stopping price ticker...");
        self.board.close();

        if self.stop_signal_send.send(()).is_err() {
            warn!("Price ticker loop was already gone");
        }

        if let Err(e) = self.task.await {
            warn!("Price ticker loop ended abnormally: {}", e);
        }

        info!("Price ticker stopped");
    }
}

/// Runs one refresh cycle right away and then one per `interval`.
///
/// Must be called from within a tokio runtime.
pub fn start(board: Arc<PriceBoard>, interval: Duration) -> TickerHandle {
    let interval = if interval.is_zero() {
        warn!(
            "Refresh interval must be positive, using {:?} instead",
            DEFAULT_REFRESH_INTERVAL
        );
        DEFAULT_REFRESH_INTERVAL
    } else {
        interval
    };

    let (stop_signal_send, stop_signal_recv) = oneshot::channel();
    let task = tokio::spawn(run_periodic_refresh_loop(
        board.clone(),
        interval,
        stop_signal_recv,
    ));

    info!("Price ticker started, refreshing every {:?}", interval);

    TickerHandle {
        board,
        stop_signal_send,
        task,
    }
}

#[instrument(skip_all, fields(interval_secs = interval.as_secs()))]
async fn run_periodic_refresh_loop(
    board: Arc<PriceBoard>,
    interval: Duration,
    mut stop_signal_recv: oneshot::Receiver<()>,
) {
    let mut timer = tokio::time::interval(interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            signal = &mut stop_signal_recv => {
                match signal {
                    Ok(()) => info!("Stop signal received, quit loop"),
                    Err(_) => info!("Ticker handle dropped, quit loop"),
                }
                break;
            }
            _ = timer.tick() => {}
        }

        debug!("Timer ticked, starting refresh cycle...");

        // Each cycle gets its own task so a hung request never holds up the
        // next tick. The board drops results that arrive out of order.
        let board = board.clone();
        tokio::spawn(async move {
            board.refresh().await;
        });
    }
}
