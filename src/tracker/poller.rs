//! Periodic price refresh for the tracked symbols.
//!
//! The poller runs as a dedicated Tokio task:
//!
//! ```text
//! ┌─────────────────────┐
//! │  Poll task          │
//! │                     │
//! │  Every interval:    │
//! │  1. Fetch prices    │
//! │  2. Post batch  ────┼──> SessionEvent channel ──> SessionController
//! │  3. Wait            │
//! └─────────────────────┘
//! ```
//!
//! Classification against previous prices happens on the controller side
//! when the batch is drained, so the task never touches session state.
//! Both the request and the wait race against the stop signal.

use super::SessionEvent;
use crate::api::MarketData;
use crate::error::PollCycleError;
use crate::state::Symbol;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Handle to a running poll task.
pub struct PricePoller {
    /// Session generation stamped on every batch.
    generation: u64,
    /// Stop signal.
    shutdown_tx: watch::Sender<bool>,
    /// Poll task.
    handle: Option<JoinHandle<()>>,
}

impl PricePoller {
    /// Spawn the poll loop for `symbols`.
    pub fn start(
        client: Arc<dyn MarketData>,
        symbols: Vec<Symbol>,
        interval: Duration,
        generation: u64,
        events_tx: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(
            generation,
            symbols = symbols.len(),
            "Starting price poller every {:?}",
            interval
        );

        let handle = tokio::spawn(poll_loop(
            client,
            symbols,
            interval,
            generation,
            events_tx,
            shutdown_rx,
        ));

        Self {
            generation,
            shutdown_tx,
            handle: Some(handle),
        }
    }

    /// Session generation this poller belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the poll task is still alive.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop polling. The task posts nothing once this returns.
    pub fn stop(&mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!(generation = self.generation, "Price poller stopped");
        }
    }
}

impl Drop for PricePoller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_loop(
    client: Arc<dyn MarketData>,
    symbols: Vec<Symbol>,
    interval: Duration,
    generation: u64,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut cycle: u64 = 0;

    loop {
        cycle += 1;

        let result = tokio::select! {
            biased;
            _ = shutdown_rx.changed() => break,
            result = client.fetch_prices(&symbols) => result,
        };

        // A stop may have landed while the response was being read.
        if *shutdown_rx.borrow() {
            break;
        }

        match result {
            Ok(quotes) => {
                debug!(generation, cycle, quotes = quotes.len(), "Prices fetched");
                let event = SessionEvent::PricesFetched {
                    generation,
                    cycle,
                    quotes,
                };
                if events_tx.send(event).is_err() {
                    debug!(generation, "Session channel closed, stopping poller");
                    break;
                }
            }
            Err(source) => {
                let err = PollCycleError { cycle, source };
                warn!(generation, "{}", err);
            }
        }

        tokio::select! {
            biased;
            _ = shutdown_rx.changed() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    debug!(generation, cycles = cycle, "Poll loop exited");
}
