//! Session controller - owns session state and drives phase transitions.

use super::{Phase, PricePoller, SessionEvent, SessionListener};
use crate::api::MarketData;
use crate::config::TrackerConfig;
use crate::error::{Error, Rejection, Result};
use crate::state::{
    Catalog, CatalogState, CatalogStatus, PriceObservation, PriceQuote, PriceUpdate, Selection,
    Symbol, ToggleOutcome,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Phase-specific session data.
enum SessionPhase {
    Selecting { selection: Selection },
    Tracking(TrackingSession),
}

/// Data that only exists while prices are being tracked.
struct TrackingSession {
    /// Snapshot of the confirmed selection.
    selection: Selection,
    /// Last seen price per symbol.
    observation: PriceObservation,
    /// Running poll task.
    poller: PricePoller,
    /// Highest cycle applied so far.
    last_cycle: u64,
}

/// Orchestrates catalog loading, selection and price tracking.
pub struct SessionController<L: SessionListener> {
    /// Exchange client shared with background tasks.
    client: Arc<dyn MarketData>,
    /// Tracker configuration.
    config: TrackerConfig,
    /// Presentation callbacks.
    listener: L,
    /// Sender handed to background tasks.
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    /// Catalog and its loading status.
    catalog: CatalogState,
    /// Current search query.
    search_query: String,
    /// Catalog entries matching the search query.
    visible: Vec<Symbol>,
    /// Current phase.
    phase: SessionPhase,
    /// Generation handed to the last started poller.
    last_generation: u64,
    /// In-flight catalog fetch.
    catalog_task: Option<JoinHandle<()>>,
}

impl<L: SessionListener> SessionController<L> {
    /// Create a controller in the `Selecting` phase with nothing loaded.
    pub fn new(
        client: Arc<dyn MarketData>,
        config: TrackerConfig,
        listener: L,
        events_tx: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        Self {
            client,
            config,
            listener,
            events_tx,
            catalog: CatalogState::default(),
            search_query: String::new(),
            visible: Vec::new(),
            phase: SessionPhase::Selecting {
                selection: Selection::new(),
            },
            last_generation: 0,
            catalog_task: None,
        }
    }

    /// Begin loading the catalog.
    pub fn start(&mut self) {
        self.spawn_catalog_fetch();
    }

    /// Fetch the catalog again after a failure.
    ///
    /// Returns `false` if a fetch is already running or the catalog is loaded.
    pub fn retry_catalog(&mut self) -> bool {
        match self.catalog.status {
            CatalogStatus::Pending | CatalogStatus::Failed(_) => {
                self.spawn_catalog_fetch();
                true
            }
            CatalogStatus::Loading => {
                debug!("Catalog fetch already in flight");
                false
            }
            CatalogStatus::Ready(_) => {
                debug!("Catalog already loaded, retry ignored");
                false
            }
        }
    }

    fn spawn_catalog_fetch(&mut self) {
        self.catalog.set_loading();

        let client = Arc::clone(&self.client);
        let events_tx = self.events_tx.clone();
        info!("Fetching symbol catalog");

        self.catalog_task = Some(tokio::spawn(async move {
            let result = client.fetch_catalog().await;
            if events_tx.send(SessionEvent::CatalogLoaded(result)).is_err() {
                debug!("Session channel closed before catalog arrived");
            }
        }));
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        match self.phase {
            SessionPhase::Selecting { .. } => Phase::Selecting,
            SessionPhase::Tracking(_) => Phase::Tracking,
        }
    }

    /// Whether prices are being tracked.
    pub fn is_tracking(&self) -> bool {
        self.phase() == Phase::Tracking
    }

    /// Catalog loading state.
    pub fn catalog_state(&self) -> &CatalogState {
        &self.catalog
    }

    /// Loaded catalog, if any.
    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.catalog()
    }

    /// Current search query.
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Catalog entries matching the search query, sorted.
    pub fn visible(&self) -> &[Symbol] {
        &self.visible
    }

    /// Selected symbols; the confirmed snapshot while tracking.
    pub fn selection(&self) -> &Selection {
        match &self.phase {
            SessionPhase::Selecting { selection } => selection,
            SessionPhase::Tracking(session) => &session.selection,
        }
    }

    /// Price observations of the running tracking session.
    pub fn observation(&self) -> Option<&PriceObservation> {
        match &self.phase {
            SessionPhase::Tracking(session) => Some(&session.observation),
            SessionPhase::Selecting { .. } => None,
        }
    }

    /// Generation of the running tracking session.
    pub fn generation(&self) -> Option<u64> {
        match &self.phase {
            SessionPhase::Tracking(session) => Some(session.poller.generation()),
            SessionPhase::Selecting { .. } => None,
        }
    }

    /// Presentation listener.
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Mutable presentation listener.
    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Replace the search query and recompute the visible set.
    pub fn set_search_query(&mut self, text: impl Into<String>) {
        self.search_query = text.into();
        self.refresh_visible();
    }

    fn refresh_visible(&mut self) {
        self.visible = self
            .catalog
            .catalog()
            .map(|c| c.filter(&self.search_query))
            .unwrap_or_default();
    }

    /// Select `symbol`, or deselect it if it is already selected.
    pub fn toggle_selection(&mut self, symbol: &str) -> Result<ToggleOutcome> {
        let SessionPhase::Selecting { selection } = &mut self.phase else {
            return Err(Error::invalid_input("selection is locked while tracking"));
        };

        let outcome = if selection.contains(symbol) {
            selection.toggle_off(symbol);
            ToggleOutcome::Accepted
        } else if !self.catalog.catalog().is_some_and(|c| c.contains(symbol)) {
            ToggleOutcome::Rejected(Rejection::NotListed)
        } else {
            selection.toggle_on(symbol)
        };
        let count = selection.count();

        match outcome {
            ToggleOutcome::Accepted => self.listener.on_selection_changed(count),
            ToggleOutcome::Rejected(reason) => debug!(symbol, %reason, "Toggle rejected"),
        }
        Ok(outcome)
    }

    /// Switch to `Tracking` and start polling the current selection.
    pub fn confirm(&mut self) -> Result<()> {
        let selection = match &mut self.phase {
            SessionPhase::Selecting { selection } if !selection.is_empty() => {
                std::mem::take(selection)
            }
            SessionPhase::Selecting { .. } => {
                return Err(Error::invalid_input("select at least one symbol first"));
            }
            SessionPhase::Tracking(_) => {
                return Err(Error::invalid_input("already tracking"));
            }
        };

        self.last_generation += 1;
        let generation = self.last_generation;
        let symbols = selection.symbols().to_vec();

        let poller = PricePoller::start(
            Arc::clone(&self.client),
            symbols.clone(),
            self.config.poll_interval(),
            generation,
            self.events_tx.clone(),
        );

        self.phase = SessionPhase::Tracking(TrackingSession {
            selection,
            observation: PriceObservation::new(),
            poller,
            last_cycle: 0,
        });

        info!(generation, "Tracking {} symbols", symbols.len());
        self.listener.on_tracking_started(&symbols);
        Ok(())
    }

    /// Stop tracking and return to a fresh selection screen.
    ///
    /// Returns `false` if the session was not tracking.
    pub fn go_back(&mut self) -> bool {
        let fresh = SessionPhase::Selecting {
            selection: Selection::new(),
        };

        match std::mem::replace(&mut self.phase, fresh) {
            SessionPhase::Tracking(mut session) => {
                let was_running = session.poller.is_running();
                session.poller.stop();
                info!(
                    generation = session.poller.generation(),
                    was_running,
                    observed = session.observation.len(),
                    "Tracking stopped"
                );
            }
            selecting => {
                self.phase = selecting;
                debug!("Back requested while not tracking");
                return false;
            }
        }

        self.search_query.clear();
        self.refresh_visible();

        self.listener.on_tracking_stopped();
        self.listener.on_selection_changed(0);

        if let Some(catalog) = self.catalog.catalog() {
            self.listener.on_catalog_ready(catalog);
        } else if !self.catalog.is_loading() {
            self.spawn_catalog_fetch();
        }
        true
    }

    /// Apply a result posted by a background task.
    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::CatalogLoaded(result) => self.apply_catalog(result),
            SessionEvent::PricesFetched {
                generation,
                cycle,
                quotes,
            } => self.apply_prices(generation, cycle, quotes),
        }
    }

    /// Apply every event currently queued on `rx`.
    pub fn drain_events(&mut self, rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> usize {
        let mut applied = 0;
        while let Ok(event) = rx.try_recv() {
            self.handle_event(event);
            applied += 1;
        }
        applied
    }

    fn apply_catalog(&mut self, result: std::result::Result<Catalog, crate::error::FetchError>) {
        self.catalog_task = None;

        match result {
            Ok(catalog) => {
                info!("Catalog loaded with {} symbols", catalog.len());
                self.catalog.set_ready(catalog);
                self.refresh_visible();
                if let Some(catalog) = self.catalog.catalog() {
                    self.listener.on_catalog_ready(catalog);
                }
            }
            Err(e) => {
                error!("Catalog fetch failed: {}", e);
                let message = e.to_string();
                self.catalog.set_failed(message.clone());
                self.refresh_visible();
                self.listener.on_catalog_error(&message);
            }
        }
    }

    fn apply_prices(&mut self, generation: u64, cycle: u64, quotes: Vec<PriceQuote>) {
        let SessionPhase::Tracking(session) = &mut self.phase else {
            debug!(generation, cycle, "Discarding price batch outside tracking");
            return;
        };

        if session.poller.generation() != generation {
            debug!(generation, cycle, "Discarding price batch from a stopped session");
            return;
        }
        if cycle <= session.last_cycle {
            warn!(
                generation,
                cycle,
                last_cycle = session.last_cycle,
                "Discarding out-of-order price batch"
            );
            return;
        }
        session.last_cycle = cycle;

        for quote in quotes {
            if !session.selection.contains(&quote.symbol) {
                debug!(symbol = %quote.symbol, "Ignoring quote for unselected symbol");
                continue;
            }
            let direction = session.observation.observe(&quote.symbol, quote.price);
            let update = PriceUpdate::new(quote.symbol, quote.price, direction);
            self.listener.on_price_update(&update);
        }
    }
}

impl<L: SessionListener> Drop for SessionController<L> {
    fn drop(&mut self) {
        if let Some(task) = self.catalog_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketData;
    use crate::error::FetchError;
    use crate::state::{Direction, MAX_SELECTION};
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_test::{assert_err, assert_ok};

    #[derive(Debug, Default)]
    struct RecordingListener {
        catalog_ready: Vec<usize>,
        catalog_errors: Vec<String>,
        selection_counts: Vec<usize>,
        updates: Vec<(Symbol, String, Direction)>,
        tracking_started: Vec<Vec<Symbol>>,
        tracking_stopped: usize,
    }

    impl SessionListener for RecordingListener {
        fn on_catalog_ready(&mut self, catalog: &Catalog) {
            self.catalog_ready.push(catalog.len());
        }

        fn on_catalog_error(&mut self, message: &str) {
            self.catalog_errors.push(message.to_string());
        }

        fn on_selection_changed(&mut self, count: usize) {
            self.selection_counts.push(count);
        }

        fn on_price_update(&mut self, update: &PriceUpdate) {
            self.updates.push((
                update.symbol.clone(),
                update.formatted.clone(),
                update.direction,
            ));
        }

        fn on_tracking_started(&mut self, symbols: &[Symbol]) {
            self.tracking_started.push(symbols.to_vec());
        }

        fn on_tracking_stopped(&mut self) {
            self.tracking_stopped += 1;
        }
    }

    type TestController = SessionController<RecordingListener>;

    fn create_controller(
        mock: MockMarketData,
    ) -> (TestController, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = SessionController::new(
            Arc::new(mock),
            TrackerConfig::default(),
            RecordingListener::default(),
            tx,
        );
        (controller, rx)
    }

    fn quiet_prices() -> MockMarketData {
        let mut mock = MockMarketData::new();
        mock.expect_fetch_prices().returning(|_| Ok(Vec::new()));
        mock
    }

    fn load_catalog(controller: &mut TestController, symbols: &[&str]) {
        let catalog = Catalog::from_symbols(symbols.iter().copied());
        controller.handle_event(SessionEvent::CatalogLoaded(Ok(catalog)));
    }

    fn prices(generation: u64, cycle: u64, quotes: &[(&str, f64)]) -> SessionEvent {
        SessionEvent::PricesFetched {
            generation,
            cycle,
            quotes: quotes
                .iter()
                .map(|(s, p)| PriceQuote::new(*s, *p))
                .collect(),
        }
    }

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> SessionEvent {
        timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("timed out waiting for session event")
            .expect("session channel closed")
    }

    #[tokio::test]
    async fn test_start_loads_catalog() {
        let mut mock = MockMarketData::new();
        mock.expect_fetch_catalog()
            .times(1)
            .returning(|| Ok(Catalog::from_symbols(["ETHUSDT", "BTCUSDT", "ADAUSDT"])));
        let (mut controller, mut rx) = create_controller(mock);

        controller.start();
        assert!(controller.catalog_state().is_loading());
        assert!(!controller.retry_catalog());

        let event = next_event(&mut rx).await;
        controller.handle_event(event);

        assert!(controller.catalog_state().is_ready());
        assert_eq!(controller.visible(), &["ADAUSDT", "BTCUSDT", "ETHUSDT"]);
        assert_eq!(controller.listener().catalog_ready, vec![3]);
    }

    #[tokio::test]
    async fn test_catalog_error_is_surfaced_and_retryable() {
        let mut mock = MockMarketData::new();
        let mut attempts = 0;
        mock.expect_fetch_catalog().times(2).returning(move || {
            attempts += 1;
            if attempts == 1 {
                Err(FetchError::Timeout)
            } else {
                Ok(Catalog::from_symbols(["BTCUSDT"]))
            }
        });
        let (mut controller, mut rx) = create_controller(mock);

        controller.start();
        let event = next_event(&mut rx).await;
        controller.handle_event(event);

        assert_eq!(controller.catalog_state().error(), Some("request timed out"));
        assert_eq!(controller.listener().catalog_errors, vec!["request timed out"]);
        assert!(controller.visible().is_empty());

        assert!(controller.retry_catalog());
        let event = next_event(&mut rx).await;
        controller.handle_event(event);

        assert!(controller.catalog_state().is_ready());
        assert_eq!(controller.listener().catalog_errors.len(), 1);
        assert_eq!(controller.listener().catalog_ready, vec![1]);
    }

    #[test]
    fn test_retry_keeps_loaded_catalog() {
        let mut mock = MockMarketData::new();
        mock.expect_fetch_catalog().never();
        let (mut controller, _rx) = create_controller(mock);
        load_catalog(&mut controller, &["BTCUSDT", "ETHUSDT"]);
        assert_ok!(controller.toggle_selection("BTCUSDT"));

        assert!(!controller.retry_catalog());

        assert!(controller.catalog_state().is_ready());
        assert_eq!(controller.visible(), &["BTCUSDT", "ETHUSDT"]);
        assert_eq!(
            controller.toggle_selection("ETHUSDT").unwrap(),
            ToggleOutcome::Accepted
        );
        assert_eq!(controller.selection().symbols(), &["BTCUSDT", "ETHUSDT"]);
    }

    #[test]
    fn test_search_narrows_visible_set() {
        let (mut controller, _rx) = create_controller(MockMarketData::new());
        load_catalog(&mut controller, &["BTCUSDT", "ETHUSDT", "ETCUSDT", "SOLUSDT"]);

        controller.set_search_query("et");
        assert_eq!(controller.visible(), &["ETCUSDT", "ETHUSDT"]);

        controller.set_search_query("");
        assert_eq!(controller.visible().len(), 4);
    }

    #[test]
    fn test_toggle_selection_rules() {
        let (mut controller, _rx) = create_controller(MockMarketData::new());
        let symbols: Vec<String> = (0..12).map(|i| format!("C{i:02}USDT")).collect();
        let refs: Vec<&str> = symbols.iter().map(String::as_str).collect();
        load_catalog(&mut controller, &refs);

        for symbol in &symbols[..MAX_SELECTION] {
            assert_eq!(
                controller.toggle_selection(symbol).unwrap(),
                ToggleOutcome::Accepted
            );
        }
        assert_eq!(
            controller.toggle_selection(&symbols[MAX_SELECTION]).unwrap(),
            ToggleOutcome::Rejected(Rejection::AtCapacity)
        );
        assert_eq!(controller.selection().count(), MAX_SELECTION);

        assert_eq!(
            controller.toggle_selection("C00USDT").unwrap(),
            ToggleOutcome::Accepted
        );
        assert_eq!(controller.selection().count(), MAX_SELECTION - 1);

        assert_eq!(
            controller.toggle_selection("DOGEUSDT").unwrap(),
            ToggleOutcome::Rejected(Rejection::NotListed)
        );

        let counts = &controller.listener().selection_counts;
        assert_eq!(counts.last(), Some(&(MAX_SELECTION - 1)));
        assert_eq!(counts.iter().max(), Some(&MAX_SELECTION));
    }

    #[test]
    fn test_confirm_requires_selection() {
        let (mut controller, _rx) = create_controller(MockMarketData::new());
        load_catalog(&mut controller, &["BTCUSDT"]);

        let err = assert_err!(controller.confirm());
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(controller.phase(), Phase::Selecting);
    }

    #[tokio::test]
    async fn test_price_classification_scenario() {
        let (mut controller, _rx) = create_controller(quiet_prices());
        load_catalog(&mut controller, &["BTCUSDT", "ETHUSDT", "SOLUSDT"]);
        assert_ok!(controller.toggle_selection("BTCUSDT"));
        assert_ok!(controller.toggle_selection("ETHUSDT"));

        assert_ok!(controller.confirm());
        assert_eq!(controller.phase(), Phase::Tracking);
        assert_eq!(
            controller.listener().tracking_started,
            vec![vec!["BTCUSDT".to_string(), "ETHUSDT".to_string()]]
        );
        let generation = controller.generation().unwrap();

        controller.handle_event(prices(
            generation,
            1,
            &[("BTCUSDT", 50000.0), ("ETHUSDT", 3000.0)],
        ));
        controller.handle_event(prices(
            generation,
            2,
            &[("ETHUSDT", 3000.0), ("BTCUSDT", 50100.0)],
        ));

        assert_eq!(
            controller.listener().updates,
            vec![
                ("BTCUSDT".to_string(), "50000".to_string(), Direction::Initial),
                ("ETHUSDT".to_string(), "3000".to_string(), Direction::Initial),
                ("ETHUSDT".to_string(), "3000".to_string(), Direction::Unchanged),
                ("BTCUSDT".to_string(), "50100".to_string(), Direction::Up),
            ]
        );

        controller.handle_event(prices(generation, 3, &[("BTCUSDT", 49999.5)]));
        assert_eq!(
            controller.listener().updates.last().map(|u| u.2),
            Some(Direction::Down)
        );
        assert_eq!(
            controller.observation().and_then(|o| o.get("BTCUSDT")),
            Some(49999.5)
        );
    }

    #[tokio::test]
    async fn test_unselected_and_out_of_order_batches_are_ignored() {
        let (mut controller, _rx) = create_controller(quiet_prices());
        load_catalog(&mut controller, &["BTCUSDT", "ETHUSDT"]);
        assert_ok!(controller.toggle_selection("BTCUSDT"));
        assert_ok!(controller.confirm());
        let generation = controller.generation().unwrap();

        controller.handle_event(prices(generation, 2, &[("BTCUSDT", 2.0), ("ETHUSDT", 1.0)]));
        controller.handle_event(prices(generation, 1, &[("BTCUSDT", 1.0)]));

        let updates = &controller.listener().updates;
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, "BTCUSDT");
        assert_eq!(controller.observation().map(PriceObservation::len), Some(1));
    }

    #[tokio::test]
    async fn test_go_back_discards_in_flight_batch() {
        let (mut controller, _rx) = create_controller(quiet_prices());
        load_catalog(&mut controller, &["BTCUSDT", "ETHUSDT"]);
        controller.set_search_query("btc");
        assert_ok!(controller.toggle_selection("BTCUSDT"));
        assert_ok!(controller.confirm());
        let old_generation = controller.generation().unwrap();

        controller.handle_event(prices(old_generation, 1, &[("BTCUSDT", 50000.0)]));
        let in_flight = prices(old_generation, 2, &[("BTCUSDT", 50100.0)]);

        assert!(controller.go_back());
        controller.handle_event(in_flight.clone());

        assert_eq!(controller.phase(), Phase::Selecting);
        assert_eq!(controller.selection().count(), 0);
        assert!(controller.observation().is_none());
        assert_eq!(controller.search_query(), "");
        assert_eq!(controller.visible().len(), 2);
        assert_eq!(controller.listener().updates.len(), 1);
        assert_eq!(controller.listener().tracking_stopped, 1);
        assert_eq!(controller.listener().catalog_ready, vec![2, 2]);

        // A new session must not accept the old session's batches either.
        assert_ok!(controller.toggle_selection("BTCUSDT"));
        assert_ok!(controller.confirm());
        assert_ne!(controller.generation(), Some(old_generation));
        controller.handle_event(in_flight);
        assert_eq!(controller.listener().updates.len(), 1);
        assert_eq!(controller.observation().map(PriceObservation::len), Some(0));
    }

    #[tokio::test]
    async fn test_selection_is_locked_while_tracking() {
        let (mut controller, _rx) = create_controller(quiet_prices());
        load_catalog(&mut controller, &["BTCUSDT", "ETHUSDT"]);
        assert_ok!(controller.toggle_selection("BTCUSDT"));
        assert_ok!(controller.confirm());

        assert_err!(controller.toggle_selection("ETHUSDT"));
        assert_err!(controller.confirm());
        assert_eq!(controller.selection().symbols(), &["BTCUSDT"]);
    }

    #[test]
    fn test_go_back_outside_tracking_is_noop() {
        let (mut controller, _rx) = create_controller(MockMarketData::new());
        assert!(!controller.go_back());
        assert_eq!(controller.listener().tracking_stopped, 0);
    }

    #[tokio::test]
    async fn test_poller_batches_reach_listener() {
        let mut mock = MockMarketData::new();
        mock.expect_fetch_prices().returning(|symbols| {
            Ok(symbols
                .iter()
                .map(|s| PriceQuote::new(s.clone(), 0.00012340))
                .collect())
        });
        let (mut controller, mut rx) = create_controller(mock);
        load_catalog(&mut controller, &["PEPEUSDT"]);
        assert_ok!(controller.toggle_selection("PEPEUSDT"));
        assert_ok!(controller.confirm());

        let event = next_event(&mut rx).await;
        controller.handle_event(event);

        assert_eq!(
            controller.listener().updates,
            vec![(
                "PEPEUSDT".to_string(),
                "0.00012340".to_string(),
                Direction::Initial
            )]
        );
        assert_eq!(controller.drain_events(&mut rx), 0);
    }
}
