//! Main application module.
//!
//! This module contains the main `App` struct that coordinates
//! the event loop, the session controller and rendering.

use crate::api::ExchangeClient;
use crate::config::Config;
use crate::error::Result;
use crate::events::{EventHandler, HandlerSnapshot};
use crate::state::{Action, AppState, InputMode, Notification, ToggleOutcome};
use crate::tracker::{SessionController, SessionEvent};
use crate::ui::Ui;

use chrono::Utc;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Rows skipped by PageUp/PageDown.
const PAGE_SIZE: i32 = 10;

/// The main application.
pub struct App {
    /// Terminal.
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Session controller with the presentation state as listener.
    session: SessionController<AppState>,
    /// Event handler.
    event_handler: EventHandler,
    /// Results posted by background tasks.
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    /// Renderer.
    ui: Ui,
}

impl App {
    /// Create a new application.
    pub fn new(config: Config) -> Result<Self> {
        // Build the client before touching the terminal
        let client = ExchangeClient::new(config.exchange.clone())?;

        // Set up terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        // Create session channel
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let session = SessionController::new(
            Arc::new(client),
            config.tracker.clone(),
            AppState::new(config.exchange.quote_asset.clone()),
            events_tx,
        );

        let event_handler = EventHandler::new(
            config.keybindings.clone(),
            Duration::from_millis(config.ui.tick_rate_ms),
        );

        Ok(Self {
            terminal,
            session,
            event_handler,
            events_rx,
            ui: Ui::new(&config),
        })
    }

    /// Run the application event loop.
    pub async fn run(&mut self) -> Result<()> {
        self.session.start();

        loop {
            self.session.listener_mut().expire_notification(Utc::now());

            // Update event handler with current state
            let state = self.session.listener();
            self.event_handler.update_snapshot(HandlerSnapshot {
                input_mode: state.input_mode,
                phase: self.session.phase(),
                show_help: state.show_help,
            });

            // Render UI
            self.terminal.draw(|frame| {
                self.ui.render(frame, &self.session);
            })?;

            tokio::select! {
                // Handle terminal events
                result = self.event_handler.next() => {
                    if let Some(action) = result? {
                        self.handle_action(action);
                    }
                }

                // Apply results from background tasks
                Some(event) = self.events_rx.recv() => {
                    self.session.handle_event(event);
                    self.session.drain_events(&mut self.events_rx);
                    let visible = self.session.visible().len();
                    self.session.listener_mut().clamp_cursor(visible);
                }
            }

            // Check if we should quit
            if self.session.listener().should_quit {
                break;
            }
        }

        info!("Shutting down");
        Ok(())
    }

    /// Handle an action.
    fn handle_action(&mut self, action: Action) {
        debug!(?action, "Handling action");
        let visible = self.session.visible().len();

        match action {
            Action::SetInputMode(mode) => self.session.listener_mut().input_mode = mode,
            Action::ScrollUp => self.session.listener_mut().move_cursor(-1, visible),
            Action::ScrollDown => self.session.listener_mut().move_cursor(1, visible),
            Action::PageUp => self.session.listener_mut().move_cursor(-PAGE_SIZE, visible),
            Action::PageDown => self.session.listener_mut().move_cursor(PAGE_SIZE, visible),
            Action::GoToTop => self.session.listener_mut().go_to_top(),
            Action::GoToBottom => self.session.listener_mut().go_to_bottom(visible),
            Action::SearchPush(c) => {
                let mut query = self.session.search_query().to_string();
                query.push(c);
                self.set_search_query(query);
            }
            Action::SearchPop => {
                let mut query = self.session.search_query().to_string();
                query.pop();
                self.set_search_query(query);
            }
            Action::ClearSearch => {
                self.set_search_query(String::new());
                self.session.listener_mut().input_mode = InputMode::Normal;
            }
            Action::ToggleSelected => self.toggle_under_cursor(),
            Action::Confirm => {
                if let Err(e) = self.session.confirm() {
                    self.session
                        .listener_mut()
                        .notify(Notification::warning(e.to_string()));
                }
            }
            Action::Back => {
                self.session.go_back();
            }
            Action::RetryCatalog => {
                if !self.session.retry_catalog() {
                    let message = if self.session.catalog_state().is_loading() {
                        "Coin list is still loading"
                    } else {
                        "Coin list is already loaded"
                    };
                    self.session
                        .listener_mut()
                        .notify(Notification::info(message));
                }
            }
            Action::ToggleHelp => {
                let state = self.session.listener_mut();
                state.show_help = !state.show_help;
            }
            Action::Quit => self.session.listener_mut().should_quit = true,
        }
    }

    fn set_search_query(&mut self, query: String) {
        self.session.set_search_query(query);
        self.session.listener_mut().go_to_top();
    }

    fn toggle_under_cursor(&mut self) {
        let cursor = self.session.listener().cursor;
        let Some(symbol) = self.session.visible().get(cursor).cloned() else {
            return;
        };

        let notification = match self.session.toggle_selection(&symbol) {
            Ok(ToggleOutcome::Accepted) => return,
            Ok(ToggleOutcome::Rejected(reason)) => {
                Notification::warning(format!("{symbol}: {reason}"))
            }
            Err(e) => Notification::error(e.to_string()),
        };
        self.session.listener_mut().notify(notification);
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
