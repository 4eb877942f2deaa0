//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the screens,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Screens
//!
//! ```text
//! Main ──n──▶ New Book ──create──▶ View Book
//!   │                                 ▲  │ Esc
//!   └──o──▶ Open Book ──Enter─────────┘  ▼
//!              ▲                       Open Book
//! ```
//!
//! ## Location fixes
//!
//! `Effect::SpawnLocationFix` starts a tokio task that asks the provider for
//! a fix and sends the result back over an mpsc channel as an `Action`. The
//! loop drains that channel on this thread, so core state is never touched
//! from the task. Leaving the book aborts the task; a result that still
//! slips through is dropped by the core because the request is cancelled.
//!
//! ## Redraw Strategy
//!
//! Draws only after an event, a background action, or a timer-driven change
//! (success notices dismiss themselves after two seconds).

mod component;
pub mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::location::LocationProvider;
use crate::core::state::{App, NoticeKind};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    BookListEvent, BookListState, BookViewEvent, BookViewState, FormEvent, MainMenuState,
    MenuEvent, NewBookForm,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// How long a success notice stays up without a key press.
const SUCCESS_NOTICE_TTL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Main,
    NewBook,
    OpenBook,
    ViewBook,
}

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Screen::Main => "Main",
            Screen::NewBook => "New Book",
            Screen::OpenBook => "Open Book",
            Screen::ViewBook => "View Book",
        }
    }
}

/// TUI-specific presentation state (not part of core business logic)
#[derive(Debug)]
pub struct TuiState {
    pub screen: Screen,
    pub main_menu: MainMenuState,
    pub new_book: NewBookForm,
    pub book_list: BookListState,
    pub book_view: BookViewState,
    /// When the current success notice was first drawn.
    notice_since: Option<Instant>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Main,
            main_menu: MainMenuState::new(),
            new_book: NewBookForm::new(),
            book_list: BookListState::default(),
            book_view: BookViewState::new(),
            notice_since: None,
        }
    }
}

/// What the loop must do after routing one event.
#[derive(Debug, Default)]
struct Outcome {
    effect: Option<Effect>,
    quit: bool,
}

/// Route one terminal event to the current screen and apply the resulting
/// actions to `app`. Returns the last effect for the loop to execute.
fn handle_event(app: &mut App, tui: &mut TuiState, event: &TuiEvent) -> Outcome {
    if matches!(event, TuiEvent::ForceQuit) {
        return Outcome {
            effect: Some(update(app, Action::Quit)),
            quit: true,
        };
    }

    // A notice swallows the next key, like tapping a popup away.
    if app.notice.is_some() {
        update(app, Action::DismissNotice);
        tui.notice_since = None;
        return Outcome::default();
    }

    let mut outcome = Outcome::default();
    match tui.screen {
        Screen::Main => match tui.main_menu.handle_event(event) {
            Some(MenuEvent::NewBook) => tui.screen = Screen::NewBook,
            Some(MenuEvent::OpenBook) => enter_book_list(app, tui),
            Some(MenuEvent::Quit) => {
                outcome.effect = Some(update(app, Action::Quit));
                outcome.quit = true;
            }
            None => {}
        },
        Screen::NewBook => match tui.new_book.handle_event(event) {
            Some(FormEvent::Submit {
                name,
                start_place,
                destination,
            }) => {
                let effect = update(
                    app,
                    Action::CreateBook {
                        name,
                        start_place,
                        destination,
                    },
                );
                if effect == Effect::BookOpened {
                    tui.new_book.reset();
                    show_current_book(app, tui);
                }
                outcome.effect = Some(effect);
            }
            Some(FormEvent::Cancel) => tui.screen = Screen::Main,
            None => {}
        },
        Screen::OpenBook => match tui.book_list.handle_event(event) {
            Some(BookListEvent::Open(index)) => {
                let effect = update(app, Action::OpenBook(index));
                if effect == Effect::BookOpened {
                    show_current_book(app, tui);
                }
                outcome.effect = Some(effect);
            }
            Some(BookListEvent::Back) => tui.screen = Screen::Main,
            None => {}
        },
        Screen::ViewBook => match tui.book_view.handle_event(event) {
            Some(BookViewEvent::AddPlace(name)) => {
                outcome.effect = Some(update(app, Action::AddPlace(name)));
            }
            Some(BookViewEvent::Delete(index)) => {
                let name = app
                    .current_book
                    .as_ref()
                    .and_then(|b| b.places.get(index))
                    .map(|p| p.name.clone());
                if let Some(name) = name {
                    outcome.effect = Some(update(app, Action::DeletePlace(name)));
                }
            }
            Some(BookViewEvent::AddCurrentLocation) => {
                outcome.effect = Some(update(app, Action::RequestLocation));
            }
            Some(BookViewEvent::Back) => {
                outcome.effect = Some(update(app, Action::CloseBook));
                enter_book_list(app, tui);
            }
            None => {}
        },
    }
    outcome
}

/// Entering the Open Book screen always re-scans the data directory.
fn enter_book_list(app: &mut App, tui: &mut TuiState) {
    update(app, Action::RefreshBooks);
    tui.book_list.reset(app.books.len());
    tui.screen = Screen::OpenBook;
}

fn show_current_book(app: &App, tui: &mut TuiState) {
    let len = app.current_book.as_ref().map_or(0, |b| b.places.len());
    tui.book_view.reset(len);
    tui.screen = Screen::ViewBook;
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableBracketedPaste,
            Show,                        // Show cursor for text fields
            SetCursorStyle::SteadyBlock  // Non-blinking: redraws reset the blink timer
        )?;
        info!("Terminal modes enabled (bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableBracketedPaste, SetCursorStyle::DefaultUserShape);
    }
}

/// Holds the abort handle of the running location task, if any.
#[derive(Default)]
struct LocationTask {
    handle: Option<tokio::task::AbortHandle>,
}

impl LocationTask {
    fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!("Aborting location task");
            handle.abort();
        }
    }
}

/// Start the timer for a success notice and dismiss it once it has been up
/// for `SUCCESS_NOTICE_TTL`. Error notices wait for a key press. Returns
/// true when the notice was dismissed.
fn expire_notice(app: &mut App, tui: &mut TuiState, now: Instant) -> bool {
    let notice_kind = app.notice.as_ref().map(|n| n.kind);
    match (notice_kind, tui.notice_since) {
        (Some(NoticeKind::Success), None) => {
            tui.notice_since = Some(now);
            false
        }
        (Some(NoticeKind::Success), Some(since))
            if now.saturating_duration_since(since) >= SUCCESS_NOTICE_TTL =>
        {
            update(app, Action::DismissNotice);
            tui.notice_since = None;
            true
        }
        // Gone, or replaced by an error: stop the timer
        (Some(NoticeKind::Error) | None, Some(_)) => {
            tui.notice_since = None;
            false
        }
        _ => false,
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let mut app = App::from_config(&config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut location_task = LocationTask::default();

    let mut needs_redraw = true; // Force first frame

    loop {
        if expire_notice(&mut app, &mut tui, Instant::now()) {
            needs_redraw = true;
        }

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        // Wake up often enough to expire notices and pick up location fixes
        let waiting = tui.notice_since.is_some() || app.location_pending();
        let timeout = if waiting {
            Duration::from_millis(100)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if matches!(event, TuiEvent::Resize) {
                continue;
            }
            let outcome = handle_event(&mut app, &mut tui, &event);
            if let Some(effect) = outcome.effect {
                run_effect(effect, &app, &mut location_task, &tx);
            }
            if outcome.quit {
                should_quit = true;
                break;
            }
        }

        if should_quit {
            break;
        }

        // Handle background task actions (location fixes)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            run_effect(effect, &app, &mut location_task, &tx);
        }
    }

    location_task.abort();
    ratatui::restore();
    info!("Place book exiting");
    Ok(())
}

fn run_effect(
    effect: Effect,
    app: &App,
    location_task: &mut LocationTask,
    tx: &mpsc::Sender<Action>,
) {
    match effect {
        Effect::SpawnLocationFix(request_id) => {
            location_task.abort();
            match app.location.provider() {
                Ok(provider) => {
                    location_task.handle =
                        Some(spawn_location_fix(provider, request_id, tx.clone()));
                }
                Err(e) => warn!("Location fix requested without a provider: {}", e),
            }
        }
        Effect::CancelLocationFix | Effect::BookOpened | Effect::Quit => location_task.abort(),
        Effect::None => {}
    }
}

fn spawn_location_fix(
    provider: Arc<dyn LocationProvider>,
    request_id: u64,
    tx: mpsc::Sender<Action>,
) -> tokio::task::AbortHandle {
    info!(
        "Spawning location fix via '{}' (request {})",
        provider.name(),
        request_id
    );
    let handle = tokio::spawn(async move {
        let action = match provider.current_fix().await {
            Ok(location) => Action::LocationFixed {
                request_id,
                location,
            },
            Err(e) => Action::LocationFailed {
                request_id,
                message: e.to_string(),
            },
        };
        if tx.send(action).is_err() {
            warn!("Failed to send location result for request {}: receiver dropped", request_id);
        }
    });
    handle.abort_handle()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Location;
    use crate::core::state::Notice;
    use crate::test_support::{located_app, test_app};

    fn send(app: &mut App, tui: &mut TuiState, events: &[TuiEvent]) -> Vec<Effect> {
        events
            .iter()
            .filter_map(|e| handle_event(app, tui, e).effect)
            .collect()
    }

    fn type_str(app: &mut App, tui: &mut TuiState, s: &str) {
        for c in s.chars() {
            handle_event(app, tui, &TuiEvent::InputChar(c));
        }
    }

    #[test]
    fn test_create_book_flow() {
        let (mut app, _dir) = test_app();
        let mut tui = TuiState::new();

        handle_event(&mut app, &mut tui, &TuiEvent::InputChar('n'));
        assert_eq!(tui.screen, Screen::NewBook);
        type_str(&mut app, &mut tui, "Trip");
        handle_event(&mut app, &mut tui, &TuiEvent::NextField);
        type_str(&mut app, &mut tui, "Home");
        handle_event(&mut app, &mut tui, &TuiEvent::NextField);
        type_str(&mut app, &mut tui, "Beach");
        let effects = send(&mut app, &mut tui, &[TuiEvent::Submit]);

        assert_eq!(effects, vec![Effect::BookOpened]);
        assert_eq!(tui.screen, Screen::ViewBook);
        assert!(app.notice.is_some());

        // Any key dismisses the notice without reaching the screen
        handle_event(&mut app, &mut tui, &TuiEvent::InputChar('x'));
        assert!(app.notice.is_none());

        type_str(&mut app, &mut tui, "Pier");
        handle_event(&mut app, &mut tui, &TuiEvent::Submit);
        let places = &app.current_book.as_ref().unwrap().places;
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "Pier");
    }

    #[test]
    fn test_invalid_form_stays_on_screen() {
        let (mut app, _dir) = test_app();
        let mut tui = TuiState::new();
        tui.screen = Screen::NewBook;

        handle_event(&mut app, &mut tui, &TuiEvent::SaveForm);
        assert_eq!(tui.screen, Screen::NewBook);
        assert!(app.notice.is_some());
    }

    #[test]
    fn test_open_book_rescans_and_back_returns_to_list() {
        let (mut app, _dir) = test_app();
        app.create_book("Trip", "Home", "Beach").unwrap();
        let mut tui = TuiState::new();

        handle_event(&mut app, &mut tui, &TuiEvent::InputChar('o'));
        assert_eq!(tui.screen, Screen::OpenBook);
        assert_eq!(app.books.len(), 1);

        handle_event(&mut app, &mut tui, &TuiEvent::Submit);
        assert_eq!(tui.screen, Screen::ViewBook);

        handle_event(&mut app, &mut tui, &TuiEvent::Escape);
        assert_eq!(tui.screen, Screen::OpenBook);
        handle_event(&mut app, &mut tui, &TuiEvent::Escape);
        assert_eq!(tui.screen, Screen::Main);
    }

    #[test]
    fn test_delete_selected_place() {
        let (mut app, _dir) = test_app();
        app.create_book("Trip", "Home", "Beach").unwrap();
        app.add_place("Pier").unwrap();
        app.add_place("Cafe").unwrap();
        let mut tui = TuiState::new();
        show_current_book(&app, &mut tui);

        send(
            &mut app,
            &mut tui,
            &[TuiEvent::CursorDown, TuiEvent::DeleteSelected, TuiEvent::DeleteSelected],
        );
        let places = &app.current_book.as_ref().unwrap().places;
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "Cafe");
    }

    #[test]
    fn test_leaving_book_cancels_location() {
        let (mut app, _dir) = located_app(Location::new(1.0, 2.0));
        app.create_book("Trip", "Home", "Beach").unwrap();
        let mut tui = TuiState::new();
        show_current_book(&app, &mut tui);

        let effects = send(&mut app, &mut tui, &[TuiEvent::AddCurrentLocation]);
        let [Effect::SpawnLocationFix(id)] = effects.as_slice() else {
            panic!("expected a spawn effect, got {effects:?}");
        };
        let id = *id;
        let effects = send(&mut app, &mut tui, &[TuiEvent::Escape]);
        assert_eq!(effects, vec![Effect::CancelLocationFix]);

        update(
            &mut app,
            Action::LocationFixed {
                request_id: id,
                location: Location::new(1.0, 2.0),
            },
        );
        assert!(app.current_book.as_ref().unwrap().places.is_empty());
    }

    #[tokio::test]
    async fn test_spawned_fix_reports_over_channel() {
        let (mut app, _dir) = located_app(Location::new(3.0, 4.0));
        app.create_book("Trip", "Home", "Beach").unwrap();
        let id = app.begin_location_request().unwrap();

        let (tx, rx) = mpsc::channel();
        let mut task = LocationTask::default();
        run_effect(Effect::SpawnLocationFix(id), &app, &mut task, &tx);

        let action = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            action,
            Action::LocationFixed {
                request_id: id,
                location: Location::new(3.0, 4.0)
            }
        );
        update(&mut app, action);
        assert_eq!(app.current_book.as_ref().unwrap().places.len(), 1);
    }

    #[test]
    fn test_success_notice_expires_after_ttl() {
        let (mut app, _dir) = test_app();
        let mut tui = TuiState::new();
        let t0 = Instant::now();
        app.notice = Some(Notice::success("Created place book: Trip"));

        assert!(!expire_notice(&mut app, &mut tui, t0));
        assert_eq!(tui.notice_since, Some(t0));
        assert!(!expire_notice(&mut app, &mut tui, t0 + Duration::from_millis(1999)));
        assert!(app.notice.is_some());

        assert!(expire_notice(&mut app, &mut tui, t0 + SUCCESS_NOTICE_TTL));
        assert!(app.notice.is_none());
        assert!(tui.notice_since.is_none());
    }

    #[test]
    fn test_error_notice_waits_for_key() {
        let (mut app, _dir) = test_app();
        let mut tui = TuiState::new();
        let t0 = Instant::now();
        app.notice = Some(Notice::error("GPS not available"));

        assert!(!expire_notice(&mut app, &mut tui, t0));
        assert!(!expire_notice(&mut app, &mut tui, t0 + Duration::from_secs(60)));
        assert_eq!(app.notice, Some(Notice::error("GPS not available")));
        assert!(tui.notice_since.is_none());
    }

    #[test]
    fn test_error_replacing_success_is_kept() {
        let (mut app, _dir) = test_app();
        let mut tui = TuiState::new();
        let t0 = Instant::now();
        app.notice = Some(Notice::success("Created place book: Trip"));
        expire_notice(&mut app, &mut tui, t0);

        app.notice = Some(Notice::error("Could not save book: disk full"));
        assert!(!expire_notice(&mut app, &mut tui, t0 + Duration::from_secs(3)));
        assert!(!expire_notice(&mut app, &mut tui, t0 + Duration::from_secs(10)));
        assert_eq!(app.notice, Some(Notice::error("Could not save book: disk full")));
    }

    #[test]
    fn test_force_quit() {
        let (mut app, _dir) = test_app();
        let mut tui = TuiState::new();
        let outcome = handle_event(&mut app, &mut tui, &TuiEvent::ForceQuit);
        assert!(outcome.quit);
        assert_eq!(outcome.effect, Some(Effect::Quit));
    }
}
