//! # Actions
//!
//! Everything that can happen in the app becomes an `Action`.
//! User fills in the New Book form? That's `Action::CreateBook { .. }`.
//! GPS answers? That's `Action::LocationFixed { .. }`.
//!
//! `update()` applies an action to the state and returns an `Effect`
//! telling the adapter what I/O to start or stop. The only asynchronous
//! work is the location fix; its result comes back as another action, so
//! the state is only ever mutated here, on the UI thread.
//!
//! ```text
//! State + Action  →  update()  →  Effect
//! ```

use log::{debug, info};

use crate::core::model::Location;
use crate::core::state::{App, Notice};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CreateBook {
        name: String,
        start_place: String,
        destination: String,
    },
    /// Re-scan the data directory (entering the Open Book screen).
    RefreshBooks,
    /// Open `books[index]` from the last scan.
    OpenBook(usize),
    /// Leave the View Book screen.
    CloseBook,
    AddPlace(String),
    DeletePlace(String),
    RequestLocation,
    LocationFixed {
        request_id: u64,
        location: Location,
    },
    LocationFailed {
        request_id: u64,
        message: String,
    },
    DismissNotice,
    Quit,
}

/// What the adapter should do after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// A book became current; show it. Any running fix task is stale.
    BookOpened,
    /// Start acquiring a fix for this request id.
    SpawnLocationFix(u64),
    /// Abort the background fix task, its result will be ignored anyway.
    CancelLocationFix,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::CreateBook {
            name,
            start_place,
            destination,
        } => match app.create_book(&name, &start_place, &destination) {
            Ok(book) => {
                let text = format!("Created place book: {}", book.name);
                // A failed save already left an error notice; keep that one.
                if app.notice.is_none() {
                    app.notice = Some(Notice::success(text));
                }
                Effect::BookOpened
            }
            Err(e) => {
                info!("Create book rejected: {}", e);
                app.notice = Some(Notice::error("Please fill all fields"));
                Effect::None
            }
        },
        Action::RefreshBooks => {
            app.refresh_books_list();
            Effect::None
        }
        Action::OpenBook(index) => {
            if app.open_book(index).is_some() {
                Effect::BookOpened
            } else {
                Effect::None
            }
        }
        Action::CloseBook => {
            if app.close_book() {
                Effect::CancelLocationFix
            } else {
                Effect::None
            }
        }
        Action::AddPlace(name) => {
            if let Err(e) = app.add_place(&name) {
                debug!("Add place ignored: {}", e);
            }
            Effect::None
        }
        Action::DeletePlace(name) => {
            if let Err(e) = app.delete_place(&name) {
                debug!("Delete place ignored: {}", e);
            }
            Effect::None
        }
        Action::RequestLocation => match app.begin_location_request() {
            Ok(id) => Effect::SpawnLocationFix(id),
            Err(e) => {
                app.notice = Some(Notice::error(e.to_string()));
                Effect::None
            }
        },
        Action::LocationFixed {
            request_id,
            location,
        } => {
            if let Some(place) = app.apply_location_fix(request_id, location) {
                info!("Added '{}' from location fix", place.name);
            }
            Effect::None
        }
        Action::LocationFailed {
            request_id,
            message,
        } => {
            if app.fail_location_request(request_id) {
                app.notice = Some(Notice::error(message));
            }
            Effect::None
        }
        Action::DismissNotice => {
            app.notice = None;
            Effect::None
        }
        Action::Quit => {
            app.cancel_location_request();
            Effect::Quit
        }
    }
}
