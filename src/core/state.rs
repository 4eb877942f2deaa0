//! # Application State
//!
//! Core business state for the place book app. Domain logic only; which
//! screen is showing lives in the `tui` module.
//!
//! ```text
//! App
//! ├── storage: Storage                        // book files on disk
//! ├── books: Vec<Book>                        // last directory scan
//! ├── current_book: Option<Book>              // open book, written through on edit
//! ├── location: LocationCapability            // resolved once at startup
//! ├── location_request: Option<LocationRequest>
//! └── notice: Option<Notice>                  // popup text for the UI
//! ```
//!
//! The TUI mutates this only through `update(state, action)` in action.rs.
//! The methods here are the operations that reducer calls.

use std::fmt;

use log::{debug, info, warn};

use crate::core::config::ResolvedConfig;
use crate::core::location::{LocationCapability, LocationError, LocationRequest};
use crate::core::model::{Book, Location, Place};
use crate::core::storage::Storage;

/// A required text field was empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyField(&'static str),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => write!(f, "{field} must not be empty"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Why a book operation was refused. None of these are fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum BookError {
    Validation(ValidationError),
    /// The operation needs an open book and there is none.
    NoOpenBook,
    /// The location capability is not available on this run.
    CapabilityUnavailable,
    /// The location source failed or the request was abandoned.
    Location(LocationError),
}

impl fmt::Display for BookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookError::Validation(e) => write!(f, "{e}"),
            BookError::NoOpenBook => write!(f, "no book is open"),
            BookError::CapabilityUnavailable => write!(f, "GPS not available"),
            BookError::Location(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for BookError {}

impl From<ValidationError> for BookError {
    fn from(e: ValidationError) -> Self {
        BookError::Validation(e)
    }
}

impl From<LocationError> for BookError {
    fn from(e: LocationError) -> Self {
        match e {
            LocationError::Unavailable => BookError::CapabilityUnavailable,
            other => BookError::Location(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Success,
}

/// A message for the user, shown as a popup until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }
}

/// Trimmed `value`, or an error naming `field` if nothing is left.
fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(trimmed)
    }
}

#[derive(Debug)]
pub struct App {
    pub storage: Storage,
    pub books: Vec<Book>,
    pub current_book: Option<Book>,
    pub location: LocationCapability,
    /// The most recent location request (None = never asked).
    pub location_request: Option<LocationRequest>,
    pub notice: Option<Notice>,
    next_request_id: u64,
}

impl App {
    pub fn new(storage: Storage, location: LocationCapability) -> Self {
        Self {
            storage,
            books: Vec::new(),
            current_book: None,
            location,
            location_request: None,
            notice: None,
            next_request_id: 1,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        let storage = Storage::new(&config.data_dir);
        if let Err(e) = storage.ensure_dir() {
            warn!("Failed to create data directory: {}", e);
        }
        Self::new(storage, config.location_capability())
    }

    /// Start a new book, make it current and write it to disk.
    pub fn create_book(
        &mut self,
        name: &str,
        start_place: &str,
        destination: &str,
    ) -> Result<&Book, BookError> {
        let name = require("Book name", name)?;
        let start_place = require("Start place", start_place)?;
        let destination = require("Destination", destination)?;

        self.cancel_location_request();
        info!("Creating book '{}'", name);
        self.current_book = Some(Book::new(name, start_place, destination));
        self.save_current_book();

        self.current_book.as_ref().ok_or(BookError::NoOpenBook)
    }

    /// Make a book from the last listing current. Out-of-range is ignored.
    pub fn open_book(&mut self, index: usize) -> Option<&Book> {
        let book = self.books.get(index)?.clone();
        self.cancel_location_request();
        info!("Opening book '{}'", book.name);
        self.current_book = Some(book);
        self.current_book.as_ref()
    }

    /// Leave the current book. Any pending location request is cancelled.
    pub fn close_book(&mut self) -> bool {
        self.cancel_location_request()
    }

    /// Append a place with unknown coordinates to the current book.
    pub fn add_place(&mut self, name: &str) -> Result<Place, BookError> {
        let name = require("Place name", name)?;
        self.push_place(Place::new(name, Location::default()))
    }

    /// Remove every place called `name`. Returns how many were removed.
    pub fn delete_place(&mut self, name: &str) -> Result<usize, BookError> {
        let book = self.current_book.as_mut().ok_or(BookError::NoOpenBook)?;
        let before = book.places.len();
        book.places.retain(|p| p.name != name);
        let removed = before - book.places.len();

        if removed > 0 {
            debug!("Deleted {} place(s) named '{}'", removed, name);
            self.save_current_book();
        }
        Ok(removed)
    }

    /// Rebuild `books` from the data directory.
    pub fn refresh_books_list(&mut self) {
        self.books = self.storage.list_books();
        debug!("Book list refreshed: {} books", self.books.len());
    }

    /// Register a new location request and return its id.
    ///
    /// A still-pending earlier request is cancelled first, so only the newest
    /// fix can land.
    pub fn begin_location_request(&mut self) -> Result<u64, BookError> {
        if !self.location.is_available() {
            return Err(BookError::CapabilityUnavailable);
        }
        if self.current_book.is_none() {
            return Err(BookError::NoOpenBook);
        }
        self.cancel_location_request();

        let id = self.next_request_id;
        self.next_request_id += 1;
        self.location_request = Some(LocationRequest::new(id));
        debug!("Location request {} pending", id);
        Ok(id)
    }

    /// Apply a fix for request `id`.
    ///
    /// Returns the new place, or None if the request was cancelled, already
    /// resolved or superseded. Stale fixes never touch the book.
    pub fn apply_location_fix(&mut self, id: u64, location: Location) -> Option<Place> {
        match self.location_request.as_mut() {
            Some(req) if req.accepts(id) => {
                req.resolve();
            }
            _ => {
                debug!("Discarding stale location fix for request {}", id);
                return None;
            }
        }

        match self.push_place(Place::new(location.label(), location)) {
            Ok(place) => Some(place),
            Err(e) => {
                warn!("Location fix {} arrived without an open book: {}", id, e);
                None
            }
        }
    }

    /// Mark request `id` as finished without a fix. Returns false if stale.
    pub fn fail_location_request(&mut self, id: u64) -> bool {
        match self.location_request.as_mut() {
            Some(req) if req.accepts(id) => req.cancel(),
            _ => false,
        }
    }

    /// Cancel the pending location request, if any.
    pub fn cancel_location_request(&mut self) -> bool {
        let cancelled = self
            .location_request
            .as_mut()
            .is_some_and(LocationRequest::cancel);
        if cancelled {
            debug!("Location request cancelled");
        }
        cancelled
    }

    pub fn location_pending(&self) -> bool {
        self.location_request
            .as_ref()
            .is_some_and(LocationRequest::is_pending)
    }

    /// Acquire a fix and add it to the current book as a new place.
    ///
    /// Suspends while the provider works. The UI loop uses the split form
    /// (`begin_location_request` + `apply_location_fix`) so it can keep
    /// handling input meanwhile.
    pub async fn resolve_current_location(&mut self) -> Result<Place, BookError> {
        let provider = self.location.provider()?;
        let id = self.begin_location_request()?;

        match provider.current_fix().await {
            Ok(location) => self
                .apply_location_fix(id, location)
                .ok_or_else(|| BookError::Location(LocationError::Failed("request abandoned".into()))),
            Err(e) => {
                self.fail_location_request(id);
                Err(e.into())
            }
        }
    }

    fn push_place(&mut self, place: Place) -> Result<Place, BookError> {
        let book = self.current_book.as_mut().ok_or(BookError::NoOpenBook)?;
        book.places.push(place.clone());
        debug!("Added place '{}' to '{}'", place.name, book.name);
        self.save_current_book();
        Ok(place)
    }

    /// Write the current book through to disk. Failures are logged and
    /// shown as a notice; the in-memory book is kept either way.
    fn save_current_book(&mut self) {
        let Some(book) = self.current_book.as_ref() else {
            return;
        };
        if let Err(e) = self.storage.save_book(book) {
            warn!("Failed to save book '{}': {}", book.name, e);
            self.notice = Some(Notice::error(format!("Could not save book: {e}")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::location::RequestState;
    use crate::test_support::{located_app, test_app};

    #[test]
    fn test_app_new_defaults() {
        let (app, _dir) = test_app();
        assert!(app.books.is_empty());
        assert!(app.current_book.is_none());
        assert!(app.notice.is_none());
        assert!(!app.location.is_available());
    }

    #[test]
    fn test_create_book_trims_and_persists() {
        let (mut app, _dir) = test_app();
        let book = app.create_book("  Trip ", " Home", "Beach  ").unwrap().clone();

        assert_eq!(book.name, "Trip");
        assert_eq!(book.start_place, "Home");
        assert_eq!(book.destination, "Beach");
        assert!(book.places.is_empty());
        assert_eq!(app.storage.load_book("Trip").unwrap(), book);
    }

    #[test]
    fn test_create_book_rejects_blank_fields() {
        let (mut app, dir) = test_app();
        let cases = [
            ("", "Home", "Beach", "Book name"),
            ("Trip", "   ", "Beach", "Start place"),
            ("Trip", "Home", "\t\n", "Destination"),
        ];
        for (name, start, dest, field) in cases {
            let err = app.create_book(name, start, dest).unwrap_err();
            assert_eq!(err, BookError::Validation(ValidationError::EmptyField(field)));
        }
        assert!(app.current_book.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_add_place_appends_in_order() {
        let (mut app, _dir) = test_app();
        app.create_book("Trip", "Home", "Beach").unwrap();
        app.add_place("Pier").unwrap();
        app.add_place("Cafe").unwrap();
        let place = app.add_place("  Lighthouse ").unwrap();

        assert_eq!(place.name, "Lighthouse");
        assert_eq!(place.location, Location::default());
        let names: Vec<_> = app
            .storage
            .load_book("Trip")
            .unwrap()
            .places
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["Pier", "Cafe", "Lighthouse"]);
    }

    #[test]
    fn test_add_place_rejects_blank_name() {
        let (mut app, _dir) = test_app();
        app.create_book("Trip", "Home", "Beach").unwrap();
        let err = app.add_place("   ").unwrap_err();
        assert_eq!(err, BookError::Validation(ValidationError::EmptyField("Place name")));
        assert!(app.current_book.as_ref().unwrap().places.is_empty());
    }

    #[test]
    fn test_add_place_without_book() {
        let (mut app, _dir) = test_app();
        assert_eq!(app.add_place("Pier").unwrap_err(), BookError::NoOpenBook);
    }

    #[test]
    fn test_delete_place_removes_all_matches() {
        let (mut app, _dir) = test_app();
        app.create_book("Trip", "Home", "Beach").unwrap();
        for name in ["Pier", "Cafe", "Pier"] {
            app.add_place(name).unwrap();
        }

        assert_eq!(app.delete_place("Pier").unwrap(), 2);
        let saved = app.storage.load_book("Trip").unwrap();
        assert_eq!(saved.places.len(), 1);
        assert_eq!(saved.places[0].name, "Cafe");
    }

    #[test]
    fn test_delete_missing_place_is_noop() {
        let (mut app, _dir) = test_app();
        app.create_book("Trip", "Home", "Beach").unwrap();
        app.add_place("Pier").unwrap();

        assert_eq!(app.delete_place("Nowhere").unwrap(), 0);
        assert_eq!(app.current_book.as_ref().unwrap().places.len(), 1);
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_refresh_and_open_book() {
        let (mut app, _dir) = test_app();
        app.create_book("Trip", "Home", "Beach").unwrap();
        app.add_place("Pier").unwrap();
        app.current_book = None;

        app.refresh_books_list();
        assert_eq!(app.books.len(), 1);
        let opened = app.open_book(0).unwrap();
        assert_eq!(opened.places[0].name, "Pier");
        assert!(app.open_book(5).is_none());
    }

    #[test]
    fn test_save_failure_sets_notice_and_keeps_state() {
        let (mut app, dir) = test_app();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        app.storage = Storage::new(&blocker);

        app.create_book("Trip", "Home", "Beach").unwrap();
        assert!(app.current_book.is_some());
        let notice = app.notice.clone().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.text.starts_with("Could not save book"));
    }

    #[test]
    fn test_location_request_unavailable() {
        let (mut app, _dir) = test_app();
        app.create_book("Trip", "Home", "Beach").unwrap();
        assert_eq!(
            app.begin_location_request().unwrap_err(),
            BookError::CapabilityUnavailable
        );
        assert!(app.location_request.is_none());
    }

    #[test]
    fn test_location_fix_adds_named_place() {
        let (mut app, _dir) = located_app(Location::new(48.8566, 2.3522));
        app.create_book("Trip", "Home", "Beach").unwrap();

        let id = app.begin_location_request().unwrap();
        assert!(app.location_pending());
        let place = app.apply_location_fix(id, Location::new(48.8566, 2.3522)).unwrap();

        assert_eq!(place.name, "Location (48.8566, 2.3522)");
        assert_eq!(place.location, Location::new(48.8566, 2.3522));
        assert!(!app.location_pending());
        assert_eq!(app.storage.load_book("Trip").unwrap().places, vec![place]);
    }

    #[test]
    fn test_fix_after_cancel_is_discarded() {
        let (mut app, _dir) = located_app(Location::new(1.0, 2.0));
        app.create_book("Trip", "Home", "Beach").unwrap();

        let id = app.begin_location_request().unwrap();
        assert!(app.close_book());
        assert!(app.apply_location_fix(id, Location::new(1.0, 2.0)).is_none());
        assert!(app.current_book.as_ref().unwrap().places.is_empty());
        assert_eq!(
            app.location_request.as_ref().unwrap().state,
            RequestState::Cancelled
        );
    }

    #[test]
    fn test_new_request_supersedes_old() {
        let (mut app, _dir) = located_app(Location::new(1.0, 2.0));
        app.create_book("Trip", "Home", "Beach").unwrap();

        let first = app.begin_location_request().unwrap();
        let second = app.begin_location_request().unwrap();
        assert_ne!(first, second);
        assert!(app.apply_location_fix(first, Location::new(1.0, 2.0)).is_none());
        assert!(app.apply_location_fix(second, Location::new(1.0, 2.0)).is_some());
        assert_eq!(app.current_book.as_ref().unwrap().places.len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_current_location() {
        let (mut app, _dir) = located_app(Location::new(-33.8688, 151.2093));
        app.create_book("Trip", "Home", "Beach").unwrap();
        app.add_place("Pier").unwrap();

        let place = app.resolve_current_location().await.unwrap();
        assert_eq!(place.name, "Location (-33.8688, 151.2093)");
        let places = &app.current_book.as_ref().unwrap().places;
        assert_eq!(places.len(), 2);
        assert_eq!(places[1], place);
    }

    #[tokio::test]
    async fn test_resolve_current_location_unavailable() {
        let (mut app, _dir) = test_app();
        app.create_book("Trip", "Home", "Beach").unwrap();
        let err = app.resolve_current_location().await.unwrap_err();
        assert_eq!(err, BookError::CapabilityUnavailable);
        assert_eq!(err.to_string(), "GPS not available");
    }
}
