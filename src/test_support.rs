//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use crate::core::location::{FixedLocationProvider, LocationCapability};
use crate::core::model::Location;
use crate::core::state::App;
use crate::core::storage::Storage;

/// An App over a fresh temp directory, without location support.
/// Keep the `TempDir` alive for as long as the App is used.
pub fn test_app() -> (App, TempDir) {
    let dir = TempDir::new().expect("create temp dir");
    let app = App::new(Storage::new(dir.path()), LocationCapability::Unavailable);
    (app, dir)
}

/// An App whose location provider instantly reports `location`.
pub fn located_app(location: Location) -> (App, TempDir) {
    let dir = TempDir::new().expect("create temp dir");
    let provider = FixedLocationProvider::new(location, Duration::ZERO);
    let app = App::new(
        Storage::new(dir.path()),
        LocationCapability::Available(Arc::new(provider)),
    );
    (app, dir)
}
