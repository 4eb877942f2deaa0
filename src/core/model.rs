//! # Book Model
//!
//! Plain data for place books. Field order matches the on-disk JSON so a
//! saved file reads top to bottom the way the View Book screen shows it.
//!
//! ```text
//! Book
//! ├── name: String            // title, also drives the filename
//! ├── start_place: String
//! ├── destination: String
//! ├── created_date: String    // "YYYY-MM-DD HH:MM:SS"
//! └── places: Vec<Place>      // insertion order = display order
//!     ├── name: String
//!     ├── timestamp: String
//!     └── location: Location { lat, lon }
//! ```

use chrono::Local;
use serde::{Deserialize, Serialize};

/// `strftime` pattern used for every timestamp in a book file.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time formatted with [`TIMESTAMP_FORMAT`].
pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// A latitude/longitude pair. `0.0, 0.0` stands in for "unknown".
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Display label for a place created from a location fix.
    pub fn label(&self) -> String {
        format!("Location ({:.4}, {:.4})", self.lat, self.lon)
    }
}

/// One visited location.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub timestamp: String,
    #[serde(default)]
    pub location: Location,
}

impl Place {
    /// A place stamped with the current time.
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            timestamp: now_timestamp(),
            location,
        }
    }
}

/// One trip record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Book {
    pub name: String,
    pub start_place: String,
    pub destination: String,
    pub created_date: String,
    #[serde(default)]
    pub places: Vec<Place>,
}

impl Book {
    /// A new, empty book created now. Callers validate the fields first.
    pub fn new(
        name: impl Into<String>,
        start_place: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            start_place: start_place.into(),
            destination: destination.into(),
            created_date: now_timestamp(),
            places: Vec::new(),
        }
    }

    /// One-line summary used by the book list: `name: start → destination`.
    pub fn route(&self) -> String {
        format!("{}: {} → {}", self.name, self.start_place, self.destination)
    }

    /// "1 place", "3 places".
    pub fn place_count(&self) -> String {
        match self.places.len() {
            1 => "1 place".to_string(),
            n => format!("{n} places"),
        }
    }

    /// Route plus place count, as printed by `placebook list`.
    pub fn summary(&self) -> String {
        format!("{} ({})", self.route(), self.place_count())
    }
}
