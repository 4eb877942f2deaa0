//! # Location Capability
//!
//! Acquiring a position fix is the only asynchronous thing the app does.
//!
//! ```text
//! LocationCapability
//! ├── Available(Arc<dyn LocationProvider>)   // resolved once at startup
//! └── Unavailable                            // action is hidden / refused
//!
//! LocationRequest { id, state }
//!     Pending ──fix──▶ Resolved
//!        │
//!        └──cancel──▶ Cancelled   (late fixes are dropped)
//! ```
//!
//! The provider runs on a background task and reports back through the
//! action channel. State is only touched when the result is applied on the
//! control thread, and only if the request is still pending.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::model::Location;

/// Errors from acquiring a position fix.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationError {
    /// This platform or configuration has no location source.
    Unavailable,
    /// The source exists but could not produce a fix.
    Failed(String),
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationError::Unavailable => write!(f, "GPS not available"),
            LocationError::Failed(msg) => write!(f, "location fix failed: {msg}"),
        }
    }
}

impl std::error::Error for LocationError {}

/// A source of position fixes.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Wait for one position fix.
    async fn current_fix(&self) -> Result<Location, LocationError>;
}

/// A provider that always reports the same position after a fixed delay.
///
/// Used on desktops, which have no GPS receiver: the user configures where
/// they are and the delay stands in for satellite acquisition time.
#[derive(Debug, Clone)]
pub struct FixedLocationProvider {
    location: Location,
    delay: Duration,
}

impl FixedLocationProvider {
    pub fn new(location: Location, delay: Duration) -> Self {
        Self { location, delay }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn current_fix(&self) -> Result<Location, LocationError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.location)
    }
}

/// Whether this run can produce location fixes.
#[derive(Clone, Default)]
pub enum LocationCapability {
    Available(Arc<dyn LocationProvider>),
    #[default]
    Unavailable,
}

impl fmt::Debug for LocationCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationCapability::Available(p) => write!(f, "Available({})", p.name()),
            LocationCapability::Unavailable => write!(f, "Unavailable"),
        }
    }
}

impl LocationCapability {
    pub fn is_available(&self) -> bool {
        matches!(self, LocationCapability::Available(_))
    }

    /// The provider, or [`LocationError::Unavailable`].
    pub fn provider(&self) -> Result<Arc<dyn LocationProvider>, LocationError> {
        match self {
            LocationCapability::Available(p) => Ok(Arc::clone(p)),
            LocationCapability::Unavailable => Err(LocationError::Unavailable),
        }
    }
}

/// Lifecycle of a single location request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Pending,
    Resolved,
    Cancelled,
}

/// A cancellable, in-flight location request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRequest {
    pub id: u64,
    pub state: RequestState,
}

impl LocationRequest {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            state: RequestState::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state == RequestState::Pending
    }

    /// Whether a result tagged `id` should be applied.
    pub fn accepts(&self, id: u64) -> bool {
        self.id == id && self.is_pending()
    }

    /// Mark as resolved. Returns false if the request was no longer pending.
    pub fn resolve(&mut self) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.state = RequestState::Resolved;
        true
    }

    /// Mark as cancelled. Returns false if the request was no longer pending.
    pub fn cancel(&mut self) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.state = RequestState::Cancelled;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_resolves_once() {
        let mut req = LocationRequest::new(7);
        assert!(req.accepts(7));
        assert!(!req.accepts(6));
        assert!(req.resolve());
        assert!(!req.resolve());
        assert!(!req.accepts(7));
        assert_eq!(req.state, RequestState::Resolved);
    }

    #[test]
    fn test_cancelled_request_rejects_late_fix() {
        let mut req = LocationRequest::new(1);
        assert!(req.cancel());
        assert!(!req.accepts(1));
        assert!(!req.resolve());
        assert_eq!(req.state, RequestState::Cancelled);
    }

    #[test]
    fn test_cancel_after_resolve_is_noop() {
        let mut req = LocationRequest::new(1);
        req.resolve();
        assert!(!req.cancel());
        assert_eq!(req.state, RequestState::Resolved);
    }

    #[test]
    fn test_unavailable_capability() {
        let cap = LocationCapability::default();
        assert!(!cap.is_available());
        assert_eq!(cap.provider().err(), Some(LocationError::Unavailable));
        assert_eq!(LocationError::Unavailable.to_string(), "GPS not available");
    }

    #[tokio::test]
    async fn test_fixed_provider_reports_position() {
        let provider = FixedLocationProvider::new(Location::new(10.0, 20.0), Duration::ZERO);
        let cap = LocationCapability::Available(Arc::new(provider));
        assert!(cap.is_available());

        let fix = cap.provider().unwrap().current_fix().await.unwrap();
        assert_eq!(fix, Location::new(10.0, 20.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_provider_waits_for_delay() {
        let provider = FixedLocationProvider::new(Location::default(), Duration::from_secs(5));
        let start = tokio::time::Instant::now();
        provider.current_fix().await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(5));
    }
}
