//! # Core Application Logic
//!
//! Place book business logic. It knows nothing about any specific UI
//! technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • App (state)          │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Storage (JSON files) │
//!                    └───────────┬─────────────┘
//!                                │
//!                ┌───────────────┴───────────────┐
//!                ▼                               ▼
//!         ┌────────────┐                  ┌────────────┐
//!         │    TUI     │                  │  `list`    │
//!         │  Adapter   │                  │  command   │
//!         │ (ratatui)  │                  │  (stdout)  │
//!         └────────────┘                  └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`model`]: `Book` and `Place`, the persisted data
//! - [`storage`]: one JSON file per book in the data directory
//! - [`state`]: the `App` struct and its operations
//! - [`action`]: the `Action` enum and the `update()` reducer
//! - [`location`]: the optional location capability and cancellable requests
//! - [`config`]: config file + CLI resolution

pub mod action;
pub mod config;
pub mod location;
pub mod model;
pub mod state;
pub mod storage;
