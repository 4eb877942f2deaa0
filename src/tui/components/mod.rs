//! # TUI Components
//!
//! One component per screen plus the small pieces they share.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: app name, screen name, status hint
//! - `NoticePopup`: error / success popup over any screen
//!
//! ### Stateful Components (Event-Driven)
//!
//! Persistent state lives in `TuiState`; a transient wrapper borrows it
//! (plus core data as props) for each frame:
//! - `MainMenuState` / `MainMenu`: New Book, Open Book
//! - `NewBookForm`: three `TextField`s
//! - `BookListState` / `BookList`: the Open Book screen
//! - `BookViewState` / `BookView`: the View Book screen
//!
//! Components never touch `App`. They emit screen-level events and the
//! event loop turns those into core `Action`s.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs            (this file)
//! ├── title_bar.rs
//! ├── notice.rs
//! ├── text_field.rs
//! ├── main_menu.rs
//! ├── new_book_form.rs
//! ├── book_list.rs
//! └── book_view.rs
//! ```

pub mod book_list;
pub mod book_view;
pub mod main_menu;
pub mod new_book_form;
pub mod notice;
pub mod text_field;
mod title_bar;

pub use book_list::{BookList, BookListEvent, BookListState};
pub use book_view::{BookView, BookViewEvent, BookViewState};
pub use main_menu::{MainMenu, MainMenuState, MenuEvent};
pub use new_book_form::{FormEvent, NewBookForm};
pub use notice::NoticePopup;
pub use title_bar::TitleBar;
