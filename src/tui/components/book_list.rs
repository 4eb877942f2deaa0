//! # Book List Component
//!
//! The Open Book screen: every book found by the last directory scan, one
//! per line as `name: start → destination`.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `BookListState` lives in `TuiState`
//! - `BookList` is created each frame with borrowed state and the books as props

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph};

use crate::core::model::Book;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::ui::truncate_to_width;

/// Persistent state for the book list.
#[derive(Debug, Default)]
pub struct BookListState {
    pub list_state: ListState,
    /// Number of books in the current listing.
    len: usize,
}

impl BookListState {
    /// Reset selection for a fresh listing of `len` books.
    pub fn reset(&mut self, len: usize) {
        self.len = len;
        self.list_state.select(if len == 0 { None } else { Some(0) });
    }
}

/// Events emitted by the book list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookListEvent {
    Open(usize),
    Back,
}

impl EventHandler for BookListState {
    type Event = BookListEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<BookListEvent> {
        match event {
            TuiEvent::Escape => Some(BookListEvent::Back),
            TuiEvent::CursorUp => {
                if let Some(i) = self.list_state.selected() {
                    self.list_state.select(Some(i.saturating_sub(1)));
                }
                None
            }
            TuiEvent::CursorDown => {
                if let Some(i) = self.list_state.selected() {
                    self.list_state.select(Some((i + 1).min(self.len.saturating_sub(1))));
                }
                None
            }
            TuiEvent::Submit => self.list_state.selected().map(BookListEvent::Open),
            _ => None,
        }
    }
}

/// Transient render wrapper for the book list.
pub struct BookList<'a> {
    state: &'a mut BookListState,
    books: &'a [Book],
}

impl<'a> BookList<'a> {
    pub fn new(state: &'a mut BookListState, books: &'a [Book]) -> Self {
        Self { state, books }
    }
}

impl Component for BookList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Open Book ")
            .title_bottom(Line::from(" Enter Open  Esc Back ").centered())
            .padding(Padding::horizontal(1));

        if self.books.is_empty() {
            let empty = Paragraph::new("No books found")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        // Layout: "<route>   3 places"
        let inner_width = area.width.saturating_sub(4) as usize; // borders + padding
        let items: Vec<ListItem> = self
            .books
            .iter()
            .map(|book| {
                let count = book.place_count();
                let route_width = inner_width.saturating_sub(count.len() + 2);
                let route = truncate_to_width(&book.route(), route_width);
                let padded = format!("{:<width$}", route, width = route_width);
                ListItem::new(Line::from(vec![
                    Span::raw(padded),
                    Span::raw("  "),
                    Span::styled(count, Style::default().fg(Color::DarkGray)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));

        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_selection_clamps_to_listing() {
        let mut state = BookListState::default();
        state.reset(2);
        state.handle_event(&TuiEvent::CursorDown);
        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(state.handle_event(&TuiEvent::Submit), Some(BookListEvent::Open(1)));
        state.handle_event(&TuiEvent::CursorUp);
        state.handle_event(&TuiEvent::CursorUp);
        assert_eq!(state.handle_event(&TuiEvent::Submit), Some(BookListEvent::Open(0)));
    }

    #[test]
    fn test_empty_listing_opens_nothing() {
        let mut state = BookListState::default();
        state.reset(0);
        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(state.handle_event(&TuiEvent::Submit), None);
        assert_eq!(state.handle_event(&TuiEvent::Escape), Some(BookListEvent::Back));
    }

    #[test]
    fn test_render_empty() {
        let mut terminal = Terminal::new(TestBackend::new(40, 5)).unwrap();
        let mut state = BookListState::default();
        terminal
            .draw(|f| BookList::new(&mut state, &[]).render(f, f.area()))
            .unwrap();
        assert!(screen_text(&terminal).contains("No books found"));
    }

    #[test]
    fn test_render_routes() {
        let mut terminal = Terminal::new(TestBackend::new(60, 6)).unwrap();
        let books = vec![Book::new("Trip", "Home", "Beach"), Book::new("Alps", "Bern", "Zermatt")];
        let mut state = BookListState::default();
        state.reset(books.len());
        terminal
            .draw(|f| BookList::new(&mut state, &books).render(f, f.area()))
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Trip: Home → Beach"));
        assert!(text.contains("Alps: Bern → Zermatt"));
        assert!(text.contains("0 places"));
    }
}
