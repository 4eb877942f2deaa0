//! # Book View Component
//!
//! The View Book screen: trip header, the places in insertion order, and an
//! input for adding a place.
//!
//! Keys: typing goes to the place input, Enter adds, Up/Down select a place,
//! Ctrl+D twice deletes every place with the selected name, Ctrl+L adds the
//! current location (only offered when the capability is available).

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph};

use crate::core::model::Book;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::text_field::{FIELD_HEIGHT, FieldEvent, TextField};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookViewEvent {
    AddPlace(String),
    /// Delete the place at this index (and every other place sharing its name).
    Delete(usize),
    AddCurrentLocation,
    Back,
}

#[derive(Debug)]
pub struct BookViewState {
    pub list_state: ListState,
    pub confirm_delete: bool,
    place_input: TextField,
    /// Number of places shown in the last frame.
    len: usize,
}

impl Default for BookViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl BookViewState {
    pub fn new() -> Self {
        let mut place_input = TextField::new("Add place");
        place_input.focused = true;
        Self {
            list_state: ListState::default(),
            confirm_delete: false,
            place_input,
            len: 0,
        }
    }

    /// Prepare for showing a book with `len` places.
    pub fn reset(&mut self, len: usize) {
        self.place_input.clear();
        self.confirm_delete = false;
        self.sync_len(len);
        self.list_state.select(None);
    }

    /// Keep the selection inside a list of `len` places.
    fn sync_len(&mut self, len: usize) {
        self.len = len;
        match self.list_state.selected() {
            Some(_) if len == 0 => self.list_state.select(None),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            _ => {}
        }
    }
}

impl EventHandler for BookViewState {
    type Event = BookViewEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<BookViewEvent> {
        let is_delete_key = matches!(event, TuiEvent::DeleteSelected);
        if !is_delete_key {
            self.confirm_delete = false;
        }

        match event {
            TuiEvent::Escape => Some(BookViewEvent::Back),
            TuiEvent::AddCurrentLocation => Some(BookViewEvent::AddCurrentLocation),
            TuiEvent::CursorUp => {
                if self.len > 0 {
                    let i = self.list_state.selected().map_or(self.len - 1, |i| i.saturating_sub(1));
                    self.list_state.select(Some(i));
                }
                None
            }
            TuiEvent::CursorDown => {
                if self.len > 0 {
                    let i = self.list_state.selected().map_or(0, |i| (i + 1).min(self.len - 1));
                    self.list_state.select(Some(i));
                }
                None
            }
            TuiEvent::DeleteSelected => {
                let index = self.list_state.selected()?;
                if self.confirm_delete {
                    self.confirm_delete = false;
                    Some(BookViewEvent::Delete(index))
                } else {
                    self.confirm_delete = true;
                    None
                }
            }
            _ => match self.place_input.handle_event(event) {
                Some(FieldEvent::Submit(text)) => {
                    self.place_input.clear();
                    Some(BookViewEvent::AddPlace(text))
                }
                _ => None,
            },
        }
    }
}

/// Transient render wrapper for the View Book screen.
pub struct BookView<'a> {
    state: &'a mut BookViewState,
    book: &'a Book,
    location_available: bool,
}

impl<'a> BookView<'a> {
    pub fn new(state: &'a mut BookViewState, book: &'a Book, location_available: bool) -> Self {
        Self {
            state,
            book,
            location_available,
        }
    }

    fn help_text(&self) -> &'static str {
        if self.state.confirm_delete {
            " Press Ctrl+D again to confirm delete "
        } else if self.location_available {
            " Enter Add  ↑↓ Select  Ctrl+D Delete  Ctrl+L Current location  Esc Back "
        } else {
            " Enter Add  ↑↓ Select  Ctrl+D Delete  Esc Back "
        }
    }
}

impl Component for BookView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.sync_len(self.book.places.len());

        let [header_area, places_area, input_area, help_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(1),
        ])
        .areas(area);

        let dim = Style::default().fg(Color::Gray);
        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                self.book.name.as_str(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(format!("Start: {}", self.book.start_place), dim)),
            Line::from(Span::styled(format!("Destination: {}", self.book.destination), dim)),
            Line::from(Span::styled(format!("Created: {}", self.book.created_date), dim)),
        ]);
        frame.render_widget(header, header_area);

        let block = Block::bordered()
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Places ");

        if self.book.places.is_empty() {
            let empty = Paragraph::new("No places added yet")
                .style(Style::default().fg(Color::DarkGray))
                .centered()
                .block(block);
            frame.render_widget(empty, places_area);
        } else {
            let items: Vec<ListItem> = self
                .book
                .places
                .iter()
                .map(|place| {
                    ListItem::new(vec![
                        Line::from(place.name.as_str()),
                        Line::from(Span::styled(
                            place.timestamp.as_str(),
                            Style::default().fg(Color::DarkGray),
                        )),
                    ])
                })
                .collect();

            let highlight = if self.state.confirm_delete {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
            };
            let list = List::new(items).block(block).highlight_style(highlight);
            frame.render_stateful_widget(list, places_area, &mut self.state.list_state);
        }

        self.state.place_input.render(frame, input_area);

        let help = Paragraph::new(Line::from(self.help_text()).centered())
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, help_area);
    }
}
