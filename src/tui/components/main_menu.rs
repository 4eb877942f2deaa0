//! # Main Menu
//!
//! The start screen: create a new book or open an existing one.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::Line;
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

const ENTRIES: [&str; 2] = ["New Book", "Open Book"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    NewBook,
    OpenBook,
    Quit,
}

#[derive(Debug, Default)]
pub struct MainMenuState {
    pub list_state: ListState,
}

impl MainMenuState {
    pub fn new() -> Self {
        Self {
            list_state: ListState::default().with_selected(Some(0)),
        }
    }

    fn selected(&self) -> usize {
        self.list_state.selected().unwrap_or(0)
    }
}

impl EventHandler for MainMenuState {
    type Event = MenuEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<MenuEvent> {
        match event {
            TuiEvent::CursorUp => {
                self.list_state.select(Some(self.selected().saturating_sub(1)));
                None
            }
            TuiEvent::CursorDown => {
                self.list_state
                    .select(Some((self.selected() + 1).min(ENTRIES.len() - 1)));
                None
            }
            TuiEvent::Submit => Some(if self.selected() == 0 {
                MenuEvent::NewBook
            } else {
                MenuEvent::OpenBook
            }),
            TuiEvent::InputChar('n') => Some(MenuEvent::NewBook),
            TuiEvent::InputChar('o') => Some(MenuEvent::OpenBook),
            TuiEvent::InputChar('q') | TuiEvent::Escape => Some(MenuEvent::Quit),
            _ => None,
        }
    }
}

/// Transient render wrapper for the main menu.
pub struct MainMenu<'a> {
    state: &'a mut MainMenuState,
}

impl<'a> MainMenu<'a> {
    pub fn new(state: &'a mut MainMenuState) -> Self {
        Self { state }
    }
}

impl Component for MainMenu<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [heading_area, menu_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Length(4)])
                .flex(Flex::Center)
                .areas(area);
        let [menu_area] = Layout::horizontal([Constraint::Length(24)])
            .flex(Flex::Center)
            .areas(menu_area);

        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        let heading = Paragraph::new(vec![
            Line::from("Place Books").bold().centered(),
            Line::from(version).style(Style::default().fg(Color::DarkGray)).centered(),
        ]);
        frame.render_widget(heading, heading_area);

        let items: Vec<ListItem> = ENTRIES.iter().map(|e| ListItem::new(*e)).collect();
        let list = List::new(items)
            .block(Block::bordered().title_bottom(Line::from(" Enter Select  q Quit ").centered()))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("› ");
        frame.render_stateful_widget(list, menu_area, &mut self.state.list_state);
    }
}
