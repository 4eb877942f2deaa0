//! # TitleBar Component
//!
//! One-line header: app name, the current screen, and a status hint.
//!
//! Stateless. The three props come from different places: `screen` from
//! the TUI's navigation state, `status` from core state (e.g. a pending
//! location fix). The bar just renders what it is given:
//!
//! 1. **With status**: `"Place Books | View Book | Locating..."`
//! 2. **Default**: `"Place Books | View Book"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub struct TitleBar<'a> {
    pub screen: &'a str,
    pub status: &'a str,
}

impl<'a> TitleBar<'a> {
    pub fn new(screen: &'a str, status: &'a str) -> Self {
        Self { screen, status }
    }

    fn text(&self) -> String {
        if self.status.is_empty() {
            format!("Place Books | {}", self.screen)
        } else {
            format!("Place Books | {} | {}", self.screen, self.status)
        }
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(Span::styled(
            self.text(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(line, area);
    }
}
