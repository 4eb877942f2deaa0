//! # TextField Component
//!
//! Single-line text input used by the New Book form and the place input.
//!
//! The buffer and cursor are internal state; `focused` is a prop set by the
//! parent. The cursor is a byte offset kept on a char boundary. Long text
//! scrolls horizontally so the cursor stays visible.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Rows a field occupies: one line of text plus the border.
pub const FIELD_HEIGHT: u16 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    /// Enter pressed; carries the current text.
    Submit(String),
    Changed,
}

#[derive(Debug, Clone)]
pub struct TextField {
    pub label: &'static str,
    pub focused: bool,
    buffer: String,
    cursor: usize,
}

impl TextField {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            focused: false,
            buffer: String::new(),
            cursor: 0,
        }
    }

    pub fn value(&self) -> &str {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    fn prev_boundary(&self) -> usize {
        self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map_or(0, |(i, _)| i)
    }

    fn next_boundary(&self) -> usize {
        self.buffer[self.cursor..]
            .chars()
            .next()
            .map_or(self.cursor, |c| self.cursor + c.len_utf8())
    }

    /// Display column of the cursor, counted from the start of the text.
    fn cursor_col(&self) -> u16 {
        u16::try_from(self.buffer[..self.cursor].width()).unwrap_or(u16::MAX)
    }
}

impl Component for TextField {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(self.label);

        let inner_width = area.width.saturating_sub(2);
        let col = self.cursor_col();
        let scroll_x = col.saturating_sub(inner_width.saturating_sub(1));

        let input = Paragraph::new(self.buffer.as_str())
            .block(block)
            .scroll((0, scroll_x));
        frame.render_widget(input, area);

        if self.focused && area.width > 2 && area.height > 2 {
            frame.set_cursor_position((area.x + 1 + (col - scroll_x), area.y + 1));
        }
    }
}

impl EventHandler for TextField {
    type Event = FieldEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut tmp = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut tmp));
                Some(FieldEvent::Changed)
            }
            TuiEvent::Paste(text) => {
                let single_line = text.replace(['\r', '\n'], " ");
                self.insert_str(&single_line);
                Some(FieldEvent::Changed)
            }
            TuiEvent::Backspace if self.cursor > 0 => {
                let prev = self.prev_boundary();
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(FieldEvent::Changed)
            }
            TuiEvent::Delete if self.cursor < self.buffer.len() => {
                let next = self.next_boundary();
                self.buffer.drain(self.cursor..next);
                Some(FieldEvent::Changed)
            }
            TuiEvent::CursorLeft => {
                self.cursor = self.prev_boundary();
                None
            }
            TuiEvent::CursorRight => {
                self.cursor = self.next_boundary();
                None
            }
            TuiEvent::Home => {
                self.cursor = 0;
                None
            }
            TuiEvent::End => {
                self.cursor = self.buffer.len();
                None
            }
            TuiEvent::Submit => Some(FieldEvent::Submit(self.buffer.clone())),
            _ => None,
        }
    }
}
