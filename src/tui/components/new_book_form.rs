//! # New Book Form
//!
//! Three text fields: book name, start place, destination. Tab / arrows move
//! focus, Enter advances and submits from the last field, Ctrl+S submits
//! from anywhere. Validation happens in core; the form only collects text.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use crate::tui::component::{Component, EventHandler};
use crate::tui::components::text_field::{FIELD_HEIGHT, FieldEvent, TextField};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Submit {
        name: String,
        start_place: String,
        destination: String,
    },
    Cancel,
}

#[derive(Debug, Clone)]
pub struct NewBookForm {
    fields: [TextField; 3],
    focus: usize,
}

impl Default for NewBookForm {
    fn default() -> Self {
        Self::new()
    }
}

impl NewBookForm {
    pub fn new() -> Self {
        let mut form = Self {
            fields: [
                TextField::new("Book name"),
                TextField::new("Start place"),
                TextField::new("Destination"),
            ],
            focus: 0,
        };
        form.sync_focus();
        form
    }

    /// Empty all fields and focus the first one.
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.clear();
        }
        self.focus = 0;
        self.sync_focus();
    }

    fn sync_focus(&mut self) {
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.focused = i == self.focus;
        }
    }

    fn move_focus(&mut self, forward: bool) {
        let n = self.fields.len();
        self.focus = if forward {
            (self.focus + 1) % n
        } else {
            (self.focus + n - 1) % n
        };
        self.sync_focus();
    }

    fn submission(&self) -> FormEvent {
        let [name, start_place, destination] = &self.fields;
        FormEvent::Submit {
            name: name.value().to_string(),
            start_place: start_place.value().to_string(),
            destination: destination.value().to_string(),
        }
    }
}

impl EventHandler for NewBookForm {
    type Event = FormEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<FormEvent> {
        match event {
            TuiEvent::Escape => Some(FormEvent::Cancel),
            TuiEvent::SaveForm => Some(self.submission()),
            TuiEvent::NextField | TuiEvent::CursorDown => {
                self.move_focus(true);
                None
            }
            TuiEvent::PrevField | TuiEvent::CursorUp => {
                self.move_focus(false);
                None
            }
            _ => match self.fields[self.focus].handle_event(event) {
                Some(FieldEvent::Submit(_)) if self.focus + 1 == self.fields.len() => {
                    Some(self.submission())
                }
                Some(FieldEvent::Submit(_)) => {
                    self.move_focus(true);
                    None
                }
                _ => None,
            },
        }
    }
}

impl Component for NewBookForm {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [a, b, c, _, help] = Layout::vertical([
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        for (field, field_area) in self.fields.iter_mut().zip([a, b, c]) {
            field.render(frame, field_area);
        }

        let help_text = Paragraph::new(
            Line::from(" Tab Next field  Enter Create  Esc Back ").centered(),
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help_text, help);
    }
}
