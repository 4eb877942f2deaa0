//! # Notice Popup
//!
//! Centered popup over any screen for a core `Notice`. Errors stay until a
//! key is pressed; the event loop dismisses success notices on a timer.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};

use crate::core::state::{Notice, NoticeKind};
use crate::tui::component::Component;
use crate::tui::ui::centered_rect;

pub struct NoticePopup<'a> {
    notice: &'a Notice,
}

impl<'a> NoticePopup<'a> {
    pub fn new(notice: &'a Notice) -> Self {
        Self { notice }
    }
}

impl Component for NoticePopup<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let (title, color) = match self.notice.kind {
            NoticeKind::Error => (" Error ", Color::Red),
            NoticeKind::Success => (" Success ", Color::Green),
        };

        // 80% width, 30% height, like a phone toast
        let popup = centered_rect(80, 30, area);
        frame.render_widget(Clear, popup);

        let block = Block::bordered()
            .border_style(Style::default().fg(color))
            .title(title)
            .title_bottom(Line::from(" any key ").centered());
        let body = Paragraph::new(self.notice.text.as_str())
            .centered()
            .wrap(Wrap { trim: true })
            .block(block);
        frame.render_widget(body, popup);
    }
}
