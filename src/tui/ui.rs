use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{BookList, BookView, MainMenu, NoticePopup, TitleBar};
use crate::tui::{Screen, TuiState};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let [title_area, main_area] = Layout::vertical([Length(1), Min(0)]).areas(frame.area());

    let status = if app.location_pending() { "Locating..." } else { "" };
    TitleBar::new(tui.screen.title(), status).render(frame, title_area);

    match tui.screen {
        Screen::Main => MainMenu::new(&mut tui.main_menu).render(frame, main_area),
        Screen::NewBook => tui.new_book.render(frame, main_area),
        Screen::OpenBook => BookList::new(&mut tui.book_list, &app.books).render(frame, main_area),
        Screen::ViewBook => match &app.current_book {
            Some(book) => BookView::new(&mut tui.book_view, book, app.location.is_available())
                .render(frame, main_area),
            None => {
                let empty = Paragraph::new("No book is open")
                    .style(Style::default().fg(Color::DarkGray))
                    .centered();
                frame.render_widget(empty, main_area);
            }
        },
    }

    if let Some(notice) = &app.notice {
        NoticePopup::new(notice).render(frame, frame.area());
    }
}

/// Truncate `s` to at most `max_width` display columns, adding "..." if cut.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }

    let budget = max_width - 3;
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}

/// Compute a centered rect using percentage of the outer rect.
pub fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Notice;
    use crate::test_support::test_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(app: &App, tui: &mut TuiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("Trip", 10), "Trip");
        assert_eq!(truncate_to_width("Summer Holiday", 10), "Summer ...");
        assert_eq!(truncate_to_width("Summer", 2), "..");
        // Wide chars count double
        assert_eq!(truncate_to_width("東京大阪名古屋", 7), "東京...");
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(80, 30, outer);
        assert_eq!(inner.width, 80);
        assert_eq!(inner.height, 15);
        assert!(inner.x >= 10 && inner.y >= 17);
    }

    #[test]
    fn test_draw_each_screen() {
        let (mut app, _dir) = test_app();
        let mut tui = TuiState::new();

        assert!(draw(&app, &mut tui).contains("New Book"));

        tui.screen = Screen::NewBook;
        assert!(draw(&app, &mut tui).contains("Start place"));

        tui.screen = Screen::OpenBook;
        assert!(draw(&app, &mut tui).contains("No books found"));

        tui.screen = Screen::ViewBook;
        assert!(draw(&app, &mut tui).contains("No book is open"));

        app.create_book("Trip", "Home", "Beach").unwrap();
        assert!(draw(&app, &mut tui).contains("Destination: Beach"));
    }

    #[test]
    fn test_notice_overlays_screen() {
        let (mut app, _dir) = test_app();
        let mut tui = TuiState::new();
        app.notice = Some(Notice::error("GPS not available"));
        assert!(draw(&app, &mut tui).contains("GPS not available"));
    }
}
