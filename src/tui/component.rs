use ratatui::Frame;
use ratatui::layout::Rect;

/// Something that draws itself into a region of the frame.
///
/// Screens keep their persistent state in `TuiState` and are wrapped in a
/// short-lived component each frame, so `render` takes `&mut self` to let
/// the wrapper update list selection and similar presentation state.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that turns raw terminal events into screen-level events.
pub trait EventHandler {
    /// The screen-level event this component emits.
    type Event;

    /// Returns `Some` when the event means something to the parent.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
