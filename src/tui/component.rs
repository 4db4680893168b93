use ratatui::Frame;
use ratatui::layout::Rect;

/// A piece of the UI that draws itself into a `Rect`.
///
/// Components get their data as struct fields ("props") and may hold
/// references to persistent state owned by `TuiState`. `render` takes
/// `&mut self` so layout caches and scroll offsets can be updated during
/// the render pass, the same way a ratatui `StatefulWidget` works.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that reacts to terminal events.
pub trait EventHandler {
    /// The type of high-level event this component emits.
    type Event;

    /// Handle a low-level `TuiEvent` and optionally return a high-level event.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
